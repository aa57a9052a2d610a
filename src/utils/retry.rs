use std::future::Future;
use std::time::Duration;

use crate::error::Result;

pub const INITIAL_BACKOFF: Duration = Duration::from_millis(200);

/// Runs `op` up to `max_attempts` times, doubling the delay between tries.
///
/// Only the last error is returned.
pub async fn retry_with_backoff<T, F, Fut>(what: &str, max_attempts: usize, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    retry_with_delay(what, max_attempts, INITIAL_BACKOFF, &mut op).await
}

async fn retry_with_delay<T, F, Fut>(
    what: &str,
    max_attempts: usize,
    initial: Duration,
    op: &mut F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = max_attempts.max(1);
    let mut delay = initial;
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                log::warn!(
                    "{} failed (attempt {}/{}): {}. Retrying in {:?}",
                    what,
                    attempt,
                    max_attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            Err(e) => {
                log::error!("{} failed after {} attempts: {}", what, attempt, e);
                return Err(e);
            }
        }
    }
}
