pub mod paths;
pub mod rate_limit;
pub mod retry;
