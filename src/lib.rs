pub mod catalog;
pub mod core;
pub mod edinet;
pub mod error;
pub mod process;
pub mod publish;
pub mod storage;
pub mod utils;

// Re-exports
pub use crate::core::CompassConfig;
pub use edinet::{Filing, FilingListEntry, StatementType};
pub use error::{CompassError, Result};
pub use process::{BatchRunner, FilingProcessor, RunReport};
pub use publish::Publisher;
