pub mod filing;
pub mod parsing;
pub mod statement;

pub use filing::{Filing, FilingList, FilingListEntry};
pub use statement::{ArtifactFormat, StatementType};
