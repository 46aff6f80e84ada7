pub mod command;
pub mod executor;
pub mod mock;
pub mod parser;
pub mod repository;
pub mod version;

// Re-export commonly used types
pub use command::{CommandOption, GitCommand};
pub use executor::{Executor, GitExecutor};
pub use parser::{AuthorEntry, BranchEntry};
pub use repository::Repository;
pub use version::{GitVersion, MIN_GIT_VERSION};
