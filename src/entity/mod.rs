//! Immutable snapshots of repository objects.
//!
//! Entities hold plain data. Anything that needs git again, such as a
//! branch's last commit, takes the executor as an argument and queries
//! fresh each time.

pub mod author;
pub mod branch;
pub mod commit;
pub mod hash;
pub mod remote;
pub mod tag;

pub use author::Author;
pub use branch::Branch;
pub use commit::Commit;
pub use hash::CommitHash;
pub use remote::Remote;
pub use tag::Tag;
