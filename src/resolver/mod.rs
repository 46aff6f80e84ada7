//! Query templates per entity kind.
//!
//! Every resolver borrows an [`Executor`](crate::git::Executor) and nothing
//! else, so they are cheap to build on demand and safe to share.

pub mod author;
pub mod branch;
pub mod commit;
pub mod files;
pub mod remote;
pub mod tag;

pub use author::{AuthorQuery, AuthorResolver};
pub use branch::BranchResolver;
pub use commit::CommitResolver;
pub use files::{FilesResolver, RenamedFile};
pub use remote::RemoteResolver;
pub use tag::TagResolver;
