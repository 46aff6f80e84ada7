pub mod hash;
pub mod validator;

pub use hash::HashValidator;
pub use validator::CommandValidator;
