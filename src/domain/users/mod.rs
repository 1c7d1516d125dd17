pub mod actor;
pub mod role;

pub use actor::{Actor, SchoolId, User};
pub use role::Role;
