pub mod discussions;
pub mod pagination;
