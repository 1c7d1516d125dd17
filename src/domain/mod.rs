pub mod discussions;
pub mod lessons;
pub mod status;
pub mod users;
