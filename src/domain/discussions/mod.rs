pub mod comment;
pub mod question;

pub use comment::Comment;
pub use question::Question;
