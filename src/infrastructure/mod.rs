pub mod memory;
pub mod notifications;
