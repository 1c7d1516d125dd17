pub mod clock;
pub mod store;
pub mod unit_of_work;

pub use clock::{SteppingClock, SystemClock};
pub use store::{JournalEntry, MemoryStore};
pub use unit_of_work::MemoryUnitOfWork;
