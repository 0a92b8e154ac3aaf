pub mod record;
pub mod record_store;
pub mod sort;

pub use record::{capitalize, Candidate, Record, Schema};
pub use record_store::{RecordSet, RecordStore};
pub use sort::SortOrder;
