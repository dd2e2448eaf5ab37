pub mod extract;
pub mod log_query;
pub mod paged_reader;
pub mod tail;
