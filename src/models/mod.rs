pub mod api;
pub mod config;
pub mod config_validator;
pub mod dump_target;
pub mod error;
pub mod extracted_message;
pub mod log_level;
pub mod log_row;
pub mod page;
