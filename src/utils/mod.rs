pub mod db_logger;
pub mod log_handler;
