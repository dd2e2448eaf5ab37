use crate::models::log_level::LogLevel;
use crate::repo::sqlite::SqliteRepo;
use crate::utils::log_handler::LogHandler;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

/// Targets used by the web framework for its own per-request chatter
const FRAMEWORK_TARGET_PREFIXES: [&str; 2] = ["rocket", "_"];

fn is_framework_target(target: &str) -> bool {
    FRAMEWORK_TARGET_PREFIXES
        .iter()
        .any(|prefix| target.starts_with(prefix))
}

/// Warning and error record sent from the logger to the background worker
struct ErrorLogMessage {
    message: String,
}

/// Logger that prints to the console and also feeds the tail buffer.
///
/// Warnings and errors are additionally queued for the ErrorLog table. They
/// are written by a background thread once an [`ErrorLogSink`] is started, so
/// logging never waits on the database.
pub struct ServiceLogger {
    console: env_logger::Logger,
    handler: Arc<LogHandler>,
    tx: Sender<ErrorLogMessage>,
}

/// Receiving end of the ErrorLog queue. Records logged before the database is
/// open wait here until [`ErrorLogSink::start`] is called.
pub struct ErrorLogSink {
    rx: Receiver<ErrorLogMessage>,
}

impl ErrorLogSink {
    /// Start the worker thread that persists queued records into `repo`
    pub fn start(self, repo: SqliteRepo) {
        thread::spawn(move || {
            error_log_worker(self.rx, &repo);
        });
    }
}

impl ServiceLogger {
    pub fn new(level: LevelFilter, handler: Arc<LogHandler>) -> (Self, ErrorLogSink) {
        let console = env_logger::Builder::from_default_env()
            .filter_level(level)
            .format_timestamp_secs()
            .build();
        let (tx, rx) = mpsc::channel::<ErrorLogMessage>();

        (
            ServiceLogger {
                console,
                handler,
                tx,
            },
            ErrorLogSink { rx },
        )
    }

    pub fn level(&self) -> LevelFilter {
        self.console.filter()
    }
}

impl Log for ServiceLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.console.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.console.matches(record) {
            return;
        }

        self.console.log(record);

        let message = record.args().to_string();

        // Request logs would otherwise answer every poll with the previous poll
        if !is_framework_target(record.target()) {
            self.handler
                .append(LogLevel::from(record.level()), &message, record.module_path());
        }

        // Pool errors are logged by r2d2 itself; persisting them would loop
        if record.level() <= Level::Warn && !record.target().starts_with("r2d2") {
            // Ignore errors if the sink was dropped
            let _ = self.tx.send(ErrorLogMessage { message });
        }
    }

    fn flush(&self) {
        self.console.flush();
    }
}

/// Background worker that writes warnings and errors to the ErrorLog table
fn error_log_worker(rx: Receiver<ErrorLogMessage>, repo: &SqliteRepo) {
    while let Ok(log_msg) = rx.recv() {
        // Ignore errors to prevent infinite recursion if logging fails
        let _ = repo.insert_error_log(None, &log_msg.message, None);
    }
}

/// Install the service logger as the global `log` backend.
///
/// The returned sink must be started with the repository once it is open.
pub fn init_service_logger(
    level: LevelFilter,
    handler: Arc<LogHandler>,
) -> Result<ErrorLogSink, log::SetLoggerError> {
    let (logger, sink) = ServiceLogger::new(level, handler);
    log::set_max_level(logger.level());
    log::set_boxed_logger(Box::new(logger))?;
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dump_target::DumpTarget;
    use crate::models::page::PageRequest;
    use crate::service::paged_reader::LogStore;
    use crate::service::tail::TailSource;
    use serde_json::json;

    #[test]
    fn test_records_reach_tail_buffer() {
        let handler = Arc::new(LogHandler::new(10));
        let (logger, _sink) = ServiceLogger::new(LevelFilter::Info, handler.clone());

        logger.log(
            &Record::builder()
                .args(format_args!("upload failed"))
                .level(Level::Error)
                .target("backup")
                .module_path(Some("backup::upload"))
                .build(),
        );

        let rows = handler.after_id(0, LogLevel::Profiling, 10);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].level, LogLevel::Error);
        assert_eq!(rows[0].message, "upload failed");
        assert_eq!(rows[0].source.as_deref(), Some("backup::upload"));
    }

    #[test]
    fn test_records_below_level_are_dropped() {
        let handler = Arc::new(LogHandler::new(10));
        let (logger, _sink) = ServiceLogger::new(LevelFilter::Warn, handler.clone());

        logger.log(
            &Record::builder()
                .args(format_args!("chatty"))
                .level(Level::Debug)
                .target("backup")
                .build(),
        );

        assert!(handler.is_empty());
    }

    #[test]
    fn test_framework_request_logs_stay_out_of_tail_buffer() {
        let handler = Arc::new(LogHandler::new(10));
        let (logger, _sink) = ServiceLogger::new(LevelFilter::Info, handler.clone());
        logger.log(
            &Record::builder()
                .args(format_args!("backup finished"))
                .level(Level::Info)
                .target("backup")
                .build(),
        );
        let last_seen = handler
            .after_id(0, LogLevel::Profiling, 10)
            .last()
            .map(|row| row.id)
            .unwrap();

        // What the web framework emits around each request
        for _ in 0..2 {
            logger.log(
                &Record::builder()
                    .args(format_args!("GET /api/logdata/poll?id={}:", last_seen))
                    .level(Level::Info)
                    .target("rocket::server")
                    .build(),
            );
            logger.log(
                &Record::builder()
                    .args(format_args!("Matched: (get_log_data) GET /api/logdata/<key>"))
                    .level(Level::Info)
                    .target("_")
                    .build(),
            );
            logger.log(
                &Record::builder()
                    .args(format_args!("Outcome: Success(200 OK)"))
                    .level(Level::Info)
                    .target("_")
                    .build(),
            );

            assert!(handler
                .after_id(last_seen, LogLevel::Profiling, 10)
                .is_empty());
        }
    }

    #[test]
    fn test_worker_persists_messages() {
        let repo = SqliteRepo::open(":memory:").unwrap();
        repo.setup_database().unwrap();

        let (tx, rx) = mpsc::channel();
        tx.send(ErrorLogMessage {
            message: "disk full".to_string(),
        })
        .unwrap();
        drop(tx);
        error_log_worker(rx, &repo);

        let target = DumpTarget::new("ErrorLog", Some("ID")).unwrap();
        let rows = repo.dump_table(&target, &PageRequest::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Message"], json!("disk full"));
        assert_eq!(rows[0]["Exception"], serde_json::Value::Null);
    }

    #[test]
    fn test_warnings_before_database_is_open_are_persisted() {
        let handler = Arc::new(LogHandler::new(10));
        let (logger, sink) = ServiceLogger::new(LevelFilter::Info, handler);
        logger.log(
            &Record::builder()
                .args(format_args!("schema upgrade pending"))
                .level(Level::Warn)
                .target("startup")
                .build(),
        );
        logger.log(
            &Record::builder()
                .args(format_args!("pool opened"))
                .level(Level::Info)
                .target("startup")
                .build(),
        );
        drop(logger);

        let repo = SqliteRepo::open(":memory:").unwrap();
        repo.setup_database().unwrap();
        error_log_worker(sink.rx, &repo);

        let target = DumpTarget::new("ErrorLog", Some("ID")).unwrap();
        let rows = repo.dump_table(&target, &PageRequest::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Message"], json!("schema upgrade pending"));
    }
}
