use crate::api_state::AppState;
use crate::models::api::{QueryMode, QueryParams, QueryResponse};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;

/// GET /api/logdata/<key> - Poll recent entries (`poll`) or dump the error log
#[get("/logdata/<key>?<level>&<id>&<pagesize>&<offset>")]
pub fn get_log_data(
    key: &str,
    level: Option<String>,
    id: Option<String>,
    pagesize: Option<String>,
    offset: Option<String>,
    state: &State<AppState>,
) -> Result<Json<QueryResponse>, Status> {
    let params = QueryParams {
        level,
        id,
        pagesize,
        offset,
    };

    state
        .query()
        .query(QueryMode::from_key(key), &params)
        .map(Json)
        .map_err(|e| {
            if e.is_rejected_input() {
                log::warn!("Rejected log query: {}", e);
                Status::BadRequest
            } else {
                log::error!("Log query failed: {}", e);
                Status::InternalServerError
            }
        })
}

/// GET /api/health - Health check endpoint
#[get("/health")]
pub fn health_check(state: &State<AppState>) -> String {
    format!("OK (up since {})", state.started_at().to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::log_level::LogLevel;
    use crate::repo::sqlite::SqliteRepo;
    use crate::service::log_query::LogQuery;
    use crate::utils::log_handler::LogHandler;
    use rocket::local::blocking::Client;
    use serde_json::Value;
    use std::sync::Arc;

    const RESULT_MESSAGE: &str = "ParsedResult: Success\nMainOperation: Backup\nCompactResults: [\n    Key: a\n]\nDeleteResults: [\n]\nRepairResults: [\n]\nTestResults: [\n]\nBackendStatistics: [\n]";

    fn client() -> Client {
        let repo = SqliteRepo::open(":memory:").unwrap();
        repo.setup_database().unwrap();
        repo.insert_error_log_at(Some(1), RESULT_MESSAGE, None, 1_699_999_000)
            .unwrap();
        repo.insert_error_log_at(None, "disk full", Some("IOException"), 1_700_000_500)
            .unwrap();

        let handler = Arc::new(LogHandler::new(100));
        handler.append(LogLevel::Information, "backup started", None);
        handler.append(LogLevel::Error, "upload failed", None);
        handler.append(LogLevel::Information, "backup finished", None);

        let state = AppState::new(LogQuery::new(Arc::new(repo), handler));
        let rocket = rocket::build()
            .manage(state)
            .mount("/api", routes![get_log_data, health_check]);
        Client::tracked(rocket).unwrap()
    }

    #[test]
    fn test_poll_route() {
        let client = client();

        let response = client
            .get("/api/logdata/poll?id=1&level=error&pagesize=nope")
            .dispatch();

        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().unwrap();
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["id"], 2);
        assert_eq!(entries[0]["level"], "Error");
    }

    #[test]
    fn test_dump_route_uses_cursor() {
        let client = client();

        let response = client
            .get("/api/logdata/errors?offset=1700000000&pagesize=5")
            .dispatch();

        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().unwrap();
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Timestamp"], 1_699_999_000);
        assert!(rows[0].get("BackupResults").is_none());
    }

    #[test]
    fn test_pretty_route_adds_sections() {
        let client = client();

        let response = client.get("/api/logdata/pretty").dispatch();

        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().unwrap();
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        // Newest first: the plain error row, then the result message
        assert_eq!(rows[0]["Message"], "disk full");
        assert_eq!(rows[0]["BackupResults"], serde_json::json!({}));
        assert_eq!(rows[1]["MainOperation"], "Backup");
        assert_eq!(rows[1]["ParsedResult"], "Success");
        assert_eq!(rows[1]["CompactResults"]["Key"], "a");
    }

    #[test]
    fn test_health_route() {
        let client = client();
        let response = client.get("/api/health").dispatch();
        assert_eq!(response.status(), Status::Ok);
        assert!(response.into_string().unwrap().starts_with("OK"));
    }
}
