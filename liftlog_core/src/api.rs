//! HTTP-shaped request handling, independent of any server framework.
//!
//! A transport turns whatever it receives into a [`Request`], hands it to
//! [`Api::handle`], and writes the returned [`Response`] back out.
//!
//! | Method | Path            | Success                         |
//! |--------|-----------------|---------------------------------|
//! | GET    | `/api/workouts` | 200, JSON array of workouts     |
//! | POST   | `/api/workouts` | 201, `{"ok":true}`              |
//! | GET    | `/api/stats`    | 200, JSON statistics report     |
//! | GET    | `/api/export`   | 200, CSV attachment             |

use crate::store::WorkoutStore;
use crate::{export, stats, validation, Result};
use chrono::{Local, NaiveDate};
use serde_json::json;
use std::fmt;

pub const WORKOUTS_PATH: &str = "/api/workouts";
pub const STATS_PATH: &str = "/api/stats";
pub const EXPORT_PATH: &str = "/api/export";

const JSON_CONTENT_TYPE: &str = "application/json";
const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Request method
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
        };
        f.write_str(name)
    }
}

/// An incoming request
#[derive(Clone, Debug)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: String,
}

impl Request {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: String::new(),
        }
    }

    pub fn post(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: body.into(),
        }
    }
}

/// An outgoing response
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Response {
    fn new(status: u16, content_type: &str, body: String) -> Self {
        Self {
            status,
            headers: vec![
                ("Content-Type".into(), content_type.into()),
                ("Cache-Control".into(), "no-cache".into()),
            ],
            body,
        }
    }

    fn json(status: u16, body: String) -> Self {
        Self::new(status, JSON_CONTENT_TYPE, body)
    }

    fn error(status: u16, message: &str) -> Self {
        Self::json(status, json!({ "error": message }).to_string())
    }

    fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Routes requests to the store, validation, statistics and export
pub struct Api<S> {
    store: S,
    export_file_name: String,
}

impl<S: WorkoutStore> Api<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            export_file_name: "workouts.csv".into(),
        }
    }

    /// File name offered in the export's `Content-Disposition` header
    pub fn with_export_file_name(mut self, name: impl Into<String>) -> Self {
        self.export_file_name = name.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle a request, anchoring statistics at the local calendar date
    pub fn handle(&self, request: &Request) -> Response {
        self.handle_at(request, Local::now().date_naive())
    }

    /// Handle a request, anchoring statistics at `today`
    pub fn handle_at(&self, request: &Request, today: NaiveDate) -> Response {
        let path = request.path.split('?').next().unwrap_or_default();

        let outcome = match (request.method, path) {
            (Method::Get, WORKOUTS_PATH) => self.list_workouts(),
            (Method::Post, WORKOUTS_PATH) => self.add_workout(&request.body),
            (Method::Get, STATS_PATH) => self.stats(today),
            (Method::Get, EXPORT_PATH) => self.export(),
            (_, STATS_PATH) | (_, EXPORT_PATH) => Ok(method_not_allowed("GET")),
            _ => Ok(Response::error(404, "not found")),
        };

        let response = outcome.unwrap_or_else(|e| {
            tracing::error!("{} {} failed: {}", request.method, path, e);
            Response::error(500, "internal server error")
        });

        tracing::info!("{} {} -> {}", request.method, path, response.status);
        response
    }

    fn list_workouts(&self) -> Result<Response> {
        let records = self.store.get_all()?;
        Ok(Response::json(200, serde_json::to_string(&records)?))
    }

    fn add_workout(&self, body: &str) -> Result<Response> {
        let record = match validation::parse_submission(body) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!("Rejected workout submission: {}", e);
                return Ok(Response::error(400, &e.to_string()));
            }
        };

        tracing::debug!("Logging {} on {}", record.exercise, record.date);
        self.store.append(record)?;
        Ok(Response::json(201, json!({ "ok": true }).to_string()))
    }

    fn stats(&self, today: NaiveDate) -> Result<Response> {
        let records = self.store.get_all()?;
        let report = stats::compute(&records, today);
        Ok(Response::json(200, serde_json::to_string(&report)?))
    }

    fn export(&self) -> Result<Response> {
        let records = self.store.get_all()?;
        let body = export::format_csv(&records)?;
        Ok(Response::new(200, CSV_CONTENT_TYPE, body).with_header(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", self.export_file_name),
        ))
    }
}

fn method_not_allowed(allow: &str) -> Response {
    Response::error(405, "method not allowed").with_header("Allow", allow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonFileStore, MemoryStore};
    use crate::{SetEntry, StatsReport, WorkoutRecord};
    use serde_json::Value;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn api_with(records: Vec<WorkoutRecord>) -> Api<MemoryStore> {
        Api::new(MemoryStore::new(records))
    }

    #[test]
    fn test_list_empty() {
        let api = api_with(vec![]);
        let response = api.handle(&Request::get(WORKOUTS_PATH));
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "[]");
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("Cache-Control"), Some("no-cache"));
    }

    #[test]
    fn test_post_then_list() {
        crate::logging::init_test();
        let api = api_with(vec![]);
        let response = api.handle(&Request::post(
            WORKOUTS_PATH,
            r#"{"date":"2024-06-01","exercise":"Squat","sets":[{"reps":5,"weight":100}]}"#,
        ));
        assert_eq!(response.status, 201);
        assert_eq!(response.body, r#"{"ok":true}"#);

        let response = api.handle(&Request::get(WORKOUTS_PATH));
        let listed: Vec<WorkoutRecord> = serde_json::from_str(&response.body).unwrap();
        assert_eq!(
            listed,
            vec![WorkoutRecord::strength("2024-06-01", "Squat", vec![SetEntry::new(5, 100.0)])]
        );
    }

    #[test]
    fn test_post_validation_errors() {
        let api = api_with(vec![]);
        let cases = [
            ("", "Body missing"),
            ("null", "Body missing"),
            ("{oops", "Body missing"),
            (r#"{"exercise":"Squat","duration":10}"#, "date is required"),
            (r#"{"date":"2024-06-01","exercise":" ","duration":10}"#, "exercise is required"),
            (r#"{"date":"2024-06-01","exercise":"Squat"}"#, "provide sets or duration"),
            (
                r#"{"date":"2024-06-01","exercise":"Squat","sets":[{"reps":0,"weight":10}]}"#,
                "reps must be > 0",
            ),
            (
                r#"{"date":"2024-06-01","exercise":"Squat","sets":[{"reps":1,"weight":-10}]}"#,
                "weight must be >= 0",
            ),
        ];

        for (body, message) in cases {
            let response = api.handle(&Request::post(WORKOUTS_PATH, body));
            assert_eq!(response.status, 400, "body: {}", body);
            let parsed: Value = serde_json::from_str(&response.body).unwrap();
            assert_eq!(parsed["error"], message, "body: {}", body);
            assert_eq!(response.header("Cache-Control"), Some("no-cache"));
        }

        // Nothing was admitted
        assert!(api.store().get_all().unwrap().is_empty());
    }

    #[test]
    fn test_stats_endpoint() {
        let api = api_with(vec![
            WorkoutRecord::strength("2024-06-14", "Bench Press", vec![SetEntry::new(10, 100.0)]),
            WorkoutRecord::cardio("2024-06-15", "Running", 30),
        ]);
        let response = api.handle_at(&Request::get(STATS_PATH), day("2024-06-15"));
        assert_eq!(response.status, 200);

        let json: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(json["weeklyVolume"], 1000.0);
        assert_eq!(json["monthlyVolume"], 1000.0);
        assert_eq!(json["bestOneRepMax"]["Bench Press"], 133.3);
        assert_eq!(json["dailyVolumes"][0]["date"], "2024-06-14");
        assert_eq!(json["dailyVolumes"][0]["volume"], 1000.0);

        let report: StatsReport = serde_json::from_str(&response.body).unwrap();
        assert_eq!(report.daily_volumes.len(), 1);
    }

    #[test]
    fn test_export_endpoint() {
        let api = api_with(vec![WorkoutRecord::cardio("2024-06-15", "Running", 30)]);
        let response = api.handle(&Request::get(EXPORT_PATH));
        assert_eq!(response.status, 200);
        assert_eq!(response.header("Content-Type"), Some("text/csv; charset=utf-8"));
        assert_eq!(
            response.header("Content-Disposition"),
            Some("attachment; filename=\"workouts.csv\"")
        );
        assert_eq!(response.header("Cache-Control"), Some("no-cache"));
        assert_eq!(
            response.body,
            "date,exercise,reps,weight,volume\n2024-06-15,Running,,,\n"
        );
    }

    #[test]
    fn test_export_file_name_is_configurable() {
        let api = api_with(vec![]).with_export_file_name("lifts.csv");
        let response = api.handle(&Request::get(EXPORT_PATH));
        assert_eq!(
            response.header("Content-Disposition"),
            Some("attachment; filename=\"lifts.csv\"")
        );
    }

    #[test]
    fn test_unknown_routes() {
        let api = api_with(vec![]);

        let response = api.handle(&Request::get("/api/nope"));
        assert_eq!(response.status, 404);
        assert_eq!(response.header("Cache-Control"), Some("no-cache"));

        let response = api.handle(&Request::post(STATS_PATH, "{}"));
        assert_eq!(response.status, 405);
        assert_eq!(response.header("Allow"), Some("GET"));

        let response = api.handle(&Request::post(EXPORT_PATH, ""));
        assert_eq!(response.status, 405);
        assert_eq!(response.header("Allow"), Some("GET"));
    }

    #[test]
    fn test_query_string_is_ignored() {
        let api = api_with(vec![]);
        let response = api.handle(&Request::get("/api/workouts?limit=5"));
        assert_eq!(response.status, 200);
    }

    #[test]
    fn test_store_failure_is_generic_500() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("workouts.json");
        let api = Api::new(JsonFileStore::open(&path).unwrap());
        std::fs::write(&path, "{ invalid json }").unwrap();

        for request in [
            Request::get(WORKOUTS_PATH),
            Request::get(STATS_PATH),
            Request::get(EXPORT_PATH),
            Request::post(WORKOUTS_PATH, r#"{"date":"2024-06-01","exercise":"Row","duration":5}"#),
        ] {
            let response = api.handle(&request);
            assert_eq!(response.status, 500);
            assert_eq!(response.body, r#"{"error":"internal server error"}"#);
        }
    }
}
