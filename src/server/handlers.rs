use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::clock::ClockReading;
use crate::location::{LocationKey, LocationSummary, MatchRule};
use crate::sky::{SkyClock, SkyReport};
use crate::sun_times::SunriseSunset;

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub struct ApiError(StatusCode, String);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.0
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── Query parameters ────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct SkyQuery {
    pub city: Option<String>,
    /// RFC 3339 instant; defaults to now.
    pub at: Option<String>,
    /// Cloud percent. Blank or non-numeric values fall back to the default.
    pub cloud: Option<String>,
    #[serde(default)]
    pub explain: bool,
}

impl SkyQuery {
    fn city(&self) -> &str {
        self.city.as_deref().unwrap_or("")
    }

    fn cloud(&self) -> Option<f64> {
        self.cloud.as_deref().and_then(|s| s.trim().parse().ok())
    }

    fn instant(&self) -> Result<DateTime<Utc>, ApiError> {
        match self.at.as_deref() {
            Some(s) => parse_instant(s).map_err(|e| api_error(StatusCode::BAD_REQUEST, e)),
            None => Ok(Utc::now()),
        }
    }
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid instant '{}': {}", s, e))
}

fn log_request(path: &str, city: &str, outcome: impl std::fmt::Display, start: Instant) {
    info!(
        path,
        city,
        outcome = %outcome,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "request served"
    );
}

// ─── GET /api/locations ──────────────────────────────────────────

pub async fn locations(State(state): State<Arc<AppState>>) -> Json<Vec<LocationSummary>> {
    Json(state.catalog.summaries())
}

// ─── GET /api/resolve ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResolveQuery {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub key: LocationKey,
    pub rule: MatchRule,
    pub location: LocationSummary,
}

pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveQuery>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let start = Instant::now();
    let query = params.query.as_deref().unwrap_or("").trim();
    if query.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'query' parameter"));
    }

    let resolution = state
        .catalog
        .resolve_with_rule(query)
        .map_err(|e| api_error(StatusCode::NOT_FOUND, e.to_string()))?;

    log_request("/api/resolve", query, &resolution.record.key, start);
    Ok(Json(ResolveResponse {
        key: resolution.record.key.clone(),
        rule: resolution.rule,
        location: LocationSummary::from(resolution.record),
    }))
}

// ─── GET /api/time, /api/daytime, /api/sun, /api/uv ─────────────

pub async fn time(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SkyQuery>,
) -> Result<Json<ClockReading>, ApiError> {
    let start = Instant::now();
    let now = params.instant()?;
    let reading = SkyClock::new(&state.catalog).local_time(params.city(), now);
    log_request("/api/time", params.city(), &reading.time, start);
    Ok(Json(reading))
}

#[derive(Debug, Serialize)]
pub struct DaytimeResponse {
    pub daytime: bool,
}

pub async fn daytime(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SkyQuery>,
) -> Result<Json<DaytimeResponse>, ApiError> {
    let start = Instant::now();
    let now = params.instant()?;
    let daytime = SkyClock::new(&state.catalog).is_daytime(params.city(), now);
    log_request("/api/daytime", params.city(), daytime, start);
    Ok(Json(DaytimeResponse { daytime }))
}

pub async fn sun(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SkyQuery>,
) -> Result<Json<SunriseSunset>, ApiError> {
    let start = Instant::now();
    let now = params.instant()?;
    let sun = SkyClock::new(&state.catalog).sunrise_sunset(params.city(), now);
    log_request("/api/sun", params.city(), format!("{}-{}", sun.sunrise, sun.sunset), start);
    Ok(Json(sun))
}

#[derive(Debug, Serialize)]
pub struct UvResponse {
    pub uv_index: u8,
}

pub async fn uv(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SkyQuery>,
) -> Result<Json<UvResponse>, ApiError> {
    let start = Instant::now();
    let now = params.instant()?;
    let uv_index = SkyClock::new(&state.catalog).uv_index(params.city(), now, params.cloud());
    log_request("/api/uv", params.city(), uv_index, start);
    Ok(Json(UvResponse { uv_index }))
}

// ─── GET /api/report ─────────────────────────────────────────────

pub async fn report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SkyQuery>,
) -> Result<Json<SkyReport>, ApiError> {
    let start = Instant::now();
    let now = params.instant()?;
    let report = SkyClock::new(&state.catalog).report(params.city(), now, params.cloud(), params.explain);
    log_request("/api/report", params.city(), report.resolved, start);
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Catalog;
    use axum::http::Uri;

    fn state() -> State<Arc<AppState>> {
        State(Arc::new(AppState { catalog: Catalog::builtin() }))
    }

    fn sky_query(city: &str, at: Option<&str>, cloud: Option<f64>) -> Query<SkyQuery> {
        Query(SkyQuery {
            city: Some(city.to_string()),
            at: at.map(str::to_string),
            cloud: cloud.map(|c| c.to_string()),
            explain: false,
        })
    }

    #[test]
    fn test_parse_instant() {
        let t = parse_instant("2025-06-21T12:00:00+09:00").unwrap();
        assert_eq!(t.to_rfc3339(), "2025-06-21T03:00:00+00:00");
        assert!(parse_instant("yesterday").is_err());
    }

    #[tokio::test]
    async fn test_resolve_found_and_missing() {
        let Json(found) = resolve(state(), Query(ResolveQuery { query: Some("ロンドン".into()) }))
            .await
            .unwrap();
        assert_eq!(found.key, LocationKey::new("London"));
        assert_eq!(found.rule, MatchRule::ExactAlias);

        let missing = resolve(state(), Query(ResolveQuery { query: Some("Nonexistent Place".into()) }))
            .await
            .unwrap_err();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let empty = resolve(state(), Query(ResolveQuery { query: None })).await.unwrap_err();
        assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_time_with_instant() {
        let Json(reading) = time(state(), sky_query("Tokyo", Some("2025-06-21T03:00:00Z"), None))
            .await
            .unwrap();
        assert_eq!(reading.time, "12:00");
        assert_eq!(reading.offset_label, "UTC+9");
    }

    #[tokio::test]
    async fn test_bad_instant_is_bad_request() {
        let err = uv(state(), sky_query("Tokyo", Some("not-a-time"), None)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unresolved_city_gets_defaults() {
        let Json(u) = uv(state(), sky_query("Atlantis", Some("2025-06-21T03:00:00Z"), None))
            .await
            .unwrap();
        assert_eq!(u.uv_index, 5);

        let Json(d) = daytime(state(), sky_query("Atlantis", None, None)).await.unwrap();
        assert!(d.daytime);

        let Json(s) = sun(state(), sky_query("Atlantis", None, None)).await.unwrap();
        assert_eq!(s, SunriseSunset::default());
    }

    #[tokio::test]
    async fn test_unusable_cloud_falls_back_to_default() {
        let at = "2025-06-21T03:00:00Z";
        let Json(default) = uv(state(), sky_query("Tokyo", Some(at), None)).await.unwrap();
        assert_eq!(default.uv_index, 7);

        for raw in ["/api/uv?city=Tokyo&cloud=&at=2025-06-21T03:00:00Z",
                    "/api/uv?city=Tokyo&cloud=cloudy&at=2025-06-21T03:00:00Z"] {
            let uri: Uri = raw.parse().unwrap();
            let params = Query::<SkyQuery>::try_from_uri(&uri).unwrap();
            let Json(u) = uv(state(), params).await.unwrap();
            assert_eq!(u.uv_index, default.uv_index, "{}", raw);
        }

        let clear: Uri = "/api/uv?city=Tokyo&cloud=0&at=2025-06-21T03:00:00Z".parse().unwrap();
        let Json(u) = uv(state(), Query::<SkyQuery>::try_from_uri(&clear).unwrap()).await.unwrap();
        assert!(u.uv_index > default.uv_index);
    }

    #[tokio::test]
    async fn test_report_and_locations() {
        let Json(r) = report(state(), sky_query("Dubai", Some("2025-01-10T08:00:00Z"), Some(0.0)))
            .await
            .unwrap();
        assert!(r.resolved);
        assert_eq!(r.clock.time, "12:00");

        let Json(list) = locations(state()).await;
        assert_eq!(list.len(), 15);
    }
}
