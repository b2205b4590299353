//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domain::{Category, InvalidCategory, LineRecord, StationId};
use crate::idfm::{StationRecord, TransitError};
use crate::resolver::ResolveError;

use super::dto::*;
use super::state::AppState;

/// Default number of results of a line search.
const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search/lines", get(search_lines))
        .route("/lines/:category", get(list_lines))
        .route("/lines/:category/:name", get(line_info))
        .route("/line/:id", get(line_by_id))
        .route("/line/:id/stations", get(line_by_id_stations))
        .route("/line/:id/schedules", get(line_by_id_schedules))
        .route("/stations/:category/:name", get(line_stations))
        .route("/stations/:category/:name/resolve", get(resolve_station))
        .route("/schedules/:category/:name", get(line_schedules))
        .route("/realtime/:category/:name/:station", get(real_time))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Every line of a category.
async fn list_lines(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<LineListResponse>, AppError> {
    let category: Category = category.parse()?;

    let lines = state
        .tables()
        .lines(category)
        .into_iter()
        .map(|(id, record)| LineResult::from_record(category, id, record))
        .collect();

    Ok(Json(LineListResponse { category, lines }))
}

/// Resolved id and metadata of one line.
async fn line_info(
    State(state): State<AppState>,
    Path((category, name)): Path<(String, String)>,
) -> Result<Json<LineResult>, AppError> {
    let category: Category = category.parse()?;
    let line_id = state.resolver.resolve_line(category, &name)?;

    let record = state
        .tables()
        .catalog(category)
        .get(line_id)
        .ok_or_else(|| AppError::Internal {
            message: format!("line {line_id} is in the conversion table but not in the catalog"),
        })?;

    Ok(Json(LineResult::from_record(category, line_id, record)))
}

/// Metadata of a line given by opaque id.
async fn line_by_id(
    State(state): State<AppState>,
    Path(line_id): Path<String>,
) -> Result<Json<LineResult>, AppError> {
    let (category, record) = known_line(&state, &line_id)?;
    Ok(Json(LineResult::from_record(category, &line_id, record)))
}

/// Live stop list of a line given by opaque id.
async fn line_by_id_stations(
    State(state): State<AppState>,
    Path(line_id): Path<String>,
) -> Result<Json<Vec<StationRecord>>, AppError> {
    known_line(&state, &line_id)?;

    let stations = state.transit().get_stations(&line_id, false, false).await?;
    Ok(Json(stations))
}

/// Today's schedules of a line given by opaque id.
async fn line_by_id_schedules(
    State(state): State<AppState>,
    Path(line_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    known_line(&state, &line_id)?;

    let schedules = state
        .transit()
        .get_schedules(&line_id, None, true, false)
        .await?;
    Ok(Json(schedules))
}

/// Look up an ingested line by id, so unknown ids never reach upstream.
fn known_line<'a>(
    state: &'a AppState,
    line_id: &str,
) -> Result<(Category, &'a LineRecord), AppError> {
    state
        .tables()
        .line(line_id)
        .ok_or_else(|| AppError::NotFound {
            message: format!("unknown line id '{line_id}'"),
        })
}

/// Lines whose name contains the query.
async fn search_lines(
    State(state): State<AppState>,
    Query(req): Query<LineSearchRequest>,
) -> Json<LineSearchResponse> {
    let limit = req.limit.unwrap_or(DEFAULT_SEARCH_LIMIT).min(50);

    let lines = state
        .tables()
        .search(&req.q, limit)
        .iter()
        .map(LineResult::from_match)
        .collect();

    Json(LineSearchResponse { lines })
}

/// Live stop list of a line.
async fn line_stations(
    State(state): State<AppState>,
    Path((category, name)): Path<(String, String)>,
) -> Result<Json<Vec<StationRecord>>, AppError> {
    let category: Category = category.parse()?;
    let line_id = state.resolver.resolve_line(category, &name)?;

    let stations = state.transit().get_stations(line_id, false, false).await?;
    Ok(Json(stations))
}

/// Station of a line matching a free-text name.
async fn resolve_station(
    State(state): State<AppState>,
    Path((category, name)): Path<(String, String)>,
    Query(req): Query<StationResolveRequest>,
) -> Result<Json<StationMatchResult>, AppError> {
    let category: Category = category.parse()?;

    let found = state
        .resolver
        .resolve_station(category, &name, &req.q)
        .await?;
    Ok(Json(found.into()))
}

/// Today's schedules of a line, optionally at one station.
async fn line_schedules(
    State(state): State<AppState>,
    Path((category, name)): Path<(String, String)>,
    Query(req): Query<SchedulesRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let category: Category = category.parse()?;
    let line_id = state.resolver.resolve_line(category, &name)?;

    let station: Option<StationId> = match req.station.as_deref() {
        Some(query) => Some(
            state
                .resolver
                .resolve_station(category, &name, query)
                .await?
                .station_id,
        ),
        None => None,
    };

    let schedules = state
        .transit()
        .get_schedules(
            line_id,
            station.as_ref(),
            req.realtime.unwrap_or(true),
            req.complete.unwrap_or(false),
        )
        .await?;

    Ok(Json(schedules))
}

/// Real-time passages of a line at a station given by name.
async fn real_time(
    State(state): State<AppState>,
    Path((category, name, station)): Path<(String, String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let category: Category = category.parse()?;
    let line_id = state.resolver.resolve_line(category, &name)?;

    let found = state
        .resolver
        .resolve_station(category, &name, &station)
        .await?;

    let passages = state
        .transit()
        .get_real_time(line_id, &found.station_id)
        .await?;

    Ok(Json(passages))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Upstream { message: String },
    Internal { message: String },
}

impl From<InvalidCategory> for AppError {
    fn from(e: InvalidCategory) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<TransitError> for AppError {
    fn from(e: TransitError) -> Self {
        match e {
            // Ids come from the tables and upstream, so only the host can be wrong
            TransitError::InvalidUrl { .. } => AppError::Internal {
                message: e.to_string(),
            },
            _ => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::UnknownLine { .. } | ResolveError::StationNotFound { .. } => {
                AppError::NotFound {
                    message: e.to_string(),
                }
            }
            ResolveError::Transit(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            warn!(%status, %message, "request failed");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::idfm::{TransitClient, TransitConfig};
    use crate::resolver::{Resolver, ResolverConfig};
    use crate::tables::build_tables;
    use crate::tables::test_support::entry;
    use mockito::{Matcher, mock};

    fn state() -> AppState {
        // Nothing listens on the discard port
        state_with(TransitConfig::new("127.0.0.1:9").with_timeout(1))
    }

    /// State whose transit client talks to the mock upstream server.
    fn mock_state() -> AppState {
        state_with(TransitConfig::new(mockito::server_address().to_string()))
    }

    fn state_with(config: TransitConfig) -> AppState {
        let tables = build_tables(&[
            entry("4", "C01374", "metro"),
            entry("1", "C01371", "metro"),
            entry("RER B", "C01743", "rail"),
            entry("7", "C07004", "metro"),
            entry("8", "C07005", "metro"),
            entry("T9", "C07006", "tram"),
        ])
        .unwrap();
        let transit = TransitClient::new(config.with_scheme("http")).unwrap();

        AppState::new(Resolver::new(
            Arc::new(tables),
            transit,
            ResolverConfig::default(),
        ))
    }

    #[tokio::test]
    async fn list_lines_of_category() {
        let Json(response) = list_lines(State(state()), Path("metro".to_string()))
            .await
            .unwrap();

        assert_eq!(response.category, Category::Metro);
        let names: Vec<_> = response.lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["1", "4", "7", "8"]);
    }

    #[tokio::test]
    async fn invalid_category_is_bad_request() {
        let err = list_lines(State(state()), Path("noctilien".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn line_info_resolves_id() {
        let Json(line) = line_info(
            State(state()),
            Path(("metro".to_string(), "4".to_string())),
        )
        .await
        .unwrap();

        assert_eq!(line.line_id, "C01374");
        assert_eq!(line.operator_name.as_deref(), Some("RATP"));
    }

    #[tokio::test]
    async fn unknown_line_is_not_found() {
        let err = line_info(
            State(state()),
            Path(("metro".to_string(), "42".to_string())),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn search_lines_by_name() {
        let Json(response) = search_lines(
            State(state()),
            Query(LineSearchRequest {
                q: "rer".to_string(),
                limit: None,
            }),
        )
        .await;

        assert_eq!(response.lines.len(), 1);
        assert_eq!(response.lines[0].line_id, "C01743");
    }

    #[tokio::test]
    async fn unreachable_upstream_is_bad_gateway() {
        let err = line_stations(
            State(state()),
            Path(("metro".to_string(), "4".to_string())),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn resolve_errors_map_to_statuses() {
        let err: AppError = ResolveError::StationNotFound {
            category: Category::Metro,
            line: "4".into(),
            query: "Nowhere".into(),
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let err: AppError = ResolveError::Transit(TransitError::Format {
            message: "expected value".into(),
            body: None,
        })
        .into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn invalid_url_is_internal_error() {
        let err: AppError = TransitError::InvalidUrl {
            message: "https://bad host/lines".into(),
        }
        .into();
        assert!(matches!(err, AppError::Internal { .. }));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn line_by_id_returns_category() {
        let Json(line) = line_by_id(State(state()), Path("C01743".to_string()))
            .await
            .unwrap();

        assert_eq!(line.category, Category::Train);
        assert_eq!(line.name, "RER B");
        assert_eq!(line.line_id, "C01743");
    }

    #[tokio::test]
    async fn unknown_line_id_is_not_found() {
        let err = line_by_id_schedules(State(state()), Path("C99999".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn line_by_id_schedules_pass_through() {
        let schedules = mock(
            "GET",
            Matcher::Regex(r"^/lines/line:IDFM:C07006/schedules".to_string()),
        )
        .with_status(200)
        .with_body(r#"{"schedules": [{"departure": "05:30"}]}"#)
        .create();

        let Json(value) = line_by_id_schedules(State(mock_state()), Path("C07006".to_string()))
            .await
            .unwrap();

        schedules.assert();
        assert_eq!(value["schedules"][0]["departure"], "05:30");
    }

    #[tokio::test]
    async fn schedules_at_resolved_station() {
        let stops = mock(
            "GET",
            Matcher::Regex(r"^/lines/line:IDFM:C07004/stops(\?.*)?$".to_string()),
        )
        .with_status(200)
        .with_body(
            r#"[
                {"id": "stop_area:IDFM:71264", "name": "Châtelet"},
                {"id": "stop_area:IDFM:73626", "name": "Gare de l'Est"}
            ]"#,
        )
        .create();
        let station_schedules = mock(
            "GET",
            Matcher::Regex(
                r"^/lines/line:IDFM:C07004/stops/stop_area:IDFM:73626/schedules".to_string(),
            ),
        )
        .with_status(200)
        .with_body(r#"{"schedules": [{"stop": "Gare de l'Est"}]}"#)
        .create();

        let Json(value) = line_schedules(
            State(mock_state()),
            Path(("metro".to_string(), "7".to_string())),
            Query(SchedulesRequest {
                station: Some("Gare de l Est".to_string()),
                realtime: None,
                complete: None,
            }),
        )
        .await
        .unwrap();

        stops.assert();
        station_schedules.assert();
        assert_eq!(value["schedules"][0]["stop"], "Gare de l'Est");
    }

    #[tokio::test]
    async fn schedules_unknown_station_is_not_found() {
        let _stops = mock(
            "GET",
            Matcher::Regex(r"^/lines/line:IDFM:C01371/stops(\?.*)?$".to_string()),
        )
        .with_status(200)
        .with_body(r#"[{"id": "stop_area:IDFM:71264", "name": "Châtelet"}]"#)
        .create();

        let err = line_schedules(
            State(mock_state()),
            Path(("metro".to_string(), "1".to_string())),
            Query(SchedulesRequest {
                station: Some("Porte Dauphine".to_string()),
                realtime: None,
                complete: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn real_time_uses_resolved_short_id() {
        let stops = mock(
            "GET",
            Matcher::Regex(r"^/lines/line:IDFM:C07005/stops(\?.*)?$".to_string()),
        )
        .with_status(200)
        .with_body(
            r#"[
                {"id": "stop_area:IDFM:71359", "name": "Cité"},
                {"id": "stop_area:IDFM:71264", "name": "Châtelet"}
            ]"#,
        )
        .create();
        let passages = mock(
            "GET",
            Matcher::Regex(
                r"^/lines/line:IDFM:C07005/stops/stop_area:IDFM:71264/schedules".to_string(),
            ),
        )
        .with_status(200)
        .with_body(r#"{"nextDepartures": {"data": [{"time": "2"}]}}"#)
        .create();

        let Json(value) = real_time(
            State(mock_state()),
            Path((
                "metro".to_string(),
                "8".to_string(),
                "Chatelet".to_string(),
            )),
        )
        .await
        .unwrap();

        stops.assert();
        passages.assert();
        assert_eq!(value["nextDepartures"]["data"][0]["time"], "2");
    }
}
