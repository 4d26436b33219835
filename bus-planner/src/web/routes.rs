//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{Local, NaiveDateTime};
use tracing::{error, warn};

use crate::domain::{NetworkKind, StopId, natural_cmp};
use crate::network::{Network, Terminal};
use crate::planner::{JourneyPlanner, PlanError};
use crate::source::FetchError;
use crate::timetable::{StopTimetable, TimetableError, aggregate_for};

use super::dto::*;
use super::state::AppState;

/// Format of the optional `at` query parameter.
const AT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/lines", get(list_lines))
        .route("/api/stops/:id/lines", get(stop_lines))
        .route("/api/stops/:id/timetable", get(stop_timetable))
        .route("/api/terminals", get(list_terminals))
        .route("/api/route", get(find_route))
        .route("/api/journey", get(plan_journey))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Every line of both networks.
async fn list_lines(State(state): State<AppState>) -> Json<LinesResponse> {
    let listing = |kind: NetworkKind| {
        let mut lines: Vec<LineSummary> = state
            .network
            .lines(kind)
            .iter()
            .map(LineSummary::from_line)
            .collect();
        lines.sort_by(|a, b| natural_cmp(&a.number, &b.number));
        lines
    };

    Json(LinesResponse {
        urban: listing(NetworkKind::Urban),
        metropolitan: listing(NetworkKind::Metropolitan),
    })
}

/// Lines serving a stop.
async fn stop_lines(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StopLinesResponse>, AppError> {
    let stop = known_stop(&state.network, &id)?;

    Ok(Json(StopLinesResponse {
        stop: StopView::lookup(&state.network, stop),
        lines: state.network.serving_lines().at(stop).to_vec(),
    }))
}

/// Decoded timetable of a stop.
async fn stop_timetable(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(req): Query<TimeQuery>,
) -> Result<Json<StopTimetable>, AppError> {
    let stop = known_stop(&state.network, &id)?;
    let now = request_time(req.at.as_deref())?;

    let blocks = state.timetables.get(stop).await?;
    let timetable = aggregate_for(stop, &blocks, &state.network, now)?;

    Ok(Json(timetable))
}

/// Terminal clusters.
async fn list_terminals(State(state): State<AppState>) -> Json<Vec<Terminal>> {
    Json(state.network.terminals().to_vec())
}

/// Fewest-hops route between two stops.
async fn find_route(
    State(state): State<AppState>,
    Query(req): Query<TripQuery>,
) -> Result<Json<RouteResponse>, AppError> {
    let from = known_stop(&state.network, &req.from)?;
    let to = known_stop(&state.network, &req.to)?;

    let route = state.network.find_route(from, to);
    if route.is_empty() {
        return Err(AppError::Unprocessable {
            message: format!("No route from {from} to {to}"),
        });
    }

    Ok(Json(RouteResponse::from_route(&state.network, &route)))
}

/// Plan a journey leaving at the requested time.
async fn plan_journey(
    State(state): State<AppState>,
    Query(req): Query<TripQuery>,
) -> Result<Json<JourneyResponse>, AppError> {
    let from = parse_stop(&req.from)?;
    let to = parse_stop(&req.to)?;
    let now = request_time(req.at.as_deref())?;

    let planner = JourneyPlanner::new(&state.network, state.timetables.as_ref(), &state.config);
    let plan = planner.plan(from, to, now).await?;

    Ok(Json(JourneyResponse::from_plan(&state.network, &plan)))
}

fn parse_stop(raw: &str) -> Result<StopId, AppError> {
    raw.parse().map_err(|_| AppError::BadRequest {
        message: format!("Invalid stop id: {raw}"),
    })
}

fn known_stop(network: &Network, raw: &str) -> Result<StopId, AppError> {
    let stop = parse_stop(raw)?;
    if network.stop(stop).is_none() {
        return Err(AppError::NotFound {
            message: format!("Unknown stop: {stop}"),
        });
    }
    Ok(stop)
}

/// The `at` parameter, or the current local time.
fn request_time(at: Option<&str>) -> Result<NaiveDateTime, AppError> {
    match at {
        Some(raw) => NaiveDateTime::parse_from_str(raw, AT_FORMAT).map_err(|_| AppError::BadRequest {
            message: format!("Invalid time {raw:?}, expected YYYY-MM-DDTHH:MM"),
        }),
        None => Ok(Local::now().naive_local()),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unprocessable { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::NotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::BadGateway {
                message: e.to_string(),
            },
        }
    }
}

impl From<TimetableError> for AppError {
    fn from(e: TimetableError) -> Self {
        match e {
            TimetableError::UnknownStop(_) => AppError::NotFound {
                message: e.to_string(),
            },
            TimetableError::MissingStop => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        let message = e.to_string();
        match e {
            PlanError::UnknownStop(_) => AppError::NotFound { message },
            PlanError::SameStop(_) => AppError::BadRequest { message },
            PlanError::Unreachable { .. } | PlanError::Unresolved(_) => {
                AppError::Unprocessable { message }
            }
            PlanError::Fetch { .. } => AppError::BadGateway { message },
            PlanError::Timetable(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unprocessable { message } => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, CachedTimetables};
    use crate::domain::schedule::encode;
    use crate::domain::{DayBucket, LineId, test_line};
    use crate::network::test_network;
    use crate::planner::PlannerConfig;
    use crate::source::{DirectorySource, TimetableBackend};

    const MONDAY_8AM: &str = "2024-06-03T08:00";

    /// Line 7 runs A(1) -> B(2) -> C(3); line 10 runs D(4) -> E(5).
    fn state(dir: &std::path::Path) -> AppState {
        let network = test_network(
            &[(1, "A"), (2, "B"), (3, "C"), (4, "D"), (5, "E")],
            vec![test_line(7, "7", &[1, 2, 3]), test_line(8, "10", &[4, 5])],
        );
        let timetables = CachedTimetables::new(
            TimetableBackend::Directory(DirectorySource::new(dir)),
            &CacheConfig::default(),
        );
        AppState::new(network, timetables, PlannerConfig::default())
    }

    fn write_timetable(dir: &std::path::Path, stop: u64, line: u64, times: &[(u8, u8)]) {
        let codes: Vec<String> = times
            .iter()
            .map(|&(h, m)| encode(DayBucket::WEEKDAYS, h, m).to_string())
            .collect();
        std::fs::write(
            dir.join(format!("{stop}.json")),
            format!(r#"[{{"lineId":{line},"times":[{}]}}]"#, codes.join(",")),
        )
        .unwrap();
    }

    fn trip(from: &str, to: &str) -> Query<TripQuery> {
        Query(TripQuery {
            from: from.to_string(),
            to: to.to_string(),
            at: Some(MONDAY_8AM.to_string()),
        })
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn lines_are_listed_naturally() {
        let dir = tempfile::tempdir().unwrap();
        let Json(resp) = list_lines(State(state(dir.path()))).await;

        let numbers: Vec<&str> = resp.urban.iter().map(|l| l.number.as_str()).collect();
        assert_eq!(numbers, vec!["7", "10"]);
        assert!(resp.metropolitan.is_empty());
        assert_eq!(resp.urban[0].stops, vec![StopId(1), StopId(2), StopId(3)]);
    }

    #[tokio::test]
    async fn serving_lines_for_stop() {
        let dir = tempfile::tempdir().unwrap();
        let Json(resp) = stop_lines(State(state(dir.path())), Path("2".to_string()))
            .await
            .unwrap();

        assert_eq!(resp.stop.name, "B");
        assert_eq!(resp.lines.len(), 1);
        assert_eq!(resp.lines[0].line, LineId(7));
    }

    #[tokio::test]
    async fn unknown_and_invalid_stops() {
        let dir = tempfile::tempdir().unwrap();
        let err = stop_lines(State(state(dir.path())), Path("99".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let err = stop_lines(State(state(dir.path())), Path("abc".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn timetable_for_stop() {
        let dir = tempfile::tempdir().unwrap();
        write_timetable(dir.path(), 1, 7, &[(7, 50), (8, 10)]);

        let Json(tt) = stop_timetable(
            State(state(dir.path())),
            Path("1".to_string()),
            Query(TimeQuery {
                at: Some(MONDAY_8AM.to_string()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(tt.current.len(), 2);
        assert!(!tt.current[0].future);
        assert!(tt.current[1].future);
        assert_eq!(tt.first_future_occurrence, Some(8 * 60 + 10));
    }

    #[tokio::test]
    async fn missing_timetable_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = stop_timetable(
            State(state(dir.path())),
            Path("2".to_string()),
            Query(TimeQuery { at: None }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn bad_time_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = stop_timetable(
            State(state(dir.path())),
            Path("1".to_string()),
            Query(TimeQuery {
                at: Some("tomorrow".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn route_between_stops() {
        let dir = tempfile::tempdir().unwrap();
        let Json(resp) = find_route(State(state(dir.path())), trip("1", "3"))
            .await
            .unwrap();

        let ids: Vec<StopId> = resp.stops.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![StopId(1), StopId(2), StopId(3)]);
        assert_eq!(resp.hops, 2);
        assert_eq!(resp.edges.len(), 2);
        assert_eq!(resp.minutes, 0);
    }

    #[tokio::test]
    async fn unreachable_route_is_unprocessable() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_route(State(state(dir.path())), trip("1", "4"))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn journey_on_one_line() {
        let dir = tempfile::tempdir().unwrap();
        write_timetable(dir.path(), 1, 7, &[(8, 10)]);
        write_timetable(dir.path(), 2, 7, &[(8, 20)]);
        write_timetable(dir.path(), 3, 7, &[(8, 30)]);

        let Json(resp) = plan_journey(State(state(dir.path())), trip("1", "3"))
            .await
            .unwrap();

        assert_eq!(resp.legs.len(), 2);
        assert_eq!(resp.transfers, 0);
        assert_eq!(resp.legs[0].from_name, "A");
        assert_eq!(resp.legs[1].to_name, "C");
        assert_eq!(resp.departure.as_deref(), Some("08:10"));
        assert_eq!(resp.arrival, "08:30");
    }

    #[tokio::test]
    async fn journey_without_timetables_is_bad_gateway() {
        let dir = tempfile::tempdir().unwrap();
        let err = plan_journey(State(state(dir.path())), trip("1", "3"))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn journey_errors_map_to_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let status = |r: Result<Json<JourneyResponse>, AppError>| r.unwrap_err().into_response().status();

        assert_eq!(
            status(plan_journey(State(state(dir.path())), trip("1", "99")).await),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(plan_journey(State(state(dir.path())), trip("1", "1")).await),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(plan_journey(State(state(dir.path())), trip("1", "4")).await),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status(plan_journey(State(state(dir.path())), trip("x", "4")).await),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn request_time_parses_local_minutes() {
        let at = request_time(Some(MONDAY_8AM)).unwrap();
        assert_eq!(at.format(AT_FORMAT).to_string(), MONDAY_8AM);
    }
}
