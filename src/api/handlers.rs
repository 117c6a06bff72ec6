//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use tracing::{info, warn};

use super::AppState;
use super::types::{AddDeviceRequest, ErrorResponse, StatusResponse, SummaryQuery};
use crate::clock::Clock;
use crate::cost::Tariff;
use crate::devices::{Device, DeviceId, DeviceSpec, DeviceStatus};
use crate::error::RegistryError;
use crate::io::export::to_csv_string;
use crate::registry::{DeviceRegistry, UndoOutcome};
use crate::report::{DeviceReading, EnergyReport};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

fn registry_error(e: RegistryError) -> ApiError {
    let status = match e {
        RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
        RegistryError::NothingToUndo => StatusCode::CONFLICT,
    };
    api_error(status, e)
}

/// Lists every device in registry order.
///
/// `GET /devices` → 200 + `Vec<DeviceReading>` JSON
pub async fn list_devices(State(state): State<Arc<AppState>>) -> Json<Vec<DeviceReading>> {
    let now = state.clock.now();
    let registry = state.registry.lock();
    Json(
        registry
            .devices()
            .iter()
            .map(|e| DeviceReading::capture(e, now))
            .collect(),
    )
}

/// Registers a new device, initially OFF.
///
/// `POST /devices` → 201 + `DeviceReading` JSON
/// Empty name, non-positive or non-numeric wattage, missing field or
/// malformed body → 400 + `ErrorResponse`
pub async fn add_device(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddDeviceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DeviceReading>), ApiError> {
    let Json(req) = payload.map_err(|e| {
        warn!(error = %e.body_text(), "device body rejected");
        api_error(StatusCode::BAD_REQUEST, e.body_text())
    })?;
    let spec = DeviceSpec::new(&req.name, req.wattage_w).map_err(|e| {
        warn!(%e, "device rejected");
        api_error(StatusCode::BAD_REQUEST, e)
    })?;

    let now = state.clock.now();
    let mut registry = state.registry.lock();
    let id = registry.add_device(Device::from_spec(spec));
    let reading = registry
        .devices()
        .iter()
        .find(|e| e.id() == id)
        .map(|e| DeviceReading::capture(e, now))
        .ok_or_else(|| registry_error(RegistryError::NotFound(id)))?;
    Ok((StatusCode::CREATED, Json(reading)))
}

/// `POST /devices/{id}/start` → 200 + `StatusResponse`, 404 if absent
pub async fn start_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<DeviceId>,
) -> Result<Json<StatusResponse>, ApiError> {
    transition(&state, id, |r, clock| r.start(id, clock))
}

/// `POST /devices/{id}/stop` → 200 + `StatusResponse`, 404 if absent
pub async fn stop_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<DeviceId>,
) -> Result<Json<StatusResponse>, ApiError> {
    transition(&state, id, |r, clock| r.stop(id, clock))
}

/// `POST /devices/{id}/toggle` → 200 + `StatusResponse`, 404 if absent
pub async fn toggle_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<DeviceId>,
) -> Result<Json<StatusResponse>, ApiError> {
    transition(&state, id, |r, clock| r.toggle(id, clock))
}

fn transition(
    state: &AppState,
    id: DeviceId,
    apply: impl FnOnce(&mut DeviceRegistry, &dyn Clock) -> Result<DeviceStatus, RegistryError>,
) -> Result<Json<StatusResponse>, ApiError> {
    let status = state
        .registry
        .with(|r| apply(r, state.clock.as_ref()))
        .map_err(registry_error)?;
    Ok(Json(StatusResponse { id, status }))
}

/// Stops the device, then removes it. The removal can be undone.
///
/// `DELETE /devices/{id}` → 204, 404 if absent
pub async fn remove_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<DeviceId>,
) -> Result<StatusCode, ApiError> {
    state
        .registry
        .with(|r| r.retire_device(id, state.clock.as_ref()))
        .map_err(registry_error)?;
    info!(%id, "device removed via API");
    Ok(StatusCode::NO_CONTENT)
}

/// Reverts the most recent add or removal.
///
/// `POST /undo` → 200 + `UndoOutcome` JSON
/// Empty undo log → 409 + `ErrorResponse`
pub async fn undo(State(state): State<Arc<AppState>>) -> Result<Json<UndoOutcome>, ApiError> {
    state
        .registry
        .with(DeviceRegistry::undo)
        .map(Json)
        .map_err(registry_error)
}

/// Totals and estimated cost at the current instant.
///
/// `GET /summary` → 200 + `EnergyReport` at the configured tariff
/// `GET /summary?rate=2000` → priced at 2000 per kWh
/// `GET /summary?rate=abc` → 400 + `ErrorResponse`
pub async fn summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<EnergyReport>, ApiError> {
    let tariff = match query.rate.as_deref() {
        Some(raw) => Tariff::parse(raw).map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?,
        None => state.tariff,
    };
    Ok(Json(snapshot(&state, tariff)))
}

/// Current readings as CSV, same layout as the file export.
///
/// `GET /export` → 200 + `text/csv` body
pub async fn export(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let report = snapshot(&state, state.tariff);
    let body = to_csv_string(&report.devices)
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], body))
}

fn snapshot(state: &AppState, tariff: Tariff) -> EnergyReport {
    let now = state.clock.now();
    EnergyReport::capture(&state.registry.lock(), now, tariff)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::clock::ManualClock;
    use crate::config::TrackerConfig;
    use crate::registry::SharedRegistry;

    fn make_test_state() -> (Arc<AppState>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let registry = TrackerConfig::household().build_registry();
        let state = Arc::new(AppState::new(
            SharedRegistry::new(registry),
            clock.clone(),
            Tariff::default(),
        ));
        (state, clock)
    }

    fn request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn devices_lists_registry_in_order() {
        let (state, _) = make_test_state();
        let resp = router(state).oneshot(request("GET", "/devices")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = json_body(resp).await;
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|d| d["name"].as_str())
            .collect();
        assert_eq!(names, ["Lamp", "Fan", "Refrigerator", "Television"]);
        assert_eq!(json[0]["status"], "OFF");
    }

    #[tokio::test]
    async fn add_device_returns_201() {
        let (state, _) = make_test_state();
        let req = Request::builder()
            .method("POST")
            .uri("/devices")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"Kettle","wattage_w":2000}"#))
            .unwrap();
        let resp = router(state.clone()).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        let json = json_body(resp).await;
        assert_eq!(json["name"], "Kettle");
        assert_eq!(json["status"], "OFF");
        assert_eq!(state.registry.lock().len(), 5);
    }

    #[tokio::test]
    async fn add_device_with_zero_wattage_returns_400() {
        let (state, _) = make_test_state();
        let req = Request::builder()
            .method("POST")
            .uri("/devices")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"Ghost","wattage_w":0}"#))
            .unwrap();
        let resp = router(state.clone()).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(resp).await.get("error").is_some());
        assert_eq!(state.registry.lock().len(), 4);
    }

    async fn post_device(state: Arc<AppState>, body: &'static str) -> axum::response::Response {
        let req = Request::builder()
            .method("POST")
            .uri("/devices")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        router(state).oneshot(req).await.unwrap()
    }

    #[tokio::test]
    async fn add_device_with_non_numeric_wattage_returns_400() {
        let (state, _) = make_test_state();
        for body in [
            r#"{"name":"Lamp","wattage_w":"ten"}"#,
            r#"{"name":"Lamp"}"#,
            r#"{"wattage_w":10}"#,
            "not json",
        ] {
            let resp = post_device(state.clone(), body).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
            assert!(json_body(resp).await.get("error").is_some(), "body: {body}");
        }
        assert_eq!(state.registry.lock().len(), 4);
    }

    #[tokio::test]
    async fn toggle_then_summary_prices_energy() {
        let (state, clock) = make_test_state();
        let resp = router(state.clone())
            .oneshot(request("POST", "/devices/0/toggle"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["status"], "ON");

        clock.advance_secs(3600);
        let resp = router(state).oneshot(request("GET", "/summary")).await.unwrap();
        let json = json_body(resp).await;
        assert_eq!(json["total_energy_wh"], 10.0);
        let cost = json["estimated_cost"].as_f64().unwrap_or_default();
        assert!((cost - 15.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn summary_rate_override() {
        let (state, clock) = make_test_state();
        state.registry.with(|r| r.start(DeviceId::from_raw(0), clock.as_ref())).ok();
        clock.advance_secs(3600);

        let resp = router(state)
            .oneshot(request("GET", "/summary?rate=2000"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = json_body(resp).await;
        assert_eq!(json["rate_per_kwh"], 2000.0);
        let cost = json["estimated_cost"].as_f64().unwrap_or_default();
        assert!((cost - 20.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn summary_invalid_rate_returns_400() {
        let (state, _) = make_test_state();
        let resp = router(state)
            .oneshot(request("GET", "/summary?rate=abc"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(resp).await.get("error").is_some());
    }

    #[tokio::test]
    async fn start_unknown_device_returns_404() {
        let (state, _) = make_test_state();
        let resp = router(state)
            .oneshot(request("POST", "/devices/99/start"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_stops_device_and_undo_restores_it() {
        let (state, clock) = make_test_state();
        let app = router(state.clone());

        app.clone()
            .oneshot(request("POST", "/devices/1/start"))
            .await
            .unwrap();
        clock.advance_secs(30);

        let resp = app
            .clone()
            .oneshot(request("DELETE", "/devices/1"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(state.registry.lock().len(), 3);

        let resp = app
            .clone()
            .oneshot(request("DELETE", "/devices/1"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = app.oneshot(request("POST", "/undo")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = json_body(resp).await;
        assert_eq!(json["reverted"], "remove");
        assert_eq!(json["id"], 1);

        clock.advance_secs(100);
        let registry = state.registry.lock();
        let fan = registry.get(DeviceId::from_raw(1));
        assert_eq!(fan.map(|d| d.status()), Some(DeviceStatus::Off));
        assert_eq!(fan.map(|d| d.accumulated_seconds()), Some(30.0));
    }

    #[tokio::test]
    async fn undo_with_empty_log_returns_409() {
        let clock = Arc::new(ManualClock::new());
        let state = Arc::new(AppState::new(
            SharedRegistry::default(),
            clock,
            Tariff::default(),
        ));
        let resp = router(state).oneshot(request("POST", "/undo")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn export_returns_csv() {
        let (state, _) = make_test_state();
        let resp = router(state).oneshot(request("GET", "/export")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("text/csv")
        );
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("device,wattage_w,status,running_s,energy_wh"));
        assert_eq!(lines.count(), 4);
    }
}
