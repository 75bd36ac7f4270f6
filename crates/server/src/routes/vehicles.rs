use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::types::Envelope;
use models::{vehicle::to_wire, VehicleJson};
use tracing::{error, info, warn};

use crate::errors::JsonApiError;
use crate::startup::AppState;

type VehiclesBody = Json<Envelope<BTreeMap<i64, VehicleJson>>>;

#[utoipa::path(
    get, path = "/vehicles", tag = "vehicles",
    responses(
        (status = 200, description = "All vehicles keyed by id"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn list_vehicles(State(state): State<AppState>) -> Result<VehiclesBody, JsonApiError> {
    match state.vehicles.find_all().await {
        Ok(all) => Ok(Json(Envelope::success(to_wire(&all)))),
        Err(e) => {
            error!(error = %e, "list vehicles failed");
            Err(JsonApiError::internal())
        }
    }
}

#[utoipa::path(
    post, path = "/vehicles", tag = "vehicles",
    request_body = crate::openapi::VehicleJsonDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Malformed body"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Envelope<VehicleJson>>), JsonApiError> {
    // must be a JSON object before it is read as a vehicle
    let object = match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(value @ serde_json::Value::Object(_)) => value,
        Ok(_) | Err(_) => return Err(JsonApiError::bad_request("invalid request body")),
    };
    let wire: VehicleJson = serde_json::from_value(object).map_err(|e| {
        warn!(error = %e, "vehicle body does not match wire shape");
        JsonApiError::bad_request("invalid request body")
    })?;

    // client-supplied id is dropped here
    let created = state.vehicles.add_vehicle(wire.into_attributes()).await.map_err(|e| {
        error!(error = %e, "add vehicle failed");
        JsonApiError::internal()
    })?;
    info!(id = created.id, "vehicle created");

    Ok((StatusCode::CREATED, Json(Envelope::success(VehicleJson::from(&created)))))
}

#[utoipa::path(
    get, path = "/vehicles/color/{color}/year/{year}", tag = "vehicles",
    params(
        ("color" = String, Path, description = "Exact color, case-sensitive"),
        ("year" = i32, Path, description = "Fabrication year")
    ),
    responses(
        (status = 200, description = "Matching vehicles keyed by id, possibly empty"),
        (status = 400, description = "Year is not an integer"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn vehicles_by_color_and_year(
    State(state): State<AppState>,
    Path((color, year)): Path<(String, String)>,
) -> Result<VehiclesBody, JsonApiError> {
    let year: i32 = year
        .parse()
        .map_err(|_| JsonApiError::bad_request("invalid year"))?;

    match state.vehicles.get_by_color_and_year(&color, year).await {
        Ok(matched) => Ok(Json(Envelope::success(to_wire(&matched)))),
        Err(e) => {
            error!(error = %e, %color, year, "filter vehicles failed");
            Err(JsonApiError::internal())
        }
    }
}
