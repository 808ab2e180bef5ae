//! Units of a property and the meters, leases and payments attached to them.

use api_types::{
    Created,
    lease::{LeaseNew, PaymentNew},
    meter::{MeterNew, MeterReadingNew},
    unit::{UnitView, UnitsResponse},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::MoneyCents;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub async fn units(
    State(state): State<ServerState>,
    Path(property_id): Path<Uuid>,
) -> Result<Json<UnitsResponse>, ServerError> {
    let units = state
        .engine
        .units(property_id)
        .await?
        .into_iter()
        .map(|unit| UnitView {
            id: unit.id,
            label: unit.label,
            area_sqm: unit.area_sqm,
        })
        .collect();
    Ok(Json(UnitsResponse { units }))
}

pub async fn add_meter(
    State(state): State<ServerState>,
    Path(unit_id): Path<Uuid>,
    Json(payload): Json<MeterNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state.engine.add_meter(unit_id, &payload.kind_label).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn add_reading(
    State(state): State<ServerState>,
    Path(meter_id): Path<Uuid>,
    Json(payload): Json<MeterReadingNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .add_meter_reading(meter_id, payload.read_date, payload.value)
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn new_lease(
    State(state): State<ServerState>,
    Path(unit_id): Path<Uuid>,
    Json(payload): Json<LeaseNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .new_lease(
            unit_id,
            payload.tenant_name,
            payload.start_date,
            payload.end_date,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn add_payment(
    State(state): State<ServerState>,
    Path(lease_id): Path<Uuid>,
    Json(payload): Json<PaymentNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .add_payment(
            lease_id,
            payload.pay_date,
            MoneyCents::new(payload.amount_minor),
            &payload.category,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}
