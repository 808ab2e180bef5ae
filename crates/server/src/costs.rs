//! Cost ledger endpoints.

use api_types::{
    Created,
    cost::{CostEntriesResponse, CostEntryList, CostEntryNew, CostEntryView},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{CostEntry, MoneyCents, NewCostEntry};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_entry(entry: CostEntry) -> CostEntryView {
    CostEntryView {
        id: entry.id,
        unit_id: entry.unit_id,
        date: entry.date,
        period_start: entry.period_start,
        period_end: entry.period_end,
        category_code: entry.category_code,
        amount_minor: entry.amount_gross.cents(),
        vat_rate: entry.vat_rate,
        supplier: entry.supplier,
        invoice_no: entry.invoice_no,
        description: entry.description,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Path(property_id): Path<Uuid>,
    Query(query): Query<CostEntryList>,
) -> Result<Json<CostEntriesResponse>, ServerError> {
    let entries = state
        .engine
        .list_cost_entries(property_id, query.year)
        .await?
        .into_iter()
        .map(map_entry)
        .collect();
    Ok(Json(CostEntriesResponse { entries }))
}

pub async fn create(
    State(state): State<ServerState>,
    Path(property_id): Path<Uuid>,
    Json(payload): Json<CostEntryNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let mut cmd = NewCostEntry::new(
        property_id,
        payload.date,
        payload.category_code,
        MoneyCents::new(payload.amount_minor),
    )
    .vat_rate(payload.vat_rate.unwrap_or(0.0));
    cmd.unit_id = payload.unit_id;
    cmd.period_start = payload.period_start;
    cmd.period_end = payload.period_end;
    cmd.supplier = payload.supplier;
    cmd.invoice_no = payload.invoice_no;
    cmd.description = payload.description;

    let entry = state.engine.add_cost_entry(cmd).await?;
    Ok((StatusCode::CREATED, Json(Created { id: entry.id })))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path((property_id, entry_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_cost_entry(property_id, entry_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
