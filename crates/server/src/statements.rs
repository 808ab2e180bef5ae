//! Yearly statements, active leases and settlements.

use api_types::{
    lease::{LeaseView, LeasesResponse},
    settlement::{BlockTotals, CategoryTotals, CostBlock, SettlementView},
    statement::{DetailRowView, StatementView, UnitTotal},
};
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, to_minor};

fn map_totals(totals: engine::BlockTotals) -> BlockTotals {
    BlockTotals {
        net_minor: to_minor(totals.net),
        vat_minor: to_minor(totals.vat),
        gross_minor: to_minor(totals.gross),
    }
}

fn map_statement(statement: engine::Statement) -> StatementView {
    let units = statement
        .preview()
        .into_iter()
        .map(|row| UnitTotal {
            unit_id: row.unit_id,
            label: row.label,
            area_sqm: row.area_sqm,
            total_minor: row.total.cents(),
        })
        .collect();
    let rows = statement
        .detail_rows
        .into_iter()
        .map(|row| DetailRowView {
            entry_id: row.entry_id,
            unit_id: row.unit_id,
            category_code: row.category_code,
            gross_minor: to_minor(row.gross),
            vat_rate: row.vat_rate,
        })
        .collect();
    StatementView {
        property_id: statement.property_id,
        year: statement.year,
        units,
        rows,
    }
}

fn map_settlement(settlement: engine::Settlement) -> SettlementView {
    SettlementView {
        lease_id: settlement.lease_id,
        unit_id: settlement.unit_id,
        year: settlement.year,
        heating: map_totals(settlement.heating),
        other: map_totals(settlement.other),
        categories: settlement
            .categories
            .into_iter()
            .map(|category| CategoryTotals {
                category_code: category.category_code,
                block: match category.block {
                    engine::CostBlock::Heating => CostBlock::Heating,
                    engine::CostBlock::Other => CostBlock::Other,
                },
                totals: map_totals(category.totals),
            })
            .collect(),
        total_allocated_minor: to_minor(settlement.total_allocated),
        advances_minor: to_minor(settlement.advances),
        balance_minor: to_minor(settlement.balance),
    }
}

pub async fn statement(
    State(state): State<ServerState>,
    Path((property_id, year)): Path<(Uuid, i32)>,
) -> Result<Json<StatementView>, ServerError> {
    let statement = state.engine.statement(property_id, year).await?;
    Ok(Json(map_statement(statement)))
}

pub async fn active_leases(
    State(state): State<ServerState>,
    Path((property_id, year)): Path<(Uuid, i32)>,
) -> Result<Json<LeasesResponse>, ServerError> {
    let leases = state
        .engine
        .active_leases(property_id, year)
        .await?
        .into_iter()
        .map(|lease| LeaseView {
            id: lease.id,
            unit_id: lease.unit_id,
            tenant_name: lease.tenant_name,
            start_date: lease.start_date,
            end_date: lease.end_date,
        })
        .collect();
    Ok(Json(LeasesResponse { leases }))
}

pub async fn settlement(
    State(state): State<ServerState>,
    Path((lease_id, year)): Path<(Uuid, i32)>,
) -> Result<Json<SettlementView>, ServerError> {
    let settlement = state.engine.settle_lease(lease_id, year).await?;
    Ok(Json(map_settlement(settlement)))
}
