//! Allocation settings and person counts of a property.

use std::collections::BTreeMap;

use api_types::{
    persons::PersonsReplace,
    settings::{PropertySettings, WaterFallback},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_settings(settings: engine::PropertySettings) -> PropertySettings {
    PropertySettings {
        heat_ratio_consumption: settings.heat_ratio_consumption,
        persons_default: settings.persons_default,
        water_allocation_fallback: match settings.water_allocation_fallback {
            engine::WaterFallback::Persons => WaterFallback::Persons,
            engine::WaterFallback::Units => WaterFallback::Units,
        },
    }
}

pub async fn get(
    State(state): State<ServerState>,
    Path(property_id): Path<Uuid>,
) -> Result<Json<PropertySettings>, ServerError> {
    let settings = state.engine.property_settings(property_id).await?;
    Ok(Json(map_settings(settings)))
}

pub async fn put(
    State(state): State<ServerState>,
    Path(property_id): Path<Uuid>,
    Json(payload): Json<PropertySettings>,
) -> Result<Json<PropertySettings>, ServerError> {
    let fallback = match payload.water_allocation_fallback {
        WaterFallback::Persons => engine::WaterFallback::Persons,
        WaterFallback::Units => engine::WaterFallback::Units,
    };
    let settings = engine::PropertySettings::new(
        payload.heat_ratio_consumption,
        payload.persons_default,
        fallback,
    )?;
    let stored = state
        .engine
        .upsert_property_settings(property_id, settings)
        .await?;
    Ok(Json(map_settings(stored)))
}

pub async fn replace_persons(
    State(state): State<ServerState>,
    Path((property_id, year)): Path<(Uuid, i32)>,
    Json(payload): Json<PersonsReplace>,
) -> Result<StatusCode, ServerError> {
    let mut counts = BTreeMap::new();
    for row in payload.units {
        if counts.insert(row.unit_id, row.persons).is_some() {
            return Err(ServerError::Generic(format!(
                "unit {} listed more than once",
                row.unit_id
            )));
        }
    }
    state
        .engine
        .replace_unit_persons(property_id, year, &counts)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
