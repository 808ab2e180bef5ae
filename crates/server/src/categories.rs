//! Cost category catalog.

use api_types::category::{AllocationMethod, CategoriesResponse, CategoryView};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

fn map_method(method: engine::AllocationMethod) -> AllocationMethod {
    match method {
        engine::AllocationMethod::Area => AllocationMethod::Area,
        engine::AllocationMethod::Units => AllocationMethod::Units,
        engine::AllocationMethod::Persons => AllocationMethod::Persons,
        engine::AllocationMethod::WaterM3 => AllocationMethod::WaterM3,
        engine::AllocationMethod::HeatSplit => AllocationMethod::HeatSplit,
    }
}

fn map_category(category: &engine::CostCategory) -> CategoryView {
    CategoryView {
        code: category.code.clone(),
        name: category.name.clone(),
        name_en: category.name_en.clone(),
        allocation_method: map_method(category.allocation_method),
        is_heating: category.is_heating,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<CategoriesResponse>, ServerError> {
    let catalog = state.engine.categories().await?;
    Ok(Json(CategoriesResponse {
        categories: catalog.iter().map(map_category).collect(),
    }))
}
