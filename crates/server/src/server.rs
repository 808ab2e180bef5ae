use axum::{
    Router,
    routing::{delete, get, post, put},
};

use std::sync::Arc;

use crate::{categories, costs, properties, settings, statements};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

pub fn router(engine: Arc<Engine>) -> Router {
    let state = ServerState { engine };
    Router::new()
        .route("/categories", get(categories::list))
        .route("/properties/{property_id}/units", get(properties::units))
        .route("/units/{unit_id}/meters", post(properties::add_meter))
        .route("/meters/{meter_id}/readings", post(properties::add_reading))
        .route("/units/{unit_id}/leases", post(properties::new_lease))
        .route("/leases/{lease_id}/payments", post(properties::add_payment))
        .route(
            "/properties/{property_id}/settings",
            get(settings::get).put(settings::put),
        )
        .route(
            "/properties/{property_id}/persons/{year}",
            put(settings::replace_persons),
        )
        .route(
            "/properties/{property_id}/costs",
            get(costs::list).post(costs::create),
        )
        .route(
            "/properties/{property_id}/costs/{entry_id}",
            delete(costs::remove),
        )
        .route(
            "/properties/{property_id}/statements/{year}",
            get(statements::statement),
        )
        .route(
            "/properties/{property_id}/leases/{year}",
            get(statements::active_leases),
        )
        .route(
            "/leases/{lease_id}/settlements/{year}",
            get(statements::settlement),
        )
        .with_state(state)
}

pub async fn run(engine: Engine, addr: &str) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(Arc::new(engine))).await
}
