use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/usuario/:usuario/proyecto/:proyecto/estadisticas",
            get(handlers::statistics_page),
        )
        .route(
            "/usuario/:usuario/proyecto/:proyecto/estadisticas/grafico/:kind",
            get(handlers::chart_config),
        )
        .with_state(state)
}
