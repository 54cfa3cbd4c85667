use crate::state::AppState;
use axum::{Json, extract::State};
use serde_json::{Value, json};

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "typesetter": state.pipeline.typesetter().name(),
        "available_generations": state.generation_semaphore.available_permits(),
    }))
}
