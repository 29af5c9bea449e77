use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::chat::ChatError;
use crate::server::errors::AppError;
use crate::server::state::AppState;
use crate::store::{Collection, Record};

// ---------------------------------------------------------------------------
// Router construction
// ---------------------------------------------------------------------------

pub fn build_routes(state: AppState) -> Router {
    Router::new()
        // Queue
        .route("/appointments", get(list_appointments))
        .route("/attend-patient", post(attend_patient))
        // Saving. The two names point at each other's collection; clients
        // depend on that, so it stays.
        .route("/save-appointment", post(save_appointment))
        .route("/save-report", post(save_report))
        // Chat
        .route("/chat", post(chat))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Queue
// ---------------------------------------------------------------------------

async fn list_appointments(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let appointments = state
        .inner
        .store
        .list(Collection::Queue)
        .await
        .map_err(|e| {
            error!("Failed to read or parse appointments file: {}", e);
            AppError::Internal("Failed to read appointments file".into())
        })?;
    Ok(Json(appointments))
}

#[derive(Deserialize)]
struct AttendRequest {
    patient: Option<Record>,
}

async fn attend_patient(
    State(state): State<AppState>,
    Json(body): Json<AttendRequest>,
) -> Result<&'static str, AppError> {
    let failed = || AppError::InternalText("Error processing patient".into());

    let Some(patient) = body.patient else {
        error!("Error processing patient: request has no patient");
        return Err(failed());
    };

    let removed = state
        .inner
        .store
        .move_record(Collection::Queue, Collection::AttendedPatients, patient)
        .await
        .map_err(|e| {
            error!("Error processing patient: {}", e);
            failed()
        })?;
    info!(removed, "patient moved to attended list");
    Ok("Patient moved to attended list")
}

// ---------------------------------------------------------------------------
// Saving
// ---------------------------------------------------------------------------

async fn save_appointment(
    State(state): State<AppState>,
    Json(record): Json<Record>,
) -> Result<Json<Value>, AppError> {
    save_into(&state, Collection::Reports, record).await
}

async fn save_report(
    State(state): State<AppState>,
    Json(record): Json<Record>,
) -> Result<Json<Value>, AppError> {
    save_into(&state, Collection::Queue, record).await
}

async fn save_into(
    state: &AppState,
    collection: Collection,
    record: Record,
) -> Result<Json<Value>, AppError> {
    debug!(collection = collection.file_name(), ?record, "saving record");
    state
        .inner
        .store
        .append(collection, record)
        .await
        .map_err(|e| {
            error!("Failed to read or write {}: {}", collection.file_name(), e);
            AppError::Internal("Failed to save appointment".into())
        })?;
    Ok(Json(json!({ "message": "Appointment saved successfully" })))
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ChatRequest {
    prompt: Option<String>,
}

async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Html<String>, AppError> {
    let chat = &state.inner.chat;
    let reply = chat.reply(body.prompt.as_deref()).await.map_err(|e| match e {
        ChatError::BadRequest => AppError::BadRequest("Missing prompt in request body".into()),
        other => {
            error!("Error querying {}: {}", chat.provider_name(), other);
            AppError::InternalText("Error querying Groq AI".into())
        }
    })?;
    Ok(Html(reply))
}
