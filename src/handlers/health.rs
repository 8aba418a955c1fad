use axum::Json;

use crate::models::Envelope;

// GET /
pub async fn health() -> Json<Envelope<()>> {
    Json(Envelope::message("Booking Data Ingestion Service is Running"))
}
