//! # GET /health

/// GET /health: 死活確認。
pub async fn handle_health() -> &'static str {
    "API is up and running"
}
