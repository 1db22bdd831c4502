//! # GET /upload, GET /download
//!
//! 署名付きURL発行。ファイル名をそのままオブジェクトキーとして使用する。

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use fileshare_types::{FilenameQuery, Operation, PresignResponse};

use crate::config::GatewayState;
use crate::error::GatewayError;

/// GET /upload: アップロード用（PUT）署名付きURL発行。
pub async fn handle_upload(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<FilenameQuery>,
) -> Result<Json<PresignResponse>, GatewayError> {
    presign_filename(&state, Operation::Put, query).await
}

/// GET /download: ダウンロード用（GET）署名付きURL発行。
pub async fn handle_download(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<FilenameQuery>,
) -> Result<Json<PresignResponse>, GatewayError> {
    presign_filename(&state, Operation::Get, query).await
}

/// filenameを検証し、ストレージに署名付きURLを生成させる。
/// filenameが空の場合はストレージに触れずに失敗する。
async fn presign_filename(
    state: &GatewayState,
    operation: Operation,
    query: FilenameQuery,
) -> Result<Json<PresignResponse>, GatewayError> {
    let Some(filename) = query.filename.filter(|f| !f.is_empty()) else {
        tracing::warn!(%operation, "filenameが指定されていません");
        return Err(GatewayError::MissingParameter("filename"));
    };

    let presigned = state
        .storage
        .presign(operation, &filename, state.config.presign_expiry)
        .await?;

    tracing::info!(
        %operation,
        key = %filename,
        expires_at = %presigned.expires_at,
        "署名付きURLを発行"
    );

    Ok(Json(PresignResponse { url: presigned.url }))
}
