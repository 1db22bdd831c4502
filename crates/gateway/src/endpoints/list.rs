//! # GET /list
//!
//! プレフィックスに一致するオブジェクトキーの一覧。

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use fileshare_types::{ListQuery, ListResponse};

use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::storage::list_keys;

/// GET /list: キー一覧取得。
///
/// prefix省略時はバケット全体を返す。一致するキーがない場合は空配列。
/// 取得に失敗した場合は 400 を返す。
pub async fn handle_list(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, GatewayError> {
    let keys = list_keys(state.storage.as_ref(), &query.prefix).await?;
    tracing::info!(prefix = %query.prefix, count = keys.len(), "キー一覧を返却");
    Ok(Json(keys))
}
