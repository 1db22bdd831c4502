//! # Gateway エラー型
//!
//! 失敗は発生箇所でログ出力した上で、HTTPステータスとエラーメッセージ本文に変換する。

use axum::http::StatusCode;
use fileshare_crypto::PresignError;

/// Gatewayエラー型。
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// 必須パラメータが指定されていない
    #[error("必須パラメータがありません: {0}")]
    MissingParameter(&'static str),
    /// 署名付きURLの生成に失敗（認証情報・設定の問題）
    #[error("{0}")]
    Signing(String),
    /// オブジェクト一覧の取得に失敗（通信・ストレージ側のエラー）
    #[error("{0}")]
    Listing(String),
}

impl From<PresignError> for GatewayError {
    fn from(e: PresignError) -> Self {
        GatewayError::Signing(e.to_string())
    }
}

impl axum::response::IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            GatewayError::MissingParameter(_) | GatewayError::Listing(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
