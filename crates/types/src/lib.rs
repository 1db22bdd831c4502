//! # File Share 共有型定義
//!
//! Gateway APIのリクエスト・レスポンスで使用するデータ構造を提供する。
//! フロントエンド等のクライアントと共有される。

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// 署名付きURLの操作種別
// ---------------------------------------------------------------------------

/// 署名付きURLが許可するオブジェクト操作。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// オブジェクトの読み出し（ダウンロード）
    Get,
    /// オブジェクトの書き込み（アップロード）
    Put,
}

impl Operation {
    /// 署名対象となるHTTPメソッド。
    pub fn http_method(self) -> &'static str {
        match self {
            Operation::Get => "GET",
            Operation::Put => "PUT",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.http_method())
    }
}

// ---------------------------------------------------------------------------
// /upload, /download (GET)
// ---------------------------------------------------------------------------

/// /upload, /download のクエリパラメータ。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilenameQuery {
    /// オブジェクトキーとして使用するファイル名
    pub filename: Option<String>,
}

/// /upload, /download レスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresignResponse {
    /// 署名付きURL
    pub url: String,
}

// ---------------------------------------------------------------------------
// /list (GET)
// ---------------------------------------------------------------------------

/// /list のクエリパラメータ。
/// prefix省略時は空文字列（バケット全体）として扱う。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    /// キーのプレフィックス
    #[serde(default)]
    pub prefix: String,
}

/// /list レスポンス。キーの配列をそのままJSON配列として返す。
pub type ListResponse = Vec<String>;
