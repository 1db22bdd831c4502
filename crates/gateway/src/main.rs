//! # File Share Gateway
//!
//! S3互換ストレージへの署名付きURL発行とキー一覧取得を提供するGateway。
//!
//! ## 役割
//! - 環境変数からの設定読み込み
//! - アップロード（PUT）・ダウンロード（GET）用の署名付きURL発行
//! - プレフィックスによるオブジェクトキー一覧
//! - フロントエンドの静的ファイル配信
//!
//! ## API エンドポイント
//! - `GET /api/health`: 死活確認
//! - `GET /api/upload?filename=`: アップロード用署名付きURL
//! - `GET /api/download?filename=`: ダウンロード用署名付きURL
//! - `GET /api/list?prefix=`: キー一覧
//! - `GET /`: `index.html`
//! - `GET /static/*`: 静的ファイル

mod config;
mod endpoints;
mod error;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::{GatewayConfig, GatewayState};

#[cfg(not(feature = "vendor-aws"))]
compile_error!("ストレージ実装が有効になっていません。vendor-aws featureを有効にしてください");

/// ルーターを構築する。
///
/// APIは `/api` 配下、静的ファイルは `/static` 配下に配置し、
/// `/` ちょうどのリクエストにのみ `index.html` を返す。
fn build_app(state: Arc<GatewayState>) -> axum::Router {
    let static_dir = state.config.static_dir.clone();

    let api = axum::Router::new()
        .route("/health", get(endpoints::handle_health))
        .route("/upload", get(endpoints::handle_upload))
        .route("/download", get(endpoints::handle_download))
        .route("/list", get(endpoints::handle_list))
        .with_state(state);

    axum::Router::new()
        .nest("/api", api)
        .nest_service("/static", ServeDir::new(&static_dir))
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .layer(TraceLayer::new_for_http())
}

// ---------------------------------------------------------------------------
// エントリポイント
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = GatewayConfig::from_env()?;
    let storage = storage::S3Storage::from_config(&config)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        presign_expiry_secs = config.presign_expiry.as_secs(),
        static_dir = %config.static_dir.display(),
        "設定を読み込みました"
    );

    let state = Arc::new(GatewayState {
        config,
        storage: Box::new(storage),
    });
    let app = build_app(state);

    tracing::info!("Gatewayを {} で起動します", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------
