//! # Gateway設定・共有状態
//!
//! 環境変数からの設定読み込みとGatewayの共有状態の定義。
//! 設定は起動時に一度だけ構築され、以降は変更されない。

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use fileshare_crypto::{AddressingStyle, MAX_EXPIRY_SECS};
use url::Url;

use crate::storage::ObjectStorage;

/// PORT未設定・不正時の待ち受けポート
pub const DEFAULT_PORT: u16 = 80;
/// 署名付きURLの既定の有効期間（秒）
pub const DEFAULT_PRESIGN_EXPIRY_SECS: u64 = 300;
/// BUCKET_REGION・AWS_REGIONが共に未設定の場合のリージョン
pub const DEFAULT_REGION: &str = "us-east-1";
/// 静的ファイルの既定ディレクトリ
pub const DEFAULT_STATIC_DIR: &str = "./static";

/// Gateway設定。
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// 待ち受けポート
    pub port: u16,
    /// S3互換ストレージのエンドポイント
    pub endpoint: Url,
    /// バケット名
    pub bucket_name: String,
    /// 署名リージョン
    pub region: String,
    /// パススタイルでアドレス指定するか（MinIOでは必須、AWS S3では無効にする）
    pub use_path_style: bool,
    /// 署名付きURLの有効期間
    pub presign_expiry: Duration,
    /// 静的ファイルのディレクトリ
    pub static_dir: PathBuf,
}

impl GatewayConfig {
    /// 環境変数から構築する。
    /// カレントディレクトリに `.env` があれば先に読み込む（既存の環境変数が優先）。
    pub fn from_env() -> anyhow::Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, ".envの読み込みに失敗しました");
            }
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の変数ソースから構築する。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bucket_name = var("BUCKET_NAME").context("BUCKET_NAMEが設定されていません")?;

        let region = var("BUCKET_REGION")
            .or_else(|| var("AWS_REGION"))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let endpoint_str =
            var("S3_ENDPOINT").unwrap_or_else(|| format!("https://s3.{region}.amazonaws.com"));
        let endpoint = Url::parse(&endpoint_str)
            .with_context(|| format!("S3_ENDPOINTが不正です: {endpoint_str}"))?;

        let port = match var("PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                tracing::warn!(port = %raw, "PORTが不正です。{}を使用します", DEFAULT_PORT);
                DEFAULT_PORT
            }),
        };

        let use_path_style = var("USE_PATH_STYLE").as_deref() == Some("true");

        let presign_expiry_secs = match var("PRESIGN_EXPIRY_SECS") {
            None => DEFAULT_PRESIGN_EXPIRY_SECS,
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("PRESIGN_EXPIRY_SECSが不正です: {raw}"))?,
        };
        if presign_expiry_secs == 0 || presign_expiry_secs > MAX_EXPIRY_SECS {
            anyhow::bail!(
                "PRESIGN_EXPIRY_SECSは1〜{}の範囲で指定してください: {}",
                MAX_EXPIRY_SECS,
                presign_expiry_secs
            );
        }

        let static_dir = PathBuf::from(
            var("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
        );

        Ok(Self {
            port,
            endpoint,
            bucket_name,
            region,
            use_path_style,
            presign_expiry: Duration::from_secs(presign_expiry_secs),
            static_dir,
        })
    }

    /// 設定に対応するアドレス指定方式
    pub fn addressing_style(&self) -> AddressingStyle {
        if self.use_path_style {
            AddressingStyle::Path
        } else {
            AddressingStyle::VirtualHosted
        }
    }
}

/// Gatewayの共有状態。
/// 全リクエストから読み取り専用で参照される。
pub struct GatewayState {
    /// 起動時に読み込んだ設定
    pub config: GatewayConfig,
    /// オブジェクトストレージ（S3互換等、トレイトで抽象化）
    pub storage: Box<dyn ObjectStorage>,
}
