//! # S3互換ストレージ実装
//!
//! AWS S3, MinIO, Cloudflare R2 等のS3互換APIを使用するストレージ実装。
//! 署名付きURLは `fileshare-crypto` の [`Presigner`] でローカルに生成し、
//! キー一覧は ListObjectsV2 をページ単位で呼び出す。

use std::time::Duration;

use chrono::Utc;
use fileshare_crypto::{PresignedRequest, Presigner, SigningCredentials};
use fileshare_types::Operation;

use super::{ListPage, ObjectStorage};
use crate::config::GatewayConfig;
use crate::error::GatewayError;

/// S3互換ストレージによるObjectStorage実装。
pub struct S3Storage {
    /// ListObjectsV2呼び出し用のバケットクライアント
    bucket: Box<::s3::Bucket>,
    /// 署名付きURL生成器
    presigner: Presigner,
    /// 署名用認証情報。認証情報チェーンで解決できなかった場合はNone。
    credentials: Option<SigningCredentials>,
}

impl S3Storage {
    /// バケットクライアントと署名付きURL生成器から構築する。
    pub fn new(
        bucket: Box<::s3::Bucket>,
        presigner: Presigner,
        credentials: Option<SigningCredentials>,
    ) -> Self {
        Self {
            bucket,
            presigner,
            credentials,
        }
    }

    /// 設定から構築する。
    ///
    /// 認証情報は標準の認証情報チェーン（`AWS_ACCESS_KEY_ID` 等の環境変数、
    /// 共有認証情報ファイル）から一度だけ解決する。
    /// 解決できなかった場合も起動は継続し、署名要求時にエラーを返す。
    pub fn from_config(config: &GatewayConfig) -> anyhow::Result<Self> {
        let credentials = match ::s3::creds::Credentials::default() {
            Ok(creds) => creds,
            Err(e) => {
                tracing::warn!(error = %e, "認証情報を解決できませんでした。匿名で接続します");
                ::s3::creds::Credentials::anonymous()?
            }
        };
        let signing_credentials = signing_credentials(&credentials);
        if signing_credentials.is_none() {
            tracing::warn!("署名用の認証情報がありません。署名付きURLは発行できません");
        }

        let region = ::s3::Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.as_str().trim_end_matches('/').to_string(),
        };
        let bucket = ::s3::Bucket::new(&config.bucket_name, region, credentials)?;
        let bucket = if config.use_path_style {
            bucket.with_path_style()
        } else {
            bucket
        };

        let presigner = Presigner::new(
            &config.endpoint,
            &config.bucket_name,
            &config.region,
            config.addressing_style(),
        )?;

        tracing::info!(
            bucket = %config.bucket_name,
            endpoint = %config.endpoint,
            region = %config.region,
            path_style = config.use_path_style,
            "S3互換ストレージを設定"
        );

        Ok(Self::new(bucket, presigner, signing_credentials))
    }
}

/// 認証情報チェーンの結果から署名用認証情報を取り出す。
fn signing_credentials(credentials: &::s3::creds::Credentials) -> Option<SigningCredentials> {
    let access_key_id = credentials.access_key.clone().filter(|k| !k.is_empty())?;
    let secret_access_key = credentials.secret_key.clone().filter(|k| !k.is_empty())?;
    Some(SigningCredentials {
        access_key_id,
        secret_access_key,
        session_token: credentials
            .session_token
            .clone()
            .or_else(|| credentials.security_token.clone()),
    })
}

/// ストレージのエラーをクライアントへ返すメッセージに変換する。
///
/// 非2xx応答はS3のエラーXML（`<Error><Code>..</Code><Message>..</Message></Error>`）から
/// `"<Code>: <Message>"` を取り出す。XMLでない場合は本文をそのまま使う。
fn provider_error_message(error: &::s3::error::S3Error) -> String {
    match error {
        ::s3::error::S3Error::HttpFailWithBody(status, body) => {
            match (xml_element(body, "Code"), xml_element(body, "Message")) {
                (Some(code), Some(message)) => format!("{code}: {message}"),
                (Some(code), None) => code.to_string(),
                _ if body.trim().is_empty() => format!("HTTP {status}"),
                _ => body.trim().to_string(),
            }
        }
        other => other.to_string(),
    }
}

/// 最初に現れる `<name>...</name>` の中身を返す。
fn xml_element<'a>(xml: &'a str, name: &str) -> Option<&'a str> {
    let open = format!("<{name}>");
    let close = format!("</{name}>");
    let start = xml.find(&open)? + open.len();
    let len = xml[start..].find(&close)?;
    Some(xml[start..start + len].trim())
}

#[async_trait::async_trait]
impl ObjectStorage for S3Storage {
    async fn presign(
        &self,
        operation: Operation,
        key: &str,
        expiry: Duration,
    ) -> Result<PresignedRequest, GatewayError> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            tracing::error!(%operation, key, "署名用の認証情報がありません");
            GatewayError::Signing("署名用の認証情報がありません".to_string())
        })?;

        self.presigner
            .presign(operation, key, expiry, credentials, Utc::now())
            .map_err(|e| {
                tracing::error!(%operation, key, error = %e, "署名付きURLの生成に失敗");
                GatewayError::from(e)
            })
    }

    async fn list_page(
        &self,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> Result<ListPage, GatewayError> {
        let (result, _status) = self
            .bucket
            .list_page(prefix.to_string(), None, continuation_token, None, None)
            .await
            .map_err(|e| {
                tracing::error!(prefix, error = %e, "オブジェクト一覧の取得に失敗");
                GatewayError::Listing(provider_error_message(&e))
            })?;

        Ok(ListPage {
            keys: result.contents.into_iter().map(|object| object.key).collect(),
            next_continuation_token: result.next_continuation_token.filter(|t| !t.is_empty()),
        })
    }
}
