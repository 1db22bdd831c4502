//! # オブジェクトストレージ
//!
//! 署名付きURL発行とキー一覧取得の抽象インターフェース。
//! S3互換ストレージ実装は `s3` サブモジュールを参照。

#[cfg(feature = "vendor-aws")]
pub mod s3;

#[cfg(feature = "vendor-aws")]
pub use self::s3::S3Storage;

use std::collections::HashSet;
use std::time::Duration;

use fileshare_crypto::PresignedRequest;
use fileshare_types::Operation;

use crate::error::GatewayError;

/// キー一覧の1ページ分の取得結果。
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    /// このページに含まれるキー（ストレージの返却順）
    pub keys: Vec<String>,
    /// 続きがある場合の継続トークン
    pub next_continuation_token: Option<String>,
}

/// オブジェクトストレージの抽象インターフェース。
///
/// Gateway運用者はS3互換ストレージ（MinIO, AWS S3, Cloudflare R2等）や
/// その他のストレージバックエンドを実装として選択できる。
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// 1つのオブジェクトに対する署名付きURLを生成する。
    ///
    /// ストレージへの通信は行わない。有効期限の判定はURLを受け取ったストレージ側が行う。
    async fn presign(
        &self,
        operation: Operation,
        key: &str,
        expiry: Duration,
    ) -> Result<PresignedRequest, GatewayError>;

    /// プレフィックスに一致するキーを1ページ分取得する。
    ///
    /// `continuation_token` は前ページの `next_continuation_token`。初回は `None`。
    async fn list_page(
        &self,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> Result<ListPage, GatewayError>;
}

/// プレフィックスに一致する全キーを取得する。
///
/// 継続トークンが返されなくなるまでページを順に取得し、返却順のまま連結する。
/// 途中のページで失敗した場合はそれまでの結果を破棄してエラーを返す。
/// 呼び出し側のFutureが破棄された場合（クライアント切断等）は、
/// 実行中のページ取得ごと中断され、以降のページは取得されない。
pub async fn list_keys(
    storage: &dyn ObjectStorage,
    prefix: &str,
) -> Result<Vec<String>, GatewayError> {
    let mut keys = Vec::new();
    let mut continuation_token: Option<String> = None;
    let mut seen_tokens: HashSet<String> = HashSet::new();
    let mut pages = 0usize;

    loop {
        let page = storage
            .list_page(prefix, continuation_token.clone())
            .await?;
        pages += 1;
        keys.extend(page.keys);

        match page.next_continuation_token {
            // 既出のトークンに戻ると同じページ列を無限に取得してしまう
            Some(next) if !seen_tokens.insert(next.clone()) => {
                tracing::error!(prefix, token = %next, pages, "既出の継続トークンが返されました");
                return Err(GatewayError::Listing(format!(
                    "ストレージが既出の継続トークンを返しました: {next}"
                )));
            }
            Some(next) => continuation_token = Some(next),
            None => break,
        }
    }

    tracing::debug!(prefix, pages, count = keys.len(), "キー一覧を取得しました");
    Ok(keys)
}
