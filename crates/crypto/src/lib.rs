//! # File Share 暗号処理
//!
//! S3互換ストレージの署名付きURL（AWS Signature Version 4 クエリ文字列認証）を
//! 構築するための暗号プリミティブを実装する。
//!
//! ## 暗号アルゴリズム
//! | 用途 | アルゴリズム |
//! |------|------------|
//! | ハッシュ | SHA-256 |
//! | メッセージ認証 | HMAC-SHA256 |
//! | 署名鍵導出 | HMAC-SHA256 4段チェーン (date → region → service → aws4_request) |
//! | リクエスト署名 | AWS4-HMAC-SHA256 |
//!
//! 署名付きURLの組み立ては [`presign`] モジュールを参照。

pub mod presign;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

pub use presign::{
    AddressingStyle, PresignError, PresignedRequest, Presigner, SigningCredentials,
    MAX_EXPIRY_SECS,
};

type HmacSha256 = Hmac<Sha256>;

/// 署名鍵導出の終端文字列
const TERMINATOR: &str = "aws4_request";

/// SHA-256ハッシュ計算。
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// SHA-256ハッシュを小文字16進数で返す。
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// HMAC-SHA256計算。
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    // HMACは任意長の鍵を受け付けるため new_from_slice は失敗しない
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    let result = mac.finalize().into_bytes();
    let mut out = [0u8; 32];
    out.copy_from_slice(&result);
    out
}

/// SigV4署名鍵の導出。
///
/// ```text
/// kDate    = HMAC("AWS4" + secret, date)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "aws4_request")
/// ```
///
/// `date` は `YYYYMMDD` 形式。
pub fn derive_signing_key(secret_access_key: &str, date: &str, region: &str, service: &str) -> [u8; 32] {
    let k_date = hmac_sha256(format!("AWS4{secret_access_key}").as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, TERMINATOR.as_bytes())
}

/// 署名鍵で文字列に署名し、小文字16進数の署名を返す。
pub fn compute_signature(signing_key: &[u8; 32], string_to_sign: &str) -> String {
    hex::encode(hmac_sha256(signing_key, string_to_sign.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_empty() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    /// RFC 4231 Test Case 2
    #[test]
    fn test_hmac_sha256_rfc4231() {
        let mac = hmac_sha256(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            hex::encode(mac),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    /// AWSドキュメント記載の署名鍵導出例
    #[test]
    fn test_derive_signing_key_known_vector() {
        let key = derive_signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "20120215",
            "us-east-1",
            "iam",
        );
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn test_signing_key_depends_on_every_scope_component() {
        let base = derive_signing_key("secret", "20240101", "us-east-1", "s3");
        assert_ne!(base, derive_signing_key("secret2", "20240101", "us-east-1", "s3"));
        assert_ne!(base, derive_signing_key("secret", "20240102", "us-east-1", "s3"));
        assert_ne!(base, derive_signing_key("secret", "20240101", "eu-west-1", "s3"));
        assert_ne!(base, derive_signing_key("secret", "20240101", "us-east-1", "iam"));
    }
}
