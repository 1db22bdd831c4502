//! # Gatewayエンドポイント
//!
//! `/api` 配下にマウントされるハンドラ群。

pub mod health;
pub mod presign;
pub mod list;

pub use health::handle_health;
pub use presign::{handle_download, handle_upload};
pub use list::handle_list;
