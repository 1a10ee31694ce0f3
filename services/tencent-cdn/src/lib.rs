//! Signed download urls for Tencent Cloud CDN.
//!
//! Supports url authentication type A, B, C and D with SHA-256 signatures. The CDN
//! domain must be configured with the `sha256` algorithm.

mod config;
pub use config::AuthMode;
pub use config::Config;

mod download;
pub use download::DownloadGenerator;
