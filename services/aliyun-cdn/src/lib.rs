//! Signed download urls for Aliyun CDN.
//!
//! Supports url authentication type A, B, C and F with MD5 signatures.
//!
//! ```no_run
//! use presign_aliyun_cdn::{AuthMode, Config, DownloadGenerator};
//! use presign_core::{Context, DownloadParams, GenerateDownload, Result};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<()> {
//! let generator = DownloadGenerator::new(Config {
//!     endpoint: "https://cdn.example.com".to_string(),
//!     auth_mode: AuthMode::A,
//!     auth_key: "secret".to_string(),
//!     ..Default::default()
//! })?;
//! let params = DownloadParams::new("videos/intro.mp4", Duration::from_secs(600));
//! let url = generator.generate_download(&Context::new(), &params).await?;
//! # Ok(())
//! # }
//! ```

mod config;
pub use config::AuthMode;
pub use config::Config;

mod download;
pub use download::DownloadGenerator;
