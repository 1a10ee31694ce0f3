//! Core components for generating pre-signed requests.
//!
//! This crate provides the foundational types and traits shared by every presign service.
//!
//! ## Overview
//!
//! The crate is built around several key concepts:
//!
//! - **Params**: [`DownloadParams`] and [`UploadParams`] describe what the end client is allowed to do
//! - **Traits**: [`GenerateDownload`] and [`GenerateUpload`] are implemented by every signing backend
//! - **Context**: A container that holds the clock, the nonce source and the environment read while generating
//!
//! ## Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use http::Uri;
//! use presign_core::{Context, DownloadParams, GenerateDownload, Result};
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! struct PublicSite;
//!
//! #[async_trait]
//! impl GenerateDownload for PublicSite {
//!     async fn generate_download(&self, _: &Context, params: &DownloadParams) -> Result<Uri> {
//!         let path = presign_core::path::object_path("/", "public", &params.remote_path);
//!         Ok(format!("https://static.example.com{path}").parse::<Uri>()?)
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new();
//! let params = DownloadParams::new("a/b.bin", Duration::from_secs(60));
//! let url = PublicSite.generate_download(&ctx, &params).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time formatting utilities
//! - [`path`]: Object key composition
//! - [`utils`]: Redaction, content disposition and config helpers

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod path;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};
mod context;
pub use context::{
    Clock, Context, Env, FixedClock, GenerateNonce, NoopEnv, OsEnv, StaticEnv, StaticNonce,
    SystemClock, UuidNonce,
};
mod endpoint;
pub use endpoint::{BucketLookup, Endpoint};
mod params;
pub use params::{DownloadParams, UploadFields, UploadParams, UploadResult};
mod api;
pub use api::{GenerateDownload, GenerateUpload};
mod request;
pub use request::{SigningRequest, URL_PATH_ENCODE_SET};
