// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Pre-signed upload and download urls for S3 compatible storage and CDNs.
//!
//! Hand out short-lived urls to untrusted clients without exposing storage credentials.
//!
//! ## Quick Start
//!
//! ```no_run
//! use presign::{Client, Config, Context, DownloadParams, GenerateDownload, Result};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new().with_env(presign::OsEnv);
//! let config = Config::from_json(
//!     r#"{
//!         "endpoint": "https://s3.us-east-1.amazonaws.com",
//!         "bucket": "my-bucket",
//!         "bucket_lookup": "dns",
//!         "download_generator": {
//!             "type": "aliyun_cdn",
//!             "config": {"endpoint": "https://cdn.example.com", "auth_mode": "type-a", "auth_key": "secret"}
//!         }
//!     }"#,
//! )?
//! .from_env(&ctx);
//!
//! let client = Client::new(config)?;
//! let params = DownloadParams::new("reports/2024.pdf", Duration::from_secs(600))
//!     .with_attachment_filename("report.pdf");
//! let url = client.generate_download(&ctx, &params).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Backends
//!
//! | kind                | download | upload |
//! |---------------------|----------|--------|
//! | `s3`                | yes      | yes    |
//! | `aliyun_cdn`        | yes      | no     |
//! | `tencent_cloud_cdn` | yes      | no     |

pub use presign_core::*;

/// S3 SigV4 generators.
pub mod s3 {
    pub use presign_s3::*;
}

/// Aliyun CDN generator.
pub mod aliyun_cdn {
    pub use presign_aliyun_cdn::*;
}

/// Tencent Cloud CDN generator.
pub mod tencent_cdn {
    pub use presign_tencent_cdn::*;
}

mod client;
pub use client::Client;

mod config;
pub use config::{Config, GeneratorConfig};

mod kind;
pub use kind::{DownloadGeneratorKind, UploadGeneratorKind};

pub mod factory;

mod constants;
pub use constants::*;
