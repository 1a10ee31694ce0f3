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

use crate::{Context, DownloadParams, Result, UploadParams, UploadResult};
use http::Uri;
use std::fmt::Debug;

/// GenerateDownload produces pre-signed download urls for end users.
///
/// Implementations are provided by object storage or CDN services. They are immutable
/// once built, config errors are reported while building and never here.
#[async_trait::async_trait]
pub trait GenerateDownload: Debug + Send + Sync + Unpin + 'static {
    /// Generate a download url.
    ///
    /// The returned url is opaque and must be handed to the end client unmodified.
    async fn generate_download(&self, ctx: &Context, params: &DownloadParams) -> Result<Uri>;
}

/// GenerateUpload produces pre-signed upload requests for end users.
#[async_trait::async_trait]
pub trait GenerateUpload: Debug + Send + Sync + Unpin + 'static {
    /// Generate an upload url together with the method and the fields the
    /// end client must send.
    async fn generate_upload(&self, ctx: &Context, params: &UploadParams) -> Result<UploadResult>;
}
