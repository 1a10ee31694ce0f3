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

use crate::path::clean;
use crate::{Error, Result};
use http::{HeaderMap, Method, Uri};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::time::Duration;

/// Parameters of a pre-signed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadParams {
    /// Logical object path, before any prefix is applied.
    pub remote_path: String,
    /// How long the url stays valid.
    pub expire_in: Duration,
    /// Respond with `Content-Disposition: attachment` using this filename.
    pub attachment_filename: Option<String>,
    /// Respond with this `Content-Type`.
    pub content_type: Option<String>,
}

impl DownloadParams {
    /// Create download params for `remote_path`.
    pub fn new(remote_path: impl Into<String>, expire_in: Duration) -> Self {
        Self {
            remote_path: remote_path.into(),
            expire_in,
            attachment_filename: None,
            content_type: None,
        }
    }

    /// Set attachment filename.
    pub fn with_attachment_filename(mut self, filename: impl Into<String>) -> Self {
        self.attachment_filename = Some(filename.into());
        self
    }

    /// Set response content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Check the params before generating.
    pub fn validate(&self) -> Result<()> {
        validate_common(&self.remote_path, self.expire_in)
    }
}

/// Parameters of a pre-signed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadParams {
    /// Logical object path, before any prefix is applied.
    pub remote_path: String,
    /// How long the url stays valid.
    pub expire_in: Duration,
    /// Exact size of the pending file, any other length is rejected by the store.
    pub size: u64,
    /// Content type of the pending file.
    pub content_type: Option<String>,
    /// Filename to respond with when the object is downloaded later.
    pub attachment_filename: Option<String>,
    /// SHA-256 digest of the pending file.
    pub sha256: Option<[u8; 32]>,
    /// User defined object metadata.
    pub metadata: BTreeMap<String, String>,
}

impl UploadParams {
    /// Create upload params for `remote_path` with exact `size`.
    pub fn new(remote_path: impl Into<String>, expire_in: Duration, size: u64) -> Self {
        Self {
            remote_path: remote_path.into(),
            expire_in,
            size,
            content_type: None,
            attachment_filename: None,
            sha256: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Set content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set attachment filename.
    pub fn with_attachment_filename(mut self, filename: impl Into<String>) -> Self {
        self.attachment_filename = Some(filename.into());
        self
    }

    /// Bind the upload to this content digest.
    pub fn with_sha256(mut self, digest: [u8; 32]) -> Self {
        self.sha256 = Some(digest);
        self
    }

    /// Add one metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Check the params before generating.
    pub fn validate(&self) -> Result<()> {
        validate_common(&self.remote_path, self.expire_in)
    }
}

fn validate_common(remote_path: &str, expire_in: Duration) -> Result<()> {
    if remote_path.is_empty() {
        return Err(Error::request_invalid("remote path is required"));
    }
    // Paths like `.` or `a/..` would sign the prefix root instead of an object.
    if clean(&format!("/{remote_path}")) == "/" {
        return Err(Error::request_invalid(format!(
            "remote path {remote_path} does not name an object"
        )));
    }
    if expire_in.is_zero() {
        return Err(Error::request_invalid("expire_in must be greater than zero"));
    }
    Ok(())
}

/// Fields the end client must send along with the upload.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadFields {
    /// Headers to replay verbatim on a PUT request.
    Header(HeaderMap),
    /// Multipart form fields to submit before the `file` field of a POST request.
    FormData(BTreeMap<String, String>),
}

/// Result of a pre-signed upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadResult {
    /// `PUT` or `POST`.
    pub method: Method,
    /// Url to send the upload to.
    pub url: Uri,
    /// Headers or form data, decided by the upload strategy.
    pub fields: UploadFields,
}

impl UploadResult {
    /// Headers to send, only set for PUT uploads.
    pub fn header(&self) -> Option<&HeaderMap> {
        match &self.fields {
            UploadFields::Header(h) => Some(h),
            UploadFields::FormData(_) => None,
        }
    }

    /// Form fields to send, only set for POST uploads.
    pub fn form_data(&self) -> Option<&BTreeMap<String, String>> {
        match &self.fields {
            UploadFields::Header(_) => None,
            UploadFields::FormData(v) => Some(v),
        }
    }
}

/// Serialize as `{method, url, header?, form_data?}`.
impl Serialize for UploadResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("method", self.method.as_str())?;
        map.serialize_entry("url", &self.url.to_string())?;
        match &self.fields {
            UploadFields::Header(headers) => {
                let mut hs = BTreeMap::new();
                for (k, v) in headers {
                    let v = v.to_str().map_err(serde::ser::Error::custom)?;
                    hs.insert(k.as_str(), v);
                }
                map.serialize_entry("header", &hs)?;
            }
            UploadFields::FormData(form) => {
                map.serialize_entry("form_data", form)?;
            }
        }
        map.end()
    }
}
