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

use crate::request::URL_PATH_ENCODE_SET;
use crate::{path, Error, Result};
use http::uri::{Authority, PathAndQuery, Scheme};
use http::Uri;
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use std::fmt;
use std::str::FromStr;

/// BucketLookup decides how the bucket name maps into the request url.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketLookup {
    /// Prepend bucket name to the endpoint host: `https://<bucket>.s3.example.com`
    Dns,
    /// Append bucket name to the endpoint path: `https://s3.example.com/<bucket>`
    Path,
    /// Custom domain that has been mapped to the bucket, endpoint is used as is.
    Cname,
}

impl FromStr for BucketLookup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dns" => Ok(BucketLookup::Dns),
            "path" => Ok(BucketLookup::Path),
            "cname" => Ok(BucketLookup::Cname),
            v => Err(Error::config_invalid(format!(
                "unknown bucket lookup type: {v}"
            ))),
        }
    }
}

impl fmt::Display for BucketLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketLookup::Dns => f.write_str("dns"),
            BucketLookup::Path => f.write_str("path"),
            BucketLookup::Cname => f.write_str("cname"),
        }
    }
}

/// Endpoint is a parsed http(s) base url.
///
/// Only scheme, authority and path are kept, query and fragment of the input are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: Scheme,
    authority: Authority,
    path: String,
}

impl Endpoint {
    /// Parse an endpoint like `https://cdn.example.com/static`.
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::ErrorKind::ConfigInvalid) if the input is
    /// not an absolute http or https url.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::config_invalid("endpoint is required"));
        }

        let parts = Uri::from_str(s)
            .map_err(|e| {
                Error::config_invalid(format!("failed to parse endpoint: {s}")).with_source(e)
            })?
            .into_parts();

        let scheme = parts
            .scheme
            .ok_or_else(|| Error::config_invalid("endpoint scheme must be http or https"))?;
        if scheme != Scheme::HTTP && scheme != Scheme::HTTPS {
            return Err(Error::config_invalid(
                "endpoint scheme must be http or https",
            ));
        }
        let authority = parts
            .authority
            .ok_or_else(|| Error::config_invalid("endpoint host is required"))?;
        let path = parts
            .path_and_query
            .as_ref()
            .map(|v| v.path())
            .unwrap_or("/");
        // Stored unescaped, signers escape the full path once.
        let decoded = percent_decode_str(path).decode_utf8().map_err(|e| {
            Error::config_invalid(format!("endpoint path is not valid utf-8: {s}")).with_source(e)
        })?;

        Ok(Endpoint {
            scheme,
            authority,
            path: path::join(["/", &*decoded]),
        })
    }

    /// Apply bucket lookup to this endpoint.
    pub fn with_bucket(mut self, bucket: &str, lookup: BucketLookup) -> Result<Self> {
        match lookup {
            BucketLookup::Dns => {
                self.authority = Authority::from_str(&format!("{bucket}.{}", self.authority))
                    .map_err(|e| {
                        Error::config_invalid(format!("bucket {bucket} is not a valid host label"))
                            .with_source(e)
                    })?;
            }
            BucketLookup::Path => {
                self.path = path::join([self.path.as_str(), bucket]);
            }
            BucketLookup::Cname => {}
        }
        Ok(self)
    }

    /// Scheme of this endpoint.
    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    /// Authority of this endpoint.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Path of this endpoint, not escaped, always starts with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Convert this endpoint into an uri.
    pub fn to_uri(&self) -> Result<Uri> {
        let mut parts = http::uri::Parts::default();
        parts.scheme = Some(self.scheme.clone());
        parts.authority = Some(self.authority.clone());
        let path = utf8_percent_encode(&self.path, &URL_PATH_ENCODE_SET).to_string();
        parts.path_and_query = Some(PathAndQuery::from_str(&path)?);
        Ok(Uri::from_parts(parts)?)
    }
}
