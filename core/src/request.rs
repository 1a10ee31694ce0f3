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

use crate::{Endpoint, Result};
use http::uri::{Authority, PathAndQuery, Scheme};
use http::{HeaderMap, HeaderValue, Method, Uri};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::str::FromStr;

/// AsciiSet for escaping url paths.
///
/// Everything except unreserved characters and the sub-delims allowed in a path
/// (`$&+,/:;=@`) is escaped.
pub static URL_PATH_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b',')
    .remove(b'/')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'@');

/// Signing context for a pre-signed request.
///
/// The request is never sent. It carries everything that goes into the signature
/// and is finally rendered into the url handed out to the end client.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path, not escaped, always starts with `/`.
    pub path: String,
    /// HTTP query parameters.
    ///
    /// Signers push raw pairs and encode them before rendering.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context for `path` on top of the endpoint.
    pub fn build(method: Method, endpoint: &Endpoint, path: String) -> Self {
        SigningRequest {
            method,
            scheme: endpoint.scheme().clone(),
            authority: endpoint.authority().clone(),
            path,
            query: Vec::new(),
            headers: HeaderMap::new(),
        }
    }

    /// Get the path escaped with given set.
    pub fn escaped_path(&self, set: &'static AsciiSet) -> String {
        utf8_percent_encode(&self.path, set).to_string()
    }

    /// Render the signing context into an uri.
    ///
    /// Query pairs must have been encoded already.
    pub fn into_uri(self, path_set: &'static AsciiSet) -> Result<Uri> {
        let query_size = self.query_size();

        let mut paq = self.escaped_path(path_set);
        if query_size > 0 {
            paq.reserve(query_size + self.query.len() * 2);

            paq.push('?');
            for (i, (k, v)) in self.query.iter().enumerate() {
                if i > 0 {
                    paq.push('&');
                }

                paq.push_str(k);
                if !v.is_empty() {
                    paq.push('=');
                    paq.push_str(v);
                }
            }
        }

        let mut parts = http::uri::Parts::default();
        parts.scheme = Some(self.scheme);
        parts.authority = Some(self.authority);
        parts.path_and_query = Some(PathAndQuery::from_str(&paq)?);
        Ok(Uri::from_parts(parts)?)
    }

    /// Get query size.
    #[inline]
    pub fn query_size(&self) -> usize {
        self.query
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum::<usize>()
    }

    /// Push a new query pair into query list.
    #[inline]
    pub fn query_push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), value.into()));
    }

    /// Sort query by key and encode it as `application/x-www-form-urlencoded`.
    pub fn query_form_encode(&mut self) {
        self.query.sort();

        self.query = self
            .query
            .iter()
            .map(|(k, v)| {
                (
                    form_urlencoded::byte_serialize(k.as_bytes()).collect(),
                    form_urlencoded::byte_serialize(v.as_bytes()).collect(),
                )
            })
            .collect();
    }

    /// Normalize header value.
    pub fn header_value_normalize(v: &mut HeaderValue) {
        let bs = v.as_bytes();

        let starting_index = bs.iter().position(|b| *b != b' ').unwrap_or(0);
        let ending_offset = bs.iter().rev().position(|b| *b != b' ').unwrap_or(0);
        let ending_index = bs.len() - ending_offset;

        // This can't fail because we started with a valid HeaderValue and then only trimmed spaces
        *v = HeaderValue::from_bytes(&bs[starting_index..ending_index])
            .expect("invalid header value")
    }

    /// Get header names as sorted vector.
    pub fn header_name_to_vec_sorted(&self) -> Vec<&str> {
        let mut h = self
            .headers
            .keys()
            .map(|k| k.as_str())
            .collect::<Vec<&str>>();
        h.sort_unstable();

        h
    }
}
