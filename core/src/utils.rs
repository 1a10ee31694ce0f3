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

//! Utility functions and types.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Deserializer};
use std::fmt::{Debug, Display};
use std::str::FromStr;

/// Redacts a string by replacing all but the first and last three characters with asterisks.
///
/// - If the input string has fewer than 12 characters, it should be entirely redacted.
/// - If the input string has 12 or more characters, only the first three and the last three.
///
/// This design is to allow users to distinguish between different redacted strings but avoid
/// leaking sensitive information.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> Debug for Redact<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let length = self.0.chars().count();
        if length == 0 {
            f.write_str("EMPTY")
        } else if length < 12 {
            f.write_str("***")
        } else {
            let head: String = self.0.chars().take(3).collect();
            let tail: String = self.0.chars().skip(length - 3).collect();
            f.write_str(&head)?;
            f.write_str("***")?;
            f.write_str(&tail)
        }
    }
}

/// `attr-char` from [RFC 5987](https://www.rfc-editor.org/rfc/rfc5987#section-3.2.1).
static RFC5987_ATTR_CHAR: AsciiSet = NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// Compose an `attachment` Content-Disposition value following RFC 6266.
///
/// Legacy clients read the quoted `filename`, which only carries printable ASCII.
/// Modern clients prefer `filename*` with the full UTF-8 name.
///
/// ```
/// use presign_core::utils::content_disposition;
///
/// assert_eq!(
///     content_disposition("a b.txt"),
///     r#"attachment; filename="a b.txt"; filename*=UTF-8''a%20b.txt"#
/// );
/// ```
pub fn content_disposition(filename: &str) -> String {
    let mut quoted = String::with_capacity(filename.len() + 2);
    quoted.push('"');
    for c in filename.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            ' '..='~' => quoted.push(c),
            _ => quoted.push('_'),
        }
    }
    quoted.push('"');

    format!(
        "attachment; filename={quoted}; filename*=UTF-8''{}",
        utf8_percent_encode(filename, &RFC5987_ATTR_CHAR)
    )
}

/// Deserialize an optional value from its string form, treating `""` and `null` as unset.
///
/// ```
/// use presign_core::utils::deserialize_non_empty;
/// use presign_core::BucketLookup;
///
/// #[derive(serde::Deserialize)]
/// struct Config {
///     #[serde(default, deserialize_with = "deserialize_non_empty")]
///     bucket_lookup: Option<BucketLookup>,
/// }
///
/// let cfg: Config = serde_json::from_str(r#"{"bucket_lookup": ""}"#).unwrap();
/// assert!(cfg.bucket_lookup.is_none());
/// ```
pub fn deserialize_non_empty<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(d)? {
        None => Ok(None),
        Some(v) if v.is_empty() => Ok(None),
        Some(v) => v.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
