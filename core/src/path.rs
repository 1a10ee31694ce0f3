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

//! Lexical path utils for object keys and url paths.
//!
//! Object keys are always composed as `clean_join(prefix, clean("/" + remote_path))`,
//! so a remote path can never climb out of its prefix.

/// Clean a slash separated path lexically.
///
/// Only `/` separates segments, independent of the host OS.
///
/// - Repeated `/` collapse into one.
/// - `.` segments are dropped.
/// - `..` removes the previous segment; at the root it is dropped.
/// - Trailing `/` is removed, an empty result becomes `.` (or `/` if rooted).
pub fn clean(p: &str) -> String {
    if p.is_empty() {
        return ".".to_string();
    }

    let rooted = p.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for seg in p.split('/') {
        match seg {
            "" | "." => {}
            ".." => match segments.last() {
                Some(last) if *last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            s => segments.push(s),
        }
    }

    let joined = segments.join("/");
    if rooted {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Join path elements with `/` and clean the result.
///
/// Empty elements are ignored; if all elements are empty, returns an empty string.
pub fn join<'a>(elems: impl IntoIterator<Item = &'a str>) -> String {
    let parts: Vec<&str> = elems.into_iter().filter(|v| !v.is_empty()).collect();
    if parts.is_empty() {
        return String::new();
    }
    clean(&parts.join("/"))
}

/// Compose the object key of `remote_path` under `prefix`.
///
/// The returned key never starts with `/`.
pub fn object_key(prefix: &str, remote_path: &str) -> String {
    let remote = clean(&format!("/{remote_path}"));
    join([prefix, remote.as_str()])
        .trim_start_matches('/')
        .to_string()
}

/// Compose the url path of `remote_path` under `base` and `prefix`.
///
/// The returned path always starts with `/`.
pub fn object_path(base: &str, prefix: &str, remote_path: &str) -> String {
    let remote = clean(&format!("/{remote_path}"));
    join(["/", base, prefix, remote.as_str()])
}
