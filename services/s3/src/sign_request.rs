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

use crate::constants::{
    AWS4_HMAC_SHA256, AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET, MAX_EXPIRES_SECS,
    UNSIGNED_PAYLOAD, X_AMZ_ALGORITHM, X_AMZ_CONTENT_SHA_256, X_AMZ_CREDENTIAL, X_AMZ_DATE,
    X_AMZ_EXPIRES, X_AMZ_SIGNATURE, X_AMZ_SIGNED_HEADERS,
};
use crate::Credential;
use http::header;
use log::debug;
use percent_encoding::utf8_percent_encode;
use presign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use presign_core::time::{format_date, format_iso8601, DateTime};
use presign_core::{Error, Result, SigningRequest};
use std::fmt::Write;
use std::time::Duration;

/// RequestSigner that implements AWS SigV4 pre-signing.
///
/// - [Authenticating Requests: Using Query Parameters](https://docs.aws.amazon.com/AmazonS3/latest/API/sigv4-query-string-auth.html)
/// - [Browser-Based Uploads Using POST](https://docs.aws.amazon.com/AmazonS3/latest/API/sigv4-post-example.html)
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,
}

impl RequestSigner {
    /// Create a new signer for AWS V4.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
        }
    }

    /// Scope: "20220313/<region>/<service>/aws4_request"
    pub fn scope(&self, now: DateTime) -> String {
        format!(
            "{}/{}/{}/aws4_request",
            format_date(now),
            self.region,
            self.service
        )
    }

    /// Credential: "<access_key_id>/<scope>"
    pub fn credential(&self, cred: &Credential, now: DateTime) -> String {
        format!("{}/{}", cred.access_key_id, self.scope(now))
    }

    /// Pre-sign the request in query.
    ///
    /// Every header already in the request is signed, the end client must send them as is.
    /// Query pairs are left encoded with [`AWS_QUERY_ENCODE_SET`].
    pub fn presign(
        &self,
        req: &mut SigningRequest,
        cred: &Credential,
        now: DateTime,
        expires_in: Duration,
    ) -> Result<()> {
        let expires = check_expires(expires_in)?;

        // canonicalize context
        canonicalize_header(req)?;
        canonicalize_query(req, cred, expires, now, &self.scope(now));

        // build canonical request and string to sign.
        let creq = canonical_request_string(req)?;
        debug!("calculated canonical request: {creq}");
        let encoded_req = hex_sha256(creq.as_bytes());

        let scope = self.scope(now);
        debug!("calculated scope: {scope}");

        // StringToSign:
        //
        // AWS4-HMAC-SHA256
        // 20220313T072004Z
        // 20220313/<region>/<service>/aws4_request
        // <hashed_canonical_request>
        let string_to_sign = {
            let mut f = String::new();
            writeln!(f, "{AWS4_HMAC_SHA256}")?;
            writeln!(f, "{}", format_iso8601(now))?;
            writeln!(f, "{}", &scope)?;
            write!(f, "{}", &encoded_req)?;
            f
        };
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key =
            generate_signing_key(&cred.secret_access_key, now, &self.region, &self.service);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        req.query.push((X_AMZ_SIGNATURE.into(), signature));
        Ok(())
    }

    /// Sign a base64 encoded POST policy document.
    ///
    /// The string to sign of a POST policy is the encoded policy itself.
    pub fn sign_policy(&self, policy: &str, cred: &Credential, now: DateTime) -> String {
        let signing_key =
            generate_signing_key(&cred.secret_access_key, now, &self.region, &self.service);
        hex_hmac_sha256(&signing_key, policy.as_bytes())
    }
}

/// Check the validity of a pre-signed request and return it in whole seconds.
///
/// SigV4 accepts at most 7 days.
pub fn check_expires(expires_in: Duration) -> Result<u64> {
    let expires = expires_in.as_secs();
    if expires == 0 || expires > MAX_EXPIRES_SECS {
        return Err(Error::request_invalid(format!(
            "expire_in must be between 1 and {MAX_EXPIRES_SECS} seconds, got {expires_in:?}"
        )));
    }
    Ok(expires)
}

/// Sort query by key and encode with [`AWS_QUERY_ENCODE_SET`].
pub fn encode_query(req: &mut SigningRequest) {
    // Return if query is empty.
    if req.query.is_empty() {
        return;
    }

    // Sort by param name
    req.query.sort();

    req.query = req
        .query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect();
}

fn canonical_request_string(req: &SigningRequest) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    // Insert method
    writeln!(f, "{}", req.method)?;
    // Insert encoded path
    writeln!(f, "{}", req.escaped_path(&AWS_URI_ENCODE_SET))?;
    // Insert query
    writeln!(
        f,
        "{}",
        req.query
            .iter()
            .map(|(k, v)| { format!("{k}={v}") })
            .collect::<Vec<_>>()
            .join("&")
    )?;
    // Insert signed headers
    let signed_headers = req.header_name_to_vec_sorted();
    for header in signed_headers.iter() {
        let value = &req.headers[*header];
        writeln!(f, "{}:{}", header, value.to_str()?)?;
    }
    writeln!(f)?;
    writeln!(f, "{}", signed_headers.join(";"))?;

    match req.headers.get(X_AMZ_CONTENT_SHA_256) {
        None => write!(f, "{UNSIGNED_PAYLOAD}")?,
        Some(v) => write!(f, "{}", v.to_str()?)?,
    }

    Ok(f)
}

fn canonicalize_header(req: &mut SigningRequest) -> Result<()> {
    // Header names and values need to be normalized according to Step 4 of https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html
    for (_, value) in req.headers.iter_mut() {
        SigningRequest::header_value_normalize(value)
    }

    // Insert HOST header if not present.
    if req.headers.get(header::HOST).is_none() {
        req.headers
            .insert(header::HOST, req.authority.as_str().parse()?);
    }

    Ok(())
}

fn canonicalize_query(
    req: &mut SigningRequest,
    cred: &Credential,
    expires: u64,
    now: DateTime,
    scope: &str,
) {
    req.query_push(X_AMZ_ALGORITHM, AWS4_HMAC_SHA256);
    req.query_push(
        X_AMZ_CREDENTIAL,
        format!("{}/{}", cred.access_key_id, scope),
    );
    req.query_push(X_AMZ_DATE, format_iso8601(now));
    req.query_push(X_AMZ_EXPIRES, expires.to_string());
    let signed_headers = req.header_name_to_vec_sorted().join(";");
    req.query_push(X_AMZ_SIGNED_HEADERS, signed_headers);

    encode_query(req);
}

fn generate_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), "aws4_request".as_bytes())
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use aws_credential_types::Credentials;
    use aws_sigv4::http_request::PayloadChecksumKind;
    use aws_sigv4::http_request::PercentEncodingMode;
    use aws_sigv4::http_request::SignableBody;
    use aws_sigv4::http_request::SignableRequest;
    use aws_sigv4::http_request::SignatureLocation;
    use aws_sigv4::http_request::SigningSettings;
    use aws_sigv4::sign::v4;
    use http::{Method, Request};
    use presign_core::time::now;
    use presign_core::{Endpoint, ErrorKind};

    /// (name, path, query)
    type TestCase = (&'static str, &'static str, Vec<(&'static str, &'static str)>);

    fn test_cases() -> Vec<TestCase> {
        vec![
            ("get_object", "/hello", vec![]),
            ("get_object_nested", "/bucket/a/b/c.bin", vec![]),
            (
                "get_object_with_content_type",
                "/hello",
                vec![("response-content-type", "text/plain")],
            ),
            (
                "get_object_with_content_disposition",
                "/hello",
                vec![(
                    "response-content-disposition",
                    "attachment; filename=\"a.txt\"",
                )],
            ),
        ]
    }

    fn format_query(req: &Request<&str>) -> Vec<String> {
        let query = req.uri().query().unwrap_or_default();
        let mut query = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| format!("{}={}", &k, &v))
            .collect::<Vec<_>>();
        query.sort();
        query
    }

    #[tokio::test]
    async fn test_presign_matches_aws_sigv4() {
        let _ = env_logger::builder().is_test(true).try_init();

        for (name, path, query) in test_cases() {
            let now = now();
            let endpoint = Endpoint::parse("http://127.0.0.1:9000").unwrap();

            let mut req = SigningRequest::build(Method::GET, &endpoint, path.to_string());
            for (k, v) in &query {
                req.query_push(*k, *v);
            }
            let signer = RequestSigner::new("s3", "test");
            let cred = Credential::new("access_key_id", "secret_access_key");
            signer
                .presign(&mut req, &cred, now, Duration::from_secs(3600))
                .expect("presign must succeed");
            let actual = Request::get(req.into_uri(&AWS_URI_ENCODE_SET).unwrap())
                .body("")
                .unwrap();

            let mut ss = SigningSettings::default();
            ss.percent_encoding_mode = PercentEncodingMode::Single;
            ss.payload_checksum_kind = PayloadChecksumKind::NoHeader;
            ss.signature_location = SignatureLocation::QueryParams;
            ss.expires_in = Some(Duration::from_secs(3600));
            let id = Credentials::new(
                "access_key_id",
                "secret_access_key",
                None,
                None,
                "hardcoded-credentials",
            )
            .into();
            let sp = v4::SigningParams::builder()
                .identity(&id)
                .region("test")
                .name("s3")
                .time(SystemTime::from(now))
                .settings(ss)
                .build()
                .expect("signing params must be valid");

            let uri = {
                let mut s = format!("http://127.0.0.1:9000{path}");
                let qs = query
                    .iter()
                    .map(|(k, v)| {
                        format!(
                            "{}={}",
                            utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET),
                            utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("&");
                if !qs.is_empty() {
                    s.push('?');
                    s.push_str(&qs);
                }
                s
            };
            let mut expected = Request::get(uri.as_str()).body("").unwrap();
            let output = aws_sigv4::http_request::sign(
                SignableRequest::new("GET", uri.clone(), std::iter::empty(), SignableBody::UnsignedPayload)
                    .unwrap(),
                &sp.into(),
            )
            .expect("signing must succeed");
            let (aws_sig, _) = output.into_parts();
            aws_sig.apply_to_request_http1x(&mut expected);

            assert_eq!(
                format_query(&expected),
                format_query(&actual),
                "{name} query mismatch"
            );
            assert_eq!(expected.uri().path(), actual.uri().path(), "{name} path mismatch");
        }
    }

    #[test]
    fn test_presign_signs_every_header() -> Result<()> {
        let now: DateTime = "2024-05-06T07:08:09Z".parse().unwrap();
        let endpoint = Endpoint::parse("https://bucket.s3.example.com")?;
        let mut req = SigningRequest::build(Method::PUT, &endpoint, "/a/b.bin".to_string());
        req.headers
            .insert(header::CONTENT_LENGTH, http::HeaderValue::from(1024u64));
        req.headers.insert(
            header::CONTENT_TYPE,
            http::HeaderValue::from_static(" application/octet-stream "),
        );

        let signer = RequestSigner::new("s3", "us-east-1");
        let cred = Credential::new("access_key_id", "secret_access_key");
        signer.presign(&mut req, &cred, now, Duration::from_secs(60))?;

        let query: Vec<(String, String)> = req.query.clone();
        let signed = query
            .iter()
            .find(|(k, _)| k == X_AMZ_SIGNED_HEADERS)
            .map(|(_, v)| v.as_str());
        assert_eq!(signed, Some("content-length%3Bcontent-type%3Bhost"));
        assert_eq!(
            req.headers[header::CONTENT_TYPE],
            "application/octet-stream"
        );
        assert!(query.iter().any(|(k, v)| k == X_AMZ_EXPIRES && v == "60"));
        Ok(())
    }

    #[test]
    fn test_presign_rejects_bad_expiry() {
        let now: DateTime = "2024-05-06T07:08:09Z".parse().unwrap();
        let endpoint = Endpoint::parse("https://s3.example.com").unwrap();
        let signer = RequestSigner::new("s3", "us-east-1");
        let cred = Credential::new("access_key_id", "secret_access_key");

        for expire in [Duration::from_millis(500), Duration::from_secs(MAX_EXPIRES_SECS + 1)] {
            let mut req = SigningRequest::build(Method::GET, &endpoint, "/a".to_string());
            let err = signer.presign(&mut req, &cred, now, expire).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::RequestInvalid);
        }
    }

    #[test]
    fn test_signing_key() {
        // Example from https://docs.aws.amazon.com/general/latest/gr/signature-v4-examples.html
        let now: DateTime = "2012-02-15T00:00:00Z".parse().unwrap();
        let key = generate_signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            now,
            "us-east-1",
            "iam",
        );
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }
}
