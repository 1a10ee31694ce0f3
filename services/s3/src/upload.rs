use crate::constants::{
    AWS4_HMAC_SHA256, AWS_URI_ENCODE_SET, CHECKSUM_SHA256, DEFAULT_CONTENT_TYPE,
    X_AMZ_CHECKSUM_ALGORITHM, X_AMZ_CHECKSUM_SHA256, X_AMZ_META_PREFIX,
};
use crate::sign_request::check_expires;
use crate::{Credential, PostPolicy, RequestSigner, UploadConfig};
use async_trait::async_trait;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, HOST};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use log::debug;
use presign_core::hash::base64_encode;
use presign_core::path::{object_key, object_path};
use presign_core::time::{add_duration, format_iso8601};
use presign_core::utils::content_disposition;
use presign_core::{
    Context, Endpoint, Error, GenerateUpload, Result, SigningRequest, UploadFields, UploadParams,
    UploadResult,
};

/// UploadGenerator hands out pre-signed uploads into an s3 bucket.
///
/// By default a POST policy is generated so the size, type and checksum of the upload
/// are enforced by the store. With `disable_post` a pre-signed PUT is generated instead,
/// the end client must replay all returned headers.
#[derive(Debug)]
pub struct UploadGenerator {
    config: UploadConfig,
    endpoint: Endpoint,
    credential: Credential,
    signer: RequestSigner,
}

impl UploadGenerator {
    /// Validate the config and create a new generator.
    pub fn new(config: UploadConfig) -> Result<Self> {
        let endpoint = config.bucket_endpoint()?;
        let credential = Credential::new(&config.access_key, &config.secret_key);
        let signer = RequestSigner::new("s3", &config.region);

        Ok(Self {
            config,
            endpoint,
            credential,
            signer,
        })
    }

    fn checksum(&self, params: &UploadParams) -> Option<String> {
        if self.config.disable_checksum {
            return None;
        }
        params.sha256.as_ref().map(|v| base64_encode(v))
    }

    async fn generate_post(&self, ctx: &Context, params: &UploadParams) -> Result<UploadResult> {
        let now = ctx.now();
        check_expires(params.expire_in)?;
        let expiration = add_duration(now, params.expire_in)?;

        let key = object_key(&self.config.prefix, &params.remote_path);
        let mut policy = PostPolicy::new(expiration);
        policy
            .eq("bucket", &self.config.bucket)
            .eq("key", &key)
            .content_length_range(params.size, params.size);

        if let Some(content_type) = &params.content_type {
            policy.eq("Content-Type", content_type);
        }
        if let Some(filename) = &params.attachment_filename {
            policy.eq("Content-Disposition", content_disposition(filename));
        }
        if let Some(checksum) = self.checksum(params) {
            policy
                .eq(X_AMZ_CHECKSUM_ALGORITHM, CHECKSUM_SHA256)
                .eq(X_AMZ_CHECKSUM_SHA256, checksum);
        }
        for (k, v) in &params.metadata {
            policy.eq(&format!("{X_AMZ_META_PREFIX}{k}"), v);
        }

        policy
            .eq("x-amz-date", format_iso8601(now))
            .eq("x-amz-algorithm", AWS4_HMAC_SHA256)
            .eq(
                "x-amz-credential",
                self.signer.credential(&self.credential, now),
            );

        let encoded = policy.encode()?;
        debug!("calculated post policy: {}", policy.to_json()?);
        let signature = self.signer.sign_policy(&encoded, &self.credential, now);

        let mut form_data = policy.into_form_data();
        form_data.insert("policy".to_string(), encoded);
        form_data.insert("x-amz-signature".to_string(), signature);

        Ok(UploadResult {
            method: Method::POST,
            url: self.endpoint.to_uri()?,
            fields: UploadFields::FormData(form_data),
        })
    }

    async fn generate_put(&self, ctx: &Context, params: &UploadParams) -> Result<UploadResult> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from(params.size));
        headers.insert(
            CONTENT_TYPE,
            header_value(
                params
                    .content_type
                    .as_deref()
                    .unwrap_or(DEFAULT_CONTENT_TYPE),
            )?,
        );
        if let Some(checksum) = self.checksum(params) {
            headers.insert(
                X_AMZ_CHECKSUM_ALGORITHM,
                HeaderValue::from_static(CHECKSUM_SHA256),
            );
            headers.insert(X_AMZ_CHECKSUM_SHA256, header_value(&checksum)?);
        }
        for (k, v) in &params.metadata {
            let name = HeaderName::from_bytes(format!("{X_AMZ_META_PREFIX}{k}").as_bytes())
                .map_err(|e| {
                    Error::request_invalid(format!("invalid metadata key: {k}")).with_source(e)
                })?;
            headers.insert(name, header_value(v)?);
        }

        let path = object_path(
            self.endpoint.path(),
            &self.config.prefix,
            &params.remote_path,
        );
        let mut req = SigningRequest::build(Method::PUT, &self.endpoint, path);
        req.headers = headers;
        self.signer
            .presign(&mut req, &self.credential, ctx.now(), params.expire_in)?;

        let mut headers = std::mem::take(&mut req.headers);
        headers.remove(HOST);

        Ok(UploadResult {
            method: Method::PUT,
            url: req.into_uri(&AWS_URI_ENCODE_SET)?,
            fields: UploadFields::Header(headers),
        })
    }
}

#[async_trait]
impl GenerateUpload for UploadGenerator {
    async fn generate_upload(&self, ctx: &Context, params: &UploadParams) -> Result<UploadResult> {
        params.validate()?;

        if self.config.disable_post {
            self.generate_put(ctx, params).await
        } else {
            self.generate_post(ctx, params).await
        }
    }
}

fn header_value(v: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(v)
        .map_err(|e| Error::request_invalid(format!("invalid header value: {v}")).with_source(e))
}
