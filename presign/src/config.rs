use crate::constants::{AWS_ACCESS_KEY_ID, AWS_REGION, AWS_SECRET_ACCESS_KEY, DEFAULT_REGION};
use crate::{DownloadGeneratorKind, UploadGeneratorKind};
use presign_core::utils::{deserialize_non_empty, Redact};
use presign_core::{BucketLookup, Context, Endpoint, Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::{Debug, Formatter};

/// Backend selection of a generator: `{"type": "<kind>", "config": {...}}`.
///
/// `config` is decoded by the selected backend, a missing `config` decodes as an
/// empty one.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig<K> {
    /// Backend kind.
    #[serde(rename = "type")]
    pub kind: K,
    /// Raw backend config.
    pub config: Value,
}

impl<K> GeneratorConfig<K> {
    /// Select `kind` with its raw config.
    pub fn new(kind: K, config: Value) -> Self {
        Self { kind, config }
    }
}

/// Config for [`Client`](crate::Client).
///
/// Generators inherit endpoint, bucket, credentials and prefix from here when their
/// own config leaves them empty.
#[derive(Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Endpoint of the storage like `https://s3.us-east-1.amazonaws.com`.
    pub endpoint: String,
    /// Bucket name.
    pub bucket: String,
    /// How the bucket is addressed, `dns`, `path` or `cname`.
    #[serde(deserialize_with = "deserialize_non_empty")]
    pub bucket_lookup: Option<BucketLookup>,
    /// Prefix prepended to every object key.
    pub prefix: String,
    /// Region of the bucket.
    ///
    /// - this field if it's not empty
    /// - env value: [`AWS_REGION`]
    /// - `us-east-1`
    pub region: String,
    /// Access key id.
    ///
    /// - this field if it's not empty
    /// - env value: [`AWS_ACCESS_KEY_ID`]
    pub access_key: String,
    /// Secret access key.
    ///
    /// - this field if it's not empty
    /// - env value: [`AWS_SECRET_ACCESS_KEY`]
    pub secret_key: String,

    /// Download backend, defaults to `s3`.
    pub download_generator: GeneratorConfig<DownloadGeneratorKind>,
    /// Upload backend, defaults to `s3`.
    pub upload_generator: GeneratorConfig<UploadGeneratorKind>,
}

impl Config {
    /// Parse config from JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load empty credential and region fields from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if self.access_key.is_empty() {
            if let Some(v) = ctx.env_var(AWS_ACCESS_KEY_ID) {
                self.access_key = v;
            }
        }
        if self.secret_key.is_empty() {
            if let Some(v) = ctx.env_var(AWS_SECRET_ACCESS_KEY) {
                self.secret_key = v;
            }
        }
        if self.region.is_empty() {
            if let Some(v) = ctx.env_var(AWS_REGION) {
                self.region = v;
            }
        }

        self
    }

    /// Check the required fields.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(Error::config_invalid("endpoint is required"));
        }
        Endpoint::parse(&self.endpoint)?;
        if self.bucket.is_empty() {
            return Err(Error::config_invalid("bucket is required"));
        }
        if self.bucket_lookup.is_none() {
            return Err(Error::config_invalid("bucket_lookup is required"));
        }
        if self.access_key.is_empty() {
            return Err(Error::config_invalid("access_key is required"));
        }
        if self.secret_key.is_empty() {
            return Err(Error::config_invalid("secret_key is required"));
        }
        Ok(())
    }

    /// Region of the bucket, `us-east-1` if not set.
    pub fn region(&self) -> &str {
        if self.region.is_empty() {
            DEFAULT_REGION
        } else {
            &self.region
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("bucket_lookup", &self.bucket_lookup)
            .field("prefix", &self.prefix)
            .field("region", &self.region)
            .field("access_key", &Redact::from(&self.access_key))
            .field("secret_key", &Redact::from(&self.secret_key))
            .field("download_generator", &self.download_generator.kind)
            .field("upload_generator", &self.upload_generator.kind)
            .finish()
    }
}
