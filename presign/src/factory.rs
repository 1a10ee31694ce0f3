use crate::{Config, DownloadGeneratorKind, GeneratorConfig, UploadGeneratorKind};
use log::debug;
use presign_core::path::join;
use presign_core::{BucketLookup, GenerateDownload, GenerateUpload, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Fields a generator inherits from its owning client.
#[derive(Debug, Clone, Default)]
pub struct Inherited {
    /// Endpoint of the storage.
    pub endpoint: String,
    /// Bucket name.
    pub bucket: String,
    /// Bucket lookup of the storage.
    pub bucket_lookup: Option<BucketLookup>,
    /// Prefix of the client, the generator's own prefix is nested under it.
    pub prefix: String,
    /// Resolved region.
    pub region: String,
    /// Access key id.
    pub access_key: String,
    /// Secret access key.
    pub secret_key: String,
}

impl From<&Config> for Inherited {
    fn from(cfg: &Config) -> Self {
        Self {
            endpoint: cfg.endpoint.clone(),
            bucket: cfg.bucket.clone(),
            bucket_lookup: cfg.bucket_lookup,
            prefix: cfg.prefix.clone(),
            region: cfg.region().to_string(),
            access_key: cfg.access_key.clone(),
            secret_key: cfg.secret_key.clone(),
        }
    }
}

/// Inherit is implemented by generator configs that fill unset fields from the client.
pub trait Inherit: Sized {
    /// Return the config with empty fields taken from `parent`.
    fn inherit(self, parent: &Inherited) -> Self;
}

fn fill(v: &mut String, parent: &str) {
    if v.is_empty() {
        parent.clone_into(v);
    }
}

fn nested_prefix(parent: &str, child: &str) -> String {
    join([parent, child])
}

impl Inherit for presign_s3::DownloadConfig {
    fn inherit(mut self, parent: &Inherited) -> Self {
        fill(&mut self.endpoint, &parent.endpoint);
        fill(&mut self.bucket, &parent.bucket);
        fill(&mut self.region, &parent.region);
        fill(&mut self.access_key, &parent.access_key);
        fill(&mut self.secret_key, &parent.secret_key);
        self.bucket_lookup = self.bucket_lookup.or(parent.bucket_lookup);
        self.prefix = nested_prefix(&parent.prefix, &self.prefix);
        self
    }
}

impl Inherit for presign_s3::UploadConfig {
    fn inherit(mut self, parent: &Inherited) -> Self {
        fill(&mut self.endpoint, &parent.endpoint);
        fill(&mut self.bucket, &parent.bucket);
        fill(&mut self.region, &parent.region);
        fill(&mut self.access_key, &parent.access_key);
        fill(&mut self.secret_key, &parent.secret_key);
        self.bucket_lookup = self.bucket_lookup.or(parent.bucket_lookup);
        self.prefix = nested_prefix(&parent.prefix, &self.prefix);
        self
    }
}

// CDN domains are never the storage endpoint, only the prefix is inherited.
impl Inherit for presign_aliyun_cdn::Config {
    fn inherit(mut self, parent: &Inherited) -> Self {
        self.prefix = nested_prefix(&parent.prefix, &self.prefix);
        self
    }
}

impl Inherit for presign_tencent_cdn::Config {
    fn inherit(mut self, parent: &Inherited) -> Self {
        self.prefix = nested_prefix(&parent.prefix, &self.prefix);
        self
    }
}

/// Decode a raw backend config and apply inheritance.
///
/// `null` decodes as the default config.
pub fn merge<T>(raw: &Value, parent: &Inherited) -> Result<T>
where
    T: DeserializeOwned + Default + Inherit,
{
    let cfg = if raw.is_null() {
        T::default()
    } else {
        T::deserialize(raw)?
    };
    Ok(cfg.inherit(parent))
}

/// Build the download generator selected by `selection`.
pub fn build_download_generator(
    selection: &GeneratorConfig<DownloadGeneratorKind>,
    parent: &Inherited,
) -> Result<Arc<dyn GenerateDownload>> {
    debug!("building download generator: {}", selection.kind);

    let raw = &selection.config;
    let generator: Arc<dyn GenerateDownload> = match selection.kind {
        DownloadGeneratorKind::S3 => {
            Arc::new(presign_s3::DownloadGenerator::new(merge(raw, parent)?)?)
        }
        DownloadGeneratorKind::AliyunCdn => {
            Arc::new(presign_aliyun_cdn::DownloadGenerator::new(merge(raw, parent)?)?)
        }
        DownloadGeneratorKind::TencentCloudCdn => {
            Arc::new(presign_tencent_cdn::DownloadGenerator::new(merge(raw, parent)?)?)
        }
    };
    Ok(generator)
}

/// Build the upload generator selected by `selection`.
pub fn build_upload_generator(
    selection: &GeneratorConfig<UploadGeneratorKind>,
    parent: &Inherited,
) -> Result<Arc<dyn GenerateUpload>> {
    debug!("building upload generator: {}", selection.kind);

    let raw = &selection.config;
    let generator: Arc<dyn GenerateUpload> = match selection.kind {
        UploadGeneratorKind::S3 => Arc::new(presign_s3::UploadGenerator::new(merge(raw, parent)?)?),
    };
    Ok(generator)
}
