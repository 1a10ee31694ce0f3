use presign_core::utils::{deserialize_non_empty, Redact};
use presign_core::{BucketLookup, Endpoint, Error, Result};
use serde::Deserialize;
use std::fmt::{Debug, Formatter};

/// Config for [`DownloadGenerator`](crate::DownloadGenerator).
#[derive(Default, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Prefix prepended to every object key.
    pub prefix: String,
    /// Don't add `response-content-type` to the url even if params ask for it.
    pub disable_response_content_type: bool,
    /// Don't add `response-content-disposition` to the url even if params ask for it.
    pub disable_response_content_disposition: bool,

    /// Endpoint like `https://s3.us-east-1.amazonaws.com`.
    pub endpoint: String,
    /// Bucket name.
    pub bucket: String,
    /// How the bucket is addressed, `dns`, `path` or `cname`.
    #[serde(deserialize_with = "deserialize_non_empty")]
    pub bucket_lookup: Option<BucketLookup>,
    /// Region used in the signing scope.
    pub region: String,

    /// The bucket is publicly readable, urls are returned unsigned.
    pub public_read: bool,
    /// Access key id.
    #[serde(alias = "accessKey")]
    pub access_key: String,
    /// Secret access key.
    #[serde(alias = "secretKey")]
    pub secret_key: String,
}

impl DownloadConfig {
    /// Validate config and build the base url of the bucket.
    pub(crate) fn bucket_endpoint(&self) -> Result<Endpoint> {
        let lookup = required_common(&self.endpoint, &self.bucket, &self.region, self.bucket_lookup)?;
        if !self.public_read && (self.access_key.is_empty() || self.secret_key.is_empty()) {
            return Err(Error::config_invalid(
                "access key and secret key are required when public_read is false",
            ));
        }

        Endpoint::parse(&self.endpoint)?.with_bucket(&self.bucket, lookup)
    }
}

impl Debug for DownloadConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadConfig")
            .field("prefix", &self.prefix)
            .field(
                "disable_response_content_type",
                &self.disable_response_content_type,
            )
            .field(
                "disable_response_content_disposition",
                &self.disable_response_content_disposition,
            )
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("bucket_lookup", &self.bucket_lookup)
            .field("region", &self.region)
            .field("public_read", &self.public_read)
            .field("access_key", &Redact::from(&self.access_key))
            .field("secret_key", &Redact::from(&self.secret_key))
            .finish()
    }
}

/// Config for [`UploadGenerator`](crate::UploadGenerator).
#[derive(Default, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Prefix prepended to every object key.
    pub prefix: String,

    /// Endpoint like `https://s3.us-east-1.amazonaws.com`.
    pub endpoint: String,
    /// Bucket name.
    pub bucket: String,
    /// How the bucket is addressed, `dns` or `path`.
    ///
    /// `cname` is not supported for uploads.
    #[serde(deserialize_with = "deserialize_non_empty")]
    pub bucket_lookup: Option<BucketLookup>,
    /// Region used in the signing scope.
    pub region: String,

    /// Access key id.
    #[serde(alias = "accessKey")]
    pub access_key: String,
    /// Secret access key.
    #[serde(alias = "secretKey")]
    pub secret_key: String,

    /// Don't enforce the sha256 checksum of uploads.
    ///
    /// Some vendors don't support `x-amz-checksum-sha256`. Turning this off means the
    /// content of an upload is no longer verified.
    pub disable_checksum: bool,
    /// Fall back to pre-signed PUT for vendors without POST policy support.
    pub disable_post: bool,
}

impl UploadConfig {
    /// Validate config and build the base url of the bucket.
    pub(crate) fn bucket_endpoint(&self) -> Result<Endpoint> {
        let lookup = required_common(&self.endpoint, &self.bucket, &self.region, self.bucket_lookup)?;
        if self.access_key.is_empty() || self.secret_key.is_empty() {
            return Err(Error::config_invalid(
                "access key and secret key are required",
            ));
        }
        if lookup == BucketLookup::Cname {
            return Err(Error::config_invalid(
                "custom domain by cname is not supported for uploads",
            ));
        }

        Endpoint::parse(&self.endpoint)?.with_bucket(&self.bucket, lookup)
    }
}

impl Debug for UploadConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadConfig")
            .field("prefix", &self.prefix)
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("bucket_lookup", &self.bucket_lookup)
            .field("region", &self.region)
            .field("access_key", &Redact::from(&self.access_key))
            .field("secret_key", &Redact::from(&self.secret_key))
            .field("disable_checksum", &self.disable_checksum)
            .field("disable_post", &self.disable_post)
            .finish()
    }
}

fn required_common(
    endpoint: &str,
    bucket: &str,
    region: &str,
    bucket_lookup: Option<BucketLookup>,
) -> Result<BucketLookup> {
    if endpoint.is_empty() {
        return Err(Error::config_invalid("endpoint is required"));
    }
    if bucket.is_empty() {
        return Err(Error::config_invalid("bucket is required"));
    }
    if region.is_empty() {
        return Err(Error::config_invalid("region is required"));
    }
    bucket_lookup.ok_or_else(|| Error::config_invalid("bucket lookup is required"))
}
