use presign_core::{Error, Result};
use serde::Deserialize;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Backend that generates download urls.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum DownloadGeneratorKind {
    /// Pre-signed urls of the bucket itself, configured as `s3` or left empty.
    #[default]
    S3,
    /// Urls on an Aliyun CDN domain, configured as `aliyun_cdn`.
    AliyunCdn,
    /// Urls on a Tencent Cloud CDN domain, configured as `tencent_cloud_cdn`.
    TencentCloudCdn,
}

impl FromStr for DownloadGeneratorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" | "s3" => Ok(Self::S3),
            "aliyun_cdn" => Ok(Self::AliyunCdn),
            "tencent_cloud_cdn" => Ok(Self::TencentCloudCdn),
            v => Err(Error::config_invalid(format!(
                "unknown download generator type: {v}"
            ))),
        }
    }
}

impl TryFrom<String> for DownloadGeneratorKind {
    type Error = Error;

    fn try_from(v: String) -> Result<Self> {
        v.parse()
    }
}

impl Display for DownloadGeneratorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::S3 => f.write_str("s3"),
            Self::AliyunCdn => f.write_str("aliyun_cdn"),
            Self::TencentCloudCdn => f.write_str("tencent_cloud_cdn"),
        }
    }
}

/// Backend that generates uploads.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum UploadGeneratorKind {
    /// POST policies or pre-signed PUT requests of the bucket, configured as `s3` or left empty.
    #[default]
    S3,
}

impl FromStr for UploadGeneratorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" | "s3" => Ok(Self::S3),
            v => Err(Error::config_invalid(format!(
                "unknown upload generator type: {v}"
            ))),
        }
    }
}

impl TryFrom<String> for UploadGeneratorKind {
    type Error = Error;

    fn try_from(v: String) -> Result<Self> {
        v.parse()
    }
}

impl Display for UploadGeneratorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::S3 => f.write_str("s3"),
        }
    }
}
