use presign_core::utils::Redact;
use presign_core::{Error, Result};
use serde::Deserialize;
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

/// AuthMode is the url authentication type configured on the CDN domain.
///
/// - [Type A](https://cloud.tencent.com/document/product/228/41623), signature parameter `sign`
/// - [Type B](https://cloud.tencent.com/document/product/228/41871)
/// - [Type C](https://cloud.tencent.com/document/product/228/41624)
/// - [Type D](https://cloud.tencent.com/document/product/228/41625), signature parameter `sign`,
///   timestamp parameter `t` in hex
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum AuthMode {
    /// No authentication.
    #[default]
    None,
    /// `type-a`
    A,
    /// `type-b`
    B,
    /// `type-c`
    C,
    /// `type-d`
    D,
}

impl FromStr for AuthMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mode = match s {
            "" => AuthMode::None,
            "type-a" => AuthMode::A,
            "type-b" => AuthMode::B,
            "type-c" => AuthMode::C,
            "type-d" => AuthMode::D,
            v => return Err(Error::config_invalid(format!("unknown auth mode: {v}"))),
        };
        Ok(mode)
    }
}

impl TryFrom<String> for AuthMode {
    type Error = Error;

    fn try_from(v: String) -> Result<Self> {
        v.parse()
    }
}

impl Display for AuthMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let v = match self {
            AuthMode::None => "",
            AuthMode::A => "type-a",
            AuthMode::B => "type-b",
            AuthMode::C => "type-c",
            AuthMode::D => "type-d",
        };
        f.write_str(v)
    }
}

/// Config for Tencent Cloud CDN [`DownloadGenerator`](crate::DownloadGenerator).
#[derive(Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix prepended to every object path.
    pub prefix: String,
    /// Don't add `response-content-type` to the url.
    pub disable_response_content_type: bool,
    /// Don't add `response-content-disposition` to the url.
    pub disable_response_content_disposition: bool,

    /// CDN url like `https://cdn.example.com`.
    pub endpoint: String,
    /// Authentication type of the CDN domain.
    pub auth_mode: AuthMode,
    /// Primary or backup key of the authentication config.
    pub auth_key: String,
    /// Sign with the expiry time instead of the current time.
    ///
    /// The validity period configured on the CDN domain must be set to 0 when enabled.
    pub dynamic_expire: bool,
}

impl Config {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(Error::config_invalid("endpoint is required"));
        }
        if self.auth_mode != AuthMode::None && self.auth_key.is_empty() {
            return Err(Error::config_invalid("auth key is required"));
        }
        Ok(())
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
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
            .field("auth_mode", &self.auth_mode)
            .field("auth_key", &Redact::from(&self.auth_key))
            .field("dynamic_expire", &self.dynamic_expire)
            .finish()
    }
}
