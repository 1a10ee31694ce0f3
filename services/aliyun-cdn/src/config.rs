use presign_core::utils::Redact;
use presign_core::{Error, Result};
use serde::Deserialize;
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

/// AuthMode is the url authentication type configured on the CDN domain.
///
/// - [Type A](https://help.aliyun.com/zh/cdn/user-guide/type-a-signing)
/// - [Type B](https://help.aliyun.com/zh/cdn/user-guide/type-b-signing)
/// - [Type C](https://help.aliyun.com/zh/cdn/user-guide/type-c-signing)
/// - [Type F](https://help.aliyun.com/zh/cdn/user-guide/authentication-method-f-description)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum AuthMode {
    /// No authentication, configured as `""`.
    #[default]
    None,
    /// `type-a`: signature in query `auth_key`.
    A,
    /// `type-b`: time and signature as leading path segments.
    B,
    /// `type-c`: signature and hex time as leading path segments.
    C,
    /// `type-f`: like `type-c`, and signature and time are repeated in query `sign` and `time`.
    ///
    /// The domain must be configured with hex timestamps and url encoding turned off.
    F,
}

impl FromStr for AuthMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" => Ok(AuthMode::None),
            "type-a" => Ok(AuthMode::A),
            "type-b" => Ok(AuthMode::B),
            "type-c" => Ok(AuthMode::C),
            "type-f" => Ok(AuthMode::F),
            v => Err(Error::config_invalid(format!("unknown auth mode: {v}"))),
        }
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
        match self {
            AuthMode::None => f.write_str(""),
            AuthMode::A => f.write_str("type-a"),
            AuthMode::B => f.write_str("type-b"),
            AuthMode::C => f.write_str("type-c"),
            AuthMode::F => f.write_str("type-f"),
        }
    }
}

/// Config for Aliyun CDN [`DownloadGenerator`](crate::DownloadGenerator).
#[derive(Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix prepended to every object path.
    pub prefix: String,
    /// Don't add `response-content-type` to the url even if params ask for it.
    pub disable_response_content_type: bool,
    /// Don't add `response-content-disposition` to the url even if params ask for it.
    pub disable_response_content_disposition: bool,

    /// CDN url like `https://cdn.example.com`.
    pub endpoint: String,
    /// Authentication type of the CDN domain.
    pub auth_mode: AuthMode,
    /// Primary or secondary key of the authentication config.
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
            return Err(Error::config_invalid(format!(
                "auth key is required for auth mode {}",
                self.auth_mode
            )));
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

#[cfg(test)]
mod tests {
    use super::*;
    use presign_core::ErrorKind;
    use test_case::test_case;

    #[test_case("", AuthMode::None; "none")]
    #[test_case("type-a", AuthMode::A; "a")]
    #[test_case("type-b", AuthMode::B; "b")]
    #[test_case("type-c", AuthMode::C; "c")]
    #[test_case("type-f", AuthMode::F; "f")]
    fn test_auth_mode_from_str(input: &str, expected: AuthMode) {
        assert_eq!(input.parse::<AuthMode>().unwrap(), expected);
        assert_eq!(expected.to_string(), input);
    }

    #[test]
    fn test_deserialize() {
        let cfg: Config = serde_json::from_str(
            r#"{"endpoint": "https://cdn.example.com", "auth_mode": "type-b", "auth_key": "k"}"#,
        )
        .unwrap();
        assert_eq!(cfg.auth_mode, AuthMode::B);
        assert!(!cfg.dynamic_expire);

        let cfg: Config = serde_json::from_str(r#"{"auth_mode": ""}"#).unwrap();
        assert_eq!(cfg.auth_mode, AuthMode::None);
    }

    #[test]
    fn test_deserialize_unknown_mode() {
        let err = serde_json::from_str::<Config>(r#"{"auth_mode": "type-d"}"#)
            .map_err(Error::from)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert!(err.to_string().contains("unknown auth mode"));
    }

    #[test]
    fn test_validate() {
        let cfg = Config {
            endpoint: "https://cdn.example.com".to_string(),
            auth_mode: AuthMode::A,
            ..Default::default()
        };
        assert_eq!(cfg.validate().unwrap_err().kind(), ErrorKind::ConfigInvalid);

        let cfg = Config {
            auth_key: "k".to_string(),
            ..cfg
        };
        assert!(cfg.validate().is_ok());

        let cfg = Config {
            endpoint: String::new(),
            ..cfg
        };
        assert_eq!(cfg.validate().unwrap_err().kind(), ErrorKind::ConfigInvalid);
    }
}
