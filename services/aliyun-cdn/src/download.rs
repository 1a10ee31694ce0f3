use crate::{AuthMode, Config};
use async_trait::async_trait;
use http::{Method, Uri};
use log::debug;
use presign_core::hash::hex_md5;
use presign_core::path::{join, object_path};
use presign_core::time::{add_duration, cst, format_minute, DateTime, FixedOffset};
use presign_core::utils::content_disposition;
use presign_core::{
    Context, DownloadParams, Endpoint, GenerateDownload, Result, SigningRequest,
    URL_PATH_ENCODE_SET,
};

/// DownloadGenerator hands out urls of objects served by Aliyun CDN.
///
/// The signature is an MD5 digest of the escaped path, the timestamp and the auth key.
#[derive(Debug)]
pub struct DownloadGenerator {
    config: Config,
    endpoint: Endpoint,
    timezone: FixedOffset,
}

impl DownloadGenerator {
    /// Validate the config and create a new generator.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let endpoint = Endpoint::parse(&config.endpoint)?;

        Ok(Self {
            config,
            endpoint,
            timezone: cst(),
        })
    }

    /// Set the zone that `type-b` timestamps are formatted in.
    ///
    /// Aliyun CDN expects China Standard Time (UTC+8), which is the default.
    pub fn with_timezone(mut self, tz: FixedOffset) -> Self {
        self.timezone = tz;
        self
    }

    fn sign_at(&self, ctx: &Context, params: &DownloadParams) -> Result<DateTime> {
        let now = ctx.now();
        if self.config.dynamic_expire {
            add_duration(now, params.expire_in)
        } else {
            Ok(now)
        }
    }

    /// `auth_key=<ts>-<rand>-0-md5("<path>-<ts>-<rand>-0-<key>")`
    fn sign_mode_a(&self, ctx: &Context, req: &mut SigningRequest, sign_at: DateTime) {
        let ts = sign_at.timestamp();
        let nonce = ctx.nonce();
        let path = req.escaped_path(&URL_PATH_ENCODE_SET);

        let sign = hex_md5(format!("{path}-{ts}-{nonce}-0-{}", self.config.auth_key).as_bytes());
        req.query_push("auth_key", format!("{ts}-{nonce}-0-{sign}"));
    }

    /// `/<YYYYMMDDHHMM>/md5(<key><YYYYMMDDHHMM><path>)<path>`
    fn sign_mode_b(&self, req: &mut SigningRequest, sign_at: DateTime) {
        let ts = format_minute(sign_at, self.timezone);
        let path = req.escaped_path(&URL_PATH_ENCODE_SET);

        let sign = hex_md5(format!("{}{ts}{path}", self.config.auth_key).as_bytes());
        req.path = join(["/", ts.as_str(), sign.as_str(), req.path.as_str()]);
    }

    /// `/md5(<key><path><hex ts>)/<hex ts><path>`, returns `(sign, ts)`.
    fn sign_mode_c(&self, req: &mut SigningRequest, sign_at: DateTime) -> (String, String) {
        let ts = format!("{:x}", sign_at.timestamp());
        let path = req.escaped_path(&URL_PATH_ENCODE_SET);

        let sign = hex_md5(format!("{}{path}{ts}", self.config.auth_key).as_bytes());
        req.path = join(["/", sign.as_str(), ts.as_str(), req.path.as_str()]);
        (sign, ts)
    }
}

#[async_trait]
impl GenerateDownload for DownloadGenerator {
    async fn generate_download(&self, ctx: &Context, params: &DownloadParams) -> Result<Uri> {
        params.validate()?;

        let path = object_path(
            self.endpoint.path(),
            &self.config.prefix,
            &params.remote_path,
        );
        let mut req = SigningRequest::build(Method::GET, &self.endpoint, path);

        if let Some(content_type) = &params.content_type {
            if !self.config.disable_response_content_type {
                req.query_push("response-content-type", content_type);
            }
        }
        if let Some(filename) = &params.attachment_filename {
            if !self.config.disable_response_content_disposition {
                req.query_push("response-content-disposition", content_disposition(filename));
            }
        }

        let sign_at = self.sign_at(ctx, params)?;
        match self.config.auth_mode {
            AuthMode::None => {}
            AuthMode::A => self.sign_mode_a(ctx, &mut req, sign_at),
            AuthMode::B => self.sign_mode_b(&mut req, sign_at),
            AuthMode::C => {
                self.sign_mode_c(&mut req, sign_at);
            }
            AuthMode::F => {
                let (sign, ts) = self.sign_mode_c(&mut req, sign_at);
                req.query_push("sign", sign);
                req.query_push("time", ts);
            }
        }
        debug!(
            "generated aliyun cdn download url with auth mode {:?}",
            self.config.auth_mode
        );

        req.query_form_encode();
        req.into_uri(&URL_PATH_ENCODE_SET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use presign_core::{ErrorKind, FixedClock, StaticNonce, UuidNonce};
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use test_case::test_case;

    fn ctx() -> Context {
        let now: DateTime = "2024-05-06T07:08:09Z".parse().unwrap();
        Context::new()
            .with_clock(FixedClock::new(now))
            .with_nonce(StaticNonce::new("abc"))
    }

    fn generator(mode: AuthMode) -> DownloadGenerator {
        DownloadGenerator::new(Config {
            endpoint: "https://cdn.example.com".to_string(),
            auth_mode: mode,
            auth_key: "k".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test_case(
        AuthMode::None,
        "https://cdn.example.com/x/y.bin";
        "none"
    )]
    #[test_case(
        AuthMode::A,
        "https://cdn.example.com/x/y.bin?auth_key=1714979289-abc-0-81ca4a3a3585386955322609b9a98796";
        "type a"
    )]
    #[test_case(
        AuthMode::B,
        "https://cdn.example.com/202405061508/24396b5d05a509e3ac777df1aeec8d3d/x/y.bin";
        "type b"
    )]
    #[test_case(
        AuthMode::C,
        "https://cdn.example.com/92bae349f11c34e1656d869ed85885a1/663881d9/x/y.bin";
        "type c"
    )]
    #[test_case(
        AuthMode::F,
        "https://cdn.example.com/92bae349f11c34e1656d869ed85885a1/663881d9/x/y.bin?sign=92bae349f11c34e1656d869ed85885a1&time=663881d9";
        "type f"
    )]
    #[tokio::test]
    async fn test_generate_download(mode: AuthMode, expected: &str) -> Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();

        let params = DownloadParams::new("/x/y.bin", Duration::from_secs(3600));
        let uri = generator(mode).generate_download(&ctx(), &params).await?;
        assert_eq!(uri.to_string(), expected);
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_dynamic_expire() -> Result<()> {
        let generator = DownloadGenerator::new(Config {
            endpoint: "https://cdn.example.com".to_string(),
            auth_mode: AuthMode::C,
            auth_key: "k".to_string(),
            dynamic_expire: true,
            ..Default::default()
        })?;

        let params = DownloadParams::new("x/y.bin", Duration::from_secs(3600));
        let uri = generator.generate_download(&ctx(), &params).await?;
        assert_eq!(
            uri.to_string(),
            "https://cdn.example.com/ea0e29056d1e6117ccd9572f53b633f5/66388fe9/x/y.bin"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_signs_escaped_path() -> Result<()> {
        let generator = DownloadGenerator::new(Config {
            prefix: "media".to_string(),
            endpoint: "https://cdn.example.com".to_string(),
            auth_mode: AuthMode::C,
            auth_key: "k".to_string(),
            ..Default::default()
        })?;

        let params = DownloadParams::new("../a b.bin", Duration::from_secs(3600));
        let uri = generator.generate_download(&ctx(), &params).await?;
        assert_eq!(
            uri.to_string(),
            "https://cdn.example.com/d3dd11d0fdb8407d83d1967a5ffc9b4b/663881d9/media/a%20b.bin"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_with_overrides() -> Result<()> {
        let params = DownloadParams::new("x/y.bin", Duration::from_secs(3600))
            .with_content_type("text/plain")
            .with_attachment_filename("a.txt");

        let uri = generator(AuthMode::None)
            .generate_download(&ctx(), &params)
            .await?;
        assert_eq!(
            uri.to_string(),
            "https://cdn.example.com/x/y.bin?response-content-disposition=attachment%3B+filename%3D%22a.txt%22%3B+filename*%3DUTF-8%27%27a.txt&response-content-type=text%2Fplain"
        );

        let generator = DownloadGenerator::new(Config {
            endpoint: "https://cdn.example.com".to_string(),
            disable_response_content_type: true,
            disable_response_content_disposition: true,
            ..Default::default()
        })?;
        let uri = generator.generate_download(&ctx(), &params).await?;
        assert_eq!(uri.to_string(), "https://cdn.example.com/x/y.bin");
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_mode_b_with_timezone() -> Result<()> {
        let generator = generator(AuthMode::B).with_timezone(FixedOffset::east_opt(0).unwrap());
        let params = DownloadParams::new("x/y.bin", Duration::from_secs(3600));
        let uri = generator.generate_download(&ctx(), &params).await?;
        assert!(uri.path().starts_with("/202405060708/"));
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_rejects_invalid_params() {
        let params = DownloadParams::new("", Duration::from_secs(3600));
        let err = generator(AuthMode::A)
            .generate_download(&ctx(), &params)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }

    #[test]
    fn test_new_rejects_missing_key() {
        let err = DownloadGenerator::new(Config {
            endpoint: "https://cdn.example.com".to_string(),
            auth_mode: AuthMode::F,
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

        let err = DownloadGenerator::new(Config {
            endpoint: "cdn.example.com".to_string(),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[tokio::test]
    async fn test_generate_mode_a_with_uuid_nonce() -> Result<()> {
        let now: DateTime = "2024-05-06T07:08:09Z".parse().unwrap();
        let ctx = Context::new()
            .with_clock(FixedClock::new(now))
            .with_nonce(UuidNonce);

        let params = DownloadParams::new("/x/y.bin", Duration::from_secs(3600));
        let uri = generator(AuthMode::A).generate_download(&ctx, &params).await?;
        assert_eq!(uri.path(), "/x/y.bin");

        let value = uri
            .query()
            .and_then(|q| q.strip_prefix("auth_key="))
            .expect("auth_key must be set");
        let parts: Vec<&str> = value.split('-').collect();
        assert_eq!(parts.len(), 4, "{value}");
        assert_eq!(parts[0], "1714979289");
        assert_eq!(parts[1].len(), 32);
        assert!(parts[1].chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(parts[2], "0");
        assert_eq!(
            parts[3],
            hex_md5(format!("/x/y.bin-1714979289-{}-0-k", parts[1]).as_bytes())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_under_escaped_endpoint_path() -> Result<()> {
        let generator = DownloadGenerator::new(Config {
            endpoint: "https://cdn.example.com/my%20dir".to_string(),
            ..Default::default()
        })?;

        let params = DownloadParams::new("x.bin", Duration::from_secs(3600));
        let uri = generator.generate_download(&ctx(), &params).await?;
        assert_eq!(uri.to_string(), "https://cdn.example.com/my%20dir/x.bin");
        Ok(())
    }

    #[test]
    fn test_debug_redacts_multibyte_key() {
        let generator = DownloadGenerator::new(Config {
            endpoint: "https://cdn.example.com".to_string(),
            auth_mode: AuthMode::A,
            auth_key: "密钥abcdefghij密钥".to_string(),
            ..Default::default()
        })
        .unwrap();

        let output = format!("{generator:?}");
        assert!(output.contains("密钥a***j密钥"), "{output}");
        assert!(!output.contains("abcdefghij"));
    }
}
