use crate::{AuthMode, Config};
use async_trait::async_trait;
use http::{Method, Uri};
use log::debug;
use presign_core::hash::hex_sha256;
use presign_core::path::{join, object_path};
use presign_core::time::{add_duration, cst, format_minute, FixedOffset};
use presign_core::utils::content_disposition;
use presign_core::{
    Context, DownloadParams, Endpoint, GenerateDownload, Result, SigningRequest,
    URL_PATH_ENCODE_SET,
};

/// DownloadGenerator hands out urls of objects served by Tencent Cloud CDN.
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

    /// Set the zone that `type-b` timestamps are formatted in, defaults to UTC+8.
    pub fn with_timezone(mut self, tz: FixedOffset) -> Self {
        self.timezone = tz;
        self
    }

    fn sign(&self, ctx: &Context, req: &mut SigningRequest, params: &DownloadParams) -> Result<()> {
        let mut sign_at = ctx.now();
        if self.config.dynamic_expire {
            sign_at = add_duration(sign_at, params.expire_in)?;
        }

        let key = &self.config.auth_key;
        let path = req.escaped_path(&URL_PATH_ENCODE_SET);
        match self.config.auth_mode {
            AuthMode::None => {}
            AuthMode::A => {
                let ts = sign_at.timestamp();
                let nonce = ctx.nonce();
                let sign = hex_sha256(format!("{path}-{ts}-{nonce}-0-{key}").as_bytes());
                req.query_push("sign", format!("{ts}-{nonce}-0-{sign}"));
            }
            AuthMode::B => {
                let ts = format_minute(sign_at, self.timezone);
                let sign = hex_sha256(format!("{key}{ts}{path}").as_bytes());
                req.path = join(["/", ts.as_str(), sign.as_str(), req.path.as_str()]);
            }
            AuthMode::C | AuthMode::D => {
                let ts = format!("{:x}", sign_at.timestamp());
                let sign = hex_sha256(format!("{key}{path}{ts}").as_bytes());
                req.path = join(["/", sign.as_str(), ts.as_str(), req.path.as_str()]);

                if self.config.auth_mode == AuthMode::D {
                    req.query_push("sign", sign);
                    req.query_push("t", ts);
                }
            }
        }
        Ok(())
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

        if !self.config.disable_response_content_type {
            if let Some(v) = &params.content_type {
                req.query_push("response-content-type", v);
            }
        }
        if !self.config.disable_response_content_disposition {
            if let Some(v) = &params.attachment_filename {
                req.query_push("response-content-disposition", content_disposition(v));
            }
        }

        self.sign(ctx, &mut req, params)?;
        debug!(
            "generated tencent cloud cdn download url with auth mode {:?}",
            self.config.auth_mode
        );

        req.query_form_encode();
        req.into_uri(&URL_PATH_ENCODE_SET)
    }
}
