use crate::constants::{AWS_URI_ENCODE_SET, RESPONSE_CONTENT_DISPOSITION, RESPONSE_CONTENT_TYPE};
use crate::sign_request::encode_query;
use crate::{Credential, DownloadConfig, RequestSigner};
use async_trait::async_trait;
use http::{Method, Uri};
use log::debug;
use presign_core::path::object_path;
use presign_core::utils::content_disposition;
use presign_core::{Context, DownloadParams, Endpoint, GenerateDownload, Result, SigningRequest};

/// DownloadGenerator hands out pre-signed GET urls of objects in an s3 bucket.
#[derive(Debug)]
pub struct DownloadGenerator {
    config: DownloadConfig,
    endpoint: Endpoint,
    credential: Option<Credential>,
    signer: RequestSigner,
}

impl DownloadGenerator {
    /// Validate the config and create a new generator.
    pub fn new(config: DownloadConfig) -> Result<Self> {
        let endpoint = config.bucket_endpoint()?;
        let credential = if config.public_read {
            None
        } else {
            Some(Credential::new(&config.access_key, &config.secret_key))
        };
        let signer = RequestSigner::new("s3", &config.region);

        Ok(Self {
            config,
            endpoint,
            credential,
            signer,
        })
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
                req.query_push(RESPONSE_CONTENT_TYPE, content_type);
            }
        }
        if let Some(filename) = &params.attachment_filename {
            if !self.config.disable_response_content_disposition {
                req.query_push(RESPONSE_CONTENT_DISPOSITION, content_disposition(filename));
            }
        }

        match &self.credential {
            None => encode_query(&mut req),
            Some(cred) => {
                self.signer
                    .presign(&mut req, cred, ctx.now(), params.expire_in)?
            }
        }
        debug!("generated s3 download url for {}", req.path);

        req.into_uri(&AWS_URI_ENCODE_SET)
    }
}
