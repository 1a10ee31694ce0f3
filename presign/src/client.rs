use crate::factory::{build_download_generator, build_upload_generator, Inherited};
use crate::Config;
use async_trait::async_trait;
use http::Uri;
use log::debug;
use presign_core::{
    Context, DownloadParams, GenerateDownload, GenerateUpload, Result, UploadParams,
    UploadResult,
};
use std::sync::Arc;

/// Client owns one download generator and one upload generator.
///
/// Both are built once from [`Config`] and never change afterwards, calls are
/// forwarded to whichever backend was selected.
#[derive(Debug, Clone)]
pub struct Client {
    download: Arc<dyn GenerateDownload>,
    upload: Arc<dyn GenerateUpload>,
}

impl Client {
    /// Validate the config and build both generators.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        debug!("building presign client: {config:?}");

        let parent = Inherited::from(&config);
        let download = build_download_generator(&config.download_generator, &parent)?;
        let upload = build_upload_generator(&config.upload_generator, &parent)?;

        Ok(Self { download, upload })
    }

    /// Replace the download generator with a custom one.
    pub fn with_download_generator(mut self, generator: impl GenerateDownload) -> Self {
        self.download = Arc::new(generator);
        self
    }

    /// Replace the upload generator with a custom one.
    pub fn with_upload_generator(mut self, generator: impl GenerateUpload) -> Self {
        self.upload = Arc::new(generator);
        self
    }
}

#[async_trait]
impl GenerateDownload for Client {
    async fn generate_download(&self, ctx: &Context, params: &DownloadParams) -> Result<Uri> {
        self.download.generate_download(ctx, params).await
    }
}

#[async_trait]
impl GenerateUpload for Client {
    async fn generate_upload(&self, ctx: &Context, params: &UploadParams) -> Result<UploadResult> {
        self.upload.generate_upload(ctx, params).await
    }
}
