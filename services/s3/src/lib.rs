//! S3 compatible pre-signed url generators.
//!
//! - [`DownloadGenerator`] builds SigV4 pre-signed GET urls, or plain urls for public buckets.
//! - [`UploadGenerator`] builds POST policies, or pre-signed PUT requests for vendors
//!   without POST support.

mod config;
pub use config::DownloadConfig;
pub use config::UploadConfig;

mod credential;
pub use credential::Credential;

mod sign_request;
pub use sign_request::RequestSigner;

mod post_policy;
pub use post_policy::PostPolicy;

mod download;
pub use download::DownloadGenerator;

mod upload;
pub use upload::UploadGenerator;

mod constants;
