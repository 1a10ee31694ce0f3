use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use http::{Method, Uri};
use presign::{
    Client, Config, Context, DownloadParams, ErrorKind, FixedClock, GenerateDownload,
    GenerateUpload, Result, StaticEnv, StaticNonce, UploadParams,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn init_ctx() -> Context {
    let _ = env_logger::builder().is_test(true).try_init();

    let now = "2024-05-06T07:08:09Z".parse().expect("time must be valid");
    Context::new()
        .with_clock(FixedClock::new(now))
        .with_nonce(StaticNonce::new("abc"))
}

fn base_config() -> serde_json::Value {
    json!({
        "endpoint": "https://s3.example.com",
        "bucket": "bucket",
        "bucket_lookup": "dns",
        "prefix": "app",
        "access_key": "access_key",
        "secret_key": "secret_key",
    })
}

fn client(extra: serde_json::Value) -> Result<Client> {
    let mut cfg = base_config();
    if let (Some(base), Some(extra)) = (cfg.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    Client::new(Config::from_json(&cfg.to_string())?)
}

fn query(uri: &Uri) -> HashMap<String, String> {
    form_urlencoded::parse(uri.query().unwrap_or_default().as_bytes())
        .into_owned()
        .collect()
}

#[tokio::test]
async fn test_default_s3_download() -> Result<()> {
    let ctx = init_ctx();
    let client = client(json!({}))?;

    let params = DownloadParams::new("../../etc/passwd", Duration::from_secs(60));
    let uri = client.generate_download(&ctx, &params).await?;

    assert_eq!(uri.host(), Some("bucket.s3.example.com"));
    assert_eq!(uri.path(), "/app/etc/passwd");
    let q = query(&uri);
    assert_eq!(q["X-Amz-Credential"], "access_key/20240506/us-east-1/s3/aws4_request");
    assert_eq!(q["X-Amz-Expires"], "60");
    Ok(())
}

#[tokio::test]
async fn test_default_s3_upload_post() -> Result<()> {
    let ctx = init_ctx();
    let client = client(json!({}))?;

    let params = UploadParams::new("a/b.bin", Duration::from_secs(60), 1024).with_sha256([7; 32]);
    let result = client.generate_upload(&ctx, &params).await?;

    assert_eq!(result.method, Method::POST);
    assert_eq!(result.url.to_string(), "https://bucket.s3.example.com/");
    let form = result.form_data().expect("form data must be set");
    assert_eq!(form["key"], "app/a/b.bin");
    assert_eq!(form["x-amz-checksum-algorithm"], "SHA256");
    assert!(form.contains_key("policy"));
    assert!(form.contains_key("x-amz-signature"));

    let value = serde_json::to_value(&result)?;
    assert_eq!(value["method"], "POST");
    assert_eq!(value["form_data"]["key"], "app/a/b.bin");
    assert!(value.get("header").is_none());
    Ok(())
}

#[tokio::test]
async fn test_s3_upload_put_with_own_config() -> Result<()> {
    let ctx = init_ctx();
    let client = client(json!({
        "upload_generator": {
            "type": "s3",
            "config": {"disable_post": true, "bucket_lookup": "path", "prefix": "uploads"}
        }
    }))?;

    let params = UploadParams::new("a/b.bin", Duration::from_secs(60), 1024)
        .with_content_type("image/png");
    let result = client.generate_upload(&ctx, &params).await?;

    assert_eq!(result.method, Method::PUT);
    assert_eq!(result.url.host(), Some("s3.example.com"));
    assert_eq!(result.url.path(), "/bucket/app/uploads/a/b.bin");
    let headers = result.header().expect("header must be set");
    assert_eq!(headers["content-type"], "image/png");
    assert_eq!(headers["content-length"], "1024");
    Ok(())
}

#[tokio::test]
async fn test_aliyun_cdn_download() -> Result<()> {
    let ctx = init_ctx();
    let client = client(json!({
        "download_generator": {
            "type": "aliyun_cdn",
            "config": {
                "endpoint": "https://cdn.example.com",
                "prefix": "media",
                "auth_mode": "type-a",
                "auth_key": "k"
            }
        }
    }))?;

    let params = DownloadParams::new("x.bin", Duration::from_secs(60));
    let uri = client.generate_download(&ctx, &params).await?;

    assert_eq!(uri.host(), Some("cdn.example.com"));
    assert_eq!(uri.path(), "/app/media/x.bin");
    let q = query(&uri);
    assert!(q["auth_key"].starts_with("1714979289-abc-0-"));
    Ok(())
}

#[tokio::test]
async fn test_tencent_cdn_download() -> Result<()> {
    let ctx = init_ctx();
    let client = client(json!({
        "download_generator": {
            "type": "tencent_cloud_cdn",
            "config": {"endpoint": "https://cdn.example.com", "auth_mode": "type-d", "auth_key": "k"}
        }
    }))?;

    let params = DownloadParams::new("x.bin", Duration::from_secs(60));
    let uri = client.generate_download(&ctx, &params).await?;

    let q = query(&uri);
    assert_eq!(q["t"], "663881d9");
    assert_eq!(uri.path(), format!("/{}/663881d9/app/x.bin", q["sign"]));
    Ok(())
}

#[test]
fn test_invalid_configs() {
    let cases = [
        json!({"download_generator": {"type": "cloudfront"}}),
        json!({"download_generator": {"type": "aliyun_cdn"}}),
        json!({"download_generator": {"type": "tencent_cloud_cdn", "config": {"endpoint": "https://cdn.example.com", "auth_mode": "type-a"}}}),
        json!({"upload_generator": {"type": "s3", "config": {"bucket_lookup": "cname"}}}),
        json!({"bucket_lookup": ""}),
        json!({"secret_key": ""}),
    ];

    for extra in cases {
        let err = client(extra.clone()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid, "{extra}");
    }
}

#[tokio::test]
async fn test_credentials_from_env() -> Result<()> {
    let ctx = init_ctx().with_env(StaticEnv {
        envs: HashMap::from([
            ("AWS_ACCESS_KEY_ID".to_string(), "env_access_key".to_string()),
            ("AWS_SECRET_ACCESS_KEY".to_string(), "env_secret_key".to_string()),
            ("AWS_REGION".to_string(), "ap-east-1".to_string()),
        ]),
    });

    let cfg = Config::from_json(
        r#"{"endpoint": "https://s3.example.com", "bucket": "bucket", "bucket_lookup": "dns"}"#,
    )?
    .from_env(&ctx);
    let client = Client::new(cfg)?;

    let params = DownloadParams::new("a", Duration::from_secs(60));
    let uri = client.generate_download(&ctx, &params).await?;
    assert_eq!(
        query(&uri)["X-Amz-Credential"],
        "env_access_key/20240506/ap-east-1/s3/aws4_request"
    );
    Ok(())
}

#[derive(Debug)]
struct StaticSite;

#[async_trait]
impl GenerateDownload for StaticSite {
    async fn generate_download(&self, _: &Context, params: &DownloadParams) -> Result<Uri> {
        let path = presign::path::object_path("/", "", &params.remote_path);
        Ok(format!("https://static.example.com{path}").parse::<Uri>()?)
    }
}

#[tokio::test]
async fn test_custom_download_generator() -> Result<()> {
    let ctx = init_ctx();
    let client = client(json!({}))?.with_download_generator(StaticSite);

    let params = DownloadParams::new("a/b.bin", Duration::from_secs(60));
    let uri = client.generate_download(&ctx, &params).await?;
    assert_eq!(uri.to_string(), "https://static.example.com/a/b.bin");
    Ok(())
}
