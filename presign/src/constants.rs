// Env values used by the client config.
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const AWS_REGION: &str = "AWS_REGION";

/// Region used when neither config nor env provides one.
pub const DEFAULT_REGION: &str = "us-east-1";
