use presign_core::hash::base64_encode;
use presign_core::time::{format_iso8601_millis, DateTime};
use presign_core::Result;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Condition of a POST policy document.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    /// `["eq", "$<field>", "<value>"]`
    Eq(String, String),
    /// `["content-length-range", min, max]`
    ContentLengthRange(u64, u64),
}

/// PostPolicy collects the conditions of a browser based upload.
///
/// Every `eq` condition is mirrored into the form fields the end client submits.
///
/// Reference: [Creating a POST Policy](https://docs.aws.amazon.com/AmazonS3/latest/API/sigv4-HTTPPOSTConstructPolicy.html)
#[derive(Debug, Clone)]
pub struct PostPolicy {
    expiration: DateTime,
    conditions: Vec<Condition>,
    form_data: BTreeMap<String, String>,
}

impl PostPolicy {
    /// Create a policy that expires at `expiration`.
    pub fn new(expiration: DateTime) -> Self {
        Self {
            expiration,
            conditions: Vec::new(),
            form_data: BTreeMap::new(),
        }
    }

    /// Require form field `field` to equal `value`.
    pub fn eq(&mut self, field: &str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        self.conditions
            .push(Condition::Eq(format!("${field}"), value.clone()));
        self.form_data.insert(field.to_string(), value);
        self
    }

    /// Require the uploaded content length to be within `[min, max]`.
    pub fn content_length_range(&mut self, min: u64, max: u64) -> &mut Self {
        self.conditions
            .push(Condition::ContentLengthRange(min, max));
        self
    }

    /// Render the policy document as JSON.
    pub fn to_json(&self) -> Result<String> {
        let conditions = self
            .conditions
            .iter()
            .map(|c| match c {
                Condition::Eq(k, v) => json!(["eq", k, v]),
                Condition::ContentLengthRange(min, max) => {
                    json!(["content-length-range", min, max])
                }
            })
            .collect::<Vec<Value>>();

        // `expiration` must come first, build the object by hand instead of a map.
        Ok(format!(
            r#"{{"expiration":{},"conditions":{}}}"#,
            serde_json::to_string(&format_iso8601_millis(self.expiration))?,
            serde_json::to_string(&conditions)?
        ))
    }

    /// Base64 encoded policy document, this is also the string to sign.
    pub fn encode(&self) -> Result<String> {
        Ok(base64_encode(self.to_json()?.as_bytes()))
    }

    /// Consume the policy and return the form fields collected so far.
    pub fn into_form_data(self) -> BTreeMap<String, String> {
        self.form_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_post_policy_json() -> Result<()> {
        let expiration: DateTime = "2024-05-06T07:09:09Z".parse().unwrap();
        let mut policy = PostPolicy::new(expiration);
        policy
            .eq("bucket", "bucket")
            .eq("key", "a/b.bin")
            .content_length_range(1024, 1024)
            .eq("Content-Type", "text/plain");

        assert_eq!(
            policy.to_json()?,
            r#"{"expiration":"2024-05-06T07:09:09.000Z","conditions":[["eq","$bucket","bucket"],["eq","$key","a/b.bin"],["content-length-range",1024,1024],["eq","$Content-Type","text/plain"]]}"#
        );

        let form = policy.into_form_data();
        assert_eq!(form.len(), 3);
        assert_eq!(form["key"], "a/b.bin");
        assert_eq!(form["Content-Type"], "text/plain");
        Ok(())
    }

    #[test]
    fn test_post_policy_escapes_values() -> Result<()> {
        let expiration: DateTime = "2024-05-06T07:09:09Z".parse().unwrap();
        let mut policy = PostPolicy::new(expiration);
        policy.eq("Content-Disposition", r#"attachment; filename="a.txt""#);

        let doc: Value = serde_json::from_str(&policy.to_json()?)?;
        assert_eq!(
            doc["conditions"][0][2],
            Value::from(r#"attachment; filename="a.txt""#)
        );
        Ok(())
    }
}
