//! Hastebin-compatible paste service client

use crate::config::RelayConfig;
use crate::error::{FunBotError, Result};
use crate::transcode::PasteSink;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PasteResponse {
    key: Option<String>,
    message: Option<String>,
}

pub struct HastebinSink {
    http: reqwest::Client,
    base_url: String,
}

impl HastebinSink {
    pub fn new(config: &RelayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.paste_base_url.clone(),
        })
    }

    async fn post_document(&self, text: &str) -> Result<PasteResponse> {
        let response = self
            .http
            .post(format!("{}/documents", self.base_url))
            .body(text.to_string())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response)
    }
}

fn reference_from(base_url: &str, response: PasteResponse) -> Result<String> {
    match response.key {
        Some(key) if !key.is_empty() => Ok(format!("{}/{}", base_url, key)),
        _ => Err(FunBotError::RelaySinkUnavailable(
            response
                .message
                .unwrap_or_else(|| "response carried no document key".to_string()),
        )),
    }
}

impl PasteSink for HastebinSink {
    async fn submit(&self, text: &str) -> Result<String> {
        let response = self
            .post_document(text)
            .await
            .map_err(|e| FunBotError::RelaySinkUnavailable(e.to_string()))?;

        reference_from(&self.base_url, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> PasteResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_reference_from_key() {
        let reference = reference_from("https://hastebin.com", parse(r#"{"key":"abcdef"}"#));
        assert_eq!(reference.unwrap(), "https://hastebin.com/abcdef");
    }

    #[test]
    fn test_missing_key_is_unavailable() {
        let err = reference_from(
            "https://hastebin.com",
            parse(r#"{"message":"Document exceeds maximum length."}"#),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FunBotError::RelaySinkUnavailable(msg) if msg == "Document exceeds maximum length."
        ));

        assert!(reference_from("https://hastebin.com", parse(r#"{"key":""}"#)).is_err());
    }
}
