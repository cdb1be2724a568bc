//! Reading text out of files attached to a command message

use crate::error::{FunBotError, Result};
use std::future::Future;

/// Fetches the raw bytes of each attachment, in order
pub trait AttachmentReader: Send + Sync {
    fn read_all(&self, urls: &[String]) -> impl Future<Output = Result<Vec<Vec<u8>>>> + Send;
}

/// Downloads Slack `url_private` files with the bot token
pub struct SlackAttachmentReader {
    http: reqwest::Client,
    bot_token: String,
}

impl SlackAttachmentReader {
    pub fn new(bot_token: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            http,
            bot_token: bot_token.into(),
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .http
            .get(url)
            .bearer_auth(&self.bot_token)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        tracing::debug!(url = %url, size = bytes.len(), "Downloaded attachment");
        Ok(bytes.to_vec())
    }
}

impl AttachmentReader for SlackAttachmentReader {
    async fn read_all(&self, urls: &[String]) -> Result<Vec<Vec<u8>>> {
        futures::future::try_join_all(urls.iter().map(|url| self.download(url))).await
    }
}

/// Decode attachment bytes as UTF-8 text.
///
/// Spaces become line breaks, so every token of the file sits on its own
/// line; multiple attachments are joined with a line break.
pub fn decode_attachments(blobs: Vec<Vec<u8>>) -> Result<String> {
    let texts = blobs
        .into_iter()
        .enumerate()
        .map(|(i, blob)| {
            String::from_utf8(blob)
                .map(|text| normalize_line_breaks(&text))
                .map_err(|e| FunBotError::AttachmentDecode(format!("attachment {}: {}", i + 1, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(texts.join("\n"))
}

fn normalize_line_breaks(text: &str) -> String {
    text.trim_end_matches(['\r', '\n'])
        .replace("\r\n", "\n")
        .replace(['\r', ' '], "\n")
}

/// Attachment text wins over the inline argument when any files were sent
pub async fn resolve_input(
    reader: &impl AttachmentReader,
    inline: &str,
    files: &[String],
) -> Result<String> {
    if files.is_empty() {
        return Ok(inline.to_string());
    }

    tracing::debug!(count = files.len(), "Reading input from attachments");
    let blobs = reader.read_all(files).await?;
    decode_attachments(blobs)
}
