use crate::config::SlackConfig;
use crate::error::{FunBotError, Result};
use crate::slack::{ChannelId, MessageTs, Reply, ThreadTs};
use serde::Deserialize;
use serde_json::json;
use slack_morphism::prelude::*;
use std::sync::Arc;

const SLACK_API_BASE: &str = "https://slack.com/api";

#[derive(Debug, Deserialize)]
struct UploadUrlResponse {
    ok: bool,
    upload_url: Option<String>,
    file_id: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiAck {
    ok: bool,
    error: Option<String>,
}

pub struct SlackClient {
    client: Arc<SlackHyperClient>,
    token: SlackApiToken,
    app_token: SlackApiToken,
    bot_token: String,
    http: reqwest::Client,
}

impl SlackClient {
    pub fn new(config: SlackConfig, http: reqwest::Client) -> Result<Self> {
        let connector = SlackClientHyperConnector::new()
            .map_err(|e| FunBotError::SlackApi(e.to_string()))?;

        let client = Arc::new(slack_morphism::SlackClient::new(connector));
        let token = SlackApiToken::new(config.bot_token.clone().into());
        let app_token = SlackApiToken::new(config.app_token.into());

        Ok(Self {
            client,
            token,
            app_token,
            bot_token: config.bot_token,
            http,
        })
    }

    pub fn get_client(&self) -> Arc<SlackHyperClient> {
        self.client.clone()
    }

    pub fn get_app_token(&self) -> &SlackApiToken {
        &self.app_token
    }

    /// Send a message to a channel with Slack markdown formatting
    pub async fn send_message(
        &self,
        channel: &ChannelId,
        text: &str,
        thread_ts: Option<&ThreadTs>,
    ) -> Result<MessageTs> {
        let session = self.client.open_session(&self.token);

        let mut request = SlackApiChatPostMessageRequest::new(
            channel.as_str().into(),
            SlackMessageContent::new().with_text(text.into()),
        );

        if let Some(ts) = thread_ts {
            request.thread_ts = Some(ts.as_str().into());
        }

        request.unfurl_links = Some(false);
        request.unfurl_media = Some(false);

        let response = session
            .chat_post_message(&request)
            .await
            .map_err(|e| FunBotError::SlackApi(e.to_string()))?;

        Ok(MessageTs::new(response.ts.to_string()))
    }

    /// Upload text as a file into a channel.
    ///
    /// Uses the external upload flow: reserve an upload URL, push the bytes,
    /// then share the file into the channel.
    pub async fn upload_text_file(
        &self,
        channel: &ChannelId,
        thread_ts: Option<&ThreadTs>,
        filename: &str,
        content: &str,
        comment: &str,
    ) -> Result<()> {
        let reserved: UploadUrlResponse = self
            .http
            .post(format!("{}/files.getUploadURLExternal", SLACK_API_BASE))
            .bearer_auth(&self.bot_token)
            .form(&[
                ("filename", filename.to_string()),
                ("length", content.len().to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let (upload_url, file_id) = match (reserved.ok, reserved.upload_url, reserved.file_id) {
            (true, Some(url), Some(id)) => (url, id),
            _ => {
                return Err(FunBotError::SlackApi(format!(
                    "files.getUploadURLExternal failed: {}",
                    reserved.error.unwrap_or_else(|| "unknown error".to_string())
                )));
            }
        };

        self.http
            .post(&upload_url)
            .body(content.to_string())
            .send()
            .await?
            .error_for_status()?;

        let mut body = json!({
            "files": [{ "id": file_id, "title": filename }],
            "channel_id": channel.as_str(),
            "initial_comment": comment,
        });
        if let Some(ts) = thread_ts {
            body["thread_ts"] = json!(ts.as_str());
        }

        let ack: ApiAck = self
            .http
            .post(format!("{}/files.completeUploadExternal", SLACK_API_BASE))
            .bearer_auth(&self.bot_token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !ack.ok {
            return Err(FunBotError::SlackApi(format!(
                "files.completeUploadExternal failed: {}",
                ack.error.unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        tracing::info!(
            channel_id = %channel.as_str(),
            file_id = %file_id,
            size = content.len(),
            "Uploaded result as file"
        );
        Ok(())
    }

    /// Deliver a command reply to the channel it came from
    pub async fn deliver(
        &self,
        channel: &ChannelId,
        thread_ts: Option<&ThreadTs>,
        reply: &Reply,
    ) -> Result<()> {
        match reply {
            Reply::Text(text) => {
                self.send_message(channel, text, thread_ts).await?;
            }
            Reply::File {
                filename,
                content,
                comment,
            } => {
                self.upload_text_file(channel, thread_ts, filename, content, comment)
                    .await?;
            }
        }
        Ok(())
    }
}
