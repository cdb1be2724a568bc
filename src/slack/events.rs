use crate::error::{FunBotError, Result};
use crate::paste::HastebinSink;
use crate::slack::attachments::SlackAttachmentReader;
use crate::slack::{
    ChannelId, Command, CommandContext, CommandHandler, MessageTs, SlackClient, SlackMessage,
    TeamId, ThreadTs, UserId,
};
use crate::snipe::{SnipeCache, SnipeCategory, SnipeEntry};
use dashmap::DashMap;
use regex::Regex;
use slack_morphism::prelude::*;
use std::sync::{Arc, LazyLock};
use std::time::{Duration, Instant};
use tracing::Instrument;

/// Command handler wired to the production collaborators
pub type SlackCommandHandler = CommandHandler<HastebinSink, SlackAttachmentReader>;

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@[A-Z0-9]+>").expect("mention pattern is valid"));

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else {
        format!("{}h", secs / 3600)
    }
}

/// Remove `<@U…>` mention markup and undo Slack's `&`, `<`, `>` escaping
pub fn strip_mentions(text: &str) -> String {
    MENTION_RE
        .replace_all(text, "")
        .trim()
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn message_text(content: Option<&SlackMessageContent>) -> String {
    content.and_then(|c| c.text.clone()).unwrap_or_default()
}

fn file_urls(content: Option<&SlackMessageContent>) -> Vec<String> {
    content
        .and_then(|c| c.files.as_ref())
        .map(|files| {
            files
                .iter()
                .filter_map(|f| f.url_private.as_ref().map(|u| u.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Clone)]
struct BotState {
    command_handler: Arc<SlackCommandHandler>,
    slack_client: Arc<SlackClient>,
    snipe_cache: Arc<SnipeCache>,
    processed_events: Arc<DashMap<String, Instant>>,
}

pub struct EventHandler {
    slack_client: Arc<SlackClient>,
    command_handler: Arc<SlackCommandHandler>,
    snipe_cache: Arc<SnipeCache>,
}

impl EventHandler {
    pub fn new(
        slack_client: Arc<SlackClient>,
        command_handler: Arc<SlackCommandHandler>,
        snipe_cache: Arc<SnipeCache>,
    ) -> Self {
        Self {
            slack_client,
            command_handler,
            snipe_cache,
        }
    }

    /// Start listening for Slack events using Socket Mode
    pub async fn start(self) -> Result<()> {
        tracing::info!("Initializing event handler components");

        let bot_state = BotState {
            command_handler: self.command_handler.clone(),
            slack_client: self.slack_client.clone(),
            snipe_cache: self.snipe_cache.clone(),
            processed_events: Arc::new(DashMap::new()),
        };

        tracing::debug!("Creating listener environment");
        let listener_environment = Arc::new(
            SlackClientEventsListenerEnvironment::new(self.slack_client.get_client())
                .with_error_handler(Self::error_handler)
                .with_user_state(bot_state),
        );

        let callbacks =
            SlackSocketModeListenerCallbacks::new().with_push_events(Self::handle_push_event);

        let socket_mode_listener = SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment,
            callbacks,
        );

        tracing::info!("Connecting to Slack via Socket Mode");
        socket_mode_listener
            .listen_for(self.slack_client.get_app_token())
            .await
            .map_err(|e| FunBotError::SlackApi(e.to_string()))?;

        tracing::info!("Bot is ready to receive messages");
        socket_mode_listener.serve().await;

        Ok(())
    }

    async fn handle_push_event(
        event: SlackPushEventCallback,
        _client: Arc<SlackHyperClient>,
        user_state: SlackClientEventsUserState,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let event_type = match &event.event {
            SlackEventCallbackBody::AppMention(_) => "app_mention",
            SlackEventCallbackBody::Message(_) => "message",
            _ => "other",
        };
        tracing::debug!(event_type = event_type, "Received push event");

        let state: BotState = {
            let storage = user_state.read().await;
            match storage.get_user_state::<BotState>() {
                Some(state) => state.clone(),
                None => {
                    tracing::error!("Bot state missing from listener environment");
                    return Ok(());
                }
            }
        };

        Self::cleanup_old_events(&state.processed_events);

        // Acknowledge quickly; the work happens in the background
        tokio::spawn(async move {
            if let Err(e) = Self::process_event(event, state).await {
                tracing::error!(error = %e, "Event processing failed");
            }
        });

        Ok(())
    }

    async fn process_event(event: SlackPushEventCallback, state: BotState) -> Result<()> {
        let team = TeamId::new(event.team_id.to_string());

        match event.event {
            SlackEventCallbackBody::AppMention(mention) => {
                let event_key = format!("mention:{}:{}", mention.channel, mention.origin.ts);
                if let Some(last_seen) = state.processed_events.get(&event_key) {
                    tracing::debug!(
                        event_key = %event_key,
                        last_seen_ago = format_duration(last_seen.elapsed()),
                        "Duplicate event detected, skipping"
                    );
                    return Ok(());
                }
                state
                    .processed_events
                    .insert(event_key.clone(), Instant::now());

                let message = SlackMessage {
                    team,
                    channel: ChannelId::new(mention.channel.to_string()),
                    user: UserId::new(mention.user.to_string()),
                    text: strip_mentions(&mention.content.text.clone().unwrap_or_default()),
                    files: file_urls(Some(&mention.content)),
                    thread_ts: mention
                        .origin
                        .thread_ts
                        .map(|t| ThreadTs::new(t.to_string())),
                    ts: MessageTs::new(mention.origin.ts.to_string()),
                };

                Self::process_mention(message, &state).await
            }
            SlackEventCallbackBody::Message(message) => {
                Self::observe_message(team, message, &state.snipe_cache);
                Ok(())
            }
            _ => {
                tracing::debug!("Unhandled event type");
                Ok(())
            }
        }
    }

    async fn process_mention(message: SlackMessage, state: &BotState) -> Result<()> {
        let span = tracing::info_span!(
            "app_mention",
            channel_id = %message.channel.as_str(),
            user_id = %message.user.as_str(),
            ts = %message.ts.as_str(),
        );

        Self::run_command(message, state).instrument(span).await
    }

    async fn run_command(message: SlackMessage, state: &BotState) -> Result<()> {
        tracing::debug!(
            text_len = message.text.len(),
            file_count = message.files.len(),
            "App mention received"
        );

        let Some(command) = Command::parse(&message.text) else {
            state
                .slack_client
                .send_message(
                    &message.channel,
                    "👋 Hi! Type `/help` after mentioning me to see what I can do.",
                    message.thread_ts.as_ref(),
                )
                .await?;
            return Ok(());
        };

        let ctx = CommandContext {
            team: message.team.clone(),
            channel: message.channel.clone(),
            user: message.user.clone(),
            files: message.files.clone(),
        };
        let reply = state.command_handler.handle(command, &ctx).await;

        if let Err(e) = state
            .slack_client
            .deliver(&message.channel, message.thread_ts.as_ref(), &reply)
            .await
        {
            tracing::error!(error = %e, "Failed to deliver reply");
            state
                .slack_client
                .send_message(
                    &message.channel,
                    &format!(
                        "❌ {}, I converted your text but could not deliver it.",
                        message.user.mention()
                    ),
                    message.thread_ts.as_ref(),
                )
                .await?;
        }

        Ok(())
    }

    /// Feed deleted and edited messages into the snipe cache
    fn observe_message(team: TeamId, message: SlackMessageEvent, cache: &SnipeCache) {
        let Some(channel) = message.origin.channel.as_ref().map(|c| ChannelId::new(c.to_string()))
        else {
            return;
        };

        match message.subtype {
            Some(SlackMessageEventType::MessageDeleted) => {
                let Some(previous) = message.previous_message else {
                    tracing::debug!("Deleted message without previous content, skipping");
                    return;
                };
                if previous.sender.bot_id.is_some() {
                    return;
                }
                let Some(author) = previous.sender.user.as_ref().map(|u| UserId::new(u.to_string()))
                else {
                    return;
                };

                let entry = SnipeEntry::deleted(
                    team.clone(),
                    channel.clone(),
                    author,
                    message_text(previous.content.as_ref()),
                    file_urls(previous.content.as_ref()),
                );
                cache.record(&team, &channel, SnipeCategory::Deleted, entry);
            }
            Some(SlackMessageEventType::MessageChanged) => {
                let (Some(previous), Some(current)) = (message.previous_message, message.message)
                else {
                    return;
                };
                if current.sender.bot_id.is_some() {
                    return;
                }
                let Some(author) = current.sender.user.as_ref().map(|u| UserId::new(u.to_string()))
                else {
                    return;
                };

                let before = message_text(previous.content.as_ref());
                let after = message_text(current.content.as_ref());
                // Link unfurls also arrive as message_changed
                if before == after {
                    tracing::trace!("Message changed without text edit, skipping");
                    return;
                }

                let entry = SnipeEntry::edited(
                    team.clone(),
                    channel.clone(),
                    author,
                    before,
                    after,
                    file_urls(current.content.as_ref()),
                );
                cache.record(&team, &channel, SnipeCategory::Edited, entry);
            }
            _ => {
                tracing::trace!(subtype = ?message.subtype, "Ignoring message event");
            }
        }
    }

    fn error_handler(
        err: Box<dyn std::error::Error + Send + Sync>,
        _client: Arc<SlackHyperClient>,
        _states: SlackClientEventsUserState,
    ) -> HttpStatusCode {
        tracing::error!(
            error = %err,
            error_kind = std::any::type_name_of_val(&*err),
            "Slack event error"
        );
        HttpStatusCode::OK
    }

    /// Forget processed events older than 1 hour
    fn cleanup_old_events(events: &Arc<DashMap<String, Instant>>) {
        let cutoff = Duration::from_secs(3600);
        let mut removed = 0;

        events.retain(|_key, instant| {
            let keep = instant.elapsed() < cutoff;
            if !keep {
                removed += 1;
            }
            keep
        });

        if removed > 0 {
            tracing::debug!(removed_count = removed, "Cleaned up old events from cache");
        }
    }
}
