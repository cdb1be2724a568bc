//! Snipe entry types and their display form

use crate::slack::{ChannelId, TeamId, UserId};
use chrono::{DateTime, Utc};
use std::fmt;

/// Which history a snipe query reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SnipeCategory {
    #[default]
    Deleted,
    Edited,
}

impl SnipeCategory {
    /// Parse a user-supplied category. Anything unrecognized means `Deleted`.
    pub fn parse_lenient(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("edited") {
            Self::Edited
        } else {
            Self::Deleted
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deleted => "deleted",
            Self::Edited => "edited",
        }
    }
}

impl fmt::Display for SnipeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnipeContent {
    Text(String),
    Edit { before: String, after: String },
}

/// A captured deleted or edited message
#[derive(Debug, Clone)]
pub struct SnipeEntry {
    pub author_id: UserId,
    pub channel_id: ChannelId,
    pub guild_id: TeamId,
    pub content: SnipeContent,
    pub attachments: Vec<String>,
    pub captured_at: DateTime<Utc>,
}

impl SnipeEntry {
    pub fn deleted(
        guild_id: TeamId,
        channel_id: ChannelId,
        author_id: UserId,
        text: impl Into<String>,
        attachments: Vec<String>,
    ) -> Self {
        Self {
            author_id,
            channel_id,
            guild_id,
            content: SnipeContent::Text(text.into()),
            attachments,
            captured_at: Utc::now(),
        }
    }

    pub fn edited(
        guild_id: TeamId,
        channel_id: ChannelId,
        author_id: UserId,
        before: impl Into<String>,
        after: impl Into<String>,
        attachments: Vec<String>,
    ) -> Self {
        Self {
            author_id,
            channel_id,
            guild_id,
            content: SnipeContent::Edit {
                before: before.into(),
                after: after.into(),
            },
            attachments,
            captured_at: Utc::now(),
        }
    }

    pub fn category(&self) -> SnipeCategory {
        match self.content {
            SnipeContent::Text(_) => SnipeCategory::Deleted,
            SnipeContent::Edit { .. } => SnipeCategory::Edited,
        }
    }

    /// Slack mrkdwn for the snipe reply
    pub fn render(&self) -> String {
        let when = self.captured_at.format("%Y-%m-%d %H:%M:%S UTC");
        let mut lines = Vec::new();

        match &self.content {
            SnipeContent::Text(text) => {
                lines.push(format!(
                    "🔫 *Deleted message from {}* ({})",
                    self.author_id.mention(),
                    when
                ));
                lines.push(code_block(text));
            }
            SnipeContent::Edit { before, after } => {
                lines.push(format!(
                    "🔫 *Edited message from {}* ({})",
                    self.author_id.mention(),
                    when
                ));
                lines.push("*Before:*".to_string());
                lines.push(code_block(before));
                lines.push("*After:*".to_string());
                lines.push(code_block(after));
            }
        }

        if !self.attachments.is_empty() {
            lines.push("*Attachments:*".to_string());
            lines.extend(self.attachments.iter().map(|url| format!("• <{}>", url)));
        }

        lines.join("\n")
    }
}

/// Replace backticks so captured text cannot close the surrounding code block
pub fn neutralize(text: &str) -> String {
    text.replace('`', "ˋ")
}

fn code_block(text: &str) -> String {
    if text.trim().is_empty() {
        "_(no text)_".to_string()
    } else {
        format!("```{}```", neutralize(text))
    }
}
