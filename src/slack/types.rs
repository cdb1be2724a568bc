use serde::{Deserialize, Serialize};
use std::fmt;

/// Slack workspace ID; plays the role of a guild
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamId(pub String);

impl TeamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Slack mention markup, e.g. `<@U123>`
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadTs(pub String);

impl ThreadTs {
    pub fn new(ts: impl Into<String>) -> Self {
        Self(ts.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageTs(pub String);

impl MessageTs {
    pub fn new(ts: impl Into<String>) -> Self {
        Self(ts.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A command invocation addressed to the bot
#[derive(Debug, Clone)]
pub struct SlackMessage {
    pub team: TeamId,
    pub channel: ChannelId,
    pub user: UserId,
    pub text: String,
    /// Private download URLs of files attached to the message
    pub files: Vec<String>,
    pub thread_ts: Option<ThreadTs>,
    pub ts: MessageTs,
}
