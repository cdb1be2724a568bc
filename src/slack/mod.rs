mod attachments;
mod client;
mod commands;
mod events;
mod types;

pub use attachments::{
    AttachmentReader, SlackAttachmentReader, decode_attachments, resolve_input,
};
pub use client::SlackClient;
pub use commands::{Command, CommandContext, CommandHandler, Reply};
pub use events::{EventHandler, SlackCommandHandler, strip_mentions};
pub use types::{ChannelId, MessageTs, SlackMessage, TeamId, ThreadTs, UserId};
