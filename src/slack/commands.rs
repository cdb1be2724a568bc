use crate::error::{FunBotError, Result};
use crate::logging::{Timer, log_error};
use crate::lookup::LookupClient;
use crate::slack::attachments::{AttachmentReader, resolve_input};
use crate::slack::{ChannelId, TeamId, UserId};
use crate::snipe::{SnipeCache, SnipeCategory, neutralize};
use crate::transcode::{Delivery, EncodingScheme, PasteSink, Transcoder};
use std::sync::Arc;

const HELP_TEXT: &str = r#"📚 *Available Commands*

`/binary <text>` - Convert text to binary, or binary back to text
`/hex <text>` - Convert text to hex, or hex back to text
`/morse <text>` - Convert text to Morse code, or Morse back to text
`/caesar <text>` - Shift letters with a Caesar cipher
`/snipe [deleted|edited]` - Show the last deleted or edited message here
`/catfact` - Get a random cat fact
`/ip <address>` - Look up where an IP address is
`/help` - Show this help message

*Tip:* attach a text file to `/binary`, `/hex` or `/morse` to convert its contents."#;

/// A parsed bot command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Transcode {
        scheme: EncodingScheme,
        text: String,
    },
    Snipe(SnipeCategory),
    CatFact,
    Ip(String),
    Help,
    Unknown(String),
}

impl Command {
    /// Parse `/name args...`. Returns `None` when the text is not a command.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim_start();
        let body = text.strip_prefix('/')?;

        let (name, args) = match body.find(char::is_whitespace) {
            Some(idx) => (&body[..idx], &body[idx..]),
            None => (body, ""),
        };
        // Strip only the single separator so Morse word gaps survive
        let args = args
            .strip_prefix(|c: char| c.is_whitespace())
            .unwrap_or(args);

        let command = match name.to_ascii_lowercase().as_str() {
            "snipe" => Self::Snipe(SnipeCategory::parse_lenient(args)),
            "catfact" => Self::CatFact,
            "ip" => Self::Ip(args.trim().to_string()),
            "help" => Self::Help,
            other => match other.parse::<EncodingScheme>() {
                Ok(scheme) => Self::Transcode {
                    scheme,
                    text: args.to_string(),
                },
                Err(_) => Self::Unknown(name.to_string()),
            },
        };
        Some(command)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Transcode { scheme, .. } => scheme.as_str(),
            Self::Snipe(_) => "snipe",
            Self::CatFact => "catfact",
            Self::Ip(_) => "ip",
            Self::Help => "help",
            Self::Unknown(name) => name.as_str(),
        }
    }
}

/// Where a command was issued
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub team: TeamId,
    pub channel: ChannelId,
    pub user: UserId,
    /// Private URLs of attached files
    pub files: Vec<String>,
}

/// What the bot sends back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    File {
        filename: String,
        content: String,
        comment: String,
    },
}

pub struct CommandHandler<S, R> {
    transcoder: Transcoder,
    snipe_cache: Arc<SnipeCache>,
    paste_sink: S,
    attachment_reader: R,
    lookup: LookupClient,
}

impl<S: PasteSink, R: AttachmentReader> CommandHandler<S, R> {
    pub fn new(
        transcoder: Transcoder,
        snipe_cache: Arc<SnipeCache>,
        paste_sink: S,
        attachment_reader: R,
        lookup: LookupClient,
    ) -> Self {
        Self {
            transcoder,
            snipe_cache,
            paste_sink,
            attachment_reader,
            lookup,
        }
    }

    /// Run a command and always produce a reply.
    ///
    /// User-facing failures become friendly messages; anything else is
    /// logged and reported generically.
    pub async fn handle(&self, command: Command, ctx: &CommandContext) -> Reply {
        let _timer = Timer::new("handle_command").with_channel(&ctx.channel);
        let name = command.name().to_string();

        tracing::info!(
            command = %name,
            channel_id = %ctx.channel.as_str(),
            user_id = %ctx.user.as_str(),
            "Handling command"
        );

        match self.execute(command, ctx).await {
            Ok(reply) => {
                tracing::debug!(command = %name, "Command completed");
                reply
            }
            Err(e) if e.is_user_facing() => {
                tracing::info!(command = %name, reason = %e, "Command rejected");
                Reply::Text(format!("⚠️ {}", e))
            }
            Err(e) => {
                log_error(&name, &e);
                Reply::Text(format!(
                    "❌ Sorry {}, something went wrong while running `/{}`.",
                    ctx.user.mention(),
                    name
                ))
            }
        }
    }

    async fn execute(&self, command: Command, ctx: &CommandContext) -> Result<Reply> {
        match command {
            Command::Transcode { scheme, text } => self.handle_transcode(scheme, &text, ctx).await,
            Command::Snipe(category) => self.handle_snipe(category, ctx),
            Command::CatFact => Ok(Reply::Text(self.lookup.cat_fact().await?.render())),
            Command::Ip(address) => {
                if address.is_empty() {
                    return Err(FunBotError::InvalidArgument(
                        "usage: `/ip <address>`".to_string(),
                    ));
                }
                Ok(Reply::Text(self.lookup.geolocate(&address).await?.render()))
            }
            Command::Help => Ok(Reply::Text(HELP_TEXT.to_string())),
            Command::Unknown(name) => Ok(Reply::Text(format!(
                "❓ Unknown command: `/{}`\n\nType `/help` for available commands.",
                name
            ))),
        }
    }

    async fn handle_transcode(
        &self,
        scheme: EncodingScheme,
        text: &str,
        ctx: &CommandContext,
    ) -> Result<Reply> {
        let input = if scheme.is_relayed() {
            resolve_input(&self.attachment_reader, text, &ctx.files).await?
        } else {
            text.to_string()
        };

        if input.trim().is_empty() {
            return Err(FunBotError::InvalidArgument(format!(
                "usage: `/{} <text>`",
                scheme
            )));
        }

        let result = self.transcoder.transcode(scheme, &input)?;
        tracing::debug!(
            scheme = %scheme,
            input_len = input.len(),
            output_len = result.text.len(),
            too_long = result.too_long_for_inline,
            "Transcoded input"
        );

        let mention = ctx.user.mention();
        let reply = match self
            .transcoder
            .relay_policy()
            .deliver(&self.paste_sink, result)
            .await
        {
            Delivery::Inline(text) => Reply::Text(format!(
                "{}, *here is your converted text!*\n```{}```",
                mention,
                neutralize(&text)
            )),
            Delivery::Reference(url) => Reply::Text(format!(
                "{}, *here is your converted text!*\n{}",
                mention, url
            )),
            Delivery::Attachment(content) => Reply::File {
                filename: format!("{}-{}.txt", scheme, short_id()),
                content,
                comment: format!(
                    "{}, *here is your converted text!* (too long to post inline)",
                    mention
                ),
            },
        };
        Ok(reply)
    }

    fn handle_snipe(&self, category: SnipeCategory, ctx: &CommandContext) -> Result<Reply> {
        let entry = self
            .snipe_cache
            .most_recent(&ctx.team, &ctx.channel, category)?;
        Ok(Reply::Text(entry.render()))
    }
}

fn short_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LookupConfig;
    use crate::snipe::SnipeEntry;
    use crate::transcode::{ItuMorseTable, RelayPolicy};
    use std::time::Duration;

    struct FakeSink {
        available: bool,
    }

    impl PasteSink for FakeSink {
        async fn submit(&self, _text: &str) -> Result<String> {
            if self.available {
                Ok("https://paste.example.com/xyz".to_string())
            } else {
                Err(FunBotError::RelaySinkUnavailable("down".to_string()))
            }
        }
    }

    struct FakeReader(Vec<Vec<u8>>);

    impl AttachmentReader for FakeReader {
        async fn read_all(&self, _urls: &[String]) -> Result<Vec<Vec<u8>>> {
            Ok(self.0.clone())
        }
    }

    fn handler(
        threshold: usize,
        sink_available: bool,
        files: Vec<Vec<u8>>,
        cache: Arc<SnipeCache>,
    ) -> CommandHandler<FakeSink, FakeReader> {
        let lookup = LookupClient::new(&LookupConfig {
            catfact_url: "http://127.0.0.1:9/fact".to_string(),
            geo_api_url: "http://127.0.0.1:9/json".to_string(),
            http_timeout: Duration::from_secs(1),
        })
        .unwrap();

        CommandHandler::new(
            Transcoder::new(ItuMorseTable::new(), 4, RelayPolicy::new(threshold)),
            cache,
            FakeSink {
                available: sink_available,
            },
            FakeReader(files),
            lookup,
        )
    }

    fn ctx(files: Vec<String>) -> CommandContext {
        CommandContext {
            team: TeamId::new("T1"),
            channel: ChannelId::new("C1"),
            user: UserId::new("U1"),
            files,
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("/binary Hello"),
            Some(Command::Transcode {
                scheme: EncodingScheme::Binary,
                text: "Hello".to_string()
            })
        );
        assert_eq!(
            Command::parse("/MORSE ...   ---"),
            Some(Command::Transcode {
                scheme: EncodingScheme::Morse,
                text: "...   ---".to_string()
            })
        );
        assert_eq!(
            Command::parse("/snipe edited"),
            Some(Command::Snipe(SnipeCategory::Edited))
        );
        assert_eq!(
            Command::parse("/snipe"),
            Some(Command::Snipe(SnipeCategory::Deleted))
        );
        assert_eq!(Command::parse("/ip 1.1.1.1"), Some(Command::Ip("1.1.1.1".to_string())));
        assert_eq!(Command::parse("/help"), Some(Command::Help));
        assert_eq!(
            Command::parse("/dance"),
            Some(Command::Unknown("dance".to_string()))
        );
        assert_eq!(Command::parse("hello there"), None);
    }

    #[tokio::test]
    async fn test_binary_inline_reply() {
        let handler = handler(2000, true, vec![], Arc::new(SnipeCache::default()));
        let reply = handler.handle(Command::parse("/binary Hello").unwrap(), &ctx(vec![])).await;

        assert_eq!(
            reply,
            Reply::Text(
                "<@U1>, *here is your converted text!*\n```01001000 01100101 01101100 01101100 01101111```"
                    .to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_long_result_relayed_to_paste_service() {
        let handler = handler(10, true, vec![], Arc::new(SnipeCache::default()));
        let reply = handler.handle(Command::parse("/binary Hello").unwrap(), &ctx(vec![])).await;

        assert_eq!(
            reply,
            Reply::Text(
                "<@U1>, *here is your converted text!*\nhttps://paste.example.com/xyz".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_paste_failure_uploads_file() {
        let handler = handler(10, false, vec![], Arc::new(SnipeCache::default()));
        let reply = handler
            .handle(Command::parse("/hex Hello there").unwrap(), &ctx(vec![]))
            .await;

        match reply {
            Reply::File {
                filename, content, ..
            } => {
                assert!(filename.starts_with("hex-"));
                assert!(filename.ends_with(".txt"));
                assert_eq!(content, "48656c6c6f207468657265");
            }
            other => panic!("expected file reply, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_attachment_overrides_inline_text() {
        let handler = handler(
            2000,
            true,
            vec![b"48690a".to_vec()],
            Arc::new(SnipeCache::default()),
        );
        let reply = handler
            .handle(
                Command::parse("/hex ignored").unwrap(),
                &ctx(vec!["https://files.slack.com/a.txt".to_string()]),
            )
            .await;

        assert_eq!(
            reply,
            Reply::Text("<@U1>, *here is your converted text!*\n```Hi\n```".to_string())
        );
    }

    #[tokio::test]
    async fn test_inline_reply_neutralizes_backticks() {
        let handler = handler(2000, true, vec![], Arc::new(SnipeCache::default()));
        let reply = handler
            .handle(
                Command::parse("/binary 01100000 01100000 01100000").unwrap(),
                &ctx(vec![]),
            )
            .await;

        assert_eq!(
            reply,
            Reply::Text("<@U1>, *here is your converted text!*\n```ˋˋˋ```".to_string())
        );
    }

    #[tokio::test]
    async fn test_multi_line_attachment_encodes_line_breaks() {
        let handler = handler(
            2000,
            true,
            vec![b"Hi you\nok\n".to_vec()],
            Arc::new(SnipeCache::default()),
        );
        let reply = handler
            .handle(
                Command::parse("/hex").unwrap(),
                &ctx(vec!["https://files.slack.com/notes.txt".to_string()]),
            )
            .await;

        assert_eq!(
            reply,
            Reply::Text(
                "<@U1>, *here is your converted text!*\n```48690a796f750a6f6b```".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_multi_line_morse_attachment_decodes() {
        let handler = handler(
            2000,
            true,
            vec![b".... ..   -\n.... . .-. .\n".to_vec()],
            Arc::new(SnipeCache::default()),
        );
        let reply = handler
            .handle(
                Command::parse("/morse").unwrap(),
                &ctx(vec!["https://files.slack.com/code.txt".to_string()]),
            )
            .await;

        assert_eq!(
            reply,
            Reply::Text("<@U1>, *here is your converted text!*\n```HI THERE```".to_string())
        );
    }

    #[tokio::test]
    async fn test_invalid_attachment_reported() {
        let handler = handler(
            2000,
            true,
            vec![vec![0xc3, 0x28]],
            Arc::new(SnipeCache::default()),
        );
        let reply = handler
            .handle(
                Command::parse("/binary").unwrap(),
                &ctx(vec!["https://files.slack.com/a.bin".to_string()]),
            )
            .await;

        assert!(matches!(
            reply,
            Reply::Text(text) if text.starts_with("⚠️ Attachment is not valid UTF-8")
        ));
    }

    #[tokio::test]
    async fn test_morse_conversion_failure_is_user_message() {
        let handler = handler(2000, true, vec![], Arc::new(SnipeCache::default()));
        let reply = handler.handle(Command::parse("/morse E").unwrap(), &ctx(vec![])).await;

        assert!(matches!(reply, Reply::Text(text) if text.starts_with("⚠️ Conversion failed")));
    }

    #[tokio::test]
    async fn test_caesar_ignores_attachments() {
        let handler = handler(2000, true, vec![b"zzz".to_vec()], Arc::new(SnipeCache::default()));
        let reply = handler
            .handle(
                Command::parse("/caesar abc").unwrap(),
                &ctx(vec!["https://files.slack.com/a.txt".to_string()]),
            )
            .await;

        assert_eq!(
            reply,
            Reply::Text("<@U1>, *here is your converted text!*\n```efg```".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_input_shows_usage() {
        let handler = handler(2000, true, vec![], Arc::new(SnipeCache::default()));
        let reply = handler.handle(Command::parse("/binary   ").unwrap(), &ctx(vec![])).await;

        assert_eq!(
            reply,
            Reply::Text("⚠️ Invalid argument: usage: `/binary <text>`".to_string())
        );
    }

    #[test]
    fn test_snipe_reads_cache() {
        let cache = Arc::new(SnipeCache::default());
        let handler = handler(2000, true, vec![], cache.clone());
        let context = ctx(vec![]);

        let miss =
            tokio_test::block_on(handler.handle(Command::Snipe(SnipeCategory::Deleted), &context));
        assert!(matches!(miss, Reply::Text(text) if text.starts_with("⚠️ Nothing to snipe")));

        cache.record(
            &context.team,
            &context.channel,
            SnipeCategory::Deleted,
            SnipeEntry::deleted(
                context.team.clone(),
                context.channel.clone(),
                UserId::new("U9"),
                "secret",
                vec![],
            ),
        );

        let hit =
            tokio_test::block_on(handler.handle(Command::Snipe(SnipeCategory::Deleted), &context));
        assert!(matches!(
            hit,
            Reply::Text(text) if text.contains("```secret```") && text.contains("<@U9>")
        ));
    }

    #[tokio::test]
    async fn test_ip_requires_valid_address() {
        let handler = handler(2000, true, vec![], Arc::new(SnipeCache::default()));

        let reply = handler.handle(Command::Ip(String::new()), &ctx(vec![])).await;
        assert!(matches!(reply, Reply::Text(text) if text.contains("usage: `/ip <address>`")));

        let reply = handler.handle(Command::Ip("not-an-ip".to_string()), &ctx(vec![])).await;
        assert!(matches!(reply, Reply::Text(text) if text.contains("is not an IP address")));
    }
}
