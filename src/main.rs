use anyhow::Context;
use slack_funbot::config::load_settings;
use slack_funbot::logging::init_tracing;
use slack_funbot::lookup::LookupClient;
use slack_funbot::paste::HastebinSink;
use slack_funbot::slack::{EventHandler, SlackAttachmentReader, SlackClient, SlackCommandHandler};
use slack_funbot::snipe::SnipeCache;
use slack_funbot::transcode::{ItuMorseTable, RelayPolicy, Transcoder};
use std::sync::Arc;
use tokio::signal;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize rustls crypto provider
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    init_tracing();
    tracing::info!("🚀 Starting Slack fun bot");

    let settings = load_settings().context("failed to load configuration")?;
    tracing::info!("✅ Configuration loaded");
    tracing::debug!(
        inline_threshold = settings.relay.inline_threshold,
        paste_base_url = %settings.relay.paste_base_url,
        snipe_capacity = settings.snipe.capacity,
        caesar_offset = settings.transcode.caesar_offset,
        "Effective settings"
    );

    let http = reqwest::Client::builder()
        .timeout(settings.relay.http_timeout)
        .build()
        .context("failed to build HTTP client")?;

    let slack_client = Arc::new(
        SlackClient::new(settings.slack.clone(), http.clone())
            .context("failed to create Slack client")?,
    );
    tracing::info!("Slack client created");

    // One cache for the lifetime of the process, shared by the observer and commands
    let snipe_cache = Arc::new(SnipeCache::new(settings.snipe.capacity));

    let transcoder = Transcoder::new(
        ItuMorseTable::new(),
        settings.transcode.caesar_offset,
        RelayPolicy::new(settings.relay.inline_threshold),
    );
    let command_handler: Arc<SlackCommandHandler> = Arc::new(SlackCommandHandler::new(
        transcoder,
        snipe_cache.clone(),
        HastebinSink::new(&settings.relay).context("failed to create paste client")?,
        SlackAttachmentReader::new(settings.slack.bot_token.clone(), http),
        LookupClient::new(&settings.lookup).context("failed to create lookup client")?,
    ));
    tracing::info!("Command handler initialized");

    let event_handler = EventHandler::new(
        slack_client.clone(),
        command_handler,
        snipe_cache.clone(),
    );

    let result = tokio::select! {
        result = event_handler.start() => {
            tracing::info!("Event handler completed normally");
            result.context("event handler failed")
        }
        signal_name = shutdown_signal() => {
            tracing::info!(signal = %signal_name, "Received shutdown signal");
            Ok(())
        }
    };

    snipe_cache.log_stats();
    tracing::info!("Application shutdown sequence complete");
    result
}

/// Wait for SIGINT (Ctrl+C), SIGTERM, or SIGQUIT on Unix systems
async fn shutdown_signal() -> String {
    #[cfg(unix)]
    {
        use signal::unix::{SignalKind, signal};

        let (Ok(mut sigint), Ok(mut sigterm), Ok(mut sigquit)) = (
            signal(SignalKind::interrupt()),
            signal(SignalKind::terminate()),
            signal(SignalKind::quit()),
        ) else {
            tracing::warn!("Failed to install Unix signal handlers, falling back to Ctrl+C");
            let _ = signal::ctrl_c().await;
            return "Ctrl+C".to_string();
        };

        tokio::select! {
            _ = sigint.recv() => "SIGINT (Ctrl+C)".to_string(),
            _ = sigterm.recv() => "SIGTERM".to_string(),
            _ = sigquit.recv() => "SIGQUIT".to_string(),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = signal::ctrl_c().await;
        "Ctrl+C".to_string()
    }
}
