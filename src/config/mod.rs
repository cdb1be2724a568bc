mod settings;

pub use settings::{
    LookupConfig, RelayConfig, Settings, SlackConfig, SnipeConfig, TranscodeConfig, load_settings,
};
