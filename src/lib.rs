pub mod config;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod paste;
pub mod slack;
pub mod snipe;
pub mod transcode;

pub use error::{FunBotError, Result};
