//! In-memory recall of recently deleted and edited messages
//!
//! Each (team, channel) pair keeps two bounded most-recent-first histories.
//! The Slack event handler records entries; the `snipe` command reads them.

mod cache;
mod types;

pub use cache::{DEFAULT_CAPACITY, SnipeCache, SnipeStats};
pub use types::{SnipeCategory, SnipeContent, SnipeEntry, neutralize};
