//! Bounded per-channel history of deleted and edited messages

use crate::error::{FunBotError, Result};
use crate::slack::{ChannelId, TeamId};
use crate::snipe::types::{SnipeCategory, SnipeEntry};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_CAPACITY: usize = 5;

/// Cache statistics for monitoring
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SnipeStats {
    pub recorded: u64,
    pub evicted: u64,
    pub hits: u64,
    pub misses: u64,
}

/// Most-recent-first histories for one channel
#[derive(Debug, Default)]
struct ChannelHistory {
    deleted: VecDeque<SnipeEntry>,
    edited: VecDeque<SnipeEntry>,
}

impl ChannelHistory {
    fn sequence(&self, category: SnipeCategory) -> &VecDeque<SnipeEntry> {
        match category {
            SnipeCategory::Deleted => &self.deleted,
            SnipeCategory::Edited => &self.edited,
        }
    }

    fn sequence_mut(&mut self, category: SnipeCategory) -> &mut VecDeque<SnipeEntry> {
        match category {
            SnipeCategory::Deleted => &mut self.deleted,
            SnipeCategory::Edited => &mut self.edited,
        }
    }
}

/// Process-scoped snipe store.
///
/// Created once at startup and shared by handle between the message observer
/// and the command handler. Nothing is persisted; entries leave only by eviction.
pub struct SnipeCache {
    channels: DashMap<(TeamId, ChannelId), ChannelHistory>,
    capacity: usize,
    recorded: AtomicU64,
    evicted: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SnipeCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        tracing::info!(capacity = capacity, "Creating snipe cache");

        Self {
            channels: DashMap::new(),
            capacity,
            recorded: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Push an entry to the front of a channel's history, evicting the oldest when full
    pub fn record(
        &self,
        guild_id: &TeamId,
        channel_id: &ChannelId,
        category: SnipeCategory,
        entry: SnipeEntry,
    ) {
        let mut history = self
            .channels
            .entry((guild_id.clone(), channel_id.clone()))
            .or_default();
        let sequence = history.sequence_mut(category);

        sequence.push_front(entry);
        let mut evicted = 0;
        while sequence.len() > self.capacity {
            sequence.pop_back();
            evicted += 1;
        }

        self.recorded.fetch_add(1, Ordering::Relaxed);
        self.evicted.fetch_add(evicted, Ordering::Relaxed);

        tracing::debug!(
            team_id = %guild_id.as_str(),
            channel_id = %channel_id.as_str(),
            category = %category,
            len = sequence.len(),
            evicted = evicted,
            "Recorded snipe entry"
        );
    }

    /// Latest entry of the given category for a channel
    pub fn most_recent(
        &self,
        guild_id: &TeamId,
        channel_id: &ChannelId,
        category: SnipeCategory,
    ) -> Result<SnipeEntry> {
        let entry = self
            .channels
            .get(&(guild_id.clone(), channel_id.clone()))
            .and_then(|history| history.sequence(category).front().cloned());

        match entry {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(entry)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    team_id = %guild_id.as_str(),
                    channel_id = %channel_id.as_str(),
                    category = %category,
                    "Snipe cache miss"
                );
                Err(FunBotError::CacheMiss {
                    channel_id: channel_id.as_str().to_string(),
                    category: category.to_string(),
                })
            }
        }
    }

    /// Number of entries held for a channel and category
    pub fn len(
        &self,
        guild_id: &TeamId,
        channel_id: &ChannelId,
        category: SnipeCategory,
    ) -> usize {
        self.channels
            .get(&(guild_id.clone(), channel_id.clone()))
            .map(|history| history.sequence(category).len())
            .unwrap_or(0)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn stats(&self) -> SnipeStats {
        SnipeStats {
            recorded: self.recorded.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Log cache statistics (for shutdown and periodic monitoring)
    pub fn log_stats(&self) {
        let stats = self.stats();
        let lookups = stats.hits + stats.misses;
        let hit_rate = if lookups > 0 {
            (stats.hits as f32 / lookups as f32 * 100.0) as u32
        } else {
            0
        };

        tracing::info!(
            channels = self.channel_count(),
            recorded = stats.recorded,
            evicted = stats.evicted,
            hit_rate = hit_rate,
            "Snipe cache statistics"
        );
    }
}

impl Default for SnipeCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
