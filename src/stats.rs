//! Lifetime statistics shown on the start screen.
//!
//! Stored as one JSON blob `{games, best, total, avg}` that is fully
//! overwritten after every completed round. Anything unreadable counts as "no
//! prior stats".

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsRecord {
    /// Completed rounds.
    pub games: u32,
    /// Best round, in percent.
    pub best: u32,
    /// Sum of all round percentages.
    pub total: u64,
    /// `round(total / games)`.
    pub avg: u32,
}

impl StatsRecord {
    pub fn record(&mut self, percent: u32) {
        self.games += 1;
        self.best = self.best.max(percent);
        self.total += u64::from(percent);
        self.avg = (self.total as f64 / f64::from(self.games)).round() as u32;
    }

    /// Lenient decode: missing fields default, garbage yields the default record.
    pub fn decode(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        serde_json::from_str(raw).unwrap_or_else(|e| {
            log::warn!("ignoring unreadable stats ({e})");
            Self::default()
        })
    }

    pub fn encode(&self) -> Result<String, QuizError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Key-value persistence for the stats record.
pub trait StatsStore {
    fn load(&self) -> StatsRecord;
    fn save(&mut self, stats: &StatsRecord) -> Result<(), QuizError>;
}

/// Process-local store used natively and when browser storage is blocked.
#[derive(Debug, Default)]
pub struct MemoryStats {
    blob: Option<String>,
}

impl MemoryStats {
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self { blob: Some(blob.into()) }
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl StatsStore for MemoryStats {
    fn load(&self) -> StatsRecord {
        StatsRecord::decode(self.blob.as_deref())
    }

    fn save(&mut self, stats: &StatsRecord) -> Result<(), QuizError> {
        self.blob = Some(stats.encode()?);
        Ok(())
    }
}

/// Fold one finished round into the store. Reads fresh so a stale copy never
/// overwrites newer data.
pub fn record_round(store: &mut dyn StatsStore, percent: u32) -> Result<StatsRecord, QuizError> {
    let mut stats = store.load();
    stats.record(percent);
    store.save(&stats)?;
    log::info!(
        "stats updated: games {}, best {}%, avg {}%",
        stats.games,
        stats.best,
        stats.avg
    );
    Ok(stats)
}
