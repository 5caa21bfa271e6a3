//! Per-episode statistics collected during training.

use std::io;

use serde::{Deserialize, Serialize};

use sarsa2048_stats::{moving_average::MovingAverage, tally::Tally};

/// One row of the training log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// 1-based episode number.
    pub episode_id: usize,
    pub moves: usize,
    pub highest_tile: u32,
    /// Total weight updates so far, this episode included.
    pub update_count: u64,
}

/// Ordered log of finished episodes. Append-only; never read back by the learner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingLog {
    records: Vec<EpisodeRecord>,
}

impl TrainingLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: EpisodeRecord) {
        self.records.push(record);
    }

    #[must_use]
    pub fn records(&self) -> &[EpisodeRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&EpisodeRecord> {
        self.records.last()
    }

    /// Average move count of the last `window` episodes.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn recent_average_moves(&self, window: usize) -> Option<f64> {
        let mut average = MovingAverage::new(window.max(1));
        for record in &self.records {
            average.push(record.moves as f64);
        }
        average.mean()
    }

    /// How often each highest tile was reached, over all episodes.
    #[must_use]
    pub fn highest_tile_tally(&self) -> Tally<u32> {
        Tally::from_values(self.records.iter().map(|r| r.highest_tile))
    }

    /// Writes the log as CSV with header `episode_id,moves,highest_tile,update_count`.
    pub fn write_csv<W>(&self, writer: W) -> Result<(), csv::Error>
    where
        W: io::Write,
    {
        let mut writer = csv::Writer::from_writer(writer);
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}
