use std::{fs::File, io::BufWriter, path::Path};

use serde::Serialize;

use crate::{Result, SessionErr};

/// The loss and error of the model at a logged iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsEntry {
    pub iteration: usize,
    pub loss: f32,
    pub error: f32,
}

/// The logged history of a training run, iterations strictly increasing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrainingStats {
    entries: Vec<StatsEntry>,
}

impl TrainingStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    ///
    /// # Panics
    /// In debug builds, if `iteration` isn't past the last recorded one.
    pub fn record(&mut self, iteration: usize, loss: f32, error: f32) {
        debug_assert!(
            self.entries.last().is_none_or(|last| last.iteration < iteration),
            "iteration {iteration} recorded out of order"
        );

        self.entries.push(StatsEntry {
            iteration,
            loss,
            error,
        });
    }

    pub fn entries(&self) -> &[StatsEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iterations(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|e| e.iteration)
    }

    pub fn losses(&self) -> impl Iterator<Item = f32> + '_ {
        self.entries.iter().map(|e| e.loss)
    }

    pub fn errors(&self) -> impl Iterator<Item = f32> + '_ {
        self.entries.iter().map(|e| e.error)
    }

    /// Writes the entries to `path` as a JSON object, ready to be plotted by an external tool.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| SessionErr::io(path, e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .map_err(|e| SessionErr::io(path, e.into()))
    }
}

/// The outcome of an evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub batches: usize,
    pub total_error: f32,
    /// The mean per-batch error, as a percentage.
    pub average_error: f32,
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn accessors_follow_recording_order() {
        let mut stats = TrainingStats::new();
        stats.record(0, 0.5, 0.1);
        stats.record(500, 0.25, 0.05);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats.iterations().collect::<Vec<_>>(), vec![0, 500]);
        assert_eq!(stats.losses().collect::<Vec<_>>(), vec![0.5, 0.25]);
        assert_eq!(stats.errors().collect::<Vec<_>>(), vec![0.1, 0.05]);
    }

    #[test]
    fn writes_entries_as_json() {
        let mut stats = TrainingStats::new();
        stats.record(0, 0.5, 0.25);

        let path = std::env::temp_dir().join(format!("stats-{}.json", std::process::id()));
        stats.write_json(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["entries"][0]["iteration"], 0);
        assert_eq!(json["entries"][0]["loss"], 0.5);
        assert_eq!(json["entries"][0]["error"], 0.25);
    }
}
