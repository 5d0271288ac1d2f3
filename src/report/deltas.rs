use chrono::NaiveDateTime;

/// Whole-second gaps between consecutive history entries and their mean.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaSummary {
    pub deltas: Vec<i64>,
    pub mean: i64,
}

impl DeltaSummary {
    /// Gaps are truncated toward zero, as is the mean. Fewer than two entries
    /// give no gaps and a zero mean.
    pub fn from_history(history: &[NaiveDateTime]) -> Self {
        let deltas: Vec<i64> = history
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).num_seconds())
            .collect();

        let mean = match deltas.len() {
            0 => 0,
            n => deltas.iter().sum::<i64>() / n as i64,
        };

        Self { deltas, mean }
    }

    pub fn joined(&self) -> String {
        self.deltas
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}
