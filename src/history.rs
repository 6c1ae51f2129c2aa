// src/history.rs
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JumpRecord {
    pub height_cm: f64,
}

/// Append-only log of completed jumps, in the order they landed
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    records: Vec<JumpRecord>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: JumpRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[JumpRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The `n` highest jumps, best first. Equal heights keep landing order.
    pub fn top(&self, n: usize) -> Vec<JumpRecord> {
        self.top_indexed(n).into_iter().map(|(_, r)| r).collect()
    }

    /// Like `top`, paired with each record's position in the history
    pub fn top_indexed(&self, n: usize) -> Vec<(usize, JumpRecord)> {
        let mut ranked: Vec<(usize, JumpRecord)> = self.records.iter().copied().enumerate().collect();
        // sort_by is stable, so ties stay in chronological order
        ranked.sort_by(|a, b| b.1.height_cm.total_cmp(&a.1.height_cm));
        ranked.truncate(n);
        ranked
    }

    pub fn best(&self) -> Option<JumpRecord> {
        self.top(1).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(heights: &[f64]) -> SessionHistory {
        let mut h = SessionHistory::new();
        for height_cm in heights {
            h.record(JumpRecord { height_cm: *height_cm });
        }
        h
    }

    fn heights(records: &[JumpRecord]) -> Vec<f64> {
        records.iter().map(|r| r.height_cm).collect()
    }

    #[test]
    fn test_top_three() {
        let h = history(&[10.2, 34.3, 5.0, 40.1]);
        assert_eq!(heights(&h.top(3)), vec![40.1, 34.3, 10.2]);
    }

    #[test]
    fn test_top_shorter_history() {
        let h = history(&[12.0]);
        assert_eq!(heights(&h.top(3)), vec![12.0]);
        assert!(SessionHistory::new().top(3).is_empty());
    }

    #[test]
    fn test_records_keep_chronological_order() {
        let h = history(&[10.2, 34.3, 5.0]);
        h.top(2);
        assert_eq!(heights(h.records()), vec![10.2, 34.3, 5.0]);
    }

    #[test]
    fn test_ties_keep_earliest_first() {
        let mut h = SessionHistory::new();
        h.record(JumpRecord { height_cm: 20.0 });
        h.record(JumpRecord { height_cm: 30.0 });
        h.record(JumpRecord { height_cm: 20.0 });
        h.record(JumpRecord { height_cm: 20.0 });

        let top = h.top_indexed(3);
        let positions: Vec<usize> = top.iter().map(|(i, _)| *i).collect();
        assert_eq!(positions, vec![1, 0, 2]);
        assert_eq!(heights(&h.top(3)), vec![30.0, 20.0, 20.0]);
        assert_eq!(h.best(), Some(JumpRecord { height_cm: 30.0 }));
    }
}
