//!
//! Segments: maximal runs of the same label in a state path
//!
use crate::common::StateId;
use derive_new::new;
use itertools::Itertools;

/// Run of `state` on positions `[start, end)`
#[derive(new, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub state: StateId,
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.end - self.start
    }
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
    ///
    /// Split a label sequence into its maximal runs
    ///
    /// ```text
    /// 0 0 1 1 1 0  ->  [0:0..2] [1:2..5] [0:5..6]
    /// ```
    pub fn read_sequence(labels: &[StateId]) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut start = 0;
        for (state, run) in &labels.iter().group_by(|&&s| s) {
            let end = start + run.count();
            segments.push(Segment::new(state, start, end));
            start = end;
        }
        segments
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{}:{}..{}]", self.state, self.start, self.end)
    }
}
