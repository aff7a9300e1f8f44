//! Mapping remote progress onto the reported 0..=100 scale.

/// Highest value reported before the backend says `completed`.
const PRE_COMPLETION_CEILING: f64 = 99.0;

/// How remote progress is turned into reported progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ProgressMapping {
    /// Use the backend's percentage as is.
    #[default]
    Verbatim,
    /// `baseline + min(remote * scale, cap)`. The baseline is reported as soon
    /// as the submission is acknowledged, before the backend reports anything.
    Blended { baseline: f64, scale: f64, cap: f64 },
}

/// Per-run progress state. Reported values never decrease and stay below 100
/// until completion.
#[derive(Debug, Clone)]
pub(crate) struct ProgressTracker {
    mapping: ProgressMapping,
    last: u8,
}

impl ProgressTracker {
    pub(crate) fn new(mapping: ProgressMapping) -> Self {
        Self { mapping, last: 0 }
    }

    /// Progress to report once the submitter hands back a job id.
    pub(crate) fn acknowledged(&mut self) -> u8 {
        if let ProgressMapping::Blended { baseline, .. } = self.mapping {
            self.raise(baseline);
        }
        self.last
    }

    /// Fold one remote reading into the reported value.
    pub(crate) fn observe(&mut self, remote: Option<f64>) -> u8 {
        let Some(raw) = remote.filter(|p| p.is_finite()) else {
            return self.last;
        };
        let raw = raw.clamp(0.0, 100.0);
        let mapped = match self.mapping {
            ProgressMapping::Verbatim => raw,
            ProgressMapping::Blended {
                baseline,
                scale,
                cap,
            } => baseline + (raw * scale).min(cap),
        };
        self.raise(mapped);
        self.last
    }

    fn raise(&mut self, value: f64) {
        let value = value.clamp(0.0, PRE_COMPLETION_CEILING).round() as u8;
        self.last = self.last.max(value);
    }
}
