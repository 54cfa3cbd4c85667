use super::stage::Stage;
use folio_types::AnchorId;
use serde::Serialize;
use std::time::Duration;

/// A summary of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationReport {
    /// Page count of the first-pass artifact, when it could be read.
    pub pass1_pages: Option<usize>,
    pub final_pages: Option<usize>,
    pub anchors_sampled: usize,
    pub anchors_estimated: usize,
    pub anchors_exact: usize,
    pub anchors_resolved: usize,
    pub placeholders_filled: usize,
    /// Targets whose placeholders kept their original text.
    pub unresolved: Vec<AnchorId>,
    /// Stages that failed and fell back to an empty result.
    pub degraded: Vec<Stage>,
    #[serde(with = "millis")]
    pub elapsed: Duration,
}

impl GenerationReport {
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }

    pub(crate) fn degrade(&mut self, stage: Stage) {
        if !self.degraded.contains(&stage) {
            self.degraded.push(stage);
        }
    }
}

/// The final artifact together with its report.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub pdf: Vec<u8>,
    pub report: GenerationReport,
}

mod millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u128(d.as_millis())
    }
}
