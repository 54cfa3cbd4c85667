use serde::Serialize;
use std::fmt;

/// The steps of one generation, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Init,
    Pass1Render,
    Pass1Sample,
    Pass1Extract,
    Estimate,
    Merge,
    Inject,
    Pass2Render,
    Done,
}

impl Stage {
    /// Whether a failure in this stage aborts the run. Other stages degrade to an
    /// empty result.
    pub fn is_fatal(self) -> bool {
        matches!(self, Stage::Init | Stage::Pass1Render | Stage::Pass2Render)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::Pass1Render => "pass 1 render",
            Stage::Pass1Sample => "pass 1 sample",
            Stage::Pass1Extract => "pass 1 extract",
            Stage::Estimate => "estimate",
            Stage::Merge => "merge",
            Stage::Inject => "inject",
            Stage::Pass2Render => "pass 2 render",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_renders_and_init_are_fatal() {
        let fatal: Vec<Stage> = [
            Stage::Init,
            Stage::Pass1Render,
            Stage::Pass1Sample,
            Stage::Pass1Extract,
            Stage::Estimate,
            Stage::Merge,
            Stage::Inject,
            Stage::Pass2Render,
            Stage::Done,
        ]
        .into_iter()
        .filter(|s| s.is_fatal())
        .collect();
        assert_eq!(fatal, vec![Stage::Init, Stage::Pass1Render, Stage::Pass2Render]);
    }

    #[test]
    fn stages_are_ordered() {
        assert!(Stage::Pass1Render < Stage::Estimate);
        assert!(Stage::Inject < Stage::Pass2Render);
        assert_eq!(Stage::Pass2Render.to_string(), "pass 2 render");
    }
}
