//! Lifecycle of a single content-record submission.

use std::fmt;

/// `Collecting → Validating → Uploading → Persisting → Done`, with any
/// non-terminal stage able to fall to `Failed`. `Failed` and `Done` are
/// terminal; a retry is a fresh submission starting at `Collecting`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStage {
    Collecting,
    Validating,
    Uploading,
    Persisting,
    Done,
    Failed(String),
}

impl SubmissionStage {
    /// The stage that follows a successful completion of this one.
    pub fn next(&self) -> Option<SubmissionStage> {
        match self {
            SubmissionStage::Collecting => Some(SubmissionStage::Validating),
            SubmissionStage::Validating => Some(SubmissionStage::Uploading),
            SubmissionStage::Uploading => Some(SubmissionStage::Persisting),
            SubmissionStage::Persisting => Some(SubmissionStage::Done),
            SubmissionStage::Done | SubmissionStage::Failed(_) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionStage::Done | SubmissionStage::Failed(_))
    }

    /// Move to `target` if the transition is allowed.
    pub fn advance(&mut self, target: SubmissionStage) -> Result<(), InvalidTransition> {
        let allowed = match (&*self, &target) {
            (from, SubmissionStage::Failed(_)) => !from.is_terminal(),
            // Updates without a new file skip the upload stage.
            (SubmissionStage::Validating, SubmissionStage::Persisting) => true,
            (from, to) => from.next().as_ref() == Some(to),
        };
        if !allowed {
            return Err(InvalidTransition {
                from: self.clone(),
                to: target,
            });
        }
        *self = target;
        Ok(())
    }

    pub fn name(&self) -> &'static str {
        match self {
            SubmissionStage::Collecting => "collecting",
            SubmissionStage::Validating => "validating",
            SubmissionStage::Uploading => "uploading",
            SubmissionStage::Persisting => "persisting",
            SubmissionStage::Done => "done",
            SubmissionStage::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionStage::Failed(reason) => write!(f, "failed: {}", reason),
            other => f.write_str(other.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot move submission from {from} to {to}")]
pub struct InvalidTransition {
    pub from: SubmissionStage,
    pub to: SubmissionStage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_the_happy_path() {
        let mut stage = SubmissionStage::Collecting;
        for target in [
            SubmissionStage::Validating,
            SubmissionStage::Uploading,
            SubmissionStage::Persisting,
            SubmissionStage::Done,
        ] {
            stage.advance(target).unwrap();
        }
        assert!(stage.is_terminal());
        assert_eq!(stage.next(), None);
    }

    #[test]
    fn any_active_stage_can_fail() {
        for start in [
            SubmissionStage::Collecting,
            SubmissionStage::Validating,
            SubmissionStage::Uploading,
            SubmissionStage::Persisting,
        ] {
            let mut stage = start;
            stage
                .advance(SubmissionStage::Failed("boom".into()))
                .unwrap();
            assert_eq!(stage.to_string(), "failed: boom");
        }
    }

    #[test]
    fn failed_does_not_resume() {
        let mut stage = SubmissionStage::Failed("upload".into());
        assert!(stage.advance(SubmissionStage::Uploading).is_err());
        assert!(stage.advance(SubmissionStage::Collecting).is_err());
        assert!(stage.advance(SubmissionStage::Failed("again".into())).is_err());
    }

    #[test]
    fn stages_cannot_be_skipped_except_upload() {
        let mut stage = SubmissionStage::Collecting;
        assert!(stage.advance(SubmissionStage::Persisting).is_err());
        stage.advance(SubmissionStage::Validating).unwrap();
        stage.advance(SubmissionStage::Persisting).unwrap();
        assert_eq!(stage, SubmissionStage::Persisting);
    }
}
