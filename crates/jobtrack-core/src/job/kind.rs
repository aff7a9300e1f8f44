//! Known job families and their tracking defaults.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use super::progress::ProgressMapping;

/// Kinds of long-running backend jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    ResumeTailoring,
    InterviewPrep,
    CareerPlan,
}

#[derive(Debug, Error)]
#[error("unknown job kind '{0}' (expected resume-tailoring, interview-prep or career-plan)")]
pub struct UnknownJobKind(pub String);

impl JobKind {
    pub const ALL: [JobKind; 3] = [Self::ResumeTailoring, Self::InterviewPrep, Self::CareerPlan];

    /// Name used in user-facing messages ("<operation> timed out ...").
    pub fn operation_name(&self) -> &'static str {
        match self {
            Self::ResumeTailoring => "Resume tailoring",
            Self::InterviewPrep => "Interview prep generation",
            Self::CareerPlan => "Career plan generation",
        }
    }

    /// Career plans run longest, so they are polled less often.
    pub fn default_poll_interval(&self) -> Duration {
        match self {
            Self::CareerPlan => Duration::from_millis(3000),
            _ => Duration::from_millis(2000),
        }
    }

    pub fn progress_mapping(&self) -> ProgressMapping {
        match self {
            Self::CareerPlan => ProgressMapping::Blended {
                baseline: 10.0,
                scale: 0.8,
                cap: 80.0,
            },
            _ => ProgressMapping::Verbatim,
        }
    }

    /// Submit path relative to the configured base URL.
    pub fn submit_path(&self) -> &'static str {
        match self {
            Self::ResumeTailoring => "api/jobs/resume-tailoring",
            Self::InterviewPrep => "api/jobs/interview-prep",
            Self::CareerPlan => "api/jobs/career-plan",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResumeTailoring => "resume-tailoring",
            Self::InterviewPrep => "interview-prep",
            Self::CareerPlan => "career-plan",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobKind {
    type Err = UnknownJobKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| UnknownJobKind(s.to_string()))
    }
}
