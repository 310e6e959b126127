use core::fmt;

use bid_fixtures_common::participant::Role;

pub type FixtureResult<T = (), E = FixtureError> = Result<T, E>;

#[derive(Debug)]
pub enum FixtureError {
    /// More participants than the auction contract can hold
    TooManyParticipants {
        role: Role,
        count: usize,
        max: usize,
    },
    /// Time mean or std-dev is not finite, or std-dev is negative
    TimeDistribution { mean: f64, std_dev: f64 },
    Io(std::io::Error),
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureError::TooManyParticipants { role, count, max } => {
                write!(
                    f,
                    "{count} {}s requested but the auction holds at most {max}",
                    role.prefix()
                )
            }
            FixtureError::TimeDistribution { mean, std_dev } => {
                write!(
                    f,
                    "invalid time distribution: mean {mean}, std-dev {std_dev}"
                )
            }
            FixtureError::Io(e) => write!(f, "failed to write script: {e}"),
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FixtureError::Io(e) => Some(e),
            FixtureError::TooManyParticipants { .. }
            | FixtureError::TimeDistribution { .. } => None,
        }
    }
}

impl From<std::io::Error> for FixtureError {
    fn from(e: std::io::Error) -> Self {
        FixtureError::Io(e)
    }
}
