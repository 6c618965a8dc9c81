// Toggle state machine - pure transitions, no I/O
use std::fmt;

/// Lifecycle of one boolean interaction (liked, bookmarked) as seen by
/// this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    /// Never read from the server
    Unknown,
    /// Request in flight; `from` is the last acknowledged value
    Pending { from: bool },
    /// Server acknowledged this value
    Confirmed(bool),
    /// Last request failed; value is the one acknowledged before it
    Reverted(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError(pub String);

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TransitionError {}

impl ToggleState {
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Pending { .. } => "Pending",
            Self::Confirmed(_) => "Confirmed",
            Self::Reverted(_) => "Reverted",
        }
    }

    /// Last value the server acknowledged, if any. A pending toggle still
    /// reports its starting value.
    pub fn value(&self) -> Option<bool> {
        match self {
            Self::Unknown => None,
            Self::Pending { from } => Some(*from),
            Self::Confirmed(v) | Self::Reverted(v) => Some(*v),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// Transition: Confirmed | Reverted → Pending.
    /// Returns the new state and the value being toggled away from.
    pub fn begin(self) -> Result<(Self, bool), TransitionError> {
        match self {
            Self::Confirmed(v) | Self::Reverted(v) => Ok((Self::Pending { from: v }, v)),
            other => Err(TransitionError(format!(
                "Cannot toggle from {} state",
                other.state_name()
            ))),
        }
    }

    /// Transition: Pending → Confirmed(value)
    pub fn confirm(self, value: bool) -> Result<Self, TransitionError> {
        match self {
            Self::Pending { .. } => Ok(Self::Confirmed(value)),
            other => Err(TransitionError(format!(
                "Cannot confirm from {} state",
                other.state_name()
            ))),
        }
    }

    /// Transition: Pending → Reverted(from)
    pub fn revert(self) -> Result<Self, TransitionError> {
        match self {
            Self::Pending { from } => Ok(Self::Reverted(from)),
            other => Err(TransitionError(format!(
                "Cannot revert from {} state",
                other.state_name()
            ))),
        }
    }

    /// A fresh server read overrides whatever was known, except while a
    /// request is in flight.
    pub fn sync(self, value: bool) -> Self {
        match self {
            Self::Pending { .. } => self,
            _ => Self::Confirmed(value),
        }
    }
}
