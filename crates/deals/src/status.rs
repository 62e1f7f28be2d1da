use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use nexcrm_core::DomainError;

/// Pipeline stage of a deal. Won, Lost and Closed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    New,
    InProgress,
    Won,
    Lost,
    Closed,
}

impl DealStatus {
    pub const ALL: [DealStatus; 5] = [
        DealStatus::New,
        DealStatus::InProgress,
        DealStatus::Won,
        DealStatus::Lost,
        DealStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DealStatus::New => "new",
            DealStatus::InProgress => "in_progress",
            DealStatus::Won => "won",
            DealStatus::Lost => "lost",
            DealStatus::Closed => "closed",
        }
    }

    /// The statuses this one may legally move to.
    pub fn allowed_targets(&self) -> &'static [DealStatus] {
        match self {
            DealStatus::New => &[DealStatus::InProgress, DealStatus::Lost],
            DealStatus::InProgress => &[DealStatus::Won, DealStatus::Lost],
            DealStatus::Won | DealStatus::Lost | DealStatus::Closed => &[],
        }
    }

    pub fn can_transition_to(&self, target: DealStatus) -> bool {
        self.allowed_targets().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_targets().is_empty()
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(DealStatus::New),
            "in_progress" => Ok(DealStatus::InProgress),
            "won" => Ok(DealStatus::Won),
            "lost" => Ok(DealStatus::Lost),
            "closed" => Ok(DealStatus::Closed),
            other => Err(DomainError::validation(format!(
                "unknown deal status: {other}"
            ))),
        }
    }
}
