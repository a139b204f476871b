//! Bay domain types for physical service positions.

use serde::{Deserialize, Serialize};

/// Number of bays in the shop, fixed at deployment.
pub const TOTAL_BAYS: u8 = 5;

/// Numeric bay identifier, 1 through [`TOTAL_BAYS`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BayId(pub u8);

impl std::fmt::Display for BayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Occupancy status of a bay.
///
/// Occupancy is a display derivative of "does this bay have an
/// IN_PROGRESS job"; nothing in the core keeps it in sync with job
/// activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BayStatus {
    Available,
    Occupied,
    Maintenance,
}

impl Default for BayStatus {
    fn default() -> Self {
        Self::Available
    }
}

impl std::fmt::Display for BayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BayStatus::Available => write!(f, "available"),
            BayStatus::Occupied => write!(f, "occupied"),
            BayStatus::Maintenance => write!(f, "maintenance"),
        }
    }
}

/// A physical service position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bay {
    pub id: BayId,
    /// Display name, e.g. "Bay 3".
    pub name: String,
    pub status: BayStatus,
}

impl Bay {
    /// The fixed roster seeded on first run when a store is empty.
    pub fn roster() -> Vec<Bay> {
        (1..=TOTAL_BAYS)
            .map(|i| Bay {
                id: BayId(i),
                name: format!("Bay {i}"),
                status: BayStatus::Available,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_is_fixed_and_available() {
        let roster = Bay::roster();
        assert_eq!(roster.len(), TOTAL_BAYS as usize);
        assert_eq!(roster[0].id, BayId(1));
        assert_eq!(roster[4].name, "Bay 5");
        assert!(roster.iter().all(|b| b.status == BayStatus::Available));
    }
}
