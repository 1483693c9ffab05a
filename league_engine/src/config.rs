//! Division and fixture configuration models.

use serde::{Deserialize, Serialize};

use crate::errors::{LeagueError, LeagueResult};
use crate::models::{DivisionKind, TournamentType};

/// Promotion and relegation spots of a division
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpotConfig {
    /// Top finishers moving straight up
    pub direct_promotion_spots: usize,

    /// Finishers just below the direct block who play a promotion match
    pub playoff_promotion_spots: usize,

    /// Bottom finishers moving straight down
    pub direct_relegation_spots: usize,

    /// Finishers just above the direct block who defend their place in a promotion match
    pub playoff_relegation_spots: usize,
}

impl SpotConfig {
    pub fn new(
        direct_promotion_spots: usize,
        playoff_promotion_spots: usize,
        direct_relegation_spots: usize,
        playoff_relegation_spots: usize,
    ) -> Self {
        Self {
            direct_promotion_spots,
            playoff_promotion_spots,
            direct_relegation_spots,
            playoff_relegation_spots,
        }
    }

    /// Size of the promotion zone (direct + playoff)
    pub fn promotion_zone(&self) -> usize {
        self.direct_promotion_spots + self.playoff_promotion_spots
    }

    /// Size of the relegation zone (direct + playoff)
    pub fn relegation_zone(&self) -> usize {
        self.direct_relegation_spots + self.playoff_relegation_spots
    }

    /// Validate configuration against a roster size
    ///
    /// Both zones must fit the roster and must not overlap.
    pub fn validate(&self, roster_len: usize) -> LeagueResult<()> {
        if self.promotion_zone() > roster_len {
            return Err(LeagueError::InvalidConfig {
                field: "promotionSpots".to_string(),
                reason: format!(
                    "{} promotion spots for {} players",
                    self.promotion_zone(),
                    roster_len
                ),
            });
        }

        if self.relegation_zone() > roster_len {
            return Err(LeagueError::InvalidConfig {
                field: "relegationSpots".to_string(),
                reason: format!(
                    "{} relegation spots for {} players",
                    self.relegation_zone(),
                    roster_len
                ),
            });
        }

        if self.promotion_zone() + self.relegation_zone() > roster_len {
            return Err(LeagueError::InvalidConfig {
                field: "spots".to_string(),
                reason: "promotion and relegation zones overlap".to_string(),
            });
        }

        Ok(())
    }
}

/// Number of promotion matches between two adjacent divisions
pub fn promotion_playoff_spots(high: &SpotConfig, low: &SpotConfig) -> usize {
    high.playoff_relegation_spots.max(low.playoff_promotion_spots)
}

/// Which generator a division's fixture uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureKind {
    RoundRobin,
    Knockout,
}

impl std::fmt::Display for FixtureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixtureKind::RoundRobin => write!(f, "round_robin"),
            FixtureKind::Knockout => write!(f, "knockout"),
        }
    }
}

/// Fixture generation options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureOptions {
    pub kind: FixtureKind,

    /// Randomize entrant order before pairing
    pub shuffle: bool,
}

impl FixtureOptions {
    /// Derive options from the tournament type and the division being scheduled
    ///
    /// - LEAGUE: round robin
    /// - CUP: shuffled knockout
    /// - CHAMPIONS: round robin for groups, unshuffled knockout for the final phase
    pub fn for_division(tournament_type: TournamentType, kind: &DivisionKind, name: &str) -> Self {
        match tournament_type {
            TournamentType::League => Self {
                kind: FixtureKind::RoundRobin,
                shuffle: true,
            },
            TournamentType::Cup => Self {
                kind: FixtureKind::Knockout,
                shuffle: true,
            },
            TournamentType::Champions => {
                let final_phase = matches!(kind, DivisionKind::FinalPhase);
                if final_phase || name.to_lowercase().contains("playoff") {
                    Self {
                        kind: FixtureKind::Knockout,
                        // Final phase entrants arrive cross-seeded
                        shuffle: !final_phase,
                    }
                } else {
                    Self {
                        kind: FixtureKind::RoundRobin,
                        shuffle: true,
                    }
                }
            }
        }
    }
}
