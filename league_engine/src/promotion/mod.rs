//! Promotion and relegation between divisions, and season rollover.
//!
//! This module provides:
//! - Direct movers and playoff candidates for a pair of adjacent divisions
//! - Promotion playoff divisions with cross-seeded single matches
//! - The pooled final phase of a group tournament
//! - Rolling a tournament into its next season
//!
//! Promotion divisions record the two divisions they connect in
//! [`DivisionKind::Promotion`], so nothing is ever recovered from a name.

pub mod candidates;
pub mod playoffs;
pub mod season;

pub use candidates::{
    PromotionCandidates, PromotionSpots, resolve_direct_and_playoff_candidates, resolve_with_spots,
};
pub use playoffs::{build_playoffs_division, cross_seed};
pub use season::{SeasonRollover, Transfer, resolve_next_season};

use uuid::Uuid;

use crate::config::SpotConfig;
use crate::errors::{LeagueError, LeagueResult};
use crate::models::{
    Division, DivisionId, DivisionKind, Match, PROMOTION_PREFIX, Participant, Tournament,
};

/// Build the promotion playoff division between `high` and `low`
///
/// The division holds every playoff candidate of both sides. Matches are single
/// round-1 games, best defender against worst attacker: the relegation candidates
/// (best first) play the promotion candidates in reverse order. Extra candidates
/// on the longer side get no match.
///
/// Fails with `InvalidState` when a relegation and a promotion candidate share a
/// name, since results and standings identify players by name.
pub fn build_promotion_division(
    high: &Division,
    low: &Division,
    spots: PromotionSpots,
) -> LeagueResult<Division> {
    let candidates = resolve_with_spots(&high.players, &low.players, spots);

    let mut division = Division {
        id: Uuid::new_v4(),
        name: format!("{} {} vs {}", PROMOTION_PREFIX, high.name, low.name),
        kind: DivisionKind::Promotion {
            high_division_id: high.id,
            low_division_id: low.id,
        },
        players: Vec::new(),
        matches: Vec::new(),
        spots: SpotConfig::default(),
    };

    division.add_players(
        candidates
            .relegation_candidates
            .iter()
            .chain(&candidates.promotion_candidates)
            .map(|p| p.name.clone()),
    )?;

    division.matches = candidates
        .relegation_candidates
        .iter()
        .zip(candidates.promotion_candidates.iter().rev())
        .map(|(defender, attacker)| {
            Match::new(
                division.id,
                Participant::player(&defender.name),
                Participant::player(&attacker.name),
                1,
            )
        })
        .collect();

    log::debug!(
        "Built '{}': {} candidates, {} matches",
        division.name,
        division.players.len(),
        division.matches.len()
    );

    Ok(division)
}

impl Tournament {
    /// Add the promotion division between two regular divisions
    ///
    /// Spot counts come from the two divisions' configurations.
    pub fn create_promotion_division(
        &mut self,
        high_id: DivisionId,
        low_id: DivisionId,
    ) -> LeagueResult<DivisionId> {
        let spots = PromotionSpots::between(&self.division(high_id)?.spots, &self.division(low_id)?.spots);
        self.create_promotion_division_with(high_id, low_id, spots)
    }

    /// Add the promotion division between two regular divisions with explicit spots
    ///
    /// Fails if either division is missing or not regular, if `high` is not above
    /// `low`, or if the pair already has a promotion division.
    pub fn create_promotion_division_with(
        &mut self,
        high_id: DivisionId,
        low_id: DivisionId,
        spots: PromotionSpots,
    ) -> LeagueResult<DivisionId> {
        let high = self.division(high_id)?;
        let low = self.division(low_id)?;

        if !high.is_regular() || !low.is_regular() {
            return Err(LeagueError::InvalidState(
                "Promotion divisions can only connect regular divisions".to_string(),
            ));
        }

        let position = |id: DivisionId| self.regular_divisions().position(|d| d.id == id);
        if position(high_id) >= position(low_id) {
            return Err(LeagueError::InvalidState(format!(
                "Division '{}' is not above '{}'",
                high.name, low.name
            )));
        }

        let exists = self.promotion_divisions().any(|d| {
            d.kind
                == DivisionKind::Promotion {
                    high_division_id: high_id,
                    low_division_id: low_id,
                }
        });
        if exists {
            return Err(LeagueError::InvalidState(format!(
                "Promotion between '{}' and '{}' already exists",
                high.name, low.name
            )));
        }

        let division = build_promotion_division(high, low, spots)?;
        Ok(self.add_division(division))
    }
}
