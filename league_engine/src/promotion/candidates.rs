//! Direct movers and playoff candidates between two adjacent divisions.
//!
//! Both rosters are ranked best first. In the higher division the direct
//! relegation block is the bottom of the table and the relegation playoff window
//! sits just above it; in the lower division the direct promotion block is the
//! top of the table and the promotion playoff window sits just below it.

use serde::{Deserialize, Serialize};

use crate::config::{SpotConfig, promotion_playoff_spots};
use crate::models::Player;
use crate::standings::{LEAGUE_CRITERIA, rank};

/// Movement between a higher and a lower division, each list best first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionCandidates {
    /// Bottom of the higher division
    pub direct_relegated: Vec<Player>,
    /// Top of the lower division
    pub direct_promoted: Vec<Player>,
    /// Higher division players defending their place in a promotion match
    pub relegation_candidates: Vec<Player>,
    /// Lower division players attacking a place in a promotion match
    pub promotion_candidates: Vec<Player>,
}

/// Spot counts applied to one pair of divisions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionSpots {
    /// Direct relegation spots of the higher division
    pub direct_relegation: usize,
    /// Direct promotion spots of the lower division
    pub direct_promotion: usize,
    /// Playoff window size on both sides
    pub playoff: usize,
}

impl PromotionSpots {
    /// Spots for a pair of divisions from their configurations
    pub fn between(high: &SpotConfig, low: &SpotConfig) -> Self {
        Self {
            direct_relegation: high.direct_relegation_spots,
            direct_promotion: low.direct_promotion_spots,
            playoff: promotion_playoff_spots(high, low),
        }
    }
}

/// Split two adjacent rosters into direct movers and playoff candidates
///
/// Each division's own spot configuration sizes its blocks: the higher
/// division's relegation spots and the lower division's promotion spots.
pub fn resolve_direct_and_playoff_candidates(
    high_players: &[Player],
    high_spots: &SpotConfig,
    low_players: &[Player],
    low_spots: &SpotConfig,
) -> PromotionCandidates {
    let high = rank(high_players, &LEAGUE_CRITERIA);
    let low = rank(low_players, &LEAGUE_CRITERIA);

    PromotionCandidates {
        direct_relegated: bottom_block(&high, high_spots.direct_relegation_spots).to_vec(),
        direct_promoted: top_block(&low, low_spots.direct_promotion_spots).to_vec(),
        relegation_candidates: relegation_window(
            &high,
            high_spots.direct_relegation_spots,
            high_spots.playoff_relegation_spots,
        )
        .to_vec(),
        promotion_candidates: promotion_window(
            &low,
            low_spots.direct_promotion_spots,
            low_spots.playoff_promotion_spots,
        )
        .to_vec(),
    }
}

/// Same split with one playoff window size for both sides
pub fn resolve_with_spots(
    high_players: &[Player],
    low_players: &[Player],
    spots: PromotionSpots,
) -> PromotionCandidates {
    let high = SpotConfig {
        direct_relegation_spots: spots.direct_relegation,
        playoff_relegation_spots: spots.playoff,
        ..SpotConfig::default()
    };
    let low = SpotConfig {
        direct_promotion_spots: spots.direct_promotion,
        playoff_promotion_spots: spots.playoff,
        ..SpotConfig::default()
    };
    resolve_direct_and_playoff_candidates(high_players, &high, low_players, &low)
}

/// First `count` of a ranked roster
pub(crate) fn top_block(ranked: &[Player], count: usize) -> &[Player] {
    &ranked[..count.min(ranked.len())]
}

/// Last `count` of a ranked roster
pub(crate) fn bottom_block(ranked: &[Player], count: usize) -> &[Player] {
    &ranked[ranked.len().saturating_sub(count)..]
}

/// Positions `[len - direct - window, len - direct)`
fn relegation_window(ranked: &[Player], direct: usize, window: usize) -> &[Player] {
    let end = ranked.len().saturating_sub(direct);
    let start = ranked.len().saturating_sub(direct + window);
    &ranked[start..end]
}

/// Positions `[direct, direct + window)`
fn promotion_window(ranked: &[Player], direct: usize, window: usize) -> &[Player] {
    let start = direct.min(ranked.len());
    let end = (direct + window).min(ranked.len());
    &ranked[start..end]
}
