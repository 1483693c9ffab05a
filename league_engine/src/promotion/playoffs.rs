//! Final phase assembled from group qualifiers.
//!
//! Groups are paired in order (A with B, C with D, ...). Within a pair the
//! qualifiers are interleaved so that consecutive entrants form the bracket's
//! round-1 matches: A1 vs B-last, B1 vs A-last, A2 vs B-second-to-last, and so on.
//! A group left without a partner contributes its qualifiers in rank order.

use uuid::Uuid;

use crate::config::SpotConfig;
use crate::errors::{LeagueError, LeagueResult};
use crate::models::{Division, DivisionId, DivisionKind, FINAL_PHASE_NAME, Player, Tournament};
use crate::standings::{LEAGUE_CRITERIA, rank};

use super::candidates::top_block;

/// Build the final phase division from group divisions
///
/// Takes the top `spots_per_group` of each group. The returned division has no
/// matches; its roster order is the bracket seeding.
pub fn build_playoffs_division(
    groups: &[&Division],
    spots_per_group: usize,
) -> LeagueResult<Division> {
    let qualifiers: Vec<Vec<Player>> = groups
        .iter()
        .map(|g| top_block(&rank(&g.players, &LEAGUE_CRITERIA), spots_per_group).to_vec())
        .collect();

    let mut seeded: Vec<String> = Vec::new();
    for pair in qualifiers.chunks(2) {
        match pair {
            [first, second] => seeded.extend(cross_seed(first, second)),
            [single] => seeded.extend(single.iter().map(|p| p.name.clone())),
            _ => {}
        }
    }

    if seeded.is_empty() {
        return Err(LeagueError::InvalidState("No players qualified".to_string()));
    }

    let mut division = Division {
        id: Uuid::new_v4(),
        name: FINAL_PHASE_NAME.to_string(),
        kind: DivisionKind::FinalPhase,
        players: Vec::new(),
        matches: Vec::new(),
        spots: SpotConfig::default(),
    };
    division.add_players(seeded)?;

    log::debug!(
        "Built final phase from {} groups: {} qualifiers",
        groups.len(),
        division.players.len()
    );

    Ok(division)
}

/// Interleave two ranked qualifier lists, best of one against worst of the other
///
/// Even steps take `first[idx]` and `second[last - idx]`, odd steps take
/// `second[idx]` and `first[last - idx]`; `idx` advances every two steps.
pub fn cross_seed(first: &[Player], second: &[Player]) -> Vec<String> {
    let mut seeded = Vec::with_capacity(first.len() + second.len());
    let steps = first.len().max(second.len());

    for step in 0..steps {
        let idx = step / 2;
        let (top, bottom) = if step % 2 == 0 {
            (first, second)
        } else {
            (second, first)
        };

        if idx < top.len() && idx < bottom.len() {
            seeded.push(top[idx].name.clone());
            seeded.push(bottom[bottom.len() - 1 - idx].name.clone());
        }
    }

    seeded
}

impl Tournament {
    /// Add the final phase division built from every regular division
    ///
    /// Groups are taken in name order. Fails if a final phase already exists.
    pub fn create_playoffs_division(&mut self, spots_per_group: usize) -> LeagueResult<DivisionId> {
        if self
            .divisions
            .iter()
            .any(|d| matches!(d.kind, DivisionKind::FinalPhase))
        {
            return Err(LeagueError::InvalidState(format!(
                "Tournament '{}' already has a final phase",
                self.name
            )));
        }

        let mut groups: Vec<&Division> = self.regular_divisions().collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));

        let division = build_playoffs_division(&groups, spots_per_group)?;
        log::info!(
            "Created final phase for '{}' with {} players",
            self.name,
            division.players.len()
        );
        Ok(self.add_division(division))
    }
}
