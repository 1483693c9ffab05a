//! Season rollover.
//!
//! The next season is built in two steps. [`plan_season`] computes where every
//! player of the old season goes, without touching any division. Then
//! [`resolve_next_season`] materializes fresh divisions from that plan in one pass.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{LeagueError, LeagueResult};
use crate::models::{Division, DivisionId, DivisionKind, Tournament};

use super::candidates::resolve_direct_and_playoff_candidates;

/// Destination of one player, as indexes into the regular divisions (highest first)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub player: String,
    pub origin: usize,
    pub destination: usize,
}

impl Placement {
    pub fn moved(&self) -> bool {
        self.origin != self.destination
    }
}

/// A player whose division changed between seasons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub player: String,
    pub from: String,
    pub to: String,
}

/// New season and the movements that shaped it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonRollover {
    pub tournament: Tournament,
    pub transfers: Vec<Transfer>,
}

/// Compute every player's next-season division
///
/// Players start in their current division. Direct movers between each pair of
/// adjacent regular divisions are moved next, then promotion match results are
/// applied: the winner goes to the higher division, the loser to the lower one.
/// Placements are returned in division order, each division in rank order.
pub fn plan_season(old: &Tournament) -> LeagueResult<Vec<Placement>> {
    let regular: Vec<&Division> = old.regular_divisions().collect();
    if regular.is_empty() {
        return Err(LeagueError::InvalidState(format!(
            "Tournament '{}' has no regular divisions",
            old.name
        )));
    }

    if let Some(pending) = old.promotion_divisions().find(|d| !d.all_matches_played()) {
        return Err(LeagueError::InvalidState(format!(
            "Promotion division '{}' has unplayed matches",
            pending.name
        )));
    }

    let mut placements = Vec::new();
    let mut index: HashMap<(usize, String), usize> = HashMap::new();
    for (division_idx, division) in regular.iter().enumerate() {
        for player in division.ranked_players() {
            index.insert((division_idx, player.name.clone()), placements.len());
            placements.push(Placement {
                player: player.name,
                origin: division_idx,
                destination: division_idx,
            });
        }
    }

    for (high_idx, pair) in regular.windows(2).enumerate() {
        let (high, low) = (pair[0], pair[1]);
        let candidates = resolve_direct_and_playoff_candidates(
            &high.players,
            &high.spots,
            &low.players,
            &low.spots,
        );

        for player in &candidates.direct_relegated {
            relocate(&mut placements, &index, high_idx, &player.name, high_idx + 1);
        }
        for player in &candidates.direct_promoted {
            relocate(&mut placements, &index, high_idx + 1, &player.name, high_idx);
        }
    }

    for promo in old.promotion_divisions() {
        let DivisionKind::Promotion {
            high_division_id,
            low_division_id,
        } = promo.kind
        else {
            continue;
        };
        let high_idx = regular_position(&regular, high_division_id)?;
        let low_idx = regular_position(&regular, low_division_id)?;

        // Player 1 defends the high division, player 2 attacks from the low one
        for m in &promo.matches {
            let decisive = m.score().filter(|(s1, s2)| s1 != s2);
            let Some(defender_won) = decisive.map(|(s1, s2)| s1 > s2) else {
                log::warn!(
                    "Promotion match {} in '{}' has no winner, nobody moves",
                    m.id,
                    promo.name
                );
                continue;
            };
            let (defender_to, attacker_to) = if defender_won {
                (high_idx, low_idx)
            } else {
                (low_idx, high_idx)
            };

            for (side, origin, destination) in [
                (&m.player1, high_idx, defender_to),
                (&m.player2, low_idx, attacker_to),
            ] {
                let moved = side
                    .name()
                    .is_some_and(|name| relocate(&mut placements, &index, origin, name, destination));
                if !moved {
                    log::warn!(
                        "Skipping promotion transfer of '{}' from '{}': player not found",
                        side,
                        promo.name
                    );
                }
            }
        }
    }

    Ok(placements)
}

/// Roll a tournament into its next season
///
/// The new tournament keeps the names and spot configuration of the old regular
/// divisions and holds every player with zeroed stats in their resolved division.
/// Promotion and final phase divisions are not carried over.
pub fn resolve_next_season(old: &Tournament, season_name: &str) -> LeagueResult<SeasonRollover> {
    let placements = plan_season(old)?;
    let regular: Vec<&Division> = old.regular_divisions().collect();

    let mut divisions: Vec<Division> = regular
        .iter()
        .map(|d| Division::new(d.name.clone(), d.spots))
        .collect();
    let mut transfers = Vec::new();

    for placement in placements {
        if placement.moved() {
            transfers.push(Transfer {
                player: placement.player.clone(),
                from: regular[placement.origin].name.clone(),
                to: regular[placement.destination].name.clone(),
            });
        }
        divisions[placement.destination].add_players([placement.player])?;
    }

    let tournament = Tournament::with_divisions(season_name, old.tournament_type, divisions);

    log::info!(
        "Season '{}' created from '{}': {} divisions, {} transfers",
        tournament.name,
        old.name,
        tournament.divisions.len(),
        transfers.len()
    );

    Ok(SeasonRollover {
        tournament,
        transfers,
    })
}

fn relocate(
    placements: &mut [Placement],
    index: &HashMap<(usize, String), usize>,
    origin: usize,
    name: &str,
    destination: usize,
) -> bool {
    match index.get(&(origin, name.to_string())) {
        Some(&i) => {
            placements[i].destination = destination;
            true
        }
        None => false,
    }
}

fn regular_position(regular: &[&Division], id: DivisionId) -> LeagueResult<usize> {
    regular
        .iter()
        .position(|d| d.id == id)
        .ok_or(LeagueError::DivisionNotFound(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpotConfig;
    use crate::models::{Player, TournamentType};
    use uuid::Uuid;

    fn ranked_division(name: &str, prefix: &str, n: usize, spots: SpotConfig) -> Division {
        let mut division = Division::new(name, spots);
        division.players = (1..=n)
            .map(|i| {
                let mut p = Player::new(format!("{prefix}{i}"));
                p.points = (30 - i) as u32;
                p
            })
            .collect();
        division
    }

    /// Two divisions of four, one direct and one playoff spot each way
    fn league() -> (Tournament, DivisionId) {
        let high = ranked_division("Primera", "H", 4, SpotConfig::new(0, 0, 1, 1));
        let low = ranked_division("Segunda", "L", 4, SpotConfig::new(1, 1, 0, 0));
        let (high_id, low_id) = (high.id, low.id);
        let mut tournament =
            Tournament::with_divisions("Temporada 1", TournamentType::League, vec![high, low]);
        let promo_id = tournament.create_promotion_division(high_id, low_id).unwrap();
        (tournament, promo_id)
    }

    fn play_promotion(tournament: &mut Tournament, promo_id: DivisionId, s1: u32, s2: u32) {
        let promo = tournament.division_mut(promo_id).unwrap();
        for m in &mut promo.matches {
            m.score1 = Some(s1);
            m.score2 = Some(s2);
            m.played = true;
        }
    }

    fn names(division: &Division) -> Vec<&str> {
        division.players.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_attacker_wins_promotion() {
        let (mut tournament, promo_id) = league();
        // H3 defends against L2
        play_promotion(&mut tournament, promo_id, 0, 2);

        let rollover = resolve_next_season(&tournament, "Temporada 2").unwrap();
        let next = &rollover.tournament;

        assert_eq!(next.name, "Temporada 2");
        assert_eq!(next.divisions.len(), 2);
        assert_eq!(names(&next.divisions[0]), vec!["H1", "H2", "L1", "L2"]);
        assert_eq!(names(&next.divisions[1]), vec!["H3", "H4", "L3", "L4"]);
        assert!(next.divisions.iter().all(|d| d.matches.is_empty()));
        assert!(
            next.divisions
                .iter()
                .flat_map(|d| &d.players)
                .all(|p| p.points == 0)
        );

        let moved: Vec<(&str, &str)> = rollover
            .transfers
            .iter()
            .map(|t| (t.player.as_str(), t.to.as_str()))
            .collect();
        assert_eq!(
            moved,
            vec![
                ("H3", "Segunda"),
                ("H4", "Segunda"),
                ("L1", "Primera"),
                ("L2", "Primera"),
            ]
        );
    }

    #[test]
    fn test_defender_keeps_place() {
        let (mut tournament, promo_id) = league();
        play_promotion(&mut tournament, promo_id, 3, 1);

        let rollover = resolve_next_season(&tournament, "Temporada 2").unwrap();
        assert_eq!(
            names(&rollover.tournament.divisions[0]),
            vec!["H1", "H2", "H3", "L1"]
        );
        assert_eq!(rollover.transfers.len(), 2);
    }

    #[test]
    fn test_spots_carried_over() {
        let (mut tournament, promo_id) = league();
        play_promotion(&mut tournament, promo_id, 1, 0);

        let next = resolve_next_season(&tournament, "Temporada 2").unwrap().tournament;
        assert_eq!(next.divisions[0].spots, SpotConfig::new(0, 0, 1, 1));
        assert_eq!(next.divisions[1].spots, SpotConfig::new(1, 1, 0, 0));
        assert_ne!(next.divisions[0].id, tournament.divisions[0].id);
        assert!(next.divisions.iter().all(|d| d.is_regular()));
    }

    #[test]
    fn test_unplayed_promotion_rejected() {
        let (tournament, _) = league();
        let err = resolve_next_season(&tournament, "Temporada 2").unwrap_err();
        assert!(matches!(err, LeagueError::InvalidState(_)));
    }

    #[test]
    fn test_drawn_promotion_moves_nobody() {
        let (mut tournament, promo_id) = league();
        play_promotion(&mut tournament, promo_id, 2, 2);

        let plan = plan_season(&tournament).unwrap();
        let h3 = plan.iter().find(|p| p.player == "H3").unwrap();
        let l2 = plan.iter().find(|p| p.player == "L2").unwrap();
        assert!(!h3.moved());
        assert!(!l2.moved());
    }

    #[test]
    fn test_unknown_promotion_player_skipped() {
        let (mut tournament, promo_id) = league();
        play_promotion(&mut tournament, promo_id, 0, 1);
        tournament
            .division_mut(promo_id)
            .unwrap()
            .rename_player("L2", "Fantasma")
            .unwrap();

        let plan = plan_season(&tournament).unwrap();
        // Defender still loses the match
        assert_eq!(plan.iter().find(|p| p.player == "H3").unwrap().destination, 1);
        assert!(!plan.iter().find(|p| p.player == "L2").unwrap().moved());
    }

    #[test]
    fn test_promotion_moves_the_attacker_not_a_namesake() {
        let mut high = ranked_division("Primera", "H", 4, SpotConfig::new(0, 0, 1, 1));
        let mut low = ranked_division("Segunda", "L", 4, SpotConfig::new(1, 1, 0, 0));
        high.players[0].name = "Ana".to_string();
        low.players[1].name = "Ana".to_string();
        let (high_id, low_id) = (high.id, low.id);
        let mut tournament =
            Tournament::with_divisions("Temporada 1", TournamentType::League, vec![high, low]);
        let promo_id = tournament.create_promotion_division(high_id, low_id).unwrap();
        // H3 defends against the low division's Ana
        play_promotion(&mut tournament, promo_id, 0, 1);

        let plan = plan_season(&tournament).unwrap();
        let place = |name: &str, origin: usize| {
            plan.iter()
                .find(|p| p.player == name && p.origin == origin)
                .unwrap()
                .destination
        };
        assert_eq!(place("Ana", 0), 0);
        assert_eq!(place("Ana", 1), 0);
        assert_eq!(place("H3", 0), 1);
    }

    #[test]
    fn test_promotion_referencing_missing_division() {
        let (mut tournament, promo_id) = league();
        play_promotion(&mut tournament, promo_id, 1, 0);
        let missing = Uuid::new_v4();
        if let DivisionKind::Promotion {
            high_division_id, ..
        } = &mut tournament.division_mut(promo_id).unwrap().kind
        {
            *high_division_id = missing;
        }

        let err = plan_season(&tournament).unwrap_err();
        assert_eq!(err, LeagueError::DivisionNotFound(missing));
    }

    #[test]
    fn test_no_regular_divisions() {
        let tournament = Tournament::with_divisions("Vacío", TournamentType::League, Vec::new());
        assert!(matches!(
            resolve_next_season(&tournament, "Siguiente"),
            Err(LeagueError::InvalidState(_))
        ));
    }

    #[test]
    fn test_single_division_keeps_everyone() {
        let division = ranked_division("Única", "U", 3, SpotConfig::new(1, 0, 1, 0));
        let tournament = Tournament::with_divisions("T1", TournamentType::League, vec![division]);

        let rollover = resolve_next_season(&tournament, "T2").unwrap();
        assert!(rollover.transfers.is_empty());
        assert_eq!(names(&rollover.tournament.divisions[0]), vec!["U1", "U2", "U3"]);
    }
}
