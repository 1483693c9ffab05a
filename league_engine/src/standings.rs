//! Standings aggregation and ranking.
//!
//! Standings are never updated incrementally: [`compute_standings`] starts every
//! player from zero and folds over the whole match list, so calling it again with
//! the same input gives the same output.
//!
//! ## Scoring
//!
//! - **Regulation win**: 3 points to the winner, 0 to the loser
//! - **Regulation draw**: 1 point each
//! - **Overtime**: counted as a regulation draw for both players (1 point each,
//!   `matchesTied` + 1), then the winner gets one more point and an
//!   `extraTimeGames` credit

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Match, MatchStats, Player};

/// Points for a regulation win
pub const WIN_POINTS: u32 = 3;

/// Points for a draw, and for each side of an overtime match
pub const DRAW_POINTS: u32 = 1;

/// Extra point for winning in overtime
pub const OVERTIME_WIN_BONUS: u32 = 1;

/// Ranking criteria, applied in order until one separates two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankCriteria {
    Points,
    GoalDifference,
    GoalsInFavor,
}

/// League tie-break: points, then goal difference, then goals scored
pub const LEAGUE_CRITERIA: [RankCriteria; 3] = [
    RankCriteria::Points,
    RankCriteria::GoalDifference,
    RankCriteria::GoalsInFavor,
];

impl RankCriteria {
    /// Better player first
    pub fn compare(&self, a: &Player, b: &Player) -> Ordering {
        match self {
            RankCriteria::Points => b.points.cmp(&a.points),
            RankCriteria::GoalDifference => b.goal_difference.cmp(&a.goal_difference),
            RankCriteria::GoalsInFavor => b.goals_in_favor.cmp(&a.goals_in_favor),
        }
    }
}

/// Compare two players by a list of criteria
pub fn compare_players(a: &Player, b: &Player, criteria: &[RankCriteria]) -> Ordering {
    criteria
        .iter()
        .map(|c| c.compare(a, b))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Players sorted best first; full ties keep roster order
pub fn rank(players: &[Player], criteria: &[RankCriteria]) -> Vec<Player> {
    let mut sorted = players.to_vec();
    sorted.sort_by(|a, b| compare_players(a, b, criteria));
    sorted
}

/// Recompute every player's stats from a division's matches
///
/// Returns the roster in input order with fresh stats. Matches that are unplayed
/// or missing a score are skipped, as are bye matches. A match naming a player absent from the roster
/// is skipped for both sides and logged.
pub fn compute_standings(players: &[Player], matches: &[Match]) -> Vec<Player> {
    let mut table: Vec<Player> = players.iter().map(Player::reset_stats).collect();
    let index: HashMap<String, usize> = table
        .iter()
        .enumerate()
        .map(|(i, p)| (p.name.clone(), i))
        .collect();

    for m in matches {
        let Some((score1, score2)) = m.score() else {
            continue;
        };

        // Bye wins do not count towards standings
        let (Some(name1), Some(name2)) = (m.player1.name(), m.player2.name()) else {
            continue;
        };
        let (Some(&i1), Some(&i2)) = (index.get(name1), index.get(name2)) else {
            log::warn!(
                "Skipping match {} ({} vs {}): player not in roster",
                m.id,
                m.player1,
                m.player2
            );
            continue;
        };

        if i1 == i2 {
            log::warn!("Skipping match {}: {} listed on both sides", m.id, m.player1);
            continue;
        }

        apply_side(&mut table[i1], score1, score2, m.player1_stats);
        apply_side(&mut table[i2], score2, score1, m.player2_stats);

        if m.is_overtime {
            for i in [i1, i2] {
                table[i].matches_tied += 1;
                table[i].points += DRAW_POINTS;
            }
            match score1.cmp(&score2) {
                Ordering::Greater => credit_overtime_win(&mut table[i1]),
                Ordering::Less => credit_overtime_win(&mut table[i2]),
                Ordering::Equal => {}
            }
        } else {
            match score1.cmp(&score2) {
                Ordering::Greater => credit_win(&mut table, i1, i2),
                Ordering::Less => credit_win(&mut table, i2, i1),
                Ordering::Equal => {
                    for i in [i1, i2] {
                        table[i].matches_tied += 1;
                        table[i].points += DRAW_POINTS;
                    }
                }
            }
        }

        for i in [i1, i2] {
            table[i].goal_difference =
                table[i].goals_in_favor as i32 - table[i].goals_against as i32;
        }
    }

    table
}

fn apply_side(player: &mut Player, scored: u32, conceded: u32, stats: Option<MatchStats>) {
    let stats = stats.unwrap_or_default();
    player.games_played += 1;
    player.goals_in_favor += scored;
    player.goals_against += conceded;
    player.shooting += stats.shots;
    player.saved += stats.saves;
    player.points_in_match += stats.points_in_match;
}

fn credit_win(table: &mut [Player], winner: usize, loser: usize) {
    table[winner].matches_won += 1;
    table[winner].points += WIN_POINTS;
    table[loser].matches_lost += 1;
}

fn credit_overtime_win(player: &mut Player) {
    player.extra_time_games += 1;
    player.points += OVERTIME_WIN_BONUS;
}
