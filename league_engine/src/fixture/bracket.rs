//! Single-elimination bracket with automatic bye advancement.
//!
//! The roster is padded with byes up to the next power of two. Round 1 pairs
//! consecutive entrants; each later round has half as many matches and starts
//! with both sides undecided. Match `k` of a round feeds match `k / 2` of the
//! next round, into slot 1 for even `k` and slot 2 for odd `k`.

use crate::models::{BracketSlot, DivisionId, Entrant, Match, Participant, Player};

use super::shuffle::Shuffler;

/// Generate a knockout bracket for a roster
///
/// With `shuffle` off the roster order is the seeding: entrants `2k` and `2k + 1`
/// meet in round 1. Byes are paired with the last entrants so no round-1 match
/// has two byes; each bye match is recorded as a 1-0 win and its winner moved
/// into round 2 straight away.
///
/// Rosters with fewer than two players produce no matches.
pub fn generate_cup_fixture<S: Shuffler>(
    division_id: DivisionId,
    players: &[Player],
    shuffle: bool,
    shuffler: &mut S,
) -> Vec<Match> {
    let mut entrants = Entrant::from_players(players);
    if shuffle {
        shuffler.shuffle(&mut entrants);
    }

    let count = entrants.len();
    if count < 2 {
        log::debug!(
            "No bracket for division {}: {} player(s)",
            division_id,
            count
        );
        return Vec::new();
    }

    let size = count.next_power_of_two();
    let total_rounds = size.trailing_zeros() as usize;

    let mut rounds: Vec<Vec<Match>> = Vec::with_capacity(total_rounds);
    rounds.push(
        first_round_pairs(entrants, size)
            .into_iter()
            .map(|(a, b)| Match::new(division_id, a.into(), b.into(), 1))
            .collect(),
    );

    let mut round_size = size / 4;
    for round in 2..=total_rounds {
        rounds.push(
            (0..round_size)
                .map(|_| {
                    Match::new(
                        division_id,
                        Participant::ToBeDecided,
                        Participant::ToBeDecided,
                        round as u32,
                    )
                })
                .collect(),
        );
        round_size /= 2;
    }

    for r in 0..total_rounds.saturating_sub(1) {
        let (current, rest) = rounds.split_at_mut(r + 1);
        let next = &rest[0];
        for (index, m) in current[r].iter_mut().enumerate() {
            m.next_match_id = Some(next[index / 2].id);
            m.next_match_slot = Some(BracketSlot::for_index(index));
        }
    }

    let mut matches: Vec<Match> = rounds.into_iter().flatten().collect();

    let first_round_len = size / 2;
    let mut byes = 0;
    for index in 0..first_round_len {
        if award_bye(&mut matches[index]) {
            advance_winner(&mut matches, index);
            byes += 1;
        }
    }

    log::debug!(
        "Generated bracket for division {}: {} players, {} rounds, {} byes",
        division_id,
        count,
        total_rounds,
        byes
    );

    matches
}

/// Round-1 pairings for `size` slots
///
/// Real-vs-real pairings come first in roster order; the remaining entrants each
/// get a bye as their opponent.
fn first_round_pairs(entrants: Vec<Entrant>, size: usize) -> Vec<(Entrant, Entrant)> {
    let byes = size - entrants.len();
    let full_pairs = size / 2 - byes;

    let mut pairs = Vec::with_capacity(size / 2);
    let mut iter = entrants.into_iter();
    for _ in 0..full_pairs {
        if let (Some(a), Some(b)) = (iter.next(), iter.next()) {
            pairs.push((a, b));
        }
    }
    pairs.extend(iter.map(|e| (e, Entrant::Bye)));
    pairs
}

/// Record a 1-0 win for the real side of a one-bye match
fn award_bye(m: &mut Match) -> bool {
    let (score1, score2) = match (&m.player1, &m.player2) {
        (Participant::Player(_), Participant::Bye) => (1, 0),
        (Participant::Bye, Participant::Player(_)) => (0, 1),
        (Participant::Bye, Participant::Bye) => {
            log::warn!("Match {} has byes on both sides; left unresolved", m.id);
            return false;
        }
        _ => return false,
    };

    m.score1 = Some(score1);
    m.score2 = Some(score2);
    m.played = true;
    true
}

/// Move the winner of `matches[index]` into its linked match
///
/// An unplayed or drawn match puts its slot back to undecided, so a result
/// recorded over an earlier one never leaves a stale winner behind.
pub(crate) fn advance_winner(matches: &mut [Match], index: usize) {
    let m = &matches[index];
    let (Some(next_id), Some(slot)) = (m.next_match_id, m.next_match_slot) else {
        return;
    };
    let winner = m.winner().cloned().unwrap_or(Participant::ToBeDecided);

    match matches.iter_mut().find(|n| n.id == next_id) {
        Some(next) => next.set_participant(slot, winner),
        None => log::warn!("Linked match {} not found; winner not advanced", next_id),
    }
}
