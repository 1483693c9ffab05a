//! Single round-robin schedule using the circle method.
//!
//! Position 0 stays fixed while the rest of the entrants rotate one step after
//! every round. In round `r`, position `i` meets position `n - 1 - i`.

use crate::models::{DivisionId, Entrant, Match, Player};

use super::shuffle::Shuffler;

/// Generate a full single round robin for a roster
///
/// An odd roster gets a bye entrant; its pairings are dropped from the output.
/// Each player meets every other player exactly once over `n - 1` rounds
/// (`n` counting the bye), and home games are balanced as the schedule is built.
pub fn generate_league_fixture<S: Shuffler>(
    division_id: DivisionId,
    players: &[Player],
    shuffler: &mut S,
) -> Vec<Match> {
    let mut entrants = Entrant::from_players(players);
    if entrants.len() % 2 != 0 {
        entrants.push(Entrant::Bye);
    }
    shuffler.shuffle(&mut entrants);

    let n = entrants.len();
    if n < 2 {
        return Vec::new();
    }

    // Rotation works on indices into `entrants`
    let mut order: Vec<usize> = (0..n).collect();
    let mut home_games = vec![0u32; n];
    let mut matches = Vec::with_capacity(n / 2 * (n - 1));

    for round in 0..n - 1 {
        for i in 0..n / 2 {
            let (mut home, mut away) = (order[i], order[n - 1 - i]);

            let swap = match home_games[home].cmp(&home_games[away]) {
                std::cmp::Ordering::Greater => true,
                std::cmp::Ordering::Equal => (round + i) % 2 == 1,
                std::cmp::Ordering::Less => false,
            };
            if swap {
                std::mem::swap(&mut home, &mut away);
            }

            // Bye pairings still count towards home balance
            home_games[home] += 1;

            if entrants[home].is_bye() || entrants[away].is_bye() {
                continue;
            }

            matches.push(Match::new(
                division_id,
                entrants[home].clone().into(),
                entrants[away].clone().into(),
                round as u32 + 1,
            ));
        }

        order[1..].rotate_right(1);
    }

    log::debug!(
        "Generated round robin for division {}: {} players, {} rounds, {} matches",
        division_id,
        players.len(),
        n - 1,
        matches.len()
    );

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::shuffle::NoShuffle;
    use uuid::Uuid;

    fn roster(n: usize) -> Vec<Player> {
        (0..n).map(|i| Player::new(format!("P{i}"))).collect()
    }

    fn pairing(m: &Match) -> (String, String) {
        (m.player1.to_string(), m.player2.to_string())
    }

    #[test]
    fn test_empty_and_single_rosters() {
        assert!(generate_league_fixture(Uuid::nil(), &[], &mut NoShuffle).is_empty());
        assert!(generate_league_fixture(Uuid::nil(), &roster(1), &mut NoShuffle).is_empty());
    }

    #[test]
    fn test_two_players_single_match() {
        let matches = generate_league_fixture(Uuid::nil(), &roster(2), &mut NoShuffle);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].round, 1);
        assert!(!matches[0].played);
        assert!(matches[0].score1.is_none() && matches[0].score2.is_none());
    }

    #[test]
    fn test_four_players_unshuffled_schedule() {
        let matches = generate_league_fixture(Uuid::nil(), &roster(4), &mut NoShuffle);
        let pairs: Vec<_> = matches.iter().map(pairing).collect();

        // Round 1: [0,1,2,3] -> 0v3, 1v2 (i=1 swaps on tie)
        // Round 2: [0,3,1,2] -> 0v2 tied on odd parity, so 2v0; 3v1
        // Round 3: [0,2,3,1] -> 0 has more home games, so 1v0; 3v2
        let expected = [
            ("P0", "P3"),
            ("P2", "P1"),
            ("P2", "P0"),
            ("P3", "P1"),
            ("P1", "P0"),
            ("P3", "P2"),
        ];
        let expected: Vec<_> = expected
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();
        assert_eq!(pairs, expected);
        assert_eq!(
            matches.iter().map(|m| m.round).collect::<Vec<_>>(),
            vec![1, 1, 2, 2, 3, 3]
        );
    }

    #[test]
    fn test_odd_roster_drops_byes() {
        let matches = generate_league_fixture(Uuid::nil(), &roster(5), &mut NoShuffle);
        assert_eq!(matches.len(), 10);
        assert!(matches.iter().all(|m| m.player1.is_player() && m.player2.is_player()));
        assert_eq!(matches.iter().map(|m| m.round).max(), Some(5));
    }
}
