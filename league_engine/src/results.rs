//! Match results, rescheduling and champion determination.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{LeagueError, LeagueResult};
use crate::fixture::bracket::advance_winner;
use crate::models::{
    Division, DivisionId, DivisionKind, Match, MatchId, MatchStats, Tournament, TournamentStatus,
    TournamentType,
};
use crate::standings::{LEAGUE_CRITERIA, rank};

/// Result of a played match as reported by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchResult {
    pub score1: u32,
    pub score2: u32,
    pub is_overtime: bool,
    pub player1_stats: Option<MatchStats>,
    pub player2_stats: Option<MatchStats>,
    /// Replaces the scheduled date when set
    pub scheduled_date: Option<DateTime<Utc>>,
    pub postponed: bool,
}

impl MatchResult {
    pub fn new(score1: u32, score2: u32) -> Self {
        Self {
            score1,
            score2,
            ..Self::default()
        }
    }

    pub fn overtime(mut self) -> Self {
        self.is_overtime = true;
        self
    }

    pub fn with_stats(mut self, player1: MatchStats, player2: MatchStats) -> Self {
        self.player1_stats = Some(player1);
        self.player2_stats = Some(player2);
        self
    }
}

/// Record a result, advance the bracket winner and refresh the division's standings
///
/// Recording over an existing result replaces it, as long as the match it feeds
/// has not been played yet. Both sides must be real players: bye matches are
/// settled at generation and TBD slots have nobody to score.
pub fn record_result(
    division: &mut Division,
    match_id: MatchId,
    result: MatchResult,
) -> LeagueResult<()> {
    let index = division
        .matches
        .iter()
        .position(|m| m.id == match_id)
        .ok_or(LeagueError::MatchNotFound(match_id))?;

    let m = &division.matches[index];
    if !m.player1.is_player() || !m.player2.is_player() {
        return Err(LeagueError::InvalidState(format!(
            "Match {} ({} vs {}) has no opponent to score",
            m.id, m.player1, m.player2
        )));
    }

    let next_played = m
        .next_match_id
        .is_some_and(|next_id| division.find_match(next_id).is_ok_and(|next| next.played));
    if next_played {
        return Err(LeagueError::InvalidState(format!(
            "Match {} feeds a match that has already been played",
            m.id
        )));
    }

    let m = &mut division.matches[index];

    m.score1 = Some(result.score1);
    m.score2 = Some(result.score2);
    m.is_overtime = result.is_overtime;
    m.player1_stats = result.player1_stats;
    m.player2_stats = result.player2_stats;
    m.postponed = result.postponed;
    if result.scheduled_date.is_some() {
        m.scheduled_date = result.scheduled_date;
    }
    m.played = true;

    if m.next_match_id.is_some() && m.winner().is_none() {
        log::warn!("Knockout match {} ended level; nobody advances", m.id);
    }
    advance_winner(&mut division.matches, index);

    division.refresh_standings();
    Ok(())
}

/// Set or clear the scheduled date and postponed flag of an unplayed match
pub fn reschedule_match(
    division: &mut Division,
    match_id: MatchId,
    scheduled_date: Option<DateTime<Utc>>,
    postponed: bool,
) -> LeagueResult<&Match> {
    let m = division
        .matches
        .iter_mut()
        .find(|m| m.id == match_id)
        .ok_or(LeagueError::MatchNotFound(match_id))?;

    if m.played {
        return Err(LeagueError::InvalidState(format!(
            "Match {} has already been played",
            m.id
        )));
    }

    m.scheduled_date = scheduled_date;
    m.postponed = postponed;
    Ok(m)
}

impl Tournament {
    /// Record a result in one of this tournament's divisions
    pub fn record_result(
        &mut self,
        division_id: DivisionId,
        match_id: MatchId,
        result: MatchResult,
    ) -> LeagueResult<()> {
        record_result(self.division_mut(division_id)?, match_id, result)
    }

    /// Close the tournament and name its champion
    ///
    /// LEAGUE: best player across regular divisions by league criteria.
    /// CUP and CHAMPIONS: winner of the highest-round match, when it is played and
    /// decisive. A CHAMPIONS tournament with a final phase only looks at that phase.
    pub fn finish(&mut self) -> LeagueResult<Option<String>> {
        if self.is_finished() {
            return Err(LeagueError::InvalidState(format!(
                "Tournament '{}' is already finished",
                self.name
            )));
        }

        let champion = match self.tournament_type {
            TournamentType::League => {
                let players: Vec<_> = self
                    .regular_divisions()
                    .flat_map(|d| d.players.iter().cloned())
                    .collect();
                rank(&players, &LEAGUE_CRITERIA)
                    .into_iter()
                    .next()
                    .map(|p| p.name)
            }
            TournamentType::Cup | TournamentType::Champions => self
                .final_match()
                .and_then(|m| m.winner())
                .and_then(|p| p.name())
                .map(str::to_string),
        };

        self.status = TournamentStatus::Finished;
        self.champion = champion.clone();

        match &champion {
            Some(name) => log::info!("Tournament '{}' finished, champion: {}", self.name, name),
            None => log::info!("Tournament '{}' finished without a champion", self.name),
        }

        Ok(champion)
    }

    /// Highest-round match; earlier matches win ties
    fn final_match(&self) -> Option<&Match> {
        let final_phase = self
            .divisions
            .iter()
            .find(|d| d.kind == DivisionKind::FinalPhase);
        let divisions = match final_phase {
            Some(division) => std::slice::from_ref(division),
            None => self.divisions.as_slice(),
        };

        divisions
            .iter()
            .flat_map(|d| &d.matches)
            .reduce(|best, m| if m.round > best.round { m } else { best })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpotConfig;
    use crate::fixture::{NoShuffle, generate_cup_fixture};
    use crate::models::{DEFAULT_DIVISION_NAME, Participant, Player};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn cup_division(n: usize) -> Division {
        let mut division = Division::new("Copa", SpotConfig::default());
        division
            .add_players((1..=n).map(|i| format!("P{i}")))
            .unwrap();
        division.matches = generate_cup_fixture(division.id, &division.players, false, &mut NoShuffle);
        division
    }

    fn league_division() -> Division {
        let mut division = Division::new("Primera", SpotConfig::default());
        division.add_players(["Ana", "Beto"]).unwrap();
        let m = Match::new(
            division.id,
            Participant::player("Ana"),
            Participant::player("Beto"),
            1,
        );
        division.matches.push(m);
        division
    }

    #[test]
    fn test_record_result_refreshes_standings() {
        let mut division = league_division();
        let id = division.matches[0].id;

        record_result(
            &mut division,
            id,
            MatchResult::new(2, 1).with_stats(MatchStats::new(5, 2, 3), MatchStats::default()),
        )
        .unwrap();

        let m = &division.matches[0];
        assert!(m.played);
        assert_eq!(m.score(), Some((2, 1)));
        let ana = division.player("Ana").unwrap();
        assert_eq!(ana.points, 3);
        assert_eq!(ana.shooting, 5);
    }

    #[test]
    fn test_rerecording_replaces_result() {
        let mut division = league_division();
        let id = division.matches[0].id;

        record_result(&mut division, id, MatchResult::new(2, 1)).unwrap();
        record_result(&mut division, id, MatchResult::new(0, 0)).unwrap();

        assert_eq!(division.player("Ana").unwrap().points, 1);
        assert_eq!(division.player("Beto").unwrap().points, 1);
        assert_eq!(division.player("Ana").unwrap().games_played, 1);
    }

    #[test]
    fn test_record_result_keeps_schedule_unless_given() {
        let mut division = league_division();
        let id = division.matches[0].id;
        let date = Utc.with_ymd_and_hms(2025, 3, 1, 18, 0, 0).unwrap();
        reschedule_match(&mut division, id, Some(date), false).unwrap();

        record_result(&mut division, id, MatchResult::new(1, 0)).unwrap();
        assert_eq!(division.matches[0].scheduled_date, Some(date));
    }

    #[test]
    fn test_winner_advances_in_bracket() {
        let mut division = cup_division(4);
        let semi = division.matches[0].id;
        let final_id = division.matches[0].next_match_id.unwrap();

        record_result(&mut division, semi, MatchResult::new(1, 3)).unwrap();

        let final_match = division.find_match(final_id).unwrap();
        assert_eq!(final_match.player1, Participant::player("P2"));
        assert_eq!(final_match.player2, Participant::ToBeDecided);
    }

    #[test]
    fn test_drawn_rerecord_clears_advanced_winner() {
        let mut division = cup_division(4);
        let semi = division.matches[0].id;
        let final_id = division.matches[0].next_match_id.unwrap();

        record_result(&mut division, semi, MatchResult::new(2, 0)).unwrap();
        assert_eq!(
            division.find_match(final_id).unwrap().player1,
            Participant::player("P1")
        );

        record_result(&mut division, semi, MatchResult::new(1, 1)).unwrap();
        let final_match = division.find_match(final_id).unwrap();
        assert_eq!(final_match.player1, Participant::ToBeDecided);
        assert!(!final_match.played);
    }

    #[test]
    fn test_rerecord_after_next_match_played_rejected() {
        let mut division = cup_division(4);
        let (semi1, semi2) = (division.matches[0].id, division.matches[1].id);
        let final_id = division.matches[0].next_match_id.unwrap();

        record_result(&mut division, semi1, MatchResult::new(2, 0)).unwrap();
        record_result(&mut division, semi2, MatchResult::new(2, 0)).unwrap();
        record_result(&mut division, final_id, MatchResult::new(3, 0)).unwrap();

        let err = record_result(&mut division, semi1, MatchResult::new(0, 2)).unwrap_err();
        assert!(matches!(err, LeagueError::InvalidState(_)));

        let semi = division.find_match(semi1).unwrap();
        assert_eq!(semi.score(), Some((2, 0)));
        let final_match = division.find_match(final_id).unwrap();
        assert_eq!(final_match.player1, Participant::player("P1"));
        assert_eq!(final_match.winner(), Some(&Participant::player("P1")));
        let p2 = division.player("P2").unwrap();
        assert_eq!((p2.games_played, p2.matches_won), (1, 0));
    }

    #[test]
    fn test_tbd_match_cannot_be_recorded() {
        let mut division = cup_division(4);
        let final_id = division.matches[0].next_match_id.unwrap();

        let err = record_result(&mut division, final_id, MatchResult::new(1, 0)).unwrap_err();
        assert!(matches!(err, LeagueError::InvalidState(_)));
    }

    #[test]
    fn test_bye_match_cannot_be_recorded() {
        let mut division = cup_division(3);
        let bye = division
            .matches
            .iter()
            .find(|m| m.player2.is_bye())
            .unwrap()
            .id;

        let err = record_result(&mut division, bye, MatchResult::new(0, 1)).unwrap_err();
        assert!(matches!(err, LeagueError::InvalidState(_)));
    }

    #[test]
    fn test_missing_match() {
        let mut division = league_division();
        let missing = Uuid::new_v4();
        assert_eq!(
            record_result(&mut division, missing, MatchResult::new(1, 0)).unwrap_err(),
            LeagueError::MatchNotFound(missing)
        );
    }

    #[test]
    fn test_reschedule_played_match_rejected() {
        let mut division = league_division();
        let id = division.matches[0].id;

        let m = reschedule_match(&mut division, id, None, true).unwrap();
        assert!(m.postponed);

        record_result(&mut division, id, MatchResult::new(1, 0)).unwrap();
        assert!(matches!(
            reschedule_match(&mut division, id, None, true),
            Err(LeagueError::InvalidState(_))
        ));
    }

    #[test]
    fn test_finish_league_picks_best_across_divisions() {
        let mut high = Division::new("Primera", SpotConfig::default());
        let mut low = Division::new("Segunda", SpotConfig::default());
        let mut ana = Player::new("Ana");
        ana.points = 9;
        let mut zoe = Player::new("Zoe");
        zoe.points = 9;
        zoe.goal_difference = 4;
        high.players.push(ana);
        low.players.push(zoe);

        let mut tournament =
            Tournament::with_divisions("Liga", TournamentType::League, vec![high, low]);
        assert_eq!(tournament.finish().unwrap(), Some("Zoe".to_string()));
        assert!(tournament.is_finished());
        assert!(matches!(
            tournament.finish(),
            Err(LeagueError::InvalidState(_))
        ));
    }

    #[test]
    fn test_finish_cup_uses_final() {
        let mut tournament =
            Tournament::with_divisions("Copa", TournamentType::Cup, vec![cup_division(4)]);
        let division_id = tournament.divisions[0].id;
        let ids: Vec<MatchId> = tournament.divisions[0].matches.iter().map(|m| m.id).collect();

        tournament.record_result(division_id, ids[0], MatchResult::new(2, 0)).unwrap();
        tournament.record_result(division_id, ids[1], MatchResult::new(0, 1)).unwrap();
        tournament
            .record_result(division_id, ids[2], MatchResult::new(3, 4).overtime())
            .unwrap();

        assert_eq!(tournament.finish().unwrap(), Some("P4".to_string()));
        assert_eq!(tournament.champion.as_deref(), Some("P4"));
    }

    #[test]
    fn test_finish_cup_without_final_result() {
        let mut tournament = Tournament::new(
            "Copa",
            TournamentType::Cup,
            ["Ana", "Beto"],
            DEFAULT_DIVISION_NAME,
        )
        .unwrap();
        assert_eq!(tournament.finish().unwrap(), None);
        assert_eq!(tournament.status, TournamentStatus::Finished);
    }
}
