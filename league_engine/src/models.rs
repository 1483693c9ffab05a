//! Tournament, division, match and player models.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SpotConfig;
use crate::errors::{LeagueError, LeagueResult};
use crate::standings::{self, LEAGUE_CRITERIA};

/// Tournament ID type
pub type TournamentId = Uuid;

/// Division ID type
pub type DivisionId = Uuid;

/// Match ID type
pub type MatchId = Uuid;

/// Display label of a bye side
pub const BYE_LABEL: &str = "BYE";

/// Display label of a bracket side not yet decided
pub const TBD_LABEL: &str = "A definir";

/// Name prefix of promotion playoff divisions
pub const PROMOTION_PREFIX: &str = "Promoción";

/// Name of the pooled finals division
pub const FINAL_PHASE_NAME: &str = "Fase Final";

/// Name of the division a new tournament starts with
pub const DEFAULT_DIVISION_NAME: &str = "Clasificación";

/// Player standing within a division
///
/// Stats are derived by [`standings::compute_standings`]; a freshly created player
/// has every counter at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Player {
    /// Unique within a division
    pub name: String,
    pub points: u32,
    pub games_played: u32,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub matches_tied: u32,
    /// Overtime wins
    pub extra_time_games: u32,
    pub goals_in_favor: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points_in_match: u32,
    pub shooting: u32,
    pub saved: u32,
}

impl Player {
    /// Create a player with zeroed stats
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Same player with every stat reset to zero
    pub fn reset_stats(&self) -> Self {
        Self::new(self.name.clone())
    }
}

/// Per-player detail recorded with a match result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchStats {
    pub shots: u32,
    pub saves: u32,
    pub points_in_match: u32,
}

impl MatchStats {
    pub fn new(shots: u32, saves: u32, points_in_match: u32) -> Self {
        Self {
            shots,
            saves,
            points_in_match,
        }
    }
}

/// Roster entry fed to the fixture generators
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Entrant {
    Player(String),
    Bye,
}

impl Entrant {
    pub fn is_bye(&self) -> bool {
        matches!(self, Entrant::Bye)
    }

    /// Roster as entrants, in roster order
    pub fn from_players(players: &[Player]) -> Vec<Entrant> {
        players
            .iter()
            .map(|p| Entrant::Player(p.name.clone()))
            .collect()
    }
}

impl From<Entrant> for Participant {
    fn from(entrant: Entrant) -> Self {
        match entrant {
            Entrant::Player(name) => Participant::Player(name),
            Entrant::Bye => Participant::Bye,
        }
    }
}

/// One side of a match
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Participant {
    Player(String),
    Bye,
    /// Bracket slot waiting for the winner of a previous round
    ToBeDecided,
}

impl Participant {
    pub fn player(name: impl Into<String>) -> Self {
        Participant::Player(name.into())
    }

    /// Player name, if this side is a real player
    pub fn name(&self) -> Option<&str> {
        match self {
            Participant::Player(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Participant::Bye)
    }

    pub fn is_player(&self) -> bool {
        matches!(self, Participant::Player(_))
    }
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Participant::Player(name) => write!(f, "{name}"),
            Participant::Bye => write!(f, "{BYE_LABEL}"),
            Participant::ToBeDecided => write!(f, "{TBD_LABEL}"),
        }
    }
}

/// Side of the linked match a bracket winner advances into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BracketSlot {
    Player1,
    Player2,
}

impl BracketSlot {
    /// Slot fed by the match at `index` within its round
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            BracketSlot::Player1
        } else {
            BracketSlot::Player2
        }
    }
}

/// A scheduled or played match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub division_id: DivisionId,
    pub player1: Participant,
    pub player2: Participant,
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub played: bool,
    #[serde(default)]
    pub is_overtime: bool,
    /// 1-indexed
    pub round: u32,
    #[serde(default)]
    pub player1_stats: Option<MatchStats>,
    #[serde(default)]
    pub player2_stats: Option<MatchStats>,
    /// Bracket match the winner advances into
    #[serde(default)]
    pub next_match_id: Option<MatchId>,
    #[serde(default)]
    pub next_match_slot: Option<BracketSlot>,
    #[serde(default)]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub postponed: bool,
}

impl Match {
    /// Create an unplayed match
    pub fn new(
        division_id: DivisionId,
        player1: Participant,
        player2: Participant,
        round: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            division_id,
            player1,
            player2,
            score1: None,
            score2: None,
            played: false,
            is_overtime: false,
            round,
            player1_stats: None,
            player2_stats: None,
            next_match_id: None,
            next_match_slot: None,
            scheduled_date: None,
            postponed: false,
        }
    }

    /// Final score, only for played matches with both scores recorded
    pub fn score(&self) -> Option<(u32, u32)> {
        match (self.played, self.score1, self.score2) {
            (true, Some(s1), Some(s2)) => Some((s1, s2)),
            _ => None,
        }
    }

    /// Winning side; `None` when unplayed or drawn
    pub fn winner(&self) -> Option<&Participant> {
        let (s1, s2) = self.score()?;
        match s1.cmp(&s2) {
            std::cmp::Ordering::Greater => Some(&self.player1),
            std::cmp::Ordering::Less => Some(&self.player2),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn participant(&self, slot: BracketSlot) -> &Participant {
        match slot {
            BracketSlot::Player1 => &self.player1,
            BracketSlot::Player2 => &self.player2,
        }
    }

    pub fn set_participant(&mut self, slot: BracketSlot, participant: Participant) {
        match slot {
            BracketSlot::Player1 => self.player1 = participant,
            BracketSlot::Player2 => self.player2 = participant,
        }
    }

    /// Whether the named player takes part in this match
    pub fn involves(&self, name: &str) -> bool {
        self.player1.name() == Some(name) || self.player2.name() == Some(name)
    }
}

/// Role of a division within its tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DivisionKind {
    /// Ordinary league table or group
    Regular,
    /// Promotion playoff between two adjacent regular divisions
    #[serde(rename_all = "camelCase")]
    Promotion {
        high_division_id: DivisionId,
        low_division_id: DivisionId,
    },
    /// Qualifiers pooled from several groups
    FinalPhase,
}

/// A division owning its players and matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Division {
    pub id: DivisionId,
    pub name: String,
    #[serde(default = "regular_kind")]
    pub kind: DivisionKind,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(flatten)]
    pub spots: SpotConfig,
}

fn regular_kind() -> DivisionKind {
    DivisionKind::Regular
}

impl Division {
    /// Create an empty regular division
    pub fn new(name: impl Into<String>, spots: SpotConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: DivisionKind::Regular,
            players: Vec::new(),
            matches: Vec::new(),
            spots,
        }
    }

    pub fn is_regular(&self) -> bool {
        matches!(self.kind, DivisionKind::Regular)
    }

    pub fn is_promotion(&self) -> bool {
        matches!(self.kind, DivisionKind::Promotion { .. })
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn has_player(&self, name: &str) -> bool {
        self.player(name).is_some()
    }

    /// Add zero-stat players
    ///
    /// Fails without adding anyone if a name is already taken or repeated.
    pub fn add_players<I, S>(&mut self, names: I) -> LeagueResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut taken: HashSet<String> = self.players.iter().map(|p| p.name.clone()).collect();
        let mut added = Vec::new();

        for name in names {
            let name = name.into();
            if !taken.insert(name.clone()) {
                return Err(LeagueError::InvalidState(format!(
                    "Player '{}' already exists in division '{}'",
                    name, self.name
                )));
            }
            added.push(Player::new(name));
        }

        self.players.extend(added);
        Ok(())
    }

    /// Remove a player from the roster
    ///
    /// A player who already appears in one of the division's matches stays, so no
    /// match is left pointing at a missing roster entry.
    pub fn remove_player(&mut self, name: &str) -> LeagueResult<Player> {
        let index = self
            .players
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| LeagueError::PlayerNotFound(name.to_string()))?;

        if self.matches.iter().any(|m| m.involves(name)) {
            return Err(LeagueError::InvalidState(format!(
                "Player '{}' already has matches in division '{}'",
                name, self.name
            )));
        }

        Ok(self.players.remove(index))
    }

    /// Replace the spot configuration, checked against the current roster
    pub fn update_spots(&mut self, spots: SpotConfig) -> LeagueResult<()> {
        spots.validate(self.players.len())?;
        self.spots = spots;
        Ok(())
    }

    /// Rename a player in the roster and in every match of this division
    pub fn rename_player(&mut self, old_name: &str, new_name: &str) -> LeagueResult<()> {
        if old_name == new_name {
            return Ok(());
        }
        if self.has_player(new_name) {
            return Err(LeagueError::InvalidState(format!(
                "Player '{}' already exists in division '{}'",
                new_name, self.name
            )));
        }

        let player = self
            .players
            .iter_mut()
            .find(|p| p.name == old_name)
            .ok_or_else(|| LeagueError::PlayerNotFound(old_name.to_string()))?;
        player.name = new_name.to_string();

        for m in &mut self.matches {
            for side in [&mut m.player1, &mut m.player2] {
                if side.name() == Some(old_name) {
                    *side = Participant::player(new_name);
                }
            }
        }

        Ok(())
    }

    pub fn find_match(&self, match_id: MatchId) -> LeagueResult<&Match> {
        self.matches
            .iter()
            .find(|m| m.id == match_id)
            .ok_or(LeagueError::MatchNotFound(match_id))
    }

    /// Recompute every player's stats from this division's matches
    pub fn refresh_standings(&mut self) {
        self.players = standings::compute_standings(&self.players, &self.matches);
    }

    /// Players ordered by league criteria
    pub fn ranked_players(&self) -> Vec<Player> {
        standings::rank(&self.players, &LEAGUE_CRITERIA)
    }

    /// Whether every match has a recorded result
    pub fn all_matches_played(&self) -> bool {
        self.matches.iter().all(|m| m.score().is_some())
    }
}

/// Tournament type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentType {
    /// Divisions play round robins; promotion/relegation between seasons
    League,
    /// Single knockout bracket
    Cup,
    /// Round-robin groups followed by a knockout final phase
    Champions,
}

impl std::fmt::Display for TournamentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentType::League => write!(f, "LEAGUE"),
            TournamentType::Cup => write!(f, "CUP"),
            TournamentType::Champions => write!(f, "CHAMPIONS"),
        }
    }
}

impl std::str::FromStr for TournamentType {
    type Err = LeagueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LEAGUE" => Ok(TournamentType::League),
            "CUP" => Ok(TournamentType::Cup),
            "CHAMPIONS" => Ok(TournamentType::Champions),
            _ => Err(LeagueError::InvalidConfig {
                field: "type".to_string(),
                reason: format!("unknown tournament type '{s}'"),
            }),
        }
    }
}

/// Tournament status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentStatus {
    Active,
    Finished,
}

/// A tournament owning its divisions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub tournament_type: TournamentType,
    pub status: TournamentStatus,
    /// Champion's player name, set when the tournament finishes
    #[serde(default)]
    pub champion: Option<String>,
    #[serde(default)]
    pub divisions: Vec<Division>,
}

impl Tournament {
    /// Create an active tournament with one initial division of zero-stat players
    pub fn new<I, S>(
        name: impl Into<String>,
        tournament_type: TournamentType,
        player_names: I,
        initial_division_name: &str,
    ) -> LeagueResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut division = Division::new(initial_division_name, SpotConfig::default());
        division.add_players(player_names)?;

        Ok(Self::with_divisions(name, tournament_type, vec![division]))
    }

    /// Create an active tournament from prepared divisions
    pub fn with_divisions(
        name: impl Into<String>,
        tournament_type: TournamentType,
        divisions: Vec<Division>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date: Utc::now(),
            tournament_type,
            status: TournamentStatus::Active,
            champion: None,
            divisions,
        }
    }

    pub fn division(&self, division_id: DivisionId) -> LeagueResult<&Division> {
        self.divisions
            .iter()
            .find(|d| d.id == division_id)
            .ok_or(LeagueError::DivisionNotFound(division_id))
    }

    pub fn division_mut(&mut self, division_id: DivisionId) -> LeagueResult<&mut Division> {
        self.divisions
            .iter_mut()
            .find(|d| d.id == division_id)
            .ok_or(LeagueError::DivisionNotFound(division_id))
    }

    pub fn division_by_name(&self, name: &str) -> Option<&Division> {
        self.divisions.iter().find(|d| d.name == name)
    }

    /// Regular divisions, highest first
    pub fn regular_divisions(&self) -> impl Iterator<Item = &Division> {
        self.divisions.iter().filter(|d| d.is_regular())
    }

    pub fn promotion_divisions(&self) -> impl Iterator<Item = &Division> {
        self.divisions.iter().filter(|d| d.is_promotion())
    }

    /// Append a division built by one of the resolvers
    pub fn add_division(&mut self, division: Division) -> DivisionId {
        let id = division.id;
        self.divisions.push(division);
        id
    }

    pub fn is_finished(&self) -> bool {
        self.status == TournamentStatus::Finished
    }
}

/// Look up a tournament in a snapshot
pub fn find_tournament(tournaments: &[Tournament], id: TournamentId) -> LeagueResult<&Tournament> {
    tournaments
        .iter()
        .find(|t| t.id == id)
        .ok_or(LeagueError::TournamentNotFound(id))
}

/// Mutable lookup of a tournament in a snapshot
pub fn find_tournament_mut(
    tournaments: &mut [Tournament],
    id: TournamentId,
) -> LeagueResult<&mut Tournament> {
    tournaments
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(LeagueError::TournamentNotFound(id))
}
