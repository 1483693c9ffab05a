//! # League Engine
//!
//! Scheduling and standings for amateur competitions: round-robin leagues,
//! knockout cups and group-plus-finals tournaments, with promotion and
//! relegation between divisions across seasons.
//!
//! The engine is pure and synchronous. Every operation takes a snapshot of
//! players, matches or tournaments and returns new values or mutates the value it
//! was given; persistence and presentation belong to the caller. The only
//! nondeterminism is the shuffle step of fixture generation, which is injected
//! through [`fixture::Shuffler`].
//!
//! ## Lifecycle
//!
//! - **Create**: [`Tournament::new`] with an initial division of zero-stat players
//! - **Schedule**: [`Tournament::generate_fixture`] picks round robin or knockout
//! - **Play**: [`results::record_result`] stores scores, advances bracket winners
//!   and recomputes standings
//! - **Promote**: [`Tournament::create_promotion_division`] and
//!   [`Tournament::create_playoffs_division`] build playoff divisions
//! - **Close**: [`Tournament::finish`] names the champion
//! - **Roll over**: [`promotion::resolve_next_season`] builds next season's divisions
//!
//! ## Core Modules
//!
//! - [`standings`]: stat aggregation and ranking
//! - [`fixture`]: round-robin and bracket generators
//! - [`promotion`]: direct movement, promotion playoffs, final phase and season rollover
//! - [`results`]: result recording and champion determination
//!
//! ## Example
//!
//! ```
//! use league_engine::{NoShuffle, Tournament, TournamentType, DEFAULT_DIVISION_NAME};
//!
//! let mut tournament = Tournament::new(
//!     "Apertura",
//!     TournamentType::League,
//!     ["Ana", "Beto", "Carla"],
//!     DEFAULT_DIVISION_NAME,
//! )
//! .unwrap();
//!
//! let division_id = tournament.divisions[0].id;
//! let matches = tournament.generate_fixture(division_id, &mut NoShuffle).unwrap();
//! // Three players: one bye per round, never scheduled
//! assert_eq!(matches.len(), 3);
//! ```

/// Division spot configuration and fixture options.
pub mod config;

/// Error taxonomy.
pub mod errors;
pub use errors::{LeagueError, LeagueResult};

/// Fixture generation.
pub mod fixture;
pub use fixture::{NoShuffle, RandomShuffler, SeededShuffler, Shuffler};

/// Tournament, division, match and player models.
pub mod models;
pub use models::{
    DEFAULT_DIVISION_NAME, Division, DivisionId, DivisionKind, Match, MatchId, Participant,
    Player, Tournament, TournamentId, TournamentStatus, TournamentType,
};

/// Promotion, relegation and season rollover.
pub mod promotion;

/// Result recording.
pub mod results;
pub use results::MatchResult;

/// Standings aggregation.
pub mod standings;
pub use standings::{LEAGUE_CRITERIA, RankCriteria, compute_standings};
