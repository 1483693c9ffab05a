//! Fixture generation for round-robin divisions and knockout brackets.
//!
//! - [`round_robin`]: circle-method single round robin with home/away balancing
//! - [`bracket`]: single elimination with byes and advancement links
//! - [`shuffle`]: injectable ordering source so schedules can be reproduced
//!
//! ## Example
//!
//! ```
//! use league_engine::fixture::{generate_league_fixture, shuffle::SeededShuffler};
//! use league_engine::models::Player;
//! use uuid::Uuid;
//!
//! let players: Vec<Player> = ["Ana", "Beto", "Carla", "Dani"]
//!     .iter()
//!     .map(|n| Player::new(*n))
//!     .collect();
//!
//! let mut shuffler = SeededShuffler::from_seed(7);
//! let matches = generate_league_fixture(Uuid::new_v4(), &players, &mut shuffler);
//! assert_eq!(matches.len(), 6);
//! ```

pub mod bracket;
pub mod round_robin;
pub mod shuffle;

pub use bracket::generate_cup_fixture;
pub use round_robin::generate_league_fixture;
pub use shuffle::{NoShuffle, RandomShuffler, SeededShuffler, Shuffler};

use crate::config::{FixtureKind, FixtureOptions};
use crate::errors::{LeagueError, LeagueResult};
use crate::models::{DivisionId, Match, Tournament};

impl Tournament {
    /// Generate the fixture of one division
    ///
    /// The generator and shuffle decision follow [`FixtureOptions::for_division`].
    /// Fails if the division already has matches.
    pub fn generate_fixture<S: Shuffler>(
        &mut self,
        division_id: DivisionId,
        shuffler: &mut S,
    ) -> LeagueResult<&[Match]> {
        let tournament_type = self.tournament_type;
        let division = self.division(division_id)?;
        let options = FixtureOptions::for_division(tournament_type, &division.kind, &division.name);
        self.generate_fixture_with(division_id, options, shuffler)
    }

    /// Generate the fixture of one division with explicit options
    pub fn generate_fixture_with<S: Shuffler>(
        &mut self,
        division_id: DivisionId,
        options: FixtureOptions,
        shuffler: &mut S,
    ) -> LeagueResult<&[Match]> {
        let division = self.division_mut(division_id)?;

        if !division.matches.is_empty() {
            return Err(LeagueError::InvalidState(format!(
                "Division '{}' already has {} matches",
                division.name,
                division.matches.len()
            )));
        }

        division.matches = match options.kind {
            FixtureKind::RoundRobin => {
                generate_league_fixture(division.id, &division.players, shuffler)
            }
            FixtureKind::Knockout => {
                generate_cup_fixture(division.id, &division.players, options.shuffle, shuffler)
            }
        };

        // Bye wins are already recorded
        division.refresh_standings();

        log::info!(
            "Generated {} fixture for division '{}' ({} matches)",
            options.kind,
            division.name,
            division.matches.len()
        );

        Ok(&division.matches)
    }
}
