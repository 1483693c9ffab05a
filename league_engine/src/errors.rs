//! League error types.

use thiserror::Error;

use crate::models::{DivisionId, MatchId, TournamentId};

/// League engine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeagueError {
    /// Tournament missing from the supplied snapshot
    #[error("Tournament not found: {0}")]
    TournamentNotFound(TournamentId),

    /// Division missing from the supplied tournament
    #[error("Division not found: {0}")]
    DivisionNotFound(DivisionId),

    /// Match missing from the supplied division
    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    /// Player missing from the supplied roster
    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    /// Operation not allowed in the current state (e.g. fixture already generated)
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Spot configuration that cannot be applied to a roster
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },
}

impl LeagueError {
    /// Whether this error belongs to the NotFound family
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LeagueError::TournamentNotFound(_)
                | LeagueError::DivisionNotFound(_)
                | LeagueError::MatchNotFound(_)
                | LeagueError::PlayerNotFound(_)
        )
    }

    /// Get a client-safe error message
    ///
    /// Internal identifiers are left out so the orchestration layer can show the
    /// message as-is.
    pub fn client_message(&self) -> String {
        match self {
            LeagueError::TournamentNotFound(_) => "Tournament not found".to_string(),
            LeagueError::DivisionNotFound(_) => "Division not found".to_string(),
            LeagueError::MatchNotFound(_) => "Match not found".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for league operations
pub type LeagueResult<T> = Result<T, LeagueError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_not_found_family() {
        assert!(LeagueError::DivisionNotFound(Uuid::new_v4()).is_not_found());
        assert!(LeagueError::PlayerNotFound("Ana".to_string()).is_not_found());
        assert!(!LeagueError::InvalidState("already generated".to_string()).is_not_found());
    }

    #[test]
    fn test_client_message_hides_ids() {
        let id = Uuid::new_v4();
        let msg = LeagueError::MatchNotFound(id).client_message();
        assert_eq!(msg, "Match not found");
        assert!(!msg.contains(&id.to_string()));

        let err = LeagueError::InvalidConfig {
            field: "directRelegationSpots".to_string(),
            reason: "exceeds roster".to_string(),
        };
        assert!(err.client_message().contains("directRelegationSpots"));
    }
}
