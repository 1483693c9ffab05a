//! Command parsing and execution over a tournament snapshot.

use std::fmt::Write as _;

use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Utc};
use league_engine::config::SpotConfig;
use league_engine::models::{Division, find_tournament_mut};
use league_engine::promotion::resolve_next_season;
use league_engine::results::reschedule_match;
use league_engine::{
    DivisionId, LeagueResult, MatchId, MatchResult, RandomShuffler, SeededShuffler, Tournament,
    TournamentType,
};
use pico_args::Arguments;
use uuid::Uuid;

use crate::config::CliConfig;

/// One operation on the snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New {
        name: String,
        tournament_type: TournamentType,
        division: Option<String>,
        spots: SpotConfig,
        players: Vec<String>,
    },
    List,
    AddDivision {
        tournament: String,
        name: String,
        spots: SpotConfig,
        players: Vec<String>,
    },
    Spots {
        tournament: String,
        division: String,
        spots: SpotConfig,
    },
    Remove {
        tournament: String,
        division: String,
        player: String,
    },
    Rename {
        tournament: String,
        division: String,
        old_name: String,
        new_name: String,
    },
    Fixture {
        tournament: String,
        division: String,
    },
    Matches {
        tournament: String,
        division: String,
    },
    Result {
        tournament: String,
        division: String,
        match_id: MatchId,
        score1: u32,
        score2: u32,
        overtime: bool,
    },
    Reschedule {
        tournament: String,
        division: String,
        match_id: MatchId,
        date: Option<DateTime<Utc>>,
        postponed: bool,
    },
    Standings {
        tournament: String,
        division: String,
    },
    Promotion {
        tournament: String,
        high: String,
        low: String,
    },
    Playoffs {
        tournament: String,
        spots: usize,
    },
    Finish {
        tournament: String,
    },
    NextSeason {
        tournament: String,
        name: String,
    },
}

impl Command {
    /// Parse the subcommand and its arguments
    ///
    /// Options must be taken before positional arguments.
    pub fn parse(mut pargs: Arguments) -> Result<Self> {
        let sub = pargs
            .subcommand()?
            .ok_or_else(|| anyhow!("Missing command, see --help"))?;

        let command = match sub.as_str() {
            "new" => {
                let division = pargs.opt_value_from_str("--division")?;
                let spots = pargs
                    .opt_value_from_fn("--spots", parse_spots)?
                    .unwrap_or_default();
                let name = pargs.free_from_str()?;
                let tournament_type = pargs.free_from_str()?;
                Command::New {
                    name,
                    tournament_type,
                    division,
                    spots,
                    players: remaining(&mut pargs)?,
                }
            }
            "list" => Command::List,
            "division" => {
                let spots = pargs
                    .opt_value_from_fn("--spots", parse_spots)?
                    .unwrap_or_default();
                let tournament = pargs.free_from_str()?;
                let name = pargs.free_from_str()?;
                Command::AddDivision {
                    tournament,
                    name,
                    spots,
                    players: remaining(&mut pargs)?,
                }
            }
            "spots" => Command::Spots {
                tournament: pargs.free_from_str()?,
                division: pargs.free_from_str()?,
                spots: pargs.free_from_fn(parse_spots)?,
            },
            "remove" => Command::Remove {
                tournament: pargs.free_from_str()?,
                division: pargs.free_from_str()?,
                player: pargs.free_from_str()?,
            },
            "rename" => Command::Rename {
                tournament: pargs.free_from_str()?,
                division: pargs.free_from_str()?,
                old_name: pargs.free_from_str()?,
                new_name: pargs.free_from_str()?,
            },
            "fixture" => Command::Fixture {
                tournament: pargs.free_from_str()?,
                division: pargs.free_from_str()?,
            },
            "matches" => Command::Matches {
                tournament: pargs.free_from_str()?,
                division: pargs.free_from_str()?,
            },
            "result" => {
                let overtime = pargs.contains("--overtime");
                Command::Result {
                    tournament: pargs.free_from_str()?,
                    division: pargs.free_from_str()?,
                    match_id: pargs.free_from_str()?,
                    score1: pargs.free_from_str()?,
                    score2: pargs.free_from_str()?,
                    overtime,
                }
            }
            "reschedule" => {
                let postponed = pargs.contains("--postponed");
                let date = pargs.opt_value_from_str("--date")?;
                Command::Reschedule {
                    tournament: pargs.free_from_str()?,
                    division: pargs.free_from_str()?,
                    match_id: pargs.free_from_str()?,
                    date,
                    postponed,
                }
            }
            "standings" => Command::Standings {
                tournament: pargs.free_from_str()?,
                division: pargs.free_from_str()?,
            },
            "promotion" => Command::Promotion {
                tournament: pargs.free_from_str()?,
                high: pargs.free_from_str()?,
                low: pargs.free_from_str()?,
            },
            "playoffs" => Command::Playoffs {
                tournament: pargs.free_from_str()?,
                spots: pargs.free_from_str()?,
            },
            "finish" => Command::Finish {
                tournament: pargs.free_from_str()?,
            },
            "next-season" => Command::NextSeason {
                tournament: pargs.free_from_str()?,
                name: pargs.free_from_str()?,
            },
            other => bail!("Unknown command '{other}', see --help"),
        };

        let leftover = pargs.finish();
        if !leftover.is_empty() {
            bail!("Unexpected arguments: {leftover:?}");
        }
        Ok(command)
    }

    /// Whether the snapshot must be written back
    pub fn mutates(&self) -> bool {
        !matches!(
            self,
            Command::List | Command::Matches { .. } | Command::Standings { .. }
        )
    }
}

/// Execute a command against the snapshot and return its report
pub fn run(command: &Command, tournaments: &mut Vec<Tournament>, config: &CliConfig) -> Result<String> {
    let mut out = String::new();

    match command {
        Command::New {
            name,
            tournament_type,
            division,
            spots,
            players,
        } => {
            let division = division.as_deref().unwrap_or(config.initial_division.as_str());
            let mut tournament = engine(Tournament::new(
                name.clone(),
                *tournament_type,
                players.iter().cloned(),
                division,
            ))?;
            if let Some(first) = tournament.divisions.first_mut() {
                engine(first.update_spots(*spots))?;
            }
            log::info!("Created tournament '{}' ({})", tournament.name, tournament.id);
            writeln!(out, "{} {} ({})", tournament.id, tournament.name, tournament.tournament_type)?;
            tournaments.push(tournament);
        }
        Command::List => {
            for t in tournaments.iter() {
                writeln!(
                    out,
                    "{}  {}  {}  {:?}  {} division(s)",
                    t.id,
                    t.name,
                    t.tournament_type,
                    t.status,
                    t.divisions.len()
                )?;
            }
        }
        Command::AddDivision {
            tournament,
            name,
            spots,
            players,
        } => {
            let tournament = lookup_tournament(tournaments, tournament)?;
            if tournament.division_by_name(name).is_some() {
                bail!("Division '{name}' already exists");
            }
            engine(spots.validate(players.len()))?;

            let mut division = Division::new(name.clone(), *spots);
            engine(division.add_players(players.iter().cloned()))?;
            let id = tournament.add_division(division);
            writeln!(out, "{id} {name}")?;
        }
        Command::Spots {
            tournament,
            division,
            spots,
        } => {
            let tournament = lookup_tournament(tournaments, tournament)?;
            let id = lookup_division(tournament, division)?;
            let division = engine(tournament.division_mut(id))?;
            engine(division.update_spots(*spots))?;
            writeln!(
                out,
                "{}: {} direct / {} playoff promotion, {} direct / {} playoff relegation",
                division.name,
                spots.direct_promotion_spots,
                spots.playoff_promotion_spots,
                spots.direct_relegation_spots,
                spots.playoff_relegation_spots
            )?;
        }
        Command::Remove {
            tournament,
            division,
            player,
        } => {
            let tournament = lookup_tournament(tournaments, tournament)?;
            let id = lookup_division(tournament, division)?;
            let division = engine(tournament.division_mut(id))?;
            let removed = engine(division.remove_player(player))?;
            writeln!(out, "Removed {} from {}", removed.name, division.name)?;
        }
        Command::Rename {
            tournament,
            division,
            old_name,
            new_name,
        } => {
            let tournament = lookup_tournament(tournaments, tournament)?;
            let id = lookup_division(tournament, division)?;
            let division = engine(tournament.division_mut(id))?;
            engine(division.rename_player(old_name, new_name))?;
            division.refresh_standings();
            writeln!(out, "{old_name} -> {new_name}")?;
        }
        Command::Fixture {
            tournament,
            division,
        } => {
            let tournament = lookup_tournament(tournaments, tournament)?;
            let id = lookup_division(tournament, division)?;
            match config.seed {
                Some(seed) => {
                    engine(tournament.generate_fixture(id, &mut SeededShuffler::from_seed(seed)))?;
                }
                None => {
                    engine(tournament.generate_fixture(id, &mut RandomShuffler::new()))?;
                }
            }
            write_matches(&mut out, engine(tournament.division(id))?)?;
        }
        Command::Matches {
            tournament,
            division,
        } => {
            let tournament = lookup_tournament(tournaments, tournament)?;
            let id = lookup_division(tournament, division)?;
            write_matches(&mut out, engine(tournament.division(id))?)?;
        }
        Command::Result {
            tournament,
            division,
            match_id,
            score1,
            score2,
            overtime,
        } => {
            let tournament = lookup_tournament(tournaments, tournament)?;
            let id = lookup_division(tournament, division)?;
            let mut result = MatchResult::new(*score1, *score2);
            if *overtime {
                result = result.overtime();
            }
            engine(tournament.record_result(id, *match_id, result))?;
            write_standings(&mut out, engine(tournament.division(id))?)?;
        }
        Command::Reschedule {
            tournament,
            division,
            match_id,
            date,
            postponed,
        } => {
            let tournament = lookup_tournament(tournaments, tournament)?;
            let id = lookup_division(tournament, division)?;
            let division = engine(tournament.division_mut(id))?;
            let m = engine(reschedule_match(division, *match_id, *date, *postponed))?;
            writeln!(
                out,
                "{}  {} vs {}  {}{}",
                m.id,
                m.player1,
                m.player2,
                m.scheduled_date
                    .map(|d| d.to_rfc3339())
                    .unwrap_or_else(|| "unscheduled".to_string()),
                if m.postponed { "  (postponed)" } else { "" }
            )?;
        }
        Command::Standings {
            tournament,
            division,
        } => {
            let tournament = lookup_tournament(tournaments, tournament)?;
            let id = lookup_division(tournament, division)?;
            write_standings(&mut out, engine(tournament.division(id))?)?;
        }
        Command::Promotion {
            tournament,
            high,
            low,
        } => {
            let tournament = lookup_tournament(tournaments, tournament)?;
            let high_id = lookup_division(tournament, high)?;
            let low_id = lookup_division(tournament, low)?;
            let id = engine(tournament.create_promotion_division(high_id, low_id))?;
            let division = engine(tournament.division(id))?;
            writeln!(out, "{} {}", division.id, division.name)?;
            write_matches(&mut out, division)?;
        }
        Command::Playoffs { tournament, spots } => {
            let tournament = lookup_tournament(tournaments, tournament)?;
            let id = engine(tournament.create_playoffs_division(*spots))?;
            let division = engine(tournament.division(id))?;
            writeln!(out, "{} {}", division.id, division.name)?;
            for (seed, player) in division.players.iter().enumerate() {
                writeln!(out, "{:>3}. {}", seed + 1, player.name)?;
            }
        }
        Command::Finish { tournament } => {
            let tournament = lookup_tournament(tournaments, tournament)?;
            match engine(tournament.finish())? {
                Some(champion) => writeln!(out, "Champion: {champion}")?,
                None => writeln!(out, "Finished without a champion")?,
            }
        }
        Command::NextSeason { tournament, name } => {
            let old = lookup_tournament(tournaments, tournament)?;
            let rollover = engine(resolve_next_season(old, name))?;
            for t in &rollover.transfers {
                writeln!(out, "{}: {} -> {}", t.player, t.from, t.to)?;
            }
            writeln!(out, "{} {}", rollover.tournament.id, rollover.tournament.name)?;
            tournaments.push(rollover.tournament);
        }
    }

    Ok(out)
}

/// Surface an engine error with its client message
fn engine<T>(result: LeagueResult<T>) -> Result<T> {
    result.map_err(|e| anyhow!(e.client_message()))
}

/// Tournament by id or by name
fn lookup_tournament<'a>(tournaments: &'a mut [Tournament], key: &str) -> Result<&'a mut Tournament> {
    if let Ok(id) = key.parse::<Uuid>() {
        return engine(find_tournament_mut(tournaments, id));
    }
    tournaments
        .iter_mut()
        .find(|t| t.name == key)
        .ok_or_else(|| anyhow!("Tournament '{key}' not found"))
}

/// Division id by id or by name
fn lookup_division(tournament: &Tournament, key: &str) -> Result<DivisionId> {
    if let Ok(id) = key.parse::<Uuid>() {
        return Ok(engine(tournament.division(id))?.id);
    }
    tournament
        .division_by_name(key)
        .map(|d| d.id)
        .ok_or_else(|| anyhow!("Division '{key}' not found in '{}'", tournament.name))
}

fn write_matches(out: &mut String, division: &Division) -> Result<()> {
    for m in &division.matches {
        let score = match m.score() {
            Some((s1, s2)) if m.is_overtime => format!("{s1}-{s2} (OT)"),
            Some((s1, s2)) => format!("{s1}-{s2}"),
            None if m.postponed => "postponed".to_string(),
            None => "-".to_string(),
        };
        writeln!(
            out,
            "R{:<2} {}  {} vs {}  {}",
            m.round, m.id, m.player1, m.player2, score
        )?;
    }
    Ok(())
}

fn write_standings(out: &mut String, division: &Division) -> Result<()> {
    writeln!(out, "{}", division.name)?;
    writeln!(
        out,
        "{:>3}  {:<20} {:>4} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4}",
        "#", "Player", "Pts", "PJ", "G", "E", "P", "GF", "GC", "DG"
    )?;
    for (pos, p) in division.ranked_players().iter().enumerate() {
        writeln!(
            out,
            "{:>3}  {:<20} {:>4} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4}",
            pos + 1,
            p.name,
            p.points,
            p.games_played,
            p.matches_won,
            p.matches_tied,
            p.matches_lost,
            p.goals_in_favor,
            p.goals_against,
            p.goal_difference
        )?;
    }
    Ok(())
}

/// Parse `direct-promotion,playoff-promotion,direct-relegation,playoff-relegation`
fn parse_spots(raw: &str) -> Result<SpotConfig, String> {
    let values: Vec<usize> = raw
        .split(',')
        .map(|v| v.trim().parse::<usize>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid spot count in '{raw}': {e}"))?;

    match values.as_slice() {
        [dp, pp, dr, pr] => Ok(SpotConfig::new(*dp, *pp, *dr, *pr)),
        _ => Err(format!("expected four comma-separated counts, got '{raw}'")),
    }
}

/// Remaining positional arguments
fn remaining(pargs: &mut Arguments) -> Result<Vec<String>> {
    let mut values = Vec::new();
    while let Some(value) = pargs.opt_free_from_str::<String>()? {
        values.push(value);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::path::PathBuf;

    fn config() -> CliConfig {
        CliConfig {
            data_path: PathBuf::from("league.json"),
            seed: Some(7),
            initial_division: "Clasificación".to_string(),
        }
    }

    fn parse(args: &[&str]) -> Result<Command> {
        Command::parse(Arguments::from_vec(args.iter().map(|a| OsString::from(*a)).collect()))
    }

    fn exec(tournaments: &mut Vec<Tournament>, args: &[&str]) -> String {
        run(&parse(args).unwrap(), tournaments, &config()).unwrap()
    }

    #[test]
    fn test_parse_new() {
        let command = parse(&["new", "--division", "Primera", "Apertura", "league", "Ana", "Beto"]).unwrap();
        assert_eq!(
            command,
            Command::New {
                name: "Apertura".to_string(),
                tournament_type: TournamentType::League,
                division: Some("Primera".to_string()),
                spots: SpotConfig::default(),
                players: vec!["Ana".to_string(), "Beto".to_string()],
            }
        );
        assert!(command.mutates());
    }

    #[test]
    fn test_parse_division_spots() {
        let command = parse(&["division", "--spots", "1,0,0,1", "Apertura", "Segunda", "Zoe"]).unwrap();
        let Command::AddDivision { spots, .. } = command else {
            panic!("expected AddDivision");
        };
        assert_eq!(spots, SpotConfig::new(1, 0, 0, 1));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["dance"]).is_err());
        assert!(parse(&["finish"]).is_err());
        assert!(parse(&["finish", "Apertura", "extra"]).is_err());
        assert!(parse(&["new", "Apertura", "friendly"]).is_err());
        assert!(parse_spots("1,2,3").is_err());
        assert!(parse_spots("a,b,c,d").is_err());
    }

    #[test]
    fn test_read_only_commands() {
        assert!(!parse(&["list"]).unwrap().mutates());
        assert!(!parse(&["standings", "Apertura", "Primera"]).unwrap().mutates());
    }

    #[test]
    fn test_league_flow() {
        let mut tournaments = Vec::new();
        exec(&mut tournaments, &["new", "Apertura", "LEAGUE", "Ana", "Beto"]);
        assert_eq!(tournaments[0].divisions[0].name, "Clasificación");

        let fixture = exec(&mut tournaments, &["fixture", "Apertura", "Clasificación"]);
        assert!(fixture.contains("Ana"));

        let match_id = tournaments[0].divisions[0].matches[0].id.to_string();
        let standings = exec(
            &mut tournaments,
            &["result", "Apertura", "Clasificación", match_id.as_str(), "3", "1"],
        );
        assert!(standings.contains("Clasificación"));

        let division = &tournaments[0].divisions[0];
        assert!(division.matches[0].played);
        assert_eq!(division.players.iter().map(|p| p.points).sum::<u32>(), 3);

        let finish = exec(&mut tournaments, &["finish", "Apertura"]);
        assert!(finish.starts_with("Champion: "));
    }

    #[test]
    fn test_next_season_appends_tournament() {
        let mut tournaments = Vec::new();
        exec(&mut tournaments, &["new", "--division", "Primera", "T1", "LEAGUE", "A1", "A2"]);
        exec(&mut tournaments, &["division", "--spots", "1,0,0,0", "T1", "Segunda", "B1", "B2"]);
        let id = tournaments[0].id.to_string();

        exec(&mut tournaments, &["next-season", id.as_str(), "T2"]);
        assert_eq!(tournaments.len(), 2);
        assert_eq!(tournaments[1].name, "T2");
        assert_eq!(tournaments[1].divisions.len(), 2);
    }

    #[test]
    fn test_spots_for_initial_division() {
        let mut tournaments = Vec::new();
        exec(&mut tournaments, &["new", "--spots", "0,0,1,0", "T1", "LEAGUE", "A1", "A2"]);
        assert_eq!(tournaments[0].divisions[0].spots, SpotConfig::new(0, 0, 1, 0));

        exec(&mut tournaments, &["spots", "T1", "Clasificación", "0,1,0,1"]);
        assert_eq!(tournaments[0].divisions[0].spots, SpotConfig::new(0, 1, 0, 1));

        let command = parse(&["spots", "T1", "Clasificación", "2,0,1,0"]).unwrap();
        assert!(run(&command, &mut tournaments, &config()).is_err());
        assert_eq!(tournaments[0].divisions[0].spots, SpotConfig::new(0, 1, 0, 1));

        let command = parse(&["new", "--spots", "3,0,0,0", "T2", "LEAGUE", "B1"]).unwrap();
        assert!(run(&command, &mut tournaments, &config()).is_err());
        assert_eq!(tournaments.len(), 1);
    }

    #[test]
    fn test_remove_player() {
        let mut tournaments = Vec::new();
        exec(&mut tournaments, &["new", "T1", "LEAGUE", "Ana", "Beto", "Carla"]);

        let out = exec(&mut tournaments, &["remove", "T1", "Clasificación", "Carla"]);
        assert!(out.contains("Removed Carla"));
        assert_eq!(tournaments[0].divisions[0].players.len(), 2);

        exec(&mut tournaments, &["fixture", "T1", "Clasificación"]);
        let command = parse(&["remove", "T1", "Clasificación", "Ana"]).unwrap();
        assert!(command.mutates());
        assert!(run(&command, &mut tournaments, &config()).is_err());
    }

    #[test]
    fn test_unknown_tournament() {
        let mut tournaments = Vec::new();
        let err = run(&parse(&["finish", "Nada"]).unwrap(), &mut tournaments, &config()).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_invalid_spots_rejected() {
        let mut tournaments = Vec::new();
        exec(&mut tournaments, &["new", "T1", "LEAGUE", "A1"]);
        let command = parse(&["division", "--spots", "2,0,2,0", "T1", "Segunda", "B1", "B2"]).unwrap();
        assert!(run(&command, &mut tournaments, &config()).is_err());
        assert_eq!(tournaments[0].divisions.len(), 1);
    }
}
