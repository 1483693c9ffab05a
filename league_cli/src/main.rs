//! Command-line driver for the league engine.
//!
//! Each invocation loads the JSON snapshot, applies one operation and writes the
//! snapshot back when the operation changed it.

mod commands;
mod config;
mod logging;
mod store;

use std::path::PathBuf;

use anyhow::Error;
use log::info;
use pico_args::Arguments;

use commands::Command;
use config::CliConfig;

const HELP: &str = "\
Schedule leagues, cups and group tournaments from the command line

USAGE:
  league [OPTIONS] <COMMAND> [ARGS]

COMMANDS:
  new [--division NAME] [--spots DP,PP,DR,PR] <NAME> <TYPE> <PLAYER>...
                                                     Create a tournament (LEAGUE, CUP or CHAMPIONS)
  list                                               List tournaments
  division [--spots DP,PP,DR,PR] <T> <NAME> <PLAYER>...
                                                     Add a regular division
  spots <T> <DIV> <DP,PP,DR,PR>                      Set a division's promotion and relegation spots
  remove <T> <DIV> <PLAYER>                          Remove a player without matches
  rename <T> <DIV> <OLD> <NEW>                       Rename a player
  fixture <T> <DIV>                                  Generate a division's fixture
  matches <T> <DIV>                                  Show a division's matches
  result [--overtime] <T> <DIV> <MATCH> <S1> <S2>    Record a match result
  reschedule [--date RFC3339] [--postponed] <T> <DIV> <MATCH>
                                                     Set a match date or postpone it
  standings <T> <DIV>                                Show a division's table
  promotion <T> <HIGH> <LOW>                         Create the promotion playoff between two divisions
  playoffs <T> <SPOTS>                               Create the final phase from every group
  finish <T>                                         Close a tournament and name the champion
  next-season <T> <NAME>                             Roll a tournament into its next season

  Tournaments and divisions are given by id or by name. Spots are the direct and
  playoff promotion counts followed by the direct and playoff relegation counts.

OPTIONS:
  --data       PATH        Snapshot file       [default: env LEAGUE_DATA or league.json]
  --seed       N           Fixture shuffle seed [default: env LEAGUE_SEED or random]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  LEAGUE_DATA              Snapshot file
  LEAGUE_SEED              Fixture shuffle seed
  LEAGUE_INITIAL_DIVISION  First division of a new tournament [default: Clasificación]
  RUST_LOG                 Log level [default: info]
";

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let data_override: Option<PathBuf> = pargs.opt_value_from_str("--data")?;
    let seed_override: Option<u64> = pargs.opt_value_from_str("--seed")?;

    logging::init();

    let config = CliConfig::from_env(data_override, seed_override)?;
    config.validate()?;

    let command = Command::parse(pargs)?;
    let mut tournaments = store::load(&config.data_path)?;

    let output = commands::run(&command, &mut tournaments, &config)?;

    if command.mutates() {
        store::save(&config.data_path, &tournaments)?;
        info!(
            "Saved {} tournament(s) to {}",
            tournaments.len(),
            config.data_path.display()
        );
    }

    print!("{output}");
    Ok(())
}
