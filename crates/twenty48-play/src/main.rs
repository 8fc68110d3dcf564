mod config;
mod input;
mod store;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use twenty48_engine::{GameEngine, GameStatus};

use config::Config;
use input::Action;
use store::ScoreStore;

#[derive(Parser, Debug)]
struct Args {
    /// Path to configuration file
    #[arg(long, value_name = "FILE", value_parser = clap::value_parser!(PathBuf))]
    config: Option<PathBuf>,

    /// RNG seed for a reproducible game (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Best-score store directory (overrides the config)
    #[arg(long, value_name = "DIR", value_parser = clap::value_parser!(PathBuf))]
    store: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => Config::from_toml(path)
            .map_err(|e| anyhow::anyhow!("failed to load {}: {e}", path.display()))?,
        None => Config::default(),
    };

    // A store that won't open is not fatal; the best score just stays 0
    // for this session.
    let store_dir = match args.store {
        Some(dir) => Some(dir),
        None if cfg.store.enabled => Some(cfg.store.dir.clone()),
        None => None,
    };
    let mut store = store_dir.and_then(|dir| match ScoreStore::open(&dir) {
        Ok(s) => Some(s),
        Err(e) => {
            log::warn!("cannot open score store at {}: {e}", dir.display());
            None
        }
    });
    let mut best = store.as_ref().map_or(0, ScoreStore::load_best);

    let mut rng = match args.seed.or(cfg.seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = GameEngine::new(cfg.board.size)?;
    game.initialize(&mut rng);

    println!("2048: move with direction words or wasd, n = new game, q = quit");
    render(&game, best);
    prompt()?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let action = match input::parse_action(&line) {
            Some(action) => action,
            None => {
                if !line.trim().is_empty() {
                    println!("unrecognized input: {:?}", line.trim());
                }
                prompt()?;
                continue;
            }
        };
        match action {
            Action::Quit => break,
            Action::NewGame => {
                game.initialize(&mut rng);
                render(&game, best);
            }
            Action::Shift(dir) => {
                let outcome = game.apply_move(dir, &mut rng);
                // Moves that shift nothing don't count as a turn.
                if outcome.moved {
                    if game.score() > best {
                        best = game.score();
                        if let Some(store) = store.as_mut() {
                            store.save_best(best);
                        }
                    }
                    render(&game, best);
                    match outcome.status {
                        GameStatus::Won => {
                            println!("You win! You reached 2048.");
                        }
                        GameStatus::Over => {
                            println!("Game over! Final score: {}", game.score());
                            println!("Type 'new' to try again.");
                        }
                        GameStatus::InProgress => {}
                    }
                }
            }
        }
        prompt()?;
    }
    Ok(())
}

fn render(game: &GameEngine, best: u64) {
    println!("{}", game.board());
    println!("score: {}  best: {}", game.score(), best);
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}
