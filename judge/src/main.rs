use std::path::PathBuf;

use clap::Parser;
use guinote::GameConfig;
use judge::{play_game, GameResult, Player, PlayerConfig, Recorder};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// Path to the config JSON files of the four players, in seat order.
    /// Seats 0 and 2 form team 0, seats 1 and 3 team 1.
    #[clap(num_args(4..=4), value_delimiter = ' ')]
    player_configs: Vec<PathBuf>,

    /// How many games to play
    #[arg(short, long, default_value_t = 100)]
    num_games: usize,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Do not enforce suit-following while the draw pile lasts
    /// (vueltas are always strict)
    #[arg(short, long, default_value_t = false)]
    free_suit_following: bool,

    /// Stop the table as soon as one player makes an illegal move
    #[arg(short, long, default_value_t = false)]
    stop_on_illegal_move: bool,

    /// Record the game's interactions as JSON files into this directory
    #[arg(short, long)]
    record_games_to_directory: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Default)]
struct TableScore {
    wins: [usize; 2],
    illegal_moves: [usize; 4],
    rounds: usize,
}

fn play_table(
    players: &mut [Player; 4],
    config: GameConfig,
    num_games: usize,
    rng: &mut StdRng,
    stop_on_illegal_move: bool,
    recorder: &mut Option<Recorder>,
) -> anyhow::Result<TableScore> {
    let mut table_score = TableScore::default();

    for game_idx in 0..num_games {
        match play_game(rng, config, players, recorder)? {
            GameResult::WonByTeam { team, summary } => {
                debug!(
                    winning_team = team,
                    rounds = summary.rounds,
                    duration_ms = summary.duration_ms,
                    game_idx
                );
                table_score.wins[team as usize] += 1;
                table_score.rounds += summary.rounds as usize;
            }
            GameResult::IllegalMoveByPlayer { player_idx, err } => {
                info!(
                    player = players[player_idx].name,
                    game_idx, "Illegal move by player"
                );
                let mut err_dyn = &err as &dyn std::error::Error;
                while let Some(src_err) = err_dyn.source() {
                    info!("{}", err_dyn);
                    err_dyn = src_err;
                }
                info!("{}", err_dyn);
                if stop_on_illegal_move {
                    break;
                } else {
                    // An illegal move forfeits the game to the other team.
                    let team = player_idx % 2;
                    table_score.wins[1 - team] += 1;
                    table_score.illegal_moves[player_idx] += 1;
                }
            }
        }
    }

    Ok(table_score)
}

fn print_table_results(players: &[Player; 4], score: &TableScore) {
    let games = score.wins[0] + score.wins[1];
    eprintln!(
        "End result:\n- {} wins by {} + {}\n- {} wins by {} + {}",
        score.wins[0],
        players[0].name,
        players[2].name,
        score.wins[1],
        players[1].name,
        players[3].name,
    );
    for (idx, player) in players.iter().enumerate() {
        if score.illegal_moves[idx] > 0 {
            eprintln!(
                "- {} illegal moves by {}",
                score.illegal_moves[idx], player.name
            );
        }
    }
    if games > 0 {
        eprintln!(
            "- {:.1} rounds per game on average",
            score.rounds as f32 / games as f32
        );
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut recorder = if let Some(dir_path) = args.record_games_to_directory {
        Some(Recorder::new(dir_path)?)
    } else {
        None
    };

    let config = GameConfig::new(!args.free_suit_following);

    let mut player_configs = args
        .player_configs
        .iter()
        .map(|path| PlayerConfig::load(path))
        .collect::<Result<Vec<PlayerConfig>, anyhow::Error>>()?;
    // Assign seats randomly; the seating is fixed for the whole table.
    player_configs.shuffle(&mut rng);
    for (seat, config) in player_configs.iter().enumerate() {
        info!(seat, player = config.nick);
    }
    let mut players: [Player; 4] = [
        Player::from_config(&player_configs[0])?,
        Player::from_config(&player_configs[1])?,
        Player::from_config(&player_configs[2])?,
        Player::from_config(&player_configs[3])?,
    ];

    let table_score = play_table(
        &mut players,
        config,
        args.num_games,
        &mut rng,
        args.stop_on_illegal_move,
        &mut recorder,
    )?;

    for player in players.iter_mut() {
        player.send_bye()?;
    }

    print_table_results(&players, &table_score);

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().event_format(format))
        .with(filter)
        .init();
}
