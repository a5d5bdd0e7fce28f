use clap::Parser;
use guinote::{select_move, Difficulty, GameConfig, GameState, Move, PlayerId};
use guinote_bot_utils::Bot;
use rand::{rngs::StdRng, SeedableRng};
use tracing::debug;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.log_level);
    let seed = args.seed.unwrap_or_else(rand::random);
    let rng = StdRng::seed_from_u64(seed);

    ExpertBot { rng, seat: 0 }.run()
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Sings and exchanges at every opportunity and counts the cards already
/// seen before spending points on a play.
struct ExpertBot {
    rng: StdRng,
    seat: PlayerId,
}

impl Bot for ExpertBot {
    fn new_game(&mut self, seat: PlayerId, _config: GameConfig) {
        self.seat = seat;
        debug!(seat, "New game");
    }

    fn act(&mut self, state: &GameState) -> anyhow::Result<Move> {
        let mv = select_move(state, Difficulty::Hard, &mut self.rng)?;
        debug!(round = state.round_no, %mv);
        Ok(mv)
    }
}
