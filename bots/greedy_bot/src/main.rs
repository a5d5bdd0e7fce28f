use clap::Parser;
use guinote::{select_move, Difficulty, GameConfig, GameState, Move, PlayerId};
use guinote_bot_utils::Bot;
use rand::{rngs::StdRng, SeedableRng};

#[derive(Parser)]
struct Args {
    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let rng = StdRng::seed_from_u64(seed);

    GreedyBot { rng }.run()
}

/// Maximizes immediate trick point capture, nothing else.
struct GreedyBot {
    rng: StdRng,
}

impl Bot for GreedyBot {
    fn new_game(&mut self, _seat: PlayerId, _config: GameConfig) {}

    fn act(&mut self, state: &GameState) -> anyhow::Result<Move> {
        Ok(select_move(state, Difficulty::Medium, &mut self.rng)?)
    }
}
