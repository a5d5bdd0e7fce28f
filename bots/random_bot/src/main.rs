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

    RandomBot { rng }.run()
}

/// Plays a uniformly random legal move.
struct RandomBot {
    rng: StdRng,
}

impl Bot for RandomBot {
    fn new_game(&mut self, _seat: PlayerId, _config: GameConfig) {}

    fn act(&mut self, state: &GameState) -> anyhow::Result<Move> {
        Ok(select_move(state, Difficulty::Easy, &mut self.rng)?)
    }
}
