use std::time::Instant;

use guinote::{
    apply, Controller, GameConfig, GameState, GameSummary, InvalidMove, Move, Okay, Phase,
    PlayerId, Request, TeamId,
};
use rand::rngs::StdRng;
use tracing::debug;

use crate::player::Player;
use crate::recording::Recorder;

pub enum GameResult {
    WonByTeam { team: TeamId, summary: GameSummary },
    IllegalMoveByPlayer { player_idx: usize, err: InvalidMove },
}

/// Returns an error only on communication failure, not when an
/// illegal move is played.
pub fn play_game(
    rng: &mut StdRng,
    config: GameConfig,
    players: &mut [Player; 4],
    recorder: &mut Option<Recorder>,
) -> anyhow::Result<GameResult> {
    let started = Instant::now();

    // The judge owns the authoritative state; the bots are external, so
    // every seat is a remote actor to the engine.
    let mut state = GameState::deal(config, [Controller::Human; 4], rng)?;

    // Inform the players about the new game, so that they can reset their state
    for (seat, player) in players.iter_mut().enumerate() {
        let _: Okay = player.perform_request(
            recorder,
            &Request::NewGame {
                seat: seat as PlayerId,
                config,
            },
        )?;
    }

    loop {
        match state.phase {
            Phase::Playing => {
                let seat = state.current_turn as usize;
                let req = Request::Act {
                    state: state.clone(),
                };
                let mv: Move = players[seat].perform_request(recorder, &req)?;
                // Moves from bots go through the same validation as anyone
                // else's. A repeated cante or exchange fails validation, so
                // a turn cannot stall on non-card moves indefinitely.
                if let Err(err) = apply(&mut state, mv) {
                    return Ok(GameResult::IllegalMoveByPlayer {
                        player_idx: seat,
                        err,
                    });
                }
            }
            Phase::Dealing => {
                debug!(
                    round = state.round_no,
                    scores = ?state.game_scores,
                    "Round settled, dealing the next one"
                );
                state.start_round(rng);
            }
            Phase::Finished { winner } => {
                if let Some(rec) = recorder {
                    rec.write_game_recording()?;
                }
                let duration_ms = started.elapsed().as_millis() as u64;
                let Some(summary) = GameSummary::from_state(&state, duration_ms) else {
                    anyhow::bail!("A finished game must produce a summary");
                };
                return Ok(GameResult::WonByTeam {
                    team: winner,
                    summary,
                });
            }
            Phase::GameOver => {
                anyhow::bail!("The engine never retires a game the judge is driving");
            }
        }
    }
}
