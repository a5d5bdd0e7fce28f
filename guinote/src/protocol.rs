use serde::{Deserialize, Serialize};

use crate::{team_of, GameConfig, GameState, Phase, PlayerId, TeamId};

/// Request for a bot to do something. One JSON value per line, the
/// response on the following line.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// Reset for a new game at the given seat.
    ///
    /// The response should be an [`Okay`].
    NewGame { seat: PlayerId, config: GameConfig },
    /// Produce the next move; it is the bot's seat's turn in `state`.
    ///
    /// The response should be a [`Move`](crate::Move), which the judge
    /// validates like any other actor's move.
    Act { state: GameState },
    /// The bot should shut down.
    Bye,
}

/// Dummy struct for use in bot communication.
///
/// Used to signal an acknowledgement without data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Okay();

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub player: PlayerId,
    pub team: TeamId,
    pub points_scored: u32,
    pub points_conceded: u32,
    pub cantes_20: u32,
    pub cantes_40: u32,
}

/// The settlement record handed to the statistics collaborator, exactly
/// once per completed game. Mid-game round settlements never produce one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub winner: TeamId,
    pub rounds: u32,
    pub duration_ms: u64,
    pub players: [PlayerSummary; 4],
}

impl GameSummary {
    /// Build the record from a finished game. Returns `None` while the game
    /// is still in progress, and for sessions retired without a winner.
    pub fn from_state(state: &GameState, duration_ms: u64) -> Option<Self> {
        let Phase::Finished { winner } = state.phase else {
            return None;
        };
        let players = [0, 1, 2, 3].map(|seat: PlayerId| {
            let team = team_of(seat);
            let tally = state.cante_tally[seat as usize];
            PlayerSummary {
                player: seat,
                team,
                points_scored: state.game_scores[team as usize],
                points_conceded: state.game_scores[(1 - team) as usize],
                cantes_20: tally.veintes,
                cantes_40: tally.cuarentas,
            }
        });
        Some(GameSummary {
            winner,
            rounds: state.round_no,
            duration_ms,
            players,
        })
    }
}
