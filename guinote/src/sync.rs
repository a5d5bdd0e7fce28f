use crate::{apply, CorruptState, GameState, InvalidMove, Move, ReplayError};

/// One locally predicted move awaiting authoritative confirmation.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingMove {
    pub mv: Move,
    pub state_before: GameState,
    pub predicted: GameState,
}

/// How an authoritative confirmation was reconciled against the local
/// prediction queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconciliation {
    /// The confirmation matched the oldest prediction; it was dequeued.
    Confirmed,
    /// The confirmation diverged; every prediction was discarded and the
    /// visible state reset to the authoritative one.
    RolledBack,
}

/// Client-side mediation between locally applied moves and the
/// authoritative stream from the session transport.
///
/// Predictions are applied ahead of confirmation and kept in a FIFO queue;
/// each optimistic state is derived from its predecessor, so divergence or
/// a local cancel always discards a suffix of the queue, never a middle
/// entry. Partial merges are unsound here: trick and turn ordering make a
/// later prediction meaningless once an earlier one is wrong.
#[derive(Clone, Debug)]
pub struct OptimisticSession {
    confirmed: GameState,
    pending: Vec<PendingMove>,
}

impl OptimisticSession {
    /// Adopt an authoritative snapshot. A snapshot that violates the
    /// structural invariants is refused; the transport collaborator should
    /// be asked for a fresh one.
    pub fn new(state: GameState) -> Result<Self, CorruptState> {
        state.check_invariants()?;
        Ok(Self {
            confirmed: state,
            pending: Vec::new(),
        })
    }

    /// The state to show: the newest prediction, or the confirmed state
    /// when nothing is pending.
    pub fn visible(&self) -> &GameState {
        self.pending
            .last()
            .map(|entry| &entry.predicted)
            .unwrap_or(&self.confirmed)
    }

    /// The newest authoritatively confirmed state.
    pub fn confirmed(&self) -> &GameState {
        &self.confirmed
    }

    pub fn pending(&self) -> &[PendingMove] {
        &self.pending
    }

    /// Validate `mv` against the visible state and apply it as a
    /// prediction. On rejection nothing changes.
    pub fn propose(&mut self, mv: Move) -> Result<&GameState, InvalidMove> {
        let state_before = self.visible().clone();
        let mut predicted = state_before.clone();
        apply(&mut predicted, mv)?;
        self.pending.push(PendingMove {
            mv,
            state_before,
            predicted,
        });
        Ok(&self.pending.last().expect("just pushed").predicted)
    }

    /// Apply one authoritative move, in the order received.
    ///
    /// A confirmation that does not validate against the confirmed state is
    /// an [`IllegalReplay`](ReplayError::IllegalReplay); the prediction
    /// queue is dropped so the caller can resynchronize, and the error is
    /// surfaced rather than swallowed.
    pub fn confirm(&mut self, mv: Move) -> Result<Reconciliation, ReplayError> {
        if let Err(reason) = apply(&mut self.confirmed, mv) {
            self.pending.clear();
            return Err(ReplayError::IllegalReplay { mv, reason });
        }
        let matches_oldest = self
            .pending
            .first()
            .is_some_and(|entry| entry.mv == mv);
        if matches_oldest {
            self.pending.remove(0);
            Ok(Reconciliation::Confirmed)
        } else {
            self.pending.clear();
            Ok(Reconciliation::RolledBack)
        }
    }

    /// Cancel the not-yet-confirmed prediction at `index`, together with
    /// every prediction derived from it.
    pub fn cancel(&mut self, index: usize) {
        self.pending.truncate(index);
    }
}
