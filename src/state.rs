//! The client's single owned container for one game's view state.

use crate::api::wire::GameStateDto;
use crate::bitboard;
use crate::projection;
use crate::types::{BoardView, Winner};

/// Cached server snapshot plus the current legal-move mask.
///
/// There is exactly one update entry point, [`GameStore::replace`], and it
/// swaps everything at once; observers can never see a half-applied refresh.
#[derive(Debug, Default)]
pub struct GameStore {
    state: Option<GameStateDto>,
    legal_mask: u64,
    revision: u32,
    move_in_flight: bool,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the snapshot and legal-move set wholesale.
    pub fn replace(&mut self, state: GameStateDto, legal_mask: u64) {
        self.revision = revision_of(&state, legal_mask);
        self.state = Some(state);
        self.legal_mask = legal_mask;
    }

    /// Whether `index` is currently a legal move. Always false before the
    /// first replace, so clicks on an unprimed board go nowhere.
    pub fn is_legal(&self, index: u8) -> bool {
        bitboard::contains(self.legal_mask, index)
    }

    /// Marks a move submission as pending. Returns false when one already
    /// is, in which case the caller must not submit.
    pub fn begin_move(&mut self) -> bool {
        if self.move_in_flight {
            return false;
        }
        self.move_in_flight = true;
        true
    }

    pub fn finish_move(&mut self) {
        self.move_in_flight = false;
    }

    pub fn move_in_flight(&self) -> bool {
        self.move_in_flight
    }

    /// Digest of the last replaced data. Equal revisions mean an identical
    /// view, so renderers can skip the frame.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Projects the cached snapshot into the render-ready view.
    /// `None` until the first replace.
    pub fn view(&self) -> Option<BoardView> {
        let state = self.state.as_ref()?;
        Some(BoardView {
            squares: projection::project(state.black_board, state.white_board, self.legal_mask),
            current_player: state.current_player,
            current_turn: state.current_turn,
            game_over: state.game_over,
            winner: state.winner,
            black_count: state.black_board.count_ones() as u8,
            white_count: state.white_board.count_ones() as u8,
            revision: self.revision,
        })
    }
}

fn revision_of(state: &GameStateDto, legal_mask: u64) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&state.black_board.to_le_bytes());
    hasher.update(&state.white_board.to_le_bytes());
    hasher.update(&legal_mask.to_le_bytes());
    hasher.update(&state.current_turn.to_le_bytes());
    hasher.update(&[
        state.current_player.as_byte(),
        state.game_over as u8,
        state.winner.map_or(0, Winner::as_byte),
    ]);
    hasher.finalize()
}
