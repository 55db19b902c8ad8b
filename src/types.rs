use serde::{Deserialize, Serialize};

/// One of the two sides, named the way the server names them on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub(crate) fn as_byte(self) -> u8 {
        match self {
            Self::Black => 1,
            Self::White => 2,
        }
    }
}

/// Terminal outcome, reported by the server once the game is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Black,
    White,
    Draw,
}

impl Winner {
    pub(crate) fn as_byte(self) -> u8 {
        match self {
            Self::Black => 1,
            Self::White => 2,
            Self::Draw => 3,
        }
    }
}

/// Render-ready description of one board square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SquareView {
    pub index: u8,
    pub row: u8,
    pub col: u8,
    /// Column label `'A'` through `'H'`.
    pub col_letter: char,
    pub is_empty: bool,
    pub color: Option<Player>,
    pub is_legal: bool,
}

/// The derived board view handed to the rendering layer.
///
/// Recomputed wholesale from the cached server snapshot after every
/// completed request chain, never patched square by square. `revision`
/// changes exactly when the underlying data changed, so renderers can skip
/// identical frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub squares: Vec<SquareView>,
    pub current_player: Player,
    pub current_turn: u32,
    pub game_over: bool,
    pub winner: Option<Winner>,
    pub black_count: u8,
    pub white_count: u8,
    pub revision: u32,
}

/// What became of a click routed through [`crate::session::GameSession::play`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayOutcome {
    /// The move was submitted and committed; the refreshed view is attached.
    Played { view: BoardView },
    /// The square is not a legal move right now; nothing was sent.
    Ignored { index: u8 },
    /// A previous submission is still in flight; nothing was sent.
    Busy,
}
