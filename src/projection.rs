//! Projection of server bitboards into the per-square view model.

use crate::bitboard::{self, BOARD_SIZE, NUM_SQUARES};
use crate::types::{Player, SquareView};

/// Projects the two occupancy masks and the legal-move mask into the
/// 64-square view model, in index order.
///
/// Disjointness of `black` and `white` is the server's contract; when a
/// square is claimed by both anyway, black wins so the output stays total.
pub fn project(black: u64, white: u64, legal: u64) -> Vec<SquareView> {
    (0..NUM_SQUARES as u8)
        .map(|index| square_at(index, black, white, legal))
        .collect()
}

/// Column label for a square index, `'A'` through `'H'`.
pub fn col_letter(index: u8) -> char {
    (b'A' + index % BOARD_SIZE as u8) as char
}

fn square_at(index: u8, black: u64, white: u64, legal: u64) -> SquareView {
    let color = if bitboard::contains(black, index) {
        Some(Player::Black)
    } else if bitboard::contains(white, index) {
        Some(Player::White)
    } else {
        None
    };

    SquareView {
        index,
        row: index / BOARD_SIZE as u8,
        col: index % BOARD_SIZE as u8,
        col_letter: col_letter(index),
        is_empty: color.is_none(),
        color,
        is_legal: bitboard::contains(legal, index),
    }
}
