use wasm_bindgen::prelude::*;

pub mod api;
pub mod bitboard;
pub mod projection;
pub mod session;
pub mod state;
pub mod types;
pub mod wasm;

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
