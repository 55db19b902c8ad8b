//! `wasm_bindgen` surface consumed by the rendering layer.
//!
//! Mirrors the original free-function API: every export takes an optional
//! `game_id` defaulting to 1. Sessions live in a process-global registry and
//! are checked out of their slot for the duration of a request chain, so a
//! second request for the same game while one is pending is answered without
//! touching the network instead of racing it.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::error;
use once_cell::sync::Lazy;
use wasm_bindgen::prelude::*;

use crate::api::client::{ApiClient, DEFAULT_BASE_URL, DEFAULT_GAME_ID};
use crate::api::transport::FetchTransport;
use crate::session::GameSession;
use crate::types::PlayOutcome;

static BASE_URL: Lazy<Mutex<String>> = Lazy::new(|| Mutex::new(DEFAULT_BASE_URL.to_string()));

static SESSIONS: Lazy<Mutex<HashMap<u64, Slot>>> = Lazy::new(|| Mutex::new(HashMap::new()));

enum Slot {
    Ready(GameSession<FetchTransport>),
    /// Checked out while a request chain runs.
    InFlight,
}

enum CheckoutError {
    Unknown,
    Busy,
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
}

/// Overrides the game server URL (default `http://localhost:5000`).
#[wasm_bindgen]
pub fn set_server_url(url: String) {
    *lock(&BASE_URL) = url.trim_end_matches('/').to_string();
}

/// POST `/init` for the game (default id 1), fetch the opening legal moves,
/// and return the initial board view.
#[wasm_bindgen]
pub async fn init_game(game_id: Option<u32>) -> Result<JsValue, JsValue> {
    let id = resolve_id(game_id);

    // Re-init replaces any existing session for this id, but never one with
    // a request still in flight.
    let previous = {
        let mut sessions = lock(&SESSIONS);
        if let Some(Slot::InFlight) = sessions.get(&id) {
            return Err(busy_error(id));
        }
        sessions.insert(id, Slot::InFlight)
    };

    let mut session = new_session(id);
    match session.start().await {
        Ok(view) => {
            check_in(id, session);
            to_js(&view)
        }
        Err(err) => {
            // Failed init keeps whatever state the game had before.
            let mut sessions = lock(&SESSIONS);
            match previous {
                Some(slot) => {
                    sessions.insert(id, slot);
                }
                None => {
                    sessions.remove(&id);
                }
            }
            error!("game {id}: init failed: {err}");
            Err(err.into())
        }
    }
}

/// Re-fetch the game state and legal moves, and return the refreshed view.
/// On failure the previously fetched view is kept.
#[wasm_bindgen]
pub async fn refresh_game(game_id: Option<u32>) -> Result<JsValue, JsValue> {
    let id = resolve_id(game_id);
    let mut session = checkout(id).map_err(|err| err.into_js(id))?;

    let result = session.refresh().await;
    check_in(id, session);

    match result {
        Ok(view) => to_js(&view),
        Err(err) => {
            error!("game {id}: refresh failed, keeping previous state: {err}");
            Err(err.into())
        }
    }
}

/// Route a click on square `index` (0..=63).
///
/// Returns a tagged outcome: `played` with the refreshed view, `ignored`
/// when the square is not a legal move (no request is sent), or `busy` when
/// a previous submission is still in flight.
#[wasm_bindgen]
pub async fn click_square(index: u8, game_id: Option<u32>) -> Result<JsValue, JsValue> {
    let id = resolve_id(game_id);
    let mut session = match checkout(id) {
        Ok(session) => session,
        // Graceful answer for the double-click race.
        Err(CheckoutError::Busy) => return to_js(&PlayOutcome::Busy),
        Err(err) => return Err(err.into_js(id)),
    };

    let result = session.play(index).await;
    check_in(id, session);

    match result {
        Ok(outcome) => to_js(&outcome),
        Err(err) => Err(err.into()),
    }
}

/// The current cached view, without touching the network.
#[wasm_bindgen]
pub fn board_view(game_id: Option<u32>) -> Result<JsValue, JsValue> {
    let id = resolve_id(game_id);
    let sessions = lock(&SESSIONS);
    match sessions.get(&id) {
        Some(Slot::Ready(session)) => match session.view() {
            Some(view) => to_js(&view),
            None => Err(js_error(format!("game {id} has no state yet"))),
        },
        Some(Slot::InFlight) => Err(busy_error(id)),
        None => Err(CheckoutError::Unknown.into_js(id)),
    }
}

/// GET `/get_game_history`: the per-turn positions committed so far.
#[wasm_bindgen]
pub async fn game_history(game_id: Option<u32>) -> Result<JsValue, JsValue> {
    let id = resolve_id(game_id);
    let client = ApiClient::new(FetchTransport, lock(&BASE_URL).clone(), id);

    match client.game_history().await {
        Ok(entries) => to_js(&entries),
        Err(err) => {
            error!("game {id}: history fetch failed: {err}");
            Err(err.into())
        }
    }
}

impl CheckoutError {
    fn into_js(self, game_id: u64) -> JsValue {
        match self {
            Self::Unknown => js_error(format!("game {game_id} is not initialized")),
            Self::Busy => busy_error(game_id),
        }
    }
}

fn checkout(game_id: u64) -> Result<GameSession<FetchTransport>, CheckoutError> {
    let mut sessions = lock(&SESSIONS);
    match sessions.get_mut(&game_id) {
        None => Err(CheckoutError::Unknown),
        Some(slot) => match std::mem::replace(slot, Slot::InFlight) {
            Slot::Ready(session) => Ok(session),
            Slot::InFlight => Err(CheckoutError::Busy),
        },
    }
}

fn check_in(game_id: u64, session: GameSession<FetchTransport>) {
    lock(&SESSIONS).insert(game_id, Slot::Ready(session));
}

fn new_session(game_id: u64) -> GameSession<FetchTransport> {
    let base_url = lock(&BASE_URL).clone();
    GameSession::new(ApiClient::new(FetchTransport, base_url, game_id))
}

fn resolve_id(game_id: Option<u32>) -> u64 {
    game_id.map(u64::from).unwrap_or(DEFAULT_GAME_ID)
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| js_error(err.to_string()))
}

fn js_error(message: impl AsRef<str>) -> JsValue {
    JsValue::from_str(message.as_ref())
}

fn busy_error(game_id: u64) -> JsValue {
    js_error(format!("game {game_id} already has a request in flight"))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
