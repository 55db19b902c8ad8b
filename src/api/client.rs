use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use web_time::Instant;

use crate::api::error::ApiError;
use crate::api::transport::Transport;
use crate::api::wire::{self, GameStateDto, HistoryEntry, InitRequest, LegalMovesPayload, MoveCoords};
use crate::bitboard;

/// Single-default-game convention: callers that don't name a game get game 1.
pub const DEFAULT_GAME_ID: u64 = 1;
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Typed client for the game server's REST endpoints.
///
/// Stateless beyond its configuration; game state lives in the store that
/// consumes these responses.
pub struct ApiClient<T> {
    transport: T,
    base_url: String,
    game_id: u64,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>, game_id: u64) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            game_id,
        }
    }

    pub fn game_id(&self) -> u64 {
        self.game_id
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// POST `/init`: create (or reset) the game server-side and return its
    /// opening state.
    pub async fn init_game(&self) -> Result<GameStateDto, ApiError> {
        let url = format!("{}/init", self.base_url);
        self.post_parsed(
            &url,
            &InitRequest {
                game_id: self.game_id,
            },
        )
        .await
    }

    /// GET `/get_gamestate`.
    pub async fn gamestate(&self) -> Result<GameStateDto, ApiError> {
        let url = format!("{}/get_gamestate?game_id={}", self.base_url, self.game_id);
        self.get_parsed(&url).await
    }

    /// GET `/get_legal_moves`: the current player's legal squares as a mask.
    pub async fn legal_moves(&self) -> Result<u64, ApiError> {
        let url = format!("{}/get_legal_moves?game_id={}", self.base_url, self.game_id);
        let payload: LegalMovesPayload = self.get_parsed(&url).await?;
        let mask = payload.into_mask()?;
        debug!(
            "game {}: legal squares {:?}",
            self.game_id,
            bitboard::decode(mask)
        );
        Ok(mask)
    }

    /// POST `/make_move`.
    ///
    /// The response body repeats the game state, but callers refresh
    /// explicitly after the submission completes, so only success (and the
    /// error envelope) matters here.
    pub async fn make_move(&self, coords: MoveCoords) -> Result<(), ApiError> {
        let url = format!("{}/make_move", self.base_url);
        self.post_parsed::<_, serde_json::Value>(&url, &coords.into_request(self.game_id))
            .await
            .map(|_| ())
    }

    /// GET `/get_game_history`: one entry per committed turn.
    pub async fn game_history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        let url = format!("{}/get_game_history?game_id={}", self.base_url, self.game_id);
        self.get_parsed(&url).await
    }

    async fn get_parsed<P: DeserializeOwned>(&self, url: &str) -> Result<P, ApiError> {
        let started = Instant::now();
        let response = self.transport.get(url).await?;
        debug!(
            "GET {url} -> {} in {} ms",
            response.status,
            started.elapsed().as_millis()
        );
        wire::parse_payload(&response)
    }

    async fn post_parsed<B: Serialize, P: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<P, ApiError> {
        let body = serde_json::to_string(body).map_err(|err| ApiError::Decode(err.to_string()))?;
        let started = Instant::now();
        let response = self.transport.post(url, body).await?;
        debug!(
            "POST {url} -> {} in {} ms",
            response.status,
            started.elapsed().as_millis()
        );
        wire::parse_payload(&response)
    }
}
