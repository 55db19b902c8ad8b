//! Orchestration of one game against the server: request chains and click
//! routing.

use log::{debug, error};

use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::api::transport::Transport;
use crate::api::wire::MoveCoords;
use crate::state::GameStore;
use crate::types::{BoardView, PlayOutcome};

/// The typed client plus the owned view state for one game.
///
/// Every request chain here is strictly sequential: a refresh is only issued
/// after the move it follows has completed, and the store is replaced
/// wholesale only once a full chain succeeds. Any failure leaves the
/// previous snapshot in place.
pub struct GameSession<T> {
    client: ApiClient<T>,
    store: GameStore,
}

impl<T: Transport> GameSession<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Self {
            client,
            store: GameStore::new(),
        }
    }

    /// The current cached view, without touching the network.
    pub fn view(&self) -> Option<BoardView> {
        self.store.view()
    }

    /// Initializes the game server-side and primes the local store.
    pub async fn start(&mut self) -> Result<BoardView, ApiError> {
        let state = self.client.init_game().await?;
        let legal = self.client.legal_moves().await?;
        self.store.replace(state, legal);
        Ok(self.committed_view())
    }

    /// Re-fetches the snapshot, then the legal moves, then commits both.
    pub async fn refresh(&mut self) -> Result<BoardView, ApiError> {
        let state = self.client.gamestate().await?;
        let legal = self.client.legal_moves().await?;
        self.store.replace(state, legal);
        Ok(self.committed_view())
    }

    /// Routes a click on square `index`.
    ///
    /// Clicks on squares that are not currently legal are no-ops: nothing is
    /// sent. A click while a previous submission is still in flight is
    /// rejected rather than raced. Otherwise the move is submitted and the
    /// state re-fetched only after the submission has completed.
    pub async fn play(&mut self, index: u8) -> Result<PlayOutcome, ApiError> {
        if !self.store.is_legal(index) {
            debug!(
                "game {}: click on square {index} ignored, not a legal move",
                self.client.game_id()
            );
            return Ok(PlayOutcome::Ignored { index });
        }
        if !self.store.begin_move() {
            return Ok(PlayOutcome::Busy);
        }

        let result = self.submit_and_refresh(index).await;
        self.store.finish_move();

        match result {
            Ok(view) => Ok(PlayOutcome::Played { view }),
            Err(err) => {
                error!(
                    "game {}: move on square {index} failed, keeping previous state: {err}",
                    self.client.game_id()
                );
                Err(err)
            }
        }
    }

    async fn submit_and_refresh(&mut self, index: u8) -> Result<BoardView, ApiError> {
        self.client.make_move(MoveCoords::from_index(index)).await?;
        let state = self.client.gamestate().await?;
        let legal = self.client.legal_moves().await?;
        self.store.replace(state, legal);
        Ok(self.committed_view())
    }

    fn committed_view(&self) -> BoardView {
        // replace() has just run, so the snapshot is present.
        self.store.view().expect("snapshot present after replace")
    }

    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut GameStore {
        &mut self.store
    }
}
