//! Wire-format types for the game server's REST endpoints.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::transport::HttpResponse;
use crate::bitboard::BOARD_SIZE;
use crate::projection::col_letter;
use crate::types::{Player, Winner};

/// Snapshot of one game, as served by `/init` and `/get_gamestate`.
///
/// Held by the client only as an opaque cached copy; every field is trusted
/// as-is and replaced wholesale on the next fetch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameStateDto {
    pub black_board: u64,
    pub white_board: u64,
    pub current_player: Player,
    pub current_turn: u32,
    #[serde(default)]
    pub game_over: bool,
    #[serde(default)]
    pub winner: Option<Winner>,
}

/// One `/get_game_history` entry: the position after a committed turn.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HistoryEntry {
    pub turn: u32,
    pub black_board: u64,
    pub white_board: u64,
    pub current_player: Player,
}

#[derive(Debug, Serialize)]
pub struct InitRequest {
    pub game_id: u64,
}

#[derive(Debug, Serialize)]
pub struct MoveRequest {
    pub game_id: u64,
    pub row: u8,
    pub col: String,
}

/// Coordinates for `/make_move` as the server speaks them: numeric 0-based
/// row, letter column `"A"`-`"H"`. The asymmetry is a wire fact; this
/// adapter keeps it out of the rest of the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCoords {
    pub row: u8,
    pub col: char,
}

impl MoveCoords {
    pub fn from_index(index: u8) -> Self {
        Self {
            row: index / BOARD_SIZE as u8,
            col: col_letter(index),
        }
    }

    pub(crate) fn into_request(self, game_id: u64) -> MoveRequest {
        MoveRequest {
            game_id,
            row: self.row,
            col: self.col.to_string(),
        }
    }
}

/// `/get_legal_moves` answers either a plain integer mask or, from the
/// reference server, `bin(mask)` serialized as a string such as `"0b1010"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LegalMovesPayload {
    Mask(u64),
    Binary(String),
}

impl LegalMovesPayload {
    pub fn into_mask(self) -> Result<u64, ApiError> {
        match self {
            Self::Mask(mask) => Ok(mask),
            Self::Binary(text) => {
                let digits = text.strip_prefix("0b").unwrap_or(&text);
                u64::from_str_radix(digits, 2).map_err(|err| {
                    ApiError::Decode(format!("bad legal-move mask {text:?}: {err}"))
                })
            }
        }
    }
}

/// Interprets a raw response: status check, error-envelope check, then JSON
/// decode. The reference server reports failures as 200s with an
/// `{"error": ...}` body, so the envelope check is not optional.
pub fn parse_payload<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    if !response.is_success() {
        return Err(ApiError::Server {
            status: response.status,
            message: response.body.trim().to_string(),
        });
    }

    let value: serde_json::Value =
        serde_json::from_str(&response.body).map_err(|err| ApiError::Decode(err.to_string()))?;

    if let Some(message) = value.get("error").and_then(serde_json::Value::as_str) {
        return Err(ApiError::Server {
            status: response.status,
            message: message.to_string(),
        });
    }

    serde_json::from_value(value).map_err(|err| ApiError::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            body: body.to_string(),
        }
    }

    #[test]
    fn parses_a_gamestate_payload() {
        let body = r#"{
            "black_board": 34628173824,
            "white_board": 68853694464,
            "current_player": "black",
            "current_turn": 0,
            "game_over": false
        }"#;

        let state: GameStateDto = parse_payload(&ok(body)).unwrap();

        assert_eq!(state.black_board, (1 << 28) | (1 << 35));
        assert_eq!(state.white_board, (1 << 27) | (1 << 36));
        assert_eq!(state.current_player, Player::Black);
        assert_eq!(state.current_turn, 0);
        assert!(!state.game_over);
        assert_eq!(state.winner, None);
    }

    #[test]
    fn winner_field_accepts_all_terminal_outcomes() {
        for (text, expected) in [
            ("\"black\"", Winner::Black),
            ("\"white\"", Winner::White),
            ("\"draw\"", Winner::Draw),
        ] {
            let body = format!(
                r#"{{"black_board": 0, "white_board": 0, "current_player": "white",
                     "current_turn": 60, "game_over": true, "winner": {text}}}"#
            );
            let state: GameStateDto = parse_payload(&ok(&body)).unwrap();
            assert_eq!(state.winner, Some(expected));
        }
    }

    #[test]
    fn legal_moves_accept_integer_and_binary_string_forms() {
        let from_number: LegalMovesPayload = parse_payload(&ok("10")).unwrap();
        assert_eq!(from_number.into_mask().unwrap(), 10);

        let from_string: LegalMovesPayload = parse_payload(&ok("\"0b1010\"")).unwrap();
        assert_eq!(from_string.into_mask().unwrap(), 10);
    }

    #[test]
    fn legal_moves_binary_string_holds_all_64_bits() {
        let text = format!("\"0b1{}\"", "0".repeat(63));
        let payload: LegalMovesPayload = parse_payload(&ok(&text)).unwrap();
        assert_eq!(payload.into_mask().unwrap(), 1u64 << 63);
    }

    #[test]
    fn garbled_legal_moves_string_is_a_decode_error() {
        let payload: LegalMovesPayload = parse_payload(&ok("\"0b10x1\"")).unwrap();
        assert!(matches!(payload.into_mask(), Err(ApiError::Decode(_))));
    }

    #[test]
    fn error_envelope_becomes_a_server_error() {
        let err = parse_payload::<GameStateDto>(&ok(r#"{"error": "Game not found"}"#)).unwrap_err();

        assert_eq!(
            err,
            ApiError::Server {
                status: 200,
                message: "Game not found".to_string()
            }
        );
    }

    #[test]
    fn non_success_status_becomes_a_server_error() {
        let response = HttpResponse {
            status: 500,
            body: "boom".to_string(),
        };
        let err = parse_payload::<GameStateDto>(&response).unwrap_err();

        assert!(matches!(err, ApiError::Server { status: 500, .. }));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = parse_payload::<GameStateDto>(&ok("not json")).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn t03_move_coords_map_index_to_row_and_letter_column() {
        assert_eq!(MoveCoords::from_index(19), MoveCoords { row: 2, col: 'D' });
        assert_eq!(MoveCoords::from_index(0), MoveCoords { row: 0, col: 'A' });
        assert_eq!(MoveCoords::from_index(63), MoveCoords { row: 7, col: 'H' });
    }

    #[test]
    fn move_request_serializes_the_wire_shape() {
        let request = MoveCoords::from_index(19).into_request(1);
        let json = serde_json::to_string(&request).unwrap();

        assert_eq!(json, r#"{"game_id":1,"row":2,"col":"D"}"#);
    }

    #[test]
    fn parses_game_history_entries() {
        let body = r#"[
            {"turn": 0, "black_board": 34628173824, "white_board": 68853694464, "current_player": "black"},
            {"turn": 1, "black_board": 34762915840, "white_board": 68719476736, "current_player": "white"}
        ]"#;

        let history: Vec<HistoryEntry> = parse_payload(&ok(body)).unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].turn, 0);
        assert_eq!(history[1].current_player, Player::White);
    }
}
