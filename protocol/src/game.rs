use serde::{Deserialize, Serialize};

/// Raw board cell as the server encodes it.
///
/// `-3` flagged, `-2` hidden, `-1` revealed mine, `0..=8` revealed with the
/// adjacent-mine count. Anything else is a contract violation and is
/// rejected by the decoding layer, not here.
pub type CellCode = i8;

pub const CELL_FLAGGED: CellCode = -3;
pub const CELL_HIDDEN: CellCode = -2;
pub const CELL_MINE: CellCode = -1;

/// Server-assigned lifecycle state of a game. The client never infers
/// transitions, it only mirrors what the latest snapshot says.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
    Paused,
    Surrendered,
}

impl GameStatus {
    pub const fn is_playing(self) -> bool {
        matches!(self, GameStatus::Playing)
    }

    /// Won, lost and surrendered games are over for good; paused ones are not.
    pub const fn is_terminal(self) -> bool {
        use GameStatus::*;
        match self {
            Playing | Paused => false,
            Won | Lost | Surrendered => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Custom,
}

impl Difficulty {
    /// `(width, height, mines)` for the fixed presets, `None` for custom.
    pub const fn preset(self) -> Option<(u8, u8, u16)> {
        use Difficulty::*;
        match self {
            Easy => Some((9, 9, 10)),
            Medium => Some((16, 16, 40)),
            Hard => Some((30, 16, 99)),
            Custom => None,
        }
    }
}

/// What a gesture asks the server to do with a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerAction {
    Click,
    Flag,
    Unflag,
}

/// Full authoritative game state. Every mutating endpoint returns one of
/// these and the client replaces its local copy wholesale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub game_id: String,
    pub width: u8,
    pub height: u8,
    pub mine_count: u16,
    /// Row-major, `height` rows of `width` cells.
    pub board: Vec<Vec<CellCode>>,
    pub game_status: GameStatus,
    /// Authoritative elapsed play time in milliseconds, when the server
    /// tracks it.
    pub elapsed_time: Option<u64>,
    /// Game start as epoch milliseconds; the timer fallback anchor.
    pub start_time: Option<u64>,
    #[serde(default)]
    pub players: Vec<String>,
    pub current_player_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub width: u8,
    pub height: u8,
    pub mine_count: u16,
    pub difficulty: Difficulty,
    pub user_id: String,
    /// Set when the game is created inside a room.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
}

impl CreateGameRequest {
    pub fn from_difficulty(difficulty: Difficulty, user_id: impl Into<String>) -> Option<Self> {
        let (width, height, mine_count) = difficulty.preset()?;
        Some(Self {
            width,
            height,
            mine_count,
            difficulty,
            user_id: user_id.into(),
            room_id: None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerActionRequest {
    pub game_id: String,
    pub row: u8,
    pub col: u8,
    pub action: PlayerAction,
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_decodes_service_shape() {
        let json = r#"{
            "gameId": "g-1",
            "width": 3,
            "height": 2,
            "mineCount": 1,
            "board": [[-2, -2, 1], [0, -3, -1]],
            "gameStatus": "PLAYING",
            "elapsedTime": 12500,
            "startTime": 1712345678901,
            "players": ["u-1", "u-2"],
            "currentPlayerId": "u-1",
            "revealed": [[false, false, true], [true, false, true]]
        }"#;
        let snapshot: GameSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.game_id, "g-1");
        assert_eq!(snapshot.board.len(), 2);
        assert_eq!(snapshot.board[1], vec![0, CELL_FLAGGED, CELL_MINE]);
        assert_eq!(snapshot.game_status, GameStatus::Playing);
        assert_eq!(snapshot.elapsed_time, Some(12_500));
        assert_eq!(snapshot.players, vec!["u-1", "u-2"]);
    }

    #[test]
    fn snapshot_optional_fields_may_be_absent() {
        let json = r#"{
            "gameId": "g-2",
            "width": 2,
            "height": 1,
            "mineCount": 1,
            "board": [[-2, -2]],
            "gameStatus": "PAUSED"
        }"#;
        let snapshot: GameSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.elapsed_time, None);
        assert_eq!(snapshot.start_time, None);
        assert!(snapshot.players.is_empty());
        assert_eq!(snapshot.current_player_id, None);
    }

    #[test]
    fn status_strings_match_the_service() {
        for (status, text) in [
            (GameStatus::Playing, "\"PLAYING\""),
            (GameStatus::Won, "\"WON\""),
            (GameStatus::Lost, "\"LOST\""),
            (GameStatus::Paused, "\"PAUSED\""),
            (GameStatus::Surrendered, "\"SURRENDERED\""),
        ] {
            assert_eq!(serde_json::to_string(&status).unwrap(), text);
        }
        assert!(serde_json::from_str::<GameStatus>("\"EXPLODED\"").is_err());
    }

    #[test]
    fn terminal_statuses() {
        assert!(!GameStatus::Playing.is_terminal());
        assert!(!GameStatus::Paused.is_terminal());
        assert!(GameStatus::Won.is_terminal());
        assert!(GameStatus::Lost.is_terminal());
        assert!(GameStatus::Surrendered.is_terminal());
    }

    #[test]
    fn action_request_uses_service_field_names() {
        let request = PlayerActionRequest {
            game_id: "g-1".into(),
            row: 4,
            col: 7,
            action: PlayerAction::Unflag,
            user_id: "u-1".into(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"gameId\":\"g-1\""));
        assert!(json.contains("\"action\":\"UNFLAG\""));
        assert!(json.contains("\"userId\":\"u-1\""));
    }

    #[test]
    fn create_request_carries_user_and_optional_room() {
        let mut request = CreateGameRequest::from_difficulty(Difficulty::Easy, "u-1").unwrap();
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"userId\":\"u-1\""));
        assert!(!json.contains("roomId"), "solo create sends no room id");

        request.room_id = Some("r-1".into());
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"roomId\":\"r-1\""));
    }

    #[test]
    fn difficulty_presets_fill_request_dimensions() {
        let request = CreateGameRequest::from_difficulty(Difficulty::Hard, "u-1").unwrap();
        assert_eq!((request.width, request.height), (30, 16));
        assert_eq!(request.mine_count, 99);
        assert!(CreateGameRequest::from_difficulty(Difficulty::Custom, "u-1").is_none());
    }
}
