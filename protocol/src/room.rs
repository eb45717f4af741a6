use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Waiting,
    Playing,
}

/// One entry of the lobby listing. The list endpoint returns the same shape
/// as the single-room endpoint, so one type covers both.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub room_id: String,
    pub room_name: String,
    pub host_id: String,
    pub host_username: String,
    pub status: RoomStatus,
    pub max_players: u8,
    pub current_player_count: u8,
    #[serde(default)]
    pub player_ids: Vec<String>,
    #[serde(default)]
    pub player_usernames: Vec<String>,
    /// Set once the host starts a game; the join-race signal.
    pub current_game_id: Option<String>,
}

impl RoomSummary {
    pub fn is_full(&self) -> bool {
        self.current_player_count >= self.max_players
    }

    pub fn has_player(&self, user_id: &str) -> bool {
        self.player_ids.iter().any(|id| id == user_id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub room_name: String,
    pub max_players: u8,
    pub host_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_json(status: &str, current_game_id: &str) -> String {
        format!(
            r#"{{
                "roomId": "r-1",
                "roomName": "quick one",
                "hostId": "u-1",
                "hostUsername": "alice",
                "status": "{status}",
                "maxPlayers": 4,
                "currentPlayerCount": 2,
                "playerIds": ["u-1", "u-2"],
                "playerUsernames": ["alice", "bob"],
                "currentGameId": {current_game_id}
            }}"#
        )
    }

    #[test]
    fn room_decodes_waiting_without_game() {
        let room: RoomSummary = serde_json::from_str(&room_json("WAITING", "null")).unwrap();
        assert_eq!(room.status, RoomStatus::Waiting);
        assert_eq!(room.current_game_id, None);
        assert!(!room.is_full());
        assert!(room.has_player("u-2"));
        assert!(!room.has_player("u-3"));
    }

    #[test]
    fn room_decodes_running_game_id() {
        let room: RoomSummary = serde_json::from_str(&room_json("PLAYING", "\"g-9\"")).unwrap();
        assert_eq!(room.status, RoomStatus::Playing);
        assert_eq!(room.current_game_id.as_deref(), Some("g-9"));
    }

    #[test]
    fn create_room_request_uses_service_field_names() {
        let request = CreateRoomRequest {
            room_name: "quick one".into(),
            max_players: 4,
            host_id: "u-1".into(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"roomName\":\"quick one\""));
        assert!(json.contains("\"maxPlayers\":4"));
        assert!(json.contains("\"hostId\":\"u-1\""));
    }
}
