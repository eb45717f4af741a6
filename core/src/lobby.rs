use jiraigen_protocol::{RoomStatus, RoomSummary};

/// How often the room list is re-fetched while the lobby is on screen.
pub const LOBBY_REFRESH_MS: u32 = 5_000;

/// Lobby state for one signed-in user. The list is only ever replaced
/// wholesale; when a refresh fails the previous list simply stays.
#[derive(Clone, Debug, PartialEq)]
pub struct RoomLobby {
    user_id: String,
    rooms: Vec<RoomSummary>,
}

impl RoomLobby {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            rooms: Vec::new(),
        }
    }

    pub fn rooms(&self) -> &[RoomSummary] {
        &self.rooms
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Replace the list with a fresh server listing. Returns whether
    /// anything actually changed, so unchanged polls can skip re-rendering.
    pub fn replace(&mut self, rooms: Vec<RoomSummary>) -> bool {
        if self.rooms == rooms {
            return false;
        }
        self.rooms = rooms;
        true
    }

    /// A room takes new players while it waits, has a free slot, and does
    /// not already contain us.
    pub fn can_join(&self, room: &RoomSummary) -> bool {
        room.status == RoomStatus::Waiting && !room.is_full() && !room.has_player(&self.user_id)
    }

    /// The game id of a card we can re-enter: the room is mid-game and we
    /// are one of its players.
    pub fn running_game_id<'a>(&self, room: &'a RoomSummary) -> Option<&'a str> {
        if room.status == RoomStatus::Playing && room.has_player(&self.user_id) {
            room.current_game_id.as_deref()
        } else {
            None
        }
    }
}

/// Where a successful join response routes the player. The deciding signal
/// is `currentGameId`: if the host managed to start the game while our join
/// was in flight, we go straight in instead of waiting.
#[derive(Clone, Debug, PartialEq)]
pub enum JoinOutcome {
    EnterGame { game_id: String, room: RoomSummary },
    Waiting { room: RoomSummary },
}

impl From<RoomSummary> for JoinOutcome {
    fn from(room: RoomSummary) -> Self {
        match room.current_game_id.clone() {
            Some(game_id) => JoinOutcome::EnterGame { game_id, room },
            None => JoinOutcome::Waiting { room },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(
        id: &str,
        status: RoomStatus,
        players: &[&str],
        max_players: u8,
        current_game_id: Option<&str>,
    ) -> RoomSummary {
        RoomSummary {
            room_id: id.into(),
            room_name: format!("room {id}"),
            host_id: players.first().copied().unwrap_or("u-0").into(),
            host_username: "host".into(),
            status,
            max_players,
            current_player_count: players.len() as u8,
            player_ids: players.iter().map(|&p| p.into()).collect(),
            player_usernames: players.iter().map(|&p| p.to_uppercase()).collect(),
            current_game_id: current_game_id.map(Into::into),
        }
    }

    #[test]
    fn replace_is_wholesale_and_reports_changes() {
        let mut lobby = RoomLobby::new("u-9");
        let first = vec![room("r-1", RoomStatus::Waiting, &["u-1"], 4, None)];
        assert!(lobby.replace(first.clone()));
        assert_eq!(lobby.rooms(), &first[..]);

        assert!(!lobby.replace(first), "unchanged listing is not an update");

        let second = vec![room("r-2", RoomStatus::Waiting, &["u-2"], 2, None)];
        assert!(lobby.replace(second.clone()));
        assert_eq!(lobby.rooms(), &second[..], "old rooms are gone, not merged");
    }

    #[test]
    fn join_eligibility() {
        let lobby = RoomLobby::new("u-9");

        let open = room("r-1", RoomStatus::Waiting, &["u-1"], 4, None);
        assert!(lobby.can_join(&open));

        let playing = room("r-2", RoomStatus::Playing, &["u-1"], 4, Some("g-1"));
        assert!(!lobby.can_join(&playing));

        let full = room("r-3", RoomStatus::Waiting, &["u-1", "u-2"], 2, None);
        assert!(!lobby.can_join(&full));

        let already_in = room("r-4", RoomStatus::Waiting, &["u-1", "u-9"], 4, None);
        assert!(!lobby.can_join(&already_in));
    }

    #[test]
    fn running_game_is_enterable_only_for_members() {
        let lobby = RoomLobby::new("u-9");

        let ours = room("r-1", RoomStatus::Playing, &["u-1", "u-9"], 4, Some("g-7"));
        assert_eq!(lobby.running_game_id(&ours), Some("g-7"));

        let not_ours = room("r-2", RoomStatus::Playing, &["u-1"], 4, Some("g-8"));
        assert_eq!(lobby.running_game_id(&not_ours), None);

        let waiting = room("r-3", RoomStatus::Waiting, &["u-1", "u-9"], 4, None);
        assert_eq!(lobby.running_game_id(&waiting), None);
    }

    #[test]
    fn join_outcome_routes_on_current_game_id() {
        let waiting = room("r-1", RoomStatus::Waiting, &["u-1", "u-9"], 4, None);
        assert_eq!(
            JoinOutcome::from(waiting.clone()),
            JoinOutcome::Waiting { room: waiting }
        );

        let started = room("r-1", RoomStatus::Playing, &["u-1", "u-9"], 4, Some("g-5"));
        match JoinOutcome::from(started) {
            JoinOutcome::EnterGame { game_id, room } => {
                assert_eq!(game_id, "g-5");
                assert_eq!(room.room_id, "r-1");
            }
            other => panic!("expected EnterGame, got {other:?}"),
        }
    }
}
