use jiraigen_protocol::{GameSnapshot, RoomSummary};
use serde::{Deserialize, Serialize};

/// The three top-level screens. Exactly one is ever active.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActiveView {
    Auth,
    Lobby,
    Game,
}

/// Who is signed in. Persisted alongside the auth token so a reload can
/// restore the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub username: String,
}

/// Top-level navigation state. Views never overlap, and every transition
/// away from a view drops the state that belonged to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    identity: Option<Identity>,
    view: ActiveView,
    game: Option<GameSnapshot>,
    room: Option<RoomSummary>,
}

impl Session {
    pub fn signed_out() -> Self {
        Self {
            identity: None,
            view: ActiveView::Auth,
            game: None,
            room: None,
        }
    }

    pub const fn view(&self) -> ActiveView {
        self.view
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// The snapshot that seeds the game view while it is active.
    pub fn current_game(&self) -> Option<&GameSnapshot> {
        self.game.as_ref()
    }

    /// Room context carried into and out of a game entered from a room.
    pub fn current_room(&self) -> Option<&RoomSummary> {
        self.room.as_ref()
    }

    pub fn log_in(&mut self, identity: Identity) {
        self.identity = Some(identity);
        self.view = ActiveView::Lobby;
        self.game = None;
        self.room = None;
    }

    pub fn enter_game(&mut self, snapshot: GameSnapshot, room: Option<RoomSummary>) {
        if self.identity.is_none() {
            log::warn!("enter_game ignored while signed out");
            return;
        }
        self.game = Some(snapshot);
        self.room = room;
        self.view = ActiveView::Game;
    }

    /// Back to the lobby; the room context survives, the game does not.
    pub fn leave_game(&mut self) {
        self.game = None;
        self.view = if self.identity.is_some() {
            ActiveView::Lobby
        } else {
            ActiveView::Auth
        };
    }

    /// Local teardown is unconditional; it does not care whether the
    /// server acknowledged the logout.
    pub fn log_out(&mut self) {
        *self = Self::signed_out();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiraigen_protocol::{GameStatus, RoomStatus};

    fn identity() -> Identity {
        Identity {
            user_id: "u-1".into(),
            username: "alice".into(),
        }
    }

    fn game() -> GameSnapshot {
        GameSnapshot {
            game_id: "g-1".into(),
            width: 1,
            height: 1,
            mine_count: 1,
            board: vec![vec![-2]],
            game_status: GameStatus::Playing,
            elapsed_time: None,
            start_time: None,
            players: vec![],
            current_player_id: None,
        }
    }

    fn room() -> RoomSummary {
        RoomSummary {
            room_id: "r-1".into(),
            room_name: "room".into(),
            host_id: "u-1".into(),
            host_username: "alice".into(),
            status: RoomStatus::Waiting,
            max_players: 4,
            current_player_count: 1,
            player_ids: vec!["u-1".into()],
            player_usernames: vec!["alice".into()],
            current_game_id: None,
        }
    }

    #[test]
    fn starts_signed_out_on_auth() {
        let session = Session::signed_out();
        assert_eq!(session.view(), ActiveView::Auth);
        assert!(session.identity().is_none());
        assert!(session.current_game().is_none());
    }

    #[test]
    fn login_lands_in_lobby() {
        let mut session = Session::signed_out();
        session.log_in(identity());
        assert_eq!(session.view(), ActiveView::Lobby);
        assert_eq!(session.identity().unwrap().username, "alice");
    }

    #[test]
    fn game_entry_and_exit_keep_room_context() {
        let mut session = Session::signed_out();
        session.log_in(identity());
        session.enter_game(game(), Some(room()));

        assert_eq!(session.view(), ActiveView::Game);
        assert!(session.current_game().is_some());
        assert_eq!(session.current_room().unwrap().room_id, "r-1");

        session.leave_game();
        assert_eq!(session.view(), ActiveView::Lobby);
        assert!(session.current_game().is_none(), "game state dropped on exit");
        assert!(session.current_room().is_some(), "room context survives");
    }

    #[test]
    fn enter_game_requires_identity() {
        let mut session = Session::signed_out();
        session.enter_game(game(), None);
        assert_eq!(session.view(), ActiveView::Auth);
        assert!(session.current_game().is_none());
    }

    #[test]
    fn logout_clears_everything() {
        let mut session = Session::signed_out();
        session.log_in(identity());
        session.enter_game(game(), Some(room()));

        session.log_out();
        assert_eq!(session.view(), ActiveView::Auth);
        assert!(session.identity().is_none());
        assert!(session.current_game().is_none());
        assert!(session.current_room().is_none());
    }
}
