use crate::StatusMessage;
use crate::board::{BoardView, CellView};
use crate::error::Result;
use crate::timer::GameTimer;
use crate::types::{CellCount, Coord2, IntentSeq};
use chrono::{DateTime, Utc};
use jiraigen_protocol::{GameSnapshot, GameStatus, PlayerAction};

/// Which lifecycle buttons a status offers. Restart and surrender are
/// always on the table; the server rejects them when they make no sense.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Controls {
    pub pause: bool,
    pub resume: bool,
}

impl Controls {
    pub const fn for_status(status: GameStatus) -> Self {
        Self {
            pause: status.is_playing(),
            resume: matches!(status, GameStatus::Paused),
        }
    }
}

/// What became of a server response handed to [`GameSession::apply`].
#[derive(Clone, Debug, PartialEq)]
pub enum ApplyOutcome {
    /// Snapshot accepted wholesale; carries the status-entry message when
    /// the lifecycle state changed.
    Applied { message: Option<StatusMessage> },
    /// A newer response was already applied; this one is dropped.
    Stale,
}

impl ApplyOutcome {
    pub const fn has_update(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

fn entry_message(prev: GameStatus, next: GameStatus) -> Option<StatusMessage> {
    use GameStatus::*;
    if prev == next {
        return None;
    }
    match next {
        Won => Some(StatusMessage::success("Congratulations, you won!")),
        Lost => Some(StatusMessage::error("Boom! You hit a mine.")),
        Surrendered => Some(StatusMessage::info("Game surrendered.")),
        // pause/resume announcements belong to the operation, not the state
        Playing | Paused => None,
    }
}

/// One running game as the client sees it: the latest accepted snapshot,
/// its decoded board, the presentation timer, and the intent sequencing
/// that keeps out-of-order responses from rolling state back.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSession {
    snapshot: GameSnapshot,
    board: BoardView,
    timer: GameTimer,
    issued: IntentSeq,
    applied: IntentSeq,
}

impl GameSession {
    pub fn start(snapshot: GameSnapshot, now: DateTime<Utc>) -> Result<Self> {
        let board = BoardView::from_snapshot(&snapshot)?;
        let timer = GameTimer::anchored(&snapshot, now);
        Ok(Self {
            snapshot,
            board,
            timer,
            issued: 0,
            applied: 0,
        })
    }

    pub fn game_id(&self) -> &str {
        &self.snapshot.game_id
    }

    pub fn status(&self) -> GameStatus {
        self.snapshot.game_status
    }

    pub fn snapshot(&self) -> &GameSnapshot {
        &self.snapshot
    }

    pub fn board(&self) -> &BoardView {
        &self.board
    }

    pub fn mine_count(&self) -> CellCount {
        self.snapshot.mine_count
    }

    /// Counter value for the header. Goes negative when players overflag.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.snapshot.mine_count) - i32::from(self.board.flag_count())
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.timer.display_secs()
    }

    pub fn controls(&self) -> Controls {
        Controls::for_status(self.status())
    }

    /// Cell gestures only mean anything while the game is in progress.
    pub fn is_interactive(&self) -> bool {
        self.status().is_playing()
    }

    /// Stamp for the next dispatched request.
    pub fn next_intent(&mut self) -> IntentSeq {
        self.issued += 1;
        self.issued
    }

    /// Left click on a cell. The server decides what the click does; the
    /// client only checks that the gesture is currently meaningful.
    pub fn click_intent(&self, coords: Coord2) -> Option<PlayerAction> {
        if !self.is_interactive() {
            return None;
        }
        self.board.cell_at(coords)?;
        Some(PlayerAction::Click)
    }

    /// Right click on a cell. Flag vs unflag is decided from what the cell
    /// currently shows, not from any locally tracked flag set. Anything not
    /// showing a flag asks for one; whether the mark means something on that
    /// cell is the server's call, answered by the returned snapshot.
    pub fn mark_intent(&self, coords: Coord2) -> Option<PlayerAction> {
        if !self.is_interactive() {
            return None;
        }
        match self.board.cell_at(coords)? {
            CellView::Flagged => Some(PlayerAction::Unflag),
            _ => Some(PlayerAction::Flag),
        }
    }

    /// The only mutation point. Either the whole response lands (snapshot,
    /// board, timer, sequence) or, on a decode error, nothing does.
    pub fn apply(
        &mut self,
        intent: IntentSeq,
        snapshot: GameSnapshot,
        now: DateTime<Utc>,
    ) -> Result<ApplyOutcome> {
        if intent < self.applied {
            log::warn!(
                "discarding stale response: intent {} already superseded by {}",
                intent,
                self.applied
            );
            return Ok(ApplyOutcome::Stale);
        }

        let board = BoardView::from_snapshot(&snapshot)?;
        let message = entry_message(self.snapshot.game_status, snapshot.game_status);

        self.timer.re_anchor(&snapshot, now);
        self.board = board;
        self.snapshot = snapshot;
        self.applied = intent;

        Ok(ApplyOutcome::Applied { message })
    }

    /// One timer interval step. Returns whether the display changed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        self.timer.tick(now)
    }
}
