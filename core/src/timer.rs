use chrono::{DateTime, Utc};
use jiraigen_protocol::GameSnapshot;

/// Where the displayed play time comes from. Resolved once per applied
/// snapshot; between snapshots the timer only moves through [`GameTimer::tick`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TimeSource {
    /// The server reported `elapsedTime`; ticks add a flat second to it and
    /// never resync against the wall clock (drift is corrected by the next
    /// snapshot, not locally).
    Authoritative { elapsed_ms: u64 },
    /// No elapsed time on the wire; derive the display from `startTime`.
    Derived { started_at: DateTime<Utc> },
}

impl TimeSource {
    pub fn resolve(snapshot: &GameSnapshot, now: DateTime<Utc>) -> Self {
        use TimeSource::*;
        if let Some(elapsed_ms) = snapshot.elapsed_time {
            return Authoritative { elapsed_ms };
        }
        // A snapshot with neither field anchors at the moment it arrived.
        let started_at = snapshot
            .start_time
            .and_then(|ms| DateTime::<Utc>::from_timestamp_millis(ms as i64))
            .unwrap_or(now);
        Derived { started_at }
    }

    fn display_secs(&self, now: DateTime<Utc>) -> u32 {
        use TimeSource::*;
        match *self {
            Authoritative { elapsed_ms } => (elapsed_ms / 1000) as u32,
            Derived { started_at } => (now - started_at).num_seconds().max(0) as u32,
        }
    }
}

/// Presentation timer for one game session. It counts whole seconds, runs
/// only while the game is in progress, and never runs backwards between
/// anchors; only a fresh snapshot may lower the display.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GameTimer {
    source: TimeSource,
    display_secs: u32,
    running: bool,
}

impl GameTimer {
    pub fn anchored(snapshot: &GameSnapshot, now: DateTime<Utc>) -> Self {
        let source = TimeSource::resolve(snapshot, now);
        Self {
            source,
            display_secs: source.display_secs(now),
            running: snapshot.game_status.is_playing(),
        }
    }

    /// The server's word replaces everything local, including any drift the
    /// ticks accumulated.
    pub fn re_anchor(&mut self, snapshot: &GameSnapshot, now: DateTime<Utc>) {
        *self = Self::anchored(snapshot, now);
    }

    /// One interval step. Returns whether the displayed value changed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if !self.running {
            return false;
        }

        if let TimeSource::Authoritative { elapsed_ms } = &mut self.source {
            *elapsed_ms += 1000;
        }

        let next = self.source.display_secs(now);
        if next > self.display_secs {
            self.display_secs = next;
            true
        } else {
            false
        }
    }

    pub const fn display_secs(&self) -> u32 {
        self.display_secs
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiraigen_protocol::GameStatus;

    fn t(ms: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(ms).unwrap()
    }

    fn snapshot(
        status: GameStatus,
        elapsed_time: Option<u64>,
        start_time: Option<u64>,
    ) -> GameSnapshot {
        GameSnapshot {
            game_id: "g-1".into(),
            width: 1,
            height: 1,
            mine_count: 1,
            board: vec![vec![-2]],
            game_status: status,
            elapsed_time,
            start_time,
            players: vec![],
            current_player_id: None,
        }
    }

    #[test]
    fn authoritative_elapsed_takes_priority_over_start_time() {
        let timer = GameTimer::anchored(
            &snapshot(GameStatus::Playing, Some(12_500), Some(0)),
            t(99_000),
        );
        assert_eq!(timer.display_secs(), 12);
        assert!(timer.is_running());
    }

    #[test]
    fn authoritative_ticks_add_whole_seconds_without_resync() {
        let mut timer =
            GameTimer::anchored(&snapshot(GameStatus::Playing, Some(500), None), t(0));
        assert_eq!(timer.display_secs(), 0);

        // now is far ahead of the anchor; ticks still move one second at a time
        assert!(timer.tick(t(3_600_000)));
        assert_eq!(timer.display_secs(), 1);
        assert!(timer.tick(t(3_601_000)));
        assert_eq!(timer.display_secs(), 2);
    }

    #[test]
    fn derived_display_follows_wall_clock() {
        let mut timer =
            GameTimer::anchored(&snapshot(GameStatus::Playing, None, Some(10_000)), t(10_000));
        assert_eq!(timer.display_secs(), 0);

        assert!(timer.tick(t(13_200)));
        assert_eq!(timer.display_secs(), 3);
    }

    #[test]
    fn derived_display_never_runs_backwards() {
        let mut timer =
            GameTimer::anchored(&snapshot(GameStatus::Playing, None, Some(0)), t(5_000));
        assert_eq!(timer.display_secs(), 5);

        // clock skew: now jumped behind the anchor
        assert!(!timer.tick(t(2_000)));
        assert_eq!(timer.display_secs(), 5);
    }

    #[test]
    fn missing_anchor_fields_anchor_at_now() {
        let mut timer = GameTimer::anchored(&snapshot(GameStatus::Playing, None, None), t(50_000));
        assert_eq!(timer.display_secs(), 0);
        assert!(timer.tick(t(51_000)));
        assert_eq!(timer.display_secs(), 1);
    }

    #[test]
    fn only_playing_games_tick() {
        for status in [
            GameStatus::Paused,
            GameStatus::Won,
            GameStatus::Lost,
            GameStatus::Surrendered,
        ] {
            let mut timer = GameTimer::anchored(&snapshot(status, Some(7_000), None), t(0));
            assert!(!timer.is_running());
            assert!(!timer.tick(t(60_000)));
            assert_eq!(timer.display_secs(), 7, "frozen display for {status:?}");
        }
    }

    #[test]
    fn re_anchor_may_lower_the_display() {
        let mut timer =
            GameTimer::anchored(&snapshot(GameStatus::Playing, Some(30_000), None), t(0));
        for _ in 0..5 {
            timer.tick(t(0));
        }
        assert_eq!(timer.display_secs(), 35);

        timer.re_anchor(&snapshot(GameStatus::Playing, Some(31_000), None), t(0));
        assert_eq!(timer.display_secs(), 31);
        assert!(timer.is_running());
    }

    #[test]
    fn resume_continues_from_fresh_anchor_instead_of_zero() {
        let mut timer =
            GameTimer::anchored(&snapshot(GameStatus::Paused, Some(42_000), None), t(0));
        assert_eq!(timer.display_secs(), 42);
        assert!(!timer.tick(t(1_000)));

        timer.re_anchor(&snapshot(GameStatus::Playing, Some(42_000), None), t(1_000));
        assert_eq!(timer.display_secs(), 42);
        assert!(timer.tick(t(2_000)));
        assert_eq!(timer.display_secs(), 43);
    }
}
