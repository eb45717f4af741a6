use crate::api::Api;
use chrono::{DateTime, Utc};
use gloo::dialogs::confirm;
use gloo::timers::callback::{Interval, Timeout};
use jiraigen_core::{
    ApplyOutcome, CellView, Coord, Coord2, GameSession, Identity, IntentSeq, StatusMessage,
};
use jiraigen_protocol::{GameSnapshot, GameStatus, PlayerAction, PlayerActionRequest, RoomSummary};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// The one clock read in the app; everything below takes `now` as a value.
fn utc_now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

/// Three-digit LED-style counter text, saturating at the display range.
fn counter_text(num: i32) -> String {
    match num {
        ..-99 => "-99".to_string(),
        -99..0 => format!("-{:02}", -num),
        0..1000 => format!("{:03}", num),
        1000.. => "999".to_string(),
    }
}

const fn status_text(status: GameStatus) -> &'static str {
    use GameStatus::*;
    match status {
        Playing => "in progress",
        Won => "won",
        Lost => "lost",
        Paused => "paused",
        Surrendered => "surrendered",
    }
}

const fn status_class(status: GameStatus) -> &'static str {
    use GameStatus::*;
    match status {
        Playing => "playing",
        Won => "won",
        Lost => "lost",
        Paused => "paused",
        Surrendered => "surrendered",
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum LifecycleOp {
    Pause,
    Resume,
    Restart,
    Surrender,
}

impl LifecycleOp {
    /// Operations that throw away a board ask first.
    fn prompt(self) -> Option<&'static str> {
        use LifecycleOp::*;
        match self {
            Restart => Some("Restart this game? The current board will be lost."),
            Surrender => Some("Surrender this game?"),
            Pause | Resume => None,
        }
    }

    /// Announcement when the server accepted the operation and the status
    /// entry message stayed quiet. Surrender speaks through its status.
    fn applied_message(self) -> Option<StatusMessage> {
        use LifecycleOp::*;
        match self {
            Pause => Some(StatusMessage::info("Game paused.")),
            Resume => Some(StatusMessage::info("Game resumed.")),
            Restart => Some(StatusMessage::info("Game restarted.")),
            Surrender => None,
        }
    }
}

pub(crate) enum Msg {
    Click(Coord2),
    Mark(Coord2),
    Tick,
    Lifecycle(LifecycleOp),
    ActionResolved {
        intent: IntentSeq,
        result: jiraigen_core::Result<GameSnapshot>,
    },
    LifecycleResolved {
        op: LifecycleOp,
        intent: IntentSeq,
        result: jiraigen_core::Result<GameSnapshot>,
    },
    Exit,
    ClearMessage,
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct GameProps {
    pub api: Api,
    pub identity: Identity,
    /// Snapshot the lobby navigated in with.
    pub seed: GameSnapshot,
    #[prop_or_default]
    pub room: Option<RoomSummary>,
    pub on_exit: Callback<()>,
}

/// The board screen. Holds the session state machine; every server response
/// funnels through `GameSession::apply` so ordering and staleness are
/// decided in one place.
pub(crate) struct GameView {
    session: Option<GameSession>,
    message: Option<StatusMessage>,
    _message_timeout: Option<Timeout>,
    _tick: Interval,
}

impl GameView {
    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(1_000, move || link.send_message(Msg::Tick))
    }

    fn show_message(&mut self, ctx: &Context<Self>, message: StatusMessage) {
        let link = ctx.link().clone();
        self._message_timeout = Some(Timeout::new(StatusMessage::TTL_MS, move || {
            link.send_message(Msg::ClearMessage)
        }));
        self.message = Some(message);
    }

    fn dispatch_action(&mut self, ctx: &Context<Self>, coords: Coord2, action: PlayerAction) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let intent = session.next_intent();
        let request = PlayerActionRequest {
            game_id: session.game_id().to_owned(),
            row: coords.0,
            col: coords.1,
            action,
            user_id: ctx.props().identity.user_id.clone(),
        };
        log::debug!("dispatching {action:?} at {coords:?} as intent {intent}");

        let api = ctx.props().api.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            let result = api.player_action(&request).await;
            link.send_message(Msg::ActionResolved { intent, result });
        });
    }

    fn dispatch_lifecycle(&mut self, ctx: &Context<Self>, op: LifecycleOp) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(prompt) = op.prompt() {
            if !confirm(prompt) {
                return;
            }
        }
        let intent = session.next_intent();
        let game_id = session.game_id().to_owned();
        log::debug!("dispatching {op:?} as intent {intent}");

        let api = ctx.props().api.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            let result = match op {
                LifecycleOp::Pause => api.pause_game(&game_id).await,
                LifecycleOp::Resume => api.resume_game(&game_id).await,
                LifecycleOp::Restart => api.restart_game(&game_id).await,
                LifecycleOp::Surrender => api.surrender_game(&game_id).await,
            };
            link.send_message(Msg::LifecycleResolved { op, intent, result });
        });
    }

    fn resolve(
        &mut self,
        ctx: &Context<Self>,
        intent: IntentSeq,
        result: jiraigen_core::Result<GameSnapshot>,
        op_message: Option<StatusMessage>,
    ) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        match result {
            Ok(snapshot) => match session.apply(intent, snapshot, utc_now()) {
                Ok(ApplyOutcome::Applied { message }) => {
                    if let Some(message) = message.or(op_message) {
                        self.show_message(ctx, message);
                    }
                    true
                }
                Ok(ApplyOutcome::Stale) => false,
                Err(err) => {
                    // the session is untouched; surface and keep playing
                    log::error!("dropping response for intent {intent}: {err}");
                    self.show_message(ctx, StatusMessage::error(err.to_string()));
                    true
                }
            },
            Err(err) => {
                self.show_message(ctx, StatusMessage::error(err.to_string()));
                true
            }
        }
    }

    fn view_broken(&self, ctx: &Context<Self>) -> Html {
        let cb_exit = ctx.link().callback(|_| Msg::Exit);
        html! {
            <section class="game broken">
                <p class={classes!("game-message", "error")}>
                    {"This game cannot be displayed."}
                </p>
                <button onclick={cb_exit}>{"Back to lobby"}</button>
            </section>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let session = match GameSession::start(ctx.props().seed.clone(), utc_now()) {
            Ok(session) => Some(session),
            Err(err) => {
                log::error!("refusing to render game: {err}");
                None
            }
        };
        Self {
            session,
            message: None,
            _message_timeout: None,
            _tick: Self::create_timer(ctx),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Click(coords) => {
                let Some(action) = self
                    .session
                    .as_ref()
                    .and_then(|session| session.click_intent(coords))
                else {
                    return false;
                };
                self.dispatch_action(ctx, coords, action);
                false
            }
            Mark(coords) => {
                let Some(action) = self
                    .session
                    .as_ref()
                    .and_then(|session| session.mark_intent(coords))
                else {
                    return false;
                };
                self.dispatch_action(ctx, coords, action);
                false
            }
            Tick => match self.session.as_mut() {
                Some(session) => session.tick(utc_now()),
                None => false,
            },
            Lifecycle(op) => {
                self.dispatch_lifecycle(ctx, op);
                false
            }
            ActionResolved { intent, result } => self.resolve(ctx, intent, result, None),
            LifecycleResolved { op, intent, result } => {
                self.resolve(ctx, intent, result, op.applied_message())
            }
            Exit => {
                ctx.props().on_exit.emit(());
                false
            }
            ClearMessage => self.message.take().is_some(),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let Some(session) = self.session.as_ref() else {
            return self.view_broken(ctx);
        };

        let board = session.board();
        let (rows, cols) = board.size();
        let interactive = session.is_interactive();
        let controls = session.controls();
        let status = session.status();

        let cb_pause = ctx.link().callback(|_| Lifecycle(LifecycleOp::Pause));
        let cb_resume = ctx.link().callback(|_| Lifecycle(LifecycleOp::Resume));
        let cb_restart = ctx.link().callback(|_| Lifecycle(LifecycleOp::Restart));
        let cb_surrender = ctx.link().callback(|_| Lifecycle(LifecycleOp::Surrender));
        let cb_exit = ctx.link().callback(|_| Exit);

        let room_line = ctx.props().room.as_ref().map(|room| {
            html! { <p class="game-room">{format!("room: {}", room.room_name)}</p> }
        });

        let players = session.snapshot().players.join(", ");
        let players_line = (!players.is_empty()).then(|| {
            html! { <p class="game-players">{format!("players: {players}")}</p> }
        });

        let message = self.message.as_ref().map(|message| {
            html! {
                <div class={classes!("game-message", message.kind.css_class())}>
                    {&message.text}
                </div>
            }
        });

        html! {
            <section class={classes!("game", status_class(status))}>
                <nav>
                    <aside class="counter">{counter_text(session.mines_left())}</aside>
                    <span class={classes!("status", status_class(status))}>
                        {status_text(status)}
                    </span>
                    <aside class="counter">{counter_text(session.elapsed_secs() as i32)}</aside>
                </nav>
                {room_line}
                {players_line}
                <table
                    class={classes!("board", (!interactive).then_some("locked"))}
                    oncontextmenu={Callback::from(|e: MouseEvent| e.prevent_default())}
                >
                    {
                        for (0..rows).map(|row| html! {
                            <tr>
                                {
                                    for (0..cols).map(|col| {
                                        let cell = board
                                            .cell_at((row, col))
                                            .unwrap_or(CellView::Hidden);
                                        html! {
                                            <BoardCell
                                                {row} {col} {cell}
                                                on_click={ctx.link().callback(Click)}
                                                on_mark={ctx.link().callback(Mark)}
                                            />
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                <footer class="game-controls">
                    if controls.pause {
                        <button onclick={cb_pause}>{"Pause"}</button>
                    }
                    if controls.resume {
                        <button onclick={cb_resume}>{"Resume"}</button>
                    }
                    <button onclick={cb_restart}>{"Restart"}</button>
                    <button onclick={cb_surrender}>{"Surrender"}</button>
                    <button onclick={cb_exit}>{"Back to lobby"}</button>
                </footer>
                {message}
            </section>
        }
    }
}

#[derive(Properties, Clone, PartialEq)]
struct BoardCellProps {
    row: Coord,
    col: Coord,
    cell: CellView,
    on_click: Callback<Coord2>,
    on_mark: Callback<Coord2>,
}

#[function_component(BoardCell)]
fn board_cell(props: &BoardCellProps) -> Html {
    use CellView::*;

    let BoardCellProps {
        row,
        col,
        cell,
        on_click,
        on_mark,
    } = props.clone();

    let class = classes!(
        "cell",
        match cell {
            Hidden => classes!(),
            Flagged => classes!("flagged"),
            Mine => classes!("mine"),
            Revealed(count) => classes!("revealed", format!("number-{}", count)),
        }
    );

    let glyph = match cell {
        Hidden | Revealed(0) => String::new(),
        Flagged => "🚩".to_owned(),
        Mine => "💣".to_owned(),
        Revealed(count) => count.to_string(),
    };

    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("({row}, {col}) clicked");
        on_click.emit((row, col));
    });
    // right button only; the table-level handler suppresses the context menu
    let onauxclick = Callback::from(move |e: MouseEvent| {
        if e.button() == 2 {
            log::trace!("({row}, {col}) marked");
            on_mark.emit((row, col));
        }
    });

    html! {
        <td {class} {onclick} {onauxclick}>{glyph}</td>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_clamps_to_three_digits() {
        assert_eq!(counter_text(0), "000");
        assert_eq!(counter_text(7), "007");
        assert_eq!(counter_text(42), "042");
        assert_eq!(counter_text(999), "999");
        assert_eq!(counter_text(1_234), "999");
        assert_eq!(counter_text(-5), "-05");
        assert_eq!(counter_text(-99), "-99");
        assert_eq!(counter_text(-1_000), "-99");
    }

    #[test]
    fn every_status_has_text_and_class() {
        use GameStatus::*;
        for status in [Playing, Won, Lost, Paused, Surrendered] {
            assert!(!status_text(status).is_empty());
            assert!(!status_class(status).contains(' '));
        }
    }

    #[test]
    fn only_destructive_ops_prompt() {
        use LifecycleOp::*;
        assert!(Pause.prompt().is_none());
        assert!(Resume.prompt().is_none());
        assert!(Restart.prompt().is_some());
        assert!(Surrender.prompt().is_some());
        assert!(Surrender.applied_message().is_none(), "status entry speaks");
    }
}
