use crate::api::Api;
use crate::utils::{input_value, parse_input, select_value};
use gloo::timers::callback::{Interval, Timeout};
use jiraigen_core::{BoardView, Identity, JoinOutcome, LOBBY_REFRESH_MS, RoomLobby, StatusMessage};
use jiraigen_protocol::{
    CreateGameRequest, CreateRoomRequest, Difficulty, GameSnapshot, RoomStatus, RoomSummary,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum DialogKind {
    SoloGame,
    RoomWithGame,
}

pub(crate) enum Msg {
    Refresh,
    RoomsLoaded(jiraigen_core::Result<Vec<RoomSummary>>),
    Join(String),
    JoinResolved(jiraigen_core::Result<RoomSummary>),
    EnterRunning(String),
    RunningRoomFetched(jiraigen_core::Result<RoomSummary>),
    OpenDialog(DialogKind),
    CloseDialog,
    SyncDifficulty,
    SubmitDialog,
    EnterResolved(jiraigen_core::Result<(GameSnapshot, Option<RoomSummary>)>),
    ClearMessage,
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct LobbyProps {
    pub api: Api,
    pub identity: Identity,
    pub on_enter_game: Callback<(GameSnapshot, Option<RoomSummary>)>,
}

/// Room listing plus the new-game and new-room dialogs. The listing refreshes
/// on a fixed interval and is replaced wholesale on every response.
pub(crate) struct LobbyView {
    lobby: RoomLobby,
    open_dialog: Option<DialogKind>,
    custom_board: bool,
    message: Option<StatusMessage>,
    _message_timeout: Option<Timeout>,
    _refresh: Interval,
    room_name_ref: NodeRef,
    max_players_ref: NodeRef,
    difficulty_ref: NodeRef,
    width_ref: NodeRef,
    height_ref: NodeRef,
    mines_ref: NodeRef,
}

impl LobbyView {
    fn create_refresh(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(LOBBY_REFRESH_MS, move || link.send_message(Msg::Refresh))
    }

    fn show_message(&mut self, ctx: &Context<Self>, message: StatusMessage) {
        let link = ctx.link().clone();
        self._message_timeout = Some(Timeout::new(StatusMessage::TTL_MS, move || {
            link.send_message(Msg::ClearMessage)
        }));
        self.message = Some(message);
    }

    fn fetch_rooms(&self, ctx: &Context<Self>) {
        let api = ctx.props().api.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::RoomsLoaded(api.rooms().await));
        });
    }

    fn enter_game(&self, ctx: &Context<Self>, game_id: String, room: Option<RoomSummary>) {
        let api = ctx.props().api.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            let result = api.game(&game_id).await.map(|snapshot| (snapshot, room));
            link.send_message(Msg::EnterResolved(result));
        });
    }

    fn game_config_from_form(&self, ctx: &Context<Self>) -> Option<CreateGameRequest> {
        let user_id = ctx.props().identity.user_id.clone();
        let difficulty = match select_value(&self.difficulty_ref).as_str() {
            "MEDIUM" => Difficulty::Medium,
            "HARD" => Difficulty::Hard,
            "CUSTOM" => Difficulty::Custom,
            _ => Difficulty::Easy,
        };
        if let Some(request) = CreateGameRequest::from_difficulty(difficulty, user_id.clone()) {
            return Some(request);
        }
        Some(CreateGameRequest {
            width: parse_input(&self.width_ref)?,
            height: parse_input(&self.height_ref)?,
            mine_count: parse_input(&self.mines_ref)?,
            difficulty,
            user_id,
            room_id: None,
        })
    }

    fn submit_dialog(&mut self, ctx: &Context<Self>) {
        let Some(kind) = self.open_dialog else {
            return;
        };
        let Some(config) = self.game_config_from_form(ctx) else {
            self.show_message(ctx, StatusMessage::error("Enter a valid custom board."));
            return;
        };

        let api = ctx.props().api.clone();
        let link = ctx.link().clone();
        match kind {
            DialogKind::SoloGame => {
                log::debug!("creating game: {config:?}");
                spawn_local(async move {
                    let result = api
                        .create_game(&config)
                        .await
                        .map(|snapshot| (snapshot, None));
                    link.send_message(Msg::EnterResolved(result));
                });
            }
            DialogKind::RoomWithGame => {
                let typed = input_value(&self.room_name_ref);
                let room_name = if typed.trim().is_empty() {
                    format!("{}'s room", ctx.props().identity.username)
                } else {
                    typed
                };
                let request = CreateRoomRequest {
                    room_name,
                    max_players: parse_input(&self.max_players_ref).unwrap_or(2),
                    host_id: ctx.props().identity.user_id.clone(),
                };
                log::debug!("creating room: {request:?}");
                spawn_local(async move {
                    // Two calls. If the second fails the room still exists
                    // and the next refresh will list it.
                    let result = match api.create_room(&request).await {
                        Ok(room) => {
                            let config = CreateGameRequest {
                                room_id: Some(room.room_id.clone()),
                                ..config
                            };
                            api.create_room_game(&room.room_id, &config)
                                .await
                                .map(|snapshot| (snapshot, Some(room)))
                        }
                        Err(err) => Err(err),
                    };
                    link.send_message(Msg::EnterResolved(result));
                });
            }
        }
    }

    fn view_dialog(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let Some(kind) = self.open_dialog else {
            return Html::default();
        };

        let cb_close = ctx.link().callback(|_| CloseDialog);
        let cb_submit = ctx.link().callback(|_| SubmitDialog);
        let cb_difficulty = ctx.link().callback(|_: Event| SyncDifficulty);

        let (title, submit_label) = match kind {
            DialogKind::SoloGame => ("New game", "Start"),
            DialogKind::RoomWithGame => ("New room", "Create"),
        };

        html! {
            <dialog class="lobby-dialog" open={true}>
                <h2>{title}</h2>
                if kind == DialogKind::RoomWithGame {
                    <label>
                        {"Room name"}
                        <input ref={self.room_name_ref.clone()} placeholder="room name"/>
                    </label>
                    <label>
                        {"Max players"}
                        <input
                            ref={self.max_players_ref.clone()}
                            type="number" value="2" min="2" max="8"
                        />
                    </label>
                }
                <label>
                    {"Difficulty"}
                    <select ref={self.difficulty_ref.clone()} onchange={cb_difficulty}>
                        <option value="EASY" selected={true}>{"Easy (9x9, 10 mines)"}</option>
                        <option value="MEDIUM">{"Medium (16x16, 40 mines)"}</option>
                        <option value="HARD">{"Hard (30x16, 99 mines)"}</option>
                        <option value="CUSTOM">{"Custom"}</option>
                    </select>
                </label>
                if self.custom_board {
                    <label>
                        {"Width"}
                        <input ref={self.width_ref.clone()} type="number" value="9" min="1"/>
                    </label>
                    <label>
                        {"Height"}
                        <input ref={self.height_ref.clone()} type="number" value="9" min="1"/>
                    </label>
                    <label>
                        {"Mines"}
                        <input ref={self.mines_ref.clone()} type="number" value="10" min="1"/>
                    </label>
                }
                <footer>
                    <button onclick={cb_close}>{"Cancel"}</button>
                    <button class="submit" onclick={cb_submit}>{submit_label}</button>
                </footer>
            </dialog>
        }
    }
}

impl Component for LobbyView {
    type Message = Msg;
    type Properties = LobbyProps;

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_message(Msg::Refresh);
        Self {
            lobby: RoomLobby::new(ctx.props().identity.user_id.clone()),
            open_dialog: None,
            custom_board: false,
            message: None,
            _message_timeout: None,
            _refresh: Self::create_refresh(ctx),
            room_name_ref: NodeRef::default(),
            max_players_ref: NodeRef::default(),
            difficulty_ref: NodeRef::default(),
            width_ref: NodeRef::default(),
            height_ref: NodeRef::default(),
            mines_ref: NodeRef::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Refresh => {
                self.fetch_rooms(ctx);
                false
            }
            RoomsLoaded(Ok(rooms)) => self.lobby.replace(rooms),
            RoomsLoaded(Err(err)) => {
                // keep the stale listing on screen
                log::warn!("room refresh failed: {err}");
                self.show_message(
                    ctx,
                    StatusMessage::error(format!("Could not refresh rooms: {err}")),
                );
                true
            }
            Join(room_id) => {
                log::debug!("joining room {room_id}");
                let api = ctx.props().api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::JoinResolved(api.join_room(&room_id).await));
                });
                false
            }
            JoinResolved(Ok(room)) => match JoinOutcome::from(room) {
                JoinOutcome::EnterGame { game_id, room } => {
                    // the host started the game while our join was in flight
                    self.enter_game(ctx, game_id, Some(room));
                    false
                }
                JoinOutcome::Waiting { room } => {
                    self.show_message(
                        ctx,
                        StatusMessage::info(format!(
                            "Joined {}. Waiting for the host to start.",
                            room.room_name
                        )),
                    );
                    ctx.link().send_message(Refresh);
                    true
                }
            },
            JoinResolved(Err(err)) => {
                self.show_message(ctx, StatusMessage::error(format!("Could not join: {err}")));
                ctx.link().send_message(Refresh);
                true
            }
            EnterRunning(room_id) => {
                // re-fetch the room so we route on a current game id, not a
                // listing that may be a poll interval old
                let api = ctx.props().api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::RunningRoomFetched(api.room(&room_id).await));
                });
                false
            }
            RunningRoomFetched(Ok(room)) => match room.current_game_id.clone() {
                Some(game_id) => {
                    self.enter_game(ctx, game_id, Some(room));
                    false
                }
                None => {
                    self.show_message(
                        ctx,
                        StatusMessage::info("That game has already wrapped up."),
                    );
                    ctx.link().send_message(Refresh);
                    true
                }
            },
            RunningRoomFetched(Err(err)) => {
                self.show_message(
                    ctx,
                    StatusMessage::error(format!("Could not open room: {err}")),
                );
                true
            }
            OpenDialog(kind) => {
                self.open_dialog = Some(kind);
                self.custom_board = false;
                true
            }
            CloseDialog => self.open_dialog.take().is_some(),
            SyncDifficulty => {
                let custom = select_value(&self.difficulty_ref) == "CUSTOM";
                if self.custom_board == custom {
                    false
                } else {
                    self.custom_board = custom;
                    true
                }
            }
            SubmitDialog => {
                self.submit_dialog(ctx);
                true
            }
            EnterResolved(Ok((snapshot, room))) => {
                // refuse to navigate into a board we cannot render
                if let Err(err) = BoardView::from_snapshot(&snapshot) {
                    log::error!("rejecting game {}: {err}", snapshot.game_id);
                    self.show_message(ctx, StatusMessage::error(err.to_string()));
                } else {
                    self.open_dialog = None;
                    ctx.props().on_enter_game.emit((snapshot, room));
                }
                true
            }
            EnterResolved(Err(err)) => {
                self.show_message(ctx, StatusMessage::error(format!("Could not start: {err}")));
                ctx.link().send_message(Refresh);
                true
            }
            ClearMessage => self.message.take().is_some(),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let cb_new_game = ctx.link().callback(|_| OpenDialog(DialogKind::SoloGame));
        let cb_new_room = ctx.link().callback(|_| OpenDialog(DialogKind::RoomWithGame));
        let cb_refresh = ctx.link().callback(|_| Refresh);

        let message = self.message.as_ref().map(|message| {
            html! {
                <div class={classes!("lobby-message", message.kind.css_class())}>
                    {&message.text}
                </div>
            }
        });

        let rooms = self
            .lobby
            .rooms()
            .iter()
            .map(|room| {
                html! {
                    <RoomCard
                        key={room.room_id.clone()}
                        room={room.clone()}
                        joinable={self.lobby.can_join(room)}
                        enterable={self.lobby.running_game_id(room).is_some()}
                        on_join={ctx.link().callback(Join)}
                        on_enter={ctx.link().callback(EnterRunning)}
                    />
                }
            })
            .collect::<Html>();

        let listing = if self.lobby.is_empty() {
            html! { <p class="lobby-empty">{"No rooms right now. Start one!"}</p> }
        } else {
            html! { <ul class="room-list">{rooms}</ul> }
        };

        html! {
            <section class="lobby">
                <nav class="lobby-actions">
                    <button onclick={cb_new_game}>{"New game"}</button>
                    <button onclick={cb_new_room}>{"New room"}</button>
                    <button onclick={cb_refresh}>{"Refresh"}</button>
                </nav>
                {message}
                {listing}
                {self.view_dialog(ctx)}
            </section>
        }
    }
}

#[derive(Properties, Clone, PartialEq)]
struct RoomCardProps {
    room: RoomSummary,
    joinable: bool,
    enterable: bool,
    on_join: Callback<String>,
    on_enter: Callback<String>,
}

#[function_component(RoomCard)]
fn room_card(props: &RoomCardProps) -> Html {
    let RoomCardProps {
        room,
        joinable,
        enterable,
        on_join,
        on_enter,
    } = props.clone();

    let status = match room.status {
        RoomStatus::Waiting => "waiting",
        RoomStatus::Playing => "playing",
    };

    let onclick_join = {
        let room_id = room.room_id.clone();
        Callback::from(move |_: MouseEvent| on_join.emit(room_id.clone()))
    };
    let onclick_enter = {
        let room_id = room.room_id.clone();
        Callback::from(move |_: MouseEvent| on_enter.emit(room_id.clone()))
    };

    html! {
        <li class={classes!("room-card", status)}>
            <h3>{&room.room_name}</h3>
            <p class="room-host">{format!("hosted by {}", room.host_username)}</p>
            <p class="room-seats">
                {format!("{}/{} players", room.current_player_count, room.max_players)}
            </p>
            <p class="room-roster">{room.player_usernames.join(", ")}</p>
            if joinable {
                <button onclick={onclick_join}>{"Join"}</button>
            }
            if enterable {
                <button onclick={onclick_enter}>{"Enter game"}</button>
            }
        </li>
    }
}
