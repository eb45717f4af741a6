use crate::api::{Api, StoredAuth};
use crate::auth::AuthView;
use crate::game::GameView;
use crate::lobby::LobbyView;
use jiraigen_core::{ActiveView, Identity, Session};
use jiraigen_protocol::{GameSnapshot, LoginResponse, RoomSummary};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct AppProps {
    pub api: Api,
}

pub(crate) enum Msg {
    SessionRestored(Option<Identity>),
    LoggedIn(LoginResponse),
    LogoutRequested,
    LoggedOut,
    GameEntered {
        snapshot: GameSnapshot,
        room: Option<RoomSummary>,
    },
    GameLeft,
}

/// Root shell. Owns the navigation state and renders exactly one of the
/// three screens; switching screens drops the old component and with it
/// every timer and in-flight callback it owned.
pub(crate) struct App {
    session: Session,
}

impl Component for App {
    type Message = Msg;
    type Properties = AppProps;

    fn create(ctx: &Context<Self>) -> Self {
        if let Some(auth) = StoredAuth::load() {
            log::debug!("validating stored session for {}", auth.identity.username);
            let api = ctx.props().api.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                let restored = match api.user_info().await {
                    Ok(info) => Some(Identity {
                        user_id: info.user_id,
                        username: info.username,
                    }),
                    Err(err) => {
                        log::debug!("stored token rejected: {err}");
                        None
                    }
                };
                link.send_message(Msg::SessionRestored(restored));
            });
        }

        Self {
            session: Session::signed_out(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            SessionRestored(Some(identity)) => {
                self.session.log_in(identity);
                true
            }
            SessionRestored(None) => {
                StoredAuth::clear();
                false
            }
            LoggedIn(response) => {
                let identity = Identity {
                    user_id: response.user_id.clone(),
                    username: response.username.clone(),
                };
                StoredAuth::save(StoredAuth {
                    token: response.token,
                    identity: identity.clone(),
                });
                self.session.log_in(identity);
                true
            }
            LogoutRequested => {
                let api = ctx.props().api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    api.logout().await;
                    link.send_message(LoggedOut);
                });
                false
            }
            LoggedOut => {
                self.session.log_out();
                true
            }
            GameEntered { snapshot, room } => {
                self.session.enter_game(snapshot, room);
                true
            }
            GameLeft => {
                self.session.leave_game();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let api = ctx.props().api.clone();

        let header = self.session.identity().map(|identity| {
            let cb_logout = ctx.link().callback(|_| LogoutRequested);
            html! {
                <header class="top-bar">
                    <h1>{"jiraigen"}</h1>
                    <span class="whoami">{&identity.username}</span>
                    <button class="logout" onclick={cb_logout}>{"Log out"}</button>
                </header>
            }
        });

        let screen = match (self.session.view(), self.session.identity()) {
            (ActiveView::Auth, _) | (_, None) => html! {
                <AuthView api={api} on_login={ctx.link().callback(LoggedIn)}/>
            },
            (ActiveView::Lobby, Some(identity)) => html! {
                <LobbyView
                    api={api}
                    identity={identity.clone()}
                    on_enter_game={ctx.link().callback(|(snapshot, room)| GameEntered { snapshot, room })}
                />
            },
            (ActiveView::Game, Some(identity)) => match self.session.current_game() {
                Some(seed) => html! {
                    <GameView
                        api={api}
                        identity={identity.clone()}
                        seed={seed.clone()}
                        room={self.session.current_room().cloned()}
                        on_exit={ctx.link().callback(|_| GameLeft)}
                    />
                },
                None => Html::default(),
            },
        };

        html! {
            <div class="jiraigen">
                {header}
                {screen}
            </div>
        }
    }
}
