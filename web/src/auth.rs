use crate::api::Api;
use crate::utils::input_value;
use gloo::timers::callback::Timeout;
use jiraigen_core::StatusMessage;
use jiraigen_protocol::{LoginRequest, LoginResponse, RegisterRequest};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum AuthTab {
    Login,
    Register,
}

pub(crate) enum Msg {
    SwitchTab(AuthTab),
    Submit,
    LoginResolved(jiraigen_core::Result<LoginResponse>),
    RegisterResolved(jiraigen_core::Result<()>),
    ClearMessage,
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct AuthProps {
    pub api: Api,
    pub on_login: Callback<LoginResponse>,
}

/// Sign-in and registration forms. Registration never logs in by itself;
/// it flips back to the sign-in tab on success.
pub(crate) struct AuthView {
    tab: AuthTab,
    message: Option<StatusMessage>,
    _message_timeout: Option<Timeout>,
    username_ref: NodeRef,
    password_ref: NodeRef,
    email_ref: NodeRef,
}

impl AuthView {
    fn show_message(&mut self, ctx: &Context<Self>, message: StatusMessage) {
        let link = ctx.link().clone();
        self._message_timeout = Some(Timeout::new(StatusMessage::TTL_MS, move || {
            link.send_message(Msg::ClearMessage)
        }));
        self.message = Some(message);
    }

    fn submit(&mut self, ctx: &Context<Self>) {
        let username = input_value(&self.username_ref);
        let password = input_value(&self.password_ref);
        if username.trim().is_empty() || password.is_empty() {
            self.show_message(ctx, StatusMessage::error("Enter a username and a password."));
            return;
        }

        let api = ctx.props().api.clone();
        let link = ctx.link().clone();
        match self.tab {
            AuthTab::Login => {
                log::debug!("signing in as {username}");
                let request = LoginRequest { username, password };
                spawn_local(async move {
                    link.send_message(Msg::LoginResolved(api.login(&request).await));
                });
            }
            AuthTab::Register => {
                let email = input_value(&self.email_ref);
                if email.trim().is_empty() {
                    self.show_message(ctx, StatusMessage::error("Enter an email address."));
                    return;
                }
                log::debug!("registering {username}");
                let request = RegisterRequest {
                    username,
                    password,
                    email,
                };
                spawn_local(async move {
                    link.send_message(Msg::RegisterResolved(api.register(&request).await));
                });
            }
        }
    }
}

impl Component for AuthView {
    type Message = Msg;
    type Properties = AuthProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            tab: AuthTab::Login,
            message: None,
            _message_timeout: None,
            username_ref: NodeRef::default(),
            password_ref: NodeRef::default(),
            email_ref: NodeRef::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            SwitchTab(tab) => {
                if self.tab == tab {
                    return false;
                }
                self.tab = tab;
                true
            }
            Submit => {
                self.submit(ctx);
                true
            }
            LoginResolved(Ok(response)) => {
                ctx.props().on_login.emit(response);
                false
            }
            LoginResolved(Err(err)) => {
                self.show_message(ctx, StatusMessage::error(format!("Sign-in failed: {err}")));
                true
            }
            RegisterResolved(Ok(())) => {
                self.tab = AuthTab::Login;
                self.show_message(
                    ctx,
                    StatusMessage::success("Registered. You can sign in now."),
                );
                true
            }
            RegisterResolved(Err(err)) => {
                self.show_message(
                    ctx,
                    StatusMessage::error(format!("Registration failed: {err}")),
                );
                true
            }
            ClearMessage => self.message.take().is_some(),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let is_register = self.tab == AuthTab::Register;
        let cb_login_tab = ctx.link().callback(|_| SwitchTab(AuthTab::Login));
        let cb_register_tab = ctx.link().callback(|_| SwitchTab(AuthTab::Register));
        let cb_submit = ctx.link().callback(|_| Submit);
        let onkeydown = ctx
            .link()
            .batch_callback(|e: KeyboardEvent| (e.key() == "Enter").then_some(Submit));

        let message = self.message.as_ref().map(|message| {
            html! {
                <div class={classes!("auth-message", message.kind.css_class())}>
                    {&message.text}
                </div>
            }
        });

        html! {
            <section class="auth">
                <nav class="tabs">
                    <button
                        class={classes!("tab", (!is_register).then_some("active"))}
                        onclick={cb_login_tab}
                    >
                        {"Sign in"}
                    </button>
                    <button
                        class={classes!("tab", is_register.then_some("active"))}
                        onclick={cb_register_tab}
                    >
                        {"Register"}
                    </button>
                </nav>
                <div class="fields">
                    <input
                        ref={self.username_ref.clone()}
                        placeholder="username"
                        onkeydown={onkeydown.clone()}
                    />
                    <input
                        ref={self.password_ref.clone()}
                        type="password"
                        placeholder="password"
                        onkeydown={onkeydown.clone()}
                    />
                    if is_register {
                        <input
                            ref={self.email_ref.clone()}
                            type="email"
                            placeholder="email"
                            {onkeydown}
                        />
                    }
                </div>
                {message}
                <button class="submit" onclick={cb_submit}>
                    { if is_register { "Create account" } else { "Sign in" } }
                </button>
            </section>
        }
    }
}
