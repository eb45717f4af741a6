use crate::utils::{LocalOrDefault, LocalSave, StorageKey};
use jiraigen_core::{ClientError, Identity, ProtocolError, Result};
use jiraigen_protocol::{
    CreateGameRequest, CreateRoomRequest, Envelope, GameSnapshot, LoginRequest, LoginResponse,
    PlayerActionRequest, RegisterRequest, RoomSummary, UserInfo,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

/// Credentials of the signed-in user, persisted so a reload can restore
/// the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct StoredAuth {
    pub token: String,
    pub identity: Identity,
}

impl StorageKey for StoredAuth {
    const KEY: &'static str = "jiraigen:auth:v1";
}

impl StoredAuth {
    pub(crate) fn load() -> Option<Self> {
        LocalOrDefault::local_or_default()
    }

    pub(crate) fn save(auth: StoredAuth) {
        Some(auth).local_save();
    }

    pub(crate) fn clear() {
        None::<StoredAuth>.local_save();
    }
}

#[derive(Copy, Clone, Debug)]
enum Method {
    Get,
    Post,
}

impl Method {
    const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Typed fetch client for the game service. Cheap to clone and compare, so
/// it rides along as a component prop.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Api {
    base: Rc<String>,
}

impl Api {
    pub(crate) fn new(base: impl Into<String>) -> Self {
        Self {
            base: Rc::new(base.into()),
        }
    }

    async fn response_for(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base, path);

        let init = RequestInit::new();
        init.set_method(method.as_str());
        if let Some(body) = &body {
            init.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&url, &init).map_err(as_transport)?;
        let headers = request.headers();
        headers
            .set("Content-Type", "application/json")
            .map_err(as_transport)?;
        if let Some(auth) = StoredAuth::load() {
            headers
                .set("Authorization", &format!("Bearer {}", auth.token))
                .map_err(as_transport)?;
        }

        log::trace!("{} {}", method.as_str(), url);
        let response = JsFuture::from(gloo::utils::window().fetch_with_request(&request))
            .await
            .map_err(as_transport)?;
        response.dyn_into::<Response>().map_err(as_transport)
    }

    async fn body_text(response: &Response) -> Result<String> {
        let text = JsFuture::from(response.text().map_err(as_transport)?)
            .await
            .map_err(as_transport)?;
        Ok(text.as_string().unwrap_or_default())
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<T> {
        let response = self.response_for(method, path, body).await?;
        let text = Self::body_text(&response).await?;

        if !response.ok() {
            return Err(ClientError::Business(error_message(
                &text,
                response.status(),
            )));
        }

        let envelope: Envelope<T> =
            serde_json::from_str(&text).map_err(|err| ProtocolError::Malformed(err.to_string()))?;
        envelope
            .data
            .ok_or_else(|| ProtocolError::Malformed("response has no data".into()).into())
    }

    /// For endpoints whose payload does not matter.
    async fn request_ignore_data(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<()> {
        let response = self.response_for(method, path, body).await?;
        if !response.ok() {
            let text = Self::body_text(&response).await?;
            return Err(ClientError::Business(error_message(
                &text,
                response.status(),
            )));
        }
        Ok(())
    }

    // users

    pub(crate) async fn register(&self, request: &RegisterRequest) -> Result<()> {
        self.request_ignore_data(Method::Post, "/user/register", Some(to_body(request)?))
            .await
    }

    pub(crate) async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        self.request(Method::Post, "/user/login", Some(to_body(request)?))
            .await
    }

    /// Best effort: a failed logout is logged and swallowed, and the stored
    /// credentials are cleared no matter what the server said.
    pub(crate) async fn logout(&self) {
        if let Err(err) = self
            .request_ignore_data(Method::Post, "/user/logout", None)
            .await
        {
            log::warn!("logout request failed, clearing local session anyway: {err}");
        }
        StoredAuth::clear();
    }

    pub(crate) async fn user_info(&self) -> Result<UserInfo> {
        self.request(Method::Get, "/user/info", None).await
    }

    // games

    pub(crate) async fn create_game(&self, request: &CreateGameRequest) -> Result<GameSnapshot> {
        self.request(Method::Post, "/game/create", Some(to_body(request)?))
            .await
    }

    pub(crate) async fn game(&self, game_id: &str) -> Result<GameSnapshot> {
        self.request(Method::Get, &format!("/game/{game_id}"), None)
            .await
    }

    pub(crate) async fn player_action(
        &self,
        request: &PlayerActionRequest,
    ) -> Result<GameSnapshot> {
        self.request(Method::Post, "/game/action", Some(to_body(request)?))
            .await
    }

    pub(crate) async fn pause_game(&self, game_id: &str) -> Result<GameSnapshot> {
        self.request(Method::Post, &format!("/game/{game_id}/pause"), None)
            .await
    }

    pub(crate) async fn resume_game(&self, game_id: &str) -> Result<GameSnapshot> {
        self.request(Method::Post, &format!("/game/{game_id}/resume"), None)
            .await
    }

    pub(crate) async fn restart_game(&self, game_id: &str) -> Result<GameSnapshot> {
        self.request(Method::Post, &format!("/game/{game_id}/restart"), None)
            .await
    }

    pub(crate) async fn surrender_game(&self, game_id: &str) -> Result<GameSnapshot> {
        self.request(Method::Post, &format!("/game/{game_id}/surrender"), None)
            .await
    }

    // rooms

    pub(crate) async fn rooms(&self) -> Result<Vec<RoomSummary>> {
        self.request(Method::Get, "/rooms", None).await
    }

    pub(crate) async fn room(&self, room_id: &str) -> Result<RoomSummary> {
        self.request(Method::Get, &format!("/rooms/{room_id}"), None)
            .await
    }

    pub(crate) async fn create_room(&self, request: &CreateRoomRequest) -> Result<RoomSummary> {
        self.request(Method::Post, "/rooms", Some(to_body(request)?))
            .await
    }

    pub(crate) async fn join_room(&self, room_id: &str) -> Result<RoomSummary> {
        self.request(Method::Post, &format!("/rooms/{room_id}/join"), None)
            .await
    }

    pub(crate) async fn create_room_game(
        &self,
        room_id: &str,
        request: &CreateGameRequest,
    ) -> Result<GameSnapshot> {
        self.request(
            Method::Post,
            &format!("/rooms/{room_id}/create-game"),
            Some(to_body(request)?),
        )
        .await
    }
}

fn as_transport(err: JsValue) -> ClientError {
    ClientError::Transport(format!("{err:?}"))
}

/// Error responses still carry the envelope; its message is what the user
/// should see. Fall back to the bare status when the body is not ours.
fn error_message(body: &str, status: u16) -> String {
    serde_json::from_str::<Envelope<serde_json::Value>>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or_else(|| format!("request failed with status {status}"))
}

fn to_body<T: Serialize>(request: &T) -> Result<String> {
    serde_json::to_string(request).map_err(|err| ProtocolError::Malformed(err.to_string()).into())
}
