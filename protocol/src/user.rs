use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    pub username: String,
    /// Token lifetime in seconds.
    pub expires_in: Option<u64>,
    /// Always `"Bearer"` in practice.
    pub token_type: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub user_id: String,
    pub username: String,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_decodes_bearer_token() {
        let json = r#"{
            "token": "jwt-abc",
            "userId": "u-1",
            "username": "alice",
            "expiresIn": 86400,
            "tokenType": "Bearer"
        }"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.token, "jwt-abc");
        assert_eq!(response.user_id, "u-1");
        assert_eq!(response.token_type.as_deref(), Some("Bearer"));
    }

    #[test]
    fn user_info_tolerates_extra_fields() {
        let json = r#"{"userId":"u-1","username":"alice","email":null,"roles":["PLAYER"]}"#;
        let info: UserInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.username, "alice");
        assert_eq!(info.email, None);
    }
}
