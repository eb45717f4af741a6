//! Serde model of the minesweeper service's HTTP JSON contract.
//!
//! The server wraps every payload in [`Envelope`] and is authoritative for
//! all game state; these types only describe what goes over the wire.
//! Decoding is tolerant: fields the server may omit are `Option` or
//! defaulted, and unknown fields are ignored everywhere.

use serde::{Deserialize, Serialize};

pub use game::*;
pub use room::*;
pub use user::*;

mod game;
mod room;
mod user;

/// Standard response wrapper: `{ "code": 200, "message": "ok", "data": ... }`.
///
/// Some endpoints return no `data` (logout, for one), and error responses
/// may carry only `message`, so every field is an `Option` and an absent
/// field decodes as `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: Option<i32>,
    pub message: Option<String>,
    pub data: Option<T>,
    pub timestamp: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_decodes_with_all_fields() {
        let json = r#"{"code":200,"message":"ok","data":42,"timestamp":1712345678901}"#;
        let envelope: Envelope<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.code, Some(200));
        assert_eq!(envelope.message.as_deref(), Some("ok"));
        assert_eq!(envelope.data, Some(42));
    }

    #[test]
    fn envelope_tolerates_missing_and_null_fields() {
        let envelope: Envelope<u32> = serde_json::from_str(r#"{"message":"boom"}"#).unwrap();
        assert_eq!(envelope.data, None);
        assert_eq!(envelope.message.as_deref(), Some("boom"));

        let envelope: Envelope<u32> = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert_eq!(envelope.data, None);
    }

    #[test]
    fn envelope_payloads_need_no_default_impl() {
        // GameSnapshot implements no Default; sparse envelopes must still
        // decode around it
        let envelope: Envelope<GameSnapshot> =
            serde_json::from_str(r#"{"code":404,"message":"no such game"}"#).unwrap();
        assert_eq!(envelope.data, None);
        assert_eq!(envelope.message.as_deref(), Some("no such game"));
    }
}
