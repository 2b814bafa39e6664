//! Backend wire types and HTTP transport
//!
//! One user turn is one JSON POST raced against a fixed timeout: whichever
//! of "server responds" or "timeout elapses" wins. No retry, no backoff; a
//! lost race surfaces as a failed turn.

use crate::{ParleyError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Request body for one user turn
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TurnRequest {
    /// Wire value of the selected role, empty until one is chosen
    pub role: String,
    /// The user's text, possibly empty when only an image is sent
    pub user_text: String,
    /// Text extracted from an attached image, empty when absent
    pub image_text: String,
    /// Id of the chat this turn belongs to
    pub chat_id: String,
}

/// Reply body for one user turn
///
/// The backend echoes a chat id whose type has varied between deployments;
/// it is carried untyped and only logged, never used to rebind the active
/// chat.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TurnReply {
    pub chat_id: serde_json::Value,
    pub message: String,
}

/// Transport capable of completing one turn round trip
pub trait ChatTransport: Send {
    fn send_turn(&self, request: &TurnRequest) -> Result<TurnReply>;
}

/// HTTP transport: a reqwest POST raced against the configured timeout
pub struct HttpTransport {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ParleyError::BackendError(format!("Failed to build runtime: {}", e)))?;

        Ok(Self {
            client: reqwest::Client::new(),
            runtime,
            url: url.into(),
            timeout,
        })
    }
}

impl ChatTransport for HttpTransport {
    fn send_turn(&self, request: &TurnRequest) -> Result<TurnReply> {
        debug!("POST {} (chat {})", self.url, request.chat_id);

        self.runtime.block_on(async {
            let round_trip = async {
                self.client
                    .post(&self.url)
                    .json(request)
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<TurnReply>()
                    .await
            };

            match tokio::time::timeout(self.timeout, round_trip).await {
                Ok(Ok(reply)) => Ok(reply),
                Ok(Err(e)) => Err(ParleyError::BackendError(e.to_string())),
                Err(_) => Err(ParleyError::BackendTimeout),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_field_names() {
        let request = TurnRequest {
            role: "commander".to_string(),
            user_text: "hello".to_string(),
            image_text: String::new(),
            chat_id: "abc".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["role"], "commander");
        assert_eq!(json["user_text"], "hello");
        assert_eq!(json["image_text"], "");
        assert_eq!(json["chat_id"], "abc");
    }

    #[test]
    fn test_reply_accepts_string_chat_id() {
        let reply: TurnReply =
            serde_json::from_str(r#"{"chat_id":"abc","message":"hi there"}"#).unwrap();
        assert_eq!(reply.message, "hi there");
    }

    #[test]
    fn test_reply_accepts_numeric_chat_id() {
        let reply: TurnReply =
            serde_json::from_str(r#"{"chat_id":1,"message":"fallback"}"#).unwrap();
        assert_eq!(reply.message, "fallback");
    }

    #[test]
    fn test_transport_times_out_against_unresponsive_server() {
        use std::net::TcpListener;

        // A bound listener that never accepts keeps the request pending
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/chat", listener.local_addr().unwrap());

        let transport = HttpTransport::new(url, Duration::from_millis(200)).unwrap();
        let request = TurnRequest {
            role: String::new(),
            user_text: "hello".to_string(),
            image_text: String::new(),
            chat_id: "c1".to_string(),
        };

        let started = std::time::Instant::now();
        let result = transport.send_turn(&request);
        assert!(result.is_err());
        // The race resolves near the timeout, not after a long TCP stall
        assert!(started.elapsed() < Duration::from_secs(3));
    }
}
