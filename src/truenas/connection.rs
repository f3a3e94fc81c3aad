//! WebSocket Connection Management
//!
//! A single long-lived WebSocket session is shared by every facade call. The
//! session is established lazily, authenticated with the configured API key,
//! and dropped whenever the transport fails or the middleware reports that the
//! session expired, so the next call starts fresh.

use crate::config::TrueNasConfig;
use crate::error::{ProviderError, Result};
use crate::truenas::types::{DdpConnect, JsonRpcRequest, JsonRpcResponse};
use futures_util::{SinkExt, StreamExt};
use secrecy::ExposeSecret;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Manages a persistent, authenticated WebSocket session to TrueNAS
pub struct ConnectionManager {
    config: Arc<TrueNasConfig>,
    session: Mutex<Option<WsStream>>,
    request_id: AtomicU64,
}

impl ConnectionManager {
    pub fn new(config: Arc<TrueNasConfig>) -> Self {
        Self {
            config,
            session: Mutex::new(None),
            request_id: AtomicU64::new(0),
        }
    }

    fn next_id(&self) -> String {
        self.request_id.fetch_add(1, Ordering::SeqCst).to_string()
    }

    fn websocket_url(&self) -> String {
        let protocol = if self.config.use_tls { "wss" } else { "ws" };
        format!("{}://{}/websocket", protocol, self.config.host)
    }

    async fn connect_websocket(&self) -> Result<WsStream> {
        let url = self.websocket_url();
        debug!("Connecting to {}", url);

        let (ws_stream, _) = if self.config.use_tls && !self.config.verify_ssl {
            // Self-signed appliance certificates
            let connector = native_tls::TlsConnector::builder()
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true)
                .build()
                .map_err(|e| ProviderError::Config(e.to_string()))?;

            let connector = tokio_tungstenite::Connector::NativeTls(connector);
            tokio_tungstenite::connect_async_tls_with_config(&url, None, false, Some(connector))
                .await?
        } else {
            connect_async(&url).await?
        };

        Ok(ws_stream)
    }

    /// Open a new session: DDP connect, then API key login
    async fn open_session(&self) -> Result<WsStream> {
        info!("Establishing WebSocket session to {}", self.config.host);
        let mut stream = self.connect_websocket().await?;

        let connect_msg = serde_json::to_string(&DdpConnect::default())?;
        stream.send(Message::Text(connect_msg.into())).await?;
        match next_text(&mut stream).await? {
            Some(text) if text.contains("\"connected\"") => debug!("DDP session established"),
            Some(text) => {
                return Err(ProviderError::TrueNasApi(format!(
                    "Unexpected DDP connect response: {}",
                    text
                )))
            }
            None => return Err(ProviderError::WebSocket(tungstenite::Error::ConnectionClosed)),
        }

        let params = serde_json::json!([self.config.api_key.expose_secret().trim()]);
        let result = call(&mut stream, self.next_id(), "auth.login_with_api_key", Some(params))
            .await
            .map_err(|e| match e {
                ProviderError::TrueNasApi(reason) => ProviderError::Auth(reason),
                other => other,
            })?;

        if result != serde_json::Value::Bool(true) {
            return Err(ProviderError::Auth(
                "API key rejected by TrueNAS".to_string(),
            ));
        }

        info!("Successfully authenticated to TrueNAS");
        Ok(stream)
    }

    /// Execute one JSON-RPC method call on the shared session
    pub async fn execute_query<T>(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut guard = self.session.lock().await;

        let mut stream = match guard.take() {
            Some(stream) => stream,
            None => self.open_session().await?,
        };

        debug!("Sending request: {}", method);
        let outcome = call(&mut stream, self.next_id(), method, params).await;

        match &outcome {
            // Transport errors leave the session unusable; it stays dropped
            Err(ProviderError::WebSocket(_)) => {}
            Err(ProviderError::TrueNasApi(reason)) if reason.contains("ENOTAUTHENTICATED") => {
                warn!("Session expired, will re-authenticate on next request");
            }
            _ => *guard = Some(stream),
        }

        let result = outcome?;
        debug!("{} response received", method);
        serde_json::from_value(result).map_err(ProviderError::Json)
    }
}

/// Send a method call and wait for the response carrying the same id
///
/// Unrelated frames (subscription events, stray responses) are skipped. If the
/// returned future is dropped mid-call the stream is dropped with it, so an
/// aborted request never leaves a half-read session behind.
async fn call(
    stream: &mut WsStream,
    id: String,
    method: &str,
    params: Option<serde_json::Value>,
) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        id: id.clone(),
        msg: "method".to_string(),
        method: method.to_string(),
        params,
    };
    stream
        .send(Message::Text(serde_json::to_string(&request)?.into()))
        .await?;

    loop {
        let text = next_text(stream)
            .await?
            .ok_or(ProviderError::WebSocket(tungstenite::Error::ConnectionClosed))?;

        let response: JsonRpcResponse = match serde_json::from_str(&text) {
            Ok(response) => response,
            Err(_) => {
                debug!("Skipping non JSON-RPC frame");
                continue;
            }
        };
        if response.id.as_deref() != Some(id.as_str()) {
            continue;
        }

        if let Some(error) = response.error {
            return Err(ProviderError::TrueNasApi(error.message()));
        }
        return Ok(response.result.unwrap_or(serde_json::Value::Null));
    }
}

/// Next text frame, answering pings along the way; `None` once the peer closes
async fn next_text(stream: &mut WsStream) -> Result<Option<String>> {
    while let Some(msg) = stream.next().await {
        match msg? {
            Message::Text(text) => return Ok(Some(text.as_str().to_owned())),
            Message::Ping(payload) => stream.send(Message::Pong(payload)).await?,
            Message::Close(_) => return Ok(None),
            _ => {}
        }
    }
    Ok(None)
}
