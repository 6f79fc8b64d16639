//! Browser adapters for the network and the address bar.
//!
//! `FetchTransport` posts JSON-RPC bodies with `fetch` through gloo-net;
//! `BrowserNavigator` drives `window.location` and `history`.

use crate::dom;
use async_trait::async_trait;
use gloo_net::http::Request;
use nc_chain_client::{ChainError, RpcTransport};
use nc_session::{Navigator, SessionError};
use tracing::debug;
use wasm_bindgen::JsValue;

#[derive(Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl RpcTransport for FetchTransport {
    async fn post(&self, url: &str, body: String) -> Result<String, ChainError> {
        let response = Request::post(url)
            .header("Content-Type", "application/json")
            .body(body)
            .map_err(|e| ChainError::Transport(e.to_string()))?
            .send()
            .await
            .map_err(|e| ChainError::Transport(format!("fetch error: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ChainError::Transport(format!("text error: {e}")))?;
        debug!(status, bytes = text.len(), "rpc response");

        if !response.ok() {
            return Err(ChainError::Transport(format!(
                "{status} {}: {text}",
                response.status_text()
            )));
        }
        Ok(text)
    }
}

fn navigation_error(err: JsValue) -> SessionError {
    SessionError::Navigation(format!("{err:?}"))
}

#[derive(Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn href(&self) -> String {
        dom::window().location().href().unwrap_or_default()
    }

    fn assign(&self, url: &str) -> Result<(), SessionError> {
        dom::window().location().assign(url).map_err(navigation_error)
    }

    fn replace(&self, url: &str) -> Result<(), SessionError> {
        dom::window().location().replace(url).map_err(navigation_error)
    }

    fn replace_state(&self, url: &str) -> Result<(), SessionError> {
        dom::window()
            .history()
            .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(url)))
            .map_err(navigation_error)
    }
}
