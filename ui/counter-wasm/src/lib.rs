//! Counter demo front end, compiled to WASM.
//!
//! Binds the page, connects to NEAR with the build-time environment, settles
//! any account creation the wallet returned from, then draws the counter.

pub mod api;
pub mod dom;
pub mod events;
pub mod logging;
pub mod storage;
pub mod view;

use api::{BrowserNavigator, FetchTransport};
use nc_session::{Platform, Session, refresh_ui};
use nc_types::config::{DEFAULT_CONTRACT_NAME, DEFAULT_ENV};
use nc_types::get_config;
use std::rc::Rc;
use storage::BrowserStorage;
use tracing::error;
use wasm_bindgen::prelude::*;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();
    logging::init();

    init().await.inspect_err(|err| error!(error = ?err, "counter failed to start"))
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;

    let config = get_config(
        option_env!("NEAR_ENV").unwrap_or(DEFAULT_ENV),
        option_env!("CONTRACT_NAME").unwrap_or(DEFAULT_CONTRACT_NAME),
    )
    .map_err(to_js)?;

    let platform = Platform {
        transport: Rc::new(FetchTransport),
        storage: Rc::new(BrowserStorage),
        navigator: Rc::new(BrowserNavigator),
    };
    let session = Rc::new(Session::bootstrap(config, platform).await.map_err(to_js)?);

    events::resume_provisioning(&session).await;
    events::bind_events(&session, &els)?;
    refresh_ui(&session, &els).await;

    Ok(())
}
