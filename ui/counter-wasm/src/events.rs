//! Event binding.
//!
//! Counter buttons lock the page and run through [`run_action`]; the face
//! toggles are purely cosmetic; sign-in, sign-out and account creation go
//! through the session.

use crate::dom::{self, Elements};
use nc_session::{
    CounterAction, ProvisioningState, Session, refresh_ui, report_error, run_action,
};
use std::rc::Rc;
use tracing::{error, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Helper: attach an async click handler that receives the session and elements.
macro_rules! on_click_async {
    ($el:expr, $session:expr, $els:expr, $handler:expr) => {{
        let session = Rc::clone($session);
        let els = $els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let session = Rc::clone(&session);
            let els = els.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&session, &els).await;
            });
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

/// Helper: attach sync click handler.
macro_rules! on_click {
    ($el:expr, $cb:expr) => {{
        let cb = Closure::wrap(Box::new($cb) as Box<dyn FnMut(web_sys::MouseEvent)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(session: &Rc<Session>, els: &Elements) -> Result<(), JsValue> {
    // ── Counter ──
    on_click_async!(els.plus, session, els, on_increment);
    on_click_async!(els.minus, session, els, on_decrement);
    on_click_async!(els.reset, session, els, on_reset);

    // ── Face ──
    {
        let eye = els.left_eye.clone();
        on_click!(els.left_eye_btn, move |_: web_sys::MouseEvent| {
            dom::toggle_class(&eye, "eye");
        });
    }
    {
        let eye = els.right_eye.clone();
        on_click!(els.right_eye_btn, move |_: web_sys::MouseEvent| {
            dom::toggle_class(&eye, "eye");
        });
    }
    {
        let dot = els.dot.clone();
        on_click!(els.dot_btn, move |_: web_sys::MouseEvent| {
            dom::toggle_class(&dot, "on");
        });
    }

    // ── Session ──
    {
        let session = Rc::clone(session);
        on_click!(els.sign_in_btn, move |_: web_sys::MouseEvent| {
            if let Err(err) = session.sign_in() {
                error!(error = %err, "sign-in failed");
            }
        });
    }
    {
        let session = Rc::clone(session);
        on_click!(els.sign_out_btn, move |_: web_sys::MouseEvent| {
            if let Err(err) = session.sign_out() {
                error!(error = %err, "sign-out failed");
            }
        });
    }
    if let Some(btn) = &els.create_account_btn {
        on_click_async!(btn, session, els, on_create_account);
    }

    Ok(())
}

async fn on_increment(session: &Session, els: &Elements) {
    run_action(session, els, CounterAction::Increment).await;
}

async fn on_decrement(session: &Session, els: &Elements) {
    run_action(session, els, CounterAction::Decrement).await;
}

async fn on_reset(session: &Session, els: &Elements) {
    run_action(session, els, CounterAction::Reset).await;
}

/// Ask for a name, show the generated seed phrase, then start provisioning.
async fn on_create_account(session: &Session, els: &Elements) {
    let window = dom::window();
    let name = match window.prompt_with_message("Name for the new account") {
        Ok(Some(name)) if !name.trim().is_empty() => name.trim().to_owned(),
        _ => return,
    };

    let display = |seed_phrase: &str| {
        let _ = window.prompt_with_message_and_default(
            "Write down this seed phrase, it is the only way to recover the account",
            seed_phrase,
        );
    };
    match session.provisioner().start(&name, display).await {
        Ok(state) => log_provisioning(&state),
        Err(err) => report_error(&err),
    }
    refresh_ui(session, els).await;
}

/// Settle an account creation the wallet has just returned from.
pub async fn resume_provisioning(session: &Session) {
    match session.provisioner().resume().await {
        Ok(state) => log_provisioning(&state),
        Err(err) => warn!(error = %err, "could not check pending account creation"),
    }
}

fn log_provisioning(state: &ProvisioningState) {
    match state {
        ProvisioningState::NotStarted => {}
        ProvisioningState::PendingApproval(record) => {
            info!(account = %record.account_id, "waiting for wallet approval");
        }
        ProvisioningState::Approved(created) => {
            info!(account = %created.account_id, public_key = %created.public_key, "account ready");
        }
        ProvisioningState::Failed { account_id, reason } => {
            warn!(account = %account_id, %reason, "account creation failed");
        }
    }
}
