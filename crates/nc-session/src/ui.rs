//! Page refresh and counter button actions.
//!
//! The page itself sits behind [`CounterView`]; these routines decide what
//! it shows and in which order.

use crate::account::TxOutcome;
use crate::contract::CounterAction;
use crate::hint::report_error;
use crate::session::Session;
use tracing::info;

pub const CALCULATING_PLACEHOLDER: &str = "calculating...";

/// Beyond this magnitude the extra decoration is shown.
pub const TONGUE_THRESHOLD: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Smile,
    Cry,
}

impl Mood {
    pub fn for_count(count: i64) -> Self {
        if count >= 0 { Self::Smile } else { Self::Cry }
    }

    pub fn class(self) -> &'static str {
        match self {
            Self::Smile => "smile",
            Self::Cry => "cry",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Smile => Self::Cry,
            Self::Cry => Self::Smile,
        }
    }
}

pub fn tongue_visible(count: i64) -> bool {
    count.unsigned_abs() > TONGUE_THRESHOLD
}

/// Text for the counter display.
pub fn display_text(count: Option<i64>) -> String {
    count.map_or_else(|| CALCULATING_PLACEHOLDER.to_owned(), |v| v.to_string())
}

pub trait CounterView {
    /// Reveal `.sign-in`, hide `.after-sign-in`.
    fn show_signed_out(&self);
    /// Reveal `.after-sign-in`, hide `.sign-in`.
    fn show_signed_in(&self);
    /// Swap the counter display to the loader and clear it.
    fn show_loading(&self);
    /// Swap the loader back to the number and render `count`.
    fn show_count(&self, count: Option<i64>);
    fn toggle_left_eye(&self);
    fn set_buttons_enabled(&self, enabled: bool);
    fn set_mood(&self, mood: Mood);
    fn set_tongue_visible(&self, visible: bool);
}

/// Redraw for the current identity, reading the counter fresh when signed in.
/// A failed read is reported and leaves the display as it was.
pub async fn refresh_ui(session: &Session, view: &dyn CounterView) {
    if session.account_id().is_empty() {
        view.show_signed_out();
        return;
    }

    view.show_signed_in();
    view.show_loading();
    match session.contract.get_num().await {
        Ok(count) => render_count(view, count),
        Err(err) => report_error(&err),
    }
}

/// An undefined count is not `>= 0`, so it cries with the tongue hidden.
pub fn render_count(view: &dyn CounterView, count: Option<i64>) {
    view.show_count(count);
    view.toggle_left_eye();
    view.set_buttons_enabled(true);
    match count {
        Some(value) => {
            view.set_mood(Mood::for_count(value));
            view.set_tongue_visible(tongue_visible(value));
        }
        None => {
            view.set_mood(Mood::Cry);
            view.set_tongue_visible(false);
        }
    }
}

/// Button handler body: lock the page, send the change call, then refresh.
/// A failed write is reported and still followed by a refresh so the
/// buttons come back.
pub async fn run_action(session: &Session, view: &dyn CounterView, action: CounterAction) {
    view.set_buttons_enabled(false);
    view.show_loading();

    match session.contract.call(action).await {
        Ok(TxOutcome::Redirected) => {
            info!(method = action.method_name(), "change call handed to the wallet");
        }
        Ok(TxOutcome::Executed(_)) => refresh_ui(session, view).await,
        Err(err) => {
            report_error(&err);
            refresh_ui(session, view).await;
        }
    }
}
