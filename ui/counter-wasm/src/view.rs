//! The counter page as a [`CounterView`].

use crate::dom::{self, Elements};
use nc_session::ui::display_text;
use nc_session::{CounterView, Mood};

impl CounterView for Elements {
    fn show_signed_out(&self) {
        self.after_sign_in.iter().for_each(|el| dom::set_display(el, false));
        self.sign_in.iter().for_each(|el| dom::set_display(el, true));
    }

    fn show_signed_in(&self) {
        self.sign_in.iter().for_each(|el| dom::set_display(el, false));
        self.after_sign_in.iter().for_each(|el| dom::set_display(el, true));
    }

    fn show_loading(&self) {
        dom::replace_class(&self.show, "number", "loader");
        dom::set_text(&self.show, "");
    }

    fn show_count(&self, count: Option<i64>) {
        dom::replace_class(&self.show, "loader", "number");
        dom::set_text(&self.show, &display_text(count));
    }

    fn toggle_left_eye(&self) {
        dom::toggle_class(&self.left_eye, "eye");
    }

    fn set_buttons_enabled(&self, enabled: bool) {
        dom::set_all_buttons_disabled(!enabled);
    }

    fn set_mood(&self, mood: Mood) {
        dom::replace_class(&self.mouth, mood.opposite().class(), mood.class());
    }

    fn set_tongue_visible(&self, visible: bool) {
        dom::set_display(&self.tongue, visible);
    }
}
