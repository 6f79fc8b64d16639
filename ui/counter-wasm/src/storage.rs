//! `localStorage` as the session's key-value store.
//!
//! Values are stored verbatim (not JSON-encoded) so keys written by other
//! NEAR web apps on the same origin stay readable.

use gloo_storage::{LocalStorage, Storage};
use nc_session::{KeyValueStore, SessionError};
use wasm_bindgen::JsValue;

fn storage_error(err: JsValue) -> SessionError {
    SessionError::Storage(format!("{err:?}"))
}

#[derive(Default)]
pub struct BrowserStorage;

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        LocalStorage::raw().get_item(key).map_err(storage_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        LocalStorage::raw().set_item(key, value).map_err(storage_error)
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        LocalStorage::raw().remove_item(key).map_err(storage_error)
    }
}
