//! In-memory stand-ins for the browser: a scripted NEAR node, storage,
//! navigation and a page view that records what it was told to show.

use crate::navigation::Navigator;
use crate::session::{Platform, Session};
use crate::storage::{KeyValueStore, MemoryStore};
use crate::ui::{CounterView, Mood};
use crate::SessionError;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use nc_chain_client::{ChainError, RpcTransport};
use nc_crypto::KeyPair;
use nc_types::{NetworkConfig, WalletAuthData, get_config};
use serde_json::{Value, json};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

pub const NETWORK: &str = "testnet";
pub const CONTRACT: &str = "counter.testnet";
pub const ALICE: &str = "alice.testnet";
pub const PAGE: &str = "https://app.example/counter/";
pub const AUTH_KEY: &str = "counter.testnet_wallet_auth_key";

pub enum ReadReply {
    Undefined,
    Error(String),
}

pub struct FakeNode {
    pub chain_id: RefCell<String>,
    pub offline: Cell<bool>,
    pub counter: Cell<i64>,
    pub read_reply: RefCell<Option<ReadReply>>,
    pub broadcast_error: RefCell<Option<Value>>,
    accounts: RefCell<HashMap<String, Vec<Value>>>,
    log: RefCell<Vec<String>>,
    pub broadcasts: RefCell<Vec<Vec<u8>>>,
}

impl Default for FakeNode {
    fn default() -> Self {
        Self {
            chain_id: RefCell::new(NETWORK.to_owned()),
            offline: Cell::new(false),
            counter: Cell::new(0),
            read_reply: RefCell::new(None),
            broadcast_error: RefCell::new(None),
            accounts: RefCell::new(HashMap::new()),
            log: RefCell::new(Vec::new()),
            broadcasts: RefCell::new(Vec::new()),
        }
    }
}

impl FakeNode {
    pub fn add_account(&self, account_id: &str) {
        self.accounts
            .borrow_mut()
            .entry(account_id.to_owned())
            .or_default();
    }

    pub fn add_key(&self, account_id: &str, public_key: &str, permission: Value) {
        self.accounts
            .borrow_mut()
            .entry(account_id.to_owned())
            .or_default()
            .push(json!({
                "public_key": public_key,
                "access_key": { "nonce": 5, "permission": permission },
            }));
    }

    /// How many requests matched `entry` (`status`, `query:call_function`, ...).
    pub fn calls(&self, entry: &str) -> usize {
        self.log.borrow().iter().filter(|e| e.as_str() == entry).count()
    }

    fn ok(result: Value) -> Result<String, ChainError> {
        Ok(json!({ "jsonrpc": "2.0", "id": "1", "result": result }).to_string())
    }

    fn error(error: Value) -> Result<String, ChainError> {
        Ok(json!({ "jsonrpc": "2.0", "id": "1", "error": error }).to_string())
    }

    fn handler_error(cause: &str, data: String) -> Result<String, ChainError> {
        Self::error(json!({
            "name": "HANDLER_ERROR",
            "cause": { "name": cause },
            "code": -32000,
            "message": "Server error",
            "data": data,
        }))
    }

    fn query(&self, params: &Value) -> Result<String, ChainError> {
        let request_type = params["request_type"].as_str().unwrap_or_default();
        self.log.borrow_mut().push(format!("query:{request_type}"));
        let account_id = params["account_id"].as_str().unwrap_or_default().to_owned();
        let accounts = self.accounts.borrow();

        match request_type {
            "view_account" => match accounts.get(&account_id) {
                Some(_) => Self::ok(json!({
                    "amount": "100000000000000000000000000",
                    "locked": "0",
                    "code_hash": "11111111111111111111111111111111",
                    "storage_usage": 182,
                    "block_height": 1,
                })),
                None => Self::handler_error(
                    "UNKNOWN_ACCOUNT",
                    format!("account {account_id} does not exist while viewing"),
                ),
            },
            "view_access_key" => {
                let public_key = params["public_key"].as_str().unwrap_or_default();
                let found = accounts.get(&account_id).and_then(|keys| {
                    keys.iter().find(|k| k["public_key"] == public_key).cloned()
                });
                match found {
                    Some(key) => Self::ok(key["access_key"].clone()),
                    None => Self::handler_error(
                        "UNKNOWN_ACCESS_KEY",
                        format!("access key {public_key} does not exist while viewing"),
                    ),
                }
            }
            "view_access_key_list" => {
                let keys = accounts.get(&account_id).cloned().unwrap_or_default();
                Self::ok(json!({ "keys": keys }))
            }
            "call_function" => match &*self.read_reply.borrow() {
                Some(ReadReply::Error(message)) => Self::ok(json!({ "error": message, "logs": [] })),
                Some(ReadReply::Undefined) => Self::ok(json!({ "result": [], "logs": [] })),
                None => Self::ok(json!({
                    "result": self.counter.get().to_string().into_bytes(),
                    "logs": [],
                })),
            },
            other => Self::handler_error("UNKNOWN_REQUEST", other.to_owned()),
        }
    }

    fn broadcast(&self, params: &Value) -> Result<String, ChainError> {
        self.log.borrow_mut().push("broadcast_tx_commit".to_owned());
        let encoded = params[0].as_str().unwrap_or_default();
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| ChainError::Transport(e.to_string()))?;
        self.broadcasts.borrow_mut().push(bytes.clone());

        if let Some(error) = self.broadcast_error.borrow().clone() {
            return Self::error(error);
        }

        let mentions = |needle: &[u8]| bytes.windows(needle.len()).any(|w| w == needle);
        if mentions(b"decrement") {
            self.counter.set(self.counter.get() - 1);
        } else if mentions(b"increment") {
            self.counter.set(self.counter.get() + 1);
        } else if mentions(b"reset") {
            self.counter.set(0);
        }
        Self::ok(json!({ "status": { "SuccessValue": "" }, "transaction": {} }))
    }
}

#[async_trait(?Send)]
impl RpcTransport for FakeNode {
    async fn post(&self, _url: &str, body: String) -> Result<String, ChainError> {
        if self.offline.get() {
            return Err(ChainError::Transport("connection refused".to_owned()));
        }
        let request: Value =
            serde_json::from_str(&body).map_err(|e| ChainError::Transport(e.to_string()))?;
        let params = &request["params"];

        match request["method"].as_str().unwrap_or_default() {
            "status" => {
                self.log.borrow_mut().push("status".to_owned());
                Self::ok(json!({ "chain_id": self.chain_id.borrow().as_str(), "protocol_version": 1 }))
            }
            "block" => Self::ok(json!({
                "header": { "hash": bs58::encode([1_u8; 32]).into_string(), "height": 1 }
            })),
            "query" => self.query(params),
            "broadcast_tx_commit" => self.broadcast(params),
            other => Self::handler_error("METHOD_NOT_FOUND", other.to_owned()),
        }
    }
}

pub struct RecordingNavigator {
    href: RefCell<String>,
    pub assigned: RefCell<Vec<String>>,
    pub replaced: RefCell<Vec<String>>,
    pub states: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(url: &str) -> Self {
        Self {
            href: RefCell::new(url.to_owned()),
            assigned: RefCell::new(Vec::new()),
            replaced: RefCell::new(Vec::new()),
            states: RefCell::new(Vec::new()),
        }
    }

    pub fn last_assigned(&self) -> Option<String> {
        self.assigned.borrow().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn href(&self) -> String {
        self.href.borrow().clone()
    }

    fn assign(&self, url: &str) -> Result<(), SessionError> {
        self.assigned.borrow_mut().push(url.to_owned());
        Ok(())
    }

    fn replace(&self, url: &str) -> Result<(), SessionError> {
        self.replaced.borrow_mut().push(url.to_owned());
        Ok(())
    }

    fn replace_state(&self, url: &str) -> Result<(), SessionError> {
        self.states.borrow_mut().push(url.to_owned());
        *self.href.borrow_mut() = url.to_owned();
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingView {
    pub events: RefCell<Vec<String>>,
    pub sign_in_visible: Cell<Option<bool>>,
    pub after_sign_in_visible: Cell<Option<bool>>,
    pub loading: Cell<bool>,
    pub text: RefCell<String>,
    pub left_eye_toggles: Cell<u32>,
    pub buttons_enabled: Cell<Option<bool>>,
    pub mood: Cell<Option<Mood>>,
    pub tongue: Cell<Option<bool>>,
}

impl RecordingView {
    fn record(&self, event: String) {
        self.events.borrow_mut().push(event);
    }
}

impl CounterView for RecordingView {
    fn show_signed_out(&self) {
        self.record("signed_out".into());
        self.sign_in_visible.set(Some(true));
        self.after_sign_in_visible.set(Some(false));
    }

    fn show_signed_in(&self) {
        self.record("signed_in".into());
        self.sign_in_visible.set(Some(false));
        self.after_sign_in_visible.set(Some(true));
    }

    fn show_loading(&self) {
        self.record("loading".into());
        self.loading.set(true);
        self.text.borrow_mut().clear();
    }

    fn show_count(&self, count: Option<i64>) {
        let text = crate::ui::display_text(count);
        self.record(format!("count:{text}"));
        self.loading.set(false);
        *self.text.borrow_mut() = text;
    }

    fn toggle_left_eye(&self) {
        self.record("left_eye".into());
        self.left_eye_toggles.set(self.left_eye_toggles.get() + 1);
    }

    fn set_buttons_enabled(&self, enabled: bool) {
        self.record(format!("buttons:{enabled}"));
        self.buttons_enabled.set(Some(enabled));
    }

    fn set_mood(&self, mood: Mood) {
        self.record(format!("mood:{}", mood.class()));
        self.mood.set(Some(mood));
    }

    fn set_tongue_visible(&self, visible: bool) {
        self.record(format!("tongue:{visible}"));
        self.tongue.set(Some(visible));
    }
}

/// A node, storage and page wired together the way the browser build does.
pub struct Fixture {
    pub node: Rc<FakeNode>,
    pub storage: Rc<MemoryStore>,
    pub navigator: Rc<RecordingNavigator>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::at(PAGE)
    }

    pub fn at(url: &str) -> Self {
        let node = Rc::new(FakeNode::default());
        node.add_account(CONTRACT);
        Self {
            node,
            storage: Rc::new(MemoryStore::default()),
            navigator: Rc::new(RecordingNavigator::at(url)),
        }
    }

    /// Alice is signed in with a local function-call key for the counter,
    /// and the wallet also reported a full-access key.
    pub fn signed_in() -> (Self, KeyPair) {
        Self::signed_in_at(PAGE)
    }

    pub fn signed_in_at(url: &str) -> (Self, KeyPair) {
        let fixture = Self::at(url);
        let local = KeyPair::from_random();
        let full = KeyPair::from_random();
        let local_pk = local.public_key().to_string();
        let full_pk = full.public_key().to_string();

        let auth = WalletAuthData {
            account_id: Some(ALICE.to_owned()),
            all_keys: vec![local_pk.clone(), full_pk.clone()],
        };
        fixture
            .storage
            .set_item(AUTH_KEY, &serde_json::to_string(&auth).unwrap())
            .unwrap();
        fixture
            .storage
            .set_item(
                &format!("near-api-js:keystore:{ALICE}:{NETWORK}"),
                &local.secret_key(),
            )
            .unwrap();

        fixture.node.add_key(
            ALICE,
            &local_pk,
            json!({ "FunctionCall": {
                "allowance": "250000000000000000000000",
                "receiver_id": CONTRACT,
                "method_names": [],
            }}),
        );
        fixture.node.add_key(ALICE, &full_pk, json!("FullAccess"));
        (fixture, local)
    }

    pub fn config() -> NetworkConfig {
        get_config(NETWORK, CONTRACT).unwrap()
    }

    pub fn platform(&self) -> Platform {
        Platform {
            transport: self.node.clone(),
            storage: self.storage.clone(),
            navigator: self.navigator.clone(),
        }
    }

    pub async fn session(&self) -> Session {
        Session::bootstrap(Self::config(), self.platform())
            .await
            .unwrap()
    }
}

/// Buffer for formatted `tracing` output.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::DEBUG)
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
