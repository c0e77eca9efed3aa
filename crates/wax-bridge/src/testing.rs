//! Test doubles shared by the dispatcher and correlator tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use wax_common::Result;

use crate::dispatcher::{
    ActionDispatcher, ChainAction, Navigator, TransactOptions, TransactResult, WalletError,
    WalletSdk, WaxUser,
};
use crate::surface::{DisplaySurface, SurfaceEvent, SurfaceFactory, SurfaceOptions};

pub(crate) const TX_ID: &str = "7f3c9a01";

#[derive(Default)]
pub(crate) struct MockWallet {
    account: String,
    login_error: Option<String>,
    balances: HashMap<String, Vec<String>>,
    logged_in: AtomicBool,
    pub(crate) logins: AtomicUsize,
    pub(crate) transactions: Mutex<Vec<(Vec<ChainAction>, TransactOptions)>>,
}

impl MockWallet {
    pub(crate) fn new(account: &str) -> Self {
        Self {
            account: account.into(),
            ..Default::default()
        }
    }

    pub(crate) fn with_balance(mut self, contract: &str, raw: &str) -> Self {
        self.balances.insert(contract.into(), vec![raw.into()]);
        self
    }

    pub(crate) fn failing_login(mut self, message: &str) -> Self {
        self.login_error = Some(message.into());
        self
    }

    pub(crate) fn logged_in(self) -> Self {
        self.logged_in.store(true, Ordering::SeqCst);
        self
    }

    pub(crate) fn recorded(&self) -> Vec<(Vec<ChainAction>, TransactOptions)> {
        self.transactions.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl WalletSdk for MockWallet {
    async fn login(&self) -> std::result::Result<String, WalletError> {
        self.logins.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.login_error {
            return Err(WalletError(message.clone()));
        }
        self.logged_in.store(true, Ordering::SeqCst);
        Ok(self.account.clone())
    }

    fn user(&self) -> Option<WaxUser> {
        Some(WaxUser {
            avatar_url: Some(format!("https://avatars.example/{}.png", self.account)),
            is_temp: false,
            keys: vec!["PUB_K1_test".into()],
            trust_score: None,
            trust_score_provider: Some("chainchamps".into()),
        })
    }

    fn user_account(&self) -> Option<String> {
        self.logged_in
            .load(Ordering::SeqCst)
            .then(|| self.account.clone())
    }

    fn has_api(&self) -> bool {
        self.logged_in.load(Ordering::SeqCst)
    }

    async fn transact(
        &self,
        actions: Vec<ChainAction>,
        options: TransactOptions,
    ) -> std::result::Result<TransactResult, WalletError> {
        if let Ok(mut txs) = self.transactions.lock() {
            txs.push((actions, options));
        }
        Ok(TransactResult {
            transaction_id: Some(TX_ID.into()),
        })
    }

    async fn currency_balance(
        &self,
        contract: &str,
        _account: &str,
    ) -> std::result::Result<Vec<String>, WalletError> {
        self.balances
            .get(contract)
            .cloned()
            .ok_or_else(|| WalletError(format!("unknown contract {contract}")))
    }
}

#[derive(Default)]
pub(crate) struct RecordingNavigator {
    pub(crate) navigations: Mutex<Vec<String>>,
    pub(crate) closed: AtomicBool,
}

impl RecordingNavigator {
    pub(crate) fn urls(&self) -> Vec<String> {
        self.navigations.lock().map(|n| n.clone()).unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) {
        if let Ok(mut navs) = self.navigations.lock() {
            navs.push(url.to_string());
        }
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Navigator that feeds callbacks straight back as surface events, the
/// way the real surface intercepts them.
struct EventNavigator {
    events: mpsc::UnboundedSender<SurfaceEvent>,
}

impl Navigator for EventNavigator {
    fn navigate(&self, url: &str) {
        let _ = self.events.send(SurfaceEvent::Message(url.to_string()));
    }

    fn close(&self) {
        let _ = self.events.send(SurfaceEvent::CloseRequested);
    }
}

/// What a scripted surface does once `load` is called.
#[derive(Clone)]
pub(crate) enum Script {
    /// Fetch the page from the server, then run the dispatcher on it.
    RunPage(Arc<ActionDispatcher>),
    /// Send these events verbatim after fetching the page.
    Events(Vec<SurfaceEvent>),
    /// Do nothing at all.
    Hang,
}

#[derive(Default)]
pub(crate) struct SurfaceLog {
    pub(crate) loaded: Vec<String>,
    pub(crate) options: Vec<SurfaceOptions>,
    pub(crate) shown: usize,
    pub(crate) closed: usize,
    pub(crate) page_bodies: Vec<String>,
}

pub(crate) struct ScriptedSurfaces {
    script: Script,
    pub(crate) log: Arc<Mutex<SurfaceLog>>,
}

impl ScriptedSurfaces {
    pub(crate) fn new(script: Script) -> Self {
        Self {
            script,
            log: Arc::new(Mutex::new(SurfaceLog::default())),
        }
    }

    pub(crate) fn with_log<R>(&self, f: impl FnOnce(&SurfaceLog) -> R) -> R {
        let log = self.log.lock().unwrap();
        f(&log)
    }
}

impl SurfaceFactory for ScriptedSurfaces {
    fn open(
        &self,
        options: &SurfaceOptions,
        events: mpsc::UnboundedSender<SurfaceEvent>,
    ) -> Result<Box<dyn DisplaySurface>> {
        if let Ok(mut log) = self.log.lock() {
            log.options.push(options.clone());
        }
        Ok(Box::new(ScriptedSurface {
            script: self.script.clone(),
            events,
            log: Arc::clone(&self.log),
        }))
    }
}

struct ScriptedSurface {
    script: Script,
    events: mpsc::UnboundedSender<SurfaceEvent>,
    log: Arc<Mutex<SurfaceLog>>,
}

impl DisplaySurface for ScriptedSurface {
    fn load(&mut self, url: &str) -> Result<()> {
        if let Ok(mut log) = self.log.lock() {
            log.loaded.push(url.to_string());
        }
        let url = url.to_string();
        let events = self.events.clone();
        let log = Arc::clone(&self.log);
        let script = self.script.clone();
        tokio::spawn(async move {
            if matches!(script, Script::Hang) {
                return;
            }
            let body = match reqwest::get(&url).await {
                Ok(resp) => resp.text().await.unwrap_or_default(),
                Err(e) => {
                    let _ = events.send(SurfaceEvent::LoadError {
                        code: -1,
                        message: e.to_string(),
                    });
                    return;
                }
            };
            if let Ok(mut log) = log.lock() {
                log.page_bodies.push(body);
            }
            let _ = events.send(SurfaceEvent::PageLoaded { url: url.clone() });
            match script {
                Script::RunPage(dispatcher) => {
                    let navigator = EventNavigator { events };
                    let _ = dispatcher.on_page_load(&url, &navigator).await;
                }
                Script::Events(list) => {
                    for event in list {
                        let _ = events.send(event);
                    }
                }
                Script::Hang => {}
            }
        });
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        if let Ok(mut log) = self.log.lock() {
            log.shown += 1;
        }
        Ok(())
    }

    fn close(&mut self) {
        if let Ok(mut log) = self.log.lock() {
            log.closed += 1;
        }
    }
}
