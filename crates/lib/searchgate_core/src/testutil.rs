//! In-memory collaborator fakes.
//!
//! Enabled with the `testutil` feature so dependent crates can drive the
//! full request pipeline without a database, engine, or bus:
//!
//! ```toml
//! [dev-dependencies]
//! searchgate_core = { workspace = true, features = ["testutil"] }
//! ```
//!
//! Each fake supports per-operation failure injection via `fail_on`, keyed by
//! the trait method name.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::engine::{EngineError, SearchEngine};
use crate::models::{Document, User};
use crate::queue::{DocumentQueue, QueueError};
use crate::store::{IdentityStore, StoreError};

fn injected(failing: &Mutex<HashSet<&'static str>>, op: &'static str) -> Result<(), String> {
    if failing.lock().unwrap().contains(op) {
        return Err(format!("injected {op} failure"));
    }
    Ok(())
}

impl From<String> for StoreError {
    fn from(msg: String) -> Self {
        StoreError::Backend(msg)
    }
}

impl From<String> for EngineError {
    fn from(msg: String) -> Self {
        EngineError::Backend(msg)
    }
}

impl From<String> for QueueError {
    fn from(msg: String) -> Self {
        QueueError(msg)
    }
}

#[derive(Default)]
struct StoreState {
    users: HashMap<String, User>,
    blacklist: HashSet<String>,
}

/// Mutex-held [`IdentityStore`] with failure injection.
#[derive(Default)]
pub struct MemoryIdentityStore {
    state: Mutex<StoreState>,
    failing: Mutex<HashSet<&'static str>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user record.
    pub fn with_user(self, user: User) -> Self {
        self.state.lock().unwrap().users.insert(user.id.clone(), user);
        self
    }

    /// Make the named trait method fail with a backend error.
    pub fn fail_on(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    /// The current refresh digest stored for `id`.
    pub fn refresh_digest_of(&self, id: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .users
            .get(id)
            .map(|u| u.refresh_digest.clone())
    }

    /// The index names currently owned by `id`.
    pub fn indexes_of(&self, id: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .users
            .get(id)
            .map(|u| u.indexes.clone())
            .unwrap_or_default()
    }

    /// Insert a digest directly into the blacklist.
    pub fn seed_blacklist(&self, digest: &str) {
        self.state.lock().unwrap().blacklist.insert(digest.to_string());
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_by_login(&self, login: &str) -> Result<User, StoreError> {
        injected(&self.failing, "find_by_login")?;
        self.state
            .lock()
            .unwrap()
            .users
            .values()
            .find(|u| u.login == login)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_by_id(&self, id: &str) -> Result<User, StoreError> {
        injected(&self.failing, "find_by_id")?;
        self.state
            .lock()
            .unwrap()
            .users
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn set_refresh_digest(&self, id: &str, digest: &str) -> Result<(), StoreError> {
        injected(&self.failing, "set_refresh_digest")?;
        let mut state = self.state.lock().unwrap();
        let user = state.users.get_mut(id).ok_or(StoreError::NotFound)?;
        user.refresh_digest = digest.to_string();
        Ok(())
    }

    async fn owns_index(&self, id: &str, index_name: &str) -> Result<bool, StoreError> {
        injected(&self.failing, "owns_index")?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .get(id)
            .is_some_and(|u| u.indexes.iter().any(|n| n == index_name)))
    }

    async fn append_index(&self, id: &str, index_name: &str) -> Result<(), StoreError> {
        injected(&self.failing, "append_index")?;
        let mut state = self.state.lock().unwrap();
        let user = state.users.get_mut(id).ok_or(StoreError::NotFound)?;
        user.indexes.push(index_name.to_string());
        Ok(())
    }

    async fn is_blacklisted(&self, digest: &str) -> Result<bool, StoreError> {
        injected(&self.failing, "is_blacklisted")?;
        Ok(self.state.lock().unwrap().blacklist.contains(digest))
    }

    async fn blacklist(&self, digest: &str) -> Result<(), StoreError> {
        injected(&self.failing, "blacklist")?;
        self.state.lock().unwrap().blacklist.insert(digest.to_string());
        Ok(())
    }
}

/// [`SearchEngine`] over an in-memory index-name set with canned results.
#[derive(Default)]
pub struct StubEngine {
    existing: Mutex<HashSet<String>>,
    results: Mutex<Vec<Document>>,
    failing: Mutex<HashSet<&'static str>>,
}

impl StubEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an index as existing.
    pub fn with_index(self, index_name: &str) -> Self {
        self.existing.lock().unwrap().insert(index_name.to_string());
        self
    }

    /// Set the documents every search returns.
    pub fn with_results(self, documents: Vec<Document>) -> Self {
        *self.results.lock().unwrap() = documents;
        self
    }

    /// Make the named trait method fail with a backend error.
    pub fn fail_on(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }
}

#[async_trait]
impl SearchEngine for StubEngine {
    async fn create_index(&self, index_name: &str) -> Result<(), EngineError> {
        injected(&self.failing, "create_index")?;
        let mut existing = self.existing.lock().unwrap();
        if !existing.insert(index_name.to_string()) {
            return Err(EngineError::AlreadyExists);
        }
        Ok(())
    }

    async fn index_exists(&self, index_name: &str) -> Result<bool, EngineError> {
        injected(&self.failing, "index_exists")?;
        Ok(self.existing.lock().unwrap().contains(index_name))
    }

    async fn search(&self, _index_name: &str, _query: &str) -> Result<Vec<Document>, EngineError> {
        injected(&self.failing, "search")?;
        Ok(self.results.lock().unwrap().clone())
    }
}

/// [`DocumentQueue`] that records every published payload.
#[derive(Default)]
pub struct RecordingQueue {
    published: Mutex<Vec<Vec<u8>>>,
    failing: Mutex<HashSet<&'static str>>,
}

impl RecordingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make publishing fail.
    pub fn fail_on(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    /// Everything published so far.
    pub fn published(&self) -> Vec<Vec<u8>> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentQueue for RecordingQueue {
    async fn publish(&self, payload: Vec<u8>) -> Result<(), QueueError> {
        injected(&self.failing, "publish")?;
        self.published.lock().unwrap().push(payload);
        Ok(())
    }
}
