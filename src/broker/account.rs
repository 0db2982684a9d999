//! Account Store
//!
//! Flat-file account records: registration, authentication, persistence.
//! One `name,password` line per account; the whole file is rewritten on
//! every registration, which is acceptable because registration is rare
//! next to gameplay traffic.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::broker::ConnId;

/// Outcome code for registration and login, as sent on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum LoginResponse {
    /// Account created or credentials accepted.
    Success = 1,
    /// Registration name already taken.
    NameInUse = 2,
    /// No account with that name.
    NameNotFound = 3,
    /// Account exists but the password does not match.
    IncorrectPassword = 4,
}

/// A registered player account.
#[derive(Clone, Debug)]
pub struct Account {
    /// Unique, case-sensitive account name.
    pub name: String,
    /// Stored verbatim; the persisted format fixes this as plain text.
    pub password: String,
    /// Connection currently logged in as this account, if any.
    pub connection: Option<ConnId>,
}

/// Account persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the account file failed.
    #[error("account file i/o: {0}")]
    Io(#[from] std::io::Error),
}

/// Owns every account record and its persistence.
///
/// Names are unique by construction of [`AccountStore::register`]; lookups
/// are hashed, with a side list preserving registration order so the file
/// is rewritten in a stable order.
pub struct AccountStore {
    path: Option<PathBuf>,
    accounts: HashMap<String, Account>,
    order: Vec<String>,
}

impl AccountStore {
    /// Create an empty in-memory store with no backing file.
    pub fn new() -> Self {
        Self {
            path: None,
            accounts: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Load the store from `path`, creating an empty store if the file
    /// does not exist yet.
    ///
    /// Malformed lines (no comma) are skipped with a warning rather than
    /// aborting startup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let mut store = Self::new();
        store.path = Some(path.to_path_buf());

        if !path.exists() {
            return Ok(store);
        }

        let contents = fs::read_to_string(path)?;
        for (lineno, line) in contents.lines().enumerate() {
            match line.split_once(',') {
                Some((name, password)) => {
                    store.insert(name.to_string(), password.to_string());
                }
                None => {
                    warn!(line = lineno + 1, "skipping malformed account line");
                }
            }
        }

        Ok(store)
    }

    /// Register a new account.
    ///
    /// On success the full store is rewritten to disk; a write failure is
    /// logged and the in-memory registration stands.
    pub fn register(&mut self, name: &str, password: &str) -> LoginResponse {
        if self.accounts.contains_key(name) {
            return LoginResponse::NameInUse;
        }

        self.insert(name.to_string(), password.to_string());
        if let Err(e) = self.save() {
            warn!(name, "failed to persist account store: {e}");
        }
        LoginResponse::Success
    }

    /// Check credentials. Binding the connection is the caller's job.
    pub fn authenticate(&self, name: &str, password: &str) -> LoginResponse {
        match self.accounts.get(name) {
            None => LoginResponse::NameNotFound,
            Some(account) if account.password == password => LoginResponse::Success,
            Some(_) => LoginResponse::IncorrectPassword,
        }
    }

    /// Record which connection is logged in as `name`.
    ///
    /// Returns the connection that was previously bound, if any.
    pub fn bind_connection(&mut self, name: &str, conn: ConnId) -> Option<ConnId> {
        let account = self.accounts.get_mut(name)?;
        account.connection.replace(conn)
    }

    /// Clear the connection binding for `name`.
    pub fn clear_connection(&mut self, name: &str) {
        if let Some(account) = self.accounts.get_mut(name) {
            account.connection = None;
        }
    }

    /// Look up an account by exact name.
    pub fn get(&self, name: &str) -> Option<&Account> {
        self.accounts.get(name)
    }

    /// Number of registered accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the store holds no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Rewrite the whole account file, one `name,password` line per account
    /// in registration order. A store without a backing file is a no-op.
    pub fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut contents = String::new();
        for name in &self.order {
            if let Some(account) = self.accounts.get(name) {
                contents.push_str(&account.name);
                contents.push(',');
                contents.push_str(&account.password);
                contents.push('\n');
            }
        }
        fs::write(path, contents)?;
        Ok(())
    }

    fn insert(&mut self, name: String, password: String) {
        self.order.push(name.clone());
        self.accounts.insert(
            name.clone(),
            Account {
                name,
                password,
                connection: None,
            },
        );
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}
