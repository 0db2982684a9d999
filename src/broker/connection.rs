//! Connection Index
//!
//! Ephemeral mapping from a live connection id to the account it logged in
//! as. Entries exist only for authenticated connections and are removed on
//! disconnect; nothing here is persisted.

use std::collections::HashMap;

use crate::broker::ConnId;

/// connection id -> account name
#[derive(Debug, Default)]
pub struct ConnectionIndex {
    bound: HashMap<ConnId, String>,
}

impl ConnectionIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            bound: HashMap::new(),
        }
    }

    /// Bind `conn` to `name`, returning the name it was previously bound
    /// to, if any (a connection re-logging-in as a different account).
    pub fn bind(&mut self, conn: ConnId, name: String) -> Option<String> {
        self.bound.insert(conn, name)
    }

    /// Remove the binding for `conn`, returning the account name it held.
    pub fn unbind(&mut self, conn: ConnId) -> Option<String> {
        self.bound.remove(&conn)
    }

    /// Account name `conn` is logged in as, if any.
    pub fn account(&self, conn: ConnId) -> Option<&str> {
        self.bound.get(&conn).map(String::as_str)
    }

    /// Number of authenticated connections.
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    /// Whether no connection is authenticated.
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}
