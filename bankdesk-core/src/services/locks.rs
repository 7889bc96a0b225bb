//! Per-account mutual exclusion
//!
//! Every balance mutation runs inside the scope of the accounts it touches.
//! Multi-account scopes are acquired in ascending id order, so two transfers
//! moving money in opposite directions between the same pair cannot
//! deadlock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::domain::result::{Error, Result};

#[derive(Default)]
pub struct AccountLocks {
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, id: Uuid) -> Result<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))?;
        Ok(Arc::clone(locks.entry(id).or_default()))
    }

    /// Run `f` while holding the scopes of every account in `ids`
    pub fn with_accounts<T>(&self, ids: &[Uuid], f: impl FnOnce() -> Result<T>) -> Result<T> {
        let mut ordered = ids.to_vec();
        ordered.sort();
        ordered.dedup();

        let handles = ordered
            .iter()
            .map(|id| self.handle(*id))
            .collect::<Result<Vec<_>>>()?;

        let result = {
            let mut guards = Vec::with_capacity(handles.len());
            for handle in &handles {
                guards.push(
                    handle
                        .lock()
                        .map_err(|e| Error::database(format!("Account lock poisoned: {}", e)))?,
                );
            }
            f()
        };

        drop(handles);
        self.prune(&ordered);
        result
    }

    /// Forget scopes nobody else is holding or waiting on
    fn prune(&self, ids: &[Uuid]) {
        if let Ok(mut locks) = self.locks.lock() {
            for id in ids {
                if locks.get(id).is_some_and(|h| Arc::strong_count(h) == 1) {
                    locks.remove(id);
                }
            }
        }
    }

    /// Number of accounts with a live scope
    pub fn tracked(&self) -> usize {
        self.locks.lock().map(|l| l.len()).unwrap_or(0)
    }
}
