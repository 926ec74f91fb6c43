//! Shared client
//!
//! One connection used by several threads. Each request holds the lock from
//! its first write to its last read, so packets of different requests never
//! interleave on the socket.

use std::sync::Arc;

use parking_lot::Mutex;

use super::Client;
use crate::alert::Alert;
use crate::error::Result;

/// Cloneable handle to a mutex-guarded client
#[derive(Clone)]
pub struct SharedClient {
    inner: Arc<Mutex<Client>>,
}

impl SharedClient {
    pub fn new(client: Client) -> Self {
        Self {
            inner: Arc::new(Mutex::new(client)),
        }
    }

    pub fn submit_alert(&self, alert: &Alert) -> Result<()> {
        self.inner.lock().submit_alert(alert)
    }

    pub fn query_alerts(&self, filter: &str) -> Result<Vec<Alert>> {
        self.inner.lock().query_alerts(filter)
    }

    pub fn mark_as_read(&self, id: u64) -> Result<()> {
        self.inner.lock().mark_as_read(id)
    }

    pub fn type_id_for_name(&self, name: &str) -> Option<u32> {
        self.inner.lock().type_id_for_name(name)
    }

    pub fn type_name_for_id(&self, id: u32) -> Option<String> {
        self.inner.lock().type_name_for_id(id).map(str::to_string)
    }

    /// Run several requests back to back without other threads in between
    pub fn with<R>(&self, f: impl FnOnce(&mut Client) -> R) -> R {
        let mut client = self.inner.lock();
        f(&mut *client)
    }
}
