//! Test doubles for the storage ports.

#![allow(clippy::unwrap_used)]

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::{Backend, Clock, LocalStore};
use crate::db::Database;
use crate::error::RemoteError;
use crate::remote::{Method, RemoteApi};

/// Remote that answers scripted `(method, endpoint)` pairs and fails the rest.
#[derive(Default)]
pub(crate) struct ScriptedRemote {
    responses: RefCell<HashMap<(Method, String), Value>>,
    calls: RefCell<Vec<(Method, String, Option<Value>)>>,
}

impl ScriptedRemote {
    pub(crate) fn respond(&self, method: Method, endpoint: &str, value: Value) {
        self.responses
            .borrow_mut()
            .insert((method, endpoint.to_string()), value);
    }

    pub(crate) fn calls(&self) -> Vec<(Method, String, Option<Value>)> {
        self.calls.borrow().clone()
    }
}

impl RemoteApi for ScriptedRemote {
    fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value, RemoteError> {
        self.calls
            .borrow_mut()
            .push((method, endpoint.to_string(), body.cloned()));
        self.responses
            .borrow()
            .get(&(method, endpoint.to_string()))
            .cloned()
            .ok_or(RemoteError::Status(503))
    }
}

pub(crate) struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub(crate) fn at(year: i32, month: u32, day: u32) -> Self {
        Self {
            now: Cell::new(Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()),
        }
    }

    pub(crate) fn advance_secs(&self, secs: i64) {
        self.now
            .set(self.now.get() + chrono::Duration::seconds(secs));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Ports wired for a test, with handles kept for inspection.
pub(crate) struct Harness {
    pub(crate) remote: Rc<ScriptedRemote>,
    pub(crate) local: Rc<Database>,
    pub(crate) clock: Rc<FixedClock>,
    pub(crate) backend: Backend,
}

impl Harness {
    pub(crate) fn new(year: i32, month: u32, day: u32) -> Self {
        let remote = Rc::new(ScriptedRemote::default());
        let local = Rc::new(Database::open_in_memory().unwrap());
        let clock = Rc::new(FixedClock::at(year, month, day));
        let backend = Backend::new(remote.clone(), local.clone(), clock.clone());
        Self {
            remote,
            local,
            clock,
            backend,
        }
    }

    pub(crate) fn raw(&self, key: &str) -> Option<String> {
        self.local.get(key).unwrap()
    }

    pub(crate) fn json(&self, key: &str) -> Value {
        self.raw(key)
            .map(|raw| serde_json::from_str(&raw).unwrap())
            .unwrap_or(Value::Null)
    }
}
