//! Server-side sessions: per-table carts, the last visited table and the
//! logged-in merchant, keyed by an opaque id in the session cookie.

mod cart;
mod middleware;
mod store;

use std::{collections::HashMap, sync::Arc};

use axum::{extract::FromRequestParts, http::StatusCode, http::request::Parts};
use parking_lot::Mutex;

pub use cart::{Cart, MAX_QUANTITY};
pub use middleware::{SESSION_COOKIE, session_layer};
pub use store::{MemorySessionStore, SessionId, SessionStore};

/// Merchant identity established at login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantIdentity {
    pub merchant_id: i32,
    pub username: String,
    pub restaurant_id: i32,
}

#[derive(Debug, Clone, Default)]
pub struct SessionData {
    pub carts: HashMap<i32, Cart>,
    pub last_table_id: Option<i32>,
    pub merchant: Option<MerchantIdentity>,
}

impl SessionData {
    pub fn is_empty(&self) -> bool {
        self.carts.values().all(Cart::is_empty) && self.last_table_id.is_none() && self.merchant.is_none()
    }
}

struct SessionState {
    id: Option<SessionId>,
    data: SessionData,
    modified: bool,
    rotate: bool,
}

/// Pending write-back produced once the handler has run
pub(crate) struct Commit {
    pub previous: Option<SessionId>,
    pub rotate: bool,
    pub data: SessionData,
}

/// Handle to the current request's session, inserted by [`session_layer`]
#[derive(Clone)]
pub struct Session {
    inner: Arc<Mutex<SessionState>>,
}

impl Session {
    pub(crate) fn new(id: Option<SessionId>, data: SessionData) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState {
                id,
                data,
                modified: false,
                rotate: false,
            })),
        }
    }

    pub fn cart(&self, table_id: i32) -> Cart {
        self.inner.lock().data.carts.get(&table_id).cloned().unwrap_or_default()
    }

    /// Mutate the cart for `table_id`; carts left empty are dropped
    pub fn update_cart<R>(&self, table_id: i32, f: impl FnOnce(&mut Cart) -> R) -> R {
        let mut state = self.inner.lock();
        let cart = state.data.carts.entry(table_id).or_default();
        let result = f(cart);
        if cart.is_empty() {
            state.data.carts.remove(&table_id);
        }
        state.modified = true;
        result
    }

    pub fn clear_cart(&self, table_id: i32) {
        let mut state = self.inner.lock();
        if state.data.carts.remove(&table_id).is_some() {
            state.modified = true;
        }
    }

    pub fn last_table_id(&self) -> Option<i32> {
        self.inner.lock().data.last_table_id
    }

    pub fn set_last_table_id(&self, table_id: i32) {
        let mut state = self.inner.lock();
        if state.data.last_table_id != Some(table_id) {
            state.data.last_table_id = Some(table_id);
            state.modified = true;
        }
    }

    pub fn merchant(&self) -> Option<MerchantIdentity> {
        self.inner.lock().data.merchant.clone()
    }

    /// Record a successful login. The session id is rotated on write-back.
    pub fn log_in(&self, identity: MerchantIdentity) {
        let mut state = self.inner.lock();
        state.data.merchant = Some(identity);
        state.modified = true;
        state.rotate = true;
    }

    /// Drop all session data, carts included
    pub fn flush(&self) {
        let mut state = self.inner.lock();
        state.data = SessionData::default();
        state.modified = true;
        state.rotate = true;
    }

    pub(crate) fn commit(&self) -> Option<Commit> {
        let mut state = self.inner.lock();
        if !state.modified {
            return None;
        }
        state.modified = false;

        Some(Commit {
            previous: state.id,
            rotate: state.rotate,
            data: state.data.clone(),
        })
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "Session layer not installed"))
    }
}
