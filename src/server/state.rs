//! Shared state of the HTTP shell

use crate::config::AppConfig;
use crate::containers::{ContainerContext, NewBillState};
use crate::core::error::BilledError;
use crate::core::navigation::RecordingNavigator;
use crate::core::session::SharedSession;
use crate::core::store::Store;
use crate::core::user::User;
use crate::storage::in_memory::InMemoryBills;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Everything the shell keeps for one browser
#[derive(Debug, Default)]
pub struct ClientSession {
    pub session: SharedSession,
    /// Draft of the new bill form
    pub new_bill: NewBillState,
}

impl ClientSession {
    /// Empty session, not yet registered
    pub fn handle() -> ClientHandle {
        Arc::new(Mutex::new(ClientSession::default()))
    }

    /// The connected user, when it is an employee
    pub fn employee(&self) -> Result<Option<User>, BilledError> {
        let session = self
            .session
            .read()
            .map_err(|e| BilledError::Internal(format!("Failed to acquire session lock: {}", e)))?;
        Ok(session.user()?.filter(User::is_employee))
    }
}

/// Handle serializing the requests of one client
pub type ClientHandle = Arc<Mutex<ClientSession>>;

/// Client sessions keyed by cookie value
///
/// Only logged-in clients are registered; anonymous requests work on a
/// throwaway session that is never stored.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    clients: Arc<RwLock<HashMap<Uuid, ClientHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &Uuid) -> Result<Option<ClientHandle>, BilledError> {
        let clients = self.clients.read().map_err(registry_lock_error)?;
        Ok(clients.get(id).cloned())
    }

    /// Keep a session so later requests carrying its cookie find it
    pub fn insert(&self, id: Uuid, handle: ClientHandle) -> Result<(), BilledError> {
        let mut clients = self.clients.write().map_err(registry_lock_error)?;
        clients.insert(id, handle);
        tracing::debug!(session_id = %id, "client session registered");
        Ok(())
    }

    /// Forget a session; returns whether it was registered
    pub fn remove(&self, id: &Uuid) -> Result<bool, BilledError> {
        let mut clients = self.clients.write().map_err(registry_lock_error)?;
        let removed = clients.remove(id).is_some();
        if removed {
            tracing::debug!(session_id = %id, "client session removed");
        }
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.clients.read().map(|c| c.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn registry_lock_error<T>(e: std::sync::PoisonError<T>) -> BilledError {
    BilledError::Internal(format!("Failed to acquire session registry lock: {}", e))
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
    pub sessions: SessionRegistry,
    /// Receipt bytes, when the store keeps them in process
    pub receipts: Option<Arc<InMemoryBills>>,
}

impl AppState {
    /// Context for a container acting on behalf of one client
    ///
    /// The navigator is returned alongside so the handler can turn the
    /// requested route into a redirect.
    pub fn context(&self, session: &SharedSession) -> (ContainerContext, Arc<RecordingNavigator>) {
        let navigator = Arc::new(RecordingNavigator::new());
        let ctx = ContainerContext::new(navigator.clone(), self.store.clone(), session.clone());
        (ctx, navigator)
    }
}
