//! Containers bind a view to its data fetching and event handling
//!
//! Each container is built from a [`ContainerContext`] holding everything
//! it may touch: the navigator, the store and the client's session. The
//! host decides which events reach which container method.

pub mod bills;
pub mod login;
pub mod logout;
pub mod new_bill;

pub use bills::Bills;
pub use login::{Login, LoginForm, LoginOutcome};
pub use logout::Logout;
pub use new_bill::{FileChange, NewBill, NewBillPhase, NewBillState, Submission};

use crate::core::error::BilledError;
use crate::core::navigation::Navigator;
use crate::core::session::{Session, SharedSession};
use crate::core::store::Store;
use crate::core::user::User;
use std::sync::{Arc, RwLockReadGuard, RwLockWriteGuard};

/// Collaborators handed to every container
#[derive(Clone)]
pub struct ContainerContext {
    pub navigator: Arc<dyn Navigator>,
    pub store: Arc<dyn Store>,
    pub session: SharedSession,
}

impl ContainerContext {
    pub fn new(
        navigator: Arc<dyn Navigator>,
        store: Arc<dyn Store>,
        session: SharedSession,
    ) -> Self {
        Self {
            navigator,
            store,
            session,
        }
    }

    pub(crate) fn session(&self) -> Result<RwLockReadGuard<'_, Session>, BilledError> {
        self.session
            .read()
            .map_err(|e| BilledError::Internal(format!("Failed to acquire session lock: {}", e)))
    }

    pub(crate) fn session_mut(&self) -> Result<RwLockWriteGuard<'_, Session>, BilledError> {
        self.session
            .write()
            .map_err(|e| BilledError::Internal(format!("Failed to acquire session lock: {}", e)))
    }

    /// The connected user, if the session holds one
    pub fn current_user(&self) -> Result<Option<User>, BilledError> {
        Ok(self.session()?.user()?)
    }
}
