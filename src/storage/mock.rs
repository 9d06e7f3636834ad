//! Scriptable store for tests
//!
//! Answers like the remote store does in development: the fixture bills on
//! `list`, a fixed receipt on `create`, and the submitted bill on `update`.
//! Each call can be made to fail instead.

use crate::core::bill::BillRecord;
use crate::core::error::StoreError;
use crate::core::store::{BillsStore, ReceiptUpload, Store, UploadedReceipt, UsersStore};
use crate::core::user::User;
use crate::storage::fixtures;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct Failures {
    list: Option<StoreError>,
    create: Option<StoreError>,
    update: Option<StoreError>,
    login: Option<StoreError>,
}

#[derive(Default)]
struct Calls {
    uploads: Vec<ReceiptUpload>,
    updates: Vec<BillRecord>,
    created_users: Vec<User>,
}

struct MockState {
    bills: Mutex<Vec<BillRecord>>,
    receipt: UploadedReceipt,
    failures: Mutex<Failures>,
    calls: Mutex<Calls>,
}

// A panicking test must not cascade into every later assertion
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct MockBills(Arc<MockState>);

#[async_trait]
impl BillsStore for MockBills {
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError> {
        match &lock(&self.0.failures).list {
            Some(err) => Err(err.clone()),
            None => Ok(lock(&self.0.bills).clone()),
        }
    }

    async fn create(&self, upload: ReceiptUpload) -> Result<UploadedReceipt, StoreError> {
        lock(&self.0.calls).uploads.push(upload);
        match &lock(&self.0.failures).create {
            Some(err) => Err(err.clone()),
            None => Ok(self.0.receipt.clone()),
        }
    }

    async fn update(&self, bill: BillRecord) -> Result<BillRecord, StoreError> {
        lock(&self.0.calls).updates.push(bill.clone());
        match &lock(&self.0.failures).update {
            Some(err) => Err(err.clone()),
            None => Ok(bill),
        }
    }
}

struct MockUsers(Arc<MockState>);

#[async_trait]
impl UsersStore for MockUsers {
    async fn login(&self, email: &str, _password: &str) -> Result<String, StoreError> {
        match &lock(&self.0.failures).login {
            Some(err) => Err(err.clone()),
            None => Ok(format!("jwt-{}", email)),
        }
    }

    async fn create(&self, user: User) -> Result<User, StoreError> {
        lock(&self.0.calls).created_users.push(user.clone());
        Ok(user)
    }
}

/// Builder-style mock implementing [`Store`]
pub struct MockStore {
    bills: Arc<MockBills>,
    users: Arc<MockUsers>,
    state: Arc<MockState>,
    bills_calls: AtomicUsize,
}

impl MockStore {
    pub fn new() -> Self {
        let state = Arc::new(MockState {
            bills: Mutex::new(fixtures::bills()),
            receipt: UploadedReceipt {
                id: "1234".to_string(),
                file_url: "https://localhost:3456/images/test.jpg".to_string(),
                file_name: "test.jpg".to_string(),
            },
            failures: Mutex::new(Failures::default()),
            calls: Mutex::new(Calls::default()),
        });
        Self {
            bills: Arc::new(MockBills(state.clone())),
            users: Arc::new(MockUsers(state.clone())),
            state,
            bills_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_bills(self, bills: Vec<BillRecord>) -> Self {
        *lock(&self.state.bills) = bills;
        self
    }

    pub fn failing_list(self, err: StoreError) -> Self {
        lock(&self.state.failures).list = Some(err);
        self
    }

    pub fn failing_create(self, err: StoreError) -> Self {
        lock(&self.state.failures).create = Some(err);
        self
    }

    pub fn failing_update(self, err: StoreError) -> Self {
        lock(&self.state.failures).update = Some(err);
        self
    }

    pub fn failing_login(self, err: StoreError) -> Self {
        lock(&self.state.failures).login = Some(err);
        self
    }

    /// Number of times [`Store::bills`] was called
    pub fn bills_calls(&self) -> usize {
        self.bills_calls.load(Ordering::SeqCst)
    }

    /// Bills passed to `update`, in call order
    pub fn updates(&self) -> Vec<BillRecord> {
        lock(&self.state.calls).updates.clone()
    }

    /// Names of the files passed to `create`, in call order
    pub fn uploaded_file_names(&self) -> Vec<String> {
        lock(&self.state.calls)
            .uploads
            .iter()
            .map(|u| u.file.file_name.clone())
            .collect()
    }

    /// Users passed to `create`
    pub fn created_users(&self) -> Vec<User> {
        lock(&self.state.calls).created_users.clone()
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MockStore {
    fn bills(&self) -> Arc<dyn BillsStore> {
        self.bills_calls.fetch_add(1, Ordering::SeqCst);
        self.bills.clone()
    }

    fn users(&self) -> Arc<dyn UsersStore> {
        self.users.clone()
    }
}
