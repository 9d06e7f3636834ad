//! In-memory store for development and testing

use crate::core::bill::BillRecord;
use crate::core::error::StoreError;
use crate::core::store::{BillsStore, ReceiptFile, ReceiptUpload, Store, UploadedReceipt, UsersStore};
use crate::core::user::User;
use async_trait::async_trait;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

const BACKEND: &str = "in-memory";

/// Characters a file name cannot carry raw inside one URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn lock_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::ServerError {
        message: format!("Failed to acquire lock: {}", e),
    }
}

/// Bills kept in store order, plus the uploaded receipts
pub struct InMemoryBills {
    records: RwLock<Vec<BillRecord>>,
    receipts: RwLock<HashMap<String, ReceiptFile>>,
    receipt_base_url: String,
}

impl InMemoryBills {
    fn new(receipt_base_url: &str) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            receipts: RwLock::new(HashMap::new()),
            receipt_base_url: receipt_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Uploaded receipt reserved under `id`
    pub fn receipt(&self, id: &str) -> Result<Option<ReceiptFile>, StoreError> {
        let receipts = self.receipts.read().map_err(lock_error)?;
        Ok(receipts.get(id).cloned())
    }
}

#[async_trait]
impl BillsStore for InMemoryBills {
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError> {
        let records = self.records.read().map_err(lock_error)?;
        Ok(records.clone())
    }

    async fn create(&self, upload: ReceiptUpload) -> Result<UploadedReceipt, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        let file_name = upload.file.file_name.clone();
        let file_url = format!(
            "{}/receipts/{}/{}",
            self.receipt_base_url,
            id,
            utf8_percent_encode(&file_name, PATH_SEGMENT)
        );

        let mut receipts = self.receipts.write().map_err(lock_error)?;
        receipts.insert(id.clone(), upload.file);

        tracing::debug!(backend = BACKEND, bill_id = %id, owner = %upload.email, "receipt stored");

        Ok(UploadedReceipt {
            id,
            file_url,
            file_name,
        })
    }

    async fn update(&self, mut bill: BillRecord) -> Result<BillRecord, StoreError> {
        let id = bill
            .id
            .get_or_insert_with(|| Uuid::new_v4().simple().to_string())
            .clone();

        let mut records = self.records.write().map_err(lock_error)?;
        match records.iter_mut().find(|r| r.id.as_deref() == Some(id.as_str())) {
            Some(existing) => *existing = bill.clone(),
            None => records.push(bill.clone()),
        }

        Ok(bill)
    }
}

/// Accounts keyed by email
#[derive(Default)]
pub struct InMemoryUsers {
    users: RwLock<HashMap<String, User>>,
}

#[async_trait]
impl UsersStore for InMemoryUsers {
    async fn login(&self, email: &str, password: &str) -> Result<String, StoreError> {
        let users = self.users.read().map_err(lock_error)?;
        let user = users.get(email).ok_or_else(|| StoreError::NotFound {
            message: format!("Utilisateur '{}' introuvable", email),
        })?;

        if user.password.as_deref() != Some(password) {
            return Err(StoreError::Rejected {
                message: "Mot de passe incorrect".to_string(),
            });
        }

        Ok(format!("jwt-{}", Uuid::new_v4().simple()))
    }

    async fn create(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().map_err(lock_error)?;
        if users.contains_key(&user.email) {
            return Err(StoreError::Rejected {
                message: format!("Utilisateur '{}' déjà existant", user.email),
            });
        }
        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }
}

/// Store backed by process memory
///
/// Uses RwLock for thread-safe access; receipts are addressed under
/// `{receipt_base_url}/receipts/{id}/{file_name}`.
#[derive(Clone)]
pub struct InMemoryStore {
    bills: Arc<InMemoryBills>,
    users: Arc<InMemoryUsers>,
}

impl InMemoryStore {
    pub fn new(receipt_base_url: &str) -> Self {
        Self {
            bills: Arc::new(InMemoryBills::new(receipt_base_url)),
            users: Arc::new(InMemoryUsers::default()),
        }
    }

    /// Insert records as-is, in order
    pub fn seed(&self, bills: Vec<BillRecord>) -> Result<(), StoreError> {
        let mut records = self.bills.records.write().map_err(lock_error)?;
        records.extend(bills);
        Ok(())
    }

    /// Direct access to the receipts, for serving them back
    pub fn receipts(&self) -> Arc<InMemoryBills> {
        self.bills.clone()
    }
}

impl Store for InMemoryStore {
    fn bills(&self) -> Arc<dyn BillsStore> {
        self.bills.clone()
    }

    fn users(&self) -> Arc<dyn UsersStore> {
        self.users.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::user::UserType;
    use crate::storage::fixtures;

    fn store() -> InMemoryStore {
        InMemoryStore::new("http://localhost:5678/")
    }

    #[tokio::test]
    async fn test_seed_and_list_keep_order() {
        let store = store();
        store.seed(fixtures::bills()).unwrap();

        let bills = store.bills().list().await.unwrap();
        let ids: Vec<_> = bills.iter().filter_map(|b| b.id.clone()).collect();
        let expected: Vec<_> = fixtures::bills().into_iter().filter_map(|b| b.id).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_create_stores_receipt() {
        let store = store();
        let uploaded = store
            .bills()
            .create(ReceiptUpload {
                file: ReceiptFile::new("test.jpg", "image/jpeg", b"test".to_vec()),
                email: "employee@test.tld".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(uploaded.file_name, "test.jpg");
        assert_eq!(
            uploaded.file_url,
            format!("http://localhost:5678/receipts/{}/test.jpg", uploaded.id)
        );

        let receipt = store.receipts().receipt(&uploaded.id).unwrap().unwrap();
        assert_eq!(receipt.bytes, b"test");
    }

    #[tokio::test]
    async fn test_receipt_url_encodes_file_name() {
        let store = store();
        let uploaded = store
            .bills()
            .create(ReceiptUpload {
                file: ReceiptFile::new("note #1?.jpg", "image/jpeg", b"test".to_vec()),
                email: "employee@test.tld".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(uploaded.file_name, "note #1?.jpg");
        assert!(uploaded.file_url.ends_with("/note%20%231%3F.jpg"));
    }

    #[tokio::test]
    async fn test_update_assigns_id_then_replaces() {
        let store = store();
        let mut bill = fixtures::bills().remove(0);
        bill.id = None;

        let saved = store.bills().update(bill).await.unwrap();
        let id = saved.id.clone().unwrap();
        assert!(!id.is_empty());

        let mut renamed = saved.clone();
        renamed.name = "renamed".to_string();
        store.bills().update(renamed).await.unwrap();

        let bills = store.bills().list().await.unwrap();
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].id.as_deref(), Some(id.as_str()));
        assert_eq!(bills[0].name, "renamed");
    }

    #[tokio::test]
    async fn test_login_flow() {
        let store = store();
        let users = store.users();

        let err = users.login("a@a", "pw").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        users
            .create(User::connected(UserType::Employee, "a@a", "pw"))
            .await
            .unwrap();
        assert!(users.login("a@a", "pw").await.unwrap().starts_with("jwt-"));

        let err = users.login("a@a", "wrong").await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected { .. }));

        let err = users
            .create(User::connected(UserType::Employee, "a@a", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected { .. }));
    }
}
