//! Store contract
//!
//! The remote store is an external collaborator: billed only needs the
//! capabilities below. Implementations live in [`crate::storage`].

use crate::core::bill::BillRecord;
use crate::core::error::StoreError;
use crate::core::user::User;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A receipt selected in the new-bill form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ReceiptFile {
    pub fn new(file_name: &str, content_type: &str, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes: bytes.into(),
        }
    }

    /// Lower-cased extension, if the name has one
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }

    /// Media type to serve the receipt with, from its extension
    pub fn media_type(&self) -> &'static str {
        match self.extension().as_deref() {
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("png") => "image/png",
            _ => "application/octet-stream",
        }
    }
}

/// Payload of a receipt upload
#[derive(Debug, Clone)]
pub struct ReceiptUpload {
    pub file: ReceiptFile,
    /// Owner of the bill being drafted
    pub email: String,
}

/// What the store answers to an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedReceipt {
    /// Identifier reserved for the bill
    #[serde(alias = "key")]
    pub id: String,
    pub file_url: String,
    pub file_name: String,
}

/// Bills capability of the store
#[async_trait]
pub trait BillsStore: Send + Sync {
    /// All bill records, unformatted
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError>;

    /// Upload a receipt and reserve a bill id for it
    async fn create(&self, upload: ReceiptUpload) -> Result<UploadedReceipt, StoreError>;

    /// Persist a bill; records without id get one assigned
    async fn update(&self, bill: BillRecord) -> Result<BillRecord, StoreError>;
}

/// Users capability of the store
#[async_trait]
pub trait UsersStore: Send + Sync {
    /// Authenticate and return a token
    async fn login(&self, email: &str, password: &str) -> Result<String, StoreError>;

    /// Register a new account
    async fn create(&self, user: User) -> Result<User, StoreError>;
}

/// Entry point handed to containers
pub trait Store: Send + Sync {
    fn bills(&self) -> Arc<dyn BillsStore>;
    fn users(&self) -> Arc<dyn UsersStore>;
}
