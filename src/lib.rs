//! # Billed
//!
//! Employee side of the Billed expense-report application, rendered on the
//! server.
//!
//! ## Features
//!
//! - **Bills list**: an employee's expense reports, most recent first, with
//!   a receipt preview per line
//! - **New bill form**: receipt upload followed by the bill submission
//! - **Login / logout**: employee and admin forms, accounts created on the
//!   first login
//! - **Pluggable store**: the remote store is a trait; an in-memory one and
//!   a scriptable mock ship with the crate
//! - **Configuration-Based**: listener, store and upload rules from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use billed::prelude::*;
//!
//! let store = InMemoryStore::new("http://localhost:5678");
//! store.seed(billed::storage::fixtures::bills())?;
//!
//! ServerBuilder::new()
//!     .with_config(AppConfig::default())
//!     .with_in_memory_store(store)
//!     .serve()
//!     .await?;
//! ```
//!
//! ## Layout
//!
//! - [`views`]: pure HTML renderers
//! - [`containers`]: data fetching and event handling behind each view
//! - [`server`]: the axum shell binding routes to containers

pub mod config;
pub mod containers;
pub mod core;
pub mod server;
pub mod storage;
pub mod views;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        bill::{BillRecord, BillStatus},
        error::{BilledError, BilledResult, StoreError, ValidationError},
        format::{FormattedBill, format_amount, format_bill, format_date, format_status},
        navigation::{Navigator, RecordingNavigator, Route},
        session::{Session, SharedSession},
        store::{BillsStore, ReceiptFile, ReceiptUpload, Store, UploadedReceipt, UsersStore},
        user::{User, UserType},
    };

    // === Containers ===
    pub use crate::containers::{
        Bills, ContainerContext, FileChange, Login, LoginForm, LoginOutcome, Logout, NewBill,
        NewBillPhase, NewBillState, Submission,
    };

    // === Views ===
    pub use crate::views::{BillsPage, NewBillForm, NewBillView, bills_ui, new_bill_ui};

    // === Storage ===
    pub use crate::storage::{InMemoryStore, MockStore};

    // === Config ===
    pub use crate::config::{AppConfig, ServerConfig, StoreConfig, UploadConfig};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}
