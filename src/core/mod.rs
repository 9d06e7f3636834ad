//! Core module containing the data model, store contract and formatters

pub mod bill;
pub mod error;
pub mod format;
pub mod navigation;
pub mod session;
pub mod store;
pub mod user;

pub use bill::{BillRecord, BillStatus};
pub use error::{BilledError, BilledResult, StoreError, ValidationError};
pub use format::{FormattedBill, format_bill, format_date, format_status};
pub use navigation::{Navigator, RecordingNavigator, Route};
pub use session::{Session, SharedSession};
pub use store::{BillsStore, ReceiptFile, ReceiptUpload, Store, UploadedReceipt, UsersStore};
pub use user::{User, UserType};
