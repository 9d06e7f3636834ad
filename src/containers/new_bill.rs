//! New bill container
//!
//! Drafting a bill takes two steps: a receipt is uploaded first, which
//! reserves the bill id, then the form is submitted. [`NewBillState`]
//! carries what the upload returned until the submission consumes it.

use super::ContainerContext;
use crate::config::UploadConfig;
use crate::core::bill::{BillRecord, BillStatus, DEFAULT_PCT};
use crate::core::error::{BilledError, FieldValidationError, StoreError, ValidationError};
use crate::core::navigation::Route;
use crate::core::store::{ReceiptFile, ReceiptUpload, UploadedReceipt};
use crate::views::NewBillForm;
use validator::Validate;

/// Where a draft stands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NewBillPhase {
    #[default]
    Idle,
    FileAttached,
    Submitting,
}

/// Draft carried between the file change and the submission
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewBillState {
    pub bill_id: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    /// The accepted receipt
    pub file: Option<ReceiptFile>,
    pub phase: NewBillPhase,
}

/// Outcome of [`NewBill::handle_change_file`]
#[derive(Debug, Clone, PartialEq)]
pub enum FileChange {
    Attached(UploadedReceipt),
    /// Not an accepted image; the input is to be cleared
    Rejected(ValidationError),
    UploadFailed(StoreError),
}

/// Outcome of [`NewBill::handle_submit`]
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Saved(BillRecord),
    Invalid(ValidationError),
    Failed(StoreError),
}

pub struct NewBill {
    ctx: ContainerContext,
    uploads: UploadConfig,
    state: NewBillState,
}

impl NewBill {
    pub fn new(ctx: ContainerContext, uploads: UploadConfig) -> Self {
        Self::with_state(ctx, uploads, NewBillState::default())
    }

    /// Resume a draft kept by the host between requests
    pub fn with_state(ctx: ContainerContext, uploads: UploadConfig, state: NewBillState) -> Self {
        Self {
            ctx,
            uploads,
            state,
        }
    }

    pub fn state(&self) -> &NewBillState {
        &self.state
    }

    pub fn into_state(self) -> NewBillState {
        self.state
    }

    fn user_email(&self) -> Result<String, BilledError> {
        Ok(self
            .ctx
            .current_user()?
            .map(|user| user.email)
            .unwrap_or_default())
    }

    /// Validate and upload the selected receipt
    ///
    /// A rejected or failed file leaves the draft as it was.
    pub async fn handle_change_file(
        &mut self,
        file: Option<ReceiptFile>,
    ) -> Result<FileChange, BilledError> {
        let Some(file) = file else {
            return Ok(FileChange::Rejected(ValidationError::MissingFile));
        };

        let accepted = file
            .extension()
            .is_some_and(|ext| self.uploads.allows(&ext));
        if !accepted {
            tracing::warn!(file_name = %file.file_name, "receipt rejected");
            return Ok(FileChange::Rejected(ValidationError::UnsupportedFile {
                file_name: file.file_name,
            }));
        }

        let upload = ReceiptUpload {
            file: file.clone(),
            email: self.user_email()?,
        };
        match self.ctx.store.bills().create(upload).await {
            Ok(receipt) => {
                tracing::debug!(bill_id = %receipt.id, "receipt uploaded");
                self.state.bill_id = Some(receipt.id.clone());
                self.state.file_url = Some(receipt.file_url.clone());
                self.state.file_name = Some(receipt.file_name.clone());
                self.state.file = Some(file);
                self.state.phase = NewBillPhase::FileAttached;
                Ok(FileChange::Attached(receipt))
            }
            Err(err) => {
                tracing::error!(error = %err, "receipt upload failed");
                Ok(FileChange::UploadFailed(err))
            }
        }
    }

    /// Persist the drafted bill and go back to the list
    ///
    /// On rejection the draft keeps its receipt so the form can be sent
    /// again.
    pub async fn handle_submit(&mut self, form: NewBillForm) -> Result<Submission, BilledError> {
        if let Err(errors) = form.validate() {
            return Ok(Submission::Invalid(errors.into()));
        }
        let bill = match self.assemble(form) {
            Ok(bill) => bill,
            Err(err) => return Ok(Submission::Invalid(err)),
        };

        let previous = self.state.phase;
        self.state.phase = NewBillPhase::Submitting;

        match self.ctx.store.bills().update(bill).await {
            Ok(saved) => {
                tracing::info!(bill_id = ?saved.id, "bill submitted");
                self.state = NewBillState::default();
                self.ctx.navigator.navigate(Route::Bills);
                Ok(Submission::Saved(saved))
            }
            Err(err) => {
                tracing::error!(error = %err, "bill submission failed");
                self.state.phase = previous;
                Ok(Submission::Failed(err))
            }
        }
    }

    fn assemble(&self, form: NewBillForm) -> Result<BillRecord, ValidationError> {
        let amount = parse_decimal("amount", &form.amount)?.unwrap_or_default();
        let vat = parse_decimal("vat", &form.vat)?;
        let pct = match form.pct.trim() {
            "" => DEFAULT_PCT,
            raw => raw
                .parse()
                .map_err(|_| invalid_field("pct", "Le pourcentage doit être un entier"))?,
        };
        let email = self
            .user_email()
            .map_err(|e| invalid_field("email", &e.to_string()))?;

        Ok(BillRecord {
            id: self.state.bill_id.clone(),
            expense_type: form.expense_type,
            name: form.expense_name,
            date: form.date,
            amount,
            status: BillStatus::Pending,
            file_url: self.state.file_url.clone(),
            file_name: self.state.file_name.clone(),
            commentary: Some(form.commentary).filter(|c| !c.is_empty()),
            comment_admin: None,
            email,
            vat,
            pct,
        })
    }
}

fn invalid_field(field: &str, message: &str) -> ValidationError {
    ValidationError::FieldErrors(vec![FieldValidationError {
        field: field.to_string(),
        message: message.to_string(),
    }])
}

/// French forms use a comma as decimal separator
fn parse_decimal(field: &str, raw: &str) -> Result<Option<f64>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.replace(',', ".")
        .parse()
        .map(Some)
        .map_err(|_| invalid_field(field, "Nombre invalide"))
}
