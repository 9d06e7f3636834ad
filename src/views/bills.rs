//! Bills list page

use super::{ActiveIcon, error_page, layout_context, loading_page, render};
use crate::core::bill::BillRecord;
use crate::core::error::ViewError;
use crate::core::format::{FormattedBill, format_bill, sort_by_date_desc};
use serde::Serialize;

/// Input of [`bills_ui`]
#[derive(Debug, Clone, Default)]
pub struct BillsPage {
    pub data: Option<Vec<BillRecord>>,
    pub loading: bool,
    pub error: Option<String>,
}

impl BillsPage {
    pub fn loaded(data: Vec<BillRecord>) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// One table row, every cell already formatted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillRow {
    pub expense_type: String,
    pub name: String,
    pub date: String,
    pub amount: String,
    pub status: String,
    /// Receipt URL bound to the eye icon, empty when none
    pub bill_url: String,
}

impl From<FormattedBill> for BillRow {
    fn from(bill: FormattedBill) -> Self {
        Self {
            expense_type: bill.record.expense_type,
            name: bill.record.name,
            date: bill.formatted_date,
            amount: bill.formatted_amount,
            status: bill.formatted_status,
            bill_url: bill.record.file_url.unwrap_or_default(),
        }
    }
}

/// Rows in display order: most recent first, formatted
pub fn bill_rows(data: &[BillRecord]) -> Vec<BillRow> {
    let mut sorted = data.to_vec();
    sort_by_date_desc(&mut sorted);
    sorted
        .into_iter()
        .map(|bill| BillRow::from(format_bill(bill)))
        .collect()
}

/// Render the bills page
///
/// `loading` wins over `error`, which wins over `data`.
pub fn bills_ui(page: &BillsPage) -> Result<String, ViewError> {
    if page.loading {
        return loading_page();
    }
    if let Some(message) = &page.error {
        return error_page(message);
    }

    let rows = page.data.as_deref().map(bill_rows).unwrap_or_default();

    let mut context = layout_context(ActiveIcon::Bills);
    context.insert("bills", &rows);
    render("bills.html", &context)
}
