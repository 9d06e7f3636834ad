//! Display formatting for bill fields
//!
//! Dates are shown as `04 Apr. 04`, statuses with their French label and
//! amounts with a euro suffix. Date formatting is the only fallible step;
//! [`format_bill`] recovers from it by keeping the raw string.

use crate::core::bill::{BillRecord, BillStatus};
use crate::core::error::FormatError;
use chrono::{DateTime, NaiveDate};
use serde::Serialize;

/// Parse the calendar date of a raw bill date
///
/// Accepts `YYYY-MM-DD` and RFC 3339 timestamps (the date part is kept).
pub fn parse_date(raw: &str) -> Result<NaiveDate, FormatError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|dt| dt.date_naive()))
        .map_err(|_| FormatError::InvalidDate {
            raw: raw.to_string(),
        })
}

/// `2004-04-04` → `04 Apr. 04`
pub fn format_date(raw: &str) -> Result<String, FormatError> {
    Ok(parse_date(raw)?.format("%d %b. %y").to_string())
}

/// Employee-facing label of a status; unknown codes pass through
pub fn format_status(status: &BillStatus) -> String {
    match status {
        BillStatus::Pending => "En attente".to_string(),
        BillStatus::Accepted => "Accepté".to_string(),
        BillStatus::Refused => "Refusé".to_string(),
        BillStatus::Other(code) => code.clone(),
    }
}

/// `400.0` → `400 €`, `12.5` → `12.50 €`
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0} €", amount)
    } else {
        format!("{:.2} €", amount)
    }
}

/// A bill ready for display, next to the record it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedBill {
    #[serde(flatten)]
    pub record: BillRecord,
    pub formatted_date: String,
    pub formatted_status: String,
    pub formatted_amount: String,
}

/// Format one record, falling back to the raw date when it does not parse
pub fn format_bill(record: BillRecord) -> FormattedBill {
    let formatted_date = match format_date(&record.date) {
        Ok(date) => date,
        Err(e) => {
            tracing::warn!(
                error = %e,
                bill_id = record.id.as_deref().unwrap_or("-"),
                "keeping raw date for corrupted bill"
            );
            record.date.clone()
        }
    };

    FormattedBill {
        formatted_status: format_status(&record.status),
        formatted_amount: format_amount(record.amount),
        formatted_date,
        record,
    }
}

/// Stable sort, most recent first; unparsable dates go last
pub fn sort_by_date_desc(bills: &mut [BillRecord]) {
    bills.sort_by_cached_key(|bill| std::cmp::Reverse(parse_date(&bill.date).ok()));
}
