//! Bill records as exchanged with the store

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Default tax percentage applied when none is given
pub const DEFAULT_PCT: u32 = 20;

/// Review status of a bill
///
/// The employee views only ever write [`BillStatus::Pending`]; the other
/// states are set by an administrator. Codes this crate does not know are
/// kept verbatim in [`BillStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    #[default]
    Pending,
    Accepted,
    Refused,
    #[serde(untagged)]
    Other(String),
}

impl BillStatus {
    /// Raw status code as stored
    pub fn code(&self) -> &str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Accepted => "accepted",
            BillStatus::Refused => "refused",
            BillStatus::Other(code) => code,
        }
    }
}

impl From<&str> for BillStatus {
    fn from(code: &str) -> Self {
        match code {
            "pending" => BillStatus::Pending,
            "accepted" => BillStatus::Accepted,
            "refused" => BillStatus::Refused,
            other => BillStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An expense-report line item submitted by an employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRecord {
    /// Store-assigned identifier, absent until the first create/update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Expense category ("Transports", "Hôtel et logement", ...)
    #[serde(rename = "type")]
    pub expense_type: String,

    pub name: String,

    /// Raw ISO date as stored, formatted only for display
    pub date: String,

    pub amount: f64,

    #[serde(default)]
    pub status: BillStatus,

    #[serde(default)]
    pub file_url: Option<String>,

    #[serde(default)]
    pub file_name: Option<String>,

    #[serde(default)]
    pub commentary: Option<String>,

    #[serde(default)]
    pub comment_admin: Option<String>,

    #[serde(default)]
    pub email: String,

    #[serde(default, deserialize_with = "number_or_string")]
    pub vat: Option<f64>,

    #[serde(default = "default_pct", deserialize_with = "pct_or_default")]
    pub pct: u32,
}

fn default_pct() -> u32 {
    DEFAULT_PCT
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// The remote store keeps tax fields as strings; accept both shapes
fn number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrString>::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

fn pct_or_default<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let pct = number_or_string(deserializer)?
        .filter(|p| p.is_finite() && *p > 0.0)
        .map(|p| p as u32)
        .unwrap_or(DEFAULT_PCT);
    Ok(pct)
}
