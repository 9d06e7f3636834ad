//! New bill form

use super::{ActiveIcon, layout_context, render};
use crate::core::error::ViewError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

/// Expense categories offered by the form
pub const EXPENSE_TYPES: &[&str] = &[
    "Transports",
    "Restaurants et bars",
    "Hôtel et logement",
    "Services en ligne",
    "IT et électronique",
    "Equipement et matériel",
    "Fournitures de bureau",
];

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+([.,]\d{1,2})?$").unwrap());
static OPTIONAL_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+([.,]\d+)?)?$").unwrap());
static OPTIONAL_PCT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,3})?$").unwrap());

/// Fields of the new bill form, as posted
///
/// Values stay strings so that a rejected submission can be echoed back
/// into the form unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NewBillForm {
    #[validate(length(min = 1, message = "Le type de dépense est requis"))]
    pub expense_type: String,

    pub expense_name: String,

    #[validate(regex(path = *ISO_DATE, message = "La date doit être au format AAAA-MM-JJ"))]
    pub date: String,

    #[validate(regex(path = *AMOUNT, message = "Le montant doit être un nombre positif"))]
    pub amount: String,

    #[validate(regex(path = *OPTIONAL_NUMBER, message = "La TVA doit être un nombre"))]
    pub vat: String,

    #[validate(regex(path = *OPTIONAL_PCT, message = "Le pourcentage doit être un entier"))]
    pub pct: String,

    pub commentary: String,
}

/// Input of [`new_bill_ui`]
#[derive(Debug, Clone, Default)]
pub struct NewBillView {
    pub values: NewBillForm,
    /// Name of the receipt already attached
    pub attached_file_name: Option<String>,
    pub file_error: Option<String>,
    pub submit_error: Option<String>,
    /// Extensions listed in the file input's `accept`
    pub allowed_extensions: Vec<String>,
}

/// Render the new bill page
///
/// The file input is always rendered empty, which is how a rejected
/// receipt gets cleared.
pub fn new_bill_ui(view: &NewBillView) -> Result<String, ViewError> {
    let accept = view
        .allowed_extensions
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",");

    let mut context = layout_context(ActiveIcon::NewBill);
    context.insert("expense_types", EXPENSE_TYPES);
    context.insert("values", &view.values);
    context.insert("attached_file_name", &view.attached_file_name);
    context.insert("file_error", &view.file_error);
    context.insert("submit_error", &view.submit_error);
    context.insert("accept", &accept);
    render("new_bill.html", &context)
}
