//! HTML view renderers
//!
//! Every renderer is a pure function from its input to an HTML string. The
//! markup lives in Tera templates compiled into the binary; interpolated
//! values are escaped by Tera's autoescape.

pub mod bills;
pub mod new_bill;

pub use bills::{BillRow, BillsPage, bills_ui};
pub use new_bill::{EXPENSE_TYPES, NewBillForm, NewBillView, new_bill_ui};

use crate::core::error::ViewError;
use std::sync::LazyLock;
use tera::{Context, Tera};

/// Height of the vertical navigation bar, in viewport units
const LAYOUT_HEIGHT: u32 = 120;
/// Width of the receipt preview inside the modal, in pixels
const RECEIPT_IMAGE_WIDTH: u32 = 500;

static TEMPLATES: LazyLock<Result<Tera, String>> = LazyLock::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        (
            "vertical_layout.html",
            include_str!("templates/vertical_layout.html"),
        ),
        ("loading.html", include_str!("templates/loading.html")),
        ("error.html", include_str!("templates/error.html")),
        ("bills.html", include_str!("templates/bills.html")),
        ("new_bill.html", include_str!("templates/new_bill.html")),
        ("login.html", include_str!("templates/login.html")),
        (
            "receipt_modal.html",
            include_str!("templates/receipt_modal.html"),
        ),
    ])
    .map_err(|e| e.to_string())?;
    Ok(tera)
});

/// Navigation entry highlighted in the vertical layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveIcon {
    Bills,
    NewBill,
    None,
}

impl ActiveIcon {
    fn as_str(&self) -> &'static str {
        match self {
            ActiveIcon::Bills => "bills",
            ActiveIcon::NewBill => "new_bill",
            ActiveIcon::None => "",
        }
    }
}

/// Context carrying what the shared layout needs
pub(crate) fn layout_context(active: ActiveIcon) -> Context {
    let mut context = Context::new();
    context.insert("active", active.as_str());
    context.insert("layout_height", &LAYOUT_HEIGHT);
    context
}

pub(crate) fn render(template: &str, context: &Context) -> Result<String, ViewError> {
    let tera = TEMPLATES.as_ref().map_err(|message| ViewError::Templates {
        message: message.clone(),
    })?;
    tera.render(template, context).map_err(|source| ViewError::Render {
        template: template.to_string(),
        source,
    })
}

/// Placeholder shown while the bills are being fetched
pub fn loading_page() -> Result<String, ViewError> {
    render("loading.html", &layout_context(ActiveIcon::Bills))
}

/// Page-level error display
pub fn error_page(message: &str) -> Result<String, ViewError> {
    let mut context = layout_context(ActiveIcon::None);
    context.insert("message", message);
    render("error.html", &context)
}

/// Login page with the employee and admin forms
pub fn login_ui(error: Option<&str>) -> Result<String, ViewError> {
    let mut context = Context::new();
    context.insert("error", &error);
    render("login.html", &context)
}

/// Receipt preview opened from a bill's eye icon
///
/// A missing, empty or `"null"` URL shows the "no document" placeholder.
pub fn receipt_modal(bill_url: Option<&str>) -> Result<String, ViewError> {
    let bill_url = bill_url
        .map(str::trim)
        .filter(|url| !url.is_empty() && *url != "null");
    let mut context = Context::new();
    context.insert("bill_url", &bill_url);
    context.insert("image_width", &RECEIPT_IMAGE_WIDTH);
    render("receipt_modal.html", &context)
}
