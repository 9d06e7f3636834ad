//! Route table of the shell

use super::handlers::{
    admin_dashboard, api_bills, bills_page, change_file, click_new_bill, health_check,
    login_admin, login_employee, login_page, logout, new_bill_page, receipt_file, receipt_modal,
    submit_new_bill,
};
use super::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Build every route of the application
///
/// - GET /                                    - Login page
/// - POST /login/employee, /login/admin       - Login forms
/// - POST /logout                             - Disconnect
/// - GET /employee/bills                      - Bills list
/// - POST /employee/bills/new                 - "Nouvelle note de frais" button
/// - GET /employee/bills/receipt?bill_url=    - Receipt modal fragment
/// - GET /employee/bill/new                   - New bill form
/// - POST /employee/bill/new/file             - Receipt upload (multipart)
/// - POST /employee/bill/new                  - New bill submission
/// - GET /api/bills                           - Formatted bills as JSON
/// - GET /receipts/{id}/{file_name}           - Uploaded receipt bytes
/// - GET /admin/dashboard                     - Placeholder
/// - GET /health                              - Health probe
pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(login_page))
        .route("/login/employee", post(login_employee))
        .route("/login/admin", post(login_admin))
        .route("/logout", post(logout))
        .route("/employee/bills", get(bills_page))
        .route("/employee/bills/new", post(click_new_bill))
        .route("/employee/bills/receipt", get(receipt_modal))
        .route("/employee/bill/new", get(new_bill_page).post(submit_new_bill))
        .route("/employee/bill/new/file", post(change_file))
        .route("/api/bills", get(api_bills))
        .route("/receipts/{id}/{file_name}", get(receipt_file))
        .route("/admin/dashboard", get(admin_dashboard))
        .route("/health", get(health_check))
        .with_state(state)
}
