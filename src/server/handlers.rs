//! HTTP handlers binding routes to containers
//!
//! Every handler holds its client's session for the whole request, so the
//! requests of one browser run one after the other. When a container
//! navigates, the handler answers `303 See Other` to the route's path.
//!
//! Sessions are registered on a successful login and dropped on logout or
//! on a refused login.

use super::client::Client;
use super::state::AppState;
use crate::containers::{
    Bills, FileChange, Login, LoginForm, LoginOutcome, Logout, NewBill, NewBillState, Submission,
};
use crate::core::error::{BilledError, ErrorResponse, StoreError, ValidationError};
use crate::core::navigation::{RecordingNavigator, Route};
use crate::core::store::ReceiptFile;
use crate::core::user::UserType;
use crate::views::{self, NewBillForm, NewBillView, bills_ui, new_bill_ui};
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::{Value, json};

/// Redirect to the route the container asked for
fn follow(navigator: &RecordingNavigator, fallback: Route) -> Redirect {
    Redirect::to(navigator.take().unwrap_or(fallback).path())
}

fn login_required() -> Redirect {
    Redirect::to(Route::Login.path())
}

// =============================================================================
// Login / logout
// =============================================================================

pub async fn login_page(client: Client) -> Result<Response, BilledError> {
    let html = views::login_ui(None)?;
    Ok(client.finish(Html(html)))
}

pub async fn login_employee(
    State(state): State<AppState>,
    client: Client,
    Form(form): Form<LoginForm>,
) -> Result<Response, BilledError> {
    login(state, client, form, UserType::Employee).await
}

pub async fn login_admin(
    State(state): State<AppState>,
    client: Client,
    Form(form): Form<LoginForm>,
) -> Result<Response, BilledError> {
    login(state, client, form, UserType::Admin).await
}

async fn login(
    state: AppState,
    mut client: Client,
    form: LoginForm,
    user_type: UserType,
) -> Result<Response, BilledError> {
    let mut guard = client.lock().await;
    let (ctx, navigator) = state.context(&guard.session);
    let container = Login::new(ctx);

    let outcome = match user_type {
        UserType::Employee => container.handle_submit_employee(form).await?,
        UserType::Admin => container.handle_submit_admin(form).await?,
    };

    let message = match outcome {
        LoginOutcome::Connected(_) => {
            guard.new_bill = NewBillState::default();
            client.register()?;
            return Ok(client.finish(follow(&navigator, Route::Bills)));
        }
        LoginOutcome::Invalid(err) => err.to_string(),
        LoginOutcome::Refused(err) => {
            // the container already emptied the session
            client.end()?;
            err.to_string()
        }
    };
    let html = views::login_ui(Some(&message))?;
    Ok(client.finish(Html(html)))
}

pub async fn logout(
    State(state): State<AppState>,
    mut client: Client,
) -> Result<Response, BilledError> {
    let mut guard = client.lock().await;
    let (ctx, navigator) = state.context(&guard.session);

    Logout::new(ctx).handle_click()?;
    guard.new_bill = NewBillState::default();
    client.end()?;

    Ok(client.finish(follow(&navigator, Route::Login)))
}

/// The admin dashboard is served by another application
pub async fn admin_dashboard() -> Result<Response, BilledError> {
    let html = views::error_page("Le tableau de bord administrateur n'est pas disponible ici")?;
    Ok((StatusCode::NOT_IMPLEMENTED, Html(html)).into_response())
}

// =============================================================================
// Bills
// =============================================================================

pub async fn bills_page(
    State(state): State<AppState>,
    client: Client,
) -> Result<Response, BilledError> {
    let guard = client.lock().await;
    if guard.employee()?.is_none() {
        return Ok(client.finish(login_required()));
    }

    let (ctx, _) = state.context(&guard.session);
    let page = Bills::new(ctx).page().await;
    let html = bills_ui(&page)?;
    Ok(client.finish(Html(html)))
}

pub async fn click_new_bill(
    State(state): State<AppState>,
    client: Client,
) -> Result<Response, BilledError> {
    let guard = client.lock().await;
    if guard.employee()?.is_none() {
        return Ok(client.finish(login_required()));
    }

    let (ctx, navigator) = state.context(&guard.session);
    Bills::new(ctx).handle_click_new_bill();
    Ok(client.finish(follow(&navigator, Route::NewBill)))
}

#[derive(Debug, Deserialize)]
pub struct ReceiptQuery {
    pub bill_url: Option<String>,
}

/// Receipt modal fragment for an eye icon
pub async fn receipt_modal(
    State(state): State<AppState>,
    client: Client,
    Query(query): Query<ReceiptQuery>,
) -> Result<Response, BilledError> {
    let guard = client.lock().await;
    if guard.employee()?.is_none() {
        return Ok(client.finish(login_required()));
    }

    let (ctx, _) = state.context(&guard.session);
    let html = Bills::new(ctx).handle_click_icon_eye(query.bill_url.as_deref())?;
    Ok(client.finish(Html(html)))
}

/// Formatted bills as JSON
pub async fn api_bills(
    State(state): State<AppState>,
    client: Client,
) -> Result<Response, BilledError> {
    let guard = client.lock().await;
    if guard.employee()?.is_none() {
        let body = ErrorResponse {
            code: "UNAUTHORIZED".to_string(),
            message: "Connexion requise".to_string(),
        };
        return Ok(client.finish((StatusCode::UNAUTHORIZED, Json(body))));
    }

    let (ctx, _) = state.context(&guard.session);
    let response = match Bills::new(ctx).get_bills_list().await {
        Ok(bills) => Json(bills).into_response(),
        Err(err) => {
            let err = BilledError::from(err);
            (err.status_code(), Json(err.to_response())).into_response()
        }
    };
    Ok(client.finish(response))
}

// =============================================================================
// New bill
// =============================================================================

fn new_bill_view(state: &AppState, draft: &NewBillState) -> NewBillView {
    NewBillView {
        attached_file_name: draft.file_name.clone(),
        allowed_extensions: state.config.uploads.allowed_extensions.clone(),
        ..NewBillView::default()
    }
}

pub async fn new_bill_page(
    State(state): State<AppState>,
    client: Client,
) -> Result<Response, BilledError> {
    let guard = client.lock().await;
    if guard.employee()?.is_none() {
        return Ok(client.finish(login_required()));
    }

    let html = new_bill_ui(&new_bill_view(&state, &guard.new_bill))?;
    Ok(client.finish(Html(html)))
}

pub async fn change_file(
    State(state): State<AppState>,
    client: Client,
    multipart: Multipart,
) -> Result<Response, BilledError> {
    let mut guard = client.lock().await;
    if guard.employee()?.is_none() {
        return Ok(client.finish(login_required()));
    }

    let file = read_receipt(multipart).await?;
    let (ctx, _) = state.context(&guard.session);
    let draft = std::mem::take(&mut guard.new_bill);
    let mut container = NewBill::with_state(ctx, state.config.uploads.clone(), draft);
    let outcome = container.handle_change_file(file).await;
    guard.new_bill = container.into_state();

    let file_error = match outcome? {
        FileChange::Attached(_) => None,
        FileChange::Rejected(err) => Some(err.to_string()),
        FileChange::UploadFailed(err) => Some(err.to_string()),
    };
    let html = new_bill_ui(&NewBillView {
        file_error,
        ..new_bill_view(&state, &guard.new_bill)
    })?;
    Ok(client.finish(Html(html)))
}

pub async fn submit_new_bill(
    State(state): State<AppState>,
    client: Client,
    Form(form): Form<NewBillForm>,
) -> Result<Response, BilledError> {
    let mut guard = client.lock().await;
    if guard.employee()?.is_none() {
        return Ok(client.finish(login_required()));
    }

    let (ctx, navigator) = state.context(&guard.session);
    let draft = std::mem::take(&mut guard.new_bill);
    let mut container = NewBill::with_state(ctx, state.config.uploads.clone(), draft);
    let outcome = container.handle_submit(form.clone()).await;
    guard.new_bill = container.into_state();

    let submit_error = match outcome? {
        Submission::Saved(_) => return Ok(client.finish(follow(&navigator, Route::Bills))),
        Submission::Invalid(err) => err.to_string(),
        Submission::Failed(err) => err.to_string(),
    };
    let html = new_bill_ui(&NewBillView {
        values: form,
        submit_error: Some(submit_error),
        ..new_bill_view(&state, &guard.new_bill)
    })?;
    Ok(client.finish(Html(html)))
}

fn malformed(e: MultipartError) -> BilledError {
    ValidationError::MalformedUpload {
        message: e.body_text(),
    }
    .into()
}

/// First `file` part of the form; an empty file name means nothing was picked
async fn read_receipt(mut multipart: Multipart) -> Result<Option<ReceiptFile>, BilledError> {
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Ok(None),
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(malformed)?;
        return Ok(Some(ReceiptFile::new(&file_name, &content_type, bytes.to_vec())));
    }
    Ok(None)
}

// =============================================================================
// Receipts and health
// =============================================================================

/// Serve back a receipt kept by the in-memory store
///
/// The media type follows the accepted extension, never the type declared
/// by the uploader.
pub async fn receipt_file(
    State(state): State<AppState>,
    Path((id, file_name)): Path<(String, String)>,
) -> Result<Response, BilledError> {
    let receipt = match &state.receipts {
        Some(receipts) => receipts.receipt(&id)?,
        None => None,
    };
    match receipt {
        Some(file) if file.file_name == file_name => Ok((
            [
                (header::CONTENT_TYPE, file.media_type()),
                (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
            ],
            file.bytes,
        )
            .into_response()),
        _ => Err(StoreError::not_found().into()),
    }
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "billed"
    }))
}
