//! Request handlers: registration, referral links, and the admin dashboard.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::WebError;
use crate::session::SessionId;
use crate::state::AppState;
use crate::templates;
use giveaway_core::{compose_link, generate_token, RegistrationInput, ValidRegistration, ValidationError};
use giveaway_store::{NewRegistrant, Registrant, StoreError};

/// Attempts to re-generate a link token after a collision before giving up.
const LINK_RETRIES: usize = 3;

/// Flash codes carried on redirect query strings.
#[derive(Debug, Deserialize)]
pub struct FlashQuery {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub notice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Debug, Deserialize)]
pub struct CsrfForm {
    #[serde(default)]
    pub csrf_token: String,
}

// =============================================================================
// Public surface
// =============================================================================

/// Handler for the registration form (GET /).
pub async fn home_page(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Query(query): Query<FlashQuery>,
) -> Html<String> {
    let csrf = state.sessions().csrf_token(&session_id);
    let flash = templates::flash_html(query.error.as_deref(), query.notice.as_deref());
    Html(templates::home_page(&csrf, &flash))
}

/// Handler for a registration submission (POST /).
pub async fn register(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    headers: HeaderMap,
    Form(form): Form<RegisterForm>,
) -> Result<Response, WebError> {
    if !state.sessions().csrf_matches(&session_id, &form.csrf_token) {
        tracing::warn!("registration rejected: anti-forgery token mismatch");
        return Ok(flash_redirect("/", "error", "csrf"));
    }

    let input = RegistrationInput {
        name: form.name,
        email: form.email,
        phone: form.phone,
    };
    let valid = match input.validate() {
        Ok(valid) => valid,
        Err(ValidationError::MissingField) => return Ok(flash_redirect("/", "error", "required")),
        Err(ValidationError::InvalidPhone) => return Ok(flash_redirect("/", "error", "phone")),
    };

    // Either matching field counts as "already registered": same link back,
    // no new row, no counter changes.
    if let Some(existing) = state
        .store()
        .find_by_email_or_phone(&valid.email, &valid.phone)
        .await?
    {
        return Ok(Html(templates::link_page(&existing.link, true)).into_response());
    }

    let base = base_url(&headers);
    let registrant = match create_with_fresh_link(&state, &valid, &base).await? {
        CreateOutcome::Created(registrant) => registrant,
        CreateOutcome::AlreadyRegistered(existing) => {
            // Lost a race against a simultaneous identical submission.
            return Ok(Html(templates::link_page(&existing.link, true)).into_response());
        }
        CreateOutcome::GaveUp => return Ok(flash_redirect("/", "error", "retry")),
    };

    // Referral credit runs only on the new-registrant path; the pending
    // token is consumed either way.
    if let Some(token) = state.sessions().take_pending_referral(&session_id) {
        if let Some(referrer) = state
            .store()
            .find_by_link(&compose_link(&base, &token))
            .await?
        {
            state.store().record_referral(referrer.id).await?;
            tracing::info!(
                referrer = referrer.id,
                registrant = registrant.id,
                "referral credited"
            );
        }
    }

    Ok(Html(templates::link_page(&registrant.link, false)).into_response())
}

enum CreateOutcome {
    Created(Registrant),
    AlreadyRegistered(Registrant),
    GaveUp,
}

async fn create_with_fresh_link(
    state: &AppState,
    valid: &ValidRegistration,
    base_url: &str,
) -> Result<CreateOutcome, WebError> {
    for _ in 0..LINK_RETRIES {
        let new = NewRegistrant {
            name: valid.name.clone(),
            email: valid.email.clone(),
            phone: valid.phone.clone(),
            link: compose_link(base_url, &generate_token()),
        };
        match state.store().create(&new).await {
            Ok(registrant) => return Ok(CreateOutcome::Created(registrant)),
            Err(StoreError::Conflict) => {
                // Either a concurrent submission won the email/phone race,
                // or the generated token collided with an existing link.
                if let Some(existing) = state
                    .store()
                    .find_by_email_or_phone(&valid.email, &valid.phone)
                    .await?
                {
                    return Ok(CreateOutcome::AlreadyRegistered(existing));
                }
            }
            Err(err) => return Err(err.into()),
        }
    }
    tracing::warn!("giving up after repeated link token collisions");
    Ok(CreateOutcome::GaveUp)
}

/// Handler for a shareable link visit (GET /{token}).
pub async fn follow_link(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Path(token): Path<String>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let link = compose_link(&base_url(&headers), &token);
    let Some(registrant) = state.store().find_by_link(&link).await? else {
        return Err(WebError::NotFound("invalid link".to_string()));
    };

    state.store().record_view(registrant.id).await?;
    // Last click wins: overwrite any previously pending token.
    state.sessions().set_pending_referral(&session_id, token);
    Ok(Redirect::to("/").into_response())
}

// =============================================================================
// Admin surface
// =============================================================================

/// Handler for the admin login page (GET /admin).
pub async fn admin_login_page(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Query(query): Query<FlashQuery>,
) -> Response {
    // Already authenticated: straight to the dashboard, no re-prompt.
    if state.sessions().is_admin(&session_id) {
        return Redirect::to("/dashboard").into_response();
    }
    let csrf = state.sessions().csrf_token(&session_id);
    let flash = templates::flash_html(query.error.as_deref(), query.notice.as_deref());
    Html(templates::admin_login_page(&csrf, &flash)).into_response()
}

/// Handler for an admin login submission (POST /admin).
pub async fn admin_login(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Form(form): Form<LoginForm>,
) -> Response {
    if !state.sessions().csrf_matches(&session_id, &form.csrf_token) {
        tracing::warn!("admin login rejected: anti-forgery token mismatch");
        return flash_redirect("/admin", "error", "csrf");
    }

    if form.password == state.config().admin.password {
        state.sessions().set_admin(&session_id, true);
        tracing::info!("admin session authenticated");
        Redirect::to("/dashboard").into_response()
    } else {
        tracing::warn!("admin login rejected: wrong password");
        flash_redirect("/admin", "error", "invalid")
    }
}

/// Handler for the admin dashboard (GET /dashboard).
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Query(query): Query<FlashQuery>,
) -> Result<Response, WebError> {
    if !state.sessions().is_admin(&session_id) {
        return Ok(flash_redirect("/admin", "error", "login_required"));
    }

    let registrants = state.store().list_all().await?;
    let csrf = state.sessions().csrf_token(&session_id);
    let flash = templates::flash_html(query.error.as_deref(), query.notice.as_deref());
    Ok(Html(templates::dashboard_page(&registrants, &csrf, &flash)).into_response())
}

/// Handler for deleting one registrant (POST /delete_user/{id}).
pub async fn delete_registrant(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Path(id): Path<i64>,
    Form(form): Form<CsrfForm>,
) -> Result<Response, WebError> {
    if !state.sessions().csrf_matches(&session_id, &form.csrf_token) {
        tracing::warn!("delete rejected: anti-forgery token mismatch");
        return Ok(flash_redirect("/dashboard", "error", "csrf"));
    }
    if !state.sessions().is_admin(&session_id) {
        return Ok(Redirect::to("/admin").into_response());
    }

    if state.store().delete(id).await? {
        Ok(flash_redirect("/dashboard", "notice", "deleted"))
    } else {
        Ok(flash_redirect("/dashboard", "error", "not_found"))
    }
}

/// Handler for clearing the whole registrant table (POST /clear_database).
pub async fn clear_database(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Form(form): Form<CsrfForm>,
) -> Result<Response, WebError> {
    if !state.sessions().csrf_matches(&session_id, &form.csrf_token) {
        tracing::warn!("clear rejected: anti-forgery token mismatch");
        return Ok(flash_redirect("/dashboard", "error", "csrf"));
    }
    if !state.sessions().is_admin(&session_id) {
        return Ok(Redirect::to("/admin").into_response());
    }

    state.store().clear().await?;
    Ok(flash_redirect("/dashboard", "notice", "cleared"))
}

/// Handler for logout (POST /logout).
pub async fn logout(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Form(form): Form<CsrfForm>,
) -> Response {
    if !state.sessions().csrf_matches(&session_id, &form.csrf_token) {
        tracing::warn!("logout rejected: anti-forgery token mismatch");
        return flash_redirect("/admin", "error", "csrf");
    }
    if !state.sessions().is_admin(&session_id) {
        return Redirect::to("/admin").into_response();
    }

    state.sessions().set_admin(&session_id, false);
    Redirect::to("/admin").into_response()
}

/// Liveness probe.
pub async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "service": "giveaway-server" }))
}

// =============================================================================
// Helpers
// =============================================================================

fn flash_redirect(path: &str, kind: &str, code: &str) -> Response {
    Redirect::to(&format!("{path}?{kind}={}", urlencoding::encode(code))).into_response()
}

/// Base URL of the incoming request: links stay environment-relative.
fn base_url(headers: &HeaderMap) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    format!("{scheme}://{host}")
}
