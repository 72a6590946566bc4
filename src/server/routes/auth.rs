//! Registration, login and logout

use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::SessionManager;
use crate::server::error::ApiResult;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// GET /register
pub async fn register_form() -> Json<Value> {
    Json(json!({ "action": "/register", "fields": ["username", "email", "password"] }))
}

/// GET /login
pub async fn login_form() -> Json<Value> {
    Json(json!({ "action": "/login", "fields": ["email", "password"] }))
}

/// POST /register - create an account
pub async fn register(
    State(state): State<AppState>,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> ApiResult<impl IntoResponse> {
    let Form(form) = form?;
    let user = state
        .auth()
        .register(&form.username, &form.email, &form.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Registration successful, please log in",
            "user": user,
        })),
    ))
}

/// POST /login - authenticate and set the session cookie
pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> ApiResult<impl IntoResponse> {
    let Form(form) = form?;
    let user = state.auth().login(&form.email, &form.password).await?;
    let token = state.sessions().issue(&user)?;

    Ok((
        [(header::SET_COOKIE, state.sessions().cookie(&token))],
        Json(json!({
            "message": "Login successful!",
            "username": user.username,
        })),
    ))
}

/// GET /logout - clear the session cookie
pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, SessionManager::clear_cookie())],
        Json(json!({ "message": "Logged out" })),
    )
}
