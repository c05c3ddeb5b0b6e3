// src/handlers/auth.rs

use axum::{
    Json,
    extract::{Query, State},
    http::{
        StatusCode,
        header::{LOCATION, SET_COOKIE},
    },
    response::IntoResponse,
};
use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AuthenticatedUser, SESSION_COOKIE},
    models::{
        auth::{OAuthCallbackQuery, User},
        responses::SuccessResponse,
    },
    services::auth::SESSION_TTL_DAYS,
};

/// `Set-Cookie` da sessão. Max-Age 0 apaga o cookie.
pub fn session_cookie(value: String, max_age_secs: i64, secure: bool) -> String {
    let cookie = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build();

    format!("{}; Max-Age={}", cookie, max_age_secs)
}

// GET /api/oauth/callback
#[utoipa::path(
    get,
    path = "/api/oauth/callback",
    tag = "Auth",
    params(
        ("code" = Option<String>, Query, description = "Código de autorização"),
        ("state" = Option<String>, Query, description = "Estado devolvido pelo provedor"),
        ("dev" = Option<String>, Query, description = "Login de desenvolvimento (APP_ENV=development)")
    ),
    responses(
        (status = 302, description = "Sessão criada, redireciona para /"),
        (status = 400, description = "code e state ausentes"),
        (status = 503, description = "Provedor de identidade indisponível")
    )
)]
pub async fn oauth_callback(
    State(app_state): State<AppState>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (_user, token) = app_state.auth_service.sign_in_with_code(&query).await?;

    let cookie = session_cookie(token, SESSION_TTL_DAYS * 24 * 60 * 60, app_state.cookie_secure);
    Ok((
        StatusCode::FOUND,
        [(LOCATION, "/".to_string()), (SET_COOKIE, cookie)],
    ))
}

// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuário logado", body = User),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

// POST /api/auth/logout
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Cookie da sessão removido", body = SuccessResponse))
)]
pub async fn logout(State(app_state): State<AppState>) -> impl IntoResponse {
    let cookie = session_cookie(String::new(), 0, app_state.cookie_secure);
    ([(SET_COOKIE, cookie)], Json(SuccessResponse::ok()))
}
