use std::sync::Arc;

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tower_cookies::Cookie;

use crate::{
    models::users::{User, UserRole},
    AppState, Error, Result,
};

pub const SESSION_COOKIE: &str = "admin_token";
const LOGIN_ROUTE: &str = "/admin/login";

/// Authenticated admin, inserted into request extensions for handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

/// Gate for the admin area. A request with no token at all is sent to
/// the login screen; a stale or invalid token additionally gets its
/// cookie cleared. The role is re-read from the database on every call,
/// so a demoted account loses access even with a live token.
pub async fn auth(mut req: Request, next: Next) -> Result<Response> {
    let app_state = req
        .extensions()
        .get::<Arc<AppState>>()
        .ok_or(Error::InternalServerError)?
        .clone();

    let cookies = CookieJar::from_headers(req.headers());

    let token = cookies
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| {
                    auth_value
                        .strip_prefix("Bearer ")
                        .map(|stripped| stripped.to_string())
                })
        });

    let Some(token) = token else {
        return Ok(Redirect::temporary(LOGIN_ROUTE).into_response());
    };

    let user_id = match app_state.auth_service.decode_token(token) {
        Ok(user_id) => user_id,
        Err(_) => return Ok(stale_session_response()),
    };

    let user = match app_state.auth_service.get_user(user_id).await {
        Ok(user) => user,
        Err(_) => return Ok(stale_session_response()),
    };

    if user.role != UserRole::Admin {
        return Err(Error::Forbidden("Admin access required".to_string()));
    }

    req.extensions_mut().insert(AuthUser { user });

    Ok(next.run(req).await)
}

fn stale_session_response() -> Response {
    let removal = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .http_only(true)
        .build();

    let mut response = Redirect::temporary(LOGIN_ROUTE).into_response();
    if let Ok(value) = removal.to_string().parse() {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
