use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, StatusCode},
    middleware::from_fn,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use tower_cookies::Cookie;
use tower_http::cors::CorsLayer;
use validator::Validate;

use crate::{
    middleware::{self, AuthUser, SESSION_COOKIE},
    models::{
        response::Response,
        users::{FilterUserDto, LoginUserDto, UserData, UserLoginResponseDto, UserResponseDto},
    },
    AppState, Result,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(get_me).layer(from_fn(middleware::auth)))
}

pub fn configure_cors() -> CorsLayer {
    // Mirrored origin so the session cookie survives cross-origin calls
    // from the editor UI.
    CorsLayer::very_permissive()
}

async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(credentials): Json<LoginUserDto>,
) -> Result<impl IntoResponse> {
    credentials.validate()?;

    let (_user, token) = app_state
        .auth_service
        .login(&credentials.email, &credentials.password)
        .await?;

    let cookie_duration = time::Duration::minutes(app_state.config.jwt_maxage);
    let cookie = Cookie::build((SESSION_COOKIE, &token))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    let response = Json(UserLoginResponseDto {
        status: "success".to_string(),
        token: token.clone(),
    });

    let mut headers = HeaderMap::new();
    if let Ok(value) = cookie.to_string().parse() {
        headers.append(header::SET_COOKIE, value);
    }

    let mut response = response.into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

async fn logout() -> Result<impl IntoResponse> {
    let removal = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    if let Ok(value) = removal.to_string().parse() {
        headers.append(header::SET_COOKIE, value);
    }

    let response = Json(Response {
        status: "success",
        message: "Logged out".to_string(),
    });

    let mut response = (StatusCode::OK, response).into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

async fn get_me(Extension(auth_user): Extension<AuthUser>) -> Result<impl IntoResponse> {
    let filtered_user = FilterUserDto::filter_user(&auth_user.user);

    let response_data = UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: filtered_user,
        },
    };

    Ok(Json(response_data))
}
