// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{claims::SessionPair, middleware::request_gate},
    models::{
        AccountResponse, CreatePostRequest, FoodCategory, LoginRequest, Point, PostResponse,
        ReissueRequest, SignupRequest, SignupResponse, UpdateNicknameRequest, UpdatePostRequest,
    },
    state::AppState,
};

pub mod health;
pub mod posts;
pub mod sign;
pub mod users;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/signup", post(sign::signup))
        .route("/login", post(sign::login))
        .route("/reissue", post(sign::reissue))
        .route("/users", get(users::list_accounts))
        .route("/users/me", get(users::get_current_account))
        .route("/users/me/nickname", put(users::update_nickname))
        .route("/users/id/{account_id}", get(users::find_by_id))
        .route("/users/email/{email}", get(users::find_by_email))
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route("/posts/search", get(posts::search_posts))
        .route(
            "/posts/{post_id}",
            put(posts::update_post).delete(posts::delete_post),
        )
        .with_state(state.clone());

    let probe_routes = Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(state.clone());

    Router::new()
        .nest("/api", api_routes)
        .merge(probe_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // The gate must wrap every route so identity is published before
        // any handler-side authorization decision.
        .layer(middleware::from_fn_with_state(state, request_gate))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        sign::signup,
        sign::login,
        sign::reissue,
        users::get_current_account,
        users::find_by_id,
        users::find_by_email,
        users::list_accounts,
        users::update_nickname,
        posts::create_post,
        posts::update_post,
        posts::delete_post,
        posts::list_posts,
        posts::search_posts,
        health::health,
        health::ready
    ),
    components(
        schemas(
            SignupRequest,
            SignupResponse,
            LoginRequest,
            ReissueRequest,
            SessionPair,
            AccountResponse,
            UpdateNicknameRequest,
            CreatePostRequest,
            UpdatePostRequest,
            PostResponse,
            FoodCategory,
            Point,
            health::HealthResponse,
            health::ReadyResponse
        )
    ),
    tags(
        (name = "Sign", description = "Signup, login, and token reissue"),
        (name = "Users", description = "Account lookup and profile"),
        (name = "Posts", description = "Meal-recruitment posts"),
        (name = "Health", description = "Service probes")
    )
)]
struct ApiDoc;
