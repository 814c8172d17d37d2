// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Meal-post endpoints.
//!
//! Posts are editable and deletable only by their creator (or an admin).
//! Deletion is soft: the post disappears from listings and lookups but the
//! record is retained.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    auth::{Auth, Identity},
    error::ApiError,
    models::{CreatePostRequest, PageQuery, Point, PostResponse, SearchQuery, UpdatePostRequest},
    state::AppState,
    storage::{AccountRepository, NewPost, PostRepository, StoredPost},
};

#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    tag = "Posts",
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Invalid post fields"),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn create_post(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    validate_post_fields(
        &request.title,
        request.recruitment,
        &request.location,
        request.order_at,
    )?;

    let creator = AccountRepository::new(&state.db)
        .find_by_id(identity.account_id)?
        .ok_or_else(|| ApiError::not_found("Account not found"))?;

    let post = PostRepository::new(&state.db).create(NewPost {
        creator_id: creator.id,
        creator_name: creator.name,
        title: request.title,
        order_at: request.order_at,
        recruitment: request.recruitment,
        food_category: request.food_category,
        restaurant: request.restaurant,
        location: request.location,
    })?;

    Ok((StatusCode::CREATED, Json(post.into())))
}

#[utoipa::path(
    put,
    path = "/api/posts/{post_id}",
    params(("post_id" = u64, Path, description = "Post to update")),
    request_body = UpdatePostRequest,
    tag = "Posts",
    responses(
        (status = 200, body = PostResponse),
        (status = 403, description = "Not the creator"),
        (status = 404, description = "No such post"),
    )
)]
pub async fn update_post(
    Auth(identity): Auth,
    Path(post_id): Path<u64>,
    State(state): State<AppState>,
    Json(request): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    validate_post_fields(
        &request.title,
        request.recruitment,
        &request.location,
        request.order_at,
    )?;

    let repo = PostRepository::new(&state.db);
    let mut post = load_owned_post(&repo, post_id, &identity)?;

    post.title = request.title;
    post.order_at = request.order_at;
    post.recruitment = request.recruitment;
    post.food_category = request.food_category;
    post.restaurant = request.restaurant;
    post.location = request.location;
    repo.update(&post)?;

    Ok(Json(post.into()))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{post_id}",
    params(("post_id" = u64, Path, description = "Post to delete")),
    tag = "Posts",
    responses(
        (status = 204),
        (status = 403, description = "Not the creator"),
        (status = 404, description = "No such post"),
    )
)]
pub async fn delete_post(
    Auth(identity): Auth,
    Path(post_id): Path<u64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let repo = PostRepository::new(&state.db);
    load_owned_post(&repo, post_id, &identity)?;
    repo.delete(post_id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/posts",
    params(PageQuery),
    tag = "Posts",
    responses((status = 200, body = [PostResponse]))
)]
pub async fn list_posts(
    Auth(_identity): Auth,
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = PostRepository::new(&state.db).list(params.page, params.size)?;
    Ok(Json(posts.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/posts/search",
    params(SearchQuery),
    tag = "Posts",
    responses((status = 200, body = [PostResponse]))
)]
pub async fn search_posts(
    Auth(_identity): Auth,
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts =
        PostRepository::new(&state.db).search(params.page, params.size, &params.keyword)?;
    Ok(Json(posts.into_iter().map(Into::into).collect()))
}

fn load_owned_post(
    repo: &PostRepository<'_>,
    post_id: u64,
    identity: &Identity,
) -> Result<StoredPost, ApiError> {
    let post = repo
        .find_by_id(post_id)?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    if post.creator_id != identity.account_id && !identity.is_admin() {
        return Err(ApiError::forbidden("You are not the creator of this post"));
    }
    Ok(post)
}

fn validate_post_fields(
    title: &str,
    recruitment: u32,
    location: &Point,
    order_at: chrono::DateTime<Utc>,
) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::bad_request("title must not be blank"));
    }
    if recruitment < 2 {
        return Err(ApiError::bad_request("recruitment must be at least 2"));
    }
    if !(-90.0..=90.0).contains(&location.latitude)
        || !(-180.0..=180.0).contains(&location.longitude)
    {
        return Err(ApiError::bad_request("location is out of range"));
    }
    if order_at <= Utc::now() {
        return Err(ApiError::bad_request("order_at must be in the future"));
    }
    Ok(())
}
