use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use tracing::{debug, info};

use super::pages::{self, FieldError};
use super::{AppState, CacheKey};
use crate::auth::{MaybeUser, RequireUser};
use crate::db::{self as queries, Group, User};
use crate::error::{AppError, AppResult};
use crate::feed::{self, parse_page_number, PostInput};
use crate::media::{self, MAX_UPLOAD_BYTES};

/// Create the router with all blog routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/group/:slug/", get(group_posts))
        .route("/profile/:username/", get(profile))
        .route("/profile/:username/follow/", get(profile_follow))
        .route("/profile/:username/unfollow/", get(profile_unfollow))
        .route("/follow/", get(follow_index))
        .route("/create/", get(post_create_form).post(post_create))
        .route("/posts/:post_id/", get(post_detail))
        .route("/posts/:post_id/edit/", get(post_edit_form).post(post_edit))
        .route("/posts/:post_id/delete/", post(post_delete))
        .route("/posts/:post_id/comment/", post(add_comment))
        .route("/about/author/", get(about_author))
        .route("/about/tech/", get(about_tech))
        .route("/healthz", get(health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// `?page=N` on feed routes. Kept as a string so junk values fall back to page 1.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    page: Option<String>,
}

impl PageParams {
    fn number(&self) -> i64 {
        parse_page_number(self.page.as_deref())
    }
}

/// Post ids in paths that are not integers are a missing page, not a bad request.
fn parse_post_id(raw: &str) -> AppResult<i64> {
    raw.parse().map_err(|_| AppError::NotFound("post"))
}

fn post_detail_url(post_id: i64) -> String {
    format!("/posts/{post_id}/")
}

fn profile_url(username: &str) -> String {
    format!("/profile/{username}/")
}

// ========== Feeds ==========

async fn index(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(params): Query<PageParams>,
) -> AppResult<Response> {
    let page = params.number();
    let viewer = user.as_ref().map(|u| u.id);

    if let Some(html) = state.cache.get(&CacheKey::new(page, viewer)) {
        debug!(page, "Serving cached index page");
        return Ok(Html(html).into_response());
    }

    let feed = state.composer.global_feed(page).await?;
    let html = pages::render_index_page(&feed, user.as_ref()).into_string();
    // Keyed by the page actually served so clamped requests share one entry.
    state.cache.insert(CacheKey::new(feed.number, viewer), html.clone());

    Ok(Html(html).into_response())
}

async fn group_posts(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(slug): Path<String>,
    Query(params): Query<PageParams>,
) -> AppResult<Response> {
    let (group, feed) = state.composer.group_feed(&slug, params.number()).await?;
    Ok(Html(pages::render_group_page(&group, &feed, user.as_ref()).into_string()).into_response())
}

async fn profile(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(username): Path<String>,
    Query(params): Query<PageParams>,
) -> AppResult<Response> {
    let (author, feed) = state
        .composer
        .author_feed(&username, params.number())
        .await?;

    let following = match viewer.as_ref() {
        Some(v) => state.follows.is_following(v.id, author.id).await?,
        None => false,
    };
    let (following_count, follower_count) = state.follows.counts(author.id).await?;

    let html = pages::render_profile_page(&pages::ProfilePageParams {
        author: &author,
        page: &feed,
        viewer: viewer.as_ref(),
        following,
        following_count,
        follower_count,
    });
    Ok(Html(html.into_string()).into_response())
}

async fn follow_index(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(params): Query<PageParams>,
) -> AppResult<Response> {
    let feed = state
        .composer
        .following_feed(user.id, params.number())
        .await?;
    Ok(Html(pages::render_follow_page(&feed, &user).into_string()).into_response())
}

// ========== Follow graph ==========

async fn find_author(state: &AppState, username: &str) -> AppResult<User> {
    queries::get_user_by_username(state.db.pool(), username)
        .await?
        .ok_or(AppError::NotFound("user"))
}

async fn profile_follow(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(username): Path<String>,
) -> AppResult<Response> {
    let author = find_author(&state, &username).await?;
    state.follows.follow(user.id, author.id).await?;
    Ok(Redirect::to(&profile_url(&author.username)).into_response())
}

async fn profile_unfollow(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(username): Path<String>,
) -> AppResult<Response> {
    let author = find_author(&state, &username).await?;
    state.follows.unfollow(user.id, author.id).await?;
    Ok(Redirect::to(&profile_url(&author.username)).into_response())
}

// ========== Posts ==========

async fn post_detail(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(post_id): Path<String>,
) -> AppResult<Response> {
    let detail = state.composer.post_detail(parse_post_id(&post_id)?).await?;
    let html = pages::render_post_detail_page(&pages::PostDetailParams {
        detail: &detail,
        user: user.as_ref(),
        comment_error: None,
    });
    Ok(Html(html.into_string()).into_response())
}

/// An uploaded file from the `image` field.
#[derive(Debug)]
struct Upload {
    filename: String,
    bytes: Bytes,
}

/// The create/edit post form as submitted.
#[derive(Debug, Default)]
struct PostForm {
    text: String,
    group: Option<String>,
    upload: Option<Upload>,
}

impl PostForm {
    async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();
        let invalid = |e: axum::extract::multipart::MultipartError| {
            AppError::validation("form", e.body_text())
        };

        while let Some(field) = multipart.next_field().await.map_err(invalid)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "text" => form.text = field.text().await.map_err(invalid)?,
                "group" => form.group = Some(field.text().await.map_err(invalid)?),
                "image" => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await.map_err(invalid)?;
                    // Browsers send an empty part when no file was chosen.
                    if !filename.is_empty() && !bytes.is_empty() {
                        form.upload = Some(Upload { filename, bytes });
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// Validate the text fields, then store the upload if there is one.
    ///
    /// Images are only written once the rest of the form is known to be valid.
    async fn prepare_input(&self, state: &AppState) -> AppResult<PostInput> {
        let mut input = PostInput {
            text: self.text.clone(),
            group: self.group.clone(),
            image: None,
        };
        input.validate(state.db.pool()).await?;

        if let Some(upload) = &self.upload {
            let path =
                media::save_post_image(&state.config.media_dir, &upload.filename, &upload.bytes)
                    .await?;
            input.image = Some(path);
        }
        Ok(input)
    }
}

/// Re-render the post form for a rejected submission.
async fn rerender_post_form(
    state: &AppState,
    user: &User,
    post_id: Option<i64>,
    form: &PostForm,
    field: &str,
    message: &str,
) -> AppResult<Response> {
    let groups = queries::get_all_groups(state.db.pool()).await?;
    let current_image = match post_id {
        Some(id) => queries::get_post(state.db.pool(), id)
            .await?
            .and_then(|p| p.image),
        None => None,
    };
    let html = pages::render_post_form_page(&pages::PostFormParams {
        user,
        post_id,
        text: &form.text,
        group: form.group.as_deref(),
        groups: &groups,
        current_image: current_image.as_deref(),
        error: Some(FieldError::new(field, message)),
    });
    Ok(Html(html.into_string()).into_response())
}

fn render_blank_form(
    user: &User,
    post_id: Option<i64>,
    text: &str,
    group: Option<&str>,
    groups: &[Group],
    current_image: Option<&str>,
) -> Response {
    let html = pages::render_post_form_page(&pages::PostFormParams {
        user,
        post_id,
        text,
        group,
        groups,
        current_image,
        error: None,
    });
    Html(html.into_string()).into_response()
}

async fn post_create_form(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> AppResult<Response> {
    let groups = queries::get_all_groups(state.db.pool()).await?;
    Ok(render_blank_form(&user, None, "", None, &groups, None))
}

async fn post_create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    multipart: Multipart,
) -> AppResult<Response> {
    let form = PostForm::read(multipart).await?;

    let result: AppResult<i64> = async {
        let input = form.prepare_input(&state).await?;
        feed::create_post(state.db.pool(), user.id, &input).await
    }
    .await;

    match result {
        Ok(_) => {
            state.cache.clear();
            Ok(Redirect::to(&profile_url(&user.username)).into_response())
        }
        Err(AppError::Validation { field, message }) => {
            rerender_post_form(&state, &user, None, &form, field, &message).await
        }
        Err(e) => Err(e),
    }
}

async fn post_edit_form(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(post_id): Path<String>,
) -> AppResult<Response> {
    let post_id = parse_post_id(&post_id)?;
    let post = match feed::ensure_author(state.db.pool(), post_id, user.id).await {
        Ok(post) => post,
        Err(AppError::PermissionDenied) => {
            return Ok(Redirect::to(&post_detail_url(post_id)).into_response())
        }
        Err(e) => return Err(e),
    };

    let groups = queries::get_all_groups(state.db.pool()).await?;
    let group = post.group_id.map(|id| id.to_string());
    Ok(render_blank_form(
        &user,
        Some(post_id),
        &post.text,
        group.as_deref(),
        &groups,
        post.image.as_deref(),
    ))
}

async fn post_edit(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(post_id): Path<String>,
    multipart: Multipart,
) -> AppResult<Response> {
    let post_id = parse_post_id(&post_id)?;
    // Check ownership before reading the body so nothing is uploaded for a
    // post the user cannot change.
    match feed::ensure_author(state.db.pool(), post_id, user.id).await {
        Ok(_) => {}
        Err(AppError::PermissionDenied) => {
            info!(post_id, user_id = user.id, "Rejected edit by non-author");
            return Ok(Redirect::to(&post_detail_url(post_id)).into_response());
        }
        Err(e) => return Err(e),
    }

    let form = PostForm::read(multipart).await?;

    let result: AppResult<()> = async {
        let input = form.prepare_input(&state).await?;
        feed::edit_post(state.db.pool(), post_id, user.id, &input).await
    }
    .await;

    match result {
        Ok(()) => {
            state.cache.clear();
            Ok(Redirect::to(&post_detail_url(post_id)).into_response())
        }
        Err(AppError::Validation { field, message }) => {
            rerender_post_form(&state, &user, Some(post_id), &form, field, &message).await
        }
        Err(AppError::PermissionDenied) => Ok(Redirect::to(&post_detail_url(post_id)).into_response()),
        Err(e) => Err(e),
    }
}

async fn post_delete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(post_id): Path<String>,
) -> AppResult<Response> {
    let post_id = parse_post_id(&post_id)?;

    match feed::delete_post(state.db.pool(), post_id, user.id).await {
        Ok(()) => {
            state.cache.clear();
            Ok(Redirect::to(&profile_url(&user.username)).into_response())
        }
        Err(AppError::PermissionDenied) => Ok(Redirect::to(&post_detail_url(post_id)).into_response()),
        Err(e) => Err(e),
    }
}

// ========== Comments ==========

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    text: String,
}

async fn add_comment(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(post_id): Path<String>,
    Form(form): Form<CommentForm>,
) -> AppResult<Response> {
    let post_id = parse_post_id(&post_id)?;

    match feed::add_comment(state.db.pool(), post_id, user.id, &form.text).await {
        Ok(_) => Ok(Redirect::to(&post_detail_url(post_id)).into_response()),
        Err(AppError::Validation { message, .. }) => {
            let detail = state.composer.post_detail(post_id).await?;
            let html = pages::render_post_detail_page(&pages::PostDetailParams {
                detail: &detail,
                user: Some(&user),
                comment_error: Some(&message),
            });
            Ok(Html(html.into_string()).into_response())
        }
        Err(e) => Err(e),
    }
}

// ========== Static pages ==========

async fn about_author(MaybeUser(user): MaybeUser) -> Html<String> {
    Html(pages::render_about_author_page(user.as_ref()).into_string())
}

async fn about_tech(MaybeUser(user): MaybeUser) -> Html<String> {
    Html(pages::render_about_tech_page(user.as_ref()).into_string())
}

async fn health() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_post_id() {
        assert_eq!(parse_post_id("42").ok(), Some(42));
        assert!(parse_post_id("abc").is_err_and(|e| e.is_not_found()));
    }

    #[test]
    fn test_page_params_number() {
        let params = PageParams {
            page: Some("x".to_string()),
        };
        assert_eq!(params.number(), 1);
        assert_eq!(PageParams::default().number(), 1);
        let params = PageParams {
            page: Some("3".to_string()),
        };
        assert_eq!(params.number(), 3);
    }
}
