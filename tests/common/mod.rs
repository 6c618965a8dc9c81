// In-process mock of the blog API for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use blogdesk::api::ApiClient;
use blogdesk::session::{Session, SessionManager};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MockComment {
    pub id: u64,
    pub user: String,
    pub content: String,
    pub parent: Option<u64>,
    pub replies: Vec<MockComment>,
}

impl MockComment {
    fn to_json(&self, post_id: u64) -> Value {
        json!({
            "id": self.id,
            "post": post_id,
            "user": self.user,
            "content": self.content,
            "created_at": "2025-03-01T10:00:00Z",
            "updated_at": "2025-03-01T10:00:00Z",
            "parent": self.parent,
            "replies": self.replies.iter().map(|r| r.to_json(post_id)).collect::<Vec<_>>(),
        })
    }
}

#[derive(Debug, Default)]
pub struct MockState {
    pub requests: Vec<Recorded>,
    pub liked: bool,
    pub bookmarked: bool,
    pub likes_count: u64,
    pub fail_interactions: bool,
    pub comments: Vec<MockComment>,
    pub next_comment_id: u64,
    pub last_comment_body: Option<Value>,
    pub multipart_fields: Vec<(String, Option<String>, Vec<u8>)>,
    pub notifications_read: bool,
    pub bio: String,
}

pub type Shared = Arc<Mutex<MockState>>;

pub struct MockApi {
    pub base_url: String,
    pub state: Shared,
}

impl MockApi {
    pub async fn spawn() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState {
            next_comment_id: 100,
            ..Default::default()
        }));
        let app = router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api/", addr),
            state,
        }
    }

    pub fn client(&self, session: SessionManager) -> ApiClient {
        ApiClient::with_client(reqwest::Client::new(), &self.base_url, session).unwrap()
    }

    /// A client whose session already belongs to `username` (token `t-<name>`).
    pub async fn client_as(&self, username: &str) -> ApiClient {
        let session = SessionManager::ephemeral();
        session
            .persist(&Session {
                access_token: Some(format!("t-{}", username)),
                refresh_token: Some("r1".into()),
                username: Some(username.into()),
            })
            .await
            .unwrap();
        self.client(session)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }
}

/// Create/update answer with relations as primary keys.
pub fn post_ack_json(fields: &[(String, Option<String>, Vec<u8>)], slug: &str) -> Value {
    let tags: Vec<u64> = fields
        .iter()
        .filter(|(n, _, _)| n == "tags")
        .filter_map(|(_, _, data)| String::from_utf8_lossy(data).parse().ok())
        .collect();
    json!({
        "id": 7,
        "title": text_field(fields, "title"),
        "content": text_field(fields, "content"),
        "author": "alice",
        "tags": tags,
        "category": text_field(fields, "category").and_then(|c| c.parse::<u64>().ok()),
        "image": fields
            .iter()
            .find(|(n, _, _)| n == "image")
            .and_then(|(_, file, _)| file.clone())
            .map(|f| format!("/media/blog_images/{}", f)),
        "created_at": "2025-03-01T10:00:00Z",
        "updated_at": "2025-03-01T10:00:00Z",
        "slug": slug,
    })
}

pub fn post_json(state: &MockState, slug: &str) -> Value {
    json!({
        "id": 1,
        "slug": slug,
        "title": "Hello Rust",
        "content": "Ownership first.",
        "author": "alice",
        "category": {"id": 1, "name": "Programming"},
        "tags": [{"id": 2, "name": "rust"}, {"id": 3, "name": "web"}],
        "image": null,
        "created_at": "2025-03-01T10:00:00Z",
        "updated_at": "2025-03-01T10:00:00Z",
        "is_liked": state.liked,
        "is_bookmarked": state.bookmarked,
        "likes_count": state.likes_count,
    })
}

fn user_for(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    match token {
        "t1" | "t2" => Some("alice".to_string()),
        other => other.strip_prefix("t-").map(str::to_string),
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Authentication credentials were not provided."})),
    )
        .into_response()
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/token/", post(token))
        .route("/api/token/refresh/", post(refresh))
        .route("/api/register/", post(register))
        .route("/api/password-reset/", post(ok_empty))
        .route("/api/password-reset-confirm/", post(ok_empty))
        .route("/api/profile/", get(profile).put(update_profile))
        .route("/api/profile/bookmarked/", get(bookmarked))
        .route("/api/profile/blogs/", get(mine))
        .route("/api/posts/", get(list_posts))
        .route("/api/posts/create/", post(create_post))
        .route("/api/posts/{slug}/", get(get_post))
        .route("/api/posts/{slug}/update/", put(update_post))
        .route("/api/posts/{slug}/delete/", delete(delete_post))
        .route("/api/posts/{slug}/like/", post(like))
        .route("/api/posts/{slug}/unlike/", delete(unlike))
        .route("/api/posts/{slug}/bookmark/", post(bookmark))
        .route("/api/posts/{slug}/unbookmark/", delete(unbookmark))
        .route(
            "/api/posts/{slug}/comments/",
            get(list_comments).post(create_comment),
        )
        .route(
            "/api/posts/{slug}/comments/{comment_id}/",
            delete(delete_comment),
        )
        .route("/api/categories/", get(categories))
        .route("/api/tags/", get(tags))
        .route("/api/notifications/", get(notifications))
        .route("/api/notifications/mark-all-read/", post(mark_all_read))
        .route("/api/notifications/{id}/read/", post(mark_read))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<Shared>, req: Request, next: Next) -> Response {
    {
        let mut s = state.lock().unwrap();
        s.requests.push(Recorded {
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(str::to_string),
            authorization: req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        });
    }
    next.run(req).await
}

async fn ok_empty() -> Response {
    (StatusCode::OK, Json(json!({}))).into_response()
}

async fn token(Json(body): Json<Value>) -> Response {
    if body["password"] == "pw1" {
        (StatusCode::OK, Json(json!({"access": "t1", "refresh": "r1"}))).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "No active account found with the given credentials"})),
        )
            .into_response()
    }
}

async fn refresh(Json(body): Json<Value>) -> Response {
    if body["refresh"] == "r1" {
        (StatusCode::OK, Json(json!({"access": "t2"}))).into_response()
    } else {
        unauthorized()
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["username"] == "taken" {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "username": ["A user with that username already exists."],
                "email": ["Enter a valid email address."]
            })),
        )
            .into_response()
    } else {
        (StatusCode::CREATED, Json(json!({"username": body["username"]}))).into_response()
    }
}

async fn profile(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let Some(user) = user_for(&headers) else {
        return unauthorized();
    };
    let s = state.lock().unwrap();
    Json(json!({
        "id": 7,
        "username": user,
        "email": format!("{}@example.com", user),
        "bio": s.bio,
        "profile_picture": null,
    }))
    .into_response()
}

async fn update_profile(
    State(state): State<Shared>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let Some(user) = user_for(&headers) else {
        return unauthorized();
    };
    let fields = read_multipart(multipart).await;
    let mut s = state.lock().unwrap();
    if let Some((_, _, bio)) = fields.iter().find(|(name, _, _)| name == "bio") {
        s.bio = String::from_utf8_lossy(bio).to_string();
    }
    let picture = fields
        .iter()
        .find(|(name, _, _)| name == "profile_picture")
        .and_then(|(_, file, _)| file.clone())
        .map(|f| format!("/media/profile_pics/{}", f));
    s.multipart_fields = fields;
    Json(json!({
        "id": 7,
        "username": user,
        "email": format!("{}@example.com", user),
        "bio": s.bio,
        "profile_picture": picture,
    }))
    .into_response()
}

async fn bookmarked(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if user_for(&headers).is_none() {
        return unauthorized();
    }
    let s = state.lock().unwrap();
    let results = if s.bookmarked {
        vec![post_json(&s, "hello-rust")]
    } else {
        vec![]
    };
    Json(json!(results)).into_response()
}

async fn mine(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if user_for(&headers).is_none() {
        return unauthorized();
    }
    let s = state.lock().unwrap();
    Json(json!({
        "count": 1, "next": null, "previous": null,
        "results": [post_json(&s, "hello-rust")]
    }))
    .into_response()
}

async fn list_posts(State(state): State<Shared>) -> Response {
    let s = state.lock().unwrap();
    Json(json!({
        "count": 6,
        "next": null,
        "previous": "/posts?page=1",
        "results": [post_json(&s, "hello-rust")]
    }))
    .into_response()
}

async fn get_post(State(state): State<Shared>, Path(slug): Path<String>) -> Response {
    if slug == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response();
    }
    let s = state.lock().unwrap();
    Json(post_json(&s, &slug)).into_response()
}

async fn read_multipart(mut multipart: Multipart) -> Vec<(String, Option<String>, Vec<u8>)> {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.unwrap().to_vec();
        fields.push((name, file_name, data));
    }
    fields
}

fn text_field(fields: &[(String, Option<String>, Vec<u8>)], name: &str) -> Option<String> {
    fields
        .iter()
        .find(|(n, _, _)| n == name)
        .map(|(_, _, data)| String::from_utf8_lossy(data).to_string())
}

async fn create_post(
    State(state): State<Shared>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    if user_for(&headers).is_none() {
        return unauthorized();
    }
    let fields = read_multipart(multipart).await;
    let body = post_ack_json(&fields, "new-post");
    state.lock().unwrap().multipart_fields = fields;
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_post(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    multipart: Multipart,
) -> Response {
    match user_for(&headers).as_deref() {
        None => return unauthorized(),
        Some("alice") => {}
        Some(_) => {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({"detail": "You can only edit your own blog posts"})),
            )
                .into_response()
        }
    }
    let fields = read_multipart(multipart).await;
    let body = post_ack_json(&fields, &slug);
    state.lock().unwrap().multipart_fields = fields;
    Json(body).into_response()
}

async fn delete_post(headers: HeaderMap) -> Response {
    if user_for(&headers).is_none() {
        return unauthorized();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn like(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if user_for(&headers).is_none() {
        return unauthorized();
    }
    let mut s = state.lock().unwrap();
    if s.fail_interactions {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if s.liked {
        return (StatusCode::OK, Json(json!({"message": "Already liked"}))).into_response();
    }
    s.liked = true;
    s.likes_count += 1;
    (StatusCode::CREATED, Json(json!({"message": "Post liked"}))).into_response()
}

async fn unlike(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if user_for(&headers).is_none() {
        return unauthorized();
    }
    let mut s = state.lock().unwrap();
    if s.fail_interactions {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if !s.liked {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "Like not found"}))).into_response();
    }
    s.liked = false;
    s.likes_count -= 1;
    StatusCode::NO_CONTENT.into_response()
}

async fn bookmark(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if user_for(&headers).is_none() {
        return unauthorized();
    }
    let mut s = state.lock().unwrap();
    if s.fail_interactions {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if s.bookmarked {
        return (StatusCode::OK, Json(json!({"message": "Already bookmarked"}))).into_response();
    }
    s.bookmarked = true;
    (StatusCode::CREATED, Json(json!({"message": "Post bookmarked"}))).into_response()
}

async fn unbookmark(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if user_for(&headers).is_none() {
        return unauthorized();
    }
    let mut s = state.lock().unwrap();
    if !s.bookmarked {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Bookmark not found"})),
        )
            .into_response();
    }
    s.bookmarked = false;
    StatusCode::NO_CONTENT.into_response()
}

async fn list_comments(State(state): State<Shared>, Path(post_id): Path<String>) -> Response {
    let post_id: u64 = post_id.parse().unwrap_or_default();
    let s = state.lock().unwrap();
    let results: Vec<Value> = s.comments.iter().map(|c| c.to_json(post_id)).collect();
    Json(json!({
        "count": results.len(),
        "next": null,
        "previous": null,
        "results": results,
    }))
    .into_response()
}

async fn create_comment(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let Some(user) = user_for(&headers) else {
        return unauthorized();
    };
    let mut s = state.lock().unwrap();
    s.last_comment_body = Some(body.clone());

    let id = s.next_comment_id;
    s.next_comment_id += 1;
    let parent = body["parent"].as_u64();
    let comment = MockComment {
        id,
        user,
        content: body["content"].as_str().unwrap_or_default().to_string(),
        parent,
        replies: vec![],
    };

    match parent {
        Some(parent_id) => match s.comments.iter_mut().find(|c| c.id == parent_id) {
            Some(p) => p.replies.push(comment),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"parent": ["Invalid pk - object does not exist."]})),
                )
                    .into_response()
            }
        },
        None => s.comments.insert(0, comment),
    }
    (StatusCode::CREATED, Json(json!({"id": id}))).into_response()
}

async fn delete_comment(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((_post_id, comment_id)): Path<(String, u64)>,
) -> Response {
    if user_for(&headers).is_none() {
        return unauthorized();
    }
    let mut s = state.lock().unwrap();
    s.comments.retain(|c| c.id != comment_id);
    for c in s.comments.iter_mut() {
        c.replies.retain(|r| r.id != comment_id);
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn categories() -> Response {
    Json(json!([
        {"id": 1, "name": "Programming"},
        {"id": 2, "name": "Travel"}
    ]))
    .into_response()
}

async fn tags() -> Response {
    Json(json!({
        "count": 2, "next": null, "previous": null,
        "results": [{"id": 2, "name": "rust"}, {"id": 3, "name": "web"}]
    }))
    .into_response()
}

async fn notifications(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if user_for(&headers).is_none() {
        return unauthorized();
    }
    let s = state.lock().unwrap();
    Json(json!({
        "count": 2, "next": null, "previous": null,
        "results": [
            {"id": 1, "message": "Your post 'Hello Rust' was liked by bob.", "is_read": s.notifications_read, "created_at": "2025-03-01T11:00:00Z"},
            {"id": 2, "message": "Your post 'Hello Rust' received a new comment from carol.", "is_read": true, "created_at": "2025-03-01T12:00:00Z"}
        ]
    }))
    .into_response()
}

async fn mark_all_read(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if user_for(&headers).is_none() {
        return unauthorized();
    }
    state.lock().unwrap().notifications_read = true;
    (StatusCode::OK, Json(json!({"message": "All notifications marked as read"}))).into_response()
}

async fn mark_read(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    if user_for(&headers).is_none() {
        return unauthorized();
    }
    if id != 1 {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response();
    }
    state.lock().unwrap().notifications_read = true;
    (StatusCode::OK, Json(json!({"message": "Notification marked as read"}))).into_response()
}
