use crate::{
    ctx::BaseParams,
    openapi::{
        aide::{
            axum::{
                routing::{get, post},
                ApiRouter, IntoApiResponse,
            },
            NoApi,
        },
        Json, Path,
    },
    auth,
    state::AppState,
    users::UserId,
};
use axum::{http::StatusCode, middleware, response::Redirect};

use schemars::JsonSchema;

use serde::Deserialize;

use super::{handlers, CreateNote, ListScope, Note, NoteId, UpdateNote};

#[derive(Debug, Deserialize, JsonSchema)]
struct NoteIdPath {
    note_id: NoteId,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct UserIdPath {
    user_id: UserId,
}

pub fn note_detail_path(note_id: NoteId) -> String {
    format!("/api/v1/notes/{note_id}")
}

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/api/v1/notes",
            get(find_notes).post_with(create_note, |t| t.response::<201, Json<Note>>()),
        )
        .api_route("/api/v1/users/{user_id}/notes", get(find_user_notes))
        .api_route(
            "/api/v1/notes/{note_id}",
            get(get_note).put(update_note).delete(delete_note),
        )
        .api_route("/api/v1/notes/{note_id}/publish", post(publish_note))
        .api_route("/api/v1/notes/{note_id}/unpublish", post(unpublish_note))
        .route_layer(middleware::from_fn(auth::middleware::login_required))
        .with_state(state)
}

async fn find_notes(NoApi(base): NoApi<BaseParams>) -> impl IntoApiResponse {
    handlers::find_notes(ListScope::Global, base).await.map(Json)
}

async fn find_user_notes(
    Path(UserIdPath { user_id }): Path<UserIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::find_notes(ListScope::Owner(user_id), base).await.map(Json)
}

async fn create_note(NoApi(base): NoApi<BaseParams>, Json(args): Json<CreateNote>) -> impl IntoApiResponse {
    handlers::create_note(args, base)
        .await
        .map(|r| (StatusCode::CREATED, Json(r)))
}

async fn get_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::get_note(note_id, base).await.map(Json)
}

async fn update_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
    Json(args): Json<UpdateNote>,
) -> impl IntoApiResponse {
    handlers::update_note(note_id, args, base)
        .await
        .map(|note| NoApi(Redirect::to(&note_detail_path(note.id))))
}

async fn delete_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::delete_note(note_id, base).await.map(Json)
}

async fn publish_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::publish_note(note_id, base).await.map(Json)
}

async fn unpublish_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::unpublish_note(note_id, base).await.map(Json)
}
