mod error;
mod streaming;

use std::sync::Arc;
use anyhow::Context;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::sse::{KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use log::info;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use crate::client::ShowcaseClient;
use crate::comments::CommentStore;
use crate::config::{ExhibitionYear, ServerConfiguration};
use crate::entities::{Comment, CommentDraft, WorkKind, Year};
use crate::views::{DesignerCard, DesignerPage, PostPage, TeamPage, VideoPage, WorkCard};
pub use error::ApiError;
pub use streaming::COMMENTS_EVENT;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

type AppState<S> = Arc<ShowcaseClient<S>>;

pub async fn serve<S: CommentStore + 'static>(config: ServerConfiguration, client: ShowcaseClient<S>) -> anyhow::Result<()> {
    info!("initializing router...");
    let app = router(Arc::new(client));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    info!("listening on {}", &config.bind_addr);
    axum::serve(listener, app)
        .await
        .context("error running HTTP server")
}

pub fn router<S: CommentStore + 'static>(client: AppState<S>) -> Router {
    Router::new()
        .route("/api/years", get(get_years::<S>))
        .route("/api/designers", get(get_designers::<S>))
        .route("/api/designers/:name", get(get_designer::<S>))
        .route("/api/works", get(get_works::<S>))
        .route("/api/posts/:id", get(get_post::<S>))
        .route("/api/videos/:id", get(get_video::<S>))
        .route("/api/teams/:id", get(get_team::<S>))
        .route("/api/comments", get(get_comments::<S>).post(create_comment::<S>))
        .route("/api/comments/stream", get(stream_comments::<S>))
        .with_state(client)
        .layer(ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::new()
                .allow_methods(Any)
                .allow_headers(Any)
                .allow_origin(Any)))
}

#[derive(Deserialize, Debug, Default)]
struct YearQuery {
    year: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct WorksQuery {
    year: Option<String>,
    tab: Option<WorkKind>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct YearsResponse<'a> {
    current_year: Year,
    years: &'a [ExhibitionYear],
}

fn year_of<S: CommentStore + 'static>(client: &ShowcaseClient<S>, raw: &Option<String>) -> Year {
    client.year_or_current(raw.as_deref())
}

async fn get_years<S: CommentStore + 'static>(State(client): State<AppState<S>>) -> impl IntoResponse {
    Json(YearsResponse { current_year: client.current_year(), years: client.years() }).into_response()
}

async fn get_designers<S: CommentStore + 'static>(
    State(client): State<AppState<S>>,
    Query(query): Query<YearQuery>,
) -> Result<Json<Vec<DesignerCard>>> {
    let year = year_of(&client, &query.year);
    Ok(Json(client.designers(year).await?))
}

async fn get_designer<S: CommentStore + 'static>(
    State(client): State<AppState<S>>,
    Path(name): Path<String>,
    Query(query): Query<YearQuery>,
) -> Result<Json<DesignerPage>> {
    let year = year_of(&client, &query.year);
    let page = client.designer_page(year, &name).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(page))
}

async fn get_works<S: CommentStore + 'static>(
    State(client): State<AppState<S>>,
    Query(query): Query<WorksQuery>,
) -> Result<Json<Vec<WorkCard>>> {
    let year = year_of(&client, &query.year);
    let kind = query.tab.unwrap_or(WorkKind::Post);
    Ok(Json(client.works(year, kind).await?))
}

async fn get_post<S: CommentStore + 'static>(
    State(client): State<AppState<S>>,
    Path(id): Path<String>,
    Query(query): Query<YearQuery>,
) -> Result<Json<PostPage>> {
    let year = year_of(&client, &query.year);
    let page = client.post_page(year, &id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(page))
}

async fn get_video<S: CommentStore + 'static>(
    State(client): State<AppState<S>>,
    Path(id): Path<String>,
    Query(query): Query<YearQuery>,
) -> Result<Json<VideoPage>> {
    let year = year_of(&client, &query.year);
    let page = client.video_page(year, &id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(page))
}

async fn get_team<S: CommentStore + 'static>(
    State(client): State<AppState<S>>,
    Path(id): Path<String>,
    Query(query): Query<YearQuery>,
) -> Result<Json<TeamPage>> {
    let year = year_of(&client, &query.year);
    let page = client.team_page(year, &id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(page))
}

async fn get_comments<S: CommentStore + 'static>(
    State(client): State<AppState<S>>,
    Query(query): Query<YearQuery>,
) -> Result<Json<Vec<Comment>>> {
    let year = year_of(&client, &query.year);
    let comments = client.comments(year).await?;
    Ok(Json(comments.to_vec()))
}

async fn create_comment<S: CommentStore + 'static>(
    State(client): State<AppState<S>>,
    Query(query): Query<YearQuery>,
    Json(draft): Json<CommentDraft>,
) -> Result<(StatusCode, Json<Comment>)> {
    let year = year_of(&client, &query.year);
    let comment = client.append_comment(year, &draft).await?;
    info!("comment {} added to {}", comment.id, year);
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn stream_comments<S: CommentStore + 'static>(
    State(client): State<AppState<S>>,
    Query(query): Query<YearQuery>,
) -> Result<impl IntoResponse> {
    let year = year_of(&client, &query.year);
    let watch = client.watch_comments(year).await?;
    Ok(Sse::new(streaming::comment_events(watch)).keep_alive(KeepAlive::default()))
}
