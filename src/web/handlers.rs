//! Request handlers for the pages and the save/remove endpoints

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Extension, Form, Json};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{info, warn};

use super::{pages, AppState};
use crate::reading_list::{mark_saved, Book, SaveOutcome};
use crate::session::Session;

fn current_year() -> i32 {
    chrono::Local::now().year()
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Form posted by the "Save" button
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SaveBookForm {
    pub title: String,
    pub author: String,
    pub description: String,
    pub thumbnail: String,
}

impl From<SaveBookForm> for Book {
    fn from(form: SaveBookForm) -> Self {
        let thumbnail = if form.thumbnail.is_empty() {
            pages::NO_COVER_URL.to_string()
        } else {
            form.thumbnail
        };
        Book {
            title: form.title,
            author: form.author,
            description: form.description,
            thumbnail,
        }
    }
}

/// Form posted by the "Remove" button
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RemoveBookForm {
    pub title: String,
    pub author: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckStatus {
    Success,
    Info,
}

/// JSON acknowledgment returned by the save/remove endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub status: AckStatus,
    pub message: String,
}

impl Ack {
    fn new(status: AckStatus, message: &str) -> Json<Self> {
        Json(Self {
            status,
            message: message.to_string(),
        })
    }
}

pub async fn home() -> Html<String> {
    Html(pages::home(current_year()))
}

pub async fn search(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = params.q.trim();
    if query.is_empty() {
        return Redirect::to("/").into_response();
    }

    let page = match state.catalog.search(query).await {
        Ok(books) => {
            let list = session.reading_list.lock().await;
            let hits = mark_saved(books, &list);
            pages::results(query, &hits, None, current_year())
        }
        Err(e) => {
            warn!("Catalog error for {:?}: {}", query, e);
            pages::results(query, &[], Some(&e.to_string()), current_year())
        }
    };

    Html(page).into_response()
}

pub async fn save_book(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(form): Form<SaveBookForm>,
) -> Json<Ack> {
    let book = Book::from(form);
    let title = book.title.clone();

    let outcome = session.reading_list.lock().await.add(book);
    // The first save is what makes a session worth keeping
    if session.is_new() {
        state.sessions.persist(&session, Instant::now()).await;
    }

    match outcome {
        SaveOutcome::Added => {
            info!(session = %session.id, "Saved {:?}", title);
            Ack::new(AckStatus::Success, "Book saved to reading list")
        }
        SaveOutcome::AlreadyPresent => Ack::new(AckStatus::Info, "Book already in reading list"),
    }
}

pub async fn remove_book(
    Extension(session): Extension<Session>,
    Form(form): Form<RemoveBookForm>,
) -> Json<Ack> {
    let removed = session
        .reading_list
        .lock()
        .await
        .remove(&form.title, &form.author);
    info!(session = %session.id, removed, "Removed {:?}", form.title);

    Ack::new(AckStatus::Success, "Book removed from reading list")
}

pub async fn reading_list(Extension(session): Extension<Session>) -> Html<String> {
    let list = session.reading_list.lock().await;
    Html(pages::reading_list(list.books(), current_year()))
}

pub async fn profile(Extension(session): Extension<Session>) -> Html<String> {
    let count = session.reading_list.lock().await.len();
    Html(pages::profile(count, current_year()))
}

pub async fn healthz() -> &'static str {
    "ok"
}
