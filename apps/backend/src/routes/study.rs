//! Study session endpoints
//!
//! Sessions live in process memory keyed by id. Each one holds a frozen
//! queue snapshot; the store is only touched to load the snapshot at
//! start and to persist the card a rating or done-mark emits.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::db::{CardRepository, DeckRepository};
use crate::error::{ApiError, Result};
use crate::models::*;
use crate::{ActiveSession, AppState};

/// POST /api/study/session
pub async fn start(
    State(state): State<AppState>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<Json<SessionView>> {
    let now = Utc::now();

    let cards = {
        let store = state.store.lock().expect("store lock");
        store
            .get_deck(payload.deck_id, now)?
            .ok_or_else(|| ApiError::NotFound("Deck not found".to_string()))?;
        store.cards_for_deck(payload.deck_id)?
    };

    let session = StudySession::begin(&cards, now, &mut rand::thread_rng());
    let session_id = Uuid::new_v4();
    let view = SessionView::project(session_id, payload.deck_id, &session, now);

    let mut sessions = state.sessions.lock().expect("session lock");
    sessions.insert(
        session_id,
        ActiveSession {
            deck_id: payload.deck_id,
            session,
        },
    );
    Ok(Json(view))
}

/// GET /api/study/session/:id
pub async fn view(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let sessions = state.sessions.lock().expect("session lock");
    let active = sessions
        .get(&session_id)
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;
    Ok(Json(SessionView::project(
        session_id,
        active.deck_id,
        &active.session,
        Utc::now(),
    )))
}

/// POST /api/study/session/:id/reveal
pub async fn reveal(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let mut sessions = state.sessions.lock().expect("session lock");
    let active = sessions
        .get_mut(&session_id)
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;
    active.session.toggle_reveal()?;
    Ok(Json(SessionView::project(
        session_id,
        active.deck_id,
        &active.session,
        Utc::now(),
    )))
}

/// POST /api/study/session/:id/rate
pub async fn rate(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<RateRequest>,
) -> Result<Json<SessionView>> {
    let now = Utc::now();

    let (updated, response) = {
        let mut sessions = state.sessions.lock().expect("session lock");
        let active = sessions
            .get_mut(&session_id)
            .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;
        let updated = active.session.rate(payload.rating, now)?;
        let view = SessionView::project(session_id, active.deck_id, &active.session, now);
        (updated, view)
    };

    // A card deleted mid-session has no row left; the update is a no-op.
    let store = state.store.lock().expect("store lock");
    store.update_card(&updated)?;
    Ok(Json(response))
}

/// POST /api/study/session/:id/done
pub async fn done(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let now = Utc::now();

    let (updated, response) = {
        let mut sessions = state.sessions.lock().expect("session lock");
        let active = sessions
            .get_mut(&session_id)
            .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;
        let updated = active.session.mark_done()?;
        let view = SessionView::project(session_id, active.deck_id, &active.session, now);
        (updated, view)
    };

    let store = state.store.lock().expect("store lock");
    store.update_card(&updated)?;
    Ok(Json(response))
}

/// DELETE /api/study/session/:id
pub async fn finish(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode> {
    let mut sessions = state.sessions.lock().expect("session lock");
    sessions
        .remove(&session_id)
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}
