// src/api/http/tutor.rs

use axum::{
    extract::{FromRequest, Request, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::prompt::Mode;
use crate::services::AskRequest;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AskBody {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub exam_focus: Option<String>,
}

/// `/ask` body as JSON or as a URL-encoded form.
pub struct AskPayload(pub AskBody);

impl<S> FromRequest<S> for AskPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        if is_json {
            let Json(body) = Json::<AskBody>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            Ok(AskPayload(body))
        } else {
            let Form(body) = Form::<AskBody>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            Ok(AskPayload(body))
        }
    }
}

#[derive(Serialize)]
pub struct AskResponse {
    pub ok: bool,
    pub mode: Mode,
    pub answer: String,
}

#[derive(Serialize)]
pub struct HistoryMessage {
    pub role: String,
    pub content: String,
    pub at: String,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub ok: bool,
    pub sid: String,
    pub summary: String,
    pub turns: i64,
    pub messages: Vec<HistoryMessage>,
}

fn with_session_cookie(mut response: Response, app_state: &AppState, sid: &str) -> ApiResult<Response> {
    let cookie = app_state
        .cookies
        .issue(sid)
        .map_err(|e| ApiError::internal(format!("Failed to build session cookie: {e}")))?;
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

pub async fn ask_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    AskPayload(body): AskPayload,
) -> ApiResult<Response> {
    let sid = app_state.cookies.read(&headers);

    let outcome = app_state
        .tutor
        .ask(
            sid.as_deref(),
            AskRequest {
                question: body.question.unwrap_or_default(),
                mode: body.mode,
                exam_focus: body.exam_focus,
            },
        )
        .await?;

    if outcome.summarized {
        info!("Rolling summary refreshed during /ask");
    }

    let response = Json(AskResponse {
        ok: true,
        mode: outcome.mode,
        answer: outcome.answer,
    })
    .into_response();

    if outcome.new_session {
        with_session_cookie(response, &app_state, &outcome.sid)
    } else {
        Ok(response)
    }
}

pub async fn history_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let sid = app_state.cookies.read(&headers);
    let view = app_state.tutor.history(sid.as_deref()).await?;

    let messages = view
        .messages
        .into_iter()
        .map(|m| HistoryMessage {
            role: m.role.to_string(),
            content: m.content,
            at: m.created_at.to_rfc3339(),
        })
        .collect();

    let response = Json(HistoryResponse {
        ok: true,
        sid: view.sid.clone(),
        summary: view.summary,
        turns: view.turns,
        messages,
    })
    .into_response();

    if view.new_session {
        with_session_cookie(response, &app_state, &view.sid)
    } else {
        Ok(response)
    }
}
