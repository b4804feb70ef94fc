use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use super::{Commit, Session, SessionData, SessionId};
use crate::AppState;

pub const SESSION_COOKIE: &str = "tableorder_session";

/// Load the session named by the request cookie, expose it to handlers, and
/// write back whatever the handler changed.
pub async fn session_layer(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let (id, data) = match session_id_from_headers(request.headers()) {
        Some(id) => match state.sessions.load(&id).await {
            Some(data) => (Some(id), data),
            None => (None, SessionData::default()),
        },
        None => (None, SessionData::default()),
    };

    let session = Session::new(id, data);
    request.extensions_mut().insert(session.clone());

    let response = next.run(request).await;

    let Some(Commit { previous, rotate, data }) = session.commit() else {
        return response;
    };
    let secure = state.config.session_cookie_secure;

    if data.is_empty() {
        if let Some(previous) = previous {
            state.sessions.delete(&previous).await;
            let jar = CookieJar::new().add(session_cookie(None, secure));
            return (jar, response).into_response();
        }
        return response;
    }

    let id = match previous {
        Some(previous) if !rotate => previous,
        Some(previous) => {
            state.sessions.delete(&previous).await;
            Uuid::new_v4()
        }
        None => Uuid::new_v4(),
    };
    state.sessions.save(&id, data).await;

    if previous == Some(id) {
        return response;
    }
    tracing::debug!(session_id = %id, "Issued session cookie");
    let jar = CookieJar::new().add(session_cookie(Some(&id), secure));
    (jar, response).into_response()
}

pub(crate) fn session_id_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

/// `None` builds a removal cookie that expires the session
fn session_cookie(id: Option<&SessionId>, secure: bool) -> Cookie<'static> {
    let value = id.map(ToString::to_string).unwrap_or_default();
    let mut cookie = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build();
    if id.is_none() {
        cookie.make_removal();
    }
    cookie
}
