#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod lobby;
pub mod session;

pub use lobby::{error, Lobby, Settings};
pub use session::{Command, Rules};

use alloc::{string::ToString, vec::Vec};
use http_body_util::{BodyExt, Full};
use hyper::{
    body::{Body, Bytes},
    header::{HeaderValue, CONTENT_TYPE},
    Method, Request, Response, StatusCode,
};

enum Route<'a> {
    Sessions,
    Session(&'a str),
    Leaderboard,
}

fn route(path: &str) -> Option<Route<'_>> {
    let path = path.strip_prefix('/')?;
    let path = path.strip_suffix('/').unwrap_or(path);
    let mut segments = path.split('/');
    let route = match (segments.next()?, segments.next()) {
        ("sessions", None) => Route::Sessions,
        ("sessions", Some(id)) if !id.is_empty() => Route::Session(id),
        ("leaderboard", None) => Route::Leaderboard,
        _ => return None,
    };
    segments.next().is_none().then_some(route)
}

fn json(status: StatusCode, bytes: Vec<u8>) -> Response<Full<Bytes>> {
    let mut res = Response::new(Full::new(Bytes::from(bytes)));
    *res.status_mut() = status;
    res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    res
}

/// Routes a request to the lobby.
pub async fn try_respond<B: Body>(req: Request<B>, lobby: &Lobby) -> error::Result<Response<Full<Bytes>>> {
    let (parts, body) = req.into_parts();
    let route = route(parts.uri.path()).ok_or(error::Error::UnknownRoute)?;

    let (status, bytes) = match (route, &parts.method) {
        (Route::Sessions, &Method::POST) => (StatusCode::CREATED, lobby.open()?),
        (Route::Session(id), &Method::GET) => (StatusCode::OK, lobby.dispatch(id, None).await?),
        (Route::Session(id), &Method::POST) => {
            let body = body.collect().await.map_err(|_| error::Error::BadRequest)?.to_bytes();
            let command = serde_json::from_slice(&body).map_err(|_| error::Error::BadRequest)?;
            (StatusCode::OK, lobby.dispatch(id, Some(command)).await?)
        }
        (Route::Leaderboard, &Method::GET) => (StatusCode::OK, lobby.leaderboard().await?),
        _ => return Err(error::Error::MethodNotAllowed),
    };

    Ok(json(status, bytes))
}

/// Like [`try_respond`], but renders failures as `{"error": ...}` bodies.
pub async fn respond<B: Body>(req: Request<B>, lobby: &Lobby) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    match try_respond(req, lobby).await {
        Ok(res) => res,
        Err(err) => {
            log::debug!("{method} {path} failed: {err}");
            let body = serde_json::json!({ "error": err.to_string() });
            json(err.status(), serde_json::to_vec(&body).unwrap_or_default())
        }
    }
}
