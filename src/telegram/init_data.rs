//! Mini-App init data decoding
//!
//! Telegram hands the Mini-App a URL-encoded string such as
//! `query_id=AA..&user=%7B%22id%22%3A42..%7D&auth_date=1700000000&hash=ab12..`.
//! The backend login endpoint expects the flattened `TelegramAuth` shape.
//! Signature verification needs the bot token and happens server-side.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum InitDataError {
    #[error("init data is missing `{0}`")]
    MissingField(&'static str),

    #[error("init data field `{field}` is malformed: {reason}")]
    Malformed { field: &'static str, reason: String },
}

/// Body for `POST /auth/telegram`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelegramAuth {
    pub id: i64,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub auth_date: i64,
    pub hash: String,
}

#[derive(Deserialize)]
struct InitDataUser {
    id: i64,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
}

/// Decode raw init data into the login payload
pub fn parse_init_data(raw: &str) -> Result<TelegramAuth, InitDataError> {
    let mut user = None;
    let mut auth_date = None;
    let mut hash = None;

    for (key, value) in url::form_urlencoded::parse(raw.trim_start_matches('?').as_bytes()) {
        match key.as_ref() {
            "user" => user = Some(value.into_owned()),
            "auth_date" => auth_date = Some(value.into_owned()),
            "hash" => hash = Some(value.into_owned()),
            _ => {}
        }
    }

    let user: InitDataUser = serde_json::from_str(&user.ok_or(InitDataError::MissingField("user"))?)
        .map_err(|e| InitDataError::Malformed { field: "user", reason: e.to_string() })?;
    let auth_date = auth_date
        .ok_or(InitDataError::MissingField("auth_date"))?
        .parse::<i64>()
        .map_err(|e| InitDataError::Malformed { field: "auth_date", reason: e.to_string() })?;
    let hash = hash
        .filter(|h| !h.is_empty())
        .ok_or(InitDataError::MissingField("hash"))?;

    Ok(TelegramAuth {
        id: user.id,
        first_name: user.first_name,
        username: user.username,
        photo_url: user.photo_url,
        auth_date,
        hash,
    })
}
