use crate::{AppState, errors::ApiError, models::SessionUser};
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use bcrypt::{hash, verify};
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "forum_session";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sid: String, // Server-side session id
    pub sub: String, // Subject (user ID)
    pub email: String,
    pub exp: usize,
}

pub fn create_token(
    session_id: &Uuid,
    user_id: &ObjectId,
    email: &str,
    expires_at: DateTime<Utc>,
    secret: &str,
) -> Result<String, ApiError> {
    let claims = Claims {
        sid: session_id.to_string(),
        sub: user_id.to_hex(),
        email: email.to_string(),
        exp: expires_at.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::InternalError(format!("Token Creation failed: {}", e)))
}

pub fn validate_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let mut validation = Validation::default();
    // the session lifetime is short, a default leeway would double it
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Unauthorized)
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, ApiError> {
    hash(password, cost)
        .map_err(|e| ApiError::InternalError(format!("Password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, ApiError> {
    verify(password, hashed)
        .map_err(|e| ApiError::InternalError(format!("Password verification failed: {}", e)))
}

/// The browser drops the cookie after `ttl_secs`, when the server-side session ends.
pub fn session_cookie(token: String, ttl_secs: u64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .max_age(time::Duration::seconds(ttl_secs as i64))
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Resolves the session id carried by a valid session cookie, if any.
pub fn session_id_from(jar: &CookieJar, secret: &str) -> Option<Uuid> {
    let cookie = jar.get(SESSION_COOKIE)?;
    let claims = validate_token(cookie.value(), secret).ok()?;
    Uuid::parse_str(&claims.sid).ok()
}

/// The logged-in user for this request, or `None` for anonymous visitors.
///
/// The session only remembers the user id; the record itself is re-read from
/// the store on every request so profile changes and deletions show up
/// immediately.
pub struct CurrentUser(pub Option<SessionUser>);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let Some(session_id) = session_id_from(&jar, &state.config.session_secret) else {
            return Ok(CurrentUser(None));
        };
        let Some(user_id) = state.sessions.get(&session_id) else {
            return Ok(CurrentUser(None));
        };

        let user = state.users.find_by_id(user_id).await?;

        Ok(CurrentUser(user.map(SessionUser::from)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trip() {
        let sid = Uuid::new_v4();
        let user = ObjectId::new();
        let expires = Utc::now() + Duration::seconds(60);

        let token = create_token(&sid, &user, "kim@example.com", expires, SECRET).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();

        assert_eq!(claims.sid, sid.to_string());
        assert_eq!(claims.sub, user.to_hex());
        assert_eq!(claims.email, "kim@example.com");
    }

    #[test]
    fn expired_token_is_rejected() {
        let expires = Utc::now() - Duration::seconds(5);
        let token = create_token(&Uuid::new_v4(), &ObjectId::new(), "a@b.io", expires, SECRET).unwrap();
        assert!(matches!(validate_token(&token, SECRET), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let expires = Utc::now() + Duration::seconds(60);
        let token = create_token(&Uuid::new_v4(), &ObjectId::new(), "a@b.io", expires, "other").unwrap();
        assert!(validate_token(&token, SECRET).is_err());
    }

    #[test]
    fn password_hash_verifies() {
        let hashed = hash_password("abcd", 4).unwrap();
        assert_ne!(hashed, "abcd");
        assert!(verify_password("abcd", &hashed).unwrap());
        assert!(!verify_password("abce", &hashed).unwrap());
    }

    #[test]
    fn session_id_from_cookie_jar() {
        let sid = Uuid::new_v4();
        let expires = Utc::now() + Duration::seconds(60);
        let token = create_token(&sid, &ObjectId::new(), "a@b.io", expires, SECRET).unwrap();
        let jar = CookieJar::new().add(session_cookie(token, 60));

        assert_eq!(session_id_from(&jar, SECRET), Some(sid));
        assert_eq!(session_id_from(&CookieJar::new(), SECRET), None);
    }

    #[test]
    fn session_cookie_expires_with_session() {
        let cookie = session_cookie("token".into(), 60);
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(60)));
        assert_eq!(cookie.http_only(), Some(true));
    }
}
