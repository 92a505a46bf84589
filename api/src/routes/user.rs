use crate::{
    AppState,
    auth::{
        CurrentUser, create_token, hash_password, removal_cookie, session_cookie, session_id_from,
        verify_password,
    },
    dto::{LoginRequest, RegisterRequest},
    errors::ApiError,
    models::User,
    views,
};
use axum::{
    Form,
    extract::State,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use tracing::{info, warn};
use validator::Validate;

/// GET /register
pub async fn register_form(CurrentUser(user): CurrentUser) -> Html<String> {
    views::register(user.as_ref())
}

/// POST /register
/// Form: useremail, password, confirm_password, username, nickname
pub async fn register(
    State(state): State<AppState>,
    Form(payload): Form<RegisterRequest>,
) -> Result<Redirect, ApiError> {
    payload.validate()?;

    if state
        .users
        .find_by_email(&payload.useremail)
        .await?
        .is_some()
    {
        return Err(ApiError::UserAlreadyExists(
            "Email is already registered".into(),
        ));
    }

    if state
        .users
        .find_by_nickname(&payload.nickname)
        .await?
        .is_some()
    {
        return Err(ApiError::UserAlreadyExists("Nickname is already taken".into()));
    }

    let user = User {
        id: ObjectId::new(),
        email: payload.useremail,
        hashed_password: hash_password(&payload.password, state.config.bcrypt_cost)?,
        username: payload.username,
        nickname: payload.nickname,
        created_at: Utc::now().timestamp(),
    };

    state.users.insert(&user).await?;

    info!("New user registered: {}", user.email);

    Ok(Redirect::to("/"))
}

/// GET /login
pub async fn login_form(CurrentUser(user): CurrentUser) -> Html<String> {
    views::login(user.as_ref())
}

/// POST /login
/// Form: useremail, password
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(payload): Form<LoginRequest>,
) -> Result<(CookieJar, Redirect), ApiError> {
    payload.validate()?;

    if state.login_limiter.check_key(&payload.useremail).is_err() {
        warn!("Login throttled for {}", payload.useremail);
        return Err(ApiError::TooManyRequests);
    }

    let Some(user) = state.users.find_by_email(&payload.useremail).await? else {
        warn!("Login for unknown email {}", payload.useremail);
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&payload.password, &user.hashed_password)? {
        warn!("Wrong password for {}", user.email);
        return Err(ApiError::InvalidCredentials);
    }

    // a re-login replaces whatever session the browser was holding
    if let Some(previous) = session_id_from(&jar, &state.config.session_secret) {
        state.sessions.remove(&previous);
    }

    let (session_id, expires_at) = state.sessions.create(user.id);
    let token = create_token(
        &session_id,
        &user.id,
        &user.email,
        expires_at,
        &state.config.session_secret,
    )?;

    info!("User logged in: {}", user.email);

    Ok((jar.add(session_cookie(token, state.config.session_ttl_secs)), Redirect::to("/")))
}

/// POST /logout
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(session_id) = session_id_from(&jar, &state.config.session_secret) {
        state.sessions.remove(&session_id);
        info!("Session closed: {}", session_id);
    }

    (jar.remove(removal_cookie()), Redirect::to("/"))
}
