use crate::{
    database::{ResourceStore, StoreError},
    models::{LoginRequest, LoginResponse, RegisterForm, User},
    services::validation::{normalize_email, required, required_verbatim},
    state::AppState,
    utils::AppError,
};
use uuid::Uuid;

const TEMPORARY_PASSWORD_LEN: usize = 12;
const RECOVERY_SUBJECT: &str = "Your planetary API password";

async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
        .map_err(AppError::from)
}

async fn password_matches(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
        .map_err(AppError::from)
}

/// Which stored hash a submitted password matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Matched {
    Password,
    TemporaryPassword,
}

async fn check_credentials(
    users: &dyn ResourceStore<User>,
    email: &str,
    password: &str,
) -> Result<(User, Matched), AppError> {
    let user = users
        .find_by_unique_field("email", &normalize_email(email))
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if password_matches(password.to_string(), user.password.clone()).await? {
        return Ok((user, Matched::Password));
    }

    if let Some(temporary) = user.temporary_password.clone() {
        if password_matches(password.to_string(), temporary).await? {
            return Ok((user, Matched::TemporaryPassword));
        }
    }

    Err(AppError::InvalidCredentials)
}

/// Looks the user up by email and checks the password against the stored
/// hash, or against a pending recovery password. An unknown email and a
/// wrong password fail identically.
pub async fn verify_credentials(
    users: &dyn ResourceStore<User>,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    check_credentials(users, email, password).await.map(|(user, _)| user)
}

// User registration
pub async fn register(state: &AppState, form: RegisterForm) -> Result<User, AppError> {
    let first_name = required("first_name", form.first_name)?;
    let last_name = required("last_name", form.last_name)?;
    let email = normalize_email(&required("email", form.email)?);
    let password = required_verbatim("password", form.password)?;

    // Friendly early answer; the store's unique constraint is what actually
    // closes the race between two concurrent registrations.
    if state.users.find_by_unique_field("email", &email).await?.is_some() {
        return Err(AppError::DuplicateKey("That email already exists.".to_string()));
    }

    let mut user = User {
        id: 0,
        first_name,
        last_name,
        email,
        password: hash_password(password, state.bcrypt_cost).await?,
        temporary_password: None,
    };

    user.id = state.users.create(user.clone()).await.map_err(|e| match e {
        StoreError::DuplicateKey { .. } => AppError::DuplicateKey("That email already exists.".to_string()),
        other => other.into(),
    })?;

    log::info!("✅ User registered successfully: {}", user.email);

    Ok(user)
}

// User login
pub async fn login(state: &AppState, request: &LoginRequest) -> Result<LoginResponse, AppError> {
    let (mut user, matched) = check_credentials(state.users.as_ref(), &request.email, &request.password).await?;

    // A login settles any pending recovery: using the mailed password makes
    // it the account password, using the old one discards the mailed one.
    if let Some(temporary) = user.temporary_password.take() {
        if matched == Matched::TemporaryPassword {
            user.password = temporary;
            log::info!("🔑 Recovery password adopted for {}", user.email);
        }
        state.users.update(user.id, user.clone()).await?;
    }

    let token = state.tokens.issue(&user.email)?;

    Ok(LoginResponse {
        message: "Login succeeded!".to_string(),
        token,
    })
}

/// Mails a generated temporary password. The current password stays valid;
/// the temporary one is accepted alongside it until the next login.
pub async fn retrieve_password(state: &AppState, email: &str) -> Result<(), AppError> {
    let mut user = state
        .users
        .find_by_unique_field("email", &normalize_email(email))
        .await?
        .ok_or_else(|| AppError::Unauthorized("That email doesn't exist".to_string()))?;

    let temporary: String = Uuid::new_v4().simple().to_string().chars().take(TEMPORARY_PASSWORD_LEN).collect();

    user.temporary_password = Some(hash_password(temporary.clone(), state.bcrypt_cost).await?);
    state.users.update(user.id, user.clone()).await?;

    let body = format!(
        "Hello {},\n\nYour temporary planetary API password is: {}\n\nYour previous password keeps working until you log in with one of them.",
        user.first_name, temporary
    );

    state
        .notifier
        .send(&user.email, RECOVERY_SUBJECT, &body)
        .await?;

    Ok(())
}
