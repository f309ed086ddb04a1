//! Account lifecycle: registration, login, email verification, password
//! reset. Thin orchestration over auth plumbing, storage, and the mailer —
//! every mail is fire-and-forget.

use tracing::info;

use crate::auth::{self, PURPOSE_RESET, PURPOSE_SESSION, PURPOSE_VERIFY};
use crate::email::{Mail, MailerSender};
use crate::error::ApiError;
use crate::storage::{Storage, UserRow};

const MIN_PASSWORD_LEN: usize = 6;

fn check_password(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "Le mot de passe doit contenir au moins {MIN_PASSWORD_LEN} caractères"
        )));
    }
    Ok(())
}

/// Create an account and queue the verification email. Responds without
/// waiting on delivery.
pub async fn register(
    storage: &Storage,
    mailer: &MailerSender,
    email: &str,
    password: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<UserRow, ApiError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::Validation("Adresse email invalide".into()));
    }
    check_password(password)?;

    if storage.get_user_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict(
            "Un compte existe déjà avec cet email".into(),
        ));
    }

    let salt = auth::generate_salt();
    let hash = auth::hash_password(password, &salt);
    let user = storage
        .create_user(&email, &hash, &salt, first_name, last_name)
        .await?;

    let token = auth::generate_token();
    storage
        .insert_token(
            &token,
            &user.id,
            PURPOSE_VERIFY,
            &auth::expiry_for(PURPOSE_VERIFY),
        )
        .await?;
    mailer.send(Mail::Verification { to: email, token });

    info!("registered user {}", user.id);
    Ok(user)
}

/// Verify credentials and issue a session token.
pub async fn login(
    storage: &Storage,
    email: &str,
    password: &str,
) -> Result<(UserRow, String), ApiError> {
    let email = email.trim().to_lowercase();
    let user = storage
        .get_user_by_email(&email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !auth::verify_password(password, &user.salt, &user.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = auth::generate_token();
    storage
        .insert_token(
            &token,
            &user.id,
            PURPOSE_SESSION,
            &auth::expiry_for(PURPOSE_SESSION),
        )
        .await?;
    Ok((user, token))
}

/// Consume a verification token and activate the account.
pub async fn verify_email(
    storage: &Storage,
    mailer: &MailerSender,
    token: &str,
) -> Result<(), ApiError> {
    let row = storage
        .get_token(token, PURPOSE_VERIFY)
        .await?
        .ok_or_else(|| ApiError::Validation("Lien de vérification invalide ou expiré".into()))?;

    storage.set_email_verified(&row.user_id).await?;
    storage.delete_token(token).await?;

    if let Some(user) = storage.get_user(&row.user_id).await? {
        mailer.send(Mail::Welcome {
            to: user.email,
            name: user.first_name.unwrap_or_default(),
        });
    }
    Ok(())
}

/// Request a password reset. Always succeeds from the caller's point of view
/// so the endpoint can't be used to probe which emails exist.
pub async fn request_password_reset(
    storage: &Storage,
    mailer: &MailerSender,
    email: &str,
) -> Result<(), ApiError> {
    let email = email.trim().to_lowercase();
    let Some(user) = storage.get_user_by_email(&email).await? else {
        return Ok(());
    };

    storage.delete_tokens_for(&user.id, PURPOSE_RESET).await?;
    let token = auth::generate_token();
    storage
        .insert_token(
            &token,
            &user.id,
            PURPOSE_RESET,
            &auth::expiry_for(PURPOSE_RESET),
        )
        .await?;
    mailer.send(Mail::PasswordReset { to: email, token });
    Ok(())
}

/// Consume a reset token and set a new password. Existing sessions are
/// revoked.
pub async fn reset_password(
    storage: &Storage,
    token: &str,
    new_password: &str,
) -> Result<(), ApiError> {
    check_password(new_password)?;

    let row = storage
        .get_token(token, PURPOSE_RESET)
        .await?
        .ok_or_else(|| {
            ApiError::Validation("Lien de réinitialisation invalide ou expiré".into())
        })?;

    let salt = auth::generate_salt();
    let hash = auth::hash_password(new_password, &salt);
    storage.update_password(&row.user_id, &hash, &salt).await?;
    storage.delete_token(token).await?;
    storage
        .delete_tokens_for(&row.user_id, PURPOSE_SESSION)
        .await?;
    Ok(())
}
