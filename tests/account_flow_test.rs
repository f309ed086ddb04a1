//! Account lifecycle integration tests: register → verify → login →
//! password reset, against a real temp-dir SQLite storage. The mailer runs
//! with no API key, so sends are accepted and dropped — registration must
//! succeed regardless.

use std::sync::Arc;

use tempfile::TempDir;
use visad::account;
use visad::auth::{PURPOSE_RESET, PURPOSE_SESSION, PURPOSE_VERIFY};
use visad::config::ServiceConfig;
use visad::email::{self, MailerSender};
use visad::error::ApiError;
use visad::storage::Storage;

// ─── Helpers ─────────────────────────────────────────────────────────────────

async fn setup(dir: &TempDir) -> (Storage, MailerSender) {
    let storage = Storage::new(dir.path()).await.unwrap();
    let mailer = email::spawn(Arc::new(ServiceConfig::default()));
    (storage, mailer)
}

/// Grab a stored token for a user straight from the table — tests stand in
/// for the email the user would normally receive.
async fn token_for(storage: &Storage, user_id: &str, purpose: &str) -> String {
    sqlx::query_scalar("SELECT token FROM auth_tokens WHERE user_id = ? AND purpose = ?")
        .bind(user_id)
        .bind(purpose)
        .fetch_one(&storage.pool())
        .await
        .unwrap()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_register_verify_login() {
    let dir = TempDir::new().unwrap();
    let (storage, mailer) = setup(&dir).await;

    let user = account::register(
        &storage,
        &mailer,
        "Ada@Example.com",
        "motdepasse",
        Some("Ada"),
        Some("Diallo"),
    )
    .await
    .unwrap();
    // Email is normalized.
    assert_eq!(user.email, "ada@example.com");
    assert!(!user.email_verified);

    let token = token_for(&storage, &user.id, PURPOSE_VERIFY).await;
    account::verify_email(&storage, &mailer, &token).await.unwrap();
    let user = storage.get_user(&user.id).await.unwrap().unwrap();
    assert!(user.email_verified);

    // Verification tokens are single-use.
    let err = account::verify_email(&storage, &mailer, &token).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let (logged_in, session) = account::login(&storage, "ada@example.com", "motdepasse")
        .await
        .unwrap();
    assert_eq!(logged_in.id, user.id);
    let row = storage.get_token(&session, PURPOSE_SESSION).await.unwrap();
    assert_eq!(row.unwrap().user_id, user.id);
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_weak_input() {
    let dir = TempDir::new().unwrap();
    let (storage, mailer) = setup(&dir).await;

    account::register(&storage, &mailer, "a@b.c", "motdepasse", None, None)
        .await
        .unwrap();

    let err = account::register(&storage, &mailer, "a@b.c", "autrepass", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    let err = account::register(&storage, &mailer, "pas-un-email", "motdepasse", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let err = account::register(&storage, &mailer, "b@c.d", "court", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let dir = TempDir::new().unwrap();
    let (storage, mailer) = setup(&dir).await;
    account::register(&storage, &mailer, "a@b.c", "motdepasse", None, None)
        .await
        .unwrap();

    let err = account::login(&storage, "a@b.c", "mauvais-mdp").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidCredentials));
    // Unknown email gets the same shape.
    let err = account::login(&storage, "inconnu@b.c", "motdepasse").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidCredentials));
}

#[tokio::test]
async fn test_password_reset_revokes_sessions() {
    let dir = TempDir::new().unwrap();
    let (storage, mailer) = setup(&dir).await;
    let user = account::register(&storage, &mailer, "a@b.c", "motdepasse", None, None)
        .await
        .unwrap();
    let (_, session) = account::login(&storage, "a@b.c", "motdepasse").await.unwrap();

    // Enumeration-safe: unknown emails succeed silently.
    account::request_password_reset(&storage, &mailer, "inconnu@b.c")
        .await
        .unwrap();
    account::request_password_reset(&storage, &mailer, "a@b.c")
        .await
        .unwrap();

    let token = token_for(&storage, &user.id, PURPOSE_RESET).await;
    account::reset_password(&storage, &token, "nouveau-mdp")
        .await
        .unwrap();

    // Old password dead, old session revoked, new password works.
    assert!(account::login(&storage, "a@b.c", "motdepasse").await.is_err());
    assert!(storage
        .get_token(&session, PURPOSE_SESSION)
        .await
        .unwrap()
        .is_none());
    account::login(&storage, "a@b.c", "nouveau-mdp").await.unwrap();
}
