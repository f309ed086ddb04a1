//! Fire-and-forget transactional email.
//!
//! Mails are queued on an in-memory channel and delivered by a background
//! task posting to the email HTTP API. Send failures are logged and dropped —
//! email never blocks or fails the triggering workflow. Without an API key
//! the mailer degrades to a logged no-op.

use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::ServiceConfig;

const QUEUE_DEPTH: usize = 100;
const SEND_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub enum Mail {
    Verification { to: String, token: String },
    Welcome { to: String, name: String },
    PasswordReset { to: String, token: String },
}

// ─── Sender handle ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MailerSender {
    tx: mpsc::Sender<Mail>,
}

impl MailerSender {
    /// Queue a mail for delivery. Never blocks — drops silently if the queue
    /// is full.
    pub fn send(&self, mail: Mail) {
        let _ = self.tx.try_send(mail);
    }
}

// ─── Background delivery task ─────────────────────────────────────────────────

pub fn spawn(config: Arc<ServiceConfig>) -> MailerSender {
    let (tx, mut rx) = mpsc::channel::<Mail>(QUEUE_DEPTH);

    tokio::spawn(async move {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()
            .expect("reqwest client");

        while let Some(mail) = rx.recv().await {
            deliver(&client, &config, mail).await;
        }
    });

    MailerSender { tx }
}

async fn deliver(client: &reqwest::Client, config: &ServiceConfig, mail: Mail) {
    let Some(api_key) = config.email.api_key.as_deref() else {
        debug!("mailer disabled (no API key), dropping {mail:?}");
        return;
    };

    let (to, subject, html) = render(config, &mail);
    let url = format!("{}/emails", config.email.base_url.trim_end_matches('/'));
    let body = json!({
        "from": config.email.from,
        "to": to,
        "subject": subject,
        "html": html,
    });

    match client.post(&url).bearer_auth(api_key).json(&body).send().await {
        Ok(resp) if resp.status().is_success() => {
            debug!("mail sent to {to}");
        }
        Ok(resp) => {
            warn!("mail to {to} rejected with status {}", resp.status());
        }
        Err(e) => {
            warn!("mail to {to} failed: {e}");
        }
    }
}

fn render(config: &ServiceConfig, mail: &Mail) -> (String, String, String) {
    let app_url = config.email.app_url.trim_end_matches('/');
    match mail {
        Mail::Verification { to, token } => {
            let link = format!("{app_url}/auth/verify?token={token}");
            (
                to.clone(),
                "Vérifiez votre compte".to_string(),
                format!(
                    "<h1>Vérifiez votre email</h1>\
                     <p>Cliquez sur le lien ci-dessous pour activer votre compte :</p>\
                     <a href=\"{link}\">{link}</a>"
                ),
            )
        }
        Mail::Welcome { to, name } => (
            to.clone(),
            "Bienvenue !".to_string(),
            format!(
                "<h1>Bienvenue {name} !</h1>\
                 <p>Votre compte est maintenant actif.</p>"
            ),
        ),
        Mail::PasswordReset { to, token } => {
            let link = format!("{app_url}/auth/reset-password?token={token}");
            (
                to.clone(),
                "Réinitialisation de votre mot de passe".to_string(),
                format!(
                    "<h1>Réinitialisation du mot de passe</h1>\
                     <p>Cliquez sur le lien ci-dessous pour choisir un nouveau mot de passe. \
                     Ce lien expire dans une heure.</p>\
                     <a href=\"{link}\">{link}</a>"
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_verification_link() {
        let config = ServiceConfig::default();
        let (to, subject, html) = render(
            &config,
            &Mail::Verification {
                to: "a@b.c".into(),
                token: "tok123".into(),
            },
        );
        assert_eq!(to, "a@b.c");
        assert!(subject.contains("Vérifiez"));
        assert!(html.contains("/auth/verify?token=tok123"));
    }

    #[tokio::test]
    async fn test_disabled_mailer_accepts_sends() {
        // No API key: the send is accepted and silently dropped.
        let sender = spawn(Arc::new(ServiceConfig::default()));
        sender.send(Mail::Welcome {
            to: "a@b.c".into(),
            name: "Ada".into(),
        });
    }
}
