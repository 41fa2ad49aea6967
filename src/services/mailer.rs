// ============================================================================
// SERVICE : MAILER
// ============================================================================
//
// Description:
//   Envoi des emails transactionnels (codes de vérification, confirmations
//   et mises à jour de commande, notifications admin).
//
// Workflow:
//   1. Un handler HTTP dépose un OutboundEmail dans la file (enqueue)
//   2. Le worker en arrière-plan consomme la file
//   3. Chaque envoi est tenté jusqu'à 3 fois, backoff doublé (1s, 2s)
//   4. Échec final: loggé puis abandonné (best-effort)
//
// Points d'attention:
//   - La réponse HTTP ne dépend JAMAIS de la latence ni du succès SMTP
//   - Le trait Mailer isole le transport lettre pour les tests
//
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::AppConfig;

pub const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("invalid email address: {0}")]
    InvalidAddress(String),
}

/// Un email sortant tel que déposé dans la file par les handlers.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), EmailError>;
}

/// Transport SMTP réel (STARTTLS + identifiants de la configuration).
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    pub fn new(config: &AppConfig) -> Result<Self, EmailError> {
        let credentials =
            Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from_address: config.email_from.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(email
                .to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(email.to.clone()))?)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())?;

        self.transport.send(message).await?;
        Ok(())
    }
}

/// Poignée clonable vers la file d'envoi.
#[derive(Clone)]
pub struct EmailQueue {
    sender: mpsc::UnboundedSender<OutboundEmail>,
}

impl EmailQueue {
    /// Crée la file et démarre le worker d'envoi en arrière-plan.
    pub fn start(mailer: Arc<dyn Mailer>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(mailer, receiver));
        Self { sender }
    }

    /// Dépose un email. Un échec (worker arrêté) est loggé, jamais remonté:
    /// le courrier est best-effort, la requête HTTP n'en dépend pas.
    pub fn enqueue(&self, email: OutboundEmail) {
        if self.sender.send(email).is_err() {
            tracing::error!("email worker is gone, dropping outbound email");
        }
    }
}

async fn run_worker(mailer: Arc<dyn Mailer>, mut receiver: mpsc::UnboundedReceiver<OutboundEmail>) {
    while let Some(email) = receiver.recv().await {
        deliver_with_retry(mailer.as_ref(), &email).await;
    }
}

/// Tente l'envoi jusqu'à MAX_ATTEMPTS fois, backoff doublé entre chaque
/// tentative. L'échec final ne fait jamais tomber le worker.
async fn deliver_with_retry(mailer: &dyn Mailer, email: &OutboundEmail) {
    let mut backoff = INITIAL_BACKOFF;

    for attempt in 1..=MAX_ATTEMPTS {
        match mailer.send(email).await {
            Ok(()) => {
                tracing::info!(to = %email.to, subject = %email.subject, "email sent");
                return;
            }
            Err(e) if attempt < MAX_ATTEMPTS => {
                tracing::warn!(to = %email.to, attempt, error = %e, "email send failed, retrying");
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(e) => {
                tracing::error!(
                    to = %email.to,
                    attempts = MAX_ATTEMPTS,
                    error = %e,
                    "giving up on outbound email"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Mailer de test: échoue les `failures` premiers envois puis réussit.
    struct FlakyMailer {
        failures: u32,
        attempts: AtomicU32,
    }

    impl FlakyMailer {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                attempts: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl Mailer for FlakyMailer {
        async fn send(&self, _email: &OutboundEmail) -> Result<(), EmailError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt <= self.failures {
                Err(EmailError::InvalidAddress("simulated failure".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn sample_email() -> OutboundEmail {
        OutboundEmail {
            to: "ada@example.com".to_string(),
            subject: "Test".to_string(),
            body: "Hello".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_then_success() {
        let mailer = FlakyMailer::new(2);
        deliver_with_retry(&mailer, &sample_email()).await;

        // 2 échecs puis 1 succès
        assert_eq!(mailer.attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let mailer = FlakyMailer::new(u32::MAX);
        deliver_with_retry(&mailer, &sample_email()).await;

        assert_eq!(mailer.attempts.load(Ordering::SeqCst), MAX_ATTEMPTS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success_sends_once() {
        let mailer = FlakyMailer::new(0);
        deliver_with_retry(&mailer, &sample_email()).await;

        assert_eq!(mailer.attempts.load(Ordering::SeqCst), 1);
    }
}
