//! Email delivery for invitations.
//!
//! Uses SMTP via lettre. Delivery is best-effort: invitation creation
//! succeeds even when the mail cannot be sent, and the caller decides
//! whether to surface that.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;
use crate::models::Invitation;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send an invitation email with the registration link.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be built or sent.
    pub async fn send_invitation(
        &self,
        invitation: &Invitation,
        base_url: &str,
    ) -> Result<(), EmailError> {
        let link = format!(
            "{}/register?token={}",
            base_url.trim_end_matches('/'),
            invitation.token
        );

        let note = invitation
            .message
            .as_deref()
            .map(|m| format!("\n{m}\n"))
            .unwrap_or_default();

        let text = format!(
            "Hi {name},\n\n\
             You have been invited to join Construct.\n{note}\n\
             Accept your invitation and create your account here:\n\n{link}\n\n\
             This link expires on {expires}.\n",
            name = invitation.name,
            expires = invitation.expires_at.format("%Y-%m-%d"),
        );

        let html_note = invitation
            .message
            .as_deref()
            .map(|m| format!("<p><em>{}</em></p>", html_escape(m)))
            .unwrap_or_default();

        let html = format!(
            "<p>Hi {name},</p>\
             <p>You have been invited to join <strong>Construct</strong>.</p>\
             {html_note}\
             <p><a href=\"{link}\">Accept your invitation</a> and create your account.</p>\
             <p>This link expires on {expires}.</p>",
            name = html_escape(&invitation.name),
            expires = invitation.expires_at.format("%Y-%m-%d"),
        );

        self.send_multipart_email(
            invitation.email.as_str(),
            "You're invited to Construct",
            &text,
            &html,
        )
        .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        Ok(())
    }
}

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_html_special_characters() {
        assert_eq!(html_escape("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(html_escape("plain"), "plain");
    }
}
