use askama::Template;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

use crate::domain::auth::models::ConfirmationEmail;
use crate::domain::auth::ports::EmailDispatcher;

const MESSAGE_STREAM: &str = "outbound";
const AUTH_HEADER: &str = "X-Postmark-Server-Token";
const SUBJECT: &str = "Confirm your email";

#[derive(Debug, Error)]
enum DeliveryError {
    #[error("Failed to render email: {0}")]
    Render(#[from] askama::Error),
    #[error("Email API request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// HTML body of the confirmation email. Interpolated values are escaped.
#[derive(Template)]
#[template(
    source = "<p>Hi {{ username }},</p>\
<p>Thanks for signing up. Please confirm your email address:</p>\
<p><a href=\"{{ link }}\">{{ link }}</a></p>",
    ext = "html"
)]
struct ConfirmationTemplate<'a> {
    username: &'a str,
    link: &'a str,
}

/// Sends confirmation emails through a transactional email HTTP API.
///
/// Each message is posted from its own tokio task, so callers never wait on
/// the provider and delivery failures only show up in the log.
#[derive(Clone)]
pub struct HttpEmailDispatcher {
    http_client: Client,
    api_url: String,
    api_token: String,
    sender: String,
}

impl HttpEmailDispatcher {
    pub fn new(http_client: Client, api_url: String, api_token: String, sender: String) -> Self {
        Self {
            http_client,
            api_url,
            api_token,
            sender,
        }
    }

    async fn deliver(self, email: ConfirmationEmail) -> Result<(), DeliveryError> {
        let text_body = email.confirmation_link();
        let html_body = render_confirmation(&email)?;
        let request_body = SendEmailRequest {
            from: &self.sender,
            to: &email.recipient,
            subject: SUBJECT,
            html_body: &html_body,
            text_body: &text_body,
            message_stream: MESSAGE_STREAM,
        };

        self.http_client
            .post(&self.api_url)
            .header(AUTH_HEADER, &self.api_token)
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

impl EmailDispatcher for HttpEmailDispatcher {
    fn send_confirmation(&self, email: ConfirmationEmail) {
        let dispatcher = self.clone();

        tokio::spawn(async move {
            let recipient = email.recipient.clone();
            match dispatcher.deliver(email).await {
                Ok(()) => tracing::info!(recipient = %recipient, "Confirmation email sent"),
                Err(e) => tracing::error!(
                    recipient = %recipient,
                    error = %e,
                    "Failed to send confirmation email"
                ),
            }
        });
    }
}

fn render_confirmation(email: &ConfirmationEmail) -> Result<String, askama::Error> {
    let link = email.confirmation_link();
    ConfirmationTemplate {
        username: &email.username,
        link: &link,
    }
    .render()
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
    message_stream: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_link_and_name() {
        let email = ConfirmationEmail {
            recipient: "alice@example.com".to_string(),
            username: "alice".to_string(),
            base_url: "http://localhost:8000/".to_string(),
            token: "abc".to_string(),
        };

        let html = render_confirmation(&email).unwrap();
        assert!(html.contains("Hi alice,"));
        assert!(html.contains(
            "<a href=\"http://localhost:8000/api/auth/confirmed_email/abc\">"
        ));
    }

    #[test]
    fn test_render_escapes_username_markup() {
        let email = ConfirmationEmail {
            recipient: "victim@example.com".to_string(),
            username: "<a href=\"https://evil.example/\">Verify here</a>".to_string(),
            base_url: "http://localhost:8000/".to_string(),
            token: "abc".to_string(),
        };

        let html = render_confirmation(&email).unwrap();
        assert!(!html.contains("<a href=\"https://evil.example/\">"));
        assert!(html.contains("Hi &lt;a href="));
        assert_eq!(html.matches("<a href=").count(), 1);
    }

    #[test]
    fn test_request_body_field_names() {
        let body = SendEmailRequest {
            from: "noreply@example.com",
            to: "alice@example.com",
            subject: SUBJECT,
            html_body: "<p></p>",
            text_body: "",
            message_stream: MESSAGE_STREAM,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["From"], "noreply@example.com");
        assert_eq!(json["To"], "alice@example.com");
        assert_eq!(json["MessageStream"], "outbound");
    }
}
