use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::domain::repository::{DeliveryError, OtpMailer};

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: String,
}

/// Sends login codes through the Resend HTTP API.
#[derive(Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    base_url: Arc<str>,
    api_key: Arc<str>,
    from: Arc<str>,
}

impl ResendMailer {
    pub fn new(
        base_url: &str,
        api_key: &str,
        from: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').into(),
            api_key: api_key.into(),
            from: from.into(),
        })
    }
}

fn render_code_email(code: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #2563eb;">Your Login Code</h2>
  <p>Enter this code to finish signing in to AeroRide:</p>
  <div style="background: #f3f4f6; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h1 style="margin: 0; font-size: 32px; letter-spacing: 4px; text-align: center;">{code}</h1>
  </div>
  <p style="color: #6b7280; font-size: 14px;">This code expires in 5 minutes.</p>
  <p style="color: #6b7280; font-size: 14px;">If you did not request it, you can ignore this email.</p>
</div>"#
    )
}

impl OtpMailer for ResendMailer {
    async fn send_code(&self, email: &str, code: &str) -> Result<(), DeliveryError> {
        let body = SendEmailRequest {
            from: &self.from,
            to: [email],
            subject: "Your AeroRide login code",
            html: render_code_email(code),
        };

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&*self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DeliveryError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DeliveryError(format!("resend returned {status}: {detail}")));
        }
        Ok(())
    }
}
