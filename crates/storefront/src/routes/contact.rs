//! Contact form route handler.
//!
//! The contact form has no mailbox behind it: a valid submission is turned
//! into a pre-filled WhatsApp message to the shop number.

use axum::{Form, extract::State, response::Redirect};
use boutique_core::Email;
use serde::Deserialize;
use tracing::instrument;

use crate::checkout::ContactMessage;
use crate::error::AppError;
use crate::state::AppState;

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
}

impl TryFrom<ContactForm> for ContactMessage {
    type Error = AppError;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        let email: Email = form
            .email
            .parse()
            .map_err(|e| AppError::BadRequest(format!("email: {e}")))?;

        let name = form.name.trim();
        let message = form.message.trim();
        if name.is_empty() || message.is_empty() {
            return Err(AppError::BadRequest(
                "name and message are required".to_string(),
            ));
        }

        Ok(Self {
            name: name.to_string(),
            email,
            phone: form
                .phone
                .map(|phone| phone.trim().to_string())
                .filter(|phone| !phone.is_empty()),
            message: message.to_string(),
        })
    }
}

/// Submit the contact form.
///
/// POST /contact
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> Result<Redirect, AppError> {
    let contact = ContactMessage::try_from(form)?;
    tracing::info!(email_domain = contact.email.domain(), "Contact message handed off");
    Ok(Redirect::to(&state.checkout().contact_url(&contact)))
}
