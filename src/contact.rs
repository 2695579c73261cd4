//! Contact form submission flow.
//!
//! The form is posted to the contact webhook. Only the HTTP status matters:
//! a 2xx clears the form and shows success; anything else, including a
//! transport failure, keeps the entered values and shows an error banner.

use tracing::{info, warn};

use crate::error::ContactError;
use crate::webhook::{ContactForm, ContactTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactStatus {
    Idle,
    Submitting,
    Success,
    Error,
}

impl ContactForm {
    /// Check the fields the site marks as required.
    pub fn validate(&self) -> Result<(), ContactError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(ContactError::MissingField(field));
            }
        }
        if !self.email.contains('@') {
            return Err(ContactError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}

pub struct ContactFormController<T> {
    transport: T,
    form: ContactForm,
    status: ContactStatus,
}

impl<T: ContactTransport> ContactFormController<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            form: ContactForm::default(),
            status: ContactStatus::Idle,
        }
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ContactForm {
        &mut self.form
    }

    pub fn status(&self) -> ContactStatus {
        self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == ContactStatus::Submitting
    }

    /// Post the current form and record the outcome.
    pub async fn submit(&mut self) -> ContactStatus {
        self.status = ContactStatus::Submitting;
        match self.transport.submit(&self.form).await {
            Ok(()) => {
                info!("contact form submitted");
                self.form = ContactForm::default();
                self.status = ContactStatus::Success;
            }
            Err(e) => {
                warn!(error = %e, "contact form submission failed");
                self.status = ContactStatus::Error;
            }
        }
        self.status
    }
}
