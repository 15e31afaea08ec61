use std::cell::{Cell, RefCell};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::relay::{interpret, FormRelay, RelayError};
use super::status::{AutoHide, StatusBanner, StatusKind, StatusView};

pub const SUCCESS_MESSAGE: &str = "Success! Your message has been sent.";
pub const BUSY_LABEL: &str = "Sending...";
pub const ACCESS_KEY_FIELD: &str = "access_key";

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please complete all required fields.")]
    MissingFields,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Error: {0}")]
    Rejected(String),
    #[error("Something went wrong. Please try again.")]
    Transport(#[from] RelayError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactFields {
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() || self.email.is_empty() || self.message.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }
}

/// Every named form entry plus the relay access key, in posting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    entries: Vec<(String, String)>,
}

impl Submission {
    pub fn new(mut entries: Vec<(String, String)>, access_key: &str) -> Self {
        entries.push((ACCESS_KEY_FIELD.to_string(), access_key.to_string()));
        Self { entries }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    Validating,
    Sending,
    Success,
    Error,
}

/// The parts of the page the submit flow reads from and writes to.
pub trait ContactSurface {
    /// Raw name, email and message values.
    fn fields(&self) -> ContactFields;
    /// All named entries of the form, untrimmed.
    fn entries(&self) -> Vec<(String, String)>;
    /// Current label of the submit button, `None` without a button.
    fn submit_label(&self) -> Option<String>;
    fn set_submit(&self, label: &str, disabled: bool);
    fn render_status(&self, view: &StatusView);
    fn reset(&self);
}

#[derive(Debug)]
pub struct SubmitReport {
    pub result: Result<(), SubmitError>,
    pub auto_hide: Option<AutoHide>,
}

pub struct ContactForm<S, R> {
    surface: S,
    relay: R,
    access_key: String,
    banner: RefCell<StatusBanner>,
    phase: Cell<FormPhase>,
}

impl<S: ContactSurface, R: FormRelay> ContactForm<S, R> {
    pub fn new(surface: S, relay: R, access_key: impl Into<String>) -> Self {
        Self {
            surface,
            relay,
            access_key: access_key.into(),
            banner: RefCell::new(StatusBanner::default()),
            phase: Cell::new(FormPhase::Idle),
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase.get()
    }

    pub async fn submit(&self) -> SubmitReport {
        self.phase.set(FormPhase::Validating);
        if let Err(err) = self.surface.fields().trimmed().validate() {
            log::debug!("contact form rejected locally: {err}");
            return self.publish(Err(err.into()));
        }

        let submission = Submission::new(self.surface.entries(), &self.access_key);
        let label = self.surface.submit_label();
        if label.is_some() {
            self.surface.set_submit(BUSY_LABEL, true);
        }
        self.phase.set(FormPhase::Sending);

        let result = match self.relay.post(&submission).await {
            Ok(response) => interpret(&response),
            Err(err) => Err(err.into()),
        };
        match &result {
            Ok(()) => log::info!("contact message sent"),
            Err(SubmitError::Transport(err)) => log::error!("Contact form error: {err}"),
            Err(err) => log::warn!("contact message rejected: {err}"),
        }

        let report = self.publish(result);
        if report.result.is_ok() {
            self.surface.reset();
        }
        if let Some(label) = label {
            self.surface.set_submit(&label, false);
        }
        report
    }

    fn publish(&self, result: Result<(), SubmitError>) -> SubmitReport {
        let (text, kind) = match &result {
            Ok(()) => (SUCCESS_MESSAGE.to_string(), StatusKind::Success),
            Err(err) => (err.to_string(), StatusKind::Error),
        };
        self.phase.set(match &result {
            Ok(()) => FormPhase::Success,
            Err(SubmitError::Invalid(_)) => FormPhase::Idle,
            Err(_) => FormPhase::Error,
        });

        let mut banner = self.banner.borrow_mut();
        let auto_hide = banner.show(text, kind);
        if let Some(view) = banner.view() {
            self.surface.render_status(view);
        }
        SubmitReport { result, auto_hide }
    }

    /// Timer callback for an [`AutoHide`]; ignored if a newer message is up.
    pub fn expire_status(&self, generation: u64) {
        let mut banner = self.banner.borrow_mut();
        if !banner.expire(generation) {
            return;
        }
        if let Some(view) = banner.view() {
            self.surface.render_status(view);
        }
        if self.phase.get() == FormPhase::Success {
            self.phase.set(FormPhase::Idle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields(name: &str, email: &str, message: &str) -> ContactFields {
        ContactFields {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn whitespace_only_fields_are_missing() {
        let f = fields("  ", "a@b.co", "hi").trimmed();
        assert_eq!(f.validate(), Err(ValidationError::MissingFields));
        let f = fields("Ada", "a@b.co", "\n\t").trimmed();
        assert_eq!(f.validate(), Err(ValidationError::MissingFields));
    }

    #[test]
    fn missing_fields_win_over_bad_email() {
        let f = fields("", "not-an-email", "hi");
        assert_eq!(f.validate(), Err(ValidationError::MissingFields));
    }

    #[test]
    fn email_shape() {
        for ok in ["a@b.c", "ada.lovelace@example.co.uk", "x+tag@sub.domain.io"] {
            assert!(is_valid_email(ok), "{ok}");
        }
        for bad in ["plain", "a@b", "@b.c", "a@.c", "a@b.", "a b@c.d", "a@b@c.d"] {
            assert!(!is_valid_email(bad), "{bad}");
        }
    }

    #[test]
    fn trimmed_input_is_validated() {
        let f = fields(" Ada ", "  ada@example.com ", " Hello ").trimmed();
        assert_eq!(f, fields("Ada", "ada@example.com", "Hello"));
        assert_eq!(f.validate(), Ok(()));
    }

    #[test]
    fn submission_appends_access_key() {
        let submission = Submission::new(
            vec![("name".into(), "Ada".into()), ("email".into(), "ada@example.com".into())],
            "key-123",
        );
        let entries: Vec<_> = submission.entries().collect();
        assert_eq!(
            entries,
            vec![
                ("name", "Ada"),
                ("email", "ada@example.com"),
                ("access_key", "key-123")
            ]
        );
    }

    #[test]
    fn validation_messages_match_banner_text() {
        assert_eq!(
            SubmitError::from(ValidationError::MissingFields).to_string(),
            "Please complete all required fields."
        );
        assert_eq!(
            SubmitError::from(ValidationError::InvalidEmail).to_string(),
            "Please enter a valid email address."
        );
    }
}
