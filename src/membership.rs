use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("email pattern compiles")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(&email.to_lowercase())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Phone,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MembershipForm {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// One message per failing field; `None` means the field passed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldErrors {
    pub name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub phone: Option<&'static str>,
}

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&'static str> {
        match field {
            Field::Name => self.name,
            Field::Email => self.email,
            Field::Phone => self.phone,
        }
    }

    pub fn count(&self) -> usize {
        [self.name, self.email, self.phone]
            .iter()
            .filter(|e| e.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

#[derive(Debug, PartialEq)]
pub enum SubmitOutcome {
    /// All fields passed; the form has been cleared.
    Accepted,
    Rejected(FieldErrors),
}

impl MembershipForm {
    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Phone => self.phone = value,
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let name = self
            .name
            .trim()
            .is_empty()
            .then_some("Full Name is required");

        let email = if self.email.trim().is_empty() {
            Some("Email is required")
        } else if !is_valid_email(&self.email) {
            Some("Email is not valid")
        } else {
            None
        };

        let phone = self
            .phone
            .trim()
            .is_empty()
            .then_some("Phone number is required");

        FieldErrors { name, email, phone }
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        let errors = self.validate();
        if errors.is_empty() {
            *self = MembershipForm::default();
            SubmitOutcome::Accepted
        } else {
            SubmitOutcome::Rejected(errors)
        }
    }
}
