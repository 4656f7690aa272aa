use alloc::{string::String, vec::Vec};
use serde::{Deserialize, Serialize};

/// Contact details collected before the quiz starts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub first_name: String,
    pub company_name: String,
    pub email: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactError {
    MissingFirstName,
    MissingCompanyName,
    MissingEmail,
    InvalidEmail,
}

impl UserInfo {
    /// Reports every failing field at once so the form can flag them together.
    pub fn validate(&self) -> Result<(), Vec<ContactError>> {
        let mut errors = Vec::new();

        if self.first_name.trim().is_empty() {
            errors.push(ContactError::MissingFirstName);
        }

        if self.company_name.trim().is_empty() {
            errors.push(ContactError::MissingCompanyName);
        }

        if self.email.trim().is_empty() {
            errors.push(ContactError::MissingEmail);
        } else if !looks_like_email(&self.email) {
            errors.push(ContactError::InvalidEmail);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Accepts any whitespace-free token of the form `local@domain.tld`.
fn looks_like_email(text: &str) -> bool {
    text.split_whitespace().any(|token| {
        // The local part must be non-empty, so an `@` at the very start does not count.
        let Some(at) = token.bytes().skip(1).position(|byte| byte == b'@').map(|pos| pos + 1) else {
            return false;
        };
        let len = token.len();
        token.bytes().enumerate().any(|(idx, byte)| byte == b'.' && idx >= at + 2 && idx + 1 < len)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(first_name: &str, company_name: &str, email: &str) -> UserInfo {
        UserInfo { first_name: first_name.into(), company_name: company_name.into(), email: email.into() }
    }

    #[test]
    fn accepts_complete_details() {
        assert!(info("Ada", "Analytical Engines", "ada@example.com").validate().is_ok());
        assert!(info("Ada", "AE", "a@b.co").validate().is_ok());
    }

    #[test]
    fn reports_every_missing_field() {
        let errors = info("  ", "", "").validate().unwrap_err();
        assert_eq!(
            errors,
            [ContactError::MissingFirstName, ContactError::MissingCompanyName, ContactError::MissingEmail]
        );
    }

    #[test]
    fn rejects_malformed_email() {
        for email in ["ada", "ada@example", "@example.com", "ada@.com", "ada@example.", "ada @example.com"] {
            let errors = info("Ada", "AE", email).validate().unwrap_err();
            assert_eq!(errors, [ContactError::InvalidEmail], "{email}");
        }
    }

    #[test]
    fn accepts_second_at_sign() {
        assert!(info("Ada", "AE", "@ada@example.com").validate().is_ok());
    }
}
