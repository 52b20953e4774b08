use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    error::ErrorMessage,
    models::waitlistmodel::{LeaderboardRow, ReferralStats, WaitlistRole, NIGERIAN_STATES},
};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinWaitlistDto {
    #[validate(length(min = 1, message = "Please fill in all required fields"))]
    #[serde(alias = "fullName")]
    pub full_name: String,

    #[validate(
        length(min = 1, message = "Please fill in all required fields"),
        email(message = "Please enter a valid email address"),
        custom = "validate_email_domain"
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Please fill in all required fields"))]
    pub phone: String,

    #[validate(
        length(min = 1, message = "Please fill in all required fields"),
        custom = "validate_state"
    )]
    pub state: String,

    #[validate(
        length(min = 1, message = "Please fill in all required fields"),
        custom = "validate_role"
    )]
    pub role: String,

    #[serde(alias = "referralCode")]
    pub referral_code: Option<String>,
}

impl JoinWaitlistDto {
    /// Trims every field and collapses a blank referral code to `None`.
    pub fn normalized(self) -> Self {
        JoinWaitlistDto {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            state: self.state.trim().to_string(),
            role: self.role.trim().to_string(),
            referral_code: self
                .referral_code
                .map(|code| code.trim().to_string())
                .filter(|code| !code.is_empty()),
        }
    }

    pub fn waitlist_role(&self) -> Option<WaitlistRole> {
        WaitlistRole::parse(&self.role.to_lowercase())
    }

    pub fn canonical_state(&self) -> Option<&'static str> {
        canonical_state(&self.state)
    }
}

pub fn canonical_state(value: &str) -> Option<&'static str> {
    NIGERIAN_STATES
        .iter()
        .copied()
        .find(|state| state.eq_ignore_ascii_case(value.trim()))
}

/// Requires a dot inside the domain part, so `ada@localhost` is rejected.
fn validate_email_domain(email: &str) -> Result<(), ValidationError> {
    let dotted = email
        .rsplit_once('@')
        .map(|(_, domain)| {
            domain
                .char_indices()
                .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
        })
        .unwrap_or(false);

    if email.is_empty() || dotted {
        return Ok(());
    }

    let mut error = ValidationError::new("email_domain");
    error.message = Some(Cow::from(ErrorMessage::InvalidEmail.to_str()));
    Err(error)
}

fn validate_role(role: &str) -> Result<(), ValidationError> {
    if role.is_empty() || WaitlistRole::parse(&role.to_lowercase()).is_some() {
        return Ok(());
    }

    let mut error = ValidationError::new("invalid_role");
    error.message = Some(Cow::from(ErrorMessage::InvalidRole.to_str()));
    Err(error)
}

fn validate_state(state: &str) -> Result<(), ValidationError> {
    if state.is_empty() || canonical_state(state).is_some() {
        return Ok(());
    }

    let mut error = ValidationError::new("invalid_state");
    error.message = Some(Cow::from(ErrorMessage::InvalidState.to_str()));
    Err(error)
}

/// Reduces a set of field errors to the single message shown on the form.
/// Missing fields win over format problems; among format problems the email
/// is reported first.
pub fn signup_error_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();

    let missing = field_errors
        .values()
        .any(|errs| errs.iter().any(|e| e.code == "length"));
    if missing {
        return ErrorMessage::MissingFields.to_string();
    }

    let format_errors = [
        ("email", ErrorMessage::InvalidEmail),
        ("role", ErrorMessage::InvalidRole),
        ("state", ErrorMessage::InvalidState),
    ];
    for (field, message) in format_errors {
        if field_errors.contains_key(field) {
            return message.to_string();
        }
    }

    errors.to_string()
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct JoinWaitlistQueryDto {
    #[serde(rename = "ref")]
    pub referral_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignupResponseDto {
    pub status: String,
    pub success: bool,
    pub user_id: String,
    pub referral_code: String,
    pub referral_link: String,
    pub referred: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardResponseDto {
    pub status: String,
    pub results: usize,
    pub leaderboard: Vec<LeaderboardRow>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReferralStatsResponseDto {
    pub status: String,
    pub data: ReferralStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReferralCodeValidityDto {
    pub status: String,
    pub referral_code: String,
    pub valid: bool,
}
