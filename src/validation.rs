//! Client-side form checks, run before anything is submitted.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::api::models::{
    JobApplicationRequest, NewJob, NewProject, Profile, ProjectApplicationRequest,
};
use crate::error::ValidationError;

/// Digits a phone number must have.
pub const PHONE_DIGITS: usize = 10;

/// Longest accepted posting title.
pub const MAX_TITLE_LEN: usize = 120;

/// Profile fields checked as phone numbers when present.
const PHONE_FIELDS: &[&str] = &["phone", "phoneNumber"];

/// Profile fields checked as emails when present.
const EMAIL_FIELDS: &[&str] = &["email", "contactEmail"];

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Reject blank values.
pub fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required {
            field: field.to_string(),
        })
    } else {
        Ok(())
    }
}

/// A phone number is exactly [`PHONE_DIGITS`] digits, optionally broken up by
/// spaces, dots, dashes or parentheses.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let mut digits = 0;
    for c in phone.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return Err(ValidationError::PhoneFormat(phone.to_string())),
        }
    }
    if digits != PHONE_DIGITS {
        return Err(ValidationError::PhoneDigits {
            expected: PHONE_DIGITS,
            actual: digits,
        });
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email.trim()) {
        Ok(())
    } else {
        Err(ValidationError::Email(email.to_string()))
    }
}

fn validate_amount(field: &str, amount: Option<Decimal>) -> Result<(), ValidationError> {
    match amount {
        Some(a) if a <= Decimal::ZERO => Err(ValidationError::Amount {
            field: field.to_string(),
        }),
        _ => Ok(()),
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    require("title", title)?;
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: MAX_TITLE_LEN,
        });
    }
    Ok(())
}

/// Checks applied to a profile working copy before it is saved. Only
/// non-empty phone and email fields are checked.
pub fn validate_profile(profile: &Profile) -> Result<(), ValidationError> {
    for field in PHONE_FIELDS {
        if let Some(phone) = profile.get(field).filter(|v| !v.trim().is_empty()) {
            validate_phone(phone)?;
        }
    }
    for field in EMAIL_FIELDS {
        if let Some(email) = profile.get(field).filter(|v| !v.trim().is_empty()) {
            validate_email(email)?;
        }
    }
    Ok(())
}

pub fn validate_new_job(job: &NewJob) -> Result<(), ValidationError> {
    validate_title(&job.title)?;
    require("description", &job.description)?;
    require("location", &job.location)?;
    validate_amount("salary", job.salary)
}

pub fn validate_new_project(project: &NewProject) -> Result<(), ValidationError> {
    validate_title(&project.title)?;
    require("description", &project.description)?;
    validate_amount("budget", project.budget)
}

pub fn validate_job_application(req: &JobApplicationRequest) -> Result<(), ValidationError> {
    require("coverLetter", &req.cover_letter)?;
    if let Some(phone) = &req.phone {
        validate_phone(phone)?;
    }
    Ok(())
}

pub fn validate_project_application(
    req: &ProjectApplicationRequest,
) -> Result<(), ValidationError> {
    require("proposal", &req.proposal)?;
    validate_amount("bid", req.bid)
}
