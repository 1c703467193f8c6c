//! Wire model — users, profiles, jobs, projects and applications.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Which kind of account a user holds. Drives the home feed and which
/// profile endpoint applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// A hiring organisation: posts jobs and projects.
    Company,
    /// An individual: applies to jobs and projects.
    #[default]
    User,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Company => write!(f, "company"),
            Self::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "company" => Ok(Self::Company),
            "user" => Ok(Self::User),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// The logged-in identity, as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, alias = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: UserRole,
    /// Anything else the server attaches to the user object.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    pub fn new(email: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: String::new(),
            email: email.into(),
            name: String::new(),
            role,
            extra: serde_json::Map::new(),
        }
    }

    pub fn is_company(&self) -> bool {
        self.role == UserRole::Company
    }
}

/// Credentials for `POST /auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
}

/// Body of a successful login.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<SecretString>,
    pub user: User,
    #[serde(default)]
    pub message: Option<String>,
}

/// Sign-up payload for `POST /auth/register`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

fn serialize_secret<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use secrecy::ExposeSecret;
    serializer.serialize_str(secret.expose_secret())
}

/// A company or user profile: a flat field → value mapping.
///
/// View and working copies of a profile are the same type, so an edit is
/// just a second `Profile` that diverges field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(BTreeMap<String, String>);

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Profile {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Which profile page / endpoint is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Company,
    User,
}

impl ProfileKind {
    pub fn path(&self) -> [&'static str; 2] {
        match self {
            Self::Company => ["companies", "profile"],
            Self::User => ["users", "profile"],
        }
    }
}

impl From<UserRole> for ProfileKind {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Company => Self::Company,
            UserRole::User => Self::User,
        }
    }
}

/// Employment type of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
}

/// A job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub employment_type: EmploymentType,
    #[serde(default)]
    pub salary: Option<Decimal>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /jobs`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub location: String,
    pub employment_type: EmploymentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<Decimal>,
    pub skills: Vec<String>,
}

/// A freelance project posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub budget: Option<Decimal>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /projects`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    pub skills: Vec<String>,
}

/// Review status shared by job and project applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("Unknown application status: {}", s)),
        }
    }
}

/// An application to a job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    #[serde(alias = "_id")]
    pub id: String,
    pub job_id: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub applicant_name: String,
    #[serde(default)]
    pub applicant_email: String,
    #[serde(default)]
    pub cover_letter: String,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// An application (proposal) to a freelance project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectApplication {
    #[serde(alias = "_id")]
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub project_title: String,
    #[serde(default)]
    pub applicant_name: String,
    #[serde(default)]
    pub applicant_email: String,
    #[serde(default)]
    pub proposal: String,
    #[serde(default)]
    pub bid: Option<Decimal>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /jobs/{id}/apply`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationRequest {
    pub cover_letter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Payload for `POST /projects/{id}/apply`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectApplicationRequest {
    pub proposal: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid: Option<Decimal>,
}

/// Body for the two `.../{id}/status` endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}

/// Which endpoint family an application came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationSource {
    Project,
    Job,
}

/// One row of a merged application list.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplicationEntry {
    Project(ProjectApplication),
    Job(JobApplication),
}

impl ApplicationEntry {
    pub fn source(&self) -> ApplicationSource {
        match self {
            Self::Project(_) => ApplicationSource::Project,
            Self::Job(_) => ApplicationSource::Job,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Project(a) => &a.id,
            Self::Job(a) => &a.id,
        }
    }

    pub fn status(&self) -> ApplicationStatus {
        match self {
            Self::Project(a) => a.status,
            Self::Job(a) => a.status,
        }
    }

    /// Title of the job or project applied to.
    pub fn target_title(&self) -> &str {
        match self {
            Self::Project(a) => &a.project_title,
            Self::Job(a) => &a.job_title,
        }
    }

    pub fn applicant_name(&self) -> &str {
        match self {
            Self::Project(a) => &a.applicant_name,
            Self::Job(a) => &a.applicant_name,
        }
    }
}

/// Stable merge of the two application lists: every project application
/// (in server order) followed by every job application (in server order).
pub fn merge_applications(
    projects: Vec<ProjectApplication>,
    jobs: Vec<JobApplication>,
) -> Vec<ApplicationEntry> {
    let mut merged = Vec::with_capacity(projects.len() + jobs.len());
    merged.extend(projects.into_iter().map(ApplicationEntry::Project));
    merged.extend(jobs.into_iter().map(ApplicationEntry::Job));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn user_keeps_unknown_fields() {
        let user: User = serde_json::from_str(
            r#"{"_id":"u1","email":"a@b.com","name":"Ana","role":"company","industry":"IT"}"#,
        )
        .unwrap();
        assert_eq!(user.id, "u1");
        assert!(user.is_company());
        assert_eq!(user.extra.get("industry").and_then(|v| v.as_str()), Some("IT"));

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["industry"], "IT");
    }

    #[test]
    fn user_role_defaults_to_user() {
        let user: User = serde_json::from_str(r#"{"email":"x@y.z"}"#).unwrap();
        assert_eq!(user.role, UserRole::User);
    }

    #[test]
    fn profile_is_a_flat_object() {
        let profile: Profile =
            serde_json::from_str(r#"{"companyName":"Acme","phone":"0123456789"}"#).unwrap();
        assert_eq!(profile.get("companyName"), Some("Acme"));
        assert_eq!(profile.len(), 2);
        assert_eq!(
            serde_json::to_string(&profile).unwrap(),
            r#"{"companyName":"Acme","phone":"0123456789"}"#
        );
    }

    #[test]
    fn job_accepts_numeric_and_string_salary() {
        let a: Job = serde_json::from_str(r#"{"_id":"j1","title":"Dev","salary":1500.5}"#).unwrap();
        let b: Job = serde_json::from_str(r#"{"id":"j2","title":"Dev","salary":"1500.5"}"#).unwrap();
        assert_eq!(a.salary, Some(dec!(1500.5)));
        assert_eq!(a.salary, b.salary);
        assert_eq!(a.employment_type, EmploymentType::FullTime);
    }

    #[test]
    fn login_request_exposes_password_on_the_wire_only() {
        let req = LoginRequest {
            email: "a@b.com".into(),
            password: SecretString::from("hunter2"),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["password"], "hunter2");
        assert!(!format!("{req:?}").contains("hunter2"));
    }

    #[test]
    fn merge_keeps_source_order() {
        let project = |id: &str| ProjectApplication {
            id: id.into(),
            project_id: "p".into(),
            project_title: String::new(),
            applicant_name: String::new(),
            applicant_email: String::new(),
            proposal: String::new(),
            bid: None,
            status: ApplicationStatus::Pending,
            created_at: None,
        };
        let job = |id: &str| JobApplication {
            id: id.into(),
            job_id: "j".into(),
            job_title: String::new(),
            applicant_name: String::new(),
            applicant_email: String::new(),
            cover_letter: String::new(),
            status: ApplicationStatus::Accepted,
            created_at: None,
        };

        let merged = merge_applications(vec![project("p2"), project("p1")], vec![job("j1"), job("j0")]);
        let ids: Vec<&str> = merged.iter().map(ApplicationEntry::id).collect();
        assert_eq!(ids, vec!["p2", "p1", "j1", "j0"]);
        assert_eq!(merged[0].source(), ApplicationSource::Project);
        assert_eq!(merged[3].source(), ApplicationSource::Job);
        assert_eq!(merged[3].status(), ApplicationStatus::Accepted);
    }

    #[test]
    fn application_status_parse_and_display() {
        assert_eq!("accepted".parse::<ApplicationStatus>().unwrap(), ApplicationStatus::Accepted);
        assert!("maybe".parse::<ApplicationStatus>().is_err());
        assert_eq!(ApplicationStatus::Rejected.to_string(), "rejected");
    }
}
