//! Role-based home feed.

use tracing::info;

use crate::api::ApiClient;
use crate::api::models::{ApplicationEntry, ApplicationStatus, Job, Project, User, UserRole};
use crate::error::ApiError;

/// Everything the home page shows for one user.
#[derive(Debug, Clone)]
pub struct HomeFeed {
    pub user: User,
    /// Own postings for a company, open postings for an individual.
    pub jobs: Vec<Job>,
    pub projects: Vec<Project>,
    /// Received applications for a company, sent ones for an individual.
    pub applications: Vec<ApplicationEntry>,
}

impl HomeFeed {
    pub fn role(&self) -> UserRole {
        self.user.role
    }

    pub fn pending_applications(&self) -> usize {
        self.applications
            .iter()
            .filter(|a| a.status() == ApplicationStatus::Pending)
            .count()
    }
}

/// Load the home feed for the stored user. Requests run concurrently; any
/// failure fails the whole feed.
pub async fn load_home(client: &ApiClient) -> Result<HomeFeed, ApiError> {
    let user = client.require_user().await?;

    let (jobs, projects, applications) = match user.role {
        UserRole::Company => {
            tokio::try_join!(client.my_jobs(), client.my_projects(), client.all_applications())?
        }
        UserRole::User => tokio::try_join!(
            client.list_jobs(),
            client.list_projects(),
            client.all_applications()
        )?,
    };

    info!(
        role = %user.role,
        jobs = jobs.len(),
        projects = projects.len(),
        applications = applications.len(),
        "Home feed loaded"
    );

    Ok(HomeFeed {
        user,
        jobs,
        projects,
        applications,
    })
}
