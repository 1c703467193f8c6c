//! The two parallel application namespaces and their merged view.

use reqwest::Method;
use tracing::{debug, info};

use super::client::ApiClient;
use super::models::{
    ApplicationEntry, ApplicationStatus, JobApplication, ProjectApplication, StatusUpdate,
    merge_applications,
};
use crate::error::ApiError;

impl ApiClient {
    /// Job applications visible to the caller: received ones for a company,
    /// the caller's own for an individual.
    pub async fn job_applications(&self) -> Result<Vec<JobApplication>, ApiError> {
        self.get_list(&["job-applications"], &[]).await
    }

    /// Project applications visible to the caller.
    pub async fn project_applications(&self) -> Result<Vec<ProjectApplication>, ApiError> {
        self.get_list(&["project-applications"], &[]).await
    }

    pub async fn update_job_application_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<JobApplication, ApiError> {
        let updated: JobApplication = self
            .send_json(
                Method::PATCH,
                &["job-applications", id, "status"],
                &StatusUpdate { status },
            )
            .await?;
        info!(application_id = id, %status, "Job application status updated");
        Ok(updated)
    }

    pub async fn update_project_application_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<ProjectApplication, ApiError> {
        let updated: ProjectApplication = self
            .send_json(
                Method::PATCH,
                &["project-applications", id, "status"],
                &StatusUpdate { status },
            )
            .await?;
        info!(application_id = id, %status, "Project application status updated");
        Ok(updated)
    }

    /// Fetch both lists concurrently and merge them: project applications
    /// first, then job applications, each in server order. Fails as a whole
    /// if either request fails.
    pub async fn all_applications(&self) -> Result<Vec<ApplicationEntry>, ApiError> {
        let (projects, jobs) =
            tokio::try_join!(self.project_applications(), self.job_applications())?;
        debug!(
            projects = projects.len(),
            jobs = jobs.len(),
            "Merged application lists"
        );
        Ok(merge_applications(projects, jobs))
    }
}
