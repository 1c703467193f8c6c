//! Job and project postings: listing, search, creation and applying.

use reqwest::Method;
use tracing::info;

use super::client::ApiClient;
use super::models::{
    Job, JobApplication, JobApplicationRequest, NewJob, NewProject, Project,
    ProjectApplication, ProjectApplicationRequest,
};
use crate::error::{ApiError, Error};
use crate::validation;

impl ApiClient {
    // ── Jobs ────────────────────────────────────────────────────────

    pub async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        self.get_list(&["jobs"], &[]).await
    }

    /// Full-text search. A blank query lists everything.
    pub async fn search_jobs(&self, query: &str) -> Result<Vec<Job>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return self.list_jobs().await;
        }
        self.get_list(&["jobs", "search"], &[("q", query)]).await
    }

    /// Jobs posted by the logged-in company.
    pub async fn my_jobs(&self) -> Result<Vec<Job>, ApiError> {
        self.get_list(&["jobs", "mine"], &[]).await
    }

    pub async fn get_job(&self, id: &str) -> Result<Job, ApiError> {
        self.get(&["jobs", id]).await
    }

    pub async fn create_job(&self, job: &NewJob) -> Result<Job, Error> {
        validation::validate_new_job(job)?;
        let created: Job = self.send_json(Method::POST, &["jobs"], job).await?;
        info!(job_id = %created.id, title = %created.title, "Job posted");
        Ok(created)
    }

    pub async fn apply_to_job(
        &self,
        job_id: &str,
        request: &JobApplicationRequest,
    ) -> Result<JobApplication, Error> {
        validation::validate_job_application(request)?;
        let application: JobApplication = self
            .send_json(Method::POST, &["jobs", job_id, "apply"], request)
            .await?;
        info!(job_id, application_id = %application.id, "Applied to job");
        Ok(application)
    }

    // ── Projects ────────────────────────────────────────────────────

    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get_list(&["projects"], &[]).await
    }

    /// Full-text search. A blank query lists everything.
    pub async fn search_projects(&self, query: &str) -> Result<Vec<Project>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return self.list_projects().await;
        }
        self.get_list(&["projects", "search"], &[("q", query)]).await
    }

    /// Projects posted by the logged-in company.
    pub async fn my_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get_list(&["projects", "mine"], &[]).await
    }

    pub async fn get_project(&self, id: &str) -> Result<Project, ApiError> {
        self.get(&["projects", id]).await
    }

    pub async fn create_project(&self, project: &NewProject) -> Result<Project, Error> {
        validation::validate_new_project(project)?;
        let created: Project = self.send_json(Method::POST, &["projects"], project).await?;
        info!(project_id = %created.id, title = %created.title, "Project posted");
        Ok(created)
    }

    pub async fn apply_to_project(
        &self,
        project_id: &str,
        request: &ProjectApplicationRequest,
    ) -> Result<ProjectApplication, Error> {
        validation::validate_project_application(request)?;
        let application: ProjectApplication = self
            .send_json(
                Method::POST,
                &["projects", project_id, "apply"],
                request,
            )
            .await?;
        info!(project_id, application_id = %application.id, "Applied to project");
        Ok(application)
    }
}
