use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::domain::{
    AssessmentId, AssessmentRecord, Bookmark, BookmarkId, NewBookmark, NewProject, Project,
    ProjectFilter, ProjectId, ProjectPatch, UserId,
};
use super::repository::{BookmarkRepository, ProjectRepository, RepositoryError};
use crate::insights::{
    InsightsError, InsightsProvider, InsightsRequest, InsightsResponse, OfflineInsights,
};
use crate::scoring::{Aggregator, Assessment, CategoryGrades, Pillar, ScoringError};

/// Service composing the scoring core with project, assessment, and bookmark storage.
pub struct ProjectService<R, B> {
    projects: Arc<R>,
    bookmarks: Arc<B>,
    insights: Arc<dyn InsightsProvider>,
    project_sequence: AtomicU64,
    assessment_sequence: AtomicU64,
    bookmark_sequence: AtomicU64,
}

impl<R, B> ProjectService<R, B>
where
    R: ProjectRepository + 'static,
    B: BookmarkRepository + 'static,
{
    pub fn new(projects: Arc<R>, bookmarks: Arc<B>) -> Self {
        Self::with_insights(projects, bookmarks, Arc::new(OfflineInsights))
    }

    pub fn with_insights(
        projects: Arc<R>,
        bookmarks: Arc<B>,
        insights: Arc<dyn InsightsProvider>,
    ) -> Self {
        Self {
            projects,
            bookmarks,
            insights,
            project_sequence: AtomicU64::new(1),
            assessment_sequence: AtomicU64::new(1),
            bookmark_sequence: AtomicU64::new(1),
        }
    }

    pub fn create_project(&self, draft: NewProject) -> Result<Project, ProjectServiceError> {
        let blank = draft.blank_fields();
        if !blank.is_empty() {
            return Err(ProjectServiceError::InvalidProject(blank));
        }

        let id = ProjectId(self.project_sequence.fetch_add(1, Ordering::Relaxed));
        let project = Project::from_draft(id, draft, Utc::now());
        let stored = self.projects.insert(project)?;

        info!(project_id = %stored.id, name = %stored.name, "project catalogued");
        Ok(stored)
    }

    pub fn get_project(&self, id: ProjectId) -> Result<Project, ProjectServiceError> {
        self.projects
            .fetch(id)?
            .ok_or(ProjectServiceError::ProjectNotFound(id))
    }

    /// Gallery listing, ordered by project id.
    pub fn list_projects(
        &self,
        filter: &ProjectFilter,
    ) -> Result<Vec<Project>, ProjectServiceError> {
        let mut projects = self.projects.list(filter)?;
        projects.sort_by_key(|project| project.id);
        Ok(projects)
    }

    pub fn update_project(
        &self,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> Result<Project, ProjectServiceError> {
        let blank = patch.blank_fields();
        if !blank.is_empty() {
            return Err(ProjectServiceError::InvalidProject(blank));
        }

        self.projects
            .update(id, patch)?
            .ok_or(ProjectServiceError::ProjectNotFound(id))
    }

    pub fn delete_project(&self, id: ProjectId) -> Result<(), ProjectServiceError> {
        if self.projects.delete(id)? {
            let bookmarks = self.bookmarks.delete_for_project(id)?;
            info!(project_id = %id, bookmarks, "project removed");
            Ok(())
        } else {
            Err(ProjectServiceError::ProjectNotFound(id))
        }
    }

    /// Scores without persisting; used for live form previews.
    pub fn preview(&self, grades: CategoryGrades) -> Result<Assessment, ProjectServiceError> {
        Aggregator::assess(grades)
            .map_err(ScoringError::from)
            .map_err(ProjectServiceError::from)
    }

    /// Grades a project. Each call records a new assessment; the repository
    /// refreshes the project's denormalized ESG fields in the same write.
    pub fn submit_assessment(
        &self,
        project_id: ProjectId,
        grades: CategoryGrades,
    ) -> Result<AssessmentRecord, ProjectServiceError> {
        self.get_project(project_id)?;
        let assessment = self.preview(grades)?;

        let record = AssessmentRecord {
            id: AssessmentId(self.assessment_sequence.fetch_add(1, Ordering::Relaxed)),
            project_id,
            assessment,
            created_at: Utc::now(),
        };

        self.projects
            .store_assessment(record.clone())
            .map_err(|error| match error {
                RepositoryError::NotFound => ProjectServiceError::ProjectNotFound(project_id),
                other => other.into(),
            })?;

        info!(
            project_id = %project_id,
            score = record.assessment.overall_score(),
            grade = %record.assessment.overall_grade(),
            risk = %record.assessment.risk_level(),
            "assessment recorded"
        );
        Ok(record)
    }

    pub fn assessment_for(
        &self,
        project_id: ProjectId,
    ) -> Result<AssessmentRecord, ProjectServiceError> {
        self.projects
            .latest_assessment(project_id)?
            .ok_or(ProjectServiceError::AssessmentNotFound(project_id))
    }

    pub fn add_bookmark(&self, request: NewBookmark) -> Result<Bookmark, ProjectServiceError> {
        self.get_project(request.project_id)?;

        if self.bookmarks.exists(request.user_id, request.project_id)? {
            return Err(ProjectServiceError::AlreadyBookmarked);
        }

        let bookmark = Bookmark {
            id: BookmarkId(self.bookmark_sequence.fetch_add(1, Ordering::Relaxed)),
            user_id: request.user_id,
            project_id: request.project_id,
            created_at: Utc::now(),
        };
        let stored = self.bookmarks.insert(bookmark)?;
        debug!(bookmark_id = stored.id.0, user_id = stored.user_id.0, "bookmark added");
        Ok(stored)
    }

    pub fn bookmarks_for(&self, user_id: UserId) -> Result<Vec<Bookmark>, ProjectServiceError> {
        let mut bookmarks = self.bookmarks.for_user(user_id)?;
        bookmarks.sort_by_key(|bookmark| bookmark.id);
        Ok(bookmarks)
    }

    pub fn remove_bookmark(&self, id: BookmarkId) -> Result<(), ProjectServiceError> {
        if self.bookmarks.delete(id)? {
            Ok(())
        } else {
            Err(ProjectServiceError::BookmarkNotFound(id))
        }
    }

    /// Narrative insights for one pillar of the project's latest assessment.
    pub fn insights(
        &self,
        project_id: ProjectId,
        pillar: Pillar,
    ) -> Result<InsightsResponse, ProjectServiceError> {
        let project = self.get_project(project_id)?;
        let record = self.assessment_for(project_id)?;
        let request = InsightsRequest::new(
            pillar,
            record.assessment.grades(),
            project.name,
            project.country,
            project.category,
        );

        let insights = self.insights.insights(&request)?;
        Ok(InsightsResponse { pillar, insights })
    }
}

/// Error raised by the project service.
#[derive(Debug, thiserror::Error)]
pub enum ProjectServiceError {
    #[error("invalid project data: blank {}", .0.join(", "))]
    InvalidProject(Vec<&'static str>),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),
    #[error("project {0} has no recorded assessment")]
    AssessmentNotFound(ProjectId),
    #[error("bookmark {0} not found")]
    BookmarkNotFound(BookmarkId),
    #[error("project already bookmarked")]
    AlreadyBookmarked,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Insights(#[from] InsightsError),
}
