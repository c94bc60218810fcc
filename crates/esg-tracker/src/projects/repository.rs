use super::domain::{
    AssessmentRecord, Bookmark, BookmarkId, Project, ProjectFilter, ProjectId, ProjectPatch,
    UserId,
};

/// Storage abstraction for projects and their assessment history.
pub trait ProjectRepository: Send + Sync {
    fn insert(&self, project: Project) -> Result<Project, RepositoryError>;
    /// Applies the patch to the stored project in one step, leaving the
    /// assessment-derived fields as stored. `None` when the project is absent.
    fn update(
        &self,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> Result<Option<Project>, RepositoryError>;
    fn fetch(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError>;
    fn list(&self, filter: &ProjectFilter) -> Result<Vec<Project>, RepositoryError>;
    /// Removes the project together with its assessment records.
    fn delete(&self, id: ProjectId) -> Result<bool, RepositoryError>;
    /// Appends the record and copies its derived fields onto the stored project
    /// as one unit. The project keeps the fields of its newest record (highest
    /// id), whatever order concurrent writes land in. Fails with `NotFound`
    /// when the project is absent.
    fn store_assessment(&self, record: AssessmentRecord) -> Result<Project, RepositoryError>;
    fn latest_assessment(
        &self,
        project_id: ProjectId,
    ) -> Result<Option<AssessmentRecord>, RepositoryError>;
}

/// Storage abstraction for per-user gallery bookmarks.
pub trait BookmarkRepository: Send + Sync {
    fn insert(&self, bookmark: Bookmark) -> Result<Bookmark, RepositoryError>;
    fn for_user(&self, user_id: UserId) -> Result<Vec<Bookmark>, RepositoryError>;
    fn exists(&self, user_id: UserId, project_id: ProjectId) -> Result<bool, RepositoryError>;
    fn delete(&self, id: BookmarkId) -> Result<bool, RepositoryError>;
    /// Drops every bookmark pointing at the project; returns how many went.
    fn delete_for_project(&self, project_id: ProjectId) -> Result<usize, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
