//! Project catalogue: projects, their graded assessments, gallery bookmarks, and
//! the HTTP routes over them. Storage sits behind repository traits so the
//! service can run against any backend.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AssessmentId, AssessmentRecord, Bookmark, BookmarkId, NewBookmark, NewProject, Project,
    ProjectFilter, ProjectId, ProjectPatch, UserId,
};
pub use repository::{BookmarkRepository, ProjectRepository, RepositoryError};
pub use router::project_router;
pub use service::{ProjectService, ProjectServiceError};
