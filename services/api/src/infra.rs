use esg_tracker::projects::{
    AssessmentRecord, Bookmark, BookmarkId, BookmarkRepository, Project, ProjectFilter, ProjectId,
    ProjectPatch, ProjectRepository, RepositoryError, UserId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct ProjectTables {
    projects: HashMap<ProjectId, Project>,
    assessments: Vec<AssessmentRecord>,
}

/// Projects and assessments share one lock so an assessment and its
/// denormalized project fields land together.
#[derive(Default, Clone)]
pub(crate) struct InMemoryProjectRepository {
    tables: Arc<Mutex<ProjectTables>>,
}

impl ProjectRepository for InMemoryProjectRepository {
    fn insert(&self, project: Project) -> Result<Project, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        if guard.projects.contains_key(&project.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.projects.insert(project.id, project.clone());
        Ok(project)
    }

    fn update(
        &self,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> Result<Option<Project>, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.projects.get_mut(&id).map(|project| {
            project.apply(patch);
            project.clone()
        }))
    }

    fn fetch(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.projects.get(&id).cloned())
    }

    fn list(&self, filter: &ProjectFilter) -> Result<Vec<Project>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard
            .projects
            .values()
            .filter(|project| filter.matches(project))
            .cloned()
            .collect())
    }

    fn delete(&self, id: ProjectId) -> Result<bool, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        let removed = guard.projects.remove(&id).is_some();
        guard.assessments.retain(|record| record.project_id != id);
        Ok(removed)
    }

    fn store_assessment(&self, record: AssessmentRecord) -> Result<Project, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        let ProjectTables {
            projects,
            assessments,
        } = &mut *guard;
        let project = projects
            .get_mut(&record.project_id)
            .ok_or(RepositoryError::NotFound)?;
        // A record that lost the race to a newer one is kept but not shown.
        let newest = assessments
            .iter()
            .filter(|existing| existing.project_id == record.project_id)
            .all(|existing| existing.id < record.id);
        if newest {
            project.denormalize(&record.assessment);
        }
        let project = project.clone();
        assessments.push(record);
        Ok(project)
    }

    fn latest_assessment(
        &self,
        project_id: ProjectId,
    ) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard
            .assessments
            .iter()
            .filter(|record| record.project_id == project_id)
            .max_by_key(|record| record.id)
            .cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryBookmarkRepository {
    bookmarks: Arc<Mutex<Vec<Bookmark>>>,
}

impl BookmarkRepository for InMemoryBookmarkRepository {
    fn insert(&self, bookmark: Bookmark) -> Result<Bookmark, RepositoryError> {
        let mut guard = self.bookmarks.lock().expect("bookmark mutex poisoned");
        if guard.iter().any(|existing| {
            existing.user_id == bookmark.user_id && existing.project_id == bookmark.project_id
        }) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(bookmark.clone());
        Ok(bookmark)
    }

    fn for_user(&self, user_id: UserId) -> Result<Vec<Bookmark>, RepositoryError> {
        let guard = self.bookmarks.lock().expect("bookmark mutex poisoned");
        Ok(guard
            .iter()
            .filter(|bookmark| bookmark.user_id == user_id)
            .cloned()
            .collect())
    }

    fn exists(&self, user_id: UserId, project_id: ProjectId) -> Result<bool, RepositoryError> {
        let guard = self.bookmarks.lock().expect("bookmark mutex poisoned");
        Ok(guard
            .iter()
            .any(|bookmark| bookmark.user_id == user_id && bookmark.project_id == project_id))
    }

    fn delete(&self, id: BookmarkId) -> Result<bool, RepositoryError> {
        let mut guard = self.bookmarks.lock().expect("bookmark mutex poisoned");
        let before = guard.len();
        guard.retain(|bookmark| bookmark.id != id);
        Ok(guard.len() != before)
    }

    fn delete_for_project(&self, project_id: ProjectId) -> Result<usize, RepositoryError> {
        let mut guard = self.bookmarks.lock().expect("bookmark mutex poisoned");
        let before = guard.len();
        guard.retain(|bookmark| bookmark.project_id != project_id);
        Ok(before - guard.len())
    }
}
