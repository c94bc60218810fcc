use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::projects::domain::{
    AssessmentRecord, Bookmark, BookmarkId, NewProject, Project, ProjectFilter, ProjectId,
    ProjectPatch, UserId,
};
use crate::projects::repository::{BookmarkRepository, ProjectRepository, RepositoryError};
use crate::projects::{project_router, ProjectService};
use crate::scoring::{CategoryGrades, CategoryId, Grade, Pillar};

pub(super) fn new_project() -> NewProject {
    NewProject {
        name: "Lake Turkana Wind Power".to_string(),
        description: "365 turbines generating 310MW of renewable energy.".to_string(),
        country: "Kenya".to_string(),
        region: Some("Lake Turkana".to_string()),
        category: "Renewable Energy".to_string(),
        size: "Extra Large (> $50M)".to_string(),
        funding: Some("$78M".to_string()),
        details: None,
        image_url: None,
        contact_info: Some("info@ltwp.co.ke".to_string()),
    }
}

pub(super) fn other_project() -> NewProject {
    NewProject {
        name: "Namibia Water Harvesting Project".to_string(),
        description: "Water collection across 18 rural communities.".to_string(),
        country: "Namibia".to_string(),
        region: Some("Central Regions".to_string()),
        category: "Water Management".to_string(),
        size: "Medium ($1M - $10M)".to_string(),
        funding: Some("$3.7M".to_string()),
        details: None,
        image_url: None,
        contact_info: None,
    }
}

/// Environmental A, social D, governance B.
pub(super) fn split_grades() -> CategoryGrades {
    CategoryId::ordered()
        .into_iter()
        .map(|id| {
            let grade = match id.pillar() {
                Pillar::Environmental => Grade::A,
                Pillar::Social => Grade::D,
                Pillar::Governance => Grade::B,
            };
            (id, grade)
        })
        .collect()
}

pub(super) fn raw_grades(grade: &str) -> serde_json::Map<String, Value> {
    CategoryId::ordered()
        .into_iter()
        .map(|id| (id.as_str().to_string(), Value::String(grade.to_string())))
        .collect()
}

pub(super) fn build_service() -> (
    ProjectService<MemoryProjects, MemoryBookmarks>,
    Arc<MemoryProjects>,
    Arc<MemoryBookmarks>,
) {
    let projects = Arc::new(MemoryProjects::default());
    let bookmarks = Arc::new(MemoryBookmarks::default());
    let service = ProjectService::new(projects.clone(), bookmarks.clone());
    (service, projects, bookmarks)
}

#[derive(Default, Clone)]
pub(super) struct MemoryProjects {
    pub(super) projects: Arc<Mutex<HashMap<ProjectId, Project>>>,
    pub(super) assessments: Arc<Mutex<Vec<AssessmentRecord>>>,
    /// Held inside the project lock on every update, to widen write overlaps.
    pub(super) patch_delay: Duration,
}

impl ProjectRepository for MemoryProjects {
    fn insert(&self, project: Project) -> Result<Project, RepositoryError> {
        let mut guard = self.projects.lock().expect("repository mutex poisoned");
        if guard.contains_key(&project.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(project.id, project.clone());
        Ok(project)
    }

    fn update(
        &self,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> Result<Option<Project>, RepositoryError> {
        let mut guard = self.projects.lock().expect("repository mutex poisoned");
        if !self.patch_delay.is_zero() {
            thread::sleep(self.patch_delay);
        }
        Ok(guard.get_mut(&id).map(|project| {
            project.apply(patch);
            project.clone()
        }))
    }

    fn fetch(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        let guard = self.projects.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn list(&self, filter: &ProjectFilter) -> Result<Vec<Project>, RepositoryError> {
        let guard = self.projects.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|project| filter.matches(project))
            .cloned()
            .collect())
    }

    fn delete(&self, id: ProjectId) -> Result<bool, RepositoryError> {
        let removed = self
            .projects
            .lock()
            .expect("repository mutex poisoned")
            .remove(&id)
            .is_some();
        self.assessments
            .lock()
            .expect("repository mutex poisoned")
            .retain(|record| record.project_id != id);
        Ok(removed)
    }

    fn store_assessment(&self, record: AssessmentRecord) -> Result<Project, RepositoryError> {
        let mut projects = self.projects.lock().expect("repository mutex poisoned");
        let mut assessments = self.assessments.lock().expect("repository mutex poisoned");
        let project = projects
            .get_mut(&record.project_id)
            .ok_or(RepositoryError::NotFound)?;
        if assessments
            .iter()
            .filter(|existing| existing.project_id == record.project_id)
            .all(|existing| existing.id < record.id)
        {
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
        let guard = self.assessments.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.project_id == project_id)
            .max_by_key(|record| record.id)
            .cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryBookmarks {
    pub(super) bookmarks: Arc<Mutex<Vec<Bookmark>>>,
}

impl BookmarkRepository for MemoryBookmarks {
    fn insert(&self, bookmark: Bookmark) -> Result<Bookmark, RepositoryError> {
        self.bookmarks
            .lock()
            .expect("bookmark mutex poisoned")
            .push(bookmark.clone());
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

/// Repository that refuses every call, for exercising 5xx mapping.
pub(super) struct OfflineProjects;

impl ProjectRepository for OfflineProjects {
    fn insert(&self, _project: Project) -> Result<Project, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(
        &self,
        _id: ProjectId,
        _patch: ProjectPatch,
    ) -> Result<Option<Project>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _filter: &ProjectFilter) -> Result<Vec<Project>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: ProjectId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn store_assessment(&self, _record: AssessmentRecord) -> Result<Project, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn latest_assessment(
        &self,
        _project_id: ProjectId,
    ) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(
    service: ProjectService<MemoryProjects, MemoryBookmarks>,
) -> axum::Router {
    project_router(Arc::new(service))
}
