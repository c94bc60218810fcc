//! ESG risk scoring for infrastructure projects: letter grades per category,
//! pillar and overall aggregation, remediation notes, and a project catalogue
//! that carries the latest assessment.

pub mod config;
pub mod error;
pub mod gradesheet;
pub mod insights;
pub mod projects;
pub mod scoring;
pub mod telemetry;
