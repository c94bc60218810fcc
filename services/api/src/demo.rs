use crate::infra::{InMemoryBookmarkRepository, InMemoryProjectRepository};
use clap::Args;
use esg_tracker::error::AppError;
use esg_tracker::gradesheet::{GradeSheetImportError, GradeSheetImporter};
use esg_tracker::projects::{
    BookmarkRepository, NewProject, Project, ProjectFilter, ProjectRepository, ProjectService,
    ProjectServiceError,
};
use esg_tracker::scoring::{
    Aggregator, Assessment, CategoryGrades, CategoryId, Grade, Pillar, RiskLevel, ScoringError,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Two-column CSV (category,grade) with one row per ESG category
    #[arg(long)]
    pub(crate) grades: PathBuf,
    /// Print the assessment as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Only list sample projects in this country
    #[arg(long)]
    pub(crate) country: Option<String>,
    /// Only list sample projects at this risk level (Low, Moderate, High, Very High)
    #[arg(long, value_parser = parse_risk_level)]
    pub(crate) risk_level: Option<RiskLevel>,
    /// Pillar to generate insights for on the first listed project
    #[arg(long, value_parser = parse_pillar, default_value = "social")]
    pub(crate) pillar: Pillar,
}

fn parse_risk_level(raw: &str) -> Result<RiskLevel, String> {
    raw.parse()
}

fn parse_pillar(raw: &str) -> Result<Pillar, String> {
    serde_json::from_value(json!(raw.trim().to_ascii_lowercase()))
        .map_err(|_| format!("unknown pillar '{raw}': expected environmental, social or governance"))
}

/// Sample catalogue entry with one grade per pillar; every category in a
/// pillar receives that pillar's grade.
struct SampleProject {
    name: &'static str,
    description: &'static str,
    country: &'static str,
    region: &'static str,
    category: &'static str,
    size: &'static str,
    funding: &'static str,
    contact: &'static str,
    grades: [Grade; 3],
}

impl SampleProject {
    fn draft(&self) -> NewProject {
        NewProject {
            name: self.name.to_string(),
            description: self.description.to_string(),
            country: self.country.to_string(),
            region: Some(self.region.to_string()),
            category: self.category.to_string(),
            size: self.size.to_string(),
            funding: Some(self.funding.to_string()),
            details: None,
            image_url: None,
            contact_info: Some(self.contact.to_string()),
        }
    }

    fn category_grades(&self) -> CategoryGrades {
        let [environmental, social, governance] = self.grades;
        CategoryId::ordered()
            .into_iter()
            .map(|id| {
                let grade = match id.pillar() {
                    Pillar::Environmental => environmental,
                    Pillar::Social => social,
                    Pillar::Governance => governance,
                };
                (id, grade)
            })
            .collect()
    }
}

const SAMPLE_PROJECTS: [SampleProject; 6] = [
    SampleProject {
        name: "Grootvlei Solar Power Project",
        description: "A 75MW solar PV installation providing clean energy to over 45,000 households in Western Cape.",
        country: "South Africa",
        region: "Western Cape",
        category: "Renewable Energy",
        size: "Large ($10M - $50M)",
        funding: "$18.5M",
        contact: "contact@grootvleiproject.co.za",
        grades: [Grade::A, Grade::B, Grade::A],
    },
    SampleProject {
        name: "Lake Turkana Wind Power",
        description: "Kenya's largest wind farm with 365 turbines generating 310MW of low-cost renewable energy.",
        country: "Kenya",
        region: "Lake Turkana",
        category: "Renewable Energy",
        size: "Extra Large (> $50M)",
        funding: "$78M",
        contact: "info@ltwp.co.ke",
        grades: [Grade::A, Grade::C, Grade::B],
    },
    SampleProject {
        name: "Ghana Forest Restoration Initiative",
        description: "Reforestation of 10,000 hectares of degraded forest land in Western Ghana using native species.",
        country: "Ghana",
        region: "Western Region",
        category: "Conservation",
        size: "Medium ($1M - $10M)",
        funding: "$5.2M",
        contact: "ghanaforests@environment.gov.gh",
        grades: [Grade::A, Grade::B, Grade::C],
    },
    SampleProject {
        name: "Namibia Water Harvesting Project",
        description: "Innovative water collection and conservation systems across 18 rural communities in central Namibia.",
        country: "Namibia",
        region: "Central Regions",
        category: "Water Management",
        size: "Medium ($1M - $10M)",
        funding: "$3.7M",
        contact: "water@namibia-environment.org",
        grades: [Grade::C, Grade::D, Grade::D],
    },
    SampleProject {
        name: "Kenya Climate-Smart Agriculture",
        description: "Teaching 6,500 smallholder farmers climate-resilient agricultural practices across 4 counties.",
        country: "Kenya",
        region: "Multiple Counties",
        category: "Sustainable Agriculture",
        size: "Medium ($1M - $10M)",
        funding: "$2.8M",
        contact: "smartagri@kenya.org",
        grades: [Grade::A, Grade::A, Grade::B],
    },
    SampleProject {
        name: "Lagos Community Biogas Initiative",
        description: "Converting organic waste into clean cooking gas for 12 communities in Lagos State's urban areas.",
        country: "Nigeria",
        region: "Lagos State",
        category: "Renewable Energy",
        size: "Small (< $1M)",
        funding: "$1.2M",
        contact: "biogas@lagosenergy.org",
        grades: [Grade::B, Grade::C, Grade::C],
    },
];

/// Catalogues the sample projects and records an assessment for each, so the
/// gallery starts with scored entries.
pub(crate) fn seed_catalogue<R, B>(
    service: &ProjectService<R, B>,
) -> Result<Vec<Project>, ProjectServiceError>
where
    R: ProjectRepository + 'static,
    B: BookmarkRepository + 'static,
{
    let mut seeded = Vec::with_capacity(SAMPLE_PROJECTS.len());
    for sample in &SAMPLE_PROJECTS {
        let project = service.create_project(sample.draft())?;
        service.submit_assessment(project.id, sample.category_grades())?;
        seeded.push(service.get_project(project.id)?);
    }
    info!(count = seeded.len(), "sample catalogue seeded");
    Ok(seeded)
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs { grades, json } = args;

    let grades = GradeSheetImporter::from_path(&grades)?;
    let assessment = Aggregator::assess(grades)
        .map_err(|err| GradeSheetImportError::from(ScoringError::from(err)))?;

    if json {
        let rendered = serde_json::to_string_pretty(&assessment).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        render_assessment(&assessment);
    }
    Ok(())
}

fn render_assessment(assessment: &Assessment) {
    println!("ESG risk assessment");
    println!(
        "Overall: {}% (grade {}, {} risk)",
        assessment.overall_score(),
        assessment.overall_grade(),
        assessment.risk_level()
    );

    for pillar in Pillar::ordered() {
        println!("\n{} - grade {}", pillar.label(), assessment.pillar_grade(pillar));
        for category in pillar.categories() {
            println!(
                "  {:<24} {}",
                category.title,
                assessment.grades().get(category.id)
            );
        }
    }

    println!("\nRecommendations");
    for line in assessment.overall_notes().lines() {
        println!("- {}", line);
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        country,
        risk_level,
        pillar,
    } = args;

    let service = ProjectService::new(
        Arc::new(InMemoryProjectRepository::default()),
        Arc::new(InMemoryBookmarkRepository::default()),
    );

    println!("ESG project gallery demo");
    if let Err(err) = seed_catalogue(&service) {
        println!("  Sample catalogue unavailable: {}", err);
        return Ok(());
    }

    let filter = ProjectFilter {
        country,
        category: None,
        risk_level,
    };
    let projects = match service.list_projects(&filter) {
        Ok(projects) => projects,
        Err(err) => {
            println!("  Gallery unavailable: {}", err);
            return Ok(());
        }
    };

    if projects.is_empty() {
        println!("\nNo sample projects match the filter");
        return Ok(());
    }

    println!("\nProjects");
    for project in &projects {
        render_project_card(project);
    }

    let featured = &projects[0];
    println!("\nRecommendations for {}", featured.name);
    match service.assessment_for(featured.id) {
        Ok(record) => {
            for line in record.assessment.overall_notes().lines() {
                println!("- {}", line);
            }
        }
        Err(err) => println!("  Assessment unavailable: {}", err),
    }

    println!("\n{} insights for {}", pillar.label(), featured.name);
    match service.insights(featured.id, pillar) {
        Ok(response) => {
            for line in response.insights.lines() {
                println!("  {}", line);
            }
        }
        Err(err) => println!("  Insights unavailable: {}", err),
    }

    Ok(())
}

fn render_project_card(project: &Project) {
    let grade = |grade: Option<Grade>| grade.map_or_else(|| "-".to_string(), |g| g.to_string());
    println!(
        "- #{} {} ({}, {}) E:{} S:{} G:{} score {} {}",
        project.id,
        project.name,
        project.country,
        project.category,
        grade(project.environment_grade),
        grade(project.social_grade),
        grade(project.governance_grade),
        project
            .risk_score
            .map_or_else(|| "-".to_string(), |score| format!("{score}%")),
        project
            .risk_level
            .map_or_else(|| "unassessed".to_string(), |level| format!("({level} risk)")),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use esg_tracker::scoring::GradeScale;

    fn seeded_service() -> ProjectService<InMemoryProjectRepository, InMemoryBookmarkRepository> {
        let service = ProjectService::new(
            Arc::new(InMemoryProjectRepository::default()),
            Arc::new(InMemoryBookmarkRepository::default()),
        );
        seed_catalogue(&service).expect("sample catalogue seeds");
        service
    }

    #[test]
    fn seeded_projects_carry_their_assessment() {
        let service = seeded_service();
        let projects = service
            .list_projects(&ProjectFilter::default())
            .expect("list");
        assert_eq!(projects.len(), SAMPLE_PROJECTS.len());

        for project in &projects {
            let record = service.assessment_for(project.id).expect("assessed");
            assert_eq!(project.risk_score, Some(record.assessment.overall_score()));
            assert_eq!(project.risk_level, Some(record.assessment.risk_level()));
        }
    }

    #[test]
    fn sample_risk_levels_follow_the_grades() {
        let service = seeded_service();
        let namibia = service
            .list_projects(&ProjectFilter {
                country: Some("Namibia".to_string()),
                ..ProjectFilter::default()
            })
            .expect("list");
        assert_eq!(namibia.len(), 1);
        // Six C and five D grades average to 1.545, which rounds to 39%.
        assert_eq!(namibia[0].risk_score, Some(39));
        assert_eq!(namibia[0].risk_level, Some(RiskLevel::High));

        let grootvlei = &service.list_projects(&ProjectFilter::default()).expect("list")[0];
        let expected = GradeScale::grade_of(f64::from(grootvlei.risk_score.unwrap_or(0)), true);
        assert_eq!(RiskLevel::for_grade(expected), grootvlei.risk_level);
    }

    #[test]
    fn pillar_argument_accepts_known_names() {
        assert_eq!(parse_pillar("Governance"), Ok(Pillar::Governance));
        assert_eq!(parse_pillar("environment"), Ok(Pillar::Environmental));
        assert!(parse_pillar("economic").is_err());
    }

    #[test]
    fn risk_level_argument_accepts_labels() {
        assert_eq!(parse_risk_level("Very High"), Ok(RiskLevel::VeryHigh));
        assert!(parse_risk_level("Severe").is_err());
    }
}
