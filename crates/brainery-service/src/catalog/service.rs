//! Catalog browsing and seeding.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use brainery_core::error::AppError;
use brainery_core::types::SubjectId;
use brainery_database::CatalogStore;
use brainery_entity::catalog::{CatalogTopic, NewCatalogTopic, NewSubject, Subject};

/// One subject in a seed file, with its topics.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedSubject {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub topics: Vec<SeedTopic>,
}

/// One topic in a seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedTopic {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// What a seeding run touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Subjects inserted or updated.
    pub subjects: usize,
    /// Topics inserted or updated.
    pub topics: usize,
}

/// Read access to the catalog for dashboards, plus idempotent seeding.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogStore>,
}

impl CatalogService {
    /// Creates a new catalog service.
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    /// All subjects, by name.
    pub async fn list_subjects(&self) -> Result<Vec<Subject>, AppError> {
        self.catalog.list_subjects().await
    }

    /// Topics of one subject, by title. An unknown subject is `NotFound`.
    pub async fn list_topics(&self, subject: &SubjectId) -> Result<Vec<CatalogTopic>, AppError> {
        if self.catalog.find_subject(subject).await?.is_none() {
            return Err(AppError::not_found("Subject not found"));
        }
        self.catalog.list_topics(subject).await
    }

    /// Upserts every subject and topic. Running the same seed twice leaves
    /// the catalog unchanged.
    pub async fn seed(&self, subjects: &[SeedSubject]) -> Result<SeedReport, AppError> {
        let mut report = SeedReport::default();
        for entry in subjects {
            let subject = self
                .catalog
                .upsert_subject(&NewSubject {
                    name: entry.name.clone(),
                    icon: entry.icon.clone(),
                })
                .await?;
            report.subjects += 1;

            for topic in &entry.topics {
                self.catalog
                    .upsert_topic(
                        &subject.id,
                        &NewCatalogTopic {
                            title: topic.title.clone(),
                            description: topic.description.clone(),
                        },
                    )
                    .await?;
                report.topics += 1;
            }
        }

        info!(
            subjects = report.subjects,
            topics = report.topics,
            "Catalog seeded"
        );
        Ok(report)
    }
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainery_core::config::StoreBackend;
    use brainery_core::error::ErrorKind;
    use brainery_database::StoreSet;
    use rstest::rstest;

    const SEED: &str = r#"[
        {"name": "Science", "icon": "flask", "topics": [
            {"title": "Photosynthesis", "description": "Light into sugar"},
            {"title": "Atoms"}
        ]},
        {"name": "Mathematics", "topics": [{"title": "Calculus"}]}
    ]"#;

    #[rstest]
    #[case::relational(StoreBackend::Relational)]
    #[case::document(StoreBackend::Document)]
    #[tokio::test]
    async fn test_seed_is_idempotent_and_ordered(#[case] backend: StoreBackend) {
        let stores = StoreSet::in_memory(backend).await.unwrap();
        let service = CatalogService::new(Arc::clone(&stores.catalog));
        let seed: Vec<SeedSubject> = serde_json::from_str(SEED).unwrap();

        let first = service.seed(&seed).await.unwrap();
        assert_eq!(first, SeedReport { subjects: 2, topics: 3 });
        service.seed(&seed).await.unwrap();

        let subjects = service.list_subjects().await.unwrap();
        let names: Vec<_> = subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Mathematics", "Science"]);

        let topics = service.list_topics(&subjects[1].id).await.unwrap();
        let titles: Vec<_> = topics.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Atoms", "Photosynthesis"]);
    }

    #[tokio::test]
    async fn test_unknown_subject() {
        let stores = StoreSet::in_memory(StoreBackend::Document).await.unwrap();
        let service = CatalogService::new(Arc::clone(&stores.catalog));
        let err = service
            .list_topics(&SubjectId::new("999"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
