//! Copying everything from one backend into another.
//!
//! Used to move a document snapshot into SQLite. Identities keep their
//! password hashes and roles; owned records are re-inserted under the new
//! identity ids. Creation timestamps are assigned by the target, so records
//! are inserted oldest first to keep the newest-first listing order.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};

use brainery_core::error::ErrorKind;
use brainery_core::result::AppResult;
use brainery_core::types::{IdentityId, PageRequest};
use brainery_entity::catalog::{NewCatalogTopic, NewSubject};
use brainery_entity::identity::{Identity, NewIdentity};
use brainery_entity::record::{NewResource, NewSavedTopic};

use crate::backend::StoreSet;

const BATCH: u64 = 200;

/// Counts of what a transfer copied or skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransferReport {
    pub identities: usize,
    /// Identities whose email already existed in the target.
    pub identities_skipped: usize,
    pub saved_topics: usize,
    /// Saved topics whose title the owner already had in the target.
    pub saved_topics_skipped: usize,
    pub resources: usize,
    pub subjects: usize,
    pub catalog_topics: usize,
}

/// Copy identities, their records, and the catalog from `source` to `target`.
///
/// Identities already present in the target (by normalized email) are left
/// untouched along with their records, so re-running a transfer is safe.
pub async fn transfer(source: &StoreSet, target: &StoreSet) -> AppResult<TransferReport> {
    let mut report = TransferReport::default();
    info!(from = %source.backend, to = %target.backend, "Starting store transfer");

    let identities = all_identities(source).await?;
    let mut id_map: HashMap<IdentityId, IdentityId> = HashMap::new();

    for identity in identities.iter().rev() {
        let draft = NewIdentity {
            username: identity.username.clone(),
            email: identity.email.clone(),
            password_hash: identity.password_hash.clone(),
            role: identity.role,
        };
        match target.identities.create(&draft).await {
            Ok(created) => {
                id_map.insert(identity.id.clone(), created.id);
                report.identities += 1;
            }
            Err(e) if e.kind == ErrorKind::DuplicateIdentity => {
                warn!(identity_id = %identity.id, "Identity already present in target, skipping");
                report.identities_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    for identity in &identities {
        let Some(new_owner) = id_map.get(&identity.id) else {
            continue;
        };

        for topic in source.saved_topics.list_for_owner(&identity.id).await?.iter().rev() {
            let draft = NewSavedTopic {
                title: topic.title.clone(),
                summary: topic.summary.clone(),
            };
            match target.saved_topics.create(new_owner, &draft).await {
                Ok(_) => report.saved_topics += 1,
                Err(e) if e.kind == ErrorKind::DuplicateTitle => report.saved_topics_skipped += 1,
                Err(e) => return Err(e),
            }
        }

        for resource in source.resources.list_for_owner(&identity.id).await?.iter().rev() {
            let draft = NewResource {
                title: resource.title.clone(),
                description: resource.description.clone(),
                link: resource.link.clone(),
                category: resource.category.clone(),
            };
            target.resources.create(new_owner, &draft).await?;
            report.resources += 1;
        }
    }

    for subject in source.catalog.list_subjects().await? {
        let copied = target
            .catalog
            .upsert_subject(&NewSubject {
                name: subject.name.clone(),
                icon: subject.icon.clone(),
            })
            .await?;
        report.subjects += 1;

        for topic in source.catalog.list_topics(&subject.id).await? {
            target
                .catalog
                .upsert_topic(
                    &copied.id,
                    &NewCatalogTopic {
                        title: topic.title,
                        description: topic.description,
                    },
                )
                .await?;
            report.catalog_topics += 1;
        }
    }

    info!(
        identities = report.identities,
        identities_skipped = report.identities_skipped,
        saved_topics = report.saved_topics,
        resources = report.resources,
        subjects = report.subjects,
        catalog_topics = report.catalog_topics,
        "Store transfer completed"
    );
    Ok(report)
}

/// Every identity in the store, newest first.
async fn all_identities(stores: &StoreSet) -> AppResult<Vec<Identity>> {
    let mut identities = Vec::new();
    let mut page = 1;
    loop {
        let batch = stores.identities.list(&PageRequest::new(page, BATCH)).await?;
        let done = batch.items.len() < batch.page_size as usize;
        identities.extend(batch.items);
        if done {
            return Ok(identities);
        }
        page += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainery_core::config::StoreBackend;
    use brainery_entity::identity::Role;

    async fn seeded_document_store() -> StoreSet {
        let stores = StoreSet::in_memory(StoreBackend::Document).await.unwrap();
        let ada = stores
            .identities
            .create(&NewIdentity {
                username: "Ada Lovelace".into(),
                email: "Ada@Test.com".into(),
                password_hash: "$argon2id$stub".into(),
                role: Role::Admin,
            })
            .await
            .unwrap();
        for title in ["Algebra", "Geometry"] {
            stores
                .saved_topics
                .create(
                    &ada.id,
                    &NewSavedTopic {
                        title: title.into(),
                        summary: format!("{title} basics"),
                    },
                )
                .await
                .unwrap();
        }
        stores
            .resources
            .create(
                &ada.id,
                &NewResource {
                    title: "Khan Academy".into(),
                    link: Some("https://khanacademy.org".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let math = stores
            .catalog
            .upsert_subject(&NewSubject {
                name: "Math".into(),
                icon: None,
            })
            .await
            .unwrap();
        stores
            .catalog
            .upsert_topic(
                &math.id,
                &NewCatalogTopic {
                    title: "Algebra".into(),
                    description: Some("Symbols and rules".into()),
                },
            )
            .await
            .unwrap();
        stores
    }

    #[tokio::test]
    async fn test_document_to_relational_keeps_everything() {
        let source = seeded_document_store().await;
        let target = StoreSet::in_memory(StoreBackend::Relational).await.unwrap();

        let report = transfer(&source, &target).await.unwrap();
        assert_eq!(report.identities, 1);
        assert_eq!(report.saved_topics, 2);
        assert_eq!(report.resources, 1);
        assert_eq!(report.subjects, 1);
        assert_eq!(report.catalog_topics, 1);

        let ada = target
            .identities
            .find_by_email("ada@test.com")
            .await
            .unwrap()
            .expect("copied identity");
        assert_eq!(ada.password_hash, "$argon2id$stub");
        assert_eq!(ada.role, Role::Admin);

        let topics = target.saved_topics.list_for_owner(&ada.id).await.unwrap();
        let titles: Vec<_> = topics.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Geometry", "Algebra"]);
    }

    #[tokio::test]
    async fn test_rerun_skips_existing_identities() {
        let source = seeded_document_store().await;
        let target = StoreSet::in_memory(StoreBackend::Relational).await.unwrap();
        transfer(&source, &target).await.unwrap();

        let again = transfer(&source, &target).await.unwrap();
        assert_eq!(again.identities, 0);
        assert_eq!(again.identities_skipped, 1);
        assert_eq!(again.saved_topics, 0);
        assert_eq!(target.identities.count().await.unwrap(), 1);
        assert_eq!(target.catalog.list_subjects().await.unwrap().len(), 1);
    }
}
