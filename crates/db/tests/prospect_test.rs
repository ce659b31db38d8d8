//! Integration tests for joining and the prospect list view.

mod common;

use chrono::{Duration, Utc};
use sea_orm::{EntityTrait, PaginatorTrait};
use shepherd_core::funnel::{FormId, FunnelAction};
use shepherd_core::listing::ProspectTab;
use shepherd_db::entities::prospects;
use shepherd_db::{FunnelRepository, JoinDetails, ProspectError, ProspectRepository};

use common::{
    activate, create_discipler, create_organisation, create_prospect, create_prospect_at,
    create_questionnaire, create_response, create_test_db,
};

fn details(email: &str) -> JoinDetails {
    JoinDetails {
        name: "Ada Mensah".to_string(),
        email: email.to_string(),
        phone: Some("0700 000000".to_string()),
    }
}

#[tokio::test]
async fn test_complete_join_creates_prospect_and_logs() {
    let db = create_test_db().await;
    let org = create_organisation(&db, "Grace Fellowship").await;
    let (questionnaire, questions) = create_questionnaire(&db, "Intake", 1).await;
    activate(&db, org.id, questionnaire.id, true).await;
    create_response(&db, questions[0].id, "JOINFORM", Utc::now()).await;

    let repo = ProspectRepository::new(db.clone());
    let form_id = FormId::parse("JOINFORM").unwrap();

    let prospect = repo
        .complete_join(&form_id, details("ada@example.com"), None)
        .await
        .unwrap();

    assert_eq!(prospect.prospect_form_id, "JOINFORM");
    assert_eq!(prospect.organisation_id, org.id);
    assert_eq!(prospect.discipler_id, None);

    let signed_up = FunnelRepository::new(db.clone())
        .count(&form_id, Some(FunnelAction::ProspectSignedUp))
        .await
        .unwrap();
    assert_eq!(signed_up, 1);
}

#[tokio::test]
async fn test_complete_join_twice_conflicts_and_keeps_one_prospect() {
    let db = create_test_db().await;
    let org = create_organisation(&db, "Grace Fellowship").await;
    let repo = ProspectRepository::new(db.clone());
    let form_id = FormId::generate();

    repo.complete_join(&form_id, details("ada@example.com"), Some(org.id))
        .await
        .unwrap();
    let second = repo
        .complete_join(&form_id, details("ada@example.com"), Some(org.id))
        .await;

    assert!(matches!(second, Err(ProspectError::Conflict(_))));
    assert_eq!(repo.count_for_form(&form_id).await.unwrap(), 1);
    assert_eq!(prospects::Entity::find().count(&db).await.unwrap(), 1);

    // The rejected attempt logs nothing.
    let signed_up = FunnelRepository::new(db.clone())
        .count(&form_id, Some(FunnelAction::ProspectSignedUp))
        .await
        .unwrap();
    assert_eq!(signed_up, 1);
}

#[tokio::test]
async fn test_duplicate_email_on_other_form_conflicts() {
    let db = create_test_db().await;
    let org = create_organisation(&db, "Grace Fellowship").await;
    let repo = ProspectRepository::new(db.clone());

    repo.complete_join(&FormId::generate(), details("ada@example.com"), Some(org.id))
        .await
        .unwrap();
    let result = repo
        .complete_join(&FormId::generate(), details("ada@example.com"), Some(org.id))
        .await;

    assert!(matches!(result, Err(ProspectError::Conflict("email"))));
}

#[tokio::test]
async fn test_existing_prospect_row_for_form_conflicts() {
    let db = create_test_db().await;
    let org = create_organisation(&db, "Grace Fellowship").await;
    create_prospect(&db, org.id, "PRESEEDED", None).await;

    let repo = ProspectRepository::new(db.clone());
    let form_id = FormId::parse("PRESEEDED").unwrap();
    let result = repo
        .complete_join(&form_id, details("new@example.com"), Some(org.id))
        .await;

    assert!(matches!(result, Err(ProspectError::Conflict("form id"))));
    assert_eq!(repo.count_for_form(&form_id).await.unwrap(), 1);

    let signed_up = FunnelRepository::new(db.clone())
        .count(&form_id, Some(FunnelAction::ProspectSignedUp))
        .await
        .unwrap();
    assert_eq!(signed_up, 0);
}

#[tokio::test]
async fn test_complete_join_without_organisation_is_unavailable() {
    let db = create_test_db().await;
    let repo = ProspectRepository::new(db.clone());

    let result = repo
        .complete_join(&FormId::generate(), details("ada@example.com"), None)
        .await;
    assert!(matches!(result, Err(ProspectError::NoOrganisation)));
}

#[tokio::test]
async fn test_complete_join_requires_name_and_email() {
    let db = create_test_db().await;
    let org = create_organisation(&db, "Grace Fellowship").await;
    let repo = ProspectRepository::new(db.clone());

    let result = repo
        .complete_join(&FormId::generate(), details("  "), Some(org.id))
        .await;
    assert!(matches!(result, Err(ProspectError::MissingField("Email"))));
}

#[tokio::test]
async fn test_list_tabs_search_and_order() {
    let db = create_test_db().await;
    let org = create_organisation(&db, "Grace Fellowship").await;
    let other = create_organisation(&db, "Elsewhere").await;
    let discipler = create_discipler(&db, org.id, "Paul", "Otieno").await;

    let now = Utc::now();
    let oldest = create_prospect_at(&db, org.id, "FORM-1", Some(discipler.id), now - Duration::days(2)).await;
    let newest = create_prospect_at(&db, org.id, "FORM-2", None, now).await;
    create_prospect_at(&db, org.id, "FORM-3", None, now - Duration::days(1)).await;
    create_prospect(&db, other.id, "FORM-X", None).await;

    let repo = ProspectRepository::new(db.clone());

    let all = repo.list(org.id, ProspectTab::All, None, None).await.unwrap();
    assert_eq!(all.prospects.meta.total, 3);
    assert_eq!(all.prospects.data[0].id, newest.id);
    assert_eq!(all.counts.all, 3);
    assert_eq!(all.counts.assigned, 1);
    assert_eq!(all.counts.unassigned, 2);
    assert_eq!(all.disciplers.len(), 1);
    assert_eq!(all.disciplers[0].name, "Paul Otieno");

    let assigned = repo
        .list(org.id, ProspectTab::Assigned, None, None)
        .await
        .unwrap();
    assert_eq!(assigned.prospects.data.len(), 1);
    assert_eq!(assigned.prospects.data[0].id, oldest.id);
    assert_eq!(
        assigned.prospects.data[0].discipler_name.as_deref(),
        Some("Paul Otieno")
    );

    let searched = repo
        .list(org.id, ProspectTab::All, Some("form-3".to_string()), None)
        .await
        .unwrap();
    assert_eq!(searched.prospects.meta.total, 1);
    assert_eq!(searched.prospects.data[0].prospect_form_id, "FORM-3");
}

#[tokio::test]
async fn test_list_pages_by_fifteen() {
    let db = create_test_db().await;
    let org = create_organisation(&db, "Grace Fellowship").await;
    for i in 0..17 {
        create_prospect(&db, org.id, &format!("FORM-{i}"), None).await;
    }
    let repo = ProspectRepository::new(db.clone());

    let first = repo.list(org.id, ProspectTab::All, None, Some(0)).await.unwrap();
    assert_eq!(first.prospects.meta.page, 1);
    assert_eq!(first.prospects.data.len(), 15);
    assert_eq!(first.prospects.meta.total_pages, 2);

    let second = repo.list(org.id, ProspectTab::All, None, Some(2)).await.unwrap();
    assert_eq!(second.prospects.data.len(), 2);
}
