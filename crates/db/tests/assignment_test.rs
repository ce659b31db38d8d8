//! Integration tests for assigning prospects to disciplers.

mod common;

use shepherd_db::{AssignmentError, AssignmentRepository, ProspectRepository};
use uuid::Uuid;

use common::{create_discipler, create_organisation, create_prospect, create_test_db};

#[tokio::test]
async fn test_assign_sets_discipler_and_formats_message() {
    let db = create_test_db().await;
    let org = create_organisation(&db, "Grace Fellowship").await;
    let discipler = create_discipler(&db, org.id, "Paul", "Otieno").await;
    let prospect = create_prospect(&db, org.id, "FORM-1", None).await;

    let message = AssignmentRepository::new(db.clone())
        .assign(prospect.id, discipler.id)
        .await
        .unwrap();

    assert_eq!(message, format!("{} assigned to Paul Otieno", prospect.name));
    let stored = ProspectRepository::new(db.clone())
        .find_by_id(prospect.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.discipler_id, Some(discipler.id));
}

#[tokio::test]
async fn test_assign_is_idempotent() {
    let db = create_test_db().await;
    let org = create_organisation(&db, "Grace Fellowship").await;
    let discipler = create_discipler(&db, org.id, "Paul", "Otieno").await;
    let prospect = create_prospect(&db, org.id, "FORM-1", None).await;
    let repo = AssignmentRepository::new(db.clone());

    let first = repo.assign(prospect.id, discipler.id).await.unwrap();
    let second = repo.assign(prospect.id, discipler.id).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_reassign_overwrites() {
    let db = create_test_db().await;
    let org = create_organisation(&db, "Grace Fellowship").await;
    let first = create_discipler(&db, org.id, "Paul", "Otieno").await;
    let second = create_discipler(&db, org.id, "Lydia", "Wanjiru").await;
    let prospect = create_prospect(&db, org.id, "FORM-1", Some(first.id)).await;

    let message = AssignmentRepository::new(db.clone())
        .assign(prospect.id, second.id)
        .await
        .unwrap();
    assert!(message.ends_with("assigned to Lydia Wanjiru"));

    let stored = ProspectRepository::new(db.clone())
        .find_by_id(prospect.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.discipler_id, Some(second.id));
}

#[tokio::test]
async fn test_assign_unknown_ids() {
    let db = create_test_db().await;
    let org = create_organisation(&db, "Grace Fellowship").await;
    let discipler = create_discipler(&db, org.id, "Paul", "Otieno").await;
    let prospect = create_prospect(&db, org.id, "FORM-1", None).await;
    let repo = AssignmentRepository::new(db.clone());

    assert!(matches!(
        repo.assign(Uuid::new_v4(), discipler.id).await,
        Err(AssignmentError::ProspectNotFound(_))
    ));
    assert!(matches!(
        repo.assign(prospect.id, Uuid::new_v4()).await,
        Err(AssignmentError::DisciplerNotFound(_))
    ));
}
