//! Integration tests for the discipler and survey response list views.

mod common;

use chrono::{Duration, Utc};
use shepherd_core::listing::DisciplerTab;
use shepherd_db::{DisciplerRepository, ResponseRepository};

use common::{
    activate, complete_training, create_discipler, create_organisation, create_prospect,
    create_questionnaire, create_response, create_test_db, create_training,
};

#[tokio::test]
async fn test_discipler_tabs_and_order() {
    let db = create_test_db().await;
    let org = create_organisation(&db, "Grace Fellowship").await;
    let zed = create_discipler(&db, org.id, "Amos", "Zulu").await;
    let abe = create_discipler(&db, org.id, "Ruth", "Abebe").await;
    let training = create_training(&db, org.id, "Foundations").await;
    complete_training(&db, abe.id, training.id).await;

    create_prospect(&db, org.id, "FORM-1", Some(zed.id)).await;
    let unassigned = create_prospect(&db, org.id, "FORM-2", None).await;

    let repo = DisciplerRepository::new(db.clone());

    let all = repo.list(org.id, DisciplerTab::All, None, None).await.unwrap();
    let ids: Vec<_> = all.disciplers.data.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![abe.id, zed.id]);
    assert_eq!(all.counts.all, 2);
    assert_eq!(all.counts.trained, 1);
    assert_eq!(all.counts.not_trained, 1);
    assert_eq!(all.disciplers.data[0].trainings_completed, 1);
    assert_eq!(all.disciplers.data[1].prospect_count, 1);
    assert_eq!(all.unassigned_prospects.len(), 1);
    assert_eq!(all.unassigned_prospects[0].id, unassigned.id);

    let trained = repo
        .list(org.id, DisciplerTab::Trained, None, None)
        .await
        .unwrap();
    assert_eq!(trained.disciplers.data.len(), 1);
    assert_eq!(trained.disciplers.data[0].id, abe.id);

    let not_trained = repo
        .list(org.id, DisciplerTab::NotTrained, None, None)
        .await
        .unwrap();
    assert_eq!(not_trained.disciplers.data.len(), 1);
    assert_eq!(not_trained.disciplers.data[0].id, zed.id);

    let searched = repo
        .list(org.id, DisciplerTab::All, Some("ZULU".to_string()), None)
        .await
        .unwrap();
    assert_eq!(searched.disciplers.meta.total, 1);
    assert_eq!(searched.disciplers.data[0].last_name, "Zulu");
}

#[tokio::test]
async fn test_training_counts_stay_within_the_organisation() {
    let db = create_test_db().await;
    let org = create_organisation(&db, "Grace Fellowship").await;
    let other = create_organisation(&db, "Hope Chapel").await;
    let local = create_discipler(&db, org.id, "Ruth", "Abebe").await;
    create_discipler(&db, org.id, "Amos", "Zulu").await;
    let outsider = create_discipler(&db, other.id, "Mary", "Kamau").await;

    let foundations = create_training(&db, org.id, "Foundations").await;
    let leadership = create_training(&db, org.id, "Leadership").await;
    complete_training(&db, local.id, foundations.id).await;
    complete_training(&db, local.id, leadership.id).await;
    complete_training(&db, outsider.id, foundations.id).await;

    let repo = DisciplerRepository::new(db.clone());

    let all = repo.list(org.id, DisciplerTab::All, None, None).await.unwrap();
    assert_eq!(all.counts.all, 2);
    assert_eq!(all.counts.trained, 1);
    assert_eq!(all.disciplers.data[0].id, local.id);
    assert_eq!(all.disciplers.data[0].trainings_completed, 2);
    assert_eq!(all.disciplers.data[1].trainings_completed, 0);

    let not_trained = repo
        .list(org.id, DisciplerTab::NotTrained, None, None)
        .await
        .unwrap();
    assert_eq!(not_trained.disciplers.meta.total, 1);
    assert!(not_trained.disciplers.data.iter().all(|d| d.id != outsider.id));
}

#[tokio::test]
async fn test_survey_responses_scoped_searched_and_newest_first() {
    let db = create_test_db().await;
    let org = create_organisation(&db, "Grace Fellowship").await;
    let (active, active_questions) = create_questionnaire(&db, "Intake", 1).await;
    let (hidden, hidden_questions) = create_questionnaire(&db, "Hidden", 1).await;
    activate(&db, org.id, active.id, true).await;
    activate(&db, org.id, hidden.id, false).await;

    let now = Utc::now();
    let older = create_response(&db, active_questions[0].id, "FORM-OLD", now - Duration::days(1)).await;
    let newer = create_response(&db, active_questions[0].id, "FORM-NEW", now).await;
    create_response(&db, hidden_questions[0].id, "FORM-HIDDEN", now).await;

    let repo = ResponseRepository::new(db.clone());

    let listing = repo.list(org.id, None, None).await.unwrap();
    assert_eq!(listing.total_responses, 2);
    let ids: Vec<_> = listing.responses.data.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
    assert_eq!(listing.responses.data[0].questionnaire_name, "Intake");
    assert_eq!(listing.responses.meta.per_page, 20);

    let searched = repo
        .list(org.id, Some("form-old".to_string()), None)
        .await
        .unwrap();
    assert_eq!(searched.responses.meta.total, 1);
    assert_eq!(searched.total_responses, 2);
}
