//! Integration tests for organisation resolution and typed settings.

mod common;

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use shepherd_core::organisation::{FallbackPolicy, IdentityContext};
use shepherd_core::settings::DisciplerProspectRatio;
use shepherd_db::entities::sea_orm_active_enums::UserRole;
use shepherd_db::{OrganisationResolver, SettingsRepository};
use uuid::Uuid;

use common::{create_app_user, create_organisation_at, create_test_db};

#[tokio::test]
async fn test_identity_resolves_own_organisation() {
    let db = create_test_db().await;
    let now = Utc::now();
    create_organisation_at(&db, "Oldest", now - Duration::days(5)).await;
    let own = create_organisation_at(&db, "Own", now).await;
    let user = create_app_user(&db, own.id, "Ann", "Admin", UserRole::Admin).await;

    let resolver = OrganisationResolver::new(db.clone(), FallbackPolicy::Deny);
    let resolved = resolver
        .resolve(&IdentityContext::for_user(user.id))
        .await
        .unwrap();
    assert_eq!(resolved.map(|o| o.id), Some(own.id));
}

#[tokio::test]
async fn test_first_organisation_fallback() {
    let db = create_test_db().await;
    let now = Utc::now();
    let oldest = create_organisation_at(&db, "Oldest", now - Duration::days(5)).await;
    create_organisation_at(&db, "Newer", now).await;

    let resolver = OrganisationResolver::new(db.clone(), FallbackPolicy::FirstOrganisation);

    let anonymous = resolver.resolve(&IdentityContext::anonymous()).await.unwrap();
    assert_eq!(anonymous.map(|o| o.id), Some(oldest.id));

    let unknown_user = resolver
        .resolve(&IdentityContext::for_user(Uuid::new_v4()))
        .await
        .unwrap();
    assert_eq!(unknown_user.map(|o| o.id), Some(oldest.id));
}

#[tokio::test]
async fn test_deny_fallback_resolves_nothing() {
    let db = create_test_db().await;
    create_organisation_at(&db, "Only", Utc::now()).await;

    let resolver = OrganisationResolver::new(db.clone(), FallbackPolicy::Deny);
    let resolved = resolver.resolve(&IdentityContext::anonymous()).await.unwrap();
    assert!(resolved.is_none());
}

#[tokio::test]
async fn test_no_organisations_resolves_nothing() {
    let db = create_test_db().await;
    let resolver = OrganisationResolver::new(db.clone(), FallbackPolicy::FirstOrganisation);
    assert!(resolver.resolve(&IdentityContext::anonymous()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_typed_setting_defaults_and_overrides() {
    let db = create_test_db().await;
    let settings = SettingsRepository::new(db.clone());

    assert_eq!(settings.get::<DisciplerProspectRatio>().await.unwrap(), dec!(1));

    settings.set("discipler_prospect_ratio", "5").await.unwrap();
    assert_eq!(settings.get::<DisciplerProspectRatio>().await.unwrap(), dec!(5));

    settings.set("discipler_prospect_ratio", "five").await.unwrap();
    assert_eq!(settings.get::<DisciplerProspectRatio>().await.unwrap(), dec!(1));
    assert_eq!(
        settings.raw("discipler_prospect_ratio").await.unwrap().as_deref(),
        Some("five")
    );
}
