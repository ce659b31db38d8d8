//! Organisation lookup and resolution.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use shepherd_core::organisation::{FallbackPolicy, IdentityContext};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::entities::{app_users, organisations};

/// Organisation repository.
#[derive(Debug, Clone)]
pub struct OrganisationRepository {
    db: DatabaseConnection,
}

impl OrganisationRepository {
    /// Creates a new organisation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an organisation by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<organisations::Model>, DbErr> {
        organisations::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds the oldest organisation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn first(&self) -> Result<Option<organisations::Model>, DbErr> {
        organisations::Entity::find()
            .order_by_asc(organisations::Column::CreatedAt)
            .order_by_asc(organisations::Column::Id)
            .one(&self.db)
            .await
    }

    /// Finds the organisation an application user belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn for_app_user(
        &self,
        app_user_id: Uuid,
    ) -> Result<Option<organisations::Model>, DbErr> {
        let result = app_users::Entity::find()
            .filter(app_users::Column::Id.eq(app_user_id))
            .find_also_related(organisations::Entity)
            .one(&self.db)
            .await?;

        Ok(result.and_then(|(_, org)| org))
    }
}

/// Resolves the organisation a request is scoped to.
#[derive(Debug, Clone)]
pub struct OrganisationResolver {
    organisations: OrganisationRepository,
    policy: FallbackPolicy,
}

impl OrganisationResolver {
    /// Creates a resolver with the given fallback policy.
    #[must_use]
    pub const fn new(db: DatabaseConnection, policy: FallbackPolicy) -> Self {
        Self {
            organisations: OrganisationRepository::new(db),
            policy,
        }
    }

    /// Returns the configured policy.
    #[must_use]
    pub const fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Resolves the caller's organisation.
    ///
    /// The caller's own organisation wins. Otherwise the fallback policy
    /// decides; `None` means no organisation is available.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn resolve(
        &self,
        identity: &IdentityContext,
    ) -> Result<Option<organisations::Model>, DbErr> {
        if let Some(app_user_id) = identity.app_user_id
            && let Some(org) = self.organisations.for_app_user(app_user_id).await?
        {
            debug!(%app_user_id, organisation_id = %org.id, "Resolved organisation from identity");
            return Ok(Some(org));
        }

        match self.policy {
            FallbackPolicy::FirstOrganisation => {
                let org = self.organisations.first().await?;
                if let Some(org) = &org {
                    warn!(
                        organisation_id = %org.id,
                        app_user_id = ?identity.app_user_id,
                        "Falling back to first organisation"
                    );
                }
                Ok(org)
            }
            FallbackPolicy::Deny => {
                warn!(app_user_id = ?identity.app_user_id, "No organisation for caller");
                Ok(None)
            }
        }
    }
}
