//! Fee structure repository: the per-school fee catalogue.

use chrono::Utc;
use scholaris_core::billing::{
    BillingError, BillingService, FeeStructureInput, FeeStructurePatch,
};
use scholaris_core::tenancy::TenantScope;
use scholaris_shared::types::{FeeStructureId, PageRequest, PageResponse, SchoolId};
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::error::RepositoryError;
use crate::entities::{fee_structures, schools};
use crate::scope::{SoftDelete, fee_structure_scope};

/// Fee structure repository.
#[derive(Debug, Clone)]
pub struct FeeStructureRepository {
    db: DatabaseConnection,
}

impl FeeStructureRepository {
    /// Creates a new fee structure repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Adds a fee structure to a school's catalogue.
    ///
    /// School staff create under their own school. A super-admin has no
    /// school of their own and must name one.
    ///
    /// # Errors
    ///
    /// - `BlankFeeName`, `NegativeFeeAmount`, `TooPrecise` or `AmountTooLarge`
    /// - `SchoolRequired` if no school was named and the caller has none
    /// - `SchoolNotFound` if the named school is absent, deleted or out of scope
    pub async fn create(
        &self,
        input: FeeStructureInput,
        school: Option<SchoolId>,
        scope: &TenantScope,
    ) -> Result<fee_structures::Model, RepositoryError> {
        let input = BillingService::validate_fee_structure(input)?;

        let school_id = match (scope.target_school(school), school) {
            (Some(school_id), _) => school_id,
            (None, Some(_)) => return Err(BillingError::SchoolNotFound.into()),
            (None, None) => return Err(BillingError::SchoolRequired.into()),
        };

        schools::Entity::find_live()
            .filter(schools::Column::Id.eq(school_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(BillingError::SchoolNotFound)?;

        let now = Utc::now().into();
        let fee = fee_structures::ActiveModel {
            id: Set(FeeStructureId::new().into_inner()),
            school_id: Set(school_id.into_inner()),
            name: Set(input.name),
            description: Set(input.description),
            amount: Set(input.amount),
            frequency: Set(input.frequency.into()),
            is_optional: Set(input.is_optional),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(
            fee_structure_id = %fee.id,
            school_id = %fee.school_id,
            amount = %fee.amount,
            "Fee structure created"
        );

        Ok(fee)
    }

    /// Lists live fee structures visible within `scope`, newest first.
    ///
    /// `search` matches names case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        scope: &TenantScope,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<PageResponse<fee_structures::Model>, RepositoryError> {
        let mut query = fee_structures::Entity::find_live().filter(fee_structure_scope(scope));

        if let Some(term) = search.map(str::trim).filter(|term| !term.is_empty()) {
            query = query.filter(name_matches(term));
        }

        let total = query.clone().count(&self.db).await?;

        let data = query
            .order_by_desc(fee_structures::Column::CreatedAt)
            .order_by_desc(fee_structures::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page, total))
    }

    /// Gets a live fee structure visible within `scope`.
    ///
    /// # Errors
    ///
    /// Returns `FeeStructureNotFound` if it is absent, deleted or out of scope.
    pub async fn find(
        &self,
        id: FeeStructureId,
        scope: &TenantScope,
    ) -> Result<fee_structures::Model, RepositoryError> {
        let fee = fee_structures::Entity::find_live()
            .filter(fee_structures::Column::Id.eq(id.into_inner()))
            .filter(fee_structure_scope(scope))
            .one(&self.db)
            .await?
            .ok_or(BillingError::FeeStructureNotFound)?;
        Ok(fee)
    }

    /// Applies a partial update. Invoices already issued keep their amounts.
    ///
    /// # Errors
    ///
    /// - `FeeStructureNotFound` if it is absent, deleted or out of scope
    /// - validation errors for the fields the patch sets
    pub async fn update(
        &self,
        id: FeeStructureId,
        patch: FeeStructurePatch,
        scope: &TenantScope,
    ) -> Result<fee_structures::Model, RepositoryError> {
        let patch = BillingService::validate_fee_patch(patch)?;
        let fee = self.find(id, scope).await?;
        if patch.is_empty() {
            return Ok(fee);
        }

        let mut active: fee_structures::ActiveModel = fee.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(description) = patch.description {
            active.description = Set(Some(description));
        }
        if let Some(amount) = patch.amount {
            active.amount = Set(amount);
        }
        if let Some(frequency) = patch.frequency {
            active.frequency = Set(frequency.into());
        }
        if let Some(is_optional) = patch.is_optional {
            active.is_optional = Set(is_optional);
        }
        active.updated_at = Set(Utc::now().into());
        let fee = active.update(&self.db).await?;

        tracing::info!(fee_structure_id = %fee.id, "Fee structure updated");
        Ok(fee)
    }

    /// Soft-deletes a fee structure. Invoice lines drawn from it keep the
    /// reference.
    ///
    /// # Errors
    ///
    /// Returns `FeeStructureNotFound` if it is absent, deleted or out of scope.
    pub async fn delete(
        &self,
        id: FeeStructureId,
        scope: &TenantScope,
    ) -> Result<(), RepositoryError> {
        let fee = self.find(id, scope).await?;

        let now = Utc::now().into();
        let mut active: fee_structures::ActiveModel = fee.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        let fee = active.update(&self.db).await?;

        tracing::info!(fee_structure_id = %fee.id, "Fee structure deleted");
        Ok(())
    }
}

/// Returns `(id, name)` of the live fee structures among `ids` that
/// `school_id` offers.
pub(crate) async fn offered_by<C: ConnectionTrait>(
    conn: &C,
    school_id: Uuid,
    ids: &[Uuid],
) -> Result<Vec<(Uuid, String)>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    fee_structures::Entity::find_live()
        .select_only()
        .column(fee_structures::Column::Id)
        .column(fee_structures::Column::Name)
        .filter(fee_structures::Column::Id.is_in(ids.iter().copied()))
        .filter(fee_structures::Column::SchoolId.eq(school_id))
        .into_tuple()
        .all(conn)
        .await
}

/// Case-insensitive substring match on the name.
fn name_matches(term: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col((
        fee_structures::Entity,
        fee_structures::Column::Name,
    ))))
    .like(like_pattern(term))
}

/// Lower-cased `%term%` with `%`, `_` and `\` matching literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
