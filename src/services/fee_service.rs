use crate::{
    error::{ApiError, Result},
    models::fee::{FeeRequest, FeeResponse, ListFeesQuery},
    services::contains_insensitive,
    utils::is_fee_schedule_compliant,
};
use entity::{fee, member};
use sea_orm::{
    entity::*, query::*, ConnectionTrait, DatabaseConnection, PaginatorTrait, TransactionTrait,
};
use std::collections::HashMap;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

pub struct FeeService {
    db: DatabaseConnection,
}

impl FeeService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fees ordered by member name then year, optionally narrowed by
    /// member name and by fee-schedule status
    #[instrument(skip(self))]
    pub async fn list(&self, query: &ListFeesQuery) -> Result<Vec<FeeResponse>> {
        let mut select = fee::Entity::find().find_also_related(member::Entity);
        if let Some(name) = &query.member_name {
            select = select.filter(contains_insensitive(
                member::Entity,
                member::Column::Name,
                name,
            ));
        }

        let rows = select
            .order_by_asc(member::Column::Name)
            .order_by_asc(fee::Column::Year)
            .all(&self.db)
            .await?;

        let mut paid_years: HashMap<i32, Vec<i32>> = HashMap::new();
        for (fee, _) in &rows {
            paid_years.entry(fee.member_id).or_default().push(fee.year);
        }
        let on_schedule: HashMap<i32, bool> = paid_years
            .iter()
            .map(|(member_id, years)| (*member_id, is_fee_schedule_compliant(years)))
            .collect();

        let only_missing = query.show_fees_missing_schedule.unwrap_or(false);
        let only_on_schedule = query.show_fees_on_schedule.unwrap_or(false);

        let fees = rows
            .into_iter()
            .map(|(fee, member)| {
                let fees_on_schedule = on_schedule.get(&fee.member_id).copied().unwrap_or(false);
                FeeResponse::new(fee, member.as_ref(), fees_on_schedule)
            })
            .filter(|fee| {
                if only_missing {
                    !fee.fees_on_schedule
                } else if only_on_schedule {
                    fee.fees_on_schedule
                } else {
                    true
                }
            })
            .collect();

        Ok(fees)
    }

    /// Record a fee; one fee per member and year
    #[instrument(skip(self))]
    pub async fn create(&self, request: FeeRequest) -> Result<FeeResponse> {
        let txn = self.db.begin().await?;

        let member = find_member(&txn, request.member_id).await?;
        ensure_year_free(&txn, request.member_id, request.year, None).await?;

        let now = OffsetDateTime::now_utc();
        let fee = fee::ActiveModel {
            year: Set(request.year),
            paid_amount: Set(request.paid_amount),
            member_id: Set(request.member_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let fees_on_schedule = member_on_schedule(&txn, request.member_id).await?;

        txn.commit().await?;

        info!(
            "Recorded fee {} for member {} year {}",
            fee.id, request.member_id, request.year
        );

        Ok(FeeResponse::new(fee, Some(&member), fees_on_schedule))
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, request: FeeRequest) -> Result<FeeResponse> {
        let txn = self.db.begin().await?;

        let existing = fee::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Fee {} not found", id)))?;

        let member = find_member(&txn, request.member_id).await?;
        ensure_year_free(&txn, request.member_id, request.year, Some(id)).await?;

        let mut active: fee::ActiveModel = existing.into();
        active.year = Set(request.year);
        active.paid_amount = Set(request.paid_amount);
        active.member_id = Set(request.member_id);
        active.updated_at = Set(OffsetDateTime::now_utc());
        let fee = active.update(&txn).await?;

        let fees_on_schedule = member_on_schedule(&txn, request.member_id).await?;

        txn.commit().await?;

        info!("Updated fee {}", id);

        Ok(FeeResponse::new(fee, Some(&member), fees_on_schedule))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = fee::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(ApiError::NotFound(format!("Fee {} not found", id)));
        }

        info!("Deleted fee {}", id);

        Ok(())
    }
}

async fn find_member<C: ConnectionTrait>(conn: &C, member_id: i32) -> Result<member::Model> {
    member::Entity::find_by_id(member_id)
        .one(conn)
        .await?
        .ok_or_else(|| {
            warn!("Fee references unknown member {}", member_id);
            ApiError::NotFound(format!("Member {} not found", member_id))
        })
}

async fn ensure_year_free<C: ConnectionTrait>(
    conn: &C,
    member_id: i32,
    year: i32,
    except_fee: Option<i32>,
) -> Result<()> {
    let mut query = fee::Entity::find()
        .filter(fee::Column::MemberId.eq(member_id))
        .filter(fee::Column::Year.eq(year));
    if let Some(fee_id) = except_fee {
        query = query.filter(fee::Column::Id.ne(fee_id));
    }

    if query.count(conn).await? > 0 {
        warn!("Member {} already paid the fee for {}", member_id, year);
        return Err(ApiError::Conflict(format!(
            "Member {} already has a fee for {}",
            member_id, year
        )));
    }

    Ok(())
}

async fn member_on_schedule<C: ConnectionTrait>(conn: &C, member_id: i32) -> Result<bool> {
    let years: Vec<i32> = fee::Entity::find()
        .select_only()
        .column(fee::Column::Year)
        .filter(fee::Column::MemberId.eq(member_id))
        .into_tuple()
        .all(conn)
        .await?;

    Ok(is_fee_schedule_compliant(&years))
}
