use crate::{
    error::{ApiError, Result},
    models::trip_type::{CreateTripTypeRequest, TripTypeResponse, UpdateTripTypeRequest},
};
use entity::{member_trip, non_member_trip, trip, trip_type};
use sea_orm::{entity::*, query::*, DatabaseConnection, TransactionTrait};
use time::OffsetDateTime;
use tracing::{debug, info, instrument};

pub struct TripTypeService {
    db: DatabaseConnection,
}

impl TripTypeService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<TripTypeResponse>> {
        let trip_types = trip_type::Entity::find()
            .order_by_asc(trip_type::Column::Name)
            .all(&self.db)
            .await?;

        Ok(trip_types.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    pub async fn create(&self, request: CreateTripTypeRequest) -> Result<TripTypeResponse> {
        let txn = self.db.begin().await?;

        if trip_type::Entity::find_by_id(request.code.clone())
            .one(&txn)
            .await?
            .is_some()
        {
            return Err(ApiError::Conflict(format!(
                "Trip type {} already exists",
                request.code
            )));
        }

        let now = OffsetDateTime::now_utc();
        let trip_type = trip_type::ActiveModel {
            code: Set(request.code),
            name: Set(request.name),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!("Created trip type {}", trip_type.code);

        Ok(trip_type.into())
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        code: &str,
        request: UpdateTripTypeRequest,
    ) -> Result<TripTypeResponse> {
        let existing = trip_type::Entity::find_by_id(code.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Trip type {} not found", code)))?;

        let mut active: trip_type::ActiveModel = existing.into();
        active.name = Set(request.name);
        active.updated_at = Set(OffsetDateTime::now_utc());
        let trip_type = active.update(&self.db).await?;

        info!("Updated trip type {}", code);

        Ok(trip_type.into())
    }

    /// Delete a trip type together with its trips and their bookings
    #[instrument(skip(self))]
    pub async fn delete(&self, code: &str) -> Result<()> {
        let txn = self.db.begin().await?;

        if trip_type::Entity::find_by_id(code.to_string())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(ApiError::NotFound(format!("Trip type {} not found", code)));
        }

        let trip_ids: Vec<i32> = trip::Entity::find()
            .select_only()
            .column(trip::Column::Id)
            .filter(trip::Column::TripTypeCode.eq(code))
            .into_tuple()
            .all(&txn)
            .await?;

        if !trip_ids.is_empty() {
            member_trip::Entity::delete_many()
                .filter(member_trip::Column::TripId.is_in(trip_ids.clone()))
                .exec(&txn)
                .await?;
            non_member_trip::Entity::delete_many()
                .filter(non_member_trip::Column::TripId.is_in(trip_ids.clone()))
                .exec(&txn)
                .await?;
            trip::Entity::delete_many()
                .filter(trip::Column::Id.is_in(trip_ids.clone()))
                .exec(&txn)
                .await?;
        }

        trip_type::Entity::delete_by_id(code.to_string())
            .exec(&txn)
            .await?;

        txn.commit().await?;

        debug!("Deleted {} trips of type {}", trip_ids.len(), code);
        info!("Deleted trip type {}", code);

        Ok(())
    }
}
