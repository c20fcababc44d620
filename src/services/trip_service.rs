use crate::{
    error::{ApiError, Result},
    models::{
        common::{BasicInfo, PageRequest},
        trip::{
            CreateTripRequest, ListTripsQuery, MemberBooking, MemberBookingResponse,
            NonMemberBooking, NonMemberBookingResponse, TripDashboardEntry, TripList,
            TripResponse, UpdateTripRequest,
        },
        trip_type::TripTypeResponse,
    },
    services::contains_insensitive,
    utils::{seats_fit_capacity, sum_seats, total_paid_amount},
};
use entity::{member, member_trip, non_member, non_member_trip, trip, trip_type};
use rust_decimal::Decimal;
use sea_orm::{
    entity::*, query::*, ConnectionTrait, DatabaseConnection, PaginatorTrait, TransactionTrait,
};
use std::collections::{HashMap, HashSet};
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};

/// Trips shown on the dashboard
const DASHBOARD_TRIPS: u64 = 20;

pub struct TripService {
    db: DatabaseConnection,
}

impl TripService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Paged trips ordered by name, with their bookings
    #[instrument(skip(self))]
    pub async fn list(&self, query: &ListTripsQuery, page: PageRequest) -> Result<TripList> {
        let mut select = trip::Entity::find();
        if let Some(text) = &query.text {
            select = select.filter(contains_insensitive(trip::Entity, trip::Column::Name, text));
        }
        if let Some(code) = &query.trip_type_code {
            select = select.filter(trip::Column::TripTypeCode.eq(code.as_str()));
        }
        if let Some(start) = query.date_start {
            select = select.filter(trip::Column::Date.gte(start));
        }
        if let Some(end) = query.date_end {
            select = select.filter(trip::Column::Date.lte(end));
        }

        let total_count = select.clone().count(&self.db).await?;

        let trips = select
            .order_by_asc(trip::Column::Name)
            .order_by_asc(trip::Column::Id)
            .offset(page.skip)
            .limit(page.take)
            .all(&self.db)
            .await?;

        let trips = hydrate(&self.db, trips, true).await?;

        Ok(TripList { total_count, trips })
    }

    /// Most recent trips by date
    #[instrument(skip(self))]
    pub async fn last(&self, take: u64) -> Result<Vec<TripResponse>> {
        let trips = trip::Entity::find()
            .order_by_desc(trip::Column::Date)
            .limit(take)
            .all(&self.db)
            .await?;

        hydrate(&self.db, trips, false).await
    }

    /// First past trips by date with the amount collected on each
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<Vec<TripDashboardEntry>> {
        let trips = trip::Entity::find()
            .filter(trip::Column::Date.lte(OffsetDateTime::now_utc()))
            .order_by_asc(trip::Column::Date)
            .limit(DASHBOARD_TRIPS)
            .all(&self.db)
            .await?;

        let ids: Vec<i32> = trips.iter().map(|t| t.id).collect();

        let mut member_amounts: HashMap<i32, Vec<Decimal>> = HashMap::new();
        let member_rows: Vec<(i32, Decimal)> = member_trip::Entity::find()
            .select_only()
            .column(member_trip::Column::TripId)
            .column(member_trip::Column::PaidAmount)
            .filter(member_trip::Column::TripId.is_in(ids.clone()))
            .into_tuple()
            .all(&self.db)
            .await?;
        for (trip_id, amount) in member_rows {
            member_amounts.entry(trip_id).or_default().push(amount);
        }

        let mut non_member_amounts: HashMap<i32, Vec<Decimal>> = HashMap::new();
        let non_member_rows: Vec<(i32, Decimal)> = non_member_trip::Entity::find()
            .select_only()
            .column(non_member_trip::Column::TripId)
            .column(non_member_trip::Column::PaidAmount)
            .filter(non_member_trip::Column::TripId.is_in(ids))
            .into_tuple()
            .all(&self.db)
            .await?;
        for (trip_id, amount) in non_member_rows {
            non_member_amounts.entry(trip_id).or_default().push(amount);
        }

        Ok(trips
            .into_iter()
            .map(|trip| {
                let members = member_amounts.get(&trip.id).map(Vec::as_slice).unwrap_or(&[]);
                let non_members = non_member_amounts
                    .get(&trip.id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);

                TripDashboardEntry {
                    total_paid_amount: total_paid_amount(members, non_members),
                    name: trip.name,
                    date: trip.date,
                }
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn create(&self, request: CreateTripRequest) -> Result<TripResponse> {
        ensure_capacity(
            request.total_seats,
            &request.member_trips,
            &request.non_member_trips,
        )?;

        let txn = self.db.begin().await?;

        find_trip_type(&txn, &request.trip_type_code).await?;
        check_bookings(&txn, &request.member_trips, &request.non_member_trips).await?;

        let now = OffsetDateTime::now_utc();
        let trip = trip::ActiveModel {
            name: Set(request.name),
            trip_type_code: Set(request.trip_type_code),
            trip_poster_file_name: Set(request.trip_poster_file_name),
            destination: Set(request.destination),
            description: Set(request.description),
            total_seats: Set(request.total_seats),
            date: Set(request.date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        insert_bookings(
            &txn,
            trip.id,
            &request.member_trips,
            &request.non_member_trips,
            now,
        )
        .await?;

        let mut trips = hydrate(&txn, vec![trip], true).await?;
        txn.commit().await?;

        let trip = trips
            .pop()
            .ok_or_else(|| anyhow::anyhow!("Created trip could not be reloaded"))?;

        info!(
            "Created trip {} with {} member and {} non-member bookings",
            trip.id,
            request.member_trips.len(),
            request.non_member_trips.len()
        );

        Ok(trip)
    }

    /// Update a trip and replace its bookings
    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, request: UpdateTripRequest) -> Result<TripResponse> {
        let txn = self.db.begin().await?;

        let existing = trip::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Trip {} not found", id)))?;

        // Capacity is checked against the seats stored on the trip
        if let Err(err) = ensure_capacity(
            existing.total_seats,
            &request.member_trips,
            &request.non_member_trips,
        ) {
            warn!("Rejected booking update for trip {}: {}", id, err);
            txn.rollback().await?;
            return Err(err);
        }

        if let Some(code) = &request.trip_type_code {
            find_trip_type(&txn, code).await?;
        }
        check_bookings(&txn, &request.member_trips, &request.non_member_trips).await?;

        let now = OffsetDateTime::now_utc();
        let mut active: trip::ActiveModel = existing.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(code) = request.trip_type_code {
            active.trip_type_code = Set(code);
        }
        if let Some(file_name) = request.trip_poster_file_name {
            active.trip_poster_file_name = Set(Some(file_name));
        }
        if let Some(destination) = request.destination {
            active.destination = Set(destination);
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        if let Some(total_seats) = request.total_seats {
            active.total_seats = Set(total_seats);
        }
        if let Some(date) = request.date {
            active.date = Set(date);
        }
        active.updated_at = Set(now);
        let trip = active.update(&txn).await?;

        member_trip::Entity::delete_many()
            .filter(member_trip::Column::TripId.eq(id))
            .exec(&txn)
            .await?;
        non_member_trip::Entity::delete_many()
            .filter(non_member_trip::Column::TripId.eq(id))
            .exec(&txn)
            .await?;

        insert_bookings(
            &txn,
            id,
            &request.member_trips,
            &request.non_member_trips,
            now,
        )
        .await?;

        let mut trips = hydrate(&txn, vec![trip], true).await?;
        txn.commit().await?;

        info!("Updated trip {}", id);

        trips
            .pop()
            .ok_or_else(|| anyhow::anyhow!("Updated trip could not be reloaded").into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;

        let members = member_trip::Entity::delete_many()
            .filter(member_trip::Column::TripId.eq(id))
            .exec(&txn)
            .await?;
        let non_members = non_member_trip::Entity::delete_many()
            .filter(non_member_trip::Column::TripId.eq(id))
            .exec(&txn)
            .await?;

        let result = trip::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(ApiError::NotFound(format!("Trip {} not found", id)));
        }

        txn.commit().await?;

        debug!(
            "Removed {} member and {} non-member bookings of trip {}",
            members.rows_affected, non_members.rows_affected, id
        );
        info!("Deleted trip {}", id);

        Ok(())
    }
}

fn ensure_capacity(
    total_seats: i32,
    member_trips: &[MemberBooking],
    non_member_trips: &[NonMemberBooking],
) -> Result<()> {
    let member_seats: Vec<i32> = member_trips.iter().map(|b| b.reserved_seats).collect();
    let non_member_seats: Vec<i32> = non_member_trips.iter().map(|b| b.reserved_seats).collect();

    if seats_fit_capacity(total_seats, &member_seats, &non_member_seats) {
        return Ok(());
    }

    Err(ApiError::CapacityExceeded {
        requested: sum_seats(&member_seats, &non_member_seats),
        available: total_seats,
    })
}

async fn find_trip_type<C: ConnectionTrait>(conn: &C, code: &str) -> Result<trip_type::Model> {
    trip_type::Entity::find_by_id(code.to_string())
        .one(conn)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Trip type {} not found", code)))
}

/// Booked people must exist and appear at most once per trip
async fn check_bookings<C: ConnectionTrait>(
    conn: &C,
    member_trips: &[MemberBooking],
    non_member_trips: &[NonMemberBooking],
) -> Result<()> {
    let member_ids: HashSet<i32> = member_trips.iter().map(|b| b.member_id).collect();
    if member_ids.len() != member_trips.len() {
        return Err(ApiError::Validation(
            "A member can only be booked once per trip".to_string(),
        ));
    }
    let non_member_ids: HashSet<i32> = non_member_trips.iter().map(|b| b.non_member_id).collect();
    if non_member_ids.len() != non_member_trips.len() {
        return Err(ApiError::Validation(
            "A non-member can only be booked once per trip".to_string(),
        ));
    }

    if !member_ids.is_empty() {
        let found: HashSet<i32> = member::Entity::find()
            .select_only()
            .column(member::Column::Id)
            .filter(member::Column::Id.is_in(member_ids.iter().copied()))
            .into_tuple::<i32>()
            .all(conn)
            .await?
            .into_iter()
            .collect();
        if let Some(missing) = member_ids.difference(&found).min() {
            return Err(ApiError::NotFound(format!("Member {} not found", missing)));
        }
    }

    if !non_member_ids.is_empty() {
        let found: HashSet<i32> = non_member::Entity::find()
            .select_only()
            .column(non_member::Column::Id)
            .filter(non_member::Column::Id.is_in(non_member_ids.iter().copied()))
            .into_tuple::<i32>()
            .all(conn)
            .await?
            .into_iter()
            .collect();
        if let Some(missing) = non_member_ids.difference(&found).min() {
            return Err(ApiError::NotFound(format!(
                "Non-member {} not found",
                missing
            )));
        }
    }

    Ok(())
}

async fn insert_bookings<C: ConnectionTrait>(
    conn: &C,
    trip_id: i32,
    member_trips: &[MemberBooking],
    non_member_trips: &[NonMemberBooking],
    now: OffsetDateTime,
) -> Result<()> {
    if !member_trips.is_empty() {
        member_trip::Entity::insert_many(member_trips.iter().map(|booking| {
            member_trip::ActiveModel {
                trip_id: Set(trip_id),
                member_id: Set(booking.member_id),
                reserved_seats: Set(booking.reserved_seats),
                paid_amount: Set(booking.paid_amount),
                created_at: Set(now),
                updated_at: Set(now),
            }
        }))
        .exec_without_returning(conn)
        .await?;
    }

    if !non_member_trips.is_empty() {
        non_member_trip::Entity::insert_many(non_member_trips.iter().map(|booking| {
            non_member_trip::ActiveModel {
                trip_id: Set(trip_id),
                non_member_id: Set(booking.non_member_id),
                reserved_seats: Set(booking.reserved_seats),
                paid_amount: Set(booking.paid_amount),
                created_at: Set(now),
                updated_at: Set(now),
            }
        }))
        .exec_without_returning(conn)
        .await?;
    }

    Ok(())
}

/// Attach trip types and, optionally, bookings to trip rows, keeping their order
async fn hydrate<C: ConnectionTrait>(
    conn: &C,
    trips: Vec<trip::Model>,
    with_bookings: bool,
) -> Result<Vec<TripResponse>> {
    let trip_types: HashMap<String, TripTypeResponse> = trip_type::Entity::find()
        .all(conn)
        .await?
        .into_iter()
        .map(|t| (t.code.clone(), TripTypeResponse::from(t)))
        .collect();

    let ids: Vec<i32> = trips.iter().map(|t| t.id).collect();
    let mut member_bookings: HashMap<i32, Vec<MemberBookingResponse>> = HashMap::new();
    let mut non_member_bookings: HashMap<i32, Vec<NonMemberBookingResponse>> = HashMap::new();

    if with_bookings && !ids.is_empty() {
        let rows = member_trip::Entity::find()
            .filter(member_trip::Column::TripId.is_in(ids.clone()))
            .find_also_related(member::Entity)
            .order_by_asc(member_trip::Column::MemberId)
            .all(conn)
            .await?;
        for (booking, member) in rows {
            let Some(member) = member else { continue };
            member_bookings
                .entry(booking.trip_id)
                .or_default()
                .push(MemberBookingResponse {
                    reserved_seats: booking.reserved_seats,
                    paid_amount: booking.paid_amount,
                    member: BasicInfo {
                        id: member.id,
                        name: member.name,
                    },
                });
        }

        let rows = non_member_trip::Entity::find()
            .filter(non_member_trip::Column::TripId.is_in(ids))
            .find_also_related(non_member::Entity)
            .order_by_asc(non_member_trip::Column::NonMemberId)
            .all(conn)
            .await?;
        for (booking, non_member) in rows {
            let Some(non_member) = non_member else { continue };
            non_member_bookings
                .entry(booking.trip_id)
                .or_default()
                .push(NonMemberBookingResponse {
                    reserved_seats: booking.reserved_seats,
                    paid_amount: booking.paid_amount,
                    non_member: BasicInfo {
                        id: non_member.id,
                        name: non_member.name,
                    },
                });
        }
    }

    Ok(trips
        .into_iter()
        .map(|trip| {
            let trip_type = trip_types
                .get(&trip.trip_type_code)
                .cloned()
                .unwrap_or_else(|| TripTypeResponse {
                    code: trip.trip_type_code.clone(),
                    name: trip.trip_type_code.clone(),
                });
            let id = trip.id;

            let mut response = TripResponse::new(trip, trip_type);
            if with_bookings {
                response.member_trips = Some(member_bookings.remove(&id).unwrap_or_default());
                response.non_member_trips =
                    Some(non_member_bookings.remove(&id).unwrap_or_default());
            }
            response
        })
        .collect())
}
