use crate::{
    error::{ApiError, Result},
    models::{
        common::{BasicInfo, PageRequest},
        member::{
            CreateMemberRequest, MemberFee, MemberList, MemberResponse, MemberTripSummary,
            MembersByYear, TripSummary, UpdateMemberRequest,
        },
        trip_type::TripTypeResponse,
    },
    services::{contacts, contains_insensitive},
    utils::{date::current_year, is_fee_schedule_compliant},
};
use entity::{contact, fee, member, member_trip, trip, trip_type};
use sea_orm::{
    entity::*, query::*, DatabaseConnection, PaginatorTrait, TransactionTrait,
};
use std::collections::HashMap;
use time::{Date, Month, OffsetDateTime};
use tracing::{debug, info, instrument};

pub struct MemberService {
    db: DatabaseConnection,
}

impl MemberService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Paged member list with fee-schedule status and trip count
    #[instrument(skip(self))]
    pub async fn list(&self, text: Option<&str>, page: PageRequest) -> Result<MemberList> {
        let mut query = member::Entity::find();
        if let Some(text) = text {
            query = query.filter(contains_insensitive(
                member::Entity,
                member::Column::Name,
                text,
            ));
        }

        let total_count = query.clone().count(&self.db).await?;

        let rows = query
            .find_also_related(contact::Entity)
            .order_by_asc(member::Column::Id)
            .offset(page.skip)
            .limit(page.take)
            .all(&self.db)
            .await?;

        let ids: Vec<i32> = rows.iter().map(|(m, _)| m.id).collect();

        let mut paid_years: HashMap<i32, Vec<i32>> = HashMap::new();
        let fees = fee::Entity::find()
            .filter(fee::Column::MemberId.is_in(ids.clone()))
            .all(&self.db)
            .await?;
        for fee in fees {
            paid_years.entry(fee.member_id).or_default().push(fee.year);
        }

        let mut trip_counts: HashMap<i32, u64> = HashMap::new();
        let bookings = member_trip::Entity::find()
            .filter(member_trip::Column::MemberId.is_in(ids))
            .all(&self.db)
            .await?;
        for booking in bookings {
            *trip_counts.entry(booking.member_id).or_default() += 1;
        }

        let members = rows
            .into_iter()
            .map(|(member, contact)| {
                let years = paid_years.get(&member.id).map(Vec::as_slice).unwrap_or(&[]);
                let fees_on_schedule = is_fee_schedule_compliant(years);
                let trip_count = trip_counts.get(&member.id).copied().unwrap_or(0);

                let mut response = MemberResponse::new(member, contact);
                response.fees_on_schedule = Some(fees_on_schedule);
                response.trip_count = Some(trip_count);
                response
            })
            .collect();

        Ok(MemberList {
            total_count,
            members,
        })
    }

    /// Member detail with contact, fees (by year) and booked trips
    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<MemberResponse> {
        let (member, contact) = member::Entity::find_by_id(id)
            .find_also_related(contact::Entity)
            .one(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Member {} not found", id)))?;

        let fees = fee::Entity::find()
            .filter(fee::Column::MemberId.eq(id))
            .order_by_asc(fee::Column::Year)
            .all(&self.db)
            .await?;

        let bookings = member_trip::Entity::find()
            .filter(member_trip::Column::MemberId.eq(id))
            .find_also_related(trip::Entity)
            .all(&self.db)
            .await?;

        let trip_types: HashMap<String, TripTypeResponse> = trip_type::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|t| (t.code.clone(), TripTypeResponse::from(t)))
            .collect();

        let paid_years: Vec<i32> = fees.iter().map(|f| f.year).collect();
        let trip_count = bookings.len() as u64;

        let member_trips = bookings
            .into_iter()
            .filter_map(|(booking, trip)| {
                let trip = trip?;
                let trip_type = trip_types
                    .get(&trip.trip_type_code)
                    .cloned()
                    .unwrap_or_else(|| TripTypeResponse {
                        code: trip.trip_type_code.clone(),
                        name: trip.trip_type_code.clone(),
                    });

                Some(MemberTripSummary {
                    reserved_seats: booking.reserved_seats,
                    paid_amount: booking.paid_amount,
                    trip: TripSummary {
                        id: trip.id,
                        name: trip.name,
                        date: trip.date,
                        trip_type,
                    },
                })
            })
            .collect();

        let mut response = MemberResponse::new(member, contact);
        response.fees_on_schedule = Some(is_fee_schedule_compliant(&paid_years));
        response.trip_count = Some(trip_count);
        response.fees = Some(
            fees.into_iter()
                .map(|f| MemberFee {
                    id: f.id,
                    year: f.year,
                    paid_amount: f.paid_amount,
                })
                .collect(),
        );
        response.member_trips = Some(member_trips);

        Ok(response)
    }

    /// `{id, name}` of every member ordered by id
    #[instrument(skip(self))]
    pub async fn basic_info(&self) -> Result<Vec<BasicInfo>> {
        let rows: Vec<(i32, String)> = member::Entity::find()
            .select_only()
            .column(member::Column::Id)
            .column(member::Column::Name)
            .order_by_asc(member::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| BasicInfo { id, name })
            .collect())
    }

    /// Members created per year over the current year and the two before it
    #[instrument(skip(self))]
    pub async fn new_members_by_year(&self) -> Result<MembersByYear> {
        let year = current_year();
        let from = start_of_year(year - 2)?;
        let to = start_of_year(year + 1)?;

        let created: Vec<OffsetDateTime> = member::Entity::find()
            .select_only()
            .column(member::Column::CreatedAt)
            .filter(member::Column::CreatedAt.gte(from))
            .filter(member::Column::CreatedAt.lt(to))
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut by_year: MembersByYear = (year - 2..=year).map(|y| (y, 0)).collect();
        for created_at in created {
            *by_year.entry(created_at.year()).or_default() += 1;
        }

        Ok(by_year)
    }

    /// Create a member and its contact.
    ///
    /// Without an explicit id the member gets `max(id) + 1`, or 1 for the first member.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateMemberRequest) -> Result<MemberResponse> {
        let txn = self.db.begin().await?;

        let id = match request.id {
            Some(id) => {
                if member::Entity::find_by_id(id).one(&txn).await?.is_some() {
                    return Err(ApiError::Conflict(format!("Member {} already exists", id)));
                }
                id
            }
            None => {
                let max_id: Option<i32> = member::Entity::find()
                    .select_only()
                    .column_as(member::Column::Id.max(), "max_id")
                    .into_tuple()
                    .one(&txn)
                    .await?
                    .flatten();
                max_id.map_or(1, |max| max + 1)
            }
        };

        let now = OffsetDateTime::now_utc();
        let contact = contacts::new_contact(&request.contact, now)
            .insert(&txn)
            .await?;

        let member = member::ActiveModel {
            id: Set(id),
            name: Set(request.name),
            contact_id: Set(contact.id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!("Created member {} with contact {}", member.id, contact.id);

        Ok(MemberResponse::new(member, Some(contact)))
    }

    /// Partial update of the member name and contact fields
    #[instrument(skip(self, request))]
    pub async fn update(&self, id: i32, request: UpdateMemberRequest) -> Result<MemberResponse> {
        let txn = self.db.begin().await?;

        let (member, contact) = member::Entity::find_by_id(id)
            .find_also_related(contact::Entity)
            .one(&txn)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Member {} not found", id)))?;

        let now = OffsetDateTime::now_utc();

        let mut active: member::ActiveModel = member.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        active.updated_at = Set(now);
        let member = active.update(&txn).await?;

        let contact = match contact {
            Some(contact) => match contacts::apply_changes(contact.clone(), &request.contact, now) {
                Some(changes) => Some(changes.update(&txn).await?),
                None => Some(contact),
            },
            None => None,
        };

        txn.commit().await?;

        info!("Updated member {}", id);

        Ok(MemberResponse::new(member, contact))
    }

    /// Delete a member with its bookings, fees and contact
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;

        let member = member::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Member {} not found", id)))?;

        let bookings = member_trip::Entity::delete_many()
            .filter(member_trip::Column::MemberId.eq(id))
            .exec(&txn)
            .await?;

        let fees = fee::Entity::delete_many()
            .filter(fee::Column::MemberId.eq(id))
            .exec(&txn)
            .await?;

        member::Entity::delete_by_id(id).exec(&txn).await?;
        contact::Entity::delete_by_id(member.contact_id)
            .exec(&txn)
            .await?;

        txn.commit().await?;

        debug!(
            "Deleted {} member trip records and {} fee records",
            bookings.rows_affected, fees.rows_affected
        );
        info!("Deleted member {}", id);

        Ok(())
    }
}

fn start_of_year(year: i32) -> Result<OffsetDateTime> {
    Date::from_calendar_date(year, Month::January, 1)
        .map(|date| date.midnight().assume_utc())
        .map_err(|e| ApiError::Internal(e.into()))
}
