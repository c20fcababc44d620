use crate::{
    error::{ApiError, Result},
    models::{
        common::{BasicInfo, PageRequest},
        non_member::{
            CreateNonMemberRequest, NonMemberList, NonMemberResponse, UpdateNonMemberRequest,
        },
    },
    services::{contacts, contains_insensitive},
};
use entity::{contact, non_member, non_member_trip};
use sea_orm::{entity::*, query::*, DatabaseConnection, PaginatorTrait, TransactionTrait};
use time::OffsetDateTime;
use tracing::{debug, info, instrument};

pub struct NonMemberService {
    db: DatabaseConnection,
}

impl NonMemberService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, text: Option<&str>, page: PageRequest) -> Result<NonMemberList> {
        let mut query = non_member::Entity::find();
        if let Some(text) = text {
            query = query.filter(contains_insensitive(
                non_member::Entity,
                non_member::Column::Name,
                text,
            ));
        }

        let total_count = query.clone().count(&self.db).await?;

        let non_members = query
            .find_also_related(contact::Entity)
            .order_by_asc(non_member::Column::Name)
            .offset(page.skip)
            .limit(page.take)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(non_member, contact)| NonMemberResponse::new(non_member, contact))
            .collect();

        Ok(NonMemberList {
            total_count,
            non_members,
        })
    }

    /// `{id, name}` of every non-member ordered by name
    #[instrument(skip(self))]
    pub async fn basic_info(&self) -> Result<Vec<BasicInfo>> {
        let rows: Vec<(i32, String)> = non_member::Entity::find()
            .select_only()
            .column(non_member::Column::Id)
            .column(non_member::Column::Name)
            .order_by_asc(non_member::Column::Name)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| BasicInfo { id, name })
            .collect())
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateNonMemberRequest) -> Result<NonMemberResponse> {
        let txn = self.db.begin().await?;
        let now = OffsetDateTime::now_utc();

        let contact = contacts::new_contact(&request.contact, now)
            .insert(&txn)
            .await?;

        let non_member = non_member::ActiveModel {
            name: Set(request.name),
            contact_id: Set(contact.id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!("Created non-member {}", non_member.id);

        Ok(NonMemberResponse::new(non_member, Some(contact)))
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i32,
        request: UpdateNonMemberRequest,
    ) -> Result<NonMemberResponse> {
        let txn = self.db.begin().await?;

        let (non_member, contact) = non_member::Entity::find_by_id(id)
            .find_also_related(contact::Entity)
            .one(&txn)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Non-member {} not found", id)))?;

        let now = OffsetDateTime::now_utc();

        let mut active: non_member::ActiveModel = non_member.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        active.updated_at = Set(now);
        let non_member = active.update(&txn).await?;

        let contact = match contact {
            Some(contact) => match contacts::apply_changes(contact.clone(), &request.contact, now) {
                Some(changes) => Some(changes.update(&txn).await?),
                None => Some(contact),
            },
            None => None,
        };

        txn.commit().await?;

        info!("Updated non-member {}", id);

        Ok(NonMemberResponse::new(non_member, contact))
    }

    /// Delete a non-member with its bookings and contact
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;

        let non_member = non_member::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Non-member {} not found", id)))?;

        let bookings = non_member_trip::Entity::delete_many()
            .filter(non_member_trip::Column::NonMemberId.eq(id))
            .exec(&txn)
            .await?;

        non_member::Entity::delete_by_id(id).exec(&txn).await?;
        contact::Entity::delete_by_id(non_member.contact_id)
            .exec(&txn)
            .await?;

        txn.commit().await?;

        debug!("Deleted {} non-member trip records", bookings.rows_affected);
        info!("Deleted non-member {}", id);

        Ok(())
    }
}
