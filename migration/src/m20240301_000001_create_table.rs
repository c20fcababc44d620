use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create contacts table (FIRST - members and non_members reference this)
        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .if_not_exists()
                    .col(pk_auto(Contacts::Id))
                    .col(string_len(Contacts::Address, 255).not_null())
                    .col(string_len_null(Contacts::Number, 9))
                    .col(string_len_null(Contacts::LandlineNumber, 9))
                    .col(string_len_null(Contacts::Email, 255))
                    .col(
                        timestamp_with_time_zone(Contacts::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Contacts::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create members table (ids are assigned by the application)
        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(integer(Members::Id).primary_key())
                    .col(string_len(Members::Name, 255).not_null())
                    .col(integer(Members::ContactId).not_null().unique_key())
                    .col(
                        timestamp_with_time_zone(Members::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Members::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_members_contact_id")
                            .from(Members::Table, Members::ContactId)
                            .to(Contacts::Table, Contacts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_members_name")
                    .table(Members::Table)
                    .col(Members::Name)
                    .to_owned(),
            )
            .await?;

        // Create non_members table
        manager
            .create_table(
                Table::create()
                    .table(NonMembers::Table)
                    .if_not_exists()
                    .col(pk_auto(NonMembers::Id))
                    .col(string_len(NonMembers::Name, 255).not_null())
                    .col(integer(NonMembers::ContactId).not_null().unique_key())
                    .col(
                        timestamp_with_time_zone(NonMembers::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(NonMembers::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_non_members_contact_id")
                            .from(NonMembers::Table, NonMembers::ContactId)
                            .to(Contacts::Table, Contacts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create trip_types table
        manager
            .create_table(
                Table::create()
                    .table(TripTypes::Table)
                    .if_not_exists()
                    .col(string_len(TripTypes::Code, 255).primary_key())
                    .col(string_len(TripTypes::Name, 255).not_null())
                    .col(
                        timestamp_with_time_zone(TripTypes::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(TripTypes::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create trips table
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(pk_auto(Trips::Id))
                    .col(string_len(Trips::Name, 255).not_null())
                    .col(string_len(Trips::TripTypeCode, 255).not_null())
                    .col(string_len_null(Trips::TripPosterFileName, 255))
                    .col(string_len(Trips::Destination, 255).not_null())
                    .col(string_len_null(Trips::Description, 255))
                    .col(integer(Trips::TotalSeats).not_null())
                    .col(timestamp_with_time_zone(Trips::Date).not_null())
                    .col(
                        timestamp_with_time_zone(Trips::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Trips::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trips_trip_type_code")
                            .from(Trips::Table, Trips::TripTypeCode)
                            .to(TripTypes::Table, TripTypes::Code)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trips_date")
                    .table(Trips::Table)
                    .col(Trips::Date)
                    .to_owned(),
            )
            .await?;

        // Create member_trips table (one booking line per member and trip)
        manager
            .create_table(
                Table::create()
                    .table(MemberTrips::Table)
                    .if_not_exists()
                    .col(integer(MemberTrips::TripId).not_null())
                    .col(integer(MemberTrips::MemberId).not_null())
                    .col(integer(MemberTrips::ReservedSeats).not_null())
                    .col(decimal_len(MemberTrips::PaidAmount, 10, 2).not_null())
                    .col(
                        timestamp_with_time_zone(MemberTrips::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(MemberTrips::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(MemberTrips::TripId)
                            .col(MemberTrips::MemberId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_member_trips_trip_id")
                            .from(MemberTrips::Table, MemberTrips::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_member_trips_member_id")
                            .from(MemberTrips::Table, MemberTrips::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create non_member_trips table
        manager
            .create_table(
                Table::create()
                    .table(NonMemberTrips::Table)
                    .if_not_exists()
                    .col(integer(NonMemberTrips::TripId).not_null())
                    .col(integer(NonMemberTrips::NonMemberId).not_null())
                    .col(integer(NonMemberTrips::ReservedSeats).not_null())
                    .col(decimal_len(NonMemberTrips::PaidAmount, 10, 2).not_null())
                    .col(
                        timestamp_with_time_zone(NonMemberTrips::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(NonMemberTrips::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(NonMemberTrips::TripId)
                            .col(NonMemberTrips::NonMemberId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_non_member_trips_trip_id")
                            .from(NonMemberTrips::Table, NonMemberTrips::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_non_member_trips_non_member_id")
                            .from(NonMemberTrips::Table, NonMemberTrips::NonMemberId)
                            .to(NonMembers::Table, NonMembers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create fees table
        manager
            .create_table(
                Table::create()
                    .table(Fees::Table)
                    .if_not_exists()
                    .col(pk_auto(Fees::Id))
                    .col(integer(Fees::Year).not_null())
                    .col(decimal_len(Fees::PaidAmount, 10, 2).not_null())
                    .col(integer(Fees::MemberId).not_null())
                    .col(
                        timestamp_with_time_zone(Fees::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Fees::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fees_member_id")
                            .from(Fees::Table, Fees::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One fee per member and year
        manager
            .create_index(
                Index::create()
                    .name("idx_fees_member_year")
                    .table(Fees::Table)
                    .col(Fees::MemberId)
                    .col(Fees::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create roles table
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(string_len(Roles::Code, 255).primary_key())
                    .col(string_len(Roles::Name, 255).not_null())
                    .col(string_len_null(Roles::Description, 255))
                    .to_owned(),
            )
            .await?;

        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_len(Users::Email, 100).not_null().unique_key())
                    .col(string_len(Users::Name, 100).not_null())
                    .col(string_len(Users::Password, 255).not_null())
                    .col(string_len(Users::RoleCode, 255).not_null())
                    .col(
                        timestamp_with_time_zone(Users::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Users::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_role_code")
                            .from(Users::Table, Users::RoleCode)
                            .to(Roles::Table, Roles::Code)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Fees::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(NonMemberTrips::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(MemberTrips::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Trips::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TripTypes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(NonMembers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Contacts::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Contacts {
    Table,
    Id,
    Address,
    Number,
    LandlineNumber,
    Email,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Members {
    Table,
    Id,
    Name,
    ContactId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum NonMembers {
    Table,
    Id,
    Name,
    ContactId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TripTypes {
    Table,
    Code,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Trips {
    Table,
    Id,
    Name,
    TripTypeCode,
    TripPosterFileName,
    Destination,
    Description,
    TotalSeats,
    Date,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MemberTrips {
    Table,
    TripId,
    MemberId,
    ReservedSeats,
    PaidAmount,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum NonMemberTrips {
    Table,
    TripId,
    NonMemberId,
    ReservedSeats,
    PaidAmount,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Fees {
    Table,
    Id,
    Year,
    PaidAmount,
    MemberId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Code,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Name,
    Password,
    RoleCode,
    CreatedAt,
    UpdatedAt,
}
