use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const TRIP_TYPES: [(&str, &str); 2] = [
    ("ASSOCIATION", "Associação"),
    ("CITY_COUNCIL", "Câmara Municipal"),
];

const ROLES: [(&str, &str, &str); 4] = [
    ("MANAGER", "Gestor", "Gestor de passeios"),
    ("ADMINISTRATOR", "Administrador", "Administrador do sistema."),
    ("DESIGNER", "Designer", "Designer dos cartazes dos passeios"),
    ("READ_ONLY", "Consulta", "Acesso apenas de leitura"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut trip_types = Query::insert();
        trip_types
            .into_table(TripTypes::Table)
            .columns([TripTypes::Code, TripTypes::Name])
            .on_conflict(OnConflict::column(TripTypes::Code).do_nothing().to_owned());
        for (code, name) in TRIP_TYPES {
            trip_types.values_panic([code.into(), name.into()]);
        }
        manager.exec_stmt(trip_types).await?;

        let mut roles = Query::insert();
        roles
            .into_table(Roles::Table)
            .columns([Roles::Code, Roles::Name, Roles::Description])
            .on_conflict(OnConflict::column(Roles::Code).do_nothing().to_owned());
        for (code, name, description) in ROLES {
            roles.values_panic([code.into(), name.into(), description.into()]);
        }
        manager.exec_stmt(roles).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Roles::Table)
                    .and_where(Expr::col(Roles::Code).is_in(ROLES.map(|(code, _, _)| code)))
                    .to_owned(),
            )
            .await?;

        manager
            .exec_stmt(
                Query::delete()
                    .from_table(TripTypes::Table)
                    .and_where(Expr::col(TripTypes::Code).is_in(TRIP_TYPES.map(|(code, _)| code)))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum TripTypes {
    Table,
    Code,
    Name,
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Code,
    Name,
    Description,
}
