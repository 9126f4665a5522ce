use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn user_fk<T: Iden + 'static>(table: T, column: T) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .from(table, column)
        .to(Users::Table, Users::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DriverProfiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DriverProfiles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(DriverProfiles::UserId).uuid().not_null().unique_key())
                    .col(
                        ColumnDef::new(DriverProfiles::ExperienceYears)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DriverProfiles::BackgroundCheckStatus)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(DriverProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(&mut user_fk(DriverProfiles::Table, DriverProfiles::UserId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GarageProfiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GarageProfiles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(GarageProfiles::UserId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(GarageProfiles::BusinessName).string().not_null())
                    .col(ColumnDef::new(GarageProfiles::ContactEmail).string().not_null())
                    .col(
                        ColumnDef::new(GarageProfiles::Capacity)
                            .integer()
                            .not_null()
                            .default(10),
                    )
                    .col(
                        ColumnDef::new(GarageProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(&mut user_fk(GarageProfiles::Table, GarageProfiles::UserId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AirlineProfiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AirlineProfiles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AirlineProfiles::UserId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(AirlineProfiles::AirlineName).string().not_null())
                    .col(ColumnDef::new(AirlineProfiles::ContactPerson).string().not_null())
                    .col(ColumnDef::new(AirlineProfiles::EmailAddress).string().not_null())
                    .col(
                        ColumnDef::new(AirlineProfiles::PartnershipType)
                            .string()
                            .not_null()
                            .default("standard"),
                    )
                    .col(
                        ColumnDef::new(AirlineProfiles::CommissionRate)
                            .double()
                            .not_null()
                            .default(0.05),
                    )
                    .col(
                        ColumnDef::new(AirlineProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(&mut user_fk(AirlineProfiles::Table, AirlineProfiles::UserId))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AirlineProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GarageProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DriverProfiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DriverProfiles {
    Table,
    Id,
    UserId,
    ExperienceYears,
    BackgroundCheckStatus,
    CreatedAt,
}

#[derive(Iden)]
enum GarageProfiles {
    Table,
    Id,
    UserId,
    BusinessName,
    ContactEmail,
    Capacity,
    CreatedAt,
}

#[derive(Iden)]
enum AirlineProfiles {
    Table,
    Id,
    UserId,
    AirlineName,
    ContactPerson,
    EmailAddress,
    PartnershipType,
    CommissionRate,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
