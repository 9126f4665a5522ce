use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rides::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rides::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Rides::PassengerId).uuid().not_null())
                    .col(ColumnDef::new(Rides::DriverId).uuid().null())
                    .col(ColumnDef::new(Rides::AirportId).string().not_null())
                    .col(ColumnDef::new(Rides::PickupLocation).string().not_null())
                    .col(ColumnDef::new(Rides::PickupLatitude).double().not_null())
                    .col(ColumnDef::new(Rides::PickupLongitude).double().not_null())
                    .col(
                        ColumnDef::new(Rides::DestinationLocation)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rides::DestinationLatitude)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rides::DestinationLongitude)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Rides::DistanceKm).double().not_null())
                    .col(
                        ColumnDef::new(Rides::EstimatedDuration)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Rides::FareAmount).double().not_null())
                    .col(ColumnDef::new(Rides::Currency).string_len(3).not_null())
                    .col(ColumnDef::new(Rides::RouteSource).string().not_null())
                    .col(ColumnDef::new(Rides::VehicleType).string().not_null())
                    .col(
                        ColumnDef::new(Rides::PassengerCount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Rides::SpecialRequests).text().null())
                    .col(
                        ColumnDef::new(Rides::QrCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Rides::ScheduledTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Rides::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Rides::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rides::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing filters on either party, newest first.
        manager
            .create_index(
                Index::create()
                    .table(Rides::Table)
                    .col(Rides::PassengerId)
                    .col(Rides::CreatedAt)
                    .name("idx_rides_passenger_created")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Rides::Table)
                    .col(Rides::DriverId)
                    .col(Rides::CreatedAt)
                    .name("idx_rides_driver_created")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rides::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Rides {
    Table,
    Id,
    PassengerId,
    DriverId,
    AirportId,
    PickupLocation,
    PickupLatitude,
    PickupLongitude,
    DestinationLocation,
    DestinationLatitude,
    DestinationLongitude,
    DistanceKm,
    EstimatedDuration,
    FareAmount,
    Currency,
    RouteSource,
    VehicleType,
    PassengerCount,
    SpecialRequests,
    QrCode,
    ScheduledTime,
    Status,
    CreatedAt,
    UpdatedAt,
}
