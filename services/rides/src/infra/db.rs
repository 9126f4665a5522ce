use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};

use aeroride_domain::geo::Coordinates;
use aeroride_domain::id::{RideId, UserId};
use aeroride_domain::pagination::PageRequest;
use aeroride_domain::ride::RideStatus;
use aeroride_domain::vehicle::VehicleClass;
use aeroride_rides_schema::rides;

use crate::domain::repository::RideRepository;
use crate::domain::types::{FareQuote, Place, Ride, RouteSource, StatusChange};
use crate::error::RidesServiceError;

#[derive(Clone)]
pub struct DbRideRepository {
    pub db: DatabaseConnection,
}

impl RideRepository for DbRideRepository {
    async fn create(&self, ride: &Ride) -> Result<(), RidesServiceError> {
        rides::ActiveModel {
            id: Set(ride.id.0),
            passenger_id: Set(ride.passenger_id.0),
            driver_id: Set(ride.driver_id.map(|d| d.0)),
            airport_id: Set(ride.airport_id.clone()),
            pickup_location: Set(ride.pickup.label.clone()),
            pickup_latitude: Set(ride.pickup.coordinates.latitude),
            pickup_longitude: Set(ride.pickup.coordinates.longitude),
            destination_location: Set(ride.destination.label.clone()),
            destination_latitude: Set(ride.destination.coordinates.latitude),
            destination_longitude: Set(ride.destination.coordinates.longitude),
            distance_km: Set(ride.quote.distance_km),
            estimated_duration: Set(ride.quote.estimated_duration as i32),
            fare_amount: Set(ride.quote.fare_amount),
            currency: Set(ride.quote.currency.clone()),
            route_source: Set(ride.quote.route_source.as_str().to_owned()),
            vehicle_type: Set(ride.quote.vehicle_type.as_str().to_owned()),
            passenger_count: Set(ride.passenger_count),
            special_requests: Set(ride.special_requests.clone()),
            qr_code: Set(ride.qr_code.clone()),
            scheduled_time: Set(ride.scheduled_time),
            status: Set(ride.status.as_str().to_owned()),
            created_at: Set(ride.created_at),
            updated_at: Set(ride.updated_at),
        }
        .insert(&self.db)
        .await
        .context("insert ride")?;
        Ok(())
    }

    async fn find_by_id(&self, id: RideId) -> Result<Option<Ride>, RidesServiceError> {
        let model = rides::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find ride by id")?;
        model.map(ride_from_model).transpose()
    }

    async fn find_by_qr_code(&self, qr_code: &str) -> Result<Option<Ride>, RidesServiceError> {
        let model = rides::Entity::find()
            .filter(rides::Column::QrCode.eq(qr_code))
            .one(&self.db)
            .await
            .context("find ride by qr code")?;
        model.map(ride_from_model).transpose()
    }

    async fn list_for_user(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<Ride>, RidesServiceError> {
        let page = page.clamped();
        let models = rides::Entity::find()
            .filter(
                Condition::any()
                    .add(rides::Column::PassengerId.eq(user.0))
                    .add(rides::Column::DriverId.eq(user.0)),
            )
            .order_by_desc(rides::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.per_page)
            .all(&self.db)
            .await
            .context("list rides for user")?;
        models.into_iter().map(ride_from_model).collect()
    }

    async fn update_status(&self, change: &StatusChange) -> Result<bool, RidesServiceError> {
        let mut update = rides::Entity::update_many()
            .col_expr(rides::Column::Status, Expr::value(change.next.as_str()))
            .col_expr(rides::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(rides::Column::Id.eq(change.ride_id.0))
            .filter(rides::Column::Status.eq(change.expected.as_str()));
        if let Some(driver) = change.assign_driver {
            update = update
                .col_expr(rides::Column::DriverId, Expr::value(driver.0))
                .filter(rides::Column::DriverId.is_null());
        }
        let result = update.exec(&self.db).await.context("update ride status")?;
        Ok(result.rows_affected == 1)
    }

    async fn delete_deletable(
        &self,
        id: RideId,
        passenger: UserId,
    ) -> Result<bool, RidesServiceError> {
        let result = rides::Entity::delete_many()
            .filter(rides::Column::Id.eq(id.0))
            .filter(rides::Column::PassengerId.eq(passenger.0))
            .filter(rides::Column::Status.is_in([
                RideStatus::Pending.as_str(),
                RideStatus::Cancelled.as_str(),
            ]))
            .exec(&self.db)
            .await
            .context("delete ride")?;
        Ok(result.rows_affected == 1)
    }
}

fn ride_from_model(model: rides::Model) -> Result<Ride, RidesServiceError> {
    let status: RideStatus = model
        .status
        .parse()
        .with_context(|| format!("ride {} has unknown status", model.id))?;
    let route_source = RouteSource::from_name(&model.route_source)
        .with_context(|| format!("ride {} has unknown route source", model.id))?;
    Ok(Ride {
        id: RideId(model.id),
        passenger_id: UserId(model.passenger_id),
        driver_id: model.driver_id.map(UserId),
        airport_id: model.airport_id,
        pickup: Place {
            label: model.pickup_location,
            coordinates: Coordinates::new(model.pickup_latitude, model.pickup_longitude),
        },
        destination: Place {
            label: model.destination_location,
            coordinates: Coordinates::new(
                model.destination_latitude,
                model.destination_longitude,
            ),
        },
        quote: FareQuote {
            distance_km: model.distance_km,
            estimated_duration: model.estimated_duration.max(0) as u32,
            fare_amount: model.fare_amount,
            currency: model.currency,
            vehicle_type: VehicleClass::from_name_lenient(&model.vehicle_type),
            route_source,
        },
        passenger_count: model.passenger_count,
        special_requests: model.special_requests,
        qr_code: model.qr_code,
        scheduled_time: model.scheduled_time,
        status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

/// Connectivity probe for `/readyz`.
pub async fn ping(db: &DatabaseConnection) -> Result<(), sea_orm::DbErr> {
    db.ping().await
}
