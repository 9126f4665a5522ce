use sea_orm::entity::prelude::*;

/// Booked airport ride. `status` and `vehicle_type` hold snake_case names.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rides")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub passenger_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub airport_id: String,
    pub pickup_location: String,
    pub pickup_latitude: f64,
    pub pickup_longitude: f64,
    pub destination_location: String,
    pub destination_latitude: f64,
    pub destination_longitude: f64,
    pub distance_km: f64,
    pub estimated_duration: i32,
    pub fare_amount: f64,
    pub currency: String,
    pub route_source: String,
    pub vehicle_type: String,
    pub passenger_count: i32,
    pub special_requests: Option<String>,
    #[sea_orm(unique)]
    pub qr_code: String,
    pub scheduled_time: Option<chrono::DateTime<chrono::Utc>>,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
