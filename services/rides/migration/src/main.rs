use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(aeroride_rides_migration::Migrator).await;
}
