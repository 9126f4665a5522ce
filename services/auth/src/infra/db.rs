use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use aeroride_auth_schema::{airline_profiles, driver_profiles, garage_profiles, otps, profiles, users};
use aeroride_domain::id::{OtpId, UserId};
use aeroride_domain::user::UserRole;

use crate::domain::repository::{IdentityRepository, OtpRepository};
use crate::domain::types::{AuthUser, NewIdentity, OneTimeCode, RoleProfile};
use crate::error::AuthServiceError;

// ── OTP repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpRepository {
    pub db: DatabaseConnection,
}

impl OtpRepository for DbOtpRepository {
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthServiceError> {
        let result = otps::Entity::delete_many()
            .filter(otps::Column::ExpiresAt.lt(now))
            .exec(&self.db)
            .await
            .context("purge expired otps")?;
        Ok(result.rows_affected)
    }

    async fn create(&self, otp: &OneTimeCode) -> Result<(), AuthServiceError> {
        otps::ActiveModel {
            id: Set(otp.id.0),
            email: Set(otp.email.clone()),
            code: Set(otp.code.clone()),
            expires_at: Set(otp.expires_at),
            is_used: Set(otp.is_used),
            attempts: Set(otp.attempts),
            created_at: Set(otp.created_at),
        }
        .insert(&self.db)
        .await
        .context("insert otp")?;
        Ok(())
    }

    async fn delete(&self, id: OtpId) -> Result<(), AuthServiceError> {
        otps::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete otp")?;
        Ok(())
    }

    async fn find_latest_valid(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OneTimeCode>, AuthServiceError> {
        let model = otps::Entity::find()
            .filter(otps::Column::Email.eq(email))
            .filter(otps::Column::Code.eq(code))
            .filter(otps::Column::IsUsed.eq(false))
            .filter(otps::Column::ExpiresAt.gte(now))
            .order_by_desc(otps::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find latest valid otp")?;
        Ok(model.map(otp_from_model))
    }

    async fn consume(&self, id: OtpId) -> Result<bool, AuthServiceError> {
        let result = otps::Entity::update_many()
            .col_expr(otps::Column::IsUsed, Expr::value(true))
            .filter(otps::Column::Id.eq(id.0))
            .filter(otps::Column::IsUsed.eq(false))
            .exec(&self.db)
            .await
            .context("consume otp")?;
        Ok(result.rows_affected == 1)
    }
}

fn otp_from_model(model: otps::Model) -> OneTimeCode {
    OneTimeCode {
        id: OtpId(model.id),
        email: model.email,
        code: model.code,
        created_at: model.created_at,
        expires_at: model.expires_at,
        is_used: model.is_used,
        attempts: model.attempts,
    }
}

// ── Identity repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIdentityRepository {
    pub db: DatabaseConnection,
}

impl IdentityRepository for DbIdentityRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthServiceError> {
        let model = profiles::Entity::find()
            .filter(profiles::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find profile by email")?;
        model.map(user_from_profile).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<AuthUser>, AuthServiceError> {
        let model = profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(id.0))
            .one(&self.db)
            .await
            .context("find profile by user id")?;
        model.map(user_from_profile).transpose()
    }

    async fn create(&self, identity: &NewIdentity) -> Result<AuthUser, AuthServiceError> {
        let user_id = UserId::generate();
        let now = Utc::now();
        let identity = identity.clone();
        let email = identity.email.clone();
        let role = identity.role;

        self.db
            .transaction::<_, (), sea_orm::DbErr>(move |txn| {
                Box::pin(async move {
                    users::ActiveModel {
                        id: Set(user_id.0),
                        email: Set(identity.email.clone()),
                        created_at: Set(now),
                    }
                    .insert(txn)
                    .await?;

                    profiles::ActiveModel {
                        id: Set(Uuid::now_v7()),
                        user_id: Set(user_id.0),
                        email: Set(identity.email),
                        full_name: Set(identity.full_name),
                        role: Set(identity.role.as_str().to_owned()),
                        is_verified: Set(false),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("create user with profile")?;

        Ok(AuthUser {
            id: user_id,
            email,
            role,
        })
    }

    async fn create_role_profile(
        &self,
        user_id: UserId,
        profile: &RoleProfile,
    ) -> Result<(), AuthServiceError> {
        let now = Utc::now();
        match profile.clone() {
            RoleProfile::Driver {
                experience_years,
                background_check_status,
            } => {
                driver_profiles::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    user_id: Set(user_id.0),
                    experience_years: Set(experience_years),
                    background_check_status: Set(background_check_status),
                    created_at: Set(now),
                }
                .insert(&self.db)
                .await
                .context("insert driver profile")?;
            }
            RoleProfile::Garage {
                business_name,
                contact_email,
                capacity,
            } => {
                garage_profiles::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    user_id: Set(user_id.0),
                    business_name: Set(business_name),
                    contact_email: Set(contact_email),
                    capacity: Set(capacity),
                    created_at: Set(now),
                }
                .insert(&self.db)
                .await
                .context("insert garage profile")?;
            }
            RoleProfile::Airline {
                airline_name,
                contact_person,
                email_address,
                partnership_type,
                commission_rate,
            } => {
                airline_profiles::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    user_id: Set(user_id.0),
                    airline_name: Set(airline_name),
                    contact_person: Set(contact_person),
                    email_address: Set(email_address),
                    partnership_type: Set(partnership_type),
                    commission_rate: Set(commission_rate),
                    created_at: Set(now),
                }
                .insert(&self.db)
                .await
                .context("insert airline profile")?;
            }
        }
        Ok(())
    }
}

fn user_from_profile(model: profiles::Model) -> Result<AuthUser, AuthServiceError> {
    let role: UserRole = model
        .role
        .parse()
        .with_context(|| format!("profile {} has unknown role", model.id))?;
    Ok(AuthUser {
        id: UserId(model.user_id),
        email: model.email,
        role,
    })
}

/// Connectivity probe for `/readyz`.
pub async fn ping(db: &DatabaseConnection) -> Result<(), sea_orm::DbErr> {
    db.ping().await
}
