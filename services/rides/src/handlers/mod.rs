pub mod estimate;
pub mod ride;
pub mod ticket;

use aeroride_auth_types::identity::SessionIdentity;
use aeroride_core::error::AppError;

use crate::domain::types::Actor;
use crate::error::RidesServiceError;

/// Rejections from the session extractor answered in the rides envelope.
pub(crate) fn actor(identity: Result<SessionIdentity, AppError>) -> Result<Actor, RidesServiceError> {
    let identity = identity.map_err(|_| RidesServiceError::Unauthorized)?;
    Ok(Actor {
        user_id: identity.user_id,
        role: identity.role,
    })
}
