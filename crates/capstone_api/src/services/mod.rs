//! Thin wrappers around the backend endpoints, one per area.

use serde::de::DeserializeOwned;

use crate::error::ApiResult;
use crate::transport::{ApiRequest, Transport};

pub mod auth;
pub mod campus;
pub mod checklist;
pub mod invitation;
pub mod semester;
pub mod team;
pub mod thesis;
pub mod user;
pub mod whitelist;

pub use auth::{AuthService, LoginResponse};
pub use campus::CampusService;
pub use checklist::ChecklistService;
pub use invitation::InvitationService;
pub use semester::SemesterService;
pub use team::TeamService;
pub use thesis::ThesisService;
pub use user::UserService;
pub use whitelist::WhitelistService;

/// Execute and decode the body.
pub(crate) async fn fetch<T: DeserializeOwned>(
    transport: &dyn Transport,
    request: ApiRequest,
) -> ApiResult<T> {
    transport.execute(request).await?.decode()
}

/// Execute and decode, mapping 404 to `None`.
pub(crate) async fn fetch_optional<T: DeserializeOwned>(
    transport: &dyn Transport,
    request: ApiRequest,
) -> ApiResult<Option<T>> {
    match fetch(transport, request).await {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Execute and ignore the body.
pub(crate) async fn send(transport: &dyn Transport, request: ApiRequest) -> ApiResult<()> {
    transport.execute(request).await?.into_result().map(|_| ())
}
