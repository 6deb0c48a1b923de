//! Portal client: shared transport, session and service wrappers.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::info;

use capstone_domain::Role;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::http::HttpTransport;
use crate::services::{
    AuthService, CampusService, ChecklistService, InvitationService, SemesterService,
    TeamService, ThesisService, UserService, WhitelistService,
};
use crate::session::{Session, SessionStore};
use crate::transport::Transport;

/// Entry point for everything that talks to the backend.
pub struct PortalClient {
    transport: Arc<dyn Transport>,
    store: SessionStore,
    session: RwLock<Option<Session>>,
    auth: AuthService,
    campuses: CampusService,
    semesters: SemesterService,
    teams: TeamService,
    invitations: InvitationService,
    theses: ThesisService,
    checklists: ChecklistService,
    users: UserService,
    whitelists: WhitelistService,
}

impl PortalClient {
    pub fn new(transport: Arc<dyn Transport>, store: SessionStore) -> Self {
        Self {
            auth: AuthService::new(transport.clone()),
            campuses: CampusService::new(transport.clone()),
            semesters: SemesterService::new(transport.clone()),
            teams: TeamService::new(transport.clone()),
            invitations: InvitationService::new(transport.clone()),
            theses: ThesisService::new(transport.clone()),
            checklists: ChecklistService::new(transport.clone()),
            users: UserService::new(transport.clone()),
            whitelists: WhitelistService::new(transport.clone()),
            transport,
            store,
            session: RwLock::new(None),
        }
    }

    /// Build a client over HTTP using `config`.
    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        let transport = Arc::new(HttpTransport::new(config)?);
        Ok(Self::new(transport, SessionStore::new(&config.session_dir)))
    }

    /// Load the stored session, if it is still valid.
    pub fn restore_session(&self) -> ApiResult<Option<Session>> {
        let session = self.store.init()?;
        self.install(session.clone());
        Ok(session)
    }

    pub async fn login(&self, id_token: &str, campus_id: i64) -> ApiResult<Session> {
        let response = self.auth.login(id_token, campus_id).await?;
        let session = self.store.save(&response.token, Some(&response.user))?;
        self.install(Some(session.clone()));
        Ok(session)
    }

    pub fn logout(&self) -> ApiResult<()> {
        self.store.logout()?;
        self.install(None);
        info!("Signed out");
        Ok(())
    }

    fn install(&self, session: Option<Session>) {
        self.transport
            .set_token(session.as_ref().map(|s| s.token.clone()));
        *self.session.write() = session;
    }

    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    /// Current session, rejecting missing or expired ones.
    pub fn require_session(&self) -> ApiResult<Session> {
        let session = self.session().ok_or(ApiError::NotAuthenticated)?;
        if session.is_expired_at(Utc::now()) {
            return Err(ApiError::SessionExpired);
        }
        Ok(session)
    }

    /// Current session, additionally requiring one of `roles`.
    pub fn require_role(&self, roles: &[Role]) -> ApiResult<Session> {
        let session = self.require_session()?;
        if !session.has_any_role(roles) {
            let names: Vec<_> = roles.iter().map(Role::as_str).collect();
            return Err(ApiError::Forbidden(format!(
                "This action requires one of: {}",
                names.join(", ")
            )));
        }
        Ok(session)
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn campuses(&self) -> &CampusService {
        &self.campuses
    }

    pub fn semesters(&self) -> &SemesterService {
        &self.semesters
    }

    pub fn teams(&self) -> &TeamService {
        &self.teams
    }

    pub fn invitations(&self) -> &InvitationService {
        &self.invitations
    }

    pub fn theses(&self) -> &ThesisService {
        &self.theses
    }

    pub fn checklists(&self) -> &ChecklistService {
        &self.checklists
    }

    pub fn users(&self) -> &UserService {
        &self.users
    }

    pub fn whitelists(&self) -> &WhitelistService {
        &self.whitelists
    }
}
