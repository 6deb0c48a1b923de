//! Integration tests for the service wrappers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tempfile::tempdir;

use capstone_api::{
    ApiError, ApiRequest, ApiResponse, ApiResult, Method, MockTransport, PortalClient,
    RequestBody, SemesterService, SessionStore, TeamService, ThesisService, Transport,
};
use capstone_domain::{Role, SemesterDraft, ThesisProposal, Upload};

fn session_token(roles: &[&str], user_id: i64) -> String {
    encode(
        &Header::default(),
        &json!({
            "http://schemas.microsoft.com/ws/2008/06/identity/claims/role": roles,
            "nameid": user_id.to_string(),
            "exp": (Utc::now() + Duration::hours(2)).timestamp(),
        }),
        &EncodingKey::from_secret(b"server-secret"),
    )
    .unwrap()
}

/// Minimal in-memory semester backend.
#[derive(Default)]
struct FakeSemesterBackend {
    next_id: Mutex<i64>,
    semesters: Mutex<HashMap<i64, Value>>,
}

#[async_trait]
impl Transport for FakeSemesterBackend {
    async fn execute(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        match (request.method, request.path.as_str()) {
            (Method::Post, "/semester") => {
                let mut body = request.json_body().cloned().unwrap_or(Value::Null);
                let id = {
                    let mut next = self.next_id.lock();
                    *next += 1;
                    *next
                };
                body["semesterId"] = json!(id);
                body["isArchived"] = json!(false);
                self.semesters.lock().insert(id, body.clone());
                Ok(ApiResponse::new(201, body))
            }
            (Method::Get, path) => {
                let id: Option<i64> = path
                    .strip_prefix("/semester/")
                    .and_then(|raw| raw.parse().ok());
                match id.and_then(|id| self.semesters.lock().get(&id).cloned()) {
                    Some(body) => Ok(ApiResponse::ok(body)),
                    None => Ok(ApiResponse::new(404, json!({"message": "Semester not found"}))),
                }
            }
            _ => Ok(ApiResponse::new(405, Value::Null)),
        }
    }

    fn set_token(&self, _token: Option<String>) {}
}

#[tokio::test]
async fn test_semester_create_then_fetch_round_trip() {
    let backend = Arc::new(FakeSemesterBackend::default());
    let service = SemesterService::new(backend);

    let draft = SemesterDraft {
        semester_code: "FA24".into(),
        semester_name: "Fall 2024".into(),
        start_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        is_active: false,
    };

    let created = service.create(&draft).await.unwrap();
    let fetched = service.get(created.semester_id).await.unwrap();

    assert_eq!(fetched.semester_id, created.semester_id);
    assert_eq!(fetched.semester_code, "FA24");
    assert_eq!(fetched.semester_name, "Fall 2024");
    assert_eq!(fetched.start_date, draft.start_date);
    assert_eq!(fetched.end_date, Some(draft.end_date));
    assert!(!fetched.is_active);
}

#[tokio::test]
async fn test_login_persists_and_attaches_token() {
    let temp = tempdir().unwrap();
    let token = session_token(&["Student"], 21);

    let mock = MockTransport::new()
        .on_json(
            Method::Post,
            "/Auth/login",
            json!({
                "token": token,
                "user": {
                    "userId": 21,
                    "email": "lan@uni.edu",
                    "fullName": "Lan Pham",
                    "roles": ["Student"]
                }
            }),
        )
        .on_json(Method::Get, "/semester", json!([]));

    let client = PortalClient::new(Arc::new(mock.clone()), SessionStore::new(temp.path()));
    let session = client.login("google-id-token", 2).await.unwrap();

    assert_eq!(session.user_id(), Some(21));
    assert!(session.has_role(Role::Student));

    let login_call = &mock.calls_to(Method::Post, "/Auth/login")[0];
    assert_eq!(
        login_call.request.json_body(),
        Some(&json!({"idToken": "google-id-token", "campusId": 2}))
    );

    client.semesters().list().await.unwrap();
    let list_call = &mock.calls_to(Method::Get, "/semester")[0];
    assert_eq!(list_call.token.as_deref(), Some(token.as_str()));

    // A fresh client over the same directory picks the session back up.
    let restored = PortalClient::new(Arc::new(MockTransport::new()), SessionStore::new(temp.path()));
    assert!(restored.restore_session().unwrap().is_some());

    client.logout().unwrap();
    assert!(client.session().is_none());
    assert!(mock.current_token().is_none());
    assert!(matches!(client.require_session(), Err(ApiError::NotAuthenticated)));
}

#[tokio::test]
async fn test_require_role() {
    let temp = tempdir().unwrap();
    let store = SessionStore::new(temp.path());
    store.save(&session_token(&["Student"], 4), None).unwrap();

    let client = PortalClient::new(Arc::new(MockTransport::new()), store);
    client.restore_session().unwrap();

    assert!(client.require_role(&[Role::Student]).is_ok());
    assert!(matches!(
        client.require_role(&[Role::Admin, Role::Moderator]),
        Err(ApiError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_missing_team_is_none() {
    let mock = MockTransport::new().on_error(Method::Get, "/team/my-team", 404, "You have no team");
    let service = TeamService::new(Arc::new(mock));
    assert!(service.my_team().await.unwrap().is_none());
}

#[tokio::test]
async fn test_backend_message_surfaces() {
    let mock = MockTransport::new().on_error(Method::Post, "/team/3/leave", 400, "Team is locked");
    let service = TeamService::new(Arc::new(mock));

    let err = service.leave(3).await.unwrap_err();
    assert_eq!(err.user_message(), "Team is locked");
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_propose_sends_multipart() {
    let mock = MockTransport::new().on_json(
        Method::Post,
        "/thesis/propose",
        json!({
            "thesisId": 5,
            "title": "Edge caching",
            "status": "Registered",
            "histories": [{"versionNumber": 1}]
        }),
    );
    let service = ThesisService::new(Arc::new(mock.clone()));

    let proposal = ThesisProposal {
        title: "Edge caching".into(),
        short_description: "CDN eviction policies".into(),
        team_id: Some(8),
    };
    let thesis = service
        .propose(&proposal, Upload::new("proposal.pdf", b"%PDF-1.7".to_vec()))
        .await
        .unwrap();
    assert_eq!(thesis.current_version_number(), Some(1));

    let call = &mock.calls_to(Method::Post, "/thesis/propose")[0];
    let RequestBody::Multipart(form) = &call.request.body else {
        panic!("expected multipart body");
    };
    assert_eq!(form.field("title"), Some("Edge caching"));
    assert_eq!(form.field("teamId"), Some("8"));
    assert_eq!(form.files[0].1.content_type, "application/pdf");
}
