//! Integration tests for the portal workflows against a scripted backend.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tempfile::TempDir;

use capstone_api::{Method, MockTransport, PortalClient, SessionStore};
use capstone_app::{
    AppError, AutoConfirm, ChecklistBoard, InvitationBoard, Notice, SemesterManager,
    StudentSearch, TeamWorkspace, ThesisWorkspace,
};
use capstone_domain::{
    InviteButton, SemesterDraft, Team, Thesis, Upload, UserSummary, LEADER_LEAVE_MESSAGE,
};

fn signed_in(mock: &MockTransport, role: &str, user_id: i64) -> (TempDir, Arc<PortalClient>) {
    let temp = tempfile::tempdir().unwrap();
    let store = SessionStore::new(temp.path());
    let token = encode(
        &Header::default(),
        &json!({
            "role": role,
            "userId": user_id,
            "exp": (Utc::now() + chrono::Duration::hours(1)).timestamp()
        }),
        &EncodingKey::from_secret(b"backend"),
    )
    .unwrap();
    store.save(&token, None).unwrap();

    let client = PortalClient::new(Arc::new(mock.clone()), store);
    client.restore_session().unwrap();
    (temp, Arc::new(client))
}

fn team_json() -> Value {
    json!({
        "teamId": 9,
        "teamCode": "T09",
        "teamName": "Lanterns",
        "leaderId": 1,
        "members": [
            {"userId": 1, "fullName": "Hoa", "role": "Leader"},
            {"userId": 2, "fullName": "Khanh", "role": "Member"}
        ]
    })
}

fn team() -> Team {
    serde_json::from_value(team_json()).unwrap()
}

fn student(user_id: i64) -> UserSummary {
    UserSummary {
        user_id,
        full_name: "Quang Le".into(),
        email: "quang@uni.edu".into(),
        student_code: Some("SE160123".into()),
        has_team: false,
    }
}

#[tokio::test]
async fn test_leader_leave_is_blocked_without_request() {
    let mock = MockTransport::new();
    let (_temp, client) = signed_in(&mock, "Student", 1);
    let workspace = TeamWorkspace::new(client, Arc::new(AutoConfirm(true)));

    let err = workspace.leave(&team()).await.unwrap_err();

    assert!(err.is_client_side());
    assert_eq!(Notice::from(&err).message, LEADER_LEAVE_MESSAGE);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_member_leave_sends_request() {
    let mock = MockTransport::new().on_json(Method::Post, "/team/9/leave", Value::Null);
    let (_temp, client) = signed_in(&mock, "Student", 2);
    let workspace = TeamWorkspace::new(client, Arc::new(AutoConfirm(true)));

    workspace.leave(&team()).await.unwrap();
    assert!(mock.was_called(Method::Post, "/team/9/leave"));
}

#[tokio::test]
async fn test_send_then_cancel_clears_invited_user() {
    let mock = MockTransport::new()
        .on_json(
            Method::Post,
            "/invitation/send",
            json!({"invitationId": 70, "teamId": 9, "invitedBy": 1, "inviteeId": 5, "status": "Pending"}),
        )
        .on_json(Method::Post, "/invitation/70/cancel", Value::Null);
    let (_temp, client) = signed_in(&mock, "Student", 1);
    let mut board = InvitationBoard::new(client);

    let invitation_id = board.invite(&team(), &student(5)).await.unwrap();
    assert_eq!(invitation_id, 70);
    assert_eq!(board.button_for(5), InviteButton::Cancel);

    let sent = &mock.calls_to(Method::Post, "/invitation/send")[0];
    assert_eq!(
        sent.request.json_body(),
        Some(&json!({"teamId": 9, "studentCode": "SE160123"}))
    );

    board.cancel(5).await.unwrap();
    assert!(!board.invited().contains(5));
    assert_eq!(board.button_for(5), InviteButton::Invite);
}

#[tokio::test]
async fn test_failed_cancel_restores_invited_user() {
    let mock = MockTransport::new()
        .on_json(
            Method::Post,
            "/invitation/send",
            json!({"invitationId": 71, "teamId": 9, "invitedBy": 1}),
        )
        .on_error(Method::Post, "/invitation/71/cancel", 500, "Server busy")
        .on_json(Method::Post, "/invitation/71/cancel", Value::Null);
    let (_temp, client) = signed_in(&mock, "Student", 1);
    let mut board = InvitationBoard::new(client);

    board.invite(&team(), &student(6)).await.unwrap();

    let err = board.cancel(6).await.unwrap_err();
    assert_eq!(err.user_message(), "Server busy");
    assert_eq!(board.invited().invitation_for(6), Some(71));

    assert_eq!(board.toggle(&team(), &student(6)).await.unwrap(), InviteButton::Invite);
}

#[tokio::test]
async fn test_non_leader_cannot_invite() {
    let mock = MockTransport::new();
    let (_temp, client) = signed_in(&mock, "Student", 2);
    let mut board = InvitationBoard::new(client);

    let err = board.invite(&team(), &student(5)).await.unwrap_err();
    assert!(matches!(err, AppError::Denied(_)));
    assert!(board.invited().is_empty());
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_accept_refetches_and_decline_removes_locally() {
    let pending = json!([
        {"invitationId": 1, "teamId": 3, "teamName": "Owls", "invitedBy": 10},
        {"invitationId": 2, "teamId": 4, "teamName": "Foxes", "invitedBy": 11}
    ]);
    let mock = MockTransport::new()
        .on_json(Method::Get, "/invitation/my-invitations", pending)
        .on_json(Method::Get, "/invitation/my-invitations", json!([]))
        .on_json(Method::Post, "/invitation/2/decline", Value::Null)
        .on_json(Method::Post, "/invitation/1/accept", Value::Null);
    let (_temp, client) = signed_in(&mock, "Student", 5);
    let mut board = InvitationBoard::new(client);

    assert_eq!(board.refresh().await.unwrap().len(), 2);

    board.decline(2).await.unwrap();
    assert_eq!(board.received().len(), 1);
    assert_eq!(mock.calls_to(Method::Get, "/invitation/my-invitations").len(), 1);

    board.accept(1).await.unwrap();
    assert!(board.received().is_empty());
    assert_eq!(mock.calls_to(Method::Get, "/invitation/my-invitations").len(), 2);
}

#[tokio::test]
async fn test_accepting_unknown_invitation_refreshes_then_refuses() {
    let mock = MockTransport::new()
        .on_json(
            Method::Get,
            "/invitation/my-invitations",
            json!([{"invitationId": 1, "teamId": 3, "teamName": "Owls", "invitedBy": 10}]),
        )
        .on_json(Method::Post, "/invitation/42/accept", Value::Null);
    let (_temp, client) = signed_in(&mock, "Student", 5);
    let mut board = InvitationBoard::new(client);

    let err = board.accept(42).await.unwrap_err();
    assert!(matches!(err, AppError::NotAllowed(ref m) if m.contains("42")));
    assert_eq!(mock.calls_to(Method::Get, "/invitation/my-invitations").len(), 1);
    assert!(!mock.was_called(Method::Post, "/invitation/42/accept"));
    assert_eq!(board.received().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_typing_sends_one_search() {
    let mock = MockTransport::new().on_json(
        Method::Get,
        "/users/search",
        json!([{"userId": 5, "fullName": "Quang Le", "email": "quang@uni.edu", "studentCode": "SE160123"}]),
    );
    let (_temp, client) = signed_in(&mock, "Student", 1);
    let search = StudentSearch::new(client.users().clone());

    for text in ["q", "qu", "qua", "quan", "quang"] {
        search.input(text);
        tokio::time::sleep(Duration::from_millis(120)).await;
    }
    assert_eq!(mock.call_count(), 0);

    tokio::time::sleep(Duration::from_millis(500)).await;
    tokio::task::yield_now().await;

    let calls = mock.calls_to(Method::Get, "/users/search");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].query_value("keyword"), Some("quang"));

    let state = search.state();
    assert_eq!(state.query, "quang");
    assert_eq!(state.results.len(), 1);
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn test_clearing_search_sends_nothing() {
    let mock = MockTransport::new();
    let (_temp, client) = signed_in(&mock, "Student", 1);
    let search = StudentSearch::new(client.users().clone());

    search.input("an");
    search.input("   ");
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(mock.call_count(), 0);
    assert!(search.state().results.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_search_recovers_after_network_failure() {
    let mock = MockTransport::new()
        .on_json(
            Method::Get,
            "/users/search",
            json!([{"userId": 6, "fullName": "Linh Vo", "email": "linh@uni.edu"}]),
        )
        .simulate_failure("connection reset");
    let (_temp, client) = signed_in(&mock, "Student", 1);
    let search = StudentSearch::new(client.users().clone());

    search.input("linh");
    tokio::time::sleep(Duration::from_secs(1)).await;
    tokio::task::yield_now().await;
    let state = search.state();
    assert!(state.error.is_some());
    assert!(state.results.is_empty());

    mock.clear_failure();
    search.input("linh v");
    tokio::time::sleep(Duration::from_secs(1)).await;
    tokio::task::yield_now().await;
    let state = search.state();
    assert!(state.error.is_none());
    assert_eq!(state.results.len(), 1);
    assert_eq!(mock.calls_to(Method::Get, "/users/search").len(), 2);
}

#[tokio::test]
async fn test_invalid_semester_never_reaches_backend() {
    let mock = MockTransport::new();
    let (_temp, client) = signed_in(&mock, "Admin", 1);
    let manager = SemesterManager::new(client, Arc::new(AutoConfirm(true)));

    let draft = SemesterDraft {
        semester_code: "FA24".into(),
        semester_name: "Autumn 2024".into(),
        start_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
        is_active: false,
    };

    let Err(AppError::Validation(errors)) = manager.create(&draft).await else {
        panic!("expected validation failure");
    };
    assert!(errors.iter().any(|e| e.contains("Fall")));
    assert!(errors.iter().any(|e| e.contains("End date must be after start date")));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_student_cannot_create_semester() {
    let mock = MockTransport::new();
    let (_temp, client) = signed_in(&mock, "Student", 1);
    let manager = SemesterManager::new(client, Arc::new(AutoConfirm(true)));

    let draft = SemesterDraft {
        semester_code: "SP25".into(),
        semester_name: "Spring 2025".into(),
        start_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
        is_active: false,
    };

    assert!(matches!(manager.create(&draft).await, Err(AppError::Api(_))));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_upload_gated_on_role_and_status() {
    let thesis: Thesis = serde_json::from_value(json!({
        "thesisId": 12,
        "title": "Edge caching",
        "status": "Need Update",
        "histories": [{"versionNumber": 1}, {"versionNumber": 3}, {"versionNumber": 2}]
    }))
    .unwrap();
    assert_eq!(thesis.current_version_number(), Some(3));

    let mock = MockTransport::new().on_json(
        Method::Post,
        "/thesis/12/upload",
        json!({
            "thesisId": 12,
            "title": "Edge caching",
            "status": "Updated",
            "histories": [{"versionNumber": 1}, {"versionNumber": 3}, {"versionNumber": 2}, {"versionNumber": 4}]
        }),
    );

    let (_temp, lecturer) = signed_in(&mock, "Lecturer", 30);
    let err = ThesisWorkspace::new(lecturer)
        .upload_version(&thesis, Upload::new("v4.pdf", b"%PDF".to_vec()), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotAllowed(_)));
    assert_eq!(mock.call_count(), 0);

    let (_temp2, student) = signed_in(&mock, "Student", 5);
    let updated = ThesisWorkspace::new(student)
        .upload_version(&thesis, Upload::new("v4.pdf", b"%PDF".to_vec()), Some("fixed refs"))
        .await
        .unwrap();
    assert_eq!(updated.current_version_number(), Some(4));
}

#[tokio::test]
async fn test_checklist_kept_in_display_order() {
    let mock = MockTransport::new()
        .on_json(
            Method::Get,
            "/checklist",
            json!([
                {"checklistId": 1, "title": "Abstract", "displayOrder": 2},
                {"checklistId": 2, "title": "Title page", "displayOrder": 1}
            ]),
        )
        .on_json(
            Method::Put,
            "/checklist/1/toggle",
            json!({"checklistId": 1, "title": "Abstract", "displayOrder": 2, "isCompleted": true}),
        );
    let (_temp, client) = signed_in(&mock, "Lecturer", 30);
    let mut board = ChecklistBoard::new(client);

    let titles: Vec<_> = board
        .refresh()
        .await
        .unwrap()
        .iter()
        .map(|i| i.title.clone())
        .collect();
    assert_eq!(titles, vec!["Title page", "Abstract"]);

    board.toggle(1).await.unwrap();
    assert!(board.items()[1].is_completed);
}
