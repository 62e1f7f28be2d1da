use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = nexcrm_api::app::build_app("test-secret".to_string());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

struct Session {
    token: String,
    user_id: String,
    organization_id: String,
}

/// Register a fresh account and return its access token and the id of the
/// personal organization created alongside it.
async fn register(client: &reqwest::Client, base_url: &str, email: &str, username: &str) -> Session {
    let res = client
        .post(format!("{}/auth/register", base_url))
        .json(&json!({
            "email": email,
            "username": username,
            "first_name": "Test",
            "last_name": "User",
            "password": "hunter2hunter2",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    Session {
        token: body["access_token"].as_str().unwrap().to_string(),
        user_id: body["user"]["id"].as_str().unwrap().to_string(),
        organization_id: body["organization"]["id"].as_str().unwrap().to_string(),
    }
}

async fn create_contact(
    client: &reqwest::Client,
    base_url: &str,
    session: &Session,
) -> serde_json::Value {
    let res = client
        .post(format!("{}/contacts", base_url))
        .bearer_auth(&session.token)
        .header("X-Organization-Id", &session.organization_id)
        .json(&json!({ "first_name": "Jane", "last_name": "Doe", "email": "jane@corp.test" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn create_deal(
    client: &reqwest::Client,
    base_url: &str,
    session: &Session,
    contact_id: &str,
    amount: Option<i64>,
) -> serde_json::Value {
    let res = client
        .post(format!("{}/deals", base_url))
        .bearer_auth(&session.token)
        .header("X-Organization-Id", &session.organization_id)
        .json(&json!({ "contact_id": contact_id, "title": "Renewal", "amount": amount }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn tenant_routes_require_auth() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/contacts", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tenant_routes_require_the_organization_header() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let session = register(&client, &srv.base_url, "a@x.test", "a").await;

    let res = client
        .get(format!("{}/contacts", srv.base_url))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_login_and_me_flow() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    register(&client, &srv.base_url, "ada@x.test", "ada").await;

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "ada@x.test", "password": "hunter2hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let tokens: serde_json::Value = res.json().await.unwrap();

    let res = client
        .get(format!("{}/auth/me", srv.base_url))
        .bearer_auth(tokens["access_token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: serde_json::Value = res.json().await.unwrap();
    assert_eq!(me["email"], "ada@x.test");
    assert!(me.get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_email_registration_conflicts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    register(&client, &srv.base_url, "dup@x.test", "dup").await;

    let res = client
        .post(format!("{}/auth/register", srv.base_url))
        .json(&json!({
            "email": "dup@x.test",
            "username": "dup2",
            "first_name": "Test",
            "last_name": "User",
            "password": "hunter2hunter2",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    register(&client, &srv.base_url, "ada@x.test", "ada").await;

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "ada@x.test", "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_accepts_only_refresh_tokens() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/auth/register", srv.base_url))
        .json(&json!({
            "email": "r@x.test",
            "username": "r",
            "first_name": "Test",
            "last_name": "User",
            "password": "hunter2hunter2",
        }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();

    let res = client
        .post(format!("{}/auth/refresh", srv.base_url))
        .json(&json!({ "refresh_token": body["refresh_token"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // An access token must not pass as a refresh token.
    let res = client
        .post(format!("{}/auth/refresh", srv.base_url))
        .json(&json!({ "refresh_token": body["access_token"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deal_lifecycle_with_audit_trail() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let session = register(&client, &srv.base_url, "sales@x.test", "sales").await;
    let contact = create_contact(&client, &srv.base_url, &session).await;
    let deal = create_deal(
        &client,
        &srv.base_url,
        &session,
        contact["id"].as_str().unwrap(),
        Some(50_000),
    )
    .await;
    assert_eq!(deal["status"], "new");
    let deal_id = deal["id"].as_str().unwrap();

    for (target, expected_closed) in [("in_progress", false), ("won", true)] {
        let res = client
            .post(format!("{}/deals/{}/status", srv.base_url, deal_id))
            .bearer_auth(&session.token)
            .header("X-Organization-Id", &session.organization_id)
            .json(&json!({ "status": target }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["status"], target);
        assert_eq!(body["closed_date"].is_null(), !expected_closed);
    }

    // Each transition left an audit note on the deal.
    let res = client
        .get(format!("{}/deals/{}/activities", srv.base_url, deal_id))
        .bearer_auth(&session.token)
        .header("X-Organization-Id", &session.organization_id)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items
        .iter()
        .any(|a| a["title"] == "Deal status changed to won"));
}

#[tokio::test]
async fn invalid_transition_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let session = register(&client, &srv.base_url, "sales@x.test", "sales").await;
    let contact = create_contact(&client, &srv.base_url, &session).await;
    let deal = create_deal(
        &client,
        &srv.base_url,
        &session,
        contact["id"].as_str().unwrap(),
        Some(100),
    )
    .await;

    // new -> won skips in_progress
    let res = client
        .post(format!(
            "{}/deals/{}/status",
            srv.base_url,
            deal["id"].as_str().unwrap()
        ))
        .bearer_auth(&session.token)
        .header("X-Organization-Id", &session.organization_id)
        .json(&json!({ "status": "won" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn winning_without_amount_is_a_validation_error() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let session = register(&client, &srv.base_url, "sales@x.test", "sales").await;
    let contact = create_contact(&client, &srv.base_url, &session).await;
    let deal = create_deal(
        &client,
        &srv.base_url,
        &session,
        contact["id"].as_str().unwrap(),
        None,
    )
    .await;
    let deal_id = deal["id"].as_str().unwrap();

    let res = client
        .post(format!("{}/deals/{}/status", srv.base_url, deal_id))
        .bearer_auth(&session.token)
        .header("X-Organization-Id", &session.organization_id)
        .json(&json!({ "status": "in_progress" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/deals/{}/status", srv.base_url, deal_id))
        .bearer_auth(&session.token)
        .header("X-Organization-Id", &session.organization_id)
        .json(&json!({ "status": "won" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn contact_with_deals_cannot_be_deleted() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let session = register(&client, &srv.base_url, "sales@x.test", "sales").await;
    let contact = create_contact(&client, &srv.base_url, &session).await;
    let contact_id = contact["id"].as_str().unwrap();
    create_deal(&client, &srv.base_url, &session, contact_id, Some(100)).await;

    let res = client
        .delete(format!("{}/contacts/{}", srv.base_url, contact_id))
        .bearer_auth(&session.token)
        .header("X-Organization-Id", &session.organization_id)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn records_are_isolated_between_organizations() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let alice = register(&client, &srv.base_url, "alice@x.test", "alice").await;
    let bob = register(&client, &srv.base_url, "bob@x.test", "bob").await;
    let contact = create_contact(&client, &srv.base_url, &alice).await;

    // Bob is not a member of Alice's organization.
    let res = client
        .get(format!("{}/contacts", srv.base_url))
        .bearer_auth(&bob.token)
        .header("X-Organization-Id", &alice.organization_id)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Alice's contact does not exist inside Bob's organization.
    let res = client
        .get(format!(
            "{}/contacts/{}",
            srv.base_url,
            contact["id"].as_str().unwrap()
        ))
        .bearer_auth(&bob.token)
        .header("X-Organization-Id", &bob.organization_id)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn task_complete_endpoint_marks_done() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let session = register(&client, &srv.base_url, "t@x.test", "t").await;

    let res = client
        .post(format!("{}/tasks", srv.base_url))
        .bearer_auth(&session.token)
        .header("X-Organization-Id", &session.organization_id)
        .json(&json!({ "title": "Call Jane", "priority": "high", "assigned_to": session.user_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let task: serde_json::Value = res.json().await.unwrap();
    assert_eq!(task["status"], "todo");

    let res = client
        .post(format!(
            "{}/tasks/{}/complete",
            srv.base_url,
            task["id"].as_str().unwrap()
        ))
        .bearer_auth(&session.token)
        .header("X-Organization-Id", &session.organization_id)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let done: serde_json::Value = res.json().await.unwrap();
    assert_eq!(done["status"], "done");
    assert!(!done["completed_at"].is_null());
}

#[tokio::test]
async fn past_due_date_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let session = register(&client, &srv.base_url, "t@x.test", "t").await;

    let res = client
        .post(format!("{}/tasks", srv.base_url))
        .bearer_auth(&session.token)
        .header("X-Organization-Id", &session.organization_id)
        .json(&json!({
            "title": "Too late",
            "assigned_to": session.user_id,
            "due_date": "2020-01-01T00:00:00Z",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dashboard_aggregates_the_tenant() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let session = register(&client, &srv.base_url, "d@x.test", "d").await;
    let contact = create_contact(&client, &srv.base_url, &session).await;
    let deal = create_deal(
        &client,
        &srv.base_url,
        &session,
        contact["id"].as_str().unwrap(),
        Some(10_000),
    )
    .await;
    let deal_id = deal["id"].as_str().unwrap();
    for target in ["in_progress", "won"] {
        let res = client
            .post(format!("{}/deals/{}/status", srv.base_url, deal_id))
            .bearer_auth(&session.token)
            .header("X-Organization-Id", &session.organization_id)
            .json(&json!({ "status": target }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = client
        .get(format!("{}/analytics/dashboard", srv.base_url))
        .bearer_auth(&session.token)
        .header("X-Organization-Id", &session.organization_id)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["deals"]["total_deals"], 1);
    assert_eq!(body["deals"]["won"], 1);
    assert_eq!(body["deals"]["win_rate"], 100.0);
    assert_eq!(body["contacts"]["total_contacts"], 1);
    // The two status changes are the only activities so far.
    assert_eq!(body["recent_activities"].as_array().unwrap().len(), 2);
}
