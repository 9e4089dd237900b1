//! `FirebaseProvider` against a local stand-in for the Identity Toolkit and
//! Secure Token REST endpoints.

use std::io::Read as _;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

use convene_auth::firebase::USER_KEY;
use convene_auth::{AuthError, FirebaseProvider, IdentityProvider, ProfileUpdate};
use convene_config::FirebaseConfig;
use convene_core::{KeyValueStore, MemoryStore};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tiny_http::{Header, Response, Server};

#[derive(Debug, Clone)]
struct Recorded {
    url: String,
    body: Value,
}

/// Serve canned responses keyed on the request path. Unknown paths get 404.
fn spawn_identity_server(
    routes: Vec<(&'static str, u16, Value)>,
) -> (String, Arc<Mutex<Vec<Recorded>>>) {
    let server = Server::http("127.0.0.1:0").expect("http server");
    let base = format!("http://{}", server.server_addr());
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&recorded);

    thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let mut raw = String::new();
            let _ = request.as_reader().read_to_string(&mut raw);
            let url = request.url().to_string();
            log.lock().unwrap().push(Recorded {
                url: url.clone(),
                body: serde_json::from_str(&raw).unwrap_or(Value::Null),
            });

            let path = url.split('?').next().unwrap_or_default().to_string();
            let (status, body) = routes
                .iter()
                .find(|(route, _, _)| *route == path)
                .map_or((404, json!({"error": {"message": "NOT_FOUND"}})), |(_, s, b)| {
                    (*s, b.clone())
                });
            let response = Response::from_string(body.to_string())
                .with_status_code(status)
                .with_header(
                    Header::from_bytes("Content-Type", "application/json").expect("header"),
                );
            let _ = request.respond(response);
        }
    });

    (base, recorded)
}

fn config(base: &str) -> FirebaseConfig {
    FirebaseConfig {
        api_key: "test-key".into(),
        identity_toolkit_url: format!("{base}/v1"),
        secure_token_url: format!("{base}/st"),
        ..Default::default()
    }
}

fn sign_in_body(uid: &str, email: &str) -> Value {
    json!({
        "localId": uid,
        "email": email,
        "displayName": "",
        "idToken": format!("id-{uid}"),
        "refreshToken": format!("refresh-{uid}"),
        "expiresIn": "3600",
        "registered": true
    })
}

#[tokio::test]
async fn password_sign_in_publishes_and_persists() {
    let (base, recorded) = spawn_identity_server(vec![(
        "/v1/accounts:signInWithPassword",
        200,
        sign_in_body("u1", "a@b.com"),
    )]);
    let store = Arc::new(MemoryStore::new());
    let provider = FirebaseProvider::connect(config(&base), store.clone())
        .await
        .unwrap();
    let changes = provider.subscribe();
    assert_eq!(*changes.borrow(), None);

    let identity = provider
        .sign_in_with_password("a@b.com", "Abc123")
        .await
        .unwrap();

    assert_eq!(identity.uid, "u1");
    assert_eq!(identity.display_name, None);
    assert_eq!(changes.borrow().as_ref().map(|i| i.uid.as_str()), Some("u1"));
    assert_eq!(provider.id_token(&identity).await.unwrap(), "id-u1");

    let persisted: Value = serde_json::from_str(&store.get(USER_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(persisted["refresh_token"], "refresh-u1");

    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests[0].url, "/v1/accounts:signInWithPassword?key=test-key");
    assert_eq!(requests[0].body["email"], "a@b.com");
    assert_eq!(requests[0].body["returnSecureToken"], true);
}

#[tokio::test]
async fn rejected_sign_up_maps_the_error_code() {
    let (base, _) = spawn_identity_server(vec![(
        "/v1/accounts:signUp",
        400,
        json!({"error": {"code": 400, "message": "EMAIL_EXISTS", "errors": []}}),
    )]);
    let store = Arc::new(MemoryStore::new());
    let provider = FirebaseProvider::connect(config(&base), store.clone())
        .await
        .unwrap();

    let err = provider.create_account("a@b.com", "Abc123").await.unwrap_err();

    assert!(matches!(err, AuthError::Provider { ref code, .. } if code == "EMAIL_EXISTS"));
    assert_eq!(err.to_string(), "email already in use");
    assert_eq!(provider.current_identity(), None);
    assert_eq!(store.get(USER_KEY).unwrap(), None);
}

#[tokio::test]
async fn profile_update_republishes_identity() {
    let (base, recorded) = spawn_identity_server(vec![
        ("/v1/accounts:signUp", 200, sign_in_body("u2", "n@b.com")),
        (
            "/v1/accounts:update",
            200,
            json!({"localId": "u2", "email": "n@b.com", "displayName": "Ana"}),
        ),
    ]);
    let provider = FirebaseProvider::connect(config(&base), Arc::new(MemoryStore::new()))
        .await
        .unwrap();

    let created = provider.create_account("n@b.com", "Abc123").await.unwrap();
    let updated = provider
        .update_profile(
            &created,
            ProfileUpdate {
                display_name: Some("Ana".into()),
                photo_url: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.display_name.as_deref(), Some("Ana"));
    assert_eq!(provider.current_identity(), Some(updated.clone()));
    // No new token in the update response keeps the previous one.
    assert_eq!(provider.id_token(&updated).await.unwrap(), "id-u2");

    let requests = recorded.lock().unwrap().clone();
    let update = &requests[1];
    assert_eq!(update.body["idToken"], "id-u2");
    assert_eq!(update.body["displayName"], "Ana");
    assert!(update.body.get("photoUrl").is_none());
}

#[tokio::test]
async fn sign_out_clears_persisted_session() {
    let (base, _) = spawn_identity_server(vec![(
        "/v1/accounts:signInWithPassword",
        200,
        sign_in_body("u3", "s@b.com"),
    )]);
    let store = Arc::new(MemoryStore::new());
    let provider = FirebaseProvider::connect(config(&base), store.clone())
        .await
        .unwrap();
    let identity = provider
        .sign_in_with_password("s@b.com", "Abc123")
        .await
        .unwrap();

    provider.sign_out().await.unwrap();

    assert_eq!(provider.current_identity(), None);
    assert_eq!(store.get(USER_KEY).unwrap(), None);
    assert!(matches!(
        provider.id_token(&identity).await,
        Err(AuthError::NotAuthenticated)
    ));
    provider.sign_out().await.unwrap();
}

#[tokio::test]
async fn connect_restores_persisted_session() {
    let (base, recorded) = spawn_identity_server(vec![(
        "/st/token",
        200,
        json!({
            "id_token": "id-restored",
            "refresh_token": "refresh-next",
            "expires_in": "3600",
            "user_id": "u4",
            "token_type": "Bearer"
        }),
    )]);
    let store = Arc::new(MemoryStore::new());
    store
        .set(
            USER_KEY,
            &json!({
                "uid": "u4",
                "email": "r@b.com",
                "display_name": "Rae",
                "photo_url": null,
                "refresh_token": "refresh-old"
            })
            .to_string(),
        )
        .unwrap();

    let provider = FirebaseProvider::connect(config(&base), store.clone())
        .await
        .unwrap();

    let identity = provider.current_identity().expect("restored");
    assert_eq!(identity.uid, "u4");
    assert_eq!(identity.display_name.as_deref(), Some("Rae"));
    assert_eq!(provider.id_token(&identity).await.unwrap(), "id-restored");

    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests[0].url, "/st/token?key=test-key");
    assert_eq!(requests[0].body["grant_type"], "refresh_token");
    assert_eq!(requests[0].body["refresh_token"], "refresh-old");

    let persisted: Value = serde_json::from_str(&store.get(USER_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(persisted["refresh_token"], "refresh-next");
}

#[tokio::test]
async fn expired_persisted_session_starts_signed_out() {
    let (base, _) = spawn_identity_server(vec![(
        "/st/token",
        400,
        json!({"error": {"code": 400, "message": "TOKEN_EXPIRED"}}),
    )]);
    let store = Arc::new(MemoryStore::new());
    store
        .set(
            USER_KEY,
            &json!({
                "uid": "u5",
                "email": "x@b.com",
                "display_name": null,
                "photo_url": null,
                "refresh_token": "refresh-revoked"
            })
            .to_string(),
        )
        .unwrap();

    let provider = FirebaseProvider::connect(config(&base), store.clone())
        .await
        .unwrap();

    assert_eq!(provider.current_identity(), None);
    assert_eq!(store.get(USER_KEY).unwrap(), None);
}

#[tokio::test]
async fn offline_start_keeps_persisted_session() {
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let store = Arc::new(MemoryStore::new());
    let persisted = json!({
        "uid": "u6",
        "email": "o@b.com",
        "display_name": null,
        "photo_url": null,
        "refresh_token": "refresh-still-valid"
    })
    .to_string();
    store.set(USER_KEY, &persisted).unwrap();

    let offline = config(&format!("http://127.0.0.1:{port}"));
    let provider = FirebaseProvider::connect(offline, store.clone())
        .await
        .unwrap();

    assert_eq!(provider.current_identity(), None);
    assert_eq!(store.get(USER_KEY).unwrap(), Some(persisted));
}

#[tokio::test]
async fn out_of_range_token_lifetime_is_tolerated() {
    let mut body = sign_in_body("u7", "big@b.com");
    body["expiresIn"] = json!("9223372036854775807");
    let (base, _) = spawn_identity_server(vec![("/v1/accounts:signInWithPassword", 200, body)]);
    let provider = FirebaseProvider::connect(config(&base), Arc::new(MemoryStore::new()))
        .await
        .unwrap();

    let identity = provider
        .sign_in_with_password("big@b.com", "Abc123")
        .await
        .unwrap();

    assert_eq!(provider.id_token(&identity).await.unwrap(), "id-u7");
}

#[tokio::test]
async fn google_sign_in_requires_a_sign_in_page() {
    let provider = FirebaseProvider::connect(
        config("http://127.0.0.1:9"),
        Arc::new(MemoryStore::new()),
    )
    .await
    .unwrap();

    assert!(matches!(
        provider.sign_in_with_google().await,
        Err(AuthError::NotConfigured(_))
    ));
}
