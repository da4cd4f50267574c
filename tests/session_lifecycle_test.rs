mod common;

use common::{client_config, dead_base_url, spawn_auth_service, test_server_config};
use std::sync::Arc;
use visit_portal::app::PortalApp;
use visit_portal::auth::{CredentialVerifier, HttpVerifier, Registration};
use visit_portal::config::{PortalConfig, TokenSlotConfig};
use visit_portal::forms::{INVALID_CREDENTIALS, LoginForm, RegisterForm};
use visit_portal::models::{Role, SessionToken};
use visit_portal::routing::{Route, Screen, View};
use visit_portal::session::{FileTokenSlot, MemoryTokenSlot, SessionState, TokenSlot};

fn app_with(base_url: &str, slot: Arc<dyn TokenSlot>) -> PortalApp {
    let verifier = HttpVerifier::new(&client_config(base_url)).unwrap();
    PortalApp::new(slot, Arc::new(verifier))
}

async fn register_account(base_url: &str, email: &str, role: Role) -> SessionToken {
    let verifier = HttpVerifier::new(&client_config(base_url)).unwrap();
    verifier
        .register(&Registration {
            first_name: "Pat".to_string(),
            last_name: "Jones".to_string(),
            email: email.to_string(),
            password: "Visits#2024".to_string(),
            role,
        })
        .await
        .unwrap()
        .token
}

#[tokio::test]
async fn test_fresh_start_redirects_home_to_login() {
    let base_url = spawn_auth_service(test_server_config()).await;
    let mut app = app_with(&base_url, Arc::new(MemoryTokenSlot::new()));

    // Before bootstrap settles the guard holds back
    assert_eq!(app.navigate("/"), Screen::Blank);
    assert_eq!(app.location(), Route::Home);

    assert_eq!(app.start().await.unwrap(), SessionState::Anonymous);
    assert_eq!(app.current_screen(), Screen::Redirect(Route::Login));
    assert_eq!(app.location(), Route::Login);
    assert_eq!(app.current_screen(), Screen::Login);
}

#[tokio::test]
async fn test_registration_lands_on_dashboard() {
    let base_url = spawn_auth_service(test_server_config()).await;
    let slot = Arc::new(MemoryTokenSlot::new());
    let mut app = app_with(&base_url, slot.clone());
    app.start().await.unwrap();

    assert_eq!(app.navigate("/register"), Screen::Register);

    let mut form = RegisterForm::new();
    form.set_first_name("Lee");
    form.set_last_name("Chan");
    form.set_email("lee@example.com");
    form.set_password("Counsel!2024");
    form.set_role(Role::Legal);

    let screen = app.submit_registration(&mut form).await.unwrap();
    match screen {
        Screen::Dashboard { view, identity } => {
            assert_eq!(view, View::VisitorDashboard);
            assert_eq!(identity.first_name, "Lee");
            assert_eq!(identity.role, Role::Legal);
        }
        other => panic!("expected dashboard, got {:?}", other),
    }
    assert_eq!(app.location(), Route::Home);
    assert!(slot.load().unwrap().is_some());
}

#[tokio::test]
async fn test_failed_login_stays_on_login() {
    let base_url = spawn_auth_service(test_server_config()).await;
    register_account(&base_url, "staff@example.com", Role::Staff).await;

    let mut app = app_with(&base_url, Arc::new(MemoryTokenSlot::new()));
    app.start().await.unwrap();
    app.navigate("/login");

    let mut form = LoginForm::new();
    form.set_email("staff@example.com");
    form.set_password("Wrong#2024");

    assert_eq!(app.submit_login(&mut form).await.unwrap(), Screen::Login);
    assert_eq!(form.error(), Some(INVALID_CREDENTIALS));
    assert_eq!(app.session(), SessionState::Anonymous);

    form.set_password("Visits#2024");
    let screen = app.submit_login(&mut form).await.unwrap();
    assert!(matches!(
        screen,
        Screen::Dashboard {
            view: View::StaffDashboard,
            ..
        }
    ));
}

#[tokio::test]
async fn test_persisted_session_survives_reload() {
    let base_url = spawn_auth_service(test_server_config()).await;
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("storage.json");

    {
        let mut app = app_with(&base_url, Arc::new(FileTokenSlot::new(&storage)));
        app.start().await.unwrap();

        let mut form = RegisterForm::new();
        form.set_first_name("Alex");
        form.set_last_name("Kim");
        form.set_email("alex@example.com");
        form.set_password("Admin#2024x");
        form.set_role(Role::Admin);
        app.submit_registration(&mut form).await.unwrap();
    }

    // A new process reading the same slot
    let mut app = app_with(&base_url, Arc::new(FileTokenSlot::new(&storage)));
    let settled = app.start().await.unwrap();
    assert!(settled.is_authenticated());

    assert!(matches!(
        app.navigate("/"),
        Screen::Dashboard {
            view: View::AdminDashboard,
            ..
        }
    ));
}

#[tokio::test]
async fn test_rejected_token_is_purged_on_bootstrap() {
    let base_url = spawn_auth_service(test_server_config()).await;
    let slot = Arc::new(MemoryTokenSlot::with_token(&SessionToken::new("forged")));
    let mut app = app_with(&base_url, slot.clone());

    assert_eq!(app.start().await.unwrap(), SessionState::Anonymous);
    assert!(slot.load().unwrap().is_none());
    assert_eq!(app.navigate("/"), Screen::Redirect(Route::Login));
}

#[tokio::test]
async fn test_unreachable_service_degrades_to_anonymous() {
    let slot = Arc::new(MemoryTokenSlot::with_token(&SessionToken::new("whatever")));
    let mut app = app_with(&dead_base_url().await, slot.clone());

    assert_eq!(app.start().await.unwrap(), SessionState::Anonymous);
    assert!(slot.load().unwrap().is_none());
    assert_eq!(app.navigate("/"), Screen::Redirect(Route::Login));
}

#[tokio::test]
async fn test_logout_returns_to_login() {
    let base_url = spawn_auth_service(test_server_config()).await;
    let token = register_account(&base_url, "visitor@example.com", Role::Visitor).await;
    let slot = Arc::new(MemoryTokenSlot::with_token(&token));
    let mut app = app_with(&base_url, slot.clone());
    app.start().await.unwrap();

    assert!(matches!(
        app.navigate("/"),
        Screen::Dashboard {
            view: View::VisitorDashboard,
            ..
        }
    ));

    assert_eq!(app.logout().await.unwrap(), Screen::Redirect(Route::Login));
    assert!(slot.load().unwrap().is_none());

    // Logging out again changes nothing
    app.logout().await.unwrap();
    assert_eq!(app.session(), SessionState::Anonymous);
}

#[tokio::test]
async fn test_unknown_paths_are_not_found() {
    let base_url = spawn_auth_service(test_server_config()).await;
    let mut app = app_with(&base_url, Arc::new(MemoryTokenSlot::new()));
    app.start().await.unwrap();

    assert_eq!(app.navigate("/dashboard"), Screen::NotFound);
    assert_eq!(app.navigate("/visits/42"), Screen::NotFound);
}

#[tokio::test]
async fn test_app_from_config_uses_file_slot() {
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    FileTokenSlot::new(&storage)
        .store(&SessionToken::new("stale"))
        .unwrap();

    let mut config = PortalConfig::default();
    config.auth = client_config(&dead_base_url().await);
    config.token_slot = TokenSlotConfig::File {
        path: storage.clone(),
    };

    let app = PortalApp::from_config(&config).unwrap();
    assert_eq!(app.start().await.unwrap(), SessionState::Anonymous);
    assert!(FileTokenSlot::new(&storage).load().unwrap().is_none());
}
