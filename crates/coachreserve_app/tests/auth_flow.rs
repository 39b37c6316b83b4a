mod support;

use coachreserve_app::messages;
use coachreserve_app::views::AuthViewError;
use coachreserve_app::{Route, SessionEvent};
use coachreserve_common::models::{OAuthProvider, SignUpOutcome, SignUpRequest};
use support::{session_for, AuthCall, Harness, REDIRECT_URL};

#[tokio::test]
async fn test_valid_sign_up_makes_exactly_one_call_with_origin_redirect() {
    let harness = Harness::new();
    let view = harness.auth_view();
    view.set_email("jean@example.com");
    view.set_password("hunter22");
    view.set_full_name("Jean Dupont");

    let outcome = view.sign_up().await.unwrap();

    assert_eq!(
        outcome,
        SignUpOutcome::ConfirmationSent {
            email: "jean@example.com".to_string()
        }
    );
    assert_eq!(
        harness.auth.calls(),
        vec![AuthCall::SignUp(SignUpRequest {
            email: "jean@example.com".to_string(),
            password: "hunter22".to_string(),
            display_name: "Jean Dupont".to_string(),
            redirect_to: REDIRECT_URL.to_string(),
        })]
    );
    assert_eq!(harness.toast_messages(), vec![messages::SIGN_UP_SUCCESS]);
    assert_eq!(view.form().email, "");
    assert!(harness.session.snapshot().is_none());
}

#[tokio::test]
async fn test_auto_confirmed_sign_up_publishes_session() {
    let harness = Harness::new();
    harness.auth.auto_confirm();
    let view = harness.auth_view();
    view.set_email("jean@example.com");
    view.set_password("hunter22");
    view.set_full_name("Jean Dupont");

    view.sign_up().await.unwrap();

    assert_eq!(
        harness.session.snapshot(),
        Some(session_for("jean@example.com"))
    );
}

#[tokio::test]
async fn test_invalid_sign_up_never_reaches_backend() {
    let harness = Harness::new();
    let view = harness.auth_view();
    view.set_email("jean@example.com");
    view.set_password("123");
    view.set_full_name("Jean");

    let err = view.sign_up().await.unwrap_err();

    assert_eq!(err, AuthViewError::Invalid(messages::PASSWORD_TOO_SHORT));
    assert!(harness.auth.calls().is_empty());
    assert_eq!(harness.toast_messages(), vec![messages::PASSWORD_TOO_SHORT]);
    assert!(!view.is_busy());
}

#[tokio::test]
async fn test_sign_in_failure_notifies_and_does_not_navigate() {
    let harness = Harness::new();
    harness.auth.reject_sign_in("Invalid login credentials");
    let mut app = harness.app();
    assert_eq!(app.navigate("/auth").await, Route::Auth);

    let auth = app.auth().unwrap();
    auth.set_email("jean@example.com");
    auth.set_password("wrong");
    let err = auth.sign_in().await.unwrap_err();

    assert!(matches!(err, AuthViewError::Backend(_)));
    let toasts = harness.toasts.drain();
    assert_eq!(toasts.len(), 1);
    assert!(toasts[0].is_error());
    assert_eq!(toasts[0].message, "Invalid login credentials");
    assert_eq!(app.poll().await, None);
    assert_eq!(app.route(), Route::Auth);
    // Fields are kept for another try.
    assert_eq!(app.auth().unwrap().form().email, "jean@example.com");
}

#[tokio::test]
async fn test_sign_in_success_redirects_home_on_session_change() {
    let harness = Harness::new();
    let mut app = harness.app();
    app.navigate("/auth").await;

    let auth = app.auth().unwrap();
    auth.set_email("jean@example.com");
    auth.set_password("hunter22");
    auth.sign_in().await.unwrap();

    assert_eq!(harness.toast_messages(), vec![messages::SIGN_IN_SUCCESS]);
    assert_eq!(app.poll().await, Some(Route::Landing));
    assert_eq!(app.route(), Route::Landing);
    assert!(app.landing().unwrap().is_signed_in());
}

#[tokio::test]
async fn test_google_rejection_notifies_with_provider_name() {
    let harness = Harness::new();
    harness.auth.reject_oauth("Unsupported provider: provider is not enabled");
    let mut app = harness.app();
    app.navigate("/auth").await;

    let err = app
        .auth()
        .unwrap()
        .sign_in_with_oauth(OAuthProvider::Google)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthViewError::Backend(_)));
    let toasts = harness.toasts.drain();
    assert_eq!(toasts.len(), 1);
    assert!(toasts[0].message.contains("google"));
    assert!(toasts[0]
        .message
        .ends_with("Unsupported provider: provider is not enabled"));
    assert_eq!(app.poll().await, None);
    assert_eq!(app.route(), Route::Auth);
}

#[tokio::test]
async fn test_oauth_uses_origin_redirect() {
    let harness = Harness::new();
    let view = harness.auth_view();

    let redirect = view.sign_in_with_oauth(OAuthProvider::Apple).await.unwrap();

    assert_eq!(redirect.provider, OAuthProvider::Apple);
    assert_eq!(
        harness.auth.calls(),
        vec![AuthCall::OAuth {
            provider: OAuthProvider::Apple,
            redirect_to: REDIRECT_URL.to_string()
        }]
    );
    assert!(harness.toasts.is_empty());
}

#[tokio::test]
async fn test_second_action_while_busy_is_refused() {
    let harness = Harness::new();
    harness.auth.slow();
    let view = harness.auth_view();
    view.set_email("jean@example.com");
    view.set_password("hunter22");

    let (first, second) = tokio::join!(
        view.sign_in(),
        view.sign_in_with_oauth(OAuthProvider::Facebook)
    );

    assert!(first.is_ok());
    assert_eq!(second.unwrap_err(), AuthViewError::Busy);
    assert_eq!(harness.auth.calls().len(), 1);
    assert!(!view.is_busy());
}

#[tokio::test]
async fn test_auth_page_sends_signed_in_user_home() {
    let harness = Harness::signed_in("jean");
    let mut app = harness.app();

    assert_eq!(app.navigate("/auth").await, Route::Landing);
    assert!(app.auth().is_none());
}

#[tokio::test]
async fn test_complete_oauth_signs_in_and_goes_home() {
    let harness = Harness::new();
    let mut app = harness.app();
    app.navigate("/auth").await;
    let mut events = harness.session.subscribe();

    let route = app
        .complete_oauth("https://coachreserve.test/#access_token=abc&refresh_token=def")
        .await
        .unwrap();

    assert_eq!(route, Route::Landing);
    assert_eq!(
        events.try_next(),
        Some(SessionEvent::SignedIn(session_for("oauth-user")))
    );
}

#[tokio::test]
async fn test_complete_oauth_with_provider_error_stays_signed_out() {
    let harness = Harness::new();
    let mut app = harness.app();
    app.navigate("/auth").await;

    let err = app
        .complete_oauth("https://coachreserve.test/#error=access_denied")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthViewError::Backend(_)));
    assert!(harness.session.snapshot().is_none());
    assert_eq!(app.route(), Route::Auth);
    assert_eq!(harness.toast_messages(), vec!["access denied by provider"]);
}
