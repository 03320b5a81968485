//! Dispatcher integration tests: ordered first-match-wins dispatch, denial
//! short-circuit, skip-on-field-mismatch, failure notification and
//! credential redaction, exercised end to end through the public surface.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};

use tokengate::auth::{
    AuthBackend, AuthOutcome, BackendRegistry, Credentials, Dispatcher, LoginFailureLog,
    MemoryBackend, StaticTokenBackend, CLEANSED_SUBSTITUTE,
};
use tokengate::error::ConfigError;
use tokengate::identity::{Principal, RequestContext};
use tokengate::settings::Settings;

/// Backend that always reports the same outcome and counts invocations.
struct ScriptedBackend {
    required: &'static [&'static str],
    outcome: AuthOutcome,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    fn new(required: &'static [&'static str], outcome: AuthOutcome) -> Arc<Self> {
        Arc::new(Self { required, outcome, calls: AtomicUsize::new(0) })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AuthBackend for ScriptedBackend {
    fn required_fields(&self) -> &[&str] {
        self.required
    }

    fn authenticate(&self, _: &RequestContext, _: &Credentials) -> Result<AuthOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.outcome.clone())
    }
}

/// Backend whose store is permanently broken.
struct FailingBackend {
    calls: AtomicUsize,
}

impl AuthBackend for FailingBackend {
    fn required_fields(&self) -> &[&str] {
        &["username", "password"]
    }

    fn authenticate(&self, _: &RequestContext, _: &Credentials) -> Result<AuthOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("credential store offline"))
    }
}

fn settings_with(backends: &[&str]) -> Settings {
    Settings { backends: backends.iter().map(|s| s.to_string()).collect(), ..Settings::default() }
}

fn alice() -> Principal {
    Principal { user_id: "alice".into(), ..Principal::default() }
}

fn password_creds() -> Credentials {
    Credentials::new().with("username", "alice").with("password", "s3cr3t")
}

#[test]
fn first_matching_backend_wins_and_annotates_the_principal() -> Result<()> {
    let first = ScriptedBackend::new(&["username", "password"], AuthOutcome::Authenticated(alice()));
    let second = ScriptedBackend::new(&["username", "password"], AuthOutcome::Authenticated(alice()));

    let mut registry = BackendRegistry::new();
    registry.register("app.First", first.clone());
    registry.register("app.Second", second.clone());

    let log = Arc::new(LoginFailureLog::new(8));
    let mut dispatcher =
        Dispatcher::from_settings(&settings_with(&["app.First", "app.Second"]), &registry)?;
    dispatcher.add_listener(log.clone());

    let principal = dispatcher
        .authenticate(&RequestContext::default(), &password_creds())?
        .expect("first backend should authenticate");

    assert_eq!(principal.user_id, "alice");
    assert_eq!(principal.backend.as_deref(), Some("app.First"));
    assert_eq!(first.calls(), 1);
    assert_eq!(second.calls(), 0, "no later backend may be invoked after a success");
    assert!(log.is_empty(), "success must not emit a failure notification");
    Ok(())
}

#[test]
fn denial_is_authoritative_and_stops_the_pass() -> Result<()> {
    // First backend only understands tokens and is skipped; second denies;
    // third would have accepted but must never run.
    let tokens = ScriptedBackend::new(&["token"], AuthOutcome::Authenticated(alice()));
    let denier = ScriptedBackend::new(
        &["username", "password"],
        AuthOutcome::Denied { reason: "account locked".into() },
    );
    let fallback =
        ScriptedBackend::new(&["username", "password"], AuthOutcome::Authenticated(alice()));

    let mut registry = BackendRegistry::new();
    registry.register("app.Tokens", tokens.clone());
    registry.register("app.Denier", denier.clone());
    registry.register("app.Fallback", fallback.clone());

    let log = Arc::new(LoginFailureLog::new(8));
    let mut dispatcher = Dispatcher::from_settings(
        &settings_with(&["app.Tokens", "app.Denier", "app.Fallback"]),
        &registry,
    )?;
    dispatcher.add_listener(log.clone());

    let outcome = dispatcher.authenticate(&RequestContext::default(), &password_creds())?;

    assert!(outcome.is_none(), "a denial must yield no principal");
    assert_eq!(tokens.calls(), 0, "non-binding backend must be skipped, not invoked");
    assert_eq!(denier.calls(), 1);
    assert_eq!(fallback.calls(), 0, "no backend may run after an authoritative denial");
    assert_eq!(log.len(), 1, "exactly one notification per failed pass");
    Ok(())
}

#[test]
fn exhausted_backends_notify_once_with_redacted_credentials() -> Result<()> {
    let first = ScriptedBackend::new(&["username", "password"], AuthOutcome::NoMatch);
    let second = ScriptedBackend::new(&["username", "password"], AuthOutcome::NoMatch);

    let mut registry = BackendRegistry::new();
    registry.register("app.First", first.clone());
    registry.register("app.Second", second.clone());

    let log = Arc::new(LoginFailureLog::new(8));
    let mut dispatcher =
        Dispatcher::from_settings(&settings_with(&["app.First", "app.Second"]), &registry)?;
    dispatcher.add_listener(log.clone());

    let context = RequestContext { request_id: Some("req-1".into()), ..Default::default() };
    let outcome = dispatcher.authenticate(&context, &password_creds())?;

    assert!(outcome.is_none());
    assert_eq!(first.calls(), 1);
    assert_eq!(second.calls(), 1);

    let events = log.recent();
    assert_eq!(events.len(), 1, "exactly one notification per failed pass");
    let event = &events[0];
    assert_eq!(event.credentials.get_str("password"), Some(CLEANSED_SUBSTITUTE));
    assert_eq!(event.credentials.get_str("username"), Some("alice"));
    assert_eq!(event.context.request_id.as_deref(), Some("req-1"));
    assert!(event.at.is_aware(), "default settings stamp events with aware UTC");
    Ok(())
}

#[test]
fn backend_errors_propagate_without_notification() {
    let failing = Arc::new(FailingBackend { calls: AtomicUsize::new(0) });
    let fallback =
        ScriptedBackend::new(&["username", "password"], AuthOutcome::Authenticated(alice()));

    let mut registry = BackendRegistry::new();
    registry.register("app.Broken", failing.clone());
    registry.register("app.Fallback", fallback.clone());

    let log = Arc::new(LoginFailureLog::new(8));
    let mut dispatcher = Dispatcher::from_settings(
        &settings_with(&["app.Broken", "app.Fallback"]),
        &registry,
    )
    .unwrap();
    dispatcher.add_listener(log.clone());

    let err = dispatcher
        .authenticate(&RequestContext::default(), &password_creds())
        .expect_err("a broken backend must surface its error");

    assert!(err.to_string().contains("credential store offline"));
    assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
    assert_eq!(fallback.calls(), 0, "errors abort the pass");
    assert!(log.is_empty(), "error propagation must not emit the failure notification");
}

#[test]
fn configuration_errors_from_backend_resolution() {
    let registry = BackendRegistry::new();

    let empty = settings_with(&[]);
    assert!(matches!(
        Dispatcher::from_settings(&empty, &registry),
        Err(ConfigError::NoBackends)
    ));

    let unknown = settings_with(&["app.Missing"]);
    match Dispatcher::from_settings(&unknown, &registry) {
        Err(ConfigError::UnknownBackend(path)) => assert_eq!(path, "app.Missing"),
        _ => panic!("expected UnknownBackend"),
    }
}

#[test]
fn default_settings_drive_the_bundled_memory_backend() -> Result<()> {
    let mut registry = BackendRegistry::new();
    registry.register(
        "tokengate.MemoryBackend",
        Arc::new(MemoryBackend::new().with_user("alice", "s3cr3t")),
    );

    let settings = Settings::default();
    let dispatcher = Dispatcher::from_settings(&settings, &registry)?;

    let good = dispatcher.authenticate(&RequestContext::default(), &password_creds())?;
    assert_eq!(good.unwrap().backend.as_deref(), Some("tokengate.MemoryBackend"));

    let bad = Credentials::new().with("username", "alice").with("password", "nope");
    assert!(dispatcher.authenticate(&RequestContext::default(), &bad)?.is_none());
    Ok(())
}

#[test]
fn locked_account_denial_flows_through_the_dispatcher() -> Result<()> {
    let mut backend = MemoryBackend::new().with_user("alice", "s3cr3t");
    backend.lock_user("alice");

    let mut registry = BackendRegistry::new();
    registry.register("tokengate.MemoryBackend", Arc::new(backend));

    let log = Arc::new(LoginFailureLog::new(8));
    let mut dispatcher = Dispatcher::from_settings(&Settings::default(), &registry)?;
    dispatcher.add_listener(log.clone());

    let outcome = dispatcher.authenticate(&RequestContext::default(), &password_creds())?;
    assert!(outcome.is_none(), "locked accounts authenticate nowhere");
    assert_eq!(log.len(), 1);
    Ok(())
}

#[test]
fn token_credentials_skip_past_the_password_backend() -> Result<()> {
    let mut registry = BackendRegistry::new();
    registry.register(
        "tokengate.MemoryBackend",
        Arc::new(MemoryBackend::new().with_user("alice", "s3cr3t")),
    );
    registry.register(
        "tokengate.StaticTokenBackend",
        Arc::new(StaticTokenBackend::new().with_token("tok-1", "alice")),
    );

    let settings = settings_with(&["tokengate.MemoryBackend", "tokengate.StaticTokenBackend"]);
    let dispatcher = Dispatcher::from_settings(&settings, &registry)?;

    let creds = Credentials::new().with("token", "tok-1");
    let principal = dispatcher
        .authenticate(&RequestContext::default(), &creds)?
        .expect("token backend should authenticate");
    assert_eq!(principal.user_id, "alice");
    assert_eq!(principal.backend.as_deref(), Some("tokengate.StaticTokenBackend"));
    Ok(())
}

#[test]
fn dispatcher_preserves_configured_order_and_notifies_every_listener() -> Result<()> {
    let first = ScriptedBackend::new(&["username", "password"], AuthOutcome::NoMatch);
    let second = ScriptedBackend::new(&["username", "password"], AuthOutcome::NoMatch);

    // Built from pre-resolved pairs rather than through the registry.
    let mut dispatcher = Dispatcher::new(
        Settings::default(),
        vec![
            ("app.B".to_string(), first as Arc<dyn AuthBackend>),
            ("app.A".to_string(), second as Arc<dyn AuthBackend>),
        ],
    );
    assert_eq!(dispatcher.backend_paths().collect::<Vec<_>>(), vec!["app.B", "app.A"]);

    let log_a = Arc::new(LoginFailureLog::new(4));
    let log_b = Arc::new(LoginFailureLog::new(4));
    dispatcher.add_listener(log_a.clone());
    dispatcher.add_listener(log_b.clone());

    dispatcher.authenticate(&RequestContext::default(), &password_creds())?;
    assert_eq!(log_a.len(), 1);
    assert_eq!(log_b.len(), 1);
    Ok(())
}
