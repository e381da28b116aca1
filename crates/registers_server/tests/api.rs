//! End-to-end tests of the adapter over in-memory collaborators.

use registers_model::{CompanyRegister, EventType, RegisterCategory, RegistersDelta};
use registers_server::{ApiRequest, ApiResponse, Method, RegistersServer, ServerConfig};
use registers_store::{InMemoryStore, RegistersStore};
use registers_sync::{FixedClock, RegistersService};
use registers_testkit::prelude::*;
use std::sync::Arc;
use std::time::Duration;

const PATH: &str = "/company/00006400/registers";

type Server = RegistersServer<Arc<FaultyStore<InMemoryStore>>, Arc<RecordingNotifier>, FixedClock>;

struct Fixture {
    server: Server,
    store: Arc<FaultyStore<InMemoryStore>>,
    notifier: Arc<RecordingNotifier>,
}

fn fixture() -> Fixture {
    let store = Arc::new(FaultyStore::new(InMemoryStore::new(), CallLog::new()));
    let notifier = Arc::new(RecordingNotifier::new());
    let service =
        RegistersService::with_clock(store.clone(), notifier.clone(), FixedClock::new(epoch()));
    Fixture {
        server: RegistersServer::new(ServerConfig::default(), Arc::new(service)),
        store,
        notifier,
    }
}

fn as_key(request: ApiRequest) -> ApiRequest {
    request
        .with_header("ERIC-Identity", "delta-consumer")
        .with_header("ERIC-Identity-Type", "key")
        .with_header("ERIC-Authorised-Key-Privileges", "internal-app")
}

fn put(delta: &RegistersDelta) -> ApiRequest {
    let body = serde_json::to_vec(&delta.to_request()).unwrap();
    as_key(ApiRequest::new(Method::Put, PATH).with_body(body))
}

fn get() -> ApiRequest {
    as_key(ApiRequest::new(Method::Get, PATH))
}

fn delete() -> ApiRequest {
    as_key(ApiRequest::new(Method::Delete, PATH))
}

fn body(response: &ApiResponse) -> serde_json::Value {
    serde_json::from_slice(&response.body).unwrap()
}

#[test]
fn put_get_delete() {
    let f = fixture();

    let response = f
        .server
        .handle(put(&delta("00006400", "20240101000000000000", directors())));
    assert_eq!(response.status, 200);

    let response = f.server.handle(get());
    assert_eq!(response.status, 200);
    let view: CompanyRegister = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(view.registers, directors());
    assert_eq!(view.links.self_link, PATH);
    assert_eq!(response.header("etag"), Some(view.etag.as_str()));

    assert_eq!(f.server.handle(delete()).status, 200);
    assert_eq!(f.server.handle(get()).status, 404);
    assert_eq!(f.server.handle(delete()).status, 404);

    let kinds: Vec<_> = f
        .notifier
        .events()
        .iter()
        .map(|e| e.event.event_type)
        .collect();
    assert_eq!(kinds, vec![EventType::Changed, EventType::Deleted]);
}

#[test]
fn context_id_follows_request_id() {
    let f = fixture();
    let request = put(&delta("00006400", "20240101000000000000", directors()))
        .with_header("x-request-id", "trace-77");
    f.server.handle(request);
    assert_eq!(f.notifier.events()[0].context_id, "trace-77");
}

#[test]
fn stale_put_is_conflict() {
    let f = fixture();
    f.server
        .handle(put(&delta("00006400", "20240102000000000000", directors())));

    let response = f
        .server
        .handle(put(&delta("00006400", "20240101000000000000", members())));
    assert_eq!(response.status, 409);
    assert_eq!(body(&response)["message"], "stale");

    let stored = f.store.inner().get(&company("00006400")).unwrap().unwrap();
    assert!(!stored.registers().contains(RegisterCategory::Members));
}

#[test]
fn notifier_outage_is_service_unavailable() {
    let f = fixture();
    f.notifier.set_failing(true);

    let response = f
        .server
        .handle(put(&delta("00006400", "20240101000000000000", directors())));
    assert_eq!(response.status, 503);

    f.notifier.set_failing(false);
    let response = f
        .server
        .handle(put(&delta("00006400", "20240101000000000000", directors())));
    assert_eq!(response.status, 200);
}

#[test]
fn store_outage_is_service_unavailable() {
    let f = fixture();
    f.store.fail_reads(true);
    assert_eq!(f.server.handle(get()).status, 503);
    assert_eq!(f.server.handle(delete()).status, 503);
}

#[test]
fn malformed_requests_are_bad_requests() {
    let f = fixture();

    let response = f
        .server
        .handle(as_key(ApiRequest::new(Method::Put, PATH).with_body("{not json")));
    assert_eq!(response.status, 400);

    let misfiled = br#"{
        "internal_data": {"delta_at": "2024-01-01T00:00:00Z"},
        "external_data": {"directors": {"register_type": "members", "items": []}}
    }"#;
    let response = f
        .server
        .handle(as_key(ApiRequest::new(Method::Put, PATH).with_body(misfiled.to_vec())));
    assert_eq!(response.status, 400);
    assert!(body(&response)["message"]
        .as_str()
        .unwrap()
        .contains("members"));

    let response = f.server.handle(as_key(ApiRequest::new(
        Method::Get,
        "/company/NOT-A-NUMBER/registers",
    )));
    assert_eq!(response.status, 400);
    assert_eq!(f.notifier.attempts(), 0);
}

#[test]
fn writes_need_privileged_key() {
    let f = fixture();
    let request = ApiRequest::new(Method::Delete, PATH)
        .with_header("ERIC-Identity", "someone")
        .with_header("ERIC-Identity-Type", "oauth2");
    assert_eq!(f.server.handle(request).status, 403);

    let request = ApiRequest::new(Method::Get, PATH)
        .with_header("ERIC-Identity", "someone")
        .with_header("ERIC-Identity-Type", "oauth2");
    assert_eq!(f.server.handle(request).status, 404);
}

#[test]
fn identity_checks_can_be_disabled() {
    let store = InMemoryStore::new();
    let service = RegistersService::new(store, RecordingNotifier::new());
    let server = RegistersServer::new(
        ServerConfig::default().without_identity_checks(),
        Arc::new(service),
    );
    assert_eq!(server.handle(ApiRequest::new(Method::Get, PATH)).status, 404);
}

#[test]
fn from_config_opens_data_dir() {
    struct Refusing(Arc<parking_lot::Mutex<Vec<Duration>>>);
    impl registers_sync::HttpClient for Refusing {
        fn post_json(
            &self,
            _: &str,
            _: &[(&str, &str)],
            _: Vec<u8>,
            timeout: Duration,
        ) -> Result<u16, String> {
            self.0.lock().push(timeout);
            Err("connection refused".into())
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let timeouts = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let mut config = ServerConfig::default()
        .with_data_dir(dir.path().join("documents"))
        .without_identity_checks();
    config.notifier.timeout = Duration::from_millis(1500);
    let server = RegistersServer::from_config(config, Refusing(timeouts.clone())).unwrap();
    assert!(dir.path().join("documents").is_dir());

    let response = server.handle(put(&delta("00006400", "20240101000000000000", directors())));
    assert_eq!(response.status, 503);
    assert!(server
        .service()
        .store()
        .get(&company("00006400"))
        .unwrap()
        .is_some());
    assert_eq!(*timeouts.lock(), vec![Duration::from_millis(1500)]);
}
