//! Bridge and worker behavior against a stub API implementation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use steward::domain::entity::{EntityDraft, EntityRecord};
use steward::domain::menu::Menu;
use steward::infrastructure::api::{ApiError, EntityApi, Page, Profile};
use steward::infrastructure::runtime::{ApiCommand, ApiEvent, MutationKind, RuntimeBridge};

/// Stub service: pages echo their page number in a single row's code, and
/// a query of "slow" stalls the list call long enough to be superseded.
struct StubApi;

#[async_trait]
impl EntityApi for StubApi {
    async fn list(
        &self,
        _endpoint: &str,
        page: u64,
        _page_size: u64,
        query: &str,
    ) -> Result<Page, ApiError> {
        if query == "slow" {
            tokio::time::sleep(Duration::from_millis(300)).await;
        }
        Ok(Page {
            rows: vec![EntityRecord {
                id: page.to_string(),
                code: format!("P{page}"),
                name: format!("Page {page}"),
                description: String::new(),
                active: true,
            }],
            total_count: 100,
        })
    }

    async fn create(&self, _endpoint: &str, draft: &EntityDraft) -> Result<(), ApiError> {
        if draft.code == "DUP" {
            return Err(ApiError::Rejected {
                status: Some(400),
                message: "code already exists".to_string(),
            });
        }
        Ok(())
    }

    async fn update(&self, _endpoint: &str, _id: &str, _draft: &EntityDraft) -> Result<(), ApiError> {
        Ok(())
    }

    async fn delete(&self, _endpoint: &str, _id: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn menus(&self) -> Result<Vec<Menu>, ApiError> {
        Err(ApiError::MissingCredential)
    }

    async fn profile(&self) -> Result<Profile, ApiError> {
        Ok(Profile {
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            role: "superuser".to_string(),
        })
    }
}

/// Poll the bridge until `want` events arrived or the deadline passed.
fn collect_events(bridge: &RuntimeBridge, want: usize, deadline: Duration) -> Vec<ApiEvent> {
    let start = Instant::now();
    let mut events = Vec::new();
    while events.len() < want && start.elapsed() < deadline {
        events.extend(bridge.poll_events());
        std::thread::sleep(Duration::from_millis(10));
    }
    events
}

fn fetch(seq: u64, page: u64, query: &str) -> ApiCommand {
    ApiCommand::FetchPage {
        seq,
        endpoint: "master/modules/".to_string(),
        page,
        page_size: 20,
        query: query.to_string(),
    }
}

#[test]
fn list_responses_echo_their_sequence_number() {
    let bridge = RuntimeBridge::new(Arc::new(StubApi));
    bridge.send(fetch(7, 3, "")).unwrap();

    let events = collect_events(&bridge, 1, Duration::from_secs(2));
    match events.as_slice() {
        [ApiEvent::PageLoaded { seq, rows, total_count }] => {
            assert_eq!(*seq, 7);
            assert_eq!(*total_count, 100);
            assert_eq!(rows[0].code, "P3");
        }
        other => panic!("expected one page event, got {other:?}"),
    }
}

#[test]
fn superseding_fetch_aborts_the_in_flight_one() {
    let bridge = RuntimeBridge::new(Arc::new(StubApi));
    bridge.send(fetch(1, 1, "slow")).unwrap();
    std::thread::sleep(Duration::from_millis(80));
    bridge.send(fetch(2, 2, "")).unwrap();

    // wait past the stalled call's duration; only the superseding fetch
    // may produce an event
    std::thread::sleep(Duration::from_millis(600));
    let events = bridge.poll_events();
    assert_eq!(events.len(), 1, "got {events:?}");
    match &events[0] {
        ApiEvent::PageLoaded { seq, rows, .. } => {
            assert_eq!(*seq, 2);
            assert_eq!(rows[0].code, "P2");
        }
        other => panic!("expected the page-2 event, got {other:?}"),
    }
}

#[test]
fn mutations_report_their_kind_and_outcome() {
    let bridge = RuntimeBridge::new(Arc::new(StubApi));

    let ok = EntityDraft {
        id: None,
        name: "Billing".to_string(),
        code: "BIL".to_string(),
        description: String::new(),
        active: true,
    };
    bridge
        .send(ApiCommand::Create {
            endpoint: "master/modules/".to_string(),
            draft: ok.clone(),
        })
        .unwrap();
    bridge
        .send(ApiCommand::Create {
            endpoint: "master/modules/".to_string(),
            draft: EntityDraft {
                code: "DUP".to_string(),
                ..ok
            },
        })
        .unwrap();
    bridge
        .send(ApiCommand::Delete {
            endpoint: "master/modules/".to_string(),
            id: "1".to_string(),
        })
        .unwrap();

    let events = collect_events(&bridge, 3, Duration::from_secs(2));
    assert!(matches!(
        events[0],
        ApiEvent::MutationDone {
            kind: MutationKind::Create
        }
    ));
    match &events[1] {
        ApiEvent::MutationFailed { kind, error } => {
            assert_eq!(*kind, MutationKind::Create);
            assert_eq!(error.to_string(), "code already exists");
        }
        other => panic!("expected a failed create, got {other:?}"),
    }
    assert!(matches!(
        events[2],
        ApiEvent::MutationDone {
            kind: MutationKind::Delete
        }
    ));
}

#[test]
fn shell_fetches_carry_their_own_error_channel() {
    let bridge = RuntimeBridge::new(Arc::new(StubApi));
    bridge.send(ApiCommand::FetchMenus).unwrap();
    bridge.send(ApiCommand::FetchProfile).unwrap();

    let events = collect_events(&bridge, 2, Duration::from_secs(2));
    assert!(matches!(
        events[0],
        ApiEvent::MenusFailed {
            error: ApiError::MissingCredential
        }
    ));
    match &events[1] {
        ApiEvent::ProfileLoaded { profile } => assert_eq!(profile.name, "Admin"),
        other => panic!("expected the profile, got {other:?}"),
    }
}
