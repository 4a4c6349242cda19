//! Async worker - executes API commands on the Tokio runtime
//!
//! List fetches run as spawned tasks; a superseding `FetchPage` aborts the
//! previous in-flight task, and every response carries its sequence number
//! so the controller can discard any straggler that still slipped through.
//! Mutations and shell fetches are short and are awaited inline.

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::infrastructure::api::EntityApi;
use crate::infrastructure::runtime::bridge::{ApiCommand, ApiEvent, MutationKind};

/// Run the worker loop until shutdown or channel close
pub async fn run_worker(
    api: Arc<dyn EntityApi>,
    cmd_rx: Receiver<ApiCommand>,
    evt_tx: Sender<ApiEvent>,
) {
    let mut in_flight: Option<JoinHandle<()>> = None;

    loop {
        // the command channel is a std mpsc shared with the TUI thread;
        // poll it at the UI tick cadence instead of blocking the runtime
        let cmd = match cmd_rx.try_recv() {
            Ok(cmd) => cmd,
            Err(TryRecvError::Empty) => {
                tokio::time::sleep(Duration::from_millis(20)).await;
                continue;
            }
            Err(TryRecvError::Disconnected) => break,
        };

        match cmd {
            ApiCommand::Shutdown => break,

            ApiCommand::FetchPage {
                seq,
                endpoint,
                page,
                page_size,
                query,
            } => {
                if let Some(handle) = in_flight.take() {
                    handle.abort();
                }
                let api = Arc::clone(&api);
                let evt_tx = evt_tx.clone();
                in_flight = Some(tokio::spawn(async move {
                    let event = match api.list(&endpoint, page, page_size, &query).await {
                        Ok(page) => ApiEvent::PageLoaded {
                            seq,
                            rows: page.rows,
                            total_count: page.total_count,
                        },
                        Err(error) => ApiEvent::PageFailed { seq, error },
                    };
                    let _ = evt_tx.send(event);
                }));
            }

            ApiCommand::Create { endpoint, draft } => {
                let result = api.create(&endpoint, &draft).await;
                let _ = evt_tx.send(mutation_event(MutationKind::Create, result));
            }

            ApiCommand::Update { endpoint, id, draft } => {
                let result = api.update(&endpoint, &id, &draft).await;
                let _ = evt_tx.send(mutation_event(MutationKind::Update, result));
            }

            ApiCommand::Delete { endpoint, id } => {
                let result = api.delete(&endpoint, &id).await;
                let _ = evt_tx.send(mutation_event(MutationKind::Delete, result));
            }

            ApiCommand::FetchMenus => {
                let event = match api.menus().await {
                    Ok(menus) => ApiEvent::MenusLoaded { menus },
                    Err(error) => ApiEvent::MenusFailed { error },
                };
                let _ = evt_tx.send(event);
            }

            ApiCommand::FetchProfile => {
                let event = match api.profile().await {
                    Ok(profile) => ApiEvent::ProfileLoaded { profile },
                    Err(error) => ApiEvent::ProfileFailed { error },
                };
                let _ = evt_tx.send(event);
            }
        }
    }

    if let Some(handle) = in_flight.take() {
        handle.abort();
    }
}

fn mutation_event(
    kind: MutationKind,
    result: Result<(), crate::infrastructure::api::ApiError>,
) -> ApiEvent {
    match result {
        Ok(()) => ApiEvent::MutationDone { kind },
        Err(error) => ApiEvent::MutationFailed { kind, error },
    }
}
