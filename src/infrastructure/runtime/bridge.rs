//! Runtime bridge - connects the sync TUI thread with the async Tokio runtime
//!
//! The TUI never awaits anything: it pushes [`ApiCommand`]s into the bridge
//! and drains [`ApiEvent`]s every tick. The worker thread owns the HTTP
//! client and the Tokio runtime.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use tokio::runtime::Runtime;

use crate::domain::entity::{EntityDraft, EntityRecord};
use crate::domain::menu::Menu;
use crate::infrastructure::api::{ApiError, EntityApi, Profile};
use crate::infrastructure::runtime::worker::run_worker;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum ApiCommand {
    /// Sequence-tagged list fetch; supersedes (and aborts) any in-flight
    /// list fetch
    FetchPage {
        seq: u64,
        endpoint: String,
        page: u64,
        page_size: u64,
        query: String,
    },
    /// Create a record from a form draft
    Create { endpoint: String, draft: EntityDraft },
    /// Update an existing record
    Update {
        endpoint: String,
        id: String,
        draft: EntityDraft,
    },
    /// Delete a record (confirmation already happened UI-side)
    Delete { endpoint: String, id: String },
    /// Fetch the sidebar menu tree
    FetchMenus,
    /// Fetch the signed-in user's profile
    FetchProfile,
    /// Shutdown the worker
    Shutdown,
}

/// Which mutation a result refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    /// Past-tense verb for status messages
    pub fn done_verb(&self) -> &'static str {
        match self {
            MutationKind::Create => "created",
            MutationKind::Update => "updated",
            MutationKind::Delete => "deleted",
        }
    }
}

/// Events sent from the async worker back to the TUI
#[derive(Debug, Clone)]
pub enum ApiEvent {
    /// A page of rows arrived; `seq` echoes the originating request
    PageLoaded {
        seq: u64,
        rows: Vec<EntityRecord>,
        total_count: u64,
    },
    /// A list fetch failed
    PageFailed { seq: u64, error: ApiError },
    /// A create/update/delete succeeded
    MutationDone { kind: MutationKind },
    /// A create/update/delete failed
    MutationFailed { kind: MutationKind, error: ApiError },
    /// Sidebar menu tree arrived
    MenusLoaded { menus: Vec<Menu> },
    MenusFailed { error: ApiError },
    /// User profile arrived
    ProfileLoaded { profile: Profile },
    ProfileFailed { error: ApiError },
}

/// Bridge between the sync TUI thread and the async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: Sender<ApiCommand>,
    evt_rx: Receiver<ApiEvent>,
}

impl RuntimeBridge {
    /// Spawn the worker thread with its own Tokio runtime
    pub fn new(api: Arc<dyn EntityApi>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<ApiCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<ApiEvent>();

        thread::spawn(move || {
            let rt = Runtime::new().expect("Failed to create Tokio runtime");
            rt.block_on(run_worker(api, cmd_rx, evt_tx));
        });

        Self { cmd_tx, evt_rx }
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: ApiCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<ApiEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.evt_rx.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(ApiCommand::Shutdown);
    }
}
