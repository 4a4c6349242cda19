//! Data table controller - an explicit fetch state machine
//!
//! One controller instance exclusively owns the row list and pagination
//! state for a single menu entry. All remote effects are expressed as
//! sequence-tagged [`FetchRequest`] values that the caller forwards to the
//! runtime worker; responses come back through `apply_loaded`/`apply_failed`
//! and stale sequence numbers are discarded, so the last *request* wins
//! regardless of network ordering.

use std::cmp::Ordering;
use std::time::Instant;

use serde::Deserialize;

use crate::domain::entity::EntityRecord;
use crate::domain::pagination::{self, PageItem, PageState};
use crate::domain::search::Debouncer;
use crate::infrastructure::api::ApiError;

/// How the search term is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Narrow only the fetched page client-side; the term is never sent to
    /// the server.
    #[default]
    Local,
    /// Send the term as a query parameter so the server paginates over the
    /// filtered set.
    Server,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Sortable table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Code,
    Name,
    Description,
    Active,
}

impl SortColumn {
    pub const ALL: [SortColumn; 4] = [
        SortColumn::Code,
        SortColumn::Name,
        SortColumn::Description,
        SortColumn::Active,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SortColumn::Code => "Code",
            SortColumn::Name => "Name",
            SortColumn::Description => "Description",
            SortColumn::Active => "Status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

/// Fetch lifecycle for the visible page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Errored(ApiError),
}

/// A sequence-tagged list request for the runtime worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub endpoint: String,
    pub page: u64,
    pub page_size: u64,
    /// Search term sent to the server; always empty in local mode
    pub query: String,
}

/// Remote-data table state for one `{endpoint, title}` menu entry
pub struct TableController {
    endpoint: String,
    title: String,
    mode: SearchMode,
    state: LoadState,
    rows: Vec<EntityRecord>,
    pages: PageState,
    debounce: Debouncer,
    sort: Option<SortSpec>,
    seq: u64,
    last_request: Option<FetchRequest>,
}

impl TableController {
    pub fn new(endpoint: &str, title: &str, page_size: u64, mode: SearchMode) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            title: title.to_string(),
            mode,
            state: LoadState::Idle,
            rows: Vec::new(),
            pages: PageState::new(page_size),
            debounce: Debouncer::default(),
            sort: None,
            seq: 0,
            last_request: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn error_message(&self) -> Option<String> {
        match &self.state {
            LoadState::Errored(error) => Some(error.to_string()),
            _ => None,
        }
    }

    pub fn pages(&self) -> &PageState {
        &self.pages
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn search_term(&self) -> &str {
        self.debounce.committed()
    }

    pub fn last_seq(&self) -> u64 {
        self.seq
    }

    /// Initial fetch of page 1
    pub fn load(&mut self) -> FetchRequest {
        self.request(1)
    }

    fn request(&mut self, page: u64) -> FetchRequest {
        self.seq += 1;
        self.state = LoadState::Loading;
        let query = match self.mode {
            SearchMode::Server => self.debounce.committed().to_string(),
            SearchMode::Local => String::new(),
        };
        let request = FetchRequest {
            seq: self.seq,
            endpoint: self.endpoint.clone(),
            page,
            page_size: self.pages.page_size(),
            query,
        };
        self.last_request = Some(request.clone());
        request
    }

    /// Move to `page`; silent no-op when out of `[1, total_pages]`.
    pub fn set_page(&mut self, page: u64) -> Option<FetchRequest> {
        if !self.pages.set_current(page) {
            return None;
        }
        Some(self.request(page))
    }

    pub fn first_page(&mut self) -> Option<FetchRequest> {
        self.boundary_move(1)
    }

    pub fn prev_page(&mut self) -> Option<FetchRequest> {
        self.boundary_move(self.pages.current().saturating_sub(1))
    }

    pub fn next_page(&mut self) -> Option<FetchRequest> {
        self.boundary_move(self.pages.current() + 1)
    }

    pub fn last_page(&mut self) -> Option<FetchRequest> {
        self.boundary_move(self.pages.total_pages())
    }

    // first/prev/next/last are disabled at their boundary: moving to the
    // page we are already on is not a refresh
    fn boundary_move(&mut self, page: u64) -> Option<FetchRequest> {
        if page == self.pages.current() {
            return None;
        }
        self.set_page(page)
    }

    /// Jump-to-page input; anything invalid is a silent no-op
    pub fn jump(&mut self, input: &str) -> Option<FetchRequest> {
        let page = pagination::parse_jump(input, self.pages.total_pages())?;
        self.set_page(page)
    }

    /// Record a search keystroke; fetching waits for the debounce
    pub fn set_search_term(&mut self, term: &str, now: Instant) {
        self.debounce.input(term, now);
    }

    /// Emit a fetch once the debounce quiet period has elapsed. A changed
    /// term restarts pagination from page 1.
    pub fn poll_search(&mut self, now: Instant) -> Option<FetchRequest> {
        self.debounce.poll(now)?;
        self.pages.set_current(1);
        Some(self.request(1))
    }

    /// Unconditional re-fetch of the current page; drops any pending
    /// debounce so a half-typed term does not fire right after.
    pub fn refresh(&mut self) -> FetchRequest {
        self.debounce.cancel();
        self.request(self.pages.current())
    }

    /// Replay the last fetch (same page and query) under a fresh sequence
    /// number; used by the error panel's retry binding.
    pub fn retry(&mut self) -> Option<FetchRequest> {
        let last = self.last_request.clone()?;
        self.seq += 1;
        self.state = LoadState::Loading;
        let request = FetchRequest {
            seq: self.seq,
            ..last
        };
        self.last_request = Some(request.clone());
        Some(request)
    }

    /// Toggle direction on the active column, or switch column ascending.
    /// Reorders only the loaded page; never fetches.
    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort = Some(match self.sort {
            Some(spec) if spec.column == column => SortSpec {
                column,
                direction: spec.direction.flip(),
            },
            _ => SortSpec {
                column,
                direction: SortDirection::Asc,
            },
        });
        self.sort_rows();
    }

    fn sort_rows(&mut self) {
        let Some(SortSpec { column, direction }) = self.sort else {
            return;
        };
        self.rows.sort_by(|a, b| {
            let ordering = match column {
                SortColumn::Code => cmp_text(&a.code, &b.code),
                SortColumn::Name => cmp_text(&a.name, &b.name),
                SortColumn::Description => cmp_text(&a.description, &b.description),
                SortColumn::Active => a.active.cmp(&b.active),
            };
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    /// Apply a worker response. Returns false (state untouched) when the
    /// sequence number is not the latest issued.
    pub fn apply_loaded(&mut self, seq: u64, rows: Vec<EntityRecord>, total_count: u64) -> bool {
        if seq != self.seq {
            return false;
        }
        self.rows = rows;
        self.pages.set_total_count(total_count);
        self.state = LoadState::Loaded;
        self.sort_rows();
        true
    }

    /// Apply a worker failure: rows are cleared and the error kind stored.
    pub fn apply_failed(&mut self, seq: u64, error: ApiError) -> bool {
        if seq != self.seq {
            return false;
        }
        self.rows.clear();
        self.state = LoadState::Errored(error);
        true
    }

    /// Rows as the table shows them: in local mode the committed search
    /// term narrows the loaded page, in server mode the page is already
    /// filtered.
    pub fn visible_rows(&self) -> Vec<&EntityRecord> {
        match self.mode {
            SearchMode::Local if !self.debounce.committed().is_empty() => self
                .rows
                .iter()
                .filter(|row| row.matches(self.debounce.committed()))
                .collect(),
            _ => self.rows.iter().collect(),
        }
    }

    pub fn page_window(&self) -> Vec<PageItem> {
        self.pages.window()
    }
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
