//! Application state for the TUI shell
//!
//! The app owns the sidebar menu tree, at most one table controller (one
//! per selected menu entry), the entity form, and the status line. Remote
//! effects are queued as [`ApiCommand`]s in an outbox the main loop drains
//! into the runtime bridge; worker events come back through
//! [`apply_event`](App::apply_event). Nothing here touches the network,
//! which keeps the whole shell drivable from tests.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::core::{Action, NotifyLevel};
use crate::domain::entity::EntityRecord;
use crate::domain::menu::{self, Menu, MenuRow};
use crate::domain::table::{FetchRequest, SearchMode, SortColumn, TableController};
use crate::infrastructure::api::Profile;
use crate::infrastructure::runtime::{ApiCommand, ApiEvent};
use crate::modules::export;
use crate::modules::form::{EntityForm, FormRequest};

/// Where keyboard focus currently lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Table,
}

/// Input modes layered over normal key handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the search box
    Search,
    /// Typing into the jump-to-page box
    Jump,
}

/// How long a status message stays on screen
const STATUS_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    level: NotifyLevel,
    at: Instant,
}

pub struct App {
    pub should_quit: bool,
    pub focus: Focus,
    pub input_mode: InputMode,
    pub help_open: bool,
    pub profile_open: bool,

    // sidebar
    pub menus: Vec<Menu>,
    pub menus_error: Option<String>,
    pub expanded: BTreeSet<String>,
    pub sidebar_cursor: usize,
    pub profile: Option<Profile>,

    // table
    pub controller: Option<TableController>,
    pub table_cursor: usize,
    pub search_input: String,
    pub jump_input: String,

    // form
    pub form: EntityForm,

    status: Option<StatusMessage>,
    page_size: u64,
    search_mode: SearchMode,
    base_url: String,

    /// Commands waiting to be forwarded to the runtime bridge
    pending: Vec<ApiCommand>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            should_quit: false,
            focus: Focus::Sidebar,
            input_mode: InputMode::Normal,
            help_open: false,
            profile_open: false,
            menus: Vec::new(),
            menus_error: None,
            expanded: BTreeSet::new(),
            sidebar_cursor: 0,
            profile: None,
            controller: None,
            table_cursor: 0,
            search_input: String::new(),
            jump_input: String::new(),
            form: EntityForm::new(),
            status: None,
            page_size: config.page_size,
            search_mode: config.search_mode,
            base_url: config.base_url.clone(),
            pending: Vec::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Queue the initial shell fetches
    pub fn startup(&mut self) {
        self.pending.push(ApiCommand::FetchMenus);
        self.pending.push(ApiCommand::FetchProfile);
    }

    /// Drain the command outbox; the main loop forwards these to the bridge
    pub fn take_commands(&mut self) -> Vec<ApiCommand> {
        std::mem::take(&mut self.pending)
    }

    // === Status line ===

    pub fn set_status(&mut self, text: impl Into<String>, level: NotifyLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            at: Instant::now(),
        });
    }

    pub fn status(&self) -> Option<(&str, NotifyLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::Notify(text, level) => self.set_status(text, level),
            Action::CloseOverlay => {
                self.help_open = false;
                self.profile_open = false;
            }
            Action::Quit => self.should_quit = true,
        }
    }

    /// Periodic housekeeping: expire the status line and fire any
    /// debounced search whose quiet period has elapsed.
    pub fn on_tick(&mut self, now: Instant) {
        if let Some(status) = &self.status {
            if now.duration_since(status.at) >= STATUS_TTL {
                self.status = None;
            }
        }
        if let Some(controller) = self.controller.as_mut() {
            if let Some(request) = controller.poll_search(now) {
                self.table_cursor = 0;
                self.push_fetch(request);
            }
        }
    }

    // === Sidebar ===

    pub fn sidebar_rows(&self) -> Vec<MenuRow> {
        menu::visible_rows(&self.menus, &self.expanded)
    }

    pub fn sidebar_up(&mut self) {
        self.sidebar_cursor = self.sidebar_cursor.saturating_sub(1);
    }

    pub fn sidebar_down(&mut self) {
        let len = self.sidebar_rows().len();
        if len > 0 && self.sidebar_cursor + 1 < len {
            self.sidebar_cursor += 1;
        }
    }

    /// Enter on a sidebar row: toggle a branch, or open a leaf's table
    pub fn select_sidebar_row(&mut self) {
        let rows = self.sidebar_rows();
        let Some(row) = rows.get(self.sidebar_cursor) else {
            return;
        };
        if !row.is_leaf {
            let id = row.id.clone();
            if !self.expanded.remove(&id) {
                self.expanded.insert(id);
            }
            return;
        }
        let Some(entry) = menu::find(&self.menus, &row.id) else {
            return;
        };
        let mut controller = TableController::new(
            entry.fetch_path(),
            &entry.title,
            self.page_size,
            self.search_mode,
        );
        let request = controller.load();
        self.controller = Some(controller);
        self.table_cursor = 0;
        self.search_input.clear();
        self.focus = Focus::Table;
        self.push_fetch(request);
    }

    // === Table ===

    pub fn visible_len(&self) -> usize {
        self.controller
            .as_ref()
            .map(|controller| controller.visible_rows().len())
            .unwrap_or(0)
    }

    pub fn table_up(&mut self) {
        self.table_cursor = self.table_cursor.saturating_sub(1);
    }

    pub fn table_down(&mut self) {
        let len = self.visible_len();
        if len > 0 && self.table_cursor + 1 < len {
            self.table_cursor += 1;
        }
    }

    pub fn selected_record(&self) -> Option<&EntityRecord> {
        let controller = self.controller.as_ref()?;
        controller
            .visible_rows()
            .get(self.table_cursor)
            .copied()
    }

    fn push_fetch(&mut self, request: FetchRequest) {
        self.pending.push(ApiCommand::FetchPage {
            seq: request.seq,
            endpoint: request.endpoint,
            page: request.page,
            page_size: request.page_size,
            query: request.query,
        });
    }

    pub fn refresh(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            let request = controller.refresh();
            self.push_fetch(request);
        }
    }

    pub fn retry(&mut self) {
        if let Some(request) = self.controller.as_mut().and_then(TableController::retry) {
            self.push_fetch(request);
        }
    }

    /// Re-request the sidebar menu tree after a failed shell fetch
    pub fn retry_menus(&mut self) {
        self.menus_error = None;
        self.pending.push(ApiCommand::FetchMenus);
    }

    pub fn sort(&mut self, column: SortColumn) {
        if let Some(controller) = self.controller.as_mut() {
            controller.sort_by(column);
        }
    }

    pub fn first_page(&mut self) {
        self.page_move(TableController::first_page);
    }

    pub fn prev_page(&mut self) {
        self.page_move(TableController::prev_page);
    }

    pub fn next_page(&mut self) {
        self.page_move(TableController::next_page);
    }

    pub fn last_page(&mut self) {
        self.page_move(TableController::last_page);
    }

    fn page_move(&mut self, mover: fn(&mut TableController) -> Option<FetchRequest>) {
        if let Some(request) = self.controller.as_mut().and_then(mover) {
            self.table_cursor = 0;
            self.push_fetch(request);
        }
    }

    // === Search and jump input ===

    pub fn search_input_char(&mut self, ch: char, now: Instant) {
        self.search_input.push(ch);
        self.feed_search(now);
    }

    pub fn search_input_backspace(&mut self, now: Instant) {
        self.search_input.pop();
        self.feed_search(now);
    }

    fn feed_search(&mut self, now: Instant) {
        if let Some(controller) = self.controller.as_mut() {
            controller.set_search_term(&self.search_input, now);
        }
    }

    pub fn jump_input_char(&mut self, ch: char) {
        if ch.is_ascii_digit() {
            self.jump_input.push(ch);
        }
    }

    pub fn jump_input_backspace(&mut self) {
        self.jump_input.pop();
    }

    /// Dispatch the jump-to-page box; invalid input is a silent no-op
    pub fn jump_submit(&mut self) {
        let input = std::mem::take(&mut self.jump_input);
        if let Some(request) = self
            .controller
            .as_mut()
            .and_then(|controller| controller.jump(&input))
        {
            self.table_cursor = 0;
            self.push_fetch(request);
        }
        self.input_mode = InputMode::Normal;
    }

    // === Form ===

    pub fn open_create(&mut self) {
        if self.controller.is_some() {
            self.form.open_create();
        }
    }

    pub fn edit_selected(&mut self) {
        let Some(record) = self.selected_record().cloned() else {
            return;
        };
        self.form.open_edit(&record);
    }

    /// 'd' on a row: open the record and go straight to the confirm prompt
    pub fn delete_selected(&mut self) {
        let Some(record) = self.selected_record().cloned() else {
            return;
        };
        self.form.open_edit(&record);
        self.form.request_delete();
    }

    pub fn form_submit(&mut self) {
        let endpoint = match self.controller.as_ref() {
            Some(controller) => controller.endpoint().to_string(),
            None => return,
        };
        match self.form.submit() {
            Ok(request) => self.push_form_request(&endpoint, request),
            Err(error) => self.set_status(error.to_string(), NotifyLevel::Error),
        }
    }

    pub fn form_confirm_delete(&mut self) {
        let endpoint = match self.controller.as_ref() {
            Some(controller) => controller.endpoint().to_string(),
            None => return,
        };
        if let Some(request) = self.form.confirm_delete() {
            self.push_form_request(&endpoint, request);
        }
    }

    fn push_form_request(&mut self, endpoint: &str, request: FormRequest) {
        let command = match request {
            FormRequest::Create { draft } => ApiCommand::Create {
                endpoint: endpoint.to_string(),
                draft,
            },
            FormRequest::Update { id, draft } => ApiCommand::Update {
                endpoint: endpoint.to_string(),
                id,
                draft,
            },
            FormRequest::Delete { id } => ApiCommand::Delete {
                endpoint: endpoint.to_string(),
                id,
            },
        };
        self.pending.push(command);
    }

    // === Export ===

    pub fn export_visible(&mut self) {
        let action = match self.controller.as_ref() {
            Some(controller) => export::export_rows(controller.title(), &controller.visible_rows()),
            None => Action::Notify("No table selected".to_string(), NotifyLevel::Warn),
        };
        self.apply_action(action);
    }

    // === Worker events ===

    pub fn apply_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::PageLoaded {
                seq,
                rows,
                total_count,
            } => {
                if let Some(controller) = self.controller.as_mut() {
                    if controller.apply_loaded(seq, rows, total_count) {
                        self.clamp_table_cursor();
                    }
                }
            }
            ApiEvent::PageFailed { seq, error } => {
                let applied = self
                    .controller
                    .as_mut()
                    .is_some_and(|controller| controller.apply_failed(seq, error.clone()));
                if applied {
                    self.table_cursor = 0;
                    self.set_status(error.to_string(), NotifyLevel::Error);
                }
            }
            ApiEvent::MutationDone { kind } => {
                // the server state changed even if the modal was closed
                // while the request was in flight; always re-fetch
                self.form.apply_result(kind, Ok(()));
                self.set_status(format!("Record {}", kind.done_verb()), NotifyLevel::Info);
                self.refresh();
            }
            ApiEvent::MutationFailed { kind, error } => {
                self.form.apply_result(kind, Err(error.clone()));
                self.set_status(error.to_string(), NotifyLevel::Error);
            }
            ApiEvent::MenusLoaded { menus } => {
                self.menus = menus;
                self.menus_error = None;
                self.sidebar_cursor = 0;
            }
            ApiEvent::MenusFailed { error } => {
                self.menus_error = Some(error.to_string());
                self.set_status(error.to_string(), NotifyLevel::Error);
            }
            ApiEvent::ProfileLoaded { profile } => {
                self.profile = Some(profile);
            }
            ApiEvent::ProfileFailed { error } => {
                self.set_status(error.to_string(), NotifyLevel::Warn);
            }
        }
    }

    fn clamp_table_cursor(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            self.table_cursor = 0;
        } else if self.table_cursor >= len {
            self.table_cursor = len - 1;
        }
    }
}
