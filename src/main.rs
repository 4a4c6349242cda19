use std::fs;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use steward::app::{App, Focus, InputMode};
use steward::config;
use steward::core::Action;
use steward::domain::table::SortColumn;
use steward::infrastructure::api::HttpEntityApi;
use steward::infrastructure::runtime::{ApiCommand, RuntimeBridge};
use steward::modules::form::FormState;
use steward::store::SessionStore;
use steward::ui;

#[derive(Debug, Parser)]
#[command(
    name = "steward",
    version,
    about = "Steward: a terminal console for the CRM admin API"
)]
struct Args {
    /// API base URL (e.g. https://crm.example.com/apis/v1/)
    #[arg(long)]
    base_url: Option<String>,

    /// Store this bearer token in the session before starting
    #[arg(long)]
    token: Option<String>,

    /// Rows requested per page
    #[arg(long)]
    page_size: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = config::load();
    if let Some(base_url) = args.base_url.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        config.base_url = base_url.to_string();
    }
    if let Some(page_size) = args.page_size.filter(|size| *size > 0) {
        config.page_size = page_size;
    }

    let token = load_token(&config, args.token.as_deref())?;
    let api = HttpEntityApi::new(&config.base_url, token)?;
    let bridge = RuntimeBridge::new(Arc::new(api));

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config);
    app.startup();

    let res = run_app(&mut terminal, app, bridge);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

/// Resolve the bearer token: a `--token` argument is persisted to the
/// session store first, then whatever the store holds is used.
fn load_token(config: &config::Config, cli_token: Option<&str>) -> Result<Option<String>> {
    let Some(db_path) = config::session_db_path(config) else {
        return Ok(cli_token.map(str::to_string));
    };
    if let Some(parent) = db_path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let store = SessionStore::open(&db_path)?;
    if let Some(token) = cli_token.map(str::trim).filter(|t| !t.is_empty()) {
        store.set_token(token)?;
    }
    store.token()
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    bridge: RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, &bridge);
        terminal.draw(|f| ui::draw(f, &mut app))?;
        if app.should_quit {
            let _ = bridge.send(ApiCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                handle_key(&mut app, key, Instant::now());
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick(Instant::now());
            last_tick = Instant::now();
        }

        pump_background(&mut app, &bridge);
    }
}

fn pump_background(app: &mut App, bridge: &RuntimeBridge) {
    for event in bridge.poll_events() {
        app.apply_event(event);
    }
    for command in app.take_commands() {
        let _ = bridge.send(command);
    }
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.help_open || app.profile_open {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Char('u') | KeyCode::Esc | KeyCode::Char('q')) {
            app.apply_action(Action::CloseOverlay);
        }
        return;
    }

    if app.form.is_open() {
        handle_form_key(app, key);
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Search => handle_search_mode(app, key, now),
        InputMode::Jump => handle_jump_mode(app, key),
    }
}

fn handle_form_key(app: &mut App, key: KeyEvent) {
    match app.form.state() {
        FormState::ConfirmingDelete => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.form_confirm_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.form.decline_delete(),
            _ => {}
        },
        FormState::Submitting => {
            // inputs are disabled while the request is in flight
            if key.code == KeyCode::Esc {
                app.form.close();
            }
        }
        _ => match key.code {
            KeyCode::Esc => app.form.close(),
            KeyCode::Enter => app.form_submit(),
            KeyCode::Tab | KeyCode::Down => app.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => app.form.focus_prev(),
            KeyCode::Backspace => app.form.backspace(),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.form.request_delete();
            }
            KeyCode::Char(' ') => {
                use steward::modules::form::FormField;
                if app.form.focus() == FormField::Active {
                    app.form.toggle_active();
                } else {
                    app.form.input(' ');
                }
            }
            KeyCode::Char(ch) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL) {
                    app.form.input(ch);
                }
            }
            _ => {}
        },
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.apply_action(Action::Quit),
        KeyCode::Char('?') => app.help_open = true,
        KeyCode::Char('u') => app.profile_open = true,
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::Sidebar => Focus::Table,
                Focus::Table => Focus::Sidebar,
            };
        }
        KeyCode::Char('/') => {
            if app.controller.is_some() {
                app.input_mode = InputMode::Search;
                app.focus = Focus::Table;
            }
        }
        KeyCode::Char('g') => {
            if app.controller.is_some() {
                app.input_mode = InputMode::Jump;
            }
        }
        KeyCode::Char('r') => {
            let table_errored = app
                .controller
                .as_ref()
                .is_some_and(|controller| controller.error_message().is_some());
            if table_errored {
                app.retry();
            } else {
                app.refresh();
            }
        }
        KeyCode::Char('R') => app.retry_menus(),
        KeyCode::Char('x') => app.export_visible(),
        KeyCode::Char('a') => app.open_create(),
        KeyCode::Char('e') => app.edit_selected(),
        KeyCode::Char('d') => app.delete_selected(),
        KeyCode::Char('h') | KeyCode::Left => app.prev_page(),
        KeyCode::Char('l') | KeyCode::Right => app.next_page(),
        KeyCode::Char('H') => app.first_page(),
        KeyCode::Char('L') => app.last_page(),
        KeyCode::Char('1') => app.sort(SortColumn::Code),
        KeyCode::Char('2') => app.sort(SortColumn::Name),
        KeyCode::Char('3') => app.sort(SortColumn::Description),
        KeyCode::Char('4') => app.sort(SortColumn::Active),
        KeyCode::Up | KeyCode::Char('k') => match app.focus {
            Focus::Sidebar => app.sidebar_up(),
            Focus::Table => app.table_up(),
        },
        KeyCode::Down | KeyCode::Char('j') => match app.focus {
            Focus::Sidebar => app.sidebar_down(),
            Focus::Table => app.table_down(),
        },
        KeyCode::Enter => match app.focus {
            Focus::Sidebar => app.select_sidebar_row(),
            Focus::Table => app.edit_selected(),
        },
        KeyCode::Esc => {
            if app.focus == Focus::Table {
                app.focus = Focus::Sidebar;
            }
        }
        _ => {}
    }
}

fn handle_search_mode(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Backspace => app.search_input_backspace(now),
        KeyCode::Char(ch) => {
            if !key.modifiers.contains(KeyModifiers::CONTROL) {
                app.search_input_char(ch, now);
            }
        }
        _ => {}
    }
}

fn handle_jump_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.jump_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => app.jump_submit(),
        KeyCode::Backspace => app.jump_input_backspace(),
        KeyCode::Char(ch) => app.jump_input_char(ch),
        _ => {}
    }
}
