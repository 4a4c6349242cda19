//! End-to-end shell flows driven through App's command outbox and event
//! pump, with worker responses played back as synthetic events.

use std::time::{Duration, Instant};

use steward::app::{App, Focus};
use steward::config::Config;
use steward::core::Action;
use steward::domain::entity::EntityRecord;
use steward::domain::menu::Menu;
use steward::infrastructure::api::ApiError;
use steward::infrastructure::runtime::{ApiCommand, ApiEvent, MutationKind};
use steward::modules::form::FormState;

fn leaf_menu(id: &str, title: &str, endpoint: &str) -> Menu {
    Menu {
        id: id.to_string(),
        title: title.to_string(),
        icon: String::new(),
        endpoint: endpoint.to_string(),
        submenus: Vec::new(),
    }
}

fn record(id: &str, code: &str, name: &str) -> EntityRecord {
    EntityRecord {
        id: id.to_string(),
        code: code.to_string(),
        name: name.to_string(),
        description: String::new(),
        active: true,
    }
}

/// App with the menu tree loaded and the Modules table selected; returns
/// the sequence number of the initial page fetch.
fn app_with_modules_table() -> (App, u64) {
    let mut app = App::new(&Config::default());
    app.startup();
    let startup = app.take_commands();
    assert!(matches!(startup[0], ApiCommand::FetchMenus));
    assert!(matches!(startup[1], ApiCommand::FetchProfile));

    app.apply_event(ApiEvent::MenusLoaded {
        menus: vec![leaf_menu("m1", "Modules", "master/modules/")],
    });
    app.select_sidebar_row();

    let commands = app.take_commands();
    let seq = match commands.as_slice() {
        [ApiCommand::FetchPage { seq, endpoint, page, .. }] => {
            assert_eq!(endpoint, "master/modules/");
            assert_eq!(*page, 1);
            *seq
        }
        other => panic!("expected one page fetch, got {other:?}"),
    };
    (app, seq)
}

#[test]
fn selecting_a_menu_entry_loads_its_table() {
    let (mut app, seq) = app_with_modules_table();
    assert_eq!(app.focus, Focus::Table);

    app.apply_event(ApiEvent::PageLoaded {
        seq,
        rows: vec![record("1", "M1", "Alpha"), record("2", "M2", "Beta")],
        total_count: 2,
    });
    assert_eq!(app.visible_len(), 2);
    assert_eq!(app.selected_record().map(|r| r.code.as_str()), Some("M1"));
}

#[test]
fn create_flow_submits_then_refreshes_on_success() {
    let (mut app, seq) = app_with_modules_table();
    app.apply_event(ApiEvent::PageLoaded {
        seq,
        rows: vec![record("1", "M1", "Alpha")],
        total_count: 1,
    });

    app.open_create();
    for ch in "Billing".chars() {
        app.form.input(ch);
    }
    app.form.focus_next(); // code
    for ch in "BIL".chars() {
        app.form.input(ch);
    }
    app.form_submit();

    let commands = app.take_commands();
    match commands.as_slice() {
        [ApiCommand::Create { endpoint, draft }] => {
            assert_eq!(endpoint, "master/modules/");
            assert_eq!(draft.name, "Billing");
            assert_eq!(draft.code, "BIL");
        }
        other => panic!("expected one create, got {other:?}"),
    }

    app.apply_event(ApiEvent::MutationDone {
        kind: MutationKind::Create,
    });
    assert!(!app.form.is_open());

    // success triggers a re-fetch of the current page
    let commands = app.take_commands();
    assert!(
        matches!(commands.as_slice(), [ApiCommand::FetchPage { page: 1, .. }]),
        "expected a refresh fetch, got {commands:?}"
    );
}

#[test]
fn success_after_escaping_the_form_still_refreshes() {
    let (mut app, seq) = app_with_modules_table();
    app.apply_event(ApiEvent::PageLoaded {
        seq,
        rows: vec![record("1", "M1", "Alpha")],
        total_count: 1,
    });

    app.edit_selected();
    app.form_submit();
    app.take_commands();

    // the modal is dismissed while the update is still in flight; the
    // server state changed regardless, so the table must re-fetch
    app.form.close();
    app.apply_event(ApiEvent::MutationDone {
        kind: MutationKind::Update,
    });

    let commands = app.take_commands();
    assert!(
        matches!(commands.as_slice(), [ApiCommand::FetchPage { page: 1, .. }]),
        "successful mutation produced no refresh: {commands:?}"
    );
    assert!(!app.form.is_open());
}

#[test]
fn actions_drive_overlay_close_and_quit() {
    let mut app = App::new(&Config::default());
    app.help_open = true;
    app.profile_open = true;

    app.apply_action(Action::CloseOverlay);
    assert!(!app.help_open);
    assert!(!app.profile_open);

    app.apply_action(Action::Quit);
    assert!(app.should_quit);
}

#[test]
fn failed_mutation_keeps_the_form_open_without_refreshing() {
    let (mut app, seq) = app_with_modules_table();
    app.apply_event(ApiEvent::PageLoaded {
        seq,
        rows: vec![record("1", "M1", "Alpha")],
        total_count: 1,
    });

    app.edit_selected();
    app.form_submit();
    app.take_commands();

    app.apply_event(ApiEvent::MutationFailed {
        kind: MutationKind::Update,
        error: ApiError::Rejected {
            status: Some(400),
            message: "code already exists".to_string(),
        },
    });
    assert_eq!(app.form.state(), FormState::Editing);
    assert!(app.take_commands().is_empty());
}

#[test]
fn declined_delete_sends_nothing() {
    let (mut app, seq) = app_with_modules_table();
    app.apply_event(ApiEvent::PageLoaded {
        seq,
        rows: vec![record("1", "M1", "Alpha")],
        total_count: 1,
    });

    app.delete_selected();
    assert_eq!(app.form.state(), FormState::ConfirmingDelete);
    app.form.decline_delete();
    assert!(app.take_commands().is_empty());

    // confirming produces exactly one delete command
    app.delete_selected();
    app.form_confirm_delete();
    let commands = app.take_commands();
    match commands.as_slice() {
        [ApiCommand::Delete { endpoint, id }] => {
            assert_eq!(endpoint, "master/modules/");
            assert_eq!(id, "1");
        }
        other => panic!("expected one delete, got {other:?}"),
    }
}

#[test]
fn typed_search_fetches_once_after_the_quiet_period() {
    let (mut app, seq) = app_with_modules_table();
    app.apply_event(ApiEvent::PageLoaded {
        seq,
        rows: vec![record("1", "M1", "Alpha")],
        total_count: 1,
    });

    let start = Instant::now();
    app.search_input_char('a', start);
    app.search_input_char('l', start + Duration::from_millis(200));

    app.on_tick(start + Duration::from_millis(400));
    assert!(app.take_commands().is_empty(), "debounce fired early");

    app.on_tick(start + Duration::from_millis(800));
    let commands = app.take_commands();
    assert!(
        matches!(commands.as_slice(), [ApiCommand::FetchPage { page: 1, .. }]),
        "expected the debounced fetch, got {commands:?}"
    );

    // one fetch per committed term
    app.on_tick(start + Duration::from_secs(3));
    assert!(app.take_commands().is_empty());
}

#[test]
fn stale_page_responses_do_not_disturb_the_latest_request() {
    let (mut app, first_seq) = app_with_modules_table();
    app.apply_event(ApiEvent::PageLoaded {
        seq: first_seq,
        rows: (0..40)
            .map(|i| record(&i.to_string(), &format!("M{i}"), &format!("Mod {i}")))
            .collect(),
        total_count: 40,
    });

    app.next_page();
    let second_seq = match app.take_commands().as_slice() {
        [ApiCommand::FetchPage { seq, page: 2, .. }] => *seq,
        other => panic!("expected a page-2 fetch, got {other:?}"),
    };

    // newest response lands first; the stale one must be dropped
    app.apply_event(ApiEvent::PageLoaded {
        seq: second_seq,
        rows: vec![record("n", "NEW", "Newest")],
        total_count: 40,
    });
    app.apply_event(ApiEvent::PageLoaded {
        seq: first_seq,
        rows: vec![record("s", "OLD", "Stale")],
        total_count: 40,
    });

    assert_eq!(
        app.selected_record().map(|r| r.code.as_str()),
        Some("NEW")
    );

    // a stale failure cannot overwrite the loaded page either
    app.apply_event(ApiEvent::PageFailed {
        seq: first_seq,
        error: ApiError::Transport("timeout".to_string()),
    });
    assert_eq!(app.visible_len(), 1);
}

#[test]
fn failed_menu_fetch_surfaces_and_can_be_retried() {
    let mut app = App::new(&Config::default());
    app.startup();
    app.take_commands();

    app.apply_event(ApiEvent::MenusFailed {
        error: ApiError::MissingCredential,
    });
    assert!(app.menus_error.is_some());

    app.retry_menus();
    assert!(app.menus_error.is_none());
    let commands = app.take_commands();
    assert!(matches!(commands.as_slice(), [ApiCommand::FetchMenus]));
}

#[test]
fn branch_menus_toggle_instead_of_fetching() {
    let mut app = App::new(&Config::default());
    app.apply_event(ApiEvent::MenusLoaded {
        menus: vec![Menu {
            id: "root".to_string(),
            title: "Masters".to_string(),
            icon: String::new(),
            endpoint: String::new(),
            submenus: vec![leaf_menu("m1", "Modules", "master/modules/")],
        }],
    });

    assert_eq!(app.sidebar_rows().len(), 1);
    app.select_sidebar_row();
    assert_eq!(app.sidebar_rows().len(), 2);
    assert!(app.take_commands().is_empty());

    // selecting the revealed leaf opens its table
    app.sidebar_down();
    app.select_sidebar_row();
    assert!(app.controller.is_some());
    assert!(matches!(
        app.take_commands().as_slice(),
        [ApiCommand::FetchPage { .. }]
    ));
}
