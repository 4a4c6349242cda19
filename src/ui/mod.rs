use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap,
};
use ratatui::Frame;

pub mod layout;

use crate::app::{App, Focus, InputMode};
use crate::core::NotifyLevel;
use crate::domain::pagination::PageItem;
use crate::domain::table::{LoadState, SortColumn, SortDirection};
use crate::modules::form::{FormField, FormState};

pub fn draw(f: &mut Frame, app: &mut App) {
    let areas = layout::areas(f.size());

    draw_header(f, areas.header, app);
    draw_sidebar(f, areas.sidebar, app);
    draw_search(f, areas.search, app);
    draw_table(f, areas.table, app);
    draw_pagination(f, areas.pagination, app);
    draw_status_line(f, areas.status_line, app);

    if app.form.is_open() {
        draw_form_popup(f, areas.size, app);
    }
    if app.profile_open {
        draw_profile_popup(f, areas.size, app);
    }
    if app.help_open {
        draw_help_popup(f, areas.size);
    }
}

fn border_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let title = app
        .controller
        .as_ref()
        .map(|controller| controller.title().to_string())
        .unwrap_or_else(|| "no table selected".to_string());
    let user = app
        .profile
        .as_ref()
        .map(|profile| profile.name.clone())
        .unwrap_or_else(|| "not signed in".to_string());

    let line = Line::from(vec![
        Span::styled(
            " steward ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(app.base_url().to_string(), Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled(user, Style::default().fg(Color::Green)),
    ]);

    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn draw_sidebar(f: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("MENU")
        .border_style(border_style(app.focus == Focus::Sidebar));

    if let Some(error) = &app.menus_error {
        let paragraph = Paragraph::new(format!("{error}\n\npress R to reload"))
            .block(block)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Red));
        f.render_widget(paragraph, area);
        return;
    }

    let rows = app.sidebar_rows();
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let marker = if row.is_leaf {
                "  "
            } else if row.expanded {
                "▾ "
            } else {
                "▸ "
            };
            let indent = "  ".repeat(row.depth);
            ListItem::new(format!("{indent}{marker}{}", row.title))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::Cyan)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default();
    if !rows.is_empty() {
        state.select(Some(app.sidebar_cursor.min(rows.len() - 1)));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_search(f: &mut Frame, area: Rect, app: &App) {
    let searching = app.input_mode == InputMode::Search;
    let mut spans = vec![Span::raw("search: ")];
    if app.search_input.is_empty() && !searching {
        spans.push(Span::styled(
            "press / to search",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(app.search_input.clone()));
        if searching {
            spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
        }
    }
    if app
        .controller
        .as_ref()
        .is_some_and(|controller| controller.is_loading())
    {
        spans.push(Span::styled(
            "  loading…",
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(searching)),
    );
    f.render_widget(paragraph, area);
}

fn draw_table(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app.focus == Focus::Table));

    let Some(controller) = app.controller.as_ref() else {
        let paragraph = Paragraph::new("Select a menu entry to load its table")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(paragraph, area);
        return;
    };

    match controller.state() {
        LoadState::Idle | LoadState::Loading => {
            let paragraph = Paragraph::new(format!("Loading {}…", controller.title()))
                .block(block)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Yellow));
            f.render_widget(paragraph, area);
        }
        LoadState::Errored(error) => {
            let text = format!("{error}\n\npress r to retry");
            let paragraph = Paragraph::new(text)
                .block(block.title("ERROR"))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(Color::Red));
            f.render_widget(paragraph, area);
        }
        LoadState::Loaded => draw_loaded_table(f, area, app, block),
    }
}

fn draw_loaded_table(f: &mut Frame, area: Rect, app: &App, block: Block) {
    let Some(controller) = app.controller.as_ref() else {
        return;
    };
    let visible = controller.visible_rows();

    if visible.is_empty() {
        let message = if controller.search_term().is_empty() {
            format!("No {} data available", controller.title().to_lowercase())
        } else {
            "No rows match the current search".to_string()
        };
        let paragraph = Paragraph::new(message)
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(paragraph, area);
        return;
    }

    let header_cells: Vec<Span> = SortColumn::ALL
        .iter()
        .map(|column| {
            let marker = match controller.sort() {
                Some(spec) if spec.column == *column => match spec.direction {
                    SortDirection::Asc => " ▲",
                    SortDirection::Desc => " ▼",
                },
                _ => "",
            };
            Span::styled(
                format!("{}{}", column.title(), marker),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        })
        .collect();

    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let status = if record.active { "Active" } else { "Inactive" };
            let status_style = if record.active {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            };
            let style = if index == app.table_cursor {
                Style::default().bg(Color::Rgb(40, 40, 40))
            } else {
                Style::default()
            };
            Row::new(vec![
                Span::raw(record.code.clone()),
                Span::raw(record.name.clone()),
                Span::raw(record.description.clone()),
                Span::styled(status, status_style),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            ratatui::layout::Constraint::Length(12),
            ratatui::layout::Constraint::Percentage(30),
            ratatui::layout::Constraint::Min(20),
            ratatui::layout::Constraint::Length(10),
        ],
    )
    .header(Row::new(header_cells).bottom_margin(1))
    .block(block);

    f.render_widget(table, area);
}

fn draw_pagination(f: &mut Frame, area: Rect, app: &App) {
    let Some(controller) = app.controller.as_ref() else {
        f.render_widget(Paragraph::new(""), area);
        return;
    };
    let pages = controller.pages();
    let current = pages.current();

    let mut spans = vec![Span::styled("« ‹ ", Style::default().fg(Color::DarkGray))];
    for item in controller.page_window() {
        match item {
            PageItem::Ellipsis => {
                spans.push(Span::styled("… ", Style::default().fg(Color::DarkGray)));
            }
            PageItem::Page(page) if page == current => {
                spans.push(Span::styled(
                    format!("[{page}] "),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ));
            }
            PageItem::Page(page) => {
                spans.push(Span::raw(format!("{page} ")));
            }
        }
    }
    spans.push(Span::styled("› »", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled(
        format!(
            "   page {}/{} · {} records",
            current,
            pages.total_pages(),
            pages.total_count()
        ),
        Style::default().fg(Color::DarkGray),
    ));
    if app.input_mode == InputMode::Jump {
        spans.push(Span::styled(
            format!("   go to page: {}█", app.jump_input),
            Style::default().fg(Color::Cyan),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.status() {
        Some((text, level)) => {
            let color = match level {
                NotifyLevel::Info => Color::Green,
                NotifyLevel::Warn => Color::Yellow,
                NotifyLevel::Error => Color::Red,
            };
            Line::from(Span::styled(format!(" {text}"), Style::default().fg(color)))
        }
        None => Line::from(Span::styled(
            " tab focus · / search · g goto · n/p page · 1-4 sort · a add · e edit · d delete · r refresh · x export · ? help · q quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_form_popup(f: &mut Frame, area: Rect, app: &App) {
    let popup = layout::centered_rect(52, 14, area);
    f.render_widget(Clear, popup);

    let draft = app.form.draft();
    let mut lines: Vec<Line> = vec![Line::raw("")];

    for field in FormField::ALL {
        let focused = app.form.focus() == field && app.form.state() == FormState::Editing;
        let value = match field {
            FormField::Name => draft.name.clone(),
            FormField::Code => draft.code.clone(),
            FormField::Description => draft.description.clone(),
            FormField::Active => {
                if draft.active {
                    "[x] active".to_string()
                } else {
                    "[ ] inactive".to_string()
                }
            }
        };
        let cursor = if focused && field != FormField::Active {
            "█"
        } else {
            ""
        };
        let style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<13}", field.label()), Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{value}{cursor}"), style),
        ]));
    }

    lines.push(Line::raw(""));
    match app.form.state() {
        FormState::ConfirmingDelete => {
            lines.push(Line::from(Span::styled(
                "  Delete this record? y / n",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        FormState::Submitting => {
            lines.push(Line::from(Span::styled(
                "  saving…",
                Style::default().fg(Color::Yellow),
            )));
        }
        _ => {
            if let Some(error) = app.form.error() {
                lines.push(Line::from(Span::styled(
                    format!("  {error}"),
                    Style::default().fg(Color::Red),
                )));
            } else {
                lines.push(Line::from(Span::styled(
                    "  tab next · space toggle · enter save · ctrl-d delete · esc cancel",
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.form.mode().title())
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Paragraph::new(lines).block(block), popup);
}

fn draw_profile_popup(f: &mut Frame, area: Rect, app: &App) {
    let popup = layout::centered_rect(44, 8, area);
    f.render_widget(Clear, popup);

    let text = match &app.profile {
        Some(profile) => format!(
            "\n  {}\n  {}\n  {}",
            profile.name, profile.email, profile.role
        ),
        None => "\n  profile not loaded".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title("PROFILE")
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Paragraph::new(text).block(block), popup);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup = layout::centered_rect(56, 18, area);
    f.render_widget(Clear, popup);

    let text = "\n  tab        switch focus sidebar/table\n  enter      open menu entry / submit\n  j/k ↑/↓    move cursor\n  /          search (debounced)\n  g          jump to page\n  h/l        previous/next page\n  H/L        first/last page\n  1-4        sort by column\n  a          add record\n  e          edit selected\n  d          delete selected\n  r          refresh / retry\n  x          export page to CSV\n  u          profile\n  q          quit";
    let block = Block::default()
        .borders(Borders::ALL)
        .title("HELP")
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Paragraph::new(text).block(block), popup);
}
