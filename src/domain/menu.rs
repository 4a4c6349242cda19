//! Navigation menu tree supplied by the shell API

use std::collections::BTreeSet;

use serde::Deserialize;

/// One sidebar entry. Leaves carry the endpoint path their data table
/// fetches from; the table controller only ever sees `{endpoint, title}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Menu {
    #[serde(rename = "public_secret")]
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub icon: String,

    /// Entity endpoint path relative to the API base, e.g. "master/modules/"
    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub submenus: Vec<Menu>,
}

impl Menu {
    pub fn is_leaf(&self) -> bool {
        self.submenus.is_empty()
    }

    /// Endpoint the table fetches from; older API payloads omit the
    /// explicit endpoint field and address entities by title.
    pub fn fetch_path(&self) -> &str {
        if self.endpoint.is_empty() {
            &self.title
        } else {
            &self.endpoint
        }
    }
}

/// One visible sidebar row after expand/collapse is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuRow {
    pub id: String,
    pub title: String,
    pub depth: usize,
    pub is_leaf: bool,
    pub expanded: bool,
}

/// Flatten the tree into the rows the sidebar shows: children are visible
/// only while their parent's id is in `expanded`.
pub fn visible_rows(menus: &[Menu], expanded: &BTreeSet<String>) -> Vec<MenuRow> {
    let mut rows = Vec::new();
    for menu in menus {
        push_rows(menu, 0, expanded, &mut rows);
    }
    rows
}

fn push_rows(menu: &Menu, depth: usize, expanded: &BTreeSet<String>, rows: &mut Vec<MenuRow>) {
    let is_open = expanded.contains(&menu.id);
    rows.push(MenuRow {
        id: menu.id.clone(),
        title: menu.title.clone(),
        depth,
        is_leaf: menu.is_leaf(),
        expanded: is_open,
    });
    if is_open {
        for child in &menu.submenus {
            push_rows(child, depth + 1, expanded, rows);
        }
    }
}

/// Look a menu up by id anywhere in the tree
pub fn find<'a>(menus: &'a [Menu], id: &str) -> Option<&'a Menu> {
    for menu in menus {
        if menu.id == id {
            return Some(menu);
        }
        if let Some(found) = find(&menu.submenus, id) {
            return Some(found);
        }
    }
    None
}
