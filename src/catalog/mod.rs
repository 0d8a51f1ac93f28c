//! Catalog renderer.
//!
//! Walks an outline and draws one row per visible node. Rows never own tree
//! state: they get a node value plus [`OutlineActions`] and report gestures
//! back through those callbacks.

mod item;

pub(crate) use item::CatalogTree;

use crate::config::IndentConfig;
use crate::outline::{NodeId, OutlineNode};
use leptos::prelude::*;

/// Callbacks a screen hands to its rows.
#[derive(Clone, Copy)]
pub(crate) struct OutlineActions {
    pub toggle: Callback<NodeId>,
    pub rename: Callback<(NodeId, String)>,
    /// `(parent_id, after_id)`; `None` parent means the root list.
    pub insert_sibling: Callback<(Option<NodeId>, NodeId)>,
    pub insert_child: Callback<NodeId>,
    pub delete: Callback<NodeId>,
    pub select: Callback<(NodeId, bool)>,
    pub set_word_count: Callback<(NodeId, Option<u32>)>,
    pub generate: Callback<NodeId>,
    pub activate: Callback<NodeId>,
}

/// Optional per-row affordances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct CatalogFlags {
    pub generate: bool,
    pub word_count: bool,
    pub batch: bool,
    pub edit_button: bool,
    pub structure: bool,
}

pub(crate) fn indent_px(level: u32, cfg: &IndentConfig) -> u32 {
    level * cfg.unit_px + cfg.base_px
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct VisibleRow {
    pub id: NodeId,
    pub title: String,
    pub level: u32,
    pub has_children: bool,
    pub expanded: bool,
    pub word_count: Option<u32>,
}

/// Rows in render order. Children of collapsed branches are skipped
/// entirely, not just hidden.
pub(crate) fn visible_rows(forest: &[OutlineNode]) -> Vec<VisibleRow> {
    fn walk(nodes: &[OutlineNode], out: &mut Vec<VisibleRow>) {
        for node in nodes {
            out.push(VisibleRow {
                id: node.id().clone(),
                title: node.title().to_string(),
                level: node.level(),
                has_children: node.has_children(),
                expanded: node.is_expanded(),
                word_count: node.word_count(),
            });
            if node.is_expanded() {
                walk(node.children(), out);
            }
        }
    }

    let mut out = Vec::new();
    walk(forest, &mut out);
    out
}

/// Inline title editing for one row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum TitleEdit {
    #[default]
    Viewing,
    Editing(String),
}

impl TitleEdit {
    pub fn begin(&mut self, current_title: &str) {
        *self = TitleEdit::Editing(current_title.to_string());
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, TitleEdit::Editing(_))
    }

    pub fn set_buffer(&mut self, value: String) {
        if let TitleEdit::Editing(buf) = self {
            *buf = value;
        }
    }

    /// Leaves edit mode. Yields the trimmed title unless it is blank or we
    /// were not editing (a late blur after Enter commits nothing).
    pub fn commit(&mut self) -> Option<String> {
        let TitleEdit::Editing(buf) = std::mem::take(self) else {
            return None;
        };
        let trimmed = buf.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn cancel(&mut self) {
        *self = TitleEdit::Viewing;
    }
}
