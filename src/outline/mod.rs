//! Outline tree model.
//!
//! A bid outline is a forest of chapters and sections. Every edit is a pure
//! function: it borrows the current forest and returns the next one, so the
//! screen that owns the tree can replace it wholesale inside a signal.
//!
//! Unknown ids never fail an edit. The result is simply equal to the input.

mod ids;
mod selection;

pub(crate) use ids::{ClockIds, IdSource};
#[cfg(test)]
pub(crate) use ids::SequentialIds;
pub(crate) use selection::Selection;

use serde::{Deserialize, Serialize};

pub(crate) const NEW_SIBLING_TITLE: &str = "新章节";
pub(crate) const NEW_CHILD_TITLE: &str = "新子章节";

/// Upper bound for a section's target word count.
pub(crate) const MAX_WORD_COUNT: u32 = 100_000;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub(crate) struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One chapter or section of the outline.
///
/// A `Branch` always holds at least one child; removing the last child turns
/// it back into a `Leaf`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub(crate) enum OutlineNode {
    Leaf {
        id: NodeId,
        title: String,
        level: u32,
        #[serde(default, rename = "wordCount", skip_serializing_if = "Option::is_none")]
        word_count: Option<u32>,
    },
    Branch {
        id: NodeId,
        title: String,
        level: u32,
        #[serde(default, rename = "wordCount", skip_serializing_if = "Option::is_none")]
        word_count: Option<u32>,
        expanded: bool,
        children: Vec<OutlineNode>,
    },
}

impl OutlineNode {
    pub fn leaf(id: impl Into<String>, title: impl Into<String>, level: u32) -> Self {
        OutlineNode::Leaf {
            id: NodeId::new(id),
            title: title.into(),
            level,
            word_count: None,
        }
    }

    /// Builds a branch, or a leaf when `children` is empty.
    pub fn branch(
        id: impl Into<String>,
        title: impl Into<String>,
        level: u32,
        expanded: bool,
        children: Vec<OutlineNode>,
    ) -> Self {
        let node = Self::leaf(id, title, level);
        node.with_children(children, expanded)
    }

    pub fn with_word_count(mut self, count: u32) -> Self {
        self.set_word_count(Some(count));
        self
    }

    pub fn id(&self) -> &NodeId {
        match self {
            OutlineNode::Leaf { id, .. } | OutlineNode::Branch { id, .. } => id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            OutlineNode::Leaf { title, .. } | OutlineNode::Branch { title, .. } => title,
        }
    }

    pub fn level(&self) -> u32 {
        match self {
            OutlineNode::Leaf { level, .. } | OutlineNode::Branch { level, .. } => *level,
        }
    }

    pub fn word_count(&self) -> Option<u32> {
        match self {
            OutlineNode::Leaf { word_count, .. } | OutlineNode::Branch { word_count, .. } => {
                *word_count
            }
        }
    }

    /// Always `false` for leaves.
    pub fn is_expanded(&self) -> bool {
        matches!(self, OutlineNode::Branch { expanded: true, .. })
    }

    pub fn children(&self) -> &[OutlineNode] {
        match self {
            OutlineNode::Leaf { .. } => &[],
            OutlineNode::Branch { children, .. } => children,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    fn set_title(&mut self, value: String) {
        match self {
            OutlineNode::Leaf { title, .. } | OutlineNode::Branch { title, .. } => *title = value,
        }
    }

    fn set_word_count(&mut self, value: Option<u32>) {
        match self {
            OutlineNode::Leaf { word_count, .. } | OutlineNode::Branch { word_count, .. } => {
                *word_count = value.map(|c| c.min(MAX_WORD_COUNT))
            }
        }
    }

    /// Rebuilds the node around a new child list, keeping the leaf/branch
    /// invariant.
    fn with_children(self, children: Vec<OutlineNode>, expanded: bool) -> Self {
        let (id, title, level, word_count) = match self {
            OutlineNode::Leaf {
                id,
                title,
                level,
                word_count,
            }
            | OutlineNode::Branch {
                id,
                title,
                level,
                word_count,
                ..
            } => (id, title, level, word_count),
        };

        if children.is_empty() {
            OutlineNode::Leaf {
                id,
                title,
                level,
                word_count,
            }
        } else {
            OutlineNode::Branch {
                id,
                title,
                level,
                word_count,
                expanded,
                children,
            }
        }
    }
}

/// Applies `f` to the first node (pre-order) whose id matches.
fn update_node(
    forest: &[OutlineNode],
    target: &NodeId,
    f: &mut dyn FnMut(&mut OutlineNode),
) -> Vec<OutlineNode> {
    let mut out = forest.to_vec();
    update_in_place(&mut out, target, f);
    out
}

fn update_in_place(
    nodes: &mut [OutlineNode],
    target: &NodeId,
    f: &mut dyn FnMut(&mut OutlineNode),
) -> bool {
    for node in nodes.iter_mut() {
        if node.id() == target {
            f(node);
            return true;
        }
        if let OutlineNode::Branch { children, .. } = node {
            if update_in_place(children, target, f) {
                return true;
            }
        }
    }
    false
}

pub(crate) fn find<'a>(forest: &'a [OutlineNode], id: &NodeId) -> Option<&'a OutlineNode> {
    for node in forest {
        if node.id() == id {
            return Some(node);
        }
        if let Some(found) = find(node.children(), id) {
            return Some(found);
        }
    }
    None
}

pub(crate) fn contains(forest: &[OutlineNode], id: &NodeId) -> bool {
    find(forest, id).is_some()
}

pub(crate) fn find_level(forest: &[OutlineNode], id: &NodeId) -> Option<u32> {
    find(forest, id).map(OutlineNode::level)
}

/// Every id in pre-order.
pub(crate) fn all_ids(forest: &[OutlineNode]) -> Vec<NodeId> {
    fn walk(nodes: &[OutlineNode], out: &mut Vec<NodeId>) {
        for node in nodes {
            out.push(node.id().clone());
            walk(node.children(), out);
        }
    }

    let mut out = Vec::new();
    walk(forest, &mut out);
    out
}

pub(crate) fn total_word_count(forest: &[OutlineNode]) -> u64 {
    forest.iter().fold(0u64, |acc, n| {
        acc.saturating_add(u64::from(n.word_count().unwrap_or(0)))
            .saturating_add(total_word_count(n.children()))
    })
}

pub(crate) fn toggle_expansion(forest: &[OutlineNode], id: &NodeId) -> Vec<OutlineNode> {
    update_node(forest, id, &mut |node| {
        if let OutlineNode::Branch { expanded, .. } = node {
            *expanded = !*expanded;
        }
    })
}

fn set_all_expanded(nodes: &[OutlineNode], value: bool) -> Vec<OutlineNode> {
    nodes
        .iter()
        .map(|node| match node {
            OutlineNode::Leaf { .. } => node.clone(),
            OutlineNode::Branch { children, .. } => node
                .clone()
                .with_children(set_all_expanded(children, value), value),
        })
        .collect()
}

pub(crate) fn expand_all(forest: &[OutlineNode]) -> Vec<OutlineNode> {
    set_all_expanded(forest, true)
}

pub(crate) fn collapse_all(forest: &[OutlineNode]) -> Vec<OutlineNode> {
    set_all_expanded(forest, false)
}

/// Inserts a `新章节` node right after `after_id`.
///
/// `parent_id = None` addresses the root list. When `after_id` is not a
/// member of the addressed list nothing is inserted.
pub(crate) fn insert_sibling(
    forest: &[OutlineNode],
    parent_id: Option<&NodeId>,
    after_id: &NodeId,
    new_id: NodeId,
) -> Vec<OutlineNode> {
    let level = find_level(forest, after_id).unwrap_or(1);
    let fresh = OutlineNode::Leaf {
        id: new_id,
        title: NEW_SIBLING_TITLE.to_string(),
        level,
        word_count: None,
    };

    fn insert_after(list: &mut Vec<OutlineNode>, after_id: &NodeId, fresh: OutlineNode) {
        if let Some(idx) = list.iter().position(|n| n.id() == after_id) {
            list.insert(idx + 1, fresh);
        }
    }

    match parent_id {
        None => {
            let mut out = forest.to_vec();
            insert_after(&mut out, after_id, fresh);
            out
        }
        Some(parent_id) => {
            let mut fresh = Some(fresh);
            update_node(forest, parent_id, &mut |node| {
                if let (OutlineNode::Branch { children, .. }, Some(f)) = (node, fresh.take()) {
                    insert_after(children, after_id, f);
                }
            })
        }
    }
}

/// Appends a `新子章节` node under `parent_id` and expands the parent.
pub(crate) fn insert_child(
    forest: &[OutlineNode],
    parent_id: &NodeId,
    new_id: NodeId,
) -> Vec<OutlineNode> {
    let mut new_id = Some(new_id);
    update_node(forest, parent_id, &mut |node| {
        let Some(id) = new_id.take() else {
            return;
        };
        let fresh = OutlineNode::Leaf {
            id,
            title: NEW_CHILD_TITLE.to_string(),
            level: node.level() + 1,
            word_count: None,
        };
        let mut children = node.children().to_vec();
        children.push(fresh);
        *node = node.clone().with_children(children, true);
    })
}

pub(crate) fn rename(forest: &[OutlineNode], id: &NodeId, new_title: &str) -> Vec<OutlineNode> {
    let trimmed = new_title.trim();
    if trimmed.is_empty() {
        return forest.to_vec();
    }
    update_node(forest, id, &mut |node| node.set_title(trimmed.to_string()))
}

pub(crate) fn set_word_count(
    forest: &[OutlineNode],
    id: &NodeId,
    count: Option<u32>,
) -> Vec<OutlineNode> {
    update_node(forest, id, &mut |node| node.set_word_count(count))
}

/// Drops every node for which `remove` holds, along with its subtree.
fn filter_out(nodes: &[OutlineNode], remove: &dyn Fn(&NodeId) -> bool) -> Vec<OutlineNode> {
    nodes
        .iter()
        .filter(|n| !remove(n.id()))
        .map(|node| match node {
            OutlineNode::Leaf { .. } => node.clone(),
            OutlineNode::Branch {
                children, expanded, ..
            } => node
                .clone()
                .with_children(filter_out(children, remove), *expanded),
        })
        .collect()
}

pub(crate) fn delete(forest: &[OutlineNode], id: &NodeId) -> Vec<OutlineNode> {
    filter_out(forest, &|x| x == id)
}

/// Deletes every selected node in one pass and clears the selection.
pub(crate) fn batch_delete(
    forest: &[OutlineNode],
    selection: &Selection,
) -> (Vec<OutlineNode>, Selection) {
    let next = filter_out(forest, &|x| selection.is_selected(x));
    (next, Selection::default())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn bid_outline() -> Vec<OutlineNode> {
        vec![
            OutlineNode::branch(
                "1",
                "商务标书",
                1,
                true,
                vec![OutlineNode::leaf("1-1", "投标函", 2)],
            ),
            OutlineNode::branch(
                "2",
                "技术标书",
                1,
                false,
                vec![
                    OutlineNode::branch(
                        "2-1",
                        "技术方案",
                        2,
                        true,
                        vec![
                            OutlineNode::leaf("2-1-1", "总体设计", 3).with_word_count(800),
                            OutlineNode::leaf("2-1-2", "实施计划", 3).with_word_count(600),
                        ],
                    ),
                    OutlineNode::leaf("2-2", "售后服务", 2).with_word_count(400),
                ],
            ),
        ]
    }

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn ids_of(nodes: &[OutlineNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.id().as_str()).collect()
    }

    #[test]
    fn test_insert_child_scenario() {
        let tree = vec![OutlineNode::branch(
            "1",
            "商务标书",
            1,
            true,
            vec![OutlineNode::leaf("1-1", "投标函", 2)],
        )];

        let mut ids = SequentialIds::new("n");
        let next = insert_child(&tree, &id("1"), ids.next_id());
        let next = insert_child(&next, &id("1"), ids.next_id());
        let root = &next[0];
        assert_eq!(ids_of(root.children()), vec!["1-1", "n1", "n2"]);
        assert_eq!(root.children()[1].title(), NEW_CHILD_TITLE);
        assert_eq!(root.children()[2].level(), 2);
        assert!(root.is_expanded());
    }

    #[test]
    fn test_insert_child_expands_collapsed_parent_and_appends_last() {
        let tree = bid_outline();
        let next = insert_child(&tree, &id("2"), id("n1"));
        let node = find(&next, &id("2")).expect("node 2 exists");
        assert!(node.is_expanded());
        assert_eq!(ids_of(node.children()), vec!["2-1", "2-2", "n1"]);
    }

    #[test]
    fn test_insert_child_into_leaf_promotes_to_branch() {
        let tree = bid_outline();
        let next = insert_child(&tree, &id("2-2"), id("n1"));
        let node = find(&next, &id("2-2")).expect("node exists");
        assert!(matches!(node, OutlineNode::Branch { expanded: true, .. }));
        assert_eq!(node.children()[0].level(), 3);
        assert_eq!(node.word_count(), Some(400));
    }

    #[test]
    fn test_insert_sibling_root_list() {
        let tree = vec![OutlineNode::leaf("A", "a", 1), OutlineNode::leaf("B", "b", 1)];
        let next = insert_sibling(&tree, None, &id("A"), id("NEW"));
        assert_eq!(ids_of(&next), vec!["A", "NEW", "B"]);
        assert_eq!(next[1].level(), next[0].level());
        assert_eq!(next[1].title(), NEW_SIBLING_TITLE);
    }

    #[test]
    fn test_insert_sibling_nested_keeps_other_order() {
        let tree = bid_outline();
        let next = insert_sibling(&tree, Some(&id("2-1")), &id("2-1-1"), id("NEW"));
        let parent = find(&next, &id("2-1")).expect("parent exists");
        assert_eq!(ids_of(parent.children()), vec!["2-1-1", "NEW", "2-1-2"]);
        assert_eq!(parent.children()[1].level(), 3);

        // Everything outside the touched list is untouched.
        assert_eq!(delete(&next, &id("NEW")), tree);
    }

    #[test]
    fn test_insert_sibling_after_last() {
        let tree = bid_outline();
        let next = insert_sibling(&tree, None, &id("2"), id("NEW"));
        assert_eq!(ids_of(&next), vec!["1", "2", "NEW"]);
    }

    #[test]
    fn test_insert_sibling_unknown_ids_are_noops() {
        let tree = bid_outline();
        assert_eq!(insert_sibling(&tree, None, &id("missing"), id("NEW")), tree);
        assert_eq!(insert_sibling(&tree, Some(&id("missing")), &id("1-1"), id("NEW")), tree);
        // `after_id` exists, but not in the addressed list.
        assert_eq!(insert_sibling(&tree, None, &id("1-1"), id("NEW")), tree);
        assert_eq!(insert_sibling(&tree, Some(&id("1")), &id("2-2"), id("NEW")), tree);
    }

    #[test]
    fn test_rename_trims_and_ignores_blank() {
        let tree = bid_outline();
        assert_eq!(rename(&tree, &id("1-1"), ""), tree);
        assert_eq!(rename(&tree, &id("1-1"), "   "), tree);

        let next = rename(&tree, &id("1-1"), "  授权委托书 ");
        assert_eq!(find(&next, &id("1-1")).map(|n| n.title()), Some("授权委托书"));
        assert_eq!(rename(&tree, &id("missing"), "x"), tree);
    }

    #[test]
    fn test_delete_removes_subtree_and_is_idempotent() {
        let tree = bid_outline();
        let next = delete(&tree, &id("2-1"));
        for gone in ["2-1", "2-1-1", "2-1-2"] {
            assert!(!contains(&next, &id(gone)));
        }
        assert_eq!(
            all_ids(&next).iter().map(NodeId::as_str).collect::<Vec<_>>(),
            vec!["1", "1-1", "2", "2-2"]
        );
        assert_eq!(delete(&next, &id("2-1")), next);
    }

    #[test]
    fn test_delete_last_child_demotes_to_leaf() {
        let tree = bid_outline();
        let next = delete(&tree, &id("1-1"));
        let node = find(&next, &id("1")).expect("node 1 exists");
        assert!(matches!(node, OutlineNode::Leaf { .. }));
        assert!(!node.has_children());
    }

    #[test]
    fn test_toggle_expansion_is_involution() {
        let tree = bid_outline();
        let once = toggle_expansion(&tree, &id("2"));
        assert!(find(&once, &id("2")).is_some_and(OutlineNode::is_expanded));
        assert_eq!(toggle_expansion(&once, &id("2")), tree);

        // Leaves and unknown ids are untouched.
        assert_eq!(toggle_expansion(&tree, &id("1-1")), tree);
        assert_eq!(toggle_expansion(&tree, &id("missing")), tree);
    }

    #[test]
    fn test_find_level_depth_first() {
        let tree = bid_outline();
        assert_eq!(find_level(&tree, &id("2-1-2")), Some(3));
        assert_eq!(find_level(&tree, &id("1")), Some(1));
        assert_eq!(find_level(&tree, &id("missing")), None);
    }

    #[test]
    fn test_batch_delete_scenario() {
        let tree = vec![OutlineNode::branch(
            "1",
            "商务标书",
            1,
            true,
            vec![OutlineNode::leaf("1-1", "投标函", 2)],
        )];
        let mut sel = Selection::default();
        sel.toggle_select(&id("1-1"), true);

        let (next, cleared) = batch_delete(&tree, &sel);
        assert_eq!(next.len(), 1);
        assert!(next[0].children().is_empty());
        assert!(cleared.is_empty());
    }

    #[test]
    fn test_batch_delete_matches_sequential_delete() {
        let tree = bid_outline();
        let mut sel = Selection::default();
        sel.toggle_select(&id("1-1"), true);
        sel.toggle_select(&id("2-1"), true);
        sel.toggle_select(&id("2-1-2"), true);

        let (next, _) = batch_delete(&tree, &sel);
        let sequential = delete(&delete(&delete(&tree, &id("1-1")), &id("2-1")), &id("2-1-2"));
        assert_eq!(next, sequential);
    }

    #[test]
    fn test_operations_do_not_mutate_input() {
        let tree = bid_outline();
        let snapshot = tree.clone();
        let _ = insert_child(&tree, &id("1"), id("n1"));
        let _ = delete(&tree, &id("2"));
        let _ = rename(&tree, &id("1"), "x");
        assert_eq!(tree, snapshot);
    }

    #[test]
    fn test_word_counts() {
        let tree = bid_outline();
        assert_eq!(total_word_count(&tree), 1800);

        let next = set_word_count(&tree, &id("1-1"), Some(200));
        assert_eq!(total_word_count(&next), 2000);

        let cleared = set_word_count(&next, &id("2-2"), None);
        assert_eq!(total_word_count(&cleared), 1600);
    }

    #[test]
    fn test_word_count_is_capped_and_total_does_not_overflow() {
        let tree = vec![
            OutlineNode::leaf("a", "甲", 1),
            OutlineNode::leaf("b", "乙", 1).with_word_count(1),
        ];
        let next = set_word_count(&tree, &id("a"), Some(u32::MAX));
        assert_eq!(find(&next, &id("a")).and_then(|n| n.word_count()), Some(MAX_WORD_COUNT));
        assert_eq!(total_word_count(&next), u64::from(MAX_WORD_COUNT) + 1);

        // Raw values that bypass the setter, e.g. from deserialized JSON.
        let raw: Vec<OutlineNode> = serde_json::from_str(
            r#"[{"kind":"leaf","id":"x","title":"x","level":1,"wordCount":4294967295},
                {"kind":"leaf","id":"y","title":"y","level":1,"wordCount":1}]"#,
        )
        .expect("valid outline json");
        assert_eq!(total_word_count(&raw), u64::from(u32::MAX) + 1);
    }

    #[test]
    fn test_expand_and_collapse_all() {
        let tree = bid_outline();
        let open = expand_all(&tree);
        assert!(all_ids(&open)
            .iter()
            .filter_map(|i| find(&open, i))
            .filter(|n| n.has_children())
            .all(OutlineNode::is_expanded));

        let closed = collapse_all(&open);
        assert!(!find(&closed, &id("1")).is_some_and(OutlineNode::is_expanded));
        assert!(!find(&closed, &id("2-1")).is_some_and(OutlineNode::is_expanded));
    }

    #[test]
    fn test_node_json_contract() {
        let json = r#"[
            {"kind": "branch", "id": "1", "title": "商务标书", "level": 1, "expanded": true,
             "children": [{"kind": "leaf", "id": "1-1", "title": "投标函", "level": 2, "wordCount": 500}]}
        ]"#;
        let parsed: Vec<OutlineNode> = serde_json::from_str(json).expect("outline should parse");
        assert_eq!(parsed[0].children()[0].word_count(), Some(500));
        assert!(parsed[0].is_expanded());

        let v = serde_json::to_value(&parsed).expect("should serialize");
        assert_eq!(v[0]["kind"], "branch");
        assert_eq!(v[0]["children"][0]["wordCount"], 500);
        assert!(v[0].get("wordCount").is_none());
    }
}
