use super::{all_ids, NodeId, OutlineNode};
use std::collections::BTreeSet;

/// Batch-mode selection, kept apart from the tree itself.
///
/// Deleting nodes does not touch the selection. Use [`Selection::live`] to
/// see only the ids that still exist.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Selection {
    ids: BTreeSet<NodeId>,
}

impl Selection {
    pub fn toggle_select(&mut self, id: &NodeId, selected: bool) {
        if selected {
            self.ids.insert(id.clone());
        } else {
            self.ids.remove(id);
        }
    }

    pub fn select_all(&mut self, forest: &[OutlineNode]) {
        self.ids = all_ids(forest).into_iter().collect();
    }

    pub fn deselect_all(&mut self) {
        self.ids.clear();
    }

    pub fn is_selected(&self, id: &NodeId) -> bool {
        self.ids.contains(id)
    }

    /// Selected ids still present in `forest`, in tree order.
    pub fn live(&self, forest: &[OutlineNode]) -> Vec<NodeId> {
        all_ids(forest)
            .into_iter()
            .filter(|id| self.ids.contains(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::delete;
    use crate::outline::tests::bid_outline;

    #[test]
    fn test_toggle_select() {
        let mut sel = Selection::default();
        sel.toggle_select(&NodeId::from("1"), true);
        sel.toggle_select(&NodeId::from("2"), true);
        sel.toggle_select(&NodeId::from("1"), false);
        assert!(!sel.is_selected(&NodeId::from("1")));
        assert!(sel.is_selected(&NodeId::from("2")));
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn test_select_all_includes_nested_nodes() {
        let tree = bid_outline();
        let mut sel = Selection::default();
        sel.select_all(&tree);
        assert_eq!(sel.len(), 7);
        assert!(sel.is_selected(&NodeId::from("2-1-2")));

        sel.deselect_all();
        assert!(sel.is_empty());
    }

    #[test]
    fn test_live_prunes_deleted_nodes() {
        let tree = bid_outline();
        let mut sel = Selection::default();
        sel.toggle_select(&NodeId::from("2-1-1"), true);
        sel.toggle_select(&NodeId::from("1-1"), true);

        let next = delete(&tree, &NodeId::from("2-1"));
        // Raw set is stale, live view is not.
        assert_eq!(sel.len(), 2);
        assert_eq!(sel.live(&next), vec![NodeId::from("1-1")]);
    }
}
