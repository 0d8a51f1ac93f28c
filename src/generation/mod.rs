//! Simulated section content generation.
//!
//! Nothing here talks to a model. Content is produced locally after a fixed
//! delay; this module only tracks which sections have content, which are in
//! flight, and when overwriting needs the user's confirmation.

use crate::outline::{contains, NodeId, OutlineNode, MAX_WORD_COUNT};
use crate::util::count_chars;
use std::collections::{BTreeMap, BTreeSet};

pub(crate) const DEFAULT_TARGET_CHARS: u32 = 300;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GenerateRequest {
    /// No content yet; generation may start right away.
    Start,
    /// Existing content would be replaced.
    NeedsConfirmation,
    /// A generation for this section is still running.
    AlreadyPending,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct GenerationBook {
    contents: BTreeMap<NodeId, String>,
    pending: BTreeSet<NodeId>,
}

impl GenerationBook {
    pub fn request(&self, id: &NodeId) -> GenerateRequest {
        if self.pending.contains(id) {
            GenerateRequest::AlreadyPending
        } else if self.contents.get(id).is_some_and(|c| !c.trim().is_empty()) {
            GenerateRequest::NeedsConfirmation
        } else {
            GenerateRequest::Start
        }
    }

    /// Returns `false` when `id` was already pending.
    pub fn mark_pending(&mut self, id: &NodeId) -> bool {
        self.pending.insert(id.clone())
    }

    pub fn is_pending(&self, id: &NodeId) -> bool {
        self.pending.contains(id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn complete(&mut self, id: &NodeId, content: String) {
        self.pending.remove(id);
        self.contents.insert(id.clone(), content);
    }

    pub fn set_content(&mut self, id: &NodeId, content: String) {
        self.contents.insert(id.clone(), content);
    }

    pub fn content(&self, id: &NodeId) -> Option<&str> {
        self.contents.get(id).map(String::as_str)
    }

    pub fn char_count(&self, id: &NodeId) -> u32 {
        self.content(id).map(count_chars).unwrap_or(0)
    }

    /// Forgets content and in-flight state for nodes no longer in `forest`.
    pub fn prune(&mut self, forest: &[OutlineNode]) {
        self.contents.retain(|id, _| contains(forest, id));
        self.pending.retain(|id| contains(forest, id));
    }
}

/// Placeholder text for a section, roughly `word_count` characters long.
/// The target is clamped to `1..=MAX_WORD_COUNT`.
pub(crate) fn simulate_content(title: &str, word_count: Option<u32>) -> String {
    let target = word_count
        .unwrap_or(DEFAULT_TARGET_CHARS)
        .clamp(1, MAX_WORD_COUNT);
    let sentences = [
        format!("本节围绕“{title}”展开说明。"),
        format!("我方将严格按照招标文件要求完成{title}相关工作。"),
        "项目团队具备丰富的同类项目经验，能够保障质量与进度。".to_string(),
        "各项措施均已落实到具体责任人，并建立了完善的检查机制。".to_string(),
    ];

    let mut out = String::new();
    let mut written = 0u32;
    for sentence in sentences.iter().cycle() {
        if written >= target {
            break;
        }
        out.push_str(sentence);
        written = written.saturating_add(count_chars(sentence));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::tests::bid_outline;
    use crate::outline::delete;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn test_request_flow() {
        let mut book = GenerationBook::default();
        assert_eq!(book.request(&id("1-1")), GenerateRequest::Start);

        assert!(book.mark_pending(&id("1-1")));
        assert!(!book.mark_pending(&id("1-1")));
        assert_eq!(book.request(&id("1-1")), GenerateRequest::AlreadyPending);

        book.complete(&id("1-1"), "正文".to_string());
        assert!(!book.is_pending(&id("1-1")));
        assert_eq!(book.request(&id("1-1")), GenerateRequest::NeedsConfirmation);
        assert_eq!(book.content(&id("1-1")), Some("正文"));
    }

    #[test]
    fn test_blank_content_does_not_need_confirmation() {
        let mut book = GenerationBook::default();
        book.set_content(&id("1-1"), "  \n".to_string());
        assert_eq!(book.request(&id("1-1")), GenerateRequest::Start);
    }

    #[test]
    fn test_prune_drops_deleted_sections() {
        let tree = bid_outline();
        let mut book = GenerationBook::default();
        book.set_content(&id("2-1-1"), "a".to_string());
        book.set_content(&id("1-1"), "b".to_string());
        book.mark_pending(&id("2-1-2"));

        book.prune(&delete(&tree, &id("2-1")));
        assert_eq!(book.content(&id("2-1-1")), None);
        assert_eq!(book.content(&id("1-1")), Some("b"));
        assert_eq!(book.pending_count(), 0);
    }

    #[test]
    fn test_simulate_content_reaches_target_length() {
        let text = simulate_content("总体设计", Some(120));
        assert!(count_chars(&text) >= 120);
        assert!(text.contains("总体设计"));

        let default_len = simulate_content("售后服务", None);
        assert!(count_chars(&default_len) >= DEFAULT_TARGET_CHARS);
    }

    #[test]
    fn test_simulate_content_caps_huge_targets() {
        let started = std::time::Instant::now();
        let text = simulate_content("总体设计", Some(u32::MAX));
        let len = count_chars(&text);
        assert!(len >= MAX_WORD_COUNT);
        // Overshoot is at most one sentence.
        assert!(len < MAX_WORD_COUNT + 64, "got {len}");
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }
}
