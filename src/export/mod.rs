use crate::outline::OutlineNode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub(crate) enum ExportErrorKind {
    Empty,
    Serialize,
}

#[derive(Clone, Debug)]
pub(crate) struct ExportError {
    pub kind: ExportErrorKind,
    pub message: String,
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl ExportError {
    fn empty() -> Self {
        Self {
            kind: ExportErrorKind::Empty,
            message: "outline has no sections".to_string(),
        }
    }

    fn serialize(e: serde_json::Error) -> Self {
        Self {
            kind: ExportErrorKind::Serialize,
            message: e.to_string(),
        }
    }
}

pub(crate) type ExportResult<T> = Result<T, ExportError>;

/// Numbered table of contents, one line per node, collapsed or not.
///
/// ```text
/// 1 商务标书
///   1.1 投标函
/// ```
pub(crate) fn to_outline_text(forest: &[OutlineNode]) -> String {
    fn walk(nodes: &[OutlineNode], prefix: &str, depth: usize, out: &mut String) {
        for (i, node) in nodes.iter().enumerate() {
            let number = if prefix.is_empty() {
                format!("{}", i + 1)
            } else {
                format!("{prefix}.{}", i + 1)
            };
            out.push_str(&"  ".repeat(depth));
            out.push_str(&number);
            out.push(' ');
            out.push_str(node.title());
            out.push('\n');
            walk(node.children(), &number, depth + 1, out);
        }
    }

    let mut out = String::new();
    walk(forest, "", 0, &mut out);
    out
}

pub(crate) fn to_json(forest: &[OutlineNode]) -> ExportResult<String> {
    if forest.is_empty() {
        return Err(ExportError::empty());
    }
    serde_json::to_string_pretty(forest).map_err(ExportError::serialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::tests::bid_outline;

    #[test]
    fn test_outline_text_numbers_every_node() {
        let text = to_outline_text(&bid_outline());
        let expected = "\
1 商务标书
  1.1 投标函
2 技术标书
  2.1 技术方案
    2.1.1 总体设计
    2.1.2 实施计划
  2.2 售后服务
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_to_json_parses_back() {
        let tree = bid_outline();
        let json = to_json(&tree).expect("non-empty outline should export");
        let parsed: Vec<OutlineNode> = serde_json::from_str(&json).expect("valid json");
        assert_eq!(parsed, tree);
    }

    #[test]
    fn test_to_json_rejects_empty_outline() {
        let err = to_json(&[]).expect_err("empty outline should fail");
        assert_eq!(err.kind, ExportErrorKind::Empty);
        assert_eq!(err.to_string(), "Empty: outline has no sections");
    }
}
