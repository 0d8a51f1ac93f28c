use super::NodeId;

/// Mints ids for newly inserted outline nodes.
pub(crate) trait IdSource {
    fn next_id(&mut self) -> NodeId;
}

/// Deterministic ids: `{prefix}{n}`.
#[cfg(test)]
#[derive(Clone, Debug)]
pub(crate) struct SequentialIds {
    prefix: String,
    next: u64,
}

#[cfg(test)]
impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

#[cfg(test)]
impl IdSource for SequentialIds {
    fn next_id(&mut self) -> NodeId {
        let id = NodeId::new(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

/// Timestamp ids with a monotonic suffix, so two inserts in the same
/// millisecond still get distinct ids.
#[derive(Clone, Debug)]
pub(crate) struct ClockIds<F> {
    clock: F,
    seq: u64,
}

impl<F: FnMut() -> i64> ClockIds<F> {
    pub fn new(clock: F) -> Self {
        Self { clock, seq: 0 }
    }
}

impl<F: FnMut() -> i64> IdSource for ClockIds<F> {
    fn next_id(&mut self) -> NodeId {
        self.seq += 1;
        NodeId::new(format!("{}-{}", (self.clock)(), self.seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::new("n");
        assert_eq!(ids.next_id().as_str(), "n1");
        assert_eq!(ids.next_id().as_str(), "n2");
    }

    #[test]
    fn test_clock_ids_unique_within_same_millisecond() {
        let mut ids = ClockIds::new(|| 1_700_000_000_000);
        let minted: HashSet<NodeId> = (0..50).map(|_| ids.next_id()).collect();
        assert_eq!(minted.len(), 50);
    }
}
