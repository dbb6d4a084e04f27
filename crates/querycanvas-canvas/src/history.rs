use querycanvas_core::{EdgeEntity, NodeEntity};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Full copy of one workspace graph taken before a mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub nodes: Vec<NodeEntity>,
    pub edges: Vec<EdgeEntity>,
}

impl Snapshot {
    pub fn new(nodes: &[NodeEntity], edges: &[EdgeEntity]) -> Self {
        Self {
            nodes: nodes.to_vec(),
            edges: edges.to_vec(),
        }
    }
}

/// Bounded linear snapshot history with a cursor.
///
/// `cursor` counts the snapshots still available to undo. Pushing after an
/// undo discards everything past the cursor; overflow drops the oldest entry.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Snapshot>,
    cursor: usize,
    max_size: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            max_size: max_size.max(1),
        }
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.truncate(self.cursor);
        self.entries.push_back(snapshot);
        while self.entries.len() > self.max_size {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len();
    }

    /// Steps the cursor back one position and returns the snapshot there.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.cursor
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn oldest(&self) -> Option<&Snapshot> {
        self.entries.front()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use querycanvas_core::{NodeId, Position};

    fn snapshot_with(count: usize) -> Snapshot {
        let nodes = (0..count)
            .map(|i| {
                NodeEntity::new(
                    NodeId(format!("node_{i}")),
                    "insan",
                    "İnsan",
                    "#2563eb",
                    Position::default(),
                )
            })
            .collect::<Vec<_>>();
        Snapshot::new(&nodes, &[])
    }

    #[test]
    fn test_undo_on_empty_history_is_none() {
        let mut history = History::default();
        assert!(history.undo().is_none());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_undo_returns_snapshots_in_reverse() {
        let mut history = History::default();
        history.push(snapshot_with(0));
        history.push(snapshot_with(1));

        assert_eq!(history.undo().unwrap().nodes.len(), 1);
        assert_eq!(history.undo().unwrap().nodes.len(), 0);
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_push_after_undo_truncates() {
        let mut history = History::default();
        history.push(snapshot_with(0));
        history.push(snapshot_with(1));
        history.push(snapshot_with(2));
        history.undo();
        history.undo();

        history.push(snapshot_with(7));

        assert_eq!(history.len(), 2);
        assert_eq!(history.undo().unwrap().nodes.len(), 7);
        assert_eq!(history.undo().unwrap().nodes.len(), 0);
    }

    #[test]
    fn test_sixty_pushes_keep_fifty() {
        let mut history = History::new(50);
        for i in 0..60 {
            history.push(snapshot_with(i));
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.depth(), 50);
        // Snapshots 0..10 are gone.
        assert_eq!(history.oldest().unwrap().nodes.len(), 10);
    }

    #[test]
    fn test_zero_limit_is_clamped() {
        let mut history = History::new(0);
        history.push(snapshot_with(1));
        history.push(snapshot_with(2));
        assert_eq!(history.len(), 1);
        assert_eq!(history.max_size(), 1);
    }
}
