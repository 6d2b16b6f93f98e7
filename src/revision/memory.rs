// src/revision/memory.rs

use std::collections::HashMap;

use super::{Revision, RevisionIds, RevisionProvider, RevisionRange};
use crate::errors::{BuildgateError, Result};

/// Fixed history served from memory.
///
/// Revisions are kept in the order given, which is the order the engine
/// will see them in. A baseline selects everything listed *before* it,
/// mirroring `git rev-list <baseline>..HEAD` on a newest-first history.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRevisions {
    order: Vec<String>,
    by_id: HashMap<String, Revision>,
}

impl InMemoryRevisions {
    pub fn new(revisions: impl IntoIterator<Item = Revision>) -> Self {
        let mut order = Vec::new();
        let mut by_id = HashMap::new();
        for rev in revisions {
            order.push(rev.id.clone());
            by_id.insert(rev.id.clone(), rev);
        }
        Self { order, by_id }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl RevisionProvider for InMemoryRevisions {
    fn revision_ids(&self, range: &RevisionRange) -> Result<RevisionIds<'_>> {
        let end = match &range.baseline {
            None => self.order.len(),
            Some(base) => self
                .order
                .iter()
                .position(|id| id == base)
                .ok_or_else(|| BuildgateError::Metadata(format!("unknown revision {base}")))?,
        };

        Ok(Box::new(self.order[..end].iter().cloned().map(Ok)))
    }

    fn metadata(&self, id: &str) -> Result<Revision> {
        self.by_id
            .get(id)
            .cloned()
            .ok_or_else(|| BuildgateError::Metadata(format!("unknown revision {id}")))
    }
}
