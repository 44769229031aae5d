use super::JobContextIterator;
use crate::context::JobSchedulingContext;
use anyhow::Result;
use std::sync::Arc;

/// Replays a fixed sequence of contexts, captured when the iterator is built. Never fails.
#[derive(Clone, Debug, Default)]
pub struct InMemoryJobIterator {
    index: usize,
    jctxs: Vec<Arc<JobSchedulingContext>>,
}

impl InMemoryJobIterator {
    pub fn new(jctxs: Vec<Arc<JobSchedulingContext>>) -> Self {
        InMemoryJobIterator { index: 0, jctxs }
    }

    /// The number of contexts not yet returned.
    pub fn remaining(&self) -> usize {
        self.jctxs.len().saturating_sub(self.index)
    }
}

impl JobContextIterator for InMemoryJobIterator {
    fn next(&mut self) -> Result<Option<Arc<JobSchedulingContext>>> {
        let Some(jctx) = self.jctxs.get(self.index) else {
            return Ok(None);
        };
        self.index += 1;
        Ok(Some(jctx.clone()))
    }
}

impl FromIterator<Arc<JobSchedulingContext>> for InMemoryJobIterator {
    fn from_iter<I: IntoIterator<Item = Arc<JobSchedulingContext>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
