use super::JobContextIterator;
use crate::context::JobSchedulingContext;
use anyhow::Result;
use std::sync::Arc;

/// Chains iterators in the order given: every job of the first is yielded before any job of the
/// second, and so on. An error from the current iterator is returned as-is and the chain does not
/// advance past it.
pub struct MultiJobsIterator<IterT> {
    index: usize,
    iters: Vec<IterT>,
}

impl<IterT: JobContextIterator> MultiJobsIterator<IterT> {
    pub fn new(iters: impl IntoIterator<Item = IterT>) -> Self {
        MultiJobsIterator {
            index: 0,
            iters: iters.into_iter().collect(),
        }
    }
}

impl<IterT: JobContextIterator> JobContextIterator for MultiJobsIterator<IterT> {
    fn next(&mut self) -> Result<Option<Arc<JobSchedulingContext>>> {
        while let Some(it) = self.iters.get_mut(self.index) {
            if let Some(jctx) = it.next()? {
                return Ok(Some(jctx));
            }
            self.index += 1;
        }
        Ok(None)
    }
}
