//! Producing jobs in the order they should be considered for scheduling.
//!
//! Every producer implements [`JobContextIterator`]. Leaves read either a fixed snapshot
//! ([`InMemoryJobIterator`]) or the job store ([`QueuedJobsIterator`]); composition nodes
//! ([`MultiJobsIterator`], [`MarketDrivenMultiJobsIterator`]) depend only on the trait, so trees of
//! any shape can be built and driven from the root.

mod in_memory;
mod market;
mod multi;
mod queued;

pub use in_memory::InMemoryJobIterator;
pub use market::MarketDrivenMultiJobsIterator;
pub use multi::MultiJobsIterator;
pub use queued::QueuedJobsIterator;

use crate::context::JobSchedulingContext;
use anyhow::Result;
use std::sync::Arc;

/// A pull-based producer of jobs in scheduling order.
///
/// `Ok(None)` signals exhaustion, and is returned on every call after the first. An error means
/// the underlying source failed or the round was cancelled; callers must stop pulling after one.
///
/// Iterators are single-reader: `next` must not be driven from more than one thread at a time.
pub trait JobContextIterator {
    fn next(&mut self) -> Result<Option<Arc<JobSchedulingContext>>>;
}

impl<T: JobContextIterator + ?Sized> JobContextIterator for Box<T> {
    fn next(&mut self) -> Result<Option<Arc<JobSchedulingContext>>> {
        (**self).next()
    }
}

impl<T: JobContextIterator + ?Sized> JobContextIterator for &mut T {
    fn next(&mut self) -> Result<Option<Arc<JobSchedulingContext>>> {
        (**self).next()
    }
}

/// A boxed iterator, for building trees out of iterators of differing types.
pub type BoxJobContextIterator<'a> = Box<dyn JobContextIterator + Send + 'a>;

pub trait JobContextIteratorExt: JobContextIterator + Sized {
    /// Adapt into a [`std::iter::Iterator`]. The adapter ends after exhaustion or after yielding
    /// the first error.
    fn contexts(self) -> Contexts<Self> {
        Contexts { inner: Some(self) }
    }

    fn boxed<'a>(self) -> BoxJobContextIterator<'a>
    where
        Self: Send + 'a,
    {
        Box::new(self)
    }
}

impl<T: JobContextIterator> JobContextIteratorExt for T {}

/// See [`JobContextIteratorExt::contexts`].
pub struct Contexts<T> {
    inner: Option<T>,
}

impl<T: JobContextIterator> Iterator for Contexts<T> {
    type Item = Result<Arc<JobSchedulingContext>>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.as_mut()?.next().transpose();
        if !matches!(result, Some(Ok(_))) {
            self.inner = None;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{jctxs, ScriptedIterator};
    use marshal_test::*;

    #[test]
    fn contexts_yields_until_exhausted() {
        let it = InMemoryJobIterator::new(jctxs([job![1, "A"], job![2, "A"]]));
        let ids: Vec<_> = it
            .contexts()
            .map(|jctx| jctx.unwrap().job_id().clone())
            .collect();
        assert_eq!(ids, [job_id![1], job_id![2]]);
    }

    #[test]
    fn contexts_stops_after_error() {
        let (it, pulls) = ScriptedIterator::new()
            .job(job![1, "A"])
            .fail("boom")
            .job(job![2, "A"])
            .build();
        let mut contexts = it.contexts();
        assert_eq!(contexts.next().unwrap().unwrap().job_id(), &job_id![1]);
        assert_eq!(contexts.next().unwrap().unwrap_err().to_string(), "boom");
        assert!(contexts.next().is_none());
        assert!(contexts.next().is_none());
        assert_eq!(pulls.get(), 2);
    }

    #[test]
    fn collect_into_result() {
        let it = InMemoryJobIterator::new(jctxs([job![1, "A"], job![2, "B"]]));
        let all = it.contexts().collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn borrowed_iterator_can_be_resumed() {
        fn pull_one(mut it: impl JobContextIterator) -> Arc<JobSchedulingContext> {
            it.next().unwrap().unwrap()
        }

        let mut it = InMemoryJobIterator::new(jctxs([job![1, "A"], job![2, "A"]]));
        assert_eq!(pull_one(&mut it).job_id(), &job_id![1]);
        assert_eq!(it.next().unwrap().unwrap().job_id(), &job_id![2]);
        assert!(it.next().unwrap().is_none());
    }
}
