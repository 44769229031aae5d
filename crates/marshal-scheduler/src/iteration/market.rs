use super::JobContextIterator;
use crate::context::JobSchedulingContext;
use anyhow::Result;
use marshal_base::PoolName;
use marshal_jobdb::{MarketSchedulingOrder, PoolJobComparator};
use std::{cmp::Ordering, sync::Arc};

/// Merges two iterators by a pool-scoped comparator, yielding whichever side's next job compares
/// less. Each side must already be ordered by the same comparator for the output to be ordered.
///
/// One job of lookahead is held per side, so the losing side's job is kept for the next call
/// rather than consumed. On a tie the second side wins. More than two inputs are merged by nesting.
pub struct MarketDrivenMultiJobsIterator<It1, It2, CmpT = MarketSchedulingOrder> {
    pool: PoolName,
    it1: It1,
    it2: It2,
    comparator: CmpT,
    it1_value: Option<Arc<JobSchedulingContext>>,
    it2_value: Option<Arc<JobSchedulingContext>>,
}

impl<It1, It2> MarketDrivenMultiJobsIterator<It1, It2>
where
    It1: JobContextIterator,
    It2: JobContextIterator,
{
    /// Merge by [`MarketSchedulingOrder`] for `pool`.
    pub fn new(pool: impl Into<PoolName>, it1: It1, it2: It2) -> Self {
        Self::with_comparator(pool, it1, it2, MarketSchedulingOrder)
    }
}

impl<It1, It2, CmpT> MarketDrivenMultiJobsIterator<It1, It2, CmpT>
where
    It1: JobContextIterator,
    It2: JobContextIterator,
    CmpT: PoolJobComparator,
{
    pub fn with_comparator(
        pool: impl Into<PoolName>,
        it1: It1,
        it2: It2,
        comparator: CmpT,
    ) -> Self {
        MarketDrivenMultiJobsIterator {
            pool: pool.into(),
            it1,
            it2,
            comparator,
            it1_value: None,
            it2_value: None,
        }
    }

    pub fn pool(&self) -> &PoolName {
        &self.pool
    }
}

impl<It1, It2, CmpT> JobContextIterator for MarketDrivenMultiJobsIterator<It1, It2, CmpT>
where
    It1: JobContextIterator,
    It2: JobContextIterator,
    CmpT: PoolJobComparator,
{
    fn next(&mut self) -> Result<Option<Arc<JobSchedulingContext>>> {
        if self.it1_value.is_none() {
            self.it1_value = self.it1.next()?;
        }
        if self.it2_value.is_none() {
            self.it2_value = self.it2.next()?;
        }

        let take_first = match (&self.it1_value, &self.it2_value) {
            (Some(j1), Some(j2)) => {
                self.comparator.compare(&self.pool, j1.job(), j2.job()) == Ordering::Less
            }
            (first, _) => first.is_some(),
        };

        // Both sides empty means both are exhausted, and `take` leaves them empty.
        Ok(if take_first {
            self.it1_value.take()
        } else {
            self.it2_value.take()
        })
    }
}
