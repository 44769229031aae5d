//! Assembling the iterator a scheduling round pulls a queue's jobs from.

use crate::{
    config::PoolConfig,
    iteration::{
        BoxJobContextIterator, JobContextIteratorExt as _, MarketDrivenMultiJobsIterator,
        MultiJobsIterator, QueuedJobsIterator,
    },
    repository::InMemoryJobRepository,
    round::RoundContext,
};
use marshal_base::QueueName;
use marshal_jobdb::{JobComparator, JobRepository, MarketSchedulingOrder};
use slog::debug;

/// Jobs of `queue` for the pool described by `pool`: jobs already in `in_memory` (typically those
/// evicted earlier in the round) together with the queue's queued jobs from `job_db`.
///
/// In a market-driven pool the two are merged by bid price, whatever order `in_memory` keeps its
/// queues in. Otherwise every job from `in_memory` comes before any queued job, in the
/// repository's order.
pub fn queue_job_iterator<'a, CompT, RepoT>(
    ctx: &RoundContext,
    pool: &PoolConfig,
    queue: &QueueName,
    in_memory: &InMemoryJobRepository<CompT>,
    job_db: &RepoT,
) -> BoxJobContextIterator<'a>
where
    CompT: JobComparator,
    RepoT: JobRepository + ?Sized,
    RepoT::Iter: Send + 'a,
{
    let sort_order = pool.sort_order();
    let evicted = if pool.market_driven {
        let by_bid = MarketSchedulingOrder::for_pool(pool.name.clone());
        in_memory.get_job_iterator_sorted_by(queue, &by_bid)
    } else {
        in_memory.get_job_iterator(queue)
    };
    let queued = QueuedJobsIterator::new(ctx.clone(), queue, &pool.name, sort_order, job_db);
    debug!(ctx.log(), "building queue iterator";
        "queue" => %queue,
        "pool" => %pool.name,
        "order" => %sort_order,
        "evicted" => evicted.remaining());
    if pool.market_driven {
        MarketDrivenMultiJobsIterator::new(pool.name.clone(), evicted.boxed(), queued.boxed())
            .boxed()
    } else {
        MultiJobsIterator::new([evicted.boxed(), queued.boxed()]).boxed()
    }
}
