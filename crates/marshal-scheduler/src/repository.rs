//! The per-round cache of jobs already pulled into a scheduling round.
//!
//! A round repeatedly asks "what comes next in queue Q" while resource state changes. Rescanning
//! and resorting the job store for every such question is too slow, so jobs are enqueued here in
//! batches, bucketed by queue, kept sorted, and handed out as snapshot iterators.

use crate::{context::JobSchedulingContext, iteration::InMemoryJobIterator};
use marshal_base::{away_queue_name, Job, JobId, PoolName, QueueName};
use marshal_jobdb::JobComparator;
use slog::{debug, Logger};
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

#[derive(Default)]
struct Index {
    by_queue: HashMap<QueueName, Vec<Arc<JobSchedulingContext>>>,
    by_id: HashMap<JobId, Arc<JobSchedulingContext>>,
}

/// Job scheduling contexts for one pool, bucketed by queue and kept in `comparator` order.
///
/// Every operation takes the same lock over both mappings, so operations are atomic with respect
/// to each other. Iterators are snapshots and need no further locking.
pub struct InMemoryJobRepository<CompT> {
    current_pool: PoolName,
    comparator: CompT,
    index: Mutex<Index>,
    log: Logger,
}

impl<CompT: JobComparator> InMemoryJobRepository<CompT> {
    pub fn new(pool: impl Into<PoolName>, comparator: CompT, log: Logger) -> Self {
        InMemoryJobRepository {
            current_pool: pool.into(),
            comparator,
            index: Mutex::default(),
            log,
        }
    }

    pub fn current_pool(&self) -> &PoolName {
        &self.current_pool
    }

    /// The queue a job is filed under: its own queue, or its away queue if the job last ran in a
    /// pool other than this repository's.
    pub fn effective_queue(&self, job: &Job) -> QueueName {
        match job.latest_run_pool() {
            Some(pool) if *pool != self.current_pool => away_queue_name(job.queue()),
            _ => job.queue().clone(),
        }
    }

    /// Add a batch of contexts. Each affected queue is re-sorted once, after the whole batch is
    /// appended. The sort is stable: contexts that compare equal keep the order they were enqueued
    /// in.
    ///
    /// Enqueuing the same job twice is not guarded against.
    pub fn enqueue_many(&self, jctxs: impl IntoIterator<Item = Arc<JobSchedulingContext>>) {
        let mut index = self.index.lock().unwrap();
        let mut updated_queues = HashSet::new();
        let mut enqueued = 0usize;
        for jctx in jctxs {
            let queue = self.effective_queue(jctx.job());
            index.by_id.insert(jctx.job_id().clone(), jctx.clone());
            index.by_queue.entry(queue.clone()).or_default().push(jctx);
            updated_queues.insert(queue);
            enqueued += 1;
        }
        for queue in &updated_queues {
            if let Some(bucket) = index.by_queue.get_mut(queue) {
                bucket.sort_by(|a, b| self.comparator.compare(a.job(), b.job()));
            }
        }
        debug!(self.log, "enqueued jobs";
            "pool" => %self.current_pool,
            "jobs" => enqueued,
            "sorted_queues" => updated_queues.len());
    }

    /// The ids of the jobs in `queue`, in scheduling order. Empty for an unknown queue.
    pub fn get_queue_job_ids(&self, queue: &QueueName) -> Vec<JobId> {
        let index = self.index.lock().unwrap();
        index
            .by_queue
            .get(queue)
            .map(|bucket| bucket.iter().map(|jctx| jctx.job_id().clone()).collect())
            .unwrap_or_default()
    }

    /// The jobs with the given ids, in the order asked for. Ids that aren't in the repository are
    /// skipped.
    pub fn get_existing_jobs_by_ids<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a JobId>,
    ) -> Vec<Arc<Job>> {
        let index = self.index.lock().unwrap();
        ids.into_iter()
            .filter_map(|id| index.by_id.get(id))
            .map(|jctx| jctx.job().clone())
            .collect()
    }

    /// An iterator over `queue` as it is right now. Later enqueues don't affect it.
    pub fn get_job_iterator(&self, queue: &QueueName) -> InMemoryJobIterator {
        let index = self.index.lock().unwrap();
        InMemoryJobIterator::new(index.by_queue.get(queue).cloned().unwrap_or_default())
    }

    /// Like [`Self::get_job_iterator`], but with the snapshot stably re-sorted by `comparator`.
    /// Cheap when the repository is already kept in that order.
    pub fn get_job_iterator_sorted_by(
        &self,
        queue: &QueueName,
        comparator: &impl JobComparator,
    ) -> InMemoryJobIterator {
        let mut jctxs = self
            .index
            .lock()
            .unwrap()
            .by_queue
            .get(queue)
            .cloned()
            .unwrap_or_default();
        jctxs.sort_by(|a, b| comparator.compare(a.job(), b.job()));
        InMemoryJobIterator::new(jctxs)
    }

    pub fn queue_len(&self, queue: &QueueName) -> usize {
        self.index
            .lock()
            .unwrap()
            .by_queue
            .get(queue)
            .map_or(0, Vec::len)
    }

    /// The number of distinct jobs in the repository.
    pub fn len(&self) -> usize {
        self.index.lock().unwrap().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
