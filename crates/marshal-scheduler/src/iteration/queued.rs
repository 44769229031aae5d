use super::JobContextIterator;
use crate::{context::JobSchedulingContext, round::RoundContext};
use anyhow::Result;
use marshal_base::{PoolName, QueueName};
use marshal_jobdb::{JobIterator, JobRepository, JobSortOrder};
use slog::debug;
use std::sync::Arc;

/// All queued jobs of one queue, read from the job store in the store's order for a pool.
///
/// The round's cancellation signal is checked at the start of every pull. Once the round is
/// cancelled, every pull fails without touching the store; a pull already in progress is allowed
/// to finish. The stop is logged once, however many pulls fail.
pub struct QueuedJobsIterator<IterT> {
    job_iter: IterT,
    queue: QueueName,
    pool: PoolName,
    ctx: RoundContext,
    stopped: bool,
}

impl<IterT: JobIterator> QueuedJobsIterator<IterT> {
    pub fn new<RepoT>(
        ctx: RoundContext,
        queue: &QueueName,
        pool: &PoolName,
        sort_order: JobSortOrder,
        repo: &RepoT,
    ) -> Self
    where
        RepoT: JobRepository<Iter = IterT> + ?Sized,
    {
        QueuedJobsIterator {
            job_iter: repo.queued_jobs(queue, pool, sort_order),
            queue: queue.clone(),
            pool: pool.clone(),
            ctx,
            stopped: false,
        }
    }

    pub fn queue(&self) -> &QueueName {
        &self.queue
    }

    pub fn pool(&self) -> &PoolName {
        &self.pool
    }
}

impl<IterT: JobIterator> JobContextIterator for QueuedJobsIterator<IterT> {
    fn next(&mut self) -> Result<Option<Arc<JobSchedulingContext>>> {
        if let Some(err) = self.ctx.err() {
            if !self.stopped {
                self.stopped = true;
                debug!(self.ctx.log(), "stopped reading queued jobs";
                    "queue" => %self.queue,
                    "pool" => %self.pool,
                    "reason" => %err);
            }
            return Err(err.into());
        }
        Ok(self
            .job_iter
            .next()?
            .map(|job| Arc::new(JobSchedulingContext::from_job(job))))
    }
}
