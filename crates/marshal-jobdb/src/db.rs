use crate::{
    JobComparator as _, JobIterator, JobRepository, JobSortOrder, MarketSchedulingOrder,
    PoolJobComparator as _, SchedulingOrder,
};
use anyhow::Result;
use marshal_base::{Job, JobId, PoolName, QueueName};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    vec,
};

/// An in-memory job store. Reads hand out sorted snapshots, so a [`JobDbIterator`] is unaffected
/// by later writes.
#[derive(Debug, Default)]
pub struct JobDb {
    jobs: Mutex<HashMap<JobId, Arc<Job>>>,
}

impl JobDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the given jobs, replacing any stored job with the same id.
    pub fn upsert(&self, jobs: impl IntoIterator<Item = Job>) {
        let mut stored = self.jobs.lock().unwrap();
        for job in jobs {
            stored.insert(job.id().clone(), Arc::new(job));
        }
    }

    /// Remove the jobs with the given ids. Unknown ids are ignored.
    pub fn delete<'a>(&self, ids: impl IntoIterator<Item = &'a JobId>) {
        let mut stored = self.jobs.lock().unwrap();
        for id in ids {
            stored.remove(id);
        }
    }

    pub fn get(&self, id: &JobId) -> Option<Arc<Job>> {
        self.jobs.lock().unwrap().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl JobRepository for JobDb {
    type Iter = JobDbIterator;

    fn queued_jobs(
        &self,
        queue: &QueueName,
        pool: &PoolName,
        order: JobSortOrder,
    ) -> JobDbIterator {
        let mut jobs: Vec<_> = self
            .jobs
            .lock()
            .unwrap()
            .values()
            .filter(|job| job.queued() && job.queue() == queue && job.is_eligible_for(pool))
            .cloned()
            .collect();
        match order {
            JobSortOrder::FairShare => jobs.sort_by(|a, b| SchedulingOrder.compare(a, b)),
            JobSortOrder::Price => {
                jobs.sort_by(|a, b| MarketSchedulingOrder.compare(pool, a, b))
            }
        }
        JobDbIterator {
            jobs: jobs.into_iter(),
        }
    }
}

/// A snapshot of one queue's queued jobs. Never fails.
#[derive(Debug)]
pub struct JobDbIterator {
    jobs: vec::IntoIter<Arc<Job>>,
}

impl JobIterator for JobDbIterator {
    fn next(&mut self) -> Result<Option<Arc<Job>>> {
        Ok(self.jobs.next())
    }
}
