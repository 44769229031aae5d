use marshal_base::{Job, JobId};
use std::{sync::Arc, time::SystemTime};

/// A job together with the state the scheduler keeps about it for the duration of one scheduling
/// round. Contexts are shared read-only between the repository and the iterators that hand them
/// out.
#[derive(Clone, Debug)]
pub struct JobSchedulingContext {
    job_id: JobId,
    job: Arc<Job>,
    created: SystemTime,
}

impl JobSchedulingContext {
    pub fn from_job(job: impl Into<Arc<Job>>) -> Self {
        let job = job.into();
        JobSchedulingContext {
            job_id: job.id().clone(),
            job,
            created: SystemTime::now(),
        }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn job(&self) -> &Arc<Job> {
        &self.job
    }

    /// When this context was created, which is when the job was first pulled into the round.
    pub fn created(&self) -> SystemTime {
        self.created
    }
}
