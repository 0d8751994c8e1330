use super::WorkerPool;
use crate::{common::*, logging::Logger};

/// The consumer side of a worker pool.
///
/// Each call to `next()` waits on the queue in steps of the poll interval
/// while the pool is alive, and returns as soon as an item arrives. When the
/// pool dies, the remaining queued items are drained and a pool failure, if
/// any, is returned as the last item. The pool is stopped when the feed is
/// stopped or dropped.
#[derive(Debug)]
pub struct SampleFeed<P>
where
    P: WorkerPool,
{
    pool: Option<P>,
    poll_interval: Duration,
    logger: Logger,
}

impl<P> SampleFeed<P>
where
    P: WorkerPool,
{
    pub fn new(pool: P, poll_interval: Duration, logger: Logger) -> Self {
        Self {
            pool: Some(pool),
            poll_interval,
            logger,
        }
    }

    /// Stop the worker pool. Later calls to `next()` return `None`.
    pub fn stop(&mut self) -> Result<()> {
        match self.pool.take() {
            Some(mut pool) => pool.stop(),
            None => Ok(()),
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.pool.is_none()
    }
}

impl<P> Iterator for SampleFeed<P>
where
    P: WorkerPool,
{
    type Item = Result<P::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let pool = self.pool.as_ref()?;

            let item = if pool.is_running() {
                pool.get_timeout(self.poll_interval)
            } else {
                match pool.try_get() {
                    Some(item) => Some(item),
                    None => {
                        self.logger.info(format_args!("worker pool is no longer running"));
                        return self.stop().err().map(Err);
                    }
                }
            };

            if let Some(item) = item {
                self.logger.debug(format_args!("took an item from the queue"));
                return Some(Ok(item));
            }
        }
    }
}

impl<P> Drop for SampleFeed<P>
where
    P: WorkerPool,
{
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            self.logger.error(format_args!("{:#}", err));
        }
    }
}
