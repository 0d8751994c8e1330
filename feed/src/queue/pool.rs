use crate::common::*;

/// A set of producers that deliver items through a bounded queue.
pub trait WorkerPool {
    type Item;

    /// Whether any producer is still alive and the pool is not stopped.
    fn is_running(&self) -> bool;

    /// Take an item from the queue without waiting.
    fn try_get(&self) -> Option<Self::Item>;

    /// Take an item from the queue, waiting at most `timeout`.
    ///
    /// The default implementation polls [WorkerPool::try_get] before and
    /// after sleeping for `timeout`.
    fn get_timeout(&self, timeout: Duration) -> Option<Self::Item> {
        if let Some(item) = self.try_get() {
            return Some(item);
        }
        thread::sleep(timeout);
        self.try_get()
    }

    /// Stop all producers and release the queue.
    ///
    /// Calling it more than once is allowed. It returns the failures of
    /// producers that terminated abnormally.
    fn stop(&mut self) -> Result<()>;
}
