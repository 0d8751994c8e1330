use super::WorkerPool;
use crate::{common::*, error::FeedError, logging::Logger, utils::StopFlag};
use flume::{Receiver, SendTimeoutError, Sender};

/// Options of a [GeneratorEnqueuer].
#[derive(Debug, Clone)]
pub struct EnqueuerConfig {
    /// The queue capacity.
    pub max_queue_size: NonZeroUsize,
    /// The number of producer threads.
    pub num_workers: NonZeroUsize,
    /// How long a producer waits on a full queue before checking the stop
    /// flag again.
    pub send_timeout: Duration,
}

/// Runs independent generator instances on worker threads and collects
/// their items into one bounded queue.
///
/// Each worker builds its own generator from the factory. Workers block
/// while the queue is full.
#[derive(Debug)]
pub struct GeneratorEnqueuer<T> {
    rx: Receiver<T>,
    stop_flag: StopFlag,
    num_alive: Arc<AtomicUsize>,
    workers: Vec<(usize, JoinHandle<Result<()>>)>,
    logger: Logger,
}

impl<T> GeneratorEnqueuer<T>
where
    T: 'static + Send,
{
    /// Spawn the workers.
    ///
    /// The factory receives the worker index and the pool's stop flag. The
    /// generator it returns should end once the flag is raised.
    pub fn start<F, I>(factory: F, config: EnqueuerConfig, logger: Logger) -> Result<Self>
    where
        F: 'static + Fn(usize, StopFlag) -> Result<I> + Send + Sync,
        I: Iterator<Item = T>,
    {
        let EnqueuerConfig {
            max_queue_size,
            num_workers,
            send_timeout,
        } = config;
        let num_workers = num_workers.get();

        let (tx, rx) = flume::bounded(max_queue_size.get());
        let factory = Arc::new(factory);
        let stop_flag = StopFlag::new();
        let num_alive = Arc::new(AtomicUsize::new(0));

        let mut pool = Self {
            rx,
            stop_flag: stop_flag.clone(),
            num_alive: num_alive.clone(),
            workers: Vec::with_capacity(num_workers),
            logger: logger.clone(),
        };

        for index in 0..num_workers {
            let worker = Worker {
                index,
                tx: tx.clone(),
                stop_flag: stop_flag.clone(),
                send_timeout,
                logger: logger.child(format!("worker-{}", index)),
                _alive: AliveGuard::new(num_alive.clone()),
            };
            let factory = factory.clone();

            let spawn_result = thread::Builder::new()
                .name(format!("feed-worker-{}", index))
                .spawn(move || worker.run(&*factory));

            match spawn_result {
                Ok(handle) => pool.workers.push((index, handle)),
                Err(err) => {
                    let err = Error::from(err).context(format!("failed to spawn worker {}", index));
                    if let Err(stop_err) = pool.stop() {
                        logger.error(format_args!("{:#}", stop_err));
                    }
                    return Err(err);
                }
            }
        }

        logger.info(format_args!(
            "started {} workers with queue size {}",
            num_workers,
            max_queue_size.get()
        ));

        Ok(pool)
    }

    /// The number of items waiting in the queue.
    pub fn queue_len(&self) -> usize {
        self.rx.len()
    }
}

impl<T> WorkerPool for GeneratorEnqueuer<T> {
    type Item = T;

    fn is_running(&self) -> bool {
        !self.stop_flag.is_stopped() && self.num_alive.load(Ordering::SeqCst) > 0
    }

    fn try_get(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    fn get_timeout(&self, timeout: Duration) -> Option<T> {
        self.rx.recv_timeout(timeout).ok()
    }

    fn stop(&mut self) -> Result<()> {
        self.stop_flag.stop();
        if self.workers.is_empty() {
            return Ok(());
        }

        // release producers blocked on a full queue
        self.rx.drain().for_each(drop);

        let errors: Vec<_> = mem::take(&mut self.workers)
            .into_iter()
            .filter_map(|(index, handle)| match handle.join() {
                Ok(Ok(())) => None,
                Ok(Err(err)) => Some(err.context(format!("worker {} failed", index))),
                Err(_) => Some(format_err!("worker {} panicked", index)),
            })
            .collect();
        self.rx.drain().for_each(drop);
        self.logger.info(format_args!("stopped all workers"));

        if errors.is_empty() {
            Ok(())
        } else {
            Err(FeedError::PoolFailure { errors }.into())
        }
    }
}

impl<T> Drop for GeneratorEnqueuer<T> {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            self.logger.error(format_args!("{:#}", err));
        }
    }
}

struct Worker<T> {
    index: usize,
    tx: Sender<T>,
    stop_flag: StopFlag,
    send_timeout: Duration,
    logger: Logger,
    _alive: AliveGuard,
}

impl<T> Worker<T> {
    fn run<F, I>(self, factory: &F) -> Result<()>
    where
        F: Fn(usize, StopFlag) -> Result<I>,
        I: Iterator<Item = T>,
    {
        let Self {
            index,
            ref tx,
            ref stop_flag,
            send_timeout,
            ref logger,
            ..
        } = self;

        let generator = factory(index, stop_flag.clone())?;
        logger.debug(format_args!("worker started"));

        for item in generator {
            let mut item = item;
            loop {
                if stop_flag.is_stopped() {
                    return Ok(());
                }
                match tx.send_timeout(item, send_timeout) {
                    Ok(()) => break,
                    Err(SendTimeoutError::Timeout(returned)) => item = returned,
                    Err(SendTimeoutError::Disconnected(_)) => return Ok(()),
                }
            }
        }

        logger.debug(format_args!("generator exhausted"));
        Ok(())
    }
}

/// Counts a worker as alive until it is dropped, including on panic.
struct AliveGuard(Arc<AtomicUsize>);

impl AliveGuard {
    fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for AliveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_queue_size: usize, num_workers: usize) -> EnqueuerConfig {
        EnqueuerConfig {
            max_queue_size: NonZeroUsize::new(max_queue_size).unwrap(),
            num_workers: NonZeroUsize::new(num_workers).unwrap(),
            send_timeout: Duration::from_millis(10),
        }
    }

    fn endless(index: usize, stop_flag: StopFlag) -> Result<impl Iterator<Item = usize>> {
        Ok(iter::repeat(index).take_while(move |_| !stop_flag.is_stopped()))
    }

    #[test]
    fn queue_is_bounded() {
        let mut pool = GeneratorEnqueuer::start(endless, config(4, 2), Logger::default()).unwrap();
        thread::sleep(Duration::from_millis(100));
        assert!(pool.is_running());
        assert_eq!(pool.queue_len(), 4);
        pool.stop().unwrap();
        assert!(!pool.is_running());
    }

    #[test]
    fn all_workers_contribute() {
        let mut pool = GeneratorEnqueuer::start(endless, config(8, 3), Logger::default()).unwrap();

        let mut seen = [false; 3];
        let deadline = Instant::now() + Duration::from_secs(10);
        while !seen.iter().all(|&seen| seen) && Instant::now() < deadline {
            if let Some(index) = pool.get_timeout(Duration::from_millis(10)) {
                seen[index] = true;
            }
        }
        assert_eq!(seen, [true; 3]);
        pool.stop().unwrap();
    }

    #[test]
    fn stop_is_bounded_under_backpressure() {
        let mut pool = GeneratorEnqueuer::start(endless, config(1, 4), Logger::default()).unwrap();
        thread::sleep(Duration::from_millis(50));

        let since = Instant::now();
        pool.stop().unwrap();
        assert!(since.elapsed() < Duration::from_secs(5));
        assert!(pool.try_get().is_none());
        pool.stop().unwrap();
    }

    #[test]
    fn finite_generators_end_the_pool() {
        let mut pool = GeneratorEnqueuer::start(
            |index, _| Ok(iter::repeat(index).take(3)),
            config(16, 2),
            Logger::default(),
        )
        .unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        while pool.is_running() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!pool.is_running());
        assert_eq!(pool.queue_len(), 6);
        pool.stop().unwrap();
    }

    #[test]
    fn worker_failures_are_reported() {
        let mut pool = GeneratorEnqueuer::start(
            |index, stop_flag| {
                ensure!(index != 1, "cannot open dataset");
                endless(index, stop_flag)
            },
            config(4, 2),
            Logger::default(),
        )
        .unwrap();
        thread::sleep(Duration::from_millis(50));

        let err = pool.stop().unwrap_err();
        let err = err.downcast_ref::<FeedError>().unwrap();
        let FeedError::PoolFailure { errors } = err;
        assert_eq!(errors.len(), 1);
        assert!(format!("{:#}", errors[0]).contains("cannot open dataset"));
    }
}
