//! The training sample feed for the CTPN text detector.

pub mod common;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod queue;
pub mod utils;

use crate::{
    common::*,
    config::{Config, DatasetConfig},
    data::{Sample, SampleGenerator, Scanner, Visualizer},
    logging::Logger,
    queue::{EnqueuerConfig, GeneratorEnqueuer, SampleFeed},
    utils::{RateCounter, StopFlag},
};

/// List the training images under `<root>/images`.
pub fn scan<P>(root: P) -> Vec<PathBuf>
where
    P: Into<PathBuf>,
{
    Scanner::new(&DatasetConfig::new(root), Logger::default().child("scanner")).scan()
}

/// Create an endless sample stream on the current thread.
///
/// If `visualize` is set, small boxes are drawn onto each produced image,
/// and the rendering is saved if the configuration names an output
/// directory.
pub fn generate(config: &Config, visualize: bool) -> SampleGenerator {
    let logger = Logger::default().child("generator");
    let generator = SampleGenerator::new(Arc::new(config.dataset.clone()), logger.clone());

    if visualize {
        generator.visualizer(Visualizer::new(
            config.visualize.as_ref(),
            logger.child("visualizer"),
        ))
    } else {
        generator
    }
}

/// Start `num_workers` generators on worker threads and stream their samples
/// through the bounded queue.
pub fn feed(
    num_workers: NonZeroUsize,
    config: &Config,
) -> Result<SampleFeed<GeneratorEnqueuer<Sample>>> {
    let logger = Logger::default();
    let dataset = Arc::new(config.dataset.clone());
    let visualize = config.visualize.clone();

    let factory = {
        let logger = logger.clone();
        move |index: usize, stop_flag: StopFlag| -> Result<SampleGenerator> {
            let logger = logger.child(format!("worker-{}", index));
            let generator = SampleGenerator::new(dataset.clone(), logger.child("generator"))
                .stop_flag(stop_flag);
            let generator = match &visualize {
                Some(visualize) => generator.visualizer(Visualizer::new(
                    Some(visualize),
                    logger.child("visualizer"),
                )),
                None => generator,
            };
            Ok(generator)
        }
    };

    let pool = GeneratorEnqueuer::start(
        factory,
        EnqueuerConfig {
            max_queue_size: config.feed.queue_size,
            num_workers,
            send_timeout: config.feed.send_timeout(),
        },
        logger.child("enqueuer"),
    )?;

    Ok(SampleFeed::new(
        pool,
        config.feed.poll_interval(),
        logger.child("feed"),
    ))
}

/// The entry of the feeding program.
///
/// It pulls samples from the feed, or from a single generator if
/// `use_queue` is false, and reports the throughput. It runs forever unless
/// `max_samples` is given.
pub fn start(config: Arc<Config>, max_samples: Option<usize>, use_queue: bool) -> Result<()> {
    let logger = Logger::default();
    let mut rate_counter =
        RateCounter::new(Duration::from_secs(config.logging.report_interval_secs.max(1)));

    let samples: Box<dyn Iterator<Item = Result<Sample>>> = if use_queue {
        Box::new(feed(config.feed.num_workers, &config)?)
    } else {
        Box::new(generate(&config, config.visualize.is_some()).map(Ok))
    };

    let mut count = 0;
    for result in samples.take(max_samples.unwrap_or(usize::MAX)) {
        let sample = result?;
        count += 1;
        rate_counter.add(1.0);

        let Sample {
            ref filenames,
            ref boxes,
            image_info,
            ref big_gt,
            ..
        } = sample;
        logger.debug(format_args!(
            "sample {}: '{}' {:?}, {} boxes, {} polygons",
            count,
            filenames
                .iter()
                .map(|path| path.display().to_string())
                .join(", "),
            image_info.to_array(),
            boxes.len(),
            big_gt.num_quads()
        ));

        if let Some(rate) = rate_counter.rate() {
            logger.info(format_args!("{:.2} samples/s", rate));
        }
    }

    logger.info(format_args!("received {} samples", count));
    Ok(())
}
