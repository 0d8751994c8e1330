use super::{AnnotationLoader, Sample, Scanner, Visualizer};
use crate::{
    common::*,
    config::DatasetConfig,
    error::{AnnotationKind, SkipReason},
    logging::Logger,
    utils::StopFlag,
};

/// The pause between passes over an empty dataset.
const EMPTY_DATASET_PAUSE: Duration = Duration::from_millis(100);

/// Counters of a [SampleGenerator].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorStats {
    /// The number of started passes over the image list.
    pub epoch: usize,
    pub produced: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// An endless, shuffled stream of samples over a dataset.
///
/// The image list is scanned once on construction. Each pass visits the list
/// in a fresh random order. Images whose annotations are missing, empty or
/// unreadable are logged and skipped. The stream only ends when its stop flag
/// is raised.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct SampleGenerator {
    config: Arc<DatasetConfig>,
    loader: AnnotationLoader,
    visualizer: Option<Visualizer>,
    stop_flag: Option<StopFlag>,
    logger: Logger,
    #[derivative(Debug = "ignore")]
    image_files: Vec<PathBuf>,
    order: Vec<usize>,
    cursor: usize,
    #[derivative(Debug = "ignore")]
    rng: StdRng,
    stats: GeneratorStats,
}

impl SampleGenerator {
    pub fn new(config: Arc<DatasetConfig>, logger: Logger) -> Self {
        let image_files = Scanner::new(&config, logger.child("scanner")).scan();
        logger.info(format_args!(
            "{} training images in '{}'",
            image_files.len(),
            config.root.display()
        ));
        if image_files.is_empty() {
            logger.warn(format_args!(
                "no images found in '{}', no samples will be produced",
                config.images_path().display()
            ));
        }

        Self {
            loader: AnnotationLoader::new(logger.child("annotation")),
            config,
            visualizer: None,
            stop_flag: None,
            logger,
            image_files,
            order: vec![],
            cursor: 0,
            rng: StdRng::from_entropy(),
            stats: GeneratorStats::default(),
        }
    }

    /// Draw small boxes onto every produced image.
    pub fn visualizer(mut self, visualizer: Visualizer) -> Self {
        self.visualizer = Some(visualizer);
        self
    }

    /// End the stream once the flag is raised.
    pub fn stop_flag(mut self, stop_flag: StopFlag) -> Self {
        self.stop_flag = Some(stop_flag);
        self
    }

    pub fn image_files(&self) -> &[PathBuf] {
        &self.image_files
    }

    pub fn stats(&self) -> GeneratorStats {
        self.stats
    }

    fn is_stopped(&self) -> bool {
        self.stop_flag
            .as_ref()
            .map(StopFlag::is_stopped)
            .unwrap_or(false)
    }

    fn start_epoch(&mut self) {
        if self.stats.epoch > 0 {
            let GeneratorStats {
                epoch,
                produced,
                skipped,
                failed,
            } = self.stats;
            self.logger.info(format_args!(
                "finished epoch {}: {} produced, {} skipped, {} failed in total",
                epoch, produced, skipped, failed
            ));
        }

        self.order = (0..self.image_files.len()).collect();
        self.order.shuffle(&mut self.rng);
        self.cursor = 0;
        self.stats.epoch += 1;
    }

    fn load_sample(&self, image_path: &Path) -> Result<Sample> {
        // samples are always three-channel color, whatever the file stores
        let image = image::open(image_path)
            .map(|image| DynamicImage::ImageRgb8(image.to_rgb8()))
            .with_context(|| format!("failed to decode image '{}'", image_path.display()))?;

        let split_file = self
            .config
            .split_file(image_path)
            .ok_or_else(|| format_err!("invalid image path '{}'", image_path.display()))?;
        let labels_file = self
            .config
            .labels_file(image_path)
            .ok_or_else(|| format_err!("invalid image path '{}'", image_path.display()))?;

        for (kind, file) in [
            (AnnotationKind::SmallBox, &split_file),
            (AnnotationKind::BigGt, &labels_file),
        ] {
            if !file.is_file() {
                return Err(SkipReason::MissingAnnotation {
                    kind,
                    image: image_path.to_owned(),
                    file: file.clone(),
                }
                .into());
            }
        }

        let boxes = self.loader.load_boxes(&split_file)?;
        let big_gt = self.loader.load_big_gt(&labels_file)?;

        let empty_kind = if boxes.is_empty() {
            Some((AnnotationKind::SmallBox, split_file))
        } else if big_gt.is_empty() {
            Some((AnnotationKind::BigGt, labels_file))
        } else {
            None
        };
        if let Some((kind, file)) = empty_kind {
            return Err(SkipReason::EmptyAnnotation {
                kind,
                image: image_path.to_owned(),
                file,
            }
            .into());
        }

        let image = match &self.visualizer {
            Some(visualizer) => visualizer.render(image, &boxes, image_path)?,
            None => image,
        };

        Ok(Sample::new(image, image_path.to_owned(), boxes, big_gt))
    }
}

impl Iterator for SampleGenerator {
    type Item = Sample;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.is_stopped() {
                return None;
            }

            if self.cursor >= self.order.len() {
                self.start_epoch();
                if self.order.is_empty() {
                    thread::sleep(EMPTY_DATASET_PAUSE);
                    continue;
                }
            }

            let index = self.order[self.cursor];
            self.cursor += 1;
            let image_path = &self.image_files[index];

            match self.load_sample(image_path) {
                Ok(sample) => {
                    self.stats.produced += 1;
                    self.logger
                        .debug(format_args!("produced sample '{}'", image_path.display()));
                    return Some(sample);
                }
                Err(err) => match err.downcast_ref::<SkipReason>() {
                    Some(reason) => {
                        self.stats.skipped += 1;
                        self.logger.warn(format_args!("{}", reason));
                    }
                    None => {
                        self.stats.failed += 1;
                        self.logger
                            .error(format_args!("skip image '{}': {:#}", image_path.display(), err));
                    }
                },
            }
        }
    }
}
