//! Feeding program configuration format.

use crate::common::*;

pub use dataset::*;
pub use feed::*;

/// The main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    /// If set, small boxes are drawn on each produced image and saved.
    #[serde(default)]
    pub visualize: Option<VisualizeConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = std::fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }
}

mod dataset {
    use super::*;

    /// Dataset directory layout.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct DatasetConfig {
        /// The dataset root directory.
        #[serde(default = "default_root")]
        pub root: PathBuf,
        /// The image directory relative to the root. It is scanned recursively.
        #[serde(default = "default_images_dir")]
        pub images_dir: PathBuf,
        /// The small box annotation directory relative to the root.
        #[serde(default = "default_split_dir")]
        pub split_dir: PathBuf,
        /// The big ground truth annotation directory relative to the root.
        #[serde(default = "default_labels_dir")]
        pub labels_dir: PathBuf,
        /// Accepted image file name suffixes. Matching is case-sensitive.
        #[serde(default = "default_extensions")]
        pub extensions: Vec<String>,
    }

    impl DatasetConfig {
        pub fn new<P>(root: P) -> Self
        where
            P: Into<PathBuf>,
        {
            Self {
                root: root.into(),
                ..Default::default()
            }
        }

        pub fn images_path(&self) -> PathBuf {
            self.root.join(&self.images_dir)
        }

        /// The small box annotation file of an image.
        pub fn split_file(&self, image_path: &Path) -> Option<PathBuf> {
            annotation_file(&self.root.join(&self.split_dir), image_path)
        }

        /// The big ground truth annotation file of an image.
        pub fn labels_file(&self, image_path: &Path) -> Option<PathBuf> {
            annotation_file(&self.root.join(&self.labels_dir), image_path)
        }
    }

    impl Default for DatasetConfig {
        fn default() -> Self {
            Self {
                root: default_root(),
                images_dir: default_images_dir(),
                split_dir: default_split_dir(),
                labels_dir: default_labels_dir(),
                extensions: default_extensions(),
            }
        }
    }

    fn annotation_file(dir: &Path, image_path: &Path) -> Option<PathBuf> {
        let stem = image_path.file_stem()?;
        let mut file_name = stem.to_owned();
        file_name.push(".txt");
        Some(dir.join(file_name))
    }

    fn default_root() -> PathBuf {
        PathBuf::from("data/train")
    }

    fn default_images_dir() -> PathBuf {
        PathBuf::from("images")
    }

    fn default_split_dir() -> PathBuf {
        PathBuf::from("split")
    }

    fn default_labels_dir() -> PathBuf {
        PathBuf::from("labels")
    }

    fn default_extensions() -> Vec<String> {
        ["jpg", "png", "jpeg", "JPG"]
            .iter()
            .map(|ext| ext.to_string())
            .collect()
    }
}

mod feed {
    use super::*;

    /// Worker pool and queue options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct FeedConfig {
        /// The number of generator workers.
        #[serde(default = "default_num_workers")]
        pub num_workers: NonZeroUsize,
        /// The capacity of the queue shared by the workers.
        #[serde(default = "default_queue_size")]
        pub queue_size: NonZeroUsize,
        /// The interval the consumer waits on an empty queue before checking
        /// the workers again, in milliseconds.
        #[serde(default = "default_poll_interval_ms")]
        pub poll_interval_ms: u64,
        /// The interval a worker waits on a full queue before checking the
        /// stop flag again, in milliseconds.
        #[serde(default = "default_send_timeout_ms")]
        pub send_timeout_ms: u64,
    }

    impl FeedConfig {
        pub fn poll_interval(&self) -> Duration {
            Duration::from_millis(self.poll_interval_ms)
        }

        pub fn send_timeout(&self) -> Duration {
            Duration::from_millis(self.send_timeout_ms)
        }
    }

    impl Default for FeedConfig {
        fn default() -> Self {
            Self {
                num_workers: default_num_workers(),
                queue_size: default_queue_size(),
                poll_interval_ms: default_poll_interval_ms(),
                send_timeout_ms: default_send_timeout_ms(),
            }
        }
    }

    fn default_num_workers() -> NonZeroUsize {
        NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
    }

    fn default_queue_size() -> NonZeroUsize {
        NonZeroUsize::new(24).unwrap_or(NonZeroUsize::MIN)
    }

    fn default_poll_interval_ms() -> u64 {
        10
    }

    fn default_send_timeout_ms() -> u64 {
        100
    }
}

/// Debug rendering options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizeConfig {
    /// The directory to save rendered images.
    pub output_dir: PathBuf,
}

/// Logging options of the feeding program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// The period of throughput reports in seconds.
    #[serde(default = "default_report_interval_secs")]
    pub report_interval_secs: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            report_interval_secs: default_report_interval_secs(),
        }
    }
}

fn default_report_interval_secs() -> u64 {
    1
}
