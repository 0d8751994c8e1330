use crate::{common::*, config::DatasetConfig, logging::Logger};

/// Lists the training images of a dataset.
#[derive(Debug, Clone)]
pub struct Scanner {
    images_dir: PathBuf,
    extensions: Vec<String>,
    logger: Logger,
}

impl Scanner {
    pub fn new(config: &DatasetConfig, logger: Logger) -> Self {
        Self {
            images_dir: config.images_path(),
            extensions: config.extensions.clone(),
            logger,
        }
    }

    /// Recursively collect image files under the image directory.
    ///
    /// The order follows directory traversal. A missing image directory
    /// yields an empty list.
    pub fn scan(&self) -> Vec<PathBuf> {
        let pattern = format!(
            "{}/**/*",
            glob::Pattern::escape(&self.images_dir.to_string_lossy())
        );

        let paths = match glob::glob(&pattern) {
            Ok(paths) => paths,
            Err(err) => {
                self.logger.error(format_args!(
                    "invalid image directory '{}': {}",
                    self.images_dir.display(),
                    err
                ));
                return vec![];
            }
        };

        let image_files: Vec<_> = paths
            .filter_map(|result| match result {
                Ok(path) => Some(path),
                Err(err) => {
                    self.logger
                        .warn(format_args!("ignore unreadable path: {}", err));
                    None
                }
            })
            .filter(|path| path.is_file() && self.is_image_file(path))
            .collect();

        self.logger.info(format_args!(
            "found {} images in '{}'",
            image_files.len(),
            self.images_dir.display()
        ));
        image_files
    }

    fn is_image_file(&self, path: &Path) -> bool {
        let file_name = match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => name,
            None => return false,
        };
        self.extensions
            .iter()
            .any(|ext| file_name.ends_with(ext.as_str()))
    }
}
