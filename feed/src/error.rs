//! Typed failures of the feeding pipeline.

use crate::common::*;

/// Why an image produced no sample in the current pass.
#[derive(Debug, thiserror::Error)]
pub enum SkipReason {
    #[error("{} annotation for image '{}' does not exist: '{}'", .kind, .image.display(), .file.display())]
    MissingAnnotation {
        kind: AnnotationKind,
        image: PathBuf,
        file: PathBuf,
    },
    #[error("{} annotation for image '{}' is empty: '{}'", .kind, .image.display(), .file.display())]
    EmptyAnnotation {
        kind: AnnotationKind,
        image: PathBuf,
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    SmallBox,
    BigGt,
}

impl Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SmallBox => write!(f, "small box"),
            Self::BigGt => write!(f, "big ground truth"),
        }
    }
}

/// A line in an annotation file that cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[error("malformed line {} in '{}': {}: '{}'", .line_no, .path.display(), .reason, .line)]
pub struct MalformedLine {
    pub path: PathBuf,
    /// One-based line number.
    pub line_no: usize,
    pub line: String,
    pub reason: Cow<'static, str>,
}

/// Failures that end the feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("{} of the generator workers failed: {}", .errors.len(), join_errors(.errors))]
    PoolFailure { errors: Vec<Error> },
}

fn join_errors(errors: &[Error]) -> String {
    errors.iter().map(|err| format!("{:#}", err)).join("; ")
}
