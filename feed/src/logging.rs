//! Logging handle shared by the pipeline components.

use crate::common::*;

/// A cloneable handle that tags log records with a component target.
///
/// Components receive a handle when they are built instead of logging
/// through a fixed module path, so records from the generator inside
/// worker 2 read as `ctpn_feed::worker-2::generator`.
#[derive(Debug, Clone)]
pub struct Logger {
    target: Arc<str>,
}

impl Logger {
    pub fn new<S>(target: S) -> Self
    where
        S: AsRef<str>,
    {
        Self {
            target: target.as_ref().into(),
        }
    }

    /// Derive a handle for a sub-component.
    pub fn child<S>(&self, name: S) -> Self
    where
        S: Display,
    {
        Self::new(format!("{}::{}", self.target, name))
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        log::log!(target: self.target(), level, "{}", args);
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(module_path!().split("::").next().unwrap_or("ctpn_feed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_targets_nest() {
        let logger = Logger::new("ctpn_feed").child("worker-2").child("generator");
        assert_eq!(logger.target(), "ctpn_feed::worker-2::generator");
        assert_eq!(Logger::default().target(), "ctpn_feed");
    }
}
