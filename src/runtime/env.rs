//! Platform directory lookups.

use std::path::PathBuf;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn config_dir_impl(&self) -> Option<PathBuf> {
        dirs::config_dir()
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};

    #[test]
    fn test_real_runtime_config_dir() {
        let runtime = RealRuntime;

        // CI containers may run without a home directory
        let dir = runtime.config_dir();
        assert!(dir.is_some() || cfg!(target_os = "linux"));
        if let Some(dir) = dir {
            assert!(dir.is_absolute());
        }
    }
}
