//! Process-level setup.

/// Installs `env_logger` as the `log` backend.
///
/// Filtering follows `RUST_LOG`. Calling this more than once is harmless;
/// returns false if a logger was already installed.
pub fn init_logging() -> bool {
    let installed = env_logger::try_init().is_ok();
    if installed {
        log::info!("terrascope logging initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_noop() {
        init_logging();
        assert!(!init_logging());
    }
}
