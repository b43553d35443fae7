//! Well-known filesystem locations.

use std::path::PathBuf;

/// The cached-distribution root used when neither `--cached-root` nor
/// `DISTRO_BUILD_CACHE` is given: `<system cache dir>/distro-build`
/// (`~/.cache/distro-build` on Linux, `~/Library/Caches/distro-build` on
/// macOS), with a relative `.distro-build-cache` fallback for platforms
/// where no cache directory can be determined.
pub fn default_cached_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".distro-build-cache"))
        .join("distro-build")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cached_root_ends_with_tool_dir() {
        assert!(default_cached_root().ends_with("distro-build"));
    }
}
