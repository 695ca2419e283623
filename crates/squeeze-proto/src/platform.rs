use std::path::PathBuf;

const APP_DIR: &str = "squeeze-menu";

/// `~/.config/squeeze-menu` on Unix, the platform config dir elsewhere.
/// Falls back to the working directory when no home is known.
pub fn config_dir() -> PathBuf {
    #[cfg(unix)]
    let base = dirs::home_dir().map(|home| home.join(".config"));
    #[cfg(not(unix))]
    let base = dirs::config_dir();

    base.unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR)
}
