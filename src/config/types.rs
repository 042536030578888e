use serde::Deserialize;

/// Main configuration structure for Quire-Harvest
///
/// Every section and every field has a default, so the tool runs without a
/// configuration file at all.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub harvest: HarvestConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Viewer/browser behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    /// URL prefix the document identifier is appended to
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Interface language flag passed along to the viewer
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Run the browser without a visible window
    #[serde(default)]
    pub headless: bool,

    /// Seconds to wait for the viewer to finish opening the document
    #[serde(rename = "navigation-timeout-secs", default = "default_navigation_timeout")]
    pub navigation_timeout_secs: u64,
}

/// Traversal behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HarvestConfig {
    /// Consecutive already-seen pages tolerated before the run is declared done
    #[serde(rename = "stall-limit", default = "default_stall_limit")]
    pub stall_limit: u32,

    /// Pause before each advance keystroke (milliseconds)
    #[serde(rename = "advance-delay-ms", default = "default_advance_delay")]
    pub advance_delay_ms: u64,

    /// Timeout for a single image download (seconds)
    #[serde(rename = "download-timeout-secs", default = "default_download_timeout")]
    pub download_timeout_secs: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory page images are written into
    #[serde(default = "default_directory")]
    pub directory: String,
}

fn default_base_url() -> String {
    "https://books.google.com/books?id=".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_navigation_timeout() -> u64 {
    30
}

fn default_stall_limit() -> u32 {
    20
}

fn default_advance_delay() -> u64 {
    100
}

fn default_download_timeout() -> u64 {
    30
}

fn default_directory() -> String {
    "./pages".to_string()
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            locale: default_locale(),
            headless: false,
            navigation_timeout_secs: default_navigation_timeout(),
        }
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            stall_limit: default_stall_limit(),
            advance_delay_ms: default_advance_delay(),
            download_timeout_secs: default_download_timeout(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}
