//! Configuration for the member directory.
//!
//! Maps directly to `roster.toml`. Every section and field has a default, so an
//! empty file is a valid configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};

/// Top-level directory configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Where member records come from.
    #[serde(default)]
    pub source: SourceConfig,
    /// Debounce and transition delays.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Name search tuning.
    #[serde(default)]
    pub search: SearchConfig,
    /// Static asset paths.
    #[serde(default)]
    pub assets: AssetConfig,
    /// User-visible status messages.
    #[serde(default)]
    pub messages: MessageConfig,
    /// Hero banner slideshow.
    #[serde(default)]
    pub slideshow: SlideshowConfig,
}

impl RosterConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `RosterError::Config` if the TOML is invalid or a value is out of range.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str).map_err(|e| RosterError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Reject values the directory cannot work with.
    ///
    /// # Errors
    /// Returns `RosterError::Config` describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.search.min_query_len == 0 {
            return Err(RosterError::Config("search.min_query_len must be at least 1".into()));
        }
        if self.slideshow.duration_ms == 0 {
            return Err(RosterError::Config("slideshow.duration_ms must be positive".into()));
        }
        if self.source.timeout_ms == 0 {
            return Err(RosterError::Config("source.timeout_ms must be positive".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Member data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL (http/https) or file path of the members JSON array.
    #[serde(default = "default_members_url")]
    pub url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_5000")]
    pub timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_members_url(),
            timeout_ms: 5000,
        }
    }
}

/// Debounce and transition delays, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Delay used when a caller does not name one.
    #[serde(default = "default_300")]
    pub default_debounce_ms: u64,
    /// Quiet period after the last keystroke before a name search runs.
    #[serde(default = "default_1000")]
    pub search_input_ms: u64,
    /// Grace period before the search bar drops its active state on blur.
    #[serde(default = "default_500")]
    pub focus_out_ms: u64,
    /// Fallback that releases the body scroll lock if no transition end arrives.
    #[serde(default = "default_300")]
    pub overlay_close_fallback_ms: u64,
}

impl TimingConfig {
    /// Default debounce delay.
    #[must_use]
    pub fn default_debounce(&self) -> Duration {
        Duration::from_millis(self.default_debounce_ms)
    }

    /// Search input quiet period.
    #[must_use]
    pub fn search_input(&self) -> Duration {
        Duration::from_millis(self.search_input_ms)
    }

    /// Focus-out grace period.
    #[must_use]
    pub fn focus_out(&self) -> Duration {
        Duration::from_millis(self.focus_out_ms)
    }

    /// Overlay close fallback.
    #[must_use]
    pub fn overlay_close_fallback(&self) -> Duration {
        Duration::from_millis(self.overlay_close_fallback_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            default_debounce_ms: 300,
            search_input_ms: 1000,
            focus_out_ms: 500,
            overlay_close_fallback_ms: 300,
        }
    }
}

/// Name search tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Minimum trimmed query length before the matcher runs.
    #[serde(default = "default_3_usize")]
    pub min_query_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: crate::filter::DEFAULT_MIN_QUERY_LEN,
        }
    }
}

/// Static asset paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Placeholder used when a member has no usable profile picture.
    #[serde(default = "default_profile_pic")]
    pub default_profile_pic: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            default_profile_pic: default_profile_pic(),
        }
    }
}

/// User-visible status messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageConfig {
    /// Shown in a section with no matching members.
    #[serde(default = "default_no_results")]
    pub no_results: String,
    /// Shown in the search results before a query is long enough.
    #[serde(default = "default_try_searching")]
    pub try_searching: String,
    /// Shown in every department section when loading fails.
    #[serde(default = "default_fetch_error")]
    pub fetch_error: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            no_results: default_no_results(),
            try_searching: default_try_searching(),
            fetch_error: default_fetch_error(),
        }
    }
}

/// Hero banner slideshow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideshowConfig {
    /// Slide image paths, in display order.
    #[serde(default)]
    pub images: Vec<String>,
    /// Time each slide stays up during autoplay.
    #[serde(default = "default_10000")]
    pub duration_ms: u64,
    /// Advance slides automatically.
    #[serde(default = "default_true")]
    pub autoplay: bool,
    /// Render the pagination dots.
    #[serde(default = "default_true")]
    pub show_pagination: bool,
    /// Pause after manual navigation before autoplay resumes.
    #[serde(default = "default_3000")]
    pub resume_delay_ms: u64,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            duration_ms: 10_000,
            autoplay: true,
            show_pagination: true,
            resume_delay_ms: 3000,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_members_url() -> String { "../data/members/current_members.json".to_string() }
fn default_profile_pic() -> String { "../assets/images/Board And Management/default-man-avatar.PNG".to_string() }
fn default_no_results() -> String { "No results!".to_string() }
fn default_try_searching() -> String { "Try searching!".to_string() }
fn default_fetch_error() -> String { "Error! Please try again later.".to_string() }
fn default_3_usize() -> usize { 3 }
fn default_300() -> u64 { 300 }
fn default_500() -> u64 { 500 }
fn default_1000() -> u64 { 1000 }
fn default_3000() -> u64 { 3000 }
fn default_5000() -> u64 { 5000 }
fn default_10000() -> u64 { 10_000 }
