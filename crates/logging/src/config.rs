//! Verbosity configuration mapped onto a `tracing` filter directive.

use tracing::Level;

/// Environment variable that overrides the verbosity-derived filter.
pub const LOG_ENV: &str = "FSENUM_LOG";

/// Logging configuration derived from command-line verbosity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogConfig {
    verbose: u8,
    ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::from_verbose_level(0)
    }
}

impl LogConfig {
    /// Create a configuration from a `-v` count.
    ///
    /// `0` logs warnings, `1` info, `2` debug, and `3` or more everything.
    #[must_use]
    pub const fn from_verbose_level(level: u8) -> Self {
        Self {
            verbose: level,
            ansi: false,
        }
    }

    /// Enable or disable ANSI colouring on the stderr writer.
    #[must_use]
    pub const fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Verbosity level the configuration was built from.
    #[must_use]
    pub const fn verbose_level(&self) -> u8 {
        self.verbose
    }

    /// Whether ANSI colouring is requested.
    #[must_use]
    pub const fn ansi(&self) -> bool {
        self.ansi
    }

    /// Maximum level enabled for the `fsenum` targets.
    #[must_use]
    pub const fn level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Filter directive equivalent to this configuration.
    ///
    /// Other crates stay at `warn` so only enumeration diagnostics grow with
    /// verbosity.
    #[must_use]
    pub fn directive(&self) -> String {
        format!("warn,fsenum={}", self.level().as_str().to_ascii_lowercase())
    }
}
