//! Tunable capture policy.
//!
//! These are policy knobs, not contracts: the defaults match what works
//! on a typical desktop, and each can be overridden through environment
//! variables (loaded from `.env.local` / `.env` at startup).

use std::str::FromStr;
use std::time::Duration;

/// Minimum selection side length in logical pixels.
const DEFAULT_MIN_SELECTION: f64 = 15.0;

/// How long to wait after hiding windows before capturing, so the OS
/// compositor has finished any fade-out. Capture APIs can otherwise
/// still see a window mid-fade.
const DEFAULT_SETTLE_MS: u64 = 100;

/// Ceiling on the OS capture call. An unresponsive capture API must not
/// hang the app indefinitely.
const DEFAULT_CAPTURE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct CapturePolicy {
    /// Selections narrower or shorter than this (logical px) are rejected
    /// before any transformation runs.
    pub min_selection: f64,
    /// Compositor settle delay applied after `hide_all`.
    pub settle_delay: Duration,
    /// Upper bound on the OS raster-capture call.
    pub capture_timeout: Duration,
}

impl Default for CapturePolicy {
    fn default() -> Self {
        Self {
            min_selection: DEFAULT_MIN_SELECTION,
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_MS),
            capture_timeout: Duration::from_secs(DEFAULT_CAPTURE_TIMEOUT_SECS),
        }
    }
}

impl CapturePolicy {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_selection: env_or("TEXTGRAB_MIN_SELECTION", defaults.min_selection),
            settle_delay: Duration::from_millis(env_or(
                "TEXTGRAB_SETTLE_MS",
                defaults.settle_delay.as_millis() as u64,
            )),
            capture_timeout: Duration::from_secs(env_or(
                "TEXTGRAB_CAPTURE_TIMEOUT_SECS",
                defaults.capture_timeout.as_secs(),
            )),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("[CONFIG] Ignoring unparseable {}={:?}", name, raw);
                default
            }
        },
        Err(_) => default,
    }
}
