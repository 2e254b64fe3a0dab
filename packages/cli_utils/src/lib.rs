#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared CLI utilities for the Safe Walk toolchain.
//!
//! [`IndicatifProgress`] renders dataset loads; [`init_logger`] routes
//! `log` output through the same [`MultiProgress`] so bars and log lines
//! share the terminal cleanly.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use safe_walk_ingest::progress::ProgressCallback;

pub use indicatif::MultiProgress;

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";
const BYTES_TEMPLATE: &str =
    "  {msg} {wide_bar:.cyan/dim} {bytes}/{total_bytes} {percent}% [{eta}]";

/// Terminal progress for dataset loads.
///
/// Shows a spinner until the file size is known, then a byte bar.
pub struct IndicatifProgress {
    bar: ProgressBar,
    sized_style: ProgressStyle,
}

impl IndicatifProgress {
    /// Adds a spinner labelled `message` to `multi`.
    #[must_use]
    pub fn bytes_bar(multi: &MultiProgress, message: &str) -> Self {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.set_style(
            ProgressStyle::with_template(SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        let sized_style = ProgressStyle::with_template(BYTES_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");

        Self { bar, sized_style }
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, bytes: u64) {
        self.bar.disable_steady_tick();
        self.bar.set_style(self.sized_style.clone());
        self.bar.set_length(bytes);
        self.bar.set_position(0);
    }

    fn set_position(&self, bytes: u64) {
        self.bar.set_position(bytes);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Initializes the global logger wrapped in `indicatif-log-bridge` so that
/// `log::info!` and friends are suspended while progress bars redraw.
///
/// Filters come from `RUST_LOG`, falling back to `default_filters` (e.g.
/// `"safe_walk=info"`) when it is unset.
///
/// Returns the [`MultiProgress`] that all progress bars must be added to.
#[must_use]
pub fn init_logger(default_filters: &str) -> MultiProgress {
    let multi = MultiProgress::new();

    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filters.to_string());
    let logger = pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .build();
    let level = logger.filter();

    if indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .is_err()
    {
        log::debug!("Logger already initialized");
    }

    log::set_max_level(level);

    multi
}
