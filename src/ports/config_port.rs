//! Configuration access port trait.

use crate::domain::error::ScreenError;
use chrono::NaiveDate;
use std::path::PathBuf;

/// Typed view of a screening run's configuration.
///
/// Required keys surface as `ConfigMissing` when absent; values that
/// fail to parse surface as `ConfigInvalid`. Optional keys return
/// `None` and the caller picks the fallback.
pub trait ConfigPort {
    /// `[data] history_dir` — directory of per-listing price files.
    fn history_dir(&self) -> Result<PathBuf, ScreenError>;

    /// `[screen] watchlist` — the watchlist CSV.
    fn watchlist_path(&self) -> Result<PathBuf, ScreenError>;

    /// `[screen] exchange` — optional exchange filter, uppercased.
    fn exchange(&self) -> Option<String>;

    /// `[screen] date` — default evaluation date, when the config pins one.
    fn date(&self) -> Result<Option<NaiveDate>, ScreenError>;

    /// `[screen] output` — default report path.
    fn output(&self) -> Option<String>;
}
