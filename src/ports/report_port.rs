//! Screening report output port trait.

use crate::domain::error::ScreenError;
use crate::domain::screener::TickerReport;

/// Port for writing a finished screening batch.
pub trait ReportPort {
    fn write(&self, reports: &[TickerReport], output_path: &str) -> Result<(), ScreenError>;
}
