//! Price history access port trait.

use crate::domain::error::ScreenError;
use crate::domain::series::PriceSeries;
use chrono::NaiveDate;

pub trait HistoryPort {
    /// Fetch the full validated series for one listing, up to and including
    /// `end`. Implementations return `NoData` when the listing is unknown.
    fn fetch_history(
        &self,
        ticker: &str,
        exchange: &str,
        end: NaiveDate,
    ) -> Result<PriceSeries, ScreenError>;

    /// First date, last date and bar count for a listing, if any data exists.
    fn data_range(
        &self,
        ticker: &str,
        exchange: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ScreenError>;
}
