//! Domain error types.

/// Top-level error type for tascreen.
///
/// Inside a screening batch none of these propagate: per-ticker failures
/// are converted to unavailable rows by the screener. They surface only
/// from the single-ticker CLI paths and from adapters.
#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no price history for {ticker} on {exchange}")]
    NoData { ticker: String, exchange: String },

    #[error("insufficient history for {ticker} on {exchange}: have {bars} bars, need {minimum}")]
    InsufficientData {
        ticker: String,
        exchange: String,
        bars: usize,
        minimum: usize,
    },

    #[error("malformed price series for {ticker}: {reason}")]
    MalformedSeries { ticker: String, reason: String },

    #[error("evaluation date {requested} precedes first bar {first}")]
    DateOutOfRange {
        requested: chrono::NaiveDate,
        first: chrono::NaiveDate,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ScreenError> for std::process::ExitCode {
    fn from(err: &ScreenError) -> Self {
        let code: u8 = match err {
            ScreenError::Io(_) => 1,
            ScreenError::ConfigParse { .. }
            | ScreenError::ConfigMissing { .. }
            | ScreenError::ConfigInvalid { .. } => 2,
            ScreenError::MalformedSeries { .. } => 4,
            ScreenError::NoData { .. }
            | ScreenError::InsufficientData { .. }
            | ScreenError::DateOutOfRange { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::ExitCode;

    #[test]
    fn error_messages() {
        let err = ScreenError::NoData {
            ticker: "VNM".into(),
            exchange: "HOSE".into(),
        };
        assert_eq!(err.to_string(), "no price history for VNM on HOSE");

        let err = ScreenError::InsufficientData {
            ticker: "FPT".into(),
            exchange: "HOSE".into(),
            bars: 3,
            minimum: 30,
        };
        assert!(err.to_string().contains("have 3 bars, need 30"));
    }

    #[test]
    fn exit_codes_compile_for_every_category() {
        let errors = [
            ScreenError::Io(std::io::Error::other("x")),
            ScreenError::ConfigMissing {
                section: "data".into(),
                key: "history_dir".into(),
            },
            ScreenError::MalformedSeries {
                ticker: "VNM".into(),
                reason: "duplicate date".into(),
            },
            ScreenError::NoData {
                ticker: "VNM".into(),
                exchange: "HOSE".into(),
            },
        ];
        for err in &errors {
            let _: ExitCode = err.into();
        }
    }
}
