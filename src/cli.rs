//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_history::CsvHistoryAdapter;
use crate::adapters::csv_report::CsvReportAdapter;
use crate::adapters::ini_config::{parse_screen_date, IniConfigAdapter};
use crate::adapters::watchlist::load_watchlist;
use crate::domain::error::ScreenError;
use crate::domain::screener::{analyze_series, screen, WatchItem};
use crate::ports::config_port::ConfigPort;
use crate::ports::history_port::HistoryPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tascreen", about = "Technical-analysis stock screener")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Screen the whole watchlist and write a CSV report
    Screen {
        #[arg(short, long)]
        config: PathBuf,
        /// Evaluation date (YYYY-MM-DD); falls back to [screen] date
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Analyze a single ticker and print its signals and ratings
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: String,
        #[arg(long)]
        exchange: Option<String>,
        /// Evaluation date (YYYY-MM-DD); falls back to [screen] date
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Show data range for a ticker
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: String,
        #[arg(long)]
        exchange: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Screen {
            config,
            date,
            output,
        } => run_screen(&config, date.as_deref(), output.as_deref()),
        Command::Analyze {
            config,
            ticker,
            exchange,
            date,
        } => run_analyze(&config, &ticker, exchange.as_deref(), date.as_deref()),
        Command::Info {
            config,
            ticker,
            exchange,
        } => run_info(&config, &ticker, exchange.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<IniConfigAdapter, ExitCode> {
    IniConfigAdapter::from_file(path).map_err(|e| {
        let err = ScreenError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn resolve_date(flag: Option<&str>, config: &IniConfigAdapter) -> Result<NaiveDate, ScreenError> {
    match flag {
        Some(raw) => parse_screen_date(raw),
        None => config.date()?.ok_or_else(|| ScreenError::ConfigMissing {
            section: "screen".into(),
            key: "date".into(),
        }),
    }
}

fn resolve_exchange(flag: Option<&str>, config: &IniConfigAdapter) -> Result<String, ScreenError> {
    match flag {
        Some(e) => Ok(e.to_uppercase()),
        None => config.exchange().ok_or_else(|| ScreenError::ConfigMissing {
            section: "screen".into(),
            key: "exchange".into(),
        }),
    }
}

fn run_screen(config_path: &PathBuf, date: Option<&str>, output: Option<&std::path::Path>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let result = (|| -> Result<(), ScreenError> {
        let as_of = resolve_date(date, &config)?;
        let dir = config.history_dir()?;
        let watchlist_path = config.watchlist_path()?;
        let exchange_filter = config.exchange();

        eprintln!("Loading watchlist from {}", watchlist_path.display());
        let items = load_watchlist(&watchlist_path, exchange_filter.as_deref())?;
        eprintln!("Screening {} tickers as of {}", items.len(), as_of);

        let adapter = CsvHistoryAdapter::new(dir);
        let reports = screen(&adapter, &items, as_of);

        let evaluated = reports.iter().filter(|r| r.price.is_some()).count();
        eprintln!("Evaluated {}/{} tickers", evaluated, reports.len());

        let output_path = output
            .map(|p| p.display().to_string())
            .or_else(|| config.output())
            .unwrap_or_else(|| format!("screen_{}.csv", as_of));
        CsvReportAdapter::new().write(&reports, &output_path)?;
        eprintln!("Report written to {}", output_path);
        Ok(())
    })();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_analyze(
    config_path: &PathBuf,
    ticker: &str,
    exchange: Option<&str>,
    date: Option<&str>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let result = (|| -> Result<(), ScreenError> {
        let as_of = resolve_date(date, &config)?;
        let exchange = resolve_exchange(exchange, &config)?;
        let dir = config.history_dir()?;
        let ticker = ticker.to_uppercase();

        let adapter = CsvHistoryAdapter::new(dir);
        let series = adapter.fetch_history(&ticker, &exchange, as_of)?;
        let item = WatchItem {
            ticker: ticker.clone(),
            sector: String::new(),
            exchange: exchange.clone(),
        };
        let report = analyze_series(&item, &series, as_of)?;

        println!("{}.{} as of {}", ticker, exchange, as_of);
        if let Some(date) = report.bar_date {
            println!("bar date: {}", date);
        }
        if let Some(price) = report.price {
            match report.percent_change {
                Some(change) => println!("close: {:.2} ({:+.2}%)", price, change),
                None => println!("close: {:.2}", price),
            }
        }
        println!(
            "oscillators: {} buy / {} sell / {} neutral, rating {:.2}",
            report.counts.oscillator.buy,
            report.counts.oscillator.sell,
            report.counts.oscillator.neutral,
            report.rating.oscillator,
        );
        println!(
            "moving averages: {} buy / {} sell / {} neutral, rating {:.2}",
            report.counts.moving_average.buy,
            report.counts.moving_average.sell,
            report.counts.moving_average.neutral,
            report.rating.moving_average,
        );
        for (name, verdict) in report.signals.iter() {
            println!("  {:<14} {}", name.to_string(), verdict);
        }
        Ok(())
    })();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(config_path: &PathBuf, ticker: &str, exchange: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let result = (|| -> Result<(), ScreenError> {
        let exchange = resolve_exchange(exchange, &config)?;
        let dir = config.history_dir()?;
        let ticker = ticker.to_uppercase();

        let adapter = CsvHistoryAdapter::new(dir);
        match adapter.data_range(&ticker, &exchange)? {
            Some((first, last, count)) => {
                println!("{}.{}: {} bars, {} to {}", ticker, exchange, count, first, last);
            }
            None => {
                eprintln!("{}.{}: no data found", ticker, exchange);
            }
        }
        Ok(())
    })();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
