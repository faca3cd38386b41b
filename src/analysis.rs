use crate::chart::Chart;
use crate::config::ChartConfig;
use crate::data::read_records;
use crate::model::{Sample, WindowedSample, normalize};
use crate::stats::{StatsError, Summary, compute_moving_averages, pearson_correlation, summarize};
use anyhow::{Context, Result};
use rmp_serde::encode;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Results of the analysis of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesReport {
    pub label: String,

    /// Number of samples in the series.
    pub n_samples: usize,
    /// Number of samples without a recorded value.
    pub n_missing: usize,

    /// Statistics of the recorded values.
    pub readings: Option<Summary>,
    /// Statistics of the defined moving averages.
    pub moving_averages: Option<Summary>,
    /// Correlation coefficient between year and recorded value.
    pub correlation: Option<f64>,
}

/// Series with its moving averages and report.
pub struct SeriesAnalysis {
    pub samples: Vec<WindowedSample>,
    pub report: SeriesReport,
}

/// Run the full analysis of a series of samples.
///
/// Undefined statistics are logged and left out of the report, an invalid
/// window is an error.
pub fn analyze_series(label: &str, samples: &[Sample], window: usize) -> Result<SeriesAnalysis> {
    let windowed =
        compute_moving_averages(samples, window).context("failed to compute moving averages")?;

    let readings: Vec<_> = samples.iter().filter_map(|sample| sample.value).collect();
    let n_missing = samples.len() - readings.len();
    if n_missing > 0 {
        log::warn!("{label}: {n_missing} of {} samples have no value", samples.len());
    }

    let moving_averages: Vec<_> = windowed.iter().filter_map(|ws| ws.moving_average).collect();

    let report = SeriesReport {
        label: label.to_string(),
        n_samples: samples.len(),
        n_missing,
        readings: defined_or_warn(label, "reading statistics", summarize(&readings)),
        moving_averages: defined_or_warn(
            label,
            "moving average statistics",
            summarize(&moving_averages),
        ),
        correlation: defined_or_warn(label, "correlation", pearson_correlation(samples)),
    };

    Ok(SeriesAnalysis {
        samples: windowed,
        report,
    })
}

fn defined_or_warn<T>(label: &str, name: &str, result: Result<T, StatsError>) -> Option<T> {
    match result {
        Ok(val) => Some(val),
        Err(error) => {
            log::warn!("{label}: {name} undefined: {error}");
            None
        }
    }
}

pub struct Analyzer {
    window: usize,
    analyses: Vec<SeriesAnalysis>,
}

impl Analyzer {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            analyses: Vec::new(),
        }
    }

    pub fn add_file<P: AsRef<Path>>(&mut self, label: &str, file: P) -> Result<()> {
        let file = file.as_ref();
        let records = read_records(file).context("failed to read records")?;
        log::info!("read {} records from {file:?}", records.len());

        let samples: Vec<_> = records.iter().map(normalize).collect();
        self.add_samples(label, &samples)
    }

    pub fn add_samples(&mut self, label: &str, samples: &[Sample]) -> Result<()> {
        let analysis = analyze_series(label, samples, self.window)
            .with_context(|| format!("failed to analyze series {label:?}"))?;
        self.analyses.push(analysis);
        Ok(())
    }

    pub fn reports(&self) -> Vec<&SeriesReport> {
        self.analyses.iter().map(|analysis| &analysis.report).collect()
    }

    pub fn print_reports<W: Write>(&self, out: &mut W) -> Result<()> {
        for report in self.reports() {
            writeln!(out, "{}:", report.label)?;
            match &report.readings {
                Some(summary) => {
                    writeln!(out, "  Mean: {}", summary.mean)?;
                    writeln!(out, "  Standard deviation: {}", summary.std_dev)?;
                    writeln!(out, "  Minimum: {}", summary.min)?;
                    writeln!(out, "  Maximum: {}", summary.max)?;
                }
                None => writeln!(out, "  Summary: undefined")?,
            }
            match report.correlation {
                Some(r) => writeln!(out, "  Correlation coefficient: {r}")?,
                None => writeln!(out, "  Correlation coefficient: undefined")?,
            }
        }
        Ok(())
    }

    pub fn save_results<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let file = file.as_ref();
        let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
        let mut writer = BufWriter::new(file);

        encode::write(&mut writer, &self.reports()).context("failed to serialize reports")?;

        writer.flush().context("failed to flush writer stream")?;

        Ok(())
    }

    /// Chart of the recorded values of every series.
    pub fn readings_chart(&self, cfg: &ChartConfig) -> Chart {
        self.chart(cfg, |ws| ws.value)
    }

    /// Chart of the moving averages of every series.
    pub fn moving_averages_chart(&self, cfg: &ChartConfig) -> Chart {
        self.chart(cfg, |ws| ws.moving_average)
    }

    fn chart<F>(&self, cfg: &ChartConfig, y_val: F) -> Chart
    where
        F: Fn(&WindowedSample) -> Option<f64>,
    {
        let mut chart = Chart::new(&cfg.x_label, &cfg.y_label);
        for analysis in &self.analyses {
            let points = analysis.samples.iter().map(|ws| (ws.year, y_val(ws)));
            chart.add_line(&analysis.report.label, points);
        }
        chart
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawRecord;

    fn samples(vals: &[&str]) -> Vec<Sample> {
        vals.iter()
            .enumerate()
            .map(|(idx, val)| {
                normalize(&RawRecord {
                    year: (2000 + idx).to_string(),
                    avg_temp: val.to_string(),
                })
            })
            .collect()
    }

    #[test]
    fn analyze_series_reports_statistics() {
        let samples = samples(&["1", "2", "3", "4", "5"]);
        let analysis = analyze_series("Test", &samples, 2).expect("failed to analyze");
        let report = &analysis.report;

        assert_eq!(report.n_samples, 5);
        assert_eq!(report.n_missing, 0);

        let readings = report.readings.expect("readings summary missing");
        assert_eq!(readings.min, 1.0);
        assert_eq!(readings.max, 5.0);

        let moving_averages = report.moving_averages.expect("moving average summary missing");
        assert_eq!(moving_averages.min, 1.5);
        assert_eq!(moving_averages.max, 4.5);

        let r = report.correlation.expect("correlation missing");
        assert!((r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn garbage_reading_never_counts_as_zero() {
        let samples = samples(&["0", "0", "NaN-like-garbage", "0", "0", "0"]);
        let analysis = analyze_series("Test", &samples, 2).expect("failed to analyze");

        let avgs: Vec<_> = analysis.samples.iter().map(|ws| ws.moving_average).collect();
        assert_eq!(avgs, [None, Some(0.0), None, None, Some(0.0), Some(0.0)]);
        assert_eq!(analysis.report.n_missing, 1);

        let readings = analysis.report.readings.expect("readings summary missing");
        assert_eq!(readings.mean, 0.0);
    }

    #[test]
    fn analyze_series_keeps_undefined_statistics() {
        let samples = samples(&["4", "4", "x"]);
        let analysis = analyze_series("Flat", &samples, 5).expect("failed to analyze");
        let report = &analysis.report;

        assert!(report.readings.is_some());
        assert_eq!(report.moving_averages, None);
        assert_eq!(report.correlation, None);
    }

    #[test]
    fn analyze_series_rejects_zero_window() {
        let samples = samples(&["1"]);
        assert!(analyze_series("Test", &samples, 0).is_err());
    }

    #[test]
    fn print_reports_writes_summary() {
        let mut analyzer = Analyzer::new(3);
        analyzer
            .add_samples("Global", &samples(&["8", "9", "10", "11"]))
            .expect("failed to add samples");
        analyzer
            .add_samples("Empty", &samples(&["", ""]))
            .expect("failed to add samples");

        let mut out = Vec::new();
        analyzer.print_reports(&mut out).expect("failed to print");
        let out = String::from_utf8(out).expect("output is not valid UTF-8");

        assert!(out.contains("Global:\n  Mean: 9.5\n"));
        assert!(out.contains("  Minimum: 8\n  Maximum: 11\n"));
        assert!(out.contains("Empty:\n  Summary: undefined\n  Correlation coefficient: undefined\n"));
    }

    #[test]
    fn charts_follow_series_order() {
        let mut analyzer = Analyzer::new(2);
        analyzer
            .add_samples("A", &samples(&["1", "3"]))
            .expect("failed to add samples");
        analyzer
            .add_samples("B", &samples(&["5"]))
            .expect("failed to add samples");

        let cfg = ChartConfig::default();
        let chart = analyzer.moving_averages_chart(&cfg);
        let labels: Vec<_> = chart.lines().iter().map(|line| line.label.as_str()).collect();
        assert_eq!(labels, ["A", "B"]);
        assert_eq!(chart.lines()[0].ys, [None, Some(2.0)]);
        assert_eq!(chart.lines()[1].ys, [None::<f64>]);

        let chart = analyzer.readings_chart(&cfg);
        assert_eq!(chart.lines()[0].xs, [Some(2000.0), Some(2001.0)]);
        assert_eq!(chart.lines()[0].ys, [Some(1.0), Some(3.0)]);
    }
}
