use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Analysis configuration parameters.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub chart: ChartConfig,

    /// Series to analyze, in display order.
    pub series: Vec<SeriesConfig>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Number of samples in the moving average window.
    pub window: usize,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    pub x_label: String,
    pub y_label: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            x_label: "Year".to_string(),
            y_label: "Temperature (C)".to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// Name shown in reports and chart legends.
    pub label: String,
    /// CSV file, relative to the data directory.
    pub file: String,
}

impl Config {
    /// Load a [`Config`] from a file.
    ///
    /// The file must be a TOML document describing a [`Config`].
    /// Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;
        Self::from_toml(&contents)
    }

    fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        check_num(self.analysis.window, 1..=1000).context("invalid moving average window")?;

        check_label(&self.chart.x_label).context("invalid x axis label")?;
        check_label(&self.chart.y_label).context("invalid y axis label")?;

        if self.series.is_empty() {
            bail!("at least one series must be given");
        }
        let mut labels = HashSet::new();
        for (i_series, series) in self.series.iter().enumerate() {
            check_label(&series.label).with_context(|| format!("invalid series {i_series}"))?;
            check_label(&series.file).with_context(|| format!("invalid series {i_series}"))?;
            if !labels.insert(series.label.as_str()) {
                bail!("series label {:?} is repeated", series.label);
            }
        }

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}

fn check_label(label: &str) -> Result<()> {
    if label.trim().is_empty() {
        bail!("string must not be empty");
    }
    Ok(())
}
