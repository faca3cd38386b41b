use crate::analysis::Analyzer;
use crate::config::Config;
use anyhow::{Context, Result};
use glob::glob;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

pub struct Manager {
    data_dir: PathBuf,
    cfg: Config,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();

        let cfg = Config::from_file(data_dir.join("config.toml"))
            .context("failed to construct cfg")?;
        log::info!("{cfg:#?}");

        Ok(Self { data_dir, cfg })
    }

    pub fn run_analysis(&self) -> Result<()> {
        let analyzer = self.load_series().context("failed to load series")?;

        let stdout = io::stdout();
        analyzer
            .print_reports(&mut stdout.lock())
            .context("failed to print reports")?;

        let results_file = self.results_file();
        analyzer
            .save_results(&results_file)
            .context("failed to save results")?;
        log::info!("saved {results_file:?}");

        Ok(())
    }

    pub fn write_charts(&self) -> Result<()> {
        let analyzer = self.load_series().context("failed to load series")?;

        let charts = [
            (
                analyzer.moving_averages_chart(&self.cfg.chart),
                self.chart_file("moving-averages"),
            ),
            (
                analyzer.readings_chart(&self.cfg.chart),
                self.chart_file("readings"),
            ),
        ];
        for (chart, chart_file) in charts {
            chart.save(&chart_file).context("failed to save chart")?;
            log::info!("saved {chart_file:?}");
        }

        Ok(())
    }

    pub fn clean_outputs(&self) -> Result<()> {
        let mut files = self
            .glob_files("chart-*.csv")
            .context("failed to glob chart files")?;
        if self.results_file().is_file() {
            files.push(self.results_file());
        }

        for file in files {
            fs::remove_file(&file).with_context(|| format!("failed to remove {file:?}"))?;
            log::info!("removed {file:?}");
        }

        Ok(())
    }

    fn load_series(&self) -> Result<Analyzer> {
        let mut analyzer = Analyzer::new(self.cfg.analysis.window);
        for series in &self.cfg.series {
            analyzer
                .add_file(&series.label, self.data_dir.join(&series.file))
                .with_context(|| format!("failed to add series {:?}", series.label))?;
        }
        Ok(analyzer)
    }

    fn glob_files(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern = self.data_dir.join(pattern);
        let pattern = pattern.to_str().context("pattern is not valid UTF-8")?;
        let files = glob(pattern)
            .context("failed to glob files")?
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .collect();
        Ok(files)
    }

    fn results_file(&self) -> PathBuf {
        self.data_dir.join("results.msgpack")
    }

    fn chart_file(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("chart-{name}.csv"))
    }
}
