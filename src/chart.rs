//! Line chart data for external plotting.

use anyhow::{Context, Result};
use std::{fs::File, io::Write, path::Path};

/// Line of a chart, as two parallel sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub label: String,
    pub xs: Vec<Option<f64>>,
    pub ys: Vec<Option<f64>>,
}

/// Line chart with labelled axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    x_label: String,
    y_label: String,
    lines: Vec<Line>,
}

impl Chart {
    pub fn new(x_label: &str, y_label: &str) -> Self {
        Self {
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            lines: Vec::new(),
        }
    }

    pub fn add_line<I>(&mut self, label: &str, points: I)
    where
        I: IntoIterator<Item = (Option<f64>, Option<f64>)>,
    {
        let (xs, ys) = points.into_iter().unzip();
        self.lines.push(Line {
            label: label.to_string(),
            xs,
            ys,
        });
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Save the chart as a CSV file with one row per point.
    pub fn save<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let file = file.as_ref();
        let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
        self.write(file)
    }

    fn write<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);

        writer
            .write_record(["series", self.x_label.as_str(), self.y_label.as_str()])
            .context("failed to write header")?;
        for line in self.lines() {
            for (x, y) in line.xs.iter().zip(&line.ys) {
                writer
                    .write_record([&line.label, &format_val(*x), &format_val(*y)])
                    .context("failed to write point")?;
            }
        }

        writer.flush().context("failed to flush writer stream")?;

        Ok(())
    }
}

// Missing values are left as empty cells.
fn format_val(val: Option<f64>) -> String {
    val.map(|val| val.to_string()).unwrap_or_default()
}
