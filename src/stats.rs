use crate::model::{Sample, WindowedSample};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

/// Errors raised by the statistical routines.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatsError {
    #[error("window length must be positive")]
    InvalidWindow,

    #[error("no values to compute statistics from")]
    EmptyInput,

    #[error("degenerate input: all {0} values are identical")]
    DegenerateInput(&'static str),
}

/// Online accumulator of the mean, variance and range of a set of values.
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
    min: f64,
    max: f64,
}

/// Descriptive statistics of a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            n_vals: 0,
            mean: 0.0,
            diff_2_sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;

        self.min = self.min.min(val);
        self.max = self.max.max(val);
    }

    pub fn report(&self) -> Result<Summary, StatsError> {
        if self.n_vals == 0 {
            return Err(StatsError::EmptyInput);
        }
        Ok(Summary {
            mean: self.mean,
            std_dev: (self.diff_2_sum / self.n_vals as f64).sqrt(),
            min: self.min,
            max: self.max,
        })
    }
}

/// Summarize a set of values (missing values already excluded).
pub fn summarize(vals: &[f64]) -> Result<Summary, StatsError> {
    let mut acc = Accumulator::new();
    for &val in vals {
        acc.add(val);
    }
    acc.report()
}

/// Fixed-length trailing window over optionally missing values.
pub struct MovingWindow {
    len: usize,
    slots: VecDeque<Option<f64>>,
}

impl MovingWindow {
    pub fn new(len: usize) -> Result<Self, StatsError> {
        if len == 0 {
            return Err(StatsError::InvalidWindow);
        }
        Ok(Self {
            len,
            slots: VecDeque::with_capacity(len),
        })
    }

    /// Push a value, evicting the oldest one, and return the current average.
    pub fn push(&mut self, val: Option<f64>) -> Option<f64> {
        if self.slots.len() == self.len {
            self.slots.pop_front();
        }
        self.slots.push_back(val);
        self.average()
    }

    /// Average of the window, if it is full and has no missing slot.
    pub fn average(&self) -> Option<f64> {
        if self.slots.len() < self.len {
            return None;
        }
        let mut sum = 0.0;
        for &slot in &self.slots {
            sum += slot?;
        }
        Some(sum / self.len as f64)
    }
}

/// Compute the trailing moving average of every sample, in iteration order.
pub fn compute_moving_averages(
    samples: &[Sample],
    window: usize,
) -> Result<Vec<WindowedSample>, StatsError> {
    let mut moving_window = MovingWindow::new(window)?;
    let windowed = samples
        .iter()
        .map(|sample| WindowedSample {
            year: sample.year,
            value: sample.value,
            moving_average: moving_window.push(sample.value),
        })
        .collect();
    Ok(windowed)
}

/// Compute the Pearson correlation coefficient between year and value.
///
/// Samples missing either field are skipped.
pub fn pearson_correlation(samples: &[Sample]) -> Result<f64, StatsError> {
    let mut n = 0.0;
    let (mut sum_x, mut sum_y) = (0.0, 0.0);
    let (mut sum_xx, mut sum_yy, mut sum_xy) = (0.0, 0.0, 0.0);

    for (x, y) in samples
        .iter()
        .filter_map(|sample| Some((sample.year?, sample.value?)))
    {
        n += 1.0;
        sum_x += x;
        sum_y += y;
        sum_xx += x * x;
        sum_yy += y * y;
        sum_xy += x * y;
    }

    if n == 0.0 {
        return Err(StatsError::EmptyInput);
    }

    let var_x = n * sum_xx - sum_x * sum_x;
    let var_y = n * sum_yy - sum_y * sum_y;
    // Cancellation leaves rounding noise of order n * eps * (n * sum of squares).
    if !(var_x > n * f64::EPSILON * n * sum_xx) {
        return Err(StatsError::DegenerateInput("year"));
    }
    if !(var_y > n * f64::EPSILON * n * sum_yy) {
        return Err(StatsError::DegenerateInput("value"));
    }

    Ok((n * sum_xy - sum_x * sum_y) / (var_x * var_y).sqrt())
}
