//! Synthetic sensor data.
//!
//! Produces regularly spaced readings with normally distributed noise around
//! typical values, then overlays a handful of anomaly events (heavy rainfall,
//! disinfection failure, saline intrusion, sewage ingress, algal bloom,
//! organic pollution, agricultural runoff, a chemical spill) and clips
//! everything to physically plausible bounds.
//!
//! Besides the five classified parameters the output carries conductivity,
//! colour, ammonia and TOC columns. Ingestion ignores them.

use anyhow::{anyhow, bail};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;
use std::io;
use wq_core::parameter::TIMESTAMP_COLUMN;
use wq_utils::dates::format_timestamp;

/// Normal operating behaviour of one output column.
#[derive(Debug, Clone, Copy)]
struct Channel {
    column: &'static str,
    mean: f64,
    std_dev: f64,
    min: f64,
    max: f64,
}

/// Output columns after the timestamp, in file order.
const CHANNELS: [Channel; 9] = [
    Channel { column: "pH", mean: 7.5, std_dev: 0.3, min: 4.0, max: 10.0 },
    Channel { column: "turbidity_NTU", mean: 0.8, std_dev: 0.2, min: 0.1, max: 100.0 },
    Channel { column: "tds_mg_L", mean: 500.0, std_dev: 100.0, min: 50.0, max: 2500.0 },
    Channel { column: "conductivity_mS_m", mean: 100.0, std_dev: 15.0, min: 10.0, max: 400.0 },
    Channel { column: "colour_Pt_Co", mean: 10.0, std_dev: 3.0, min: 0.0, max: 70.0 },
    Channel { column: "free_chlorine_mg_L", mean: 0.5, std_dev: 0.1, min: 0.0, max: 1.0 },
    Channel { column: "nitrate_mg_L", mean: 2.0, std_dev: 0.5, min: 0.0, max: 15.0 },
    Channel { column: "ammonia_mg_L", mean: 0.1, std_dev: 0.05, min: 0.0, max: 2.0 },
    Channel { column: "toc_mg_L", mean: 3.0, std_dev: 0.5, min: 0.0, max: 20.0 },
];

#[derive(Debug, Clone, Copy)]
enum Shape {
    /// Half-sine rise to `peak` and back.
    Spike { peak: f64, noise: f64 },
    /// Half-sine dip from the channel mean down to `floor` and back.
    Drop { floor: f64, noise: f64 },
    /// Alternating high/low samples with a superimposed two-cycle sine.
    Oscillation { high: f64, low: f64, amplitude: f64, noise: f64 },
}

#[derive(Debug, Clone, Copy)]
struct Anomaly {
    column: &'static str,
    start_day: u32,
    duration_hours: u32,
    shape: Shape,
}

const ANOMALIES: [Anomaly; 9] = [
    // heavy rainfall
    Anomaly {
        column: "turbidity_NTU",
        start_day: 15,
        duration_hours: 24,
        shape: Shape::Spike { peak: 70.0, noise: 5.0 },
    },
    // chemical spill
    Anomaly {
        column: "pH",
        start_day: 45,
        duration_hours: 6,
        shape: Shape::Oscillation { high: 9.8, low: 4.5, amplitude: 1.0, noise: 0.1 },
    },
    // saline intrusion
    Anomaly {
        column: "tds_mg_L",
        start_day: 25,
        duration_hours: 36,
        shape: Shape::Spike { peak: 2800.0, noise: 50.0 },
    },
    Anomaly {
        column: "conductivity_mS_m",
        start_day: 25,
        duration_hours: 36,
        shape: Shape::Spike { peak: 380.0, noise: 10.0 },
    },
    // algal bloom
    Anomaly {
        column: "colour_Pt_Co",
        start_day: 50,
        duration_hours: 12,
        shape: Shape::Spike { peak: 60.0, noise: 5.0 },
    },
    // disinfection failure
    Anomaly {
        column: "free_chlorine_mg_L",
        start_day: 20,
        duration_hours: 10,
        shape: Shape::Drop { floor: 0.05, noise: 0.05 },
    },
    // agricultural runoff
    Anomaly {
        column: "nitrate_mg_L",
        start_day: 40,
        duration_hours: 18,
        shape: Shape::Spike { peak: 13.0, noise: 0.5 },
    },
    // sewage ingress
    Anomaly {
        column: "ammonia_mg_L",
        start_day: 30,
        duration_hours: 8,
        shape: Shape::Spike { peak: 1.8, noise: 0.1 },
    },
    // organic pollution
    Anomaly {
        column: "toc_mg_L",
        start_day: 10,
        duration_hours: 20,
        shape: Shape::Spike { peak: 15.0, noise: 1.0 },
    },
];

/// Settings for [`generate`].
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub start: NaiveDateTime,
    pub days: u32,
    pub interval_minutes: u32,
    /// Fixed seed for reproducible output; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            start: NaiveDate::from_ymd_opt(2025, 6, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
            days: 60,
            interval_minutes: 30,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn points(&self) -> usize {
        (self.days as usize * 24 * 60) / self.interval_minutes.max(1) as usize
    }

    fn index_for_hours(&self, hours: u32) -> usize {
        (hours as usize * 60) / self.interval_minutes.max(1) as usize
    }
}

/// Generated samples, one column per output channel.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticData {
    timestamps: Vec<NaiveDateTime>,
    columns: Vec<Vec<f64>>,
}

impl SyntheticData {
    /// Column names in file order, starting with the timestamp.
    pub fn header() -> impl Iterator<Item = &'static str> {
        std::iter::once(TIMESTAMP_COLUMN).chain(CHANNELS.iter().map(|c| c.column))
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        channel_index(name).map(|i| self.columns[i].as_slice())
    }
}

fn channel_index(column: &str) -> Option<usize> {
    CHANNELS.iter().position(|c| c.column == column)
}

/// `len` evenly spaced values from `start` to `end` inclusive.
fn linspace(start: f64, end: f64, len: usize) -> impl Iterator<Item = f64> {
    let step = if len > 1 { (end - start) / (len - 1) as f64 } else { 0.0 };
    (0..len).map(move |i| start + step * i as f64)
}

fn normal(mean: f64, std_dev: f64) -> anyhow::Result<Normal<f64>> {
    Normal::new(mean, std_dev).map_err(|e| anyhow!("invalid distribution ({mean}, {std_dev}): {e}"))
}

fn apply_anomaly<R: Rng + ?Sized>(
    values: &mut [f64],
    anomaly: &Anomaly,
    channel: &Channel,
    config: &GeneratorConfig,
    rng: &mut R,
) -> anyhow::Result<()> {
    let start = config.index_for_hours(anomaly.start_day * 24);
    if start >= values.len() {
        return Ok(());
    }
    let end = (start + config.index_for_hours(anomaly.duration_hours)).min(values.len());
    let window = &mut values[start..end];
    let len = window.len();

    match anomaly.shape {
        Shape::Spike { peak, noise } => {
            let noise = normal(0.0, noise)?;
            for (v, x) in window.iter_mut().zip(linspace(0.0, PI, len)) {
                *v = peak * x.sin() + noise.sample(rng);
            }
        }
        Shape::Drop { floor, noise } => {
            let noise = normal(0.0, noise)?;
            for (v, x) in window.iter_mut().zip(linspace(0.0, PI, len)) {
                let profile = 1.0 - x.sin();
                *v = floor + (channel.mean - floor) * profile + noise.sample(rng);
            }
        }
        Shape::Oscillation { high, low, amplitude, noise } => {
            let noise = normal(0.0, noise)?;
            for (j, (v, x)) in window.iter_mut().zip(linspace(0.0, 2.0, len)).enumerate() {
                let level = if j % 2 == 0 { high } else { low };
                let oscillation = amplitude * (2.0 * PI * x).sin();
                *v = level + oscillation * 0.5 + noise.sample(rng);
            }
        }
    }
    Ok(())
}

/// Generate samples for the configured period.
pub fn generate<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    rng: &mut R,
) -> anyhow::Result<SyntheticData> {
    if config.interval_minutes == 0 {
        bail!("interval must be at least one minute");
    }
    let n = config.points();

    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(CHANNELS.len());
    for channel in &CHANNELS {
        let dist = normal(channel.mean, channel.std_dev)?;
        columns.push((0..n).map(|_| dist.sample(rng)).collect());
    }

    for anomaly in &ANOMALIES {
        let index = channel_index(anomaly.column)
            .ok_or_else(|| anyhow!("anomaly on unknown column '{}'", anomaly.column))?;
        apply_anomaly(&mut columns[index], anomaly, &CHANNELS[index], config, rng)?;
    }

    for (column, channel) in columns.iter_mut().zip(&CHANNELS) {
        for v in column.iter_mut() {
            *v = v.clamp(channel.min, channel.max);
        }
    }

    let step = Duration::minutes(config.interval_minutes as i64);
    let timestamps = (0..n).map(|i| config.start + step * i as i32).collect();
    Ok(SyntheticData { timestamps, columns })
}

/// Write samples as CSV with the full header.
pub fn write_csv<W: io::Write>(data: &SyntheticData, writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(SyntheticData::header())?;
    for (i, timestamp) in data.timestamps.iter().enumerate() {
        let mut row = Vec::with_capacity(CHANNELS.len() + 1);
        row.push(format_timestamp(timestamp));
        row.extend(data.columns.iter().map(|c| format!("{:.4}", c[i])));
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Generate a synthetic dataset and write it to `output`.
pub fn run_generate(output: &str, config: &GeneratorConfig) -> anyhow::Result<()> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let data = generate(config, &mut rng)?;
    let file = std::fs::File::create(output)?;
    write_csv(&data, io::BufWriter::new(file))?;
    info!(
        "generate: {} rows from {} every {} minutes written to {}",
        data.len(),
        format_timestamp(&config.start),
        config.interval_minutes,
        output
    );
    Ok(())
}
