use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime, Timelike};
use clap::Parser;
use rusqlite::{params, Connection};

/// Write a synthetic household power-consumption database.
#[derive(Debug, Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Output SQLite file (replaced if it exists).
    #[arg(long, default_value = "power_pulse.db")]
    out: PathBuf,

    /// Number of one-minute readings to write.
    #[arg(long, default_value_t = 20_000)]
    rows: usize,

    /// Timestamp of the first reading.
    #[arg(long, default_value = "2006-12-16 17:24:00")]
    start: String,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// splitmix64: small, seedable, good enough for demo noise.
struct Noise(u64);

impl Noise {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[-1, 1)`.
    fn signed(&mut self) -> f64 {
        self.unit() * 2.0 - 1.0
    }
}

/// Daily load shape in kW: low at night, peaks morning and evening.
fn base_load(ts: NaiveDateTime) -> f64 {
    let h = ts.hour() as f64 + ts.minute() as f64 / 60.0;
    let morning = (-(h - 8.0).powi(2) / 2.0).exp();
    let evening = (-(h - 20.0).powi(2) / 4.0).exp();
    0.3 + 1.6 * morning + 2.4 * evening
}

fn fmt3(v: f64) -> String {
    format!("{v:.3}")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let start = NaiveDateTime::parse_from_str(&args.start, "%Y-%m-%d %H:%M:%S")
        .with_context(|| format!("parsing --start '{}'", args.start))?;

    if args.out.exists() {
        std::fs::remove_file(&args.out)
            .with_context(|| format!("removing existing {}", args.out.display()))?;
    }
    let mut conn = Connection::open(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;

    // Channel columns are untyped so malformed text such as "?" survives.
    conn.execute_batch(
        "CREATE TABLE power_consumption (
            Datetime TEXT,
            Global_active_power,
            Global_reactive_power,
            Voltage,
            Global_intensity,
            Sub_metering_1,
            Sub_metering_2,
            Sub_metering_3
        );
        CREATE INDEX power_consumption_datetime ON power_consumption (Datetime);",
    )
    .context("creating schema")?;

    let mut rng = Noise(args.seed);
    let mut missing = 0usize;

    let tx = conn.transaction().context("starting transaction")?;
    {
        let mut stmt = tx
            .prepare(
                "INSERT INTO power_consumption VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )
            .context("preparing insert")?;

        for i in 0..args.rows {
            let ts = start + Duration::minutes(i as i64);

            // The raw dataset marks outages with '?' in every channel, and a
            // handful of rows carry a mangled timestamp.
            let roll = rng.unit();
            let datetime = if roll < 0.001 {
                "??/??/???? ??:??:??".to_string()
            } else {
                ts.format("%Y-%m-%d %H:%M:%S").to_string()
            };
            if roll > 0.995 {
                missing += 1;
                stmt.execute(params![datetime, "?", "?", "?", "?", "?", "?", "?"])
                    .with_context(|| format!("inserting row {i}"))?;
                continue;
            }

            let active = (base_load(ts) + 0.25 * rng.signed()).max(0.05);
            let reactive = (0.1 + 0.08 * rng.signed()).max(0.0);
            let voltage = 240.0 + 3.0 * rng.signed() - 1.5 * active;
            let intensity = active * 1000.0 / voltage;
            let kitchen = if rng.unit() < 0.05 { 30.0 + 10.0 * rng.unit() } else { 0.0 };
            let laundry = if rng.unit() < 0.10 { 1.0 + 20.0 * rng.unit() } else { 0.0 };
            let heater = if active > 1.0 { 17.0 + rng.signed() } else { 0.0 };

            stmt.execute(params![
                datetime,
                fmt3(active),
                fmt3(reactive),
                format!("{voltage:.2}"),
                format!("{intensity:.1}"),
                kitchen.round(),
                laundry.round(),
                heater.round(),
            ])
            .with_context(|| format!("inserting row {i}"))?;
        }
    }
    tx.commit().context("committing readings")?;

    println!(
        "Wrote {} readings ({missing} with missing values) to {}",
        args.rows,
        args.out.display()
    );
    Ok(())
}
