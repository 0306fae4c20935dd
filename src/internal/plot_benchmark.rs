#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::cast_precision_loss)]

//! Times `add`, `find` and `delete` of both table variants over random datasets of growing
//! size and renders one line chart per operation.

use std::{
    error::Error,
    hint::black_box,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use clap::Parser;
use plotters::prelude::*;
use polytable::{ChainingTable, OpenAddressingTable, StringTable};
use rand::Rng;

const VARIANTS: [&str; 2] = ["Chaining", "Open Addressing"];
const OPERATIONS: [&str; 3] = ["add", "find", "delete"];
const MIN_KEY_LEN: usize = 4;
const MAX_KEY_LEN: usize = 16;

#[derive(Debug, Parser)]
#[command(name = "polytable_plot", about = "Benchmark both table variants and plot the timings")]
struct Cli {
    /// Directory the PNG charts are written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
    /// Dataset sizes to measure, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = [1_000, 5_000, 10_000, 25_000, 50_000, 100_000, 200_000])]
    sizes: Vec<usize>,
}

/// Average nanoseconds per operation over one dataset
#[derive(Debug, Clone, Copy, Default)]
struct Timings {
    add: f64,
    find: f64,
    delete: f64,
}

impl Timings {
    fn of(&self, operation: usize) -> f64 {
        match operation {
            0 => self.add,
            1 => self.find,
            _ => self.delete,
        }
    }
}

fn per_operation(elapsed: Duration, count: usize) -> f64 {
    elapsed.as_secs_f64() * 1e9 / count.max(1) as f64
}

/// Random lowercase keys, made distinct by an index suffix
fn random_keys(count: usize) -> Vec<String> {
    let mut rng = rand::rng();
    (0..count)
        .map(|i| {
            let len = rng.random_range(MIN_KEY_LEN..=MAX_KEY_LEN);
            let mut key: String = (0..len).map(|_| char::from(rng.random_range(b'a'..=b'z'))).collect();
            key.push_str(&i.to_string());
            key
        })
        .collect()
}

/// Fills a fresh table with `keys`, then looks every key up, then deletes every key
fn measure<T: StringTable<usize> + Default>(keys: &[String]) -> Timings {
    let mut table = T::default();

    let start = Instant::now();
    for (i, key) in keys.iter().enumerate() {
        let _ = black_box(table.add(key.clone(), i));
    }
    let add = per_operation(start.elapsed(), keys.len());

    let start = Instant::now();
    let mut found = 0;
    for key in keys {
        if black_box(table.find(key)).is_some() {
            found += 1;
        }
    }
    let find = per_operation(start.elapsed(), keys.len());

    let start = Instant::now();
    for key in keys {
        let _ = black_box(table.delete(key));
    }
    let delete = per_operation(start.elapsed(), keys.len());

    if found != keys.len() || !table.is_empty() {
        eprintln!("  warning: {found} of {} keys found, {} left after delete", keys.len(), table.len());
    }

    Timings { add, find, delete }
}

fn draw_chart(
    path: &Path,
    operation: &str,
    sizes: &[usize],
    results: &[Vec<Timings>],
    operation_idx: usize,
) -> Result<(), Box<dyn Error>> {
    let font_family = "sans-serif";
    let colors = [RGBColor(220, 50, 50), RGBColor(50, 90, 220)];
    let line_width = 2;
    let marker_size = 4;

    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_time = results
        .iter()
        .flat_map(|timings| timings.iter().map(|t| t.of(operation_idx)))
        .fold(0.0, f64::max) *
        1.1; // 10% headroom

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Average `{operation}` time per key"), (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0..sizes.len(), 0.0..max_time.max(1.0))?;

    let x_labels: Vec<String> = sizes.iter().map(ToString::to_string).collect();
    chart
        .configure_mesh()
        .x_labels(sizes.len())
        .x_label_formatter(&|x| x_labels.get(*x).cloned().unwrap_or_default())
        .x_desc("Number of Keys")
        .y_desc("Time per operation (ns)")
        .axis_desc_style((font_family, 16))
        .draw()?;

    for (variant_idx, &variant) in VARIANTS.iter().enumerate() {
        let color = &colors[variant_idx % colors.len()];
        let line_style = ShapeStyle::from(color).stroke_width(line_width);
        let points: Vec<(usize, f64)> =
            results[variant_idx].iter().enumerate().map(|(i, t)| (i, t.of(operation_idx))).collect();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), line_style))?
            .label(variant)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(points.iter().map(|&point| Circle::new(point, marker_size, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let sizes: Vec<usize> = cli.sizes.into_iter().filter(|&n| n > 0).collect();
    if sizes.is_empty() {
        return Err("no dataset sizes to measure".into());
    }

    let mut results: Vec<Vec<Timings>> = vec![Vec::new(); VARIANTS.len()];

    for &n_keys in &sizes {
        println!("Testing with {n_keys} keys");
        let keys = random_keys(n_keys);

        let timings = [
            measure::<ChainingTable<usize>>(&keys),
            measure::<OpenAddressingTable<usize>>(&keys),
        ];
        for (variant_idx, timing) in timings.into_iter().enumerate() {
            println!(
                "  {}: add = {:.1} ns, find = {:.1} ns, delete = {:.1} ns",
                VARIANTS[variant_idx], timing.add, timing.find, timing.delete
            );
            results[variant_idx].push(timing);
        }
    }

    std::fs::create_dir_all(&cli.output_dir)?;
    let mut written = Vec::new();
    for (operation_idx, &operation) in OPERATIONS.iter().enumerate() {
        let path = cli.output_dir.join(format!("{operation}_time.png"));
        draw_chart(&path, operation, &sizes, &results, operation_idx)?;
        written.push(path.display().to_string());
    }

    println!("Generated plot images: {}", written.join(", "));
    Ok(())
}
