use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{debug, info, warn};
use nalgebra::DMatrix;
use serde::de::DeserializeOwned;

use sim_patterns::config::DEFAULT_DMD_PITCH;
use sim_patterns::fourier::pattern_fourier_component;
use sim_patterns::geometries::LatticeVector;
use sim_patterns::interfaces::{DitherMode, OriginMode};
use sim_patterns::lattice::sim_unit_cell;
use sim_patterns::patterns::{
    all_pattern_sets, binarize, otf_test_set, pattern_set_data, MulticolorSearchOptions, OtfTestOptions,
    PatternSetRecord,
};

#[derive(Parser)]
#[command(name = "sim-patterns")]
#[command(about = "Lattice pattern generation and search for DMD structured illumination")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Number of threads to use (default: all available cores)
    #[arg(short, long)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the pattern set record of one SIM angle
    Generate {
        /// Lattice vector a, as X,Y
        #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
        va: LatticeVector,

        /// Lattice vector b, as X,Y
        #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
        vb: LatticeVector,

        #[arg(long, default_value = "3")]
        nphases: usize,

        #[arg(long, default_value = "1920")]
        nx: usize,

        #[arg(long, default_value = "1080")]
        ny: usize,

        /// Wavelength, in the units of the pitch
        #[arg(long)]
        wavelength: Option<f64>,

        /// Mirror pitch
        #[arg(long, default_value_t = DEFAULT_DMD_PITCH)]
        pitch: f64,

        /// Swap on and off mirrors
        #[arg(long)]
        invert: bool,

        /// Output directory for the JSON record (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Evaluate one Fourier component of a SIM pattern
    Fourier {
        #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
        va: LatticeVector,

        #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
        vb: LatticeVector,

        #[arg(long, default_value = "3")]
        nphases: usize,

        #[arg(long, default_value = "0")]
        phase_index: usize,

        /// Coefficient of the reciprocal vector ra
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        n: i64,

        /// Coefficient of the reciprocal vector rb
        #[arg(long, default_value = "1", allow_hyphen_values = true)]
        m: i64,

        /// Phase reference, corner or fft
        #[arg(long, default_value = "fft")]
        origin: OriginMode,

        #[arg(long, default_value = "1920")]
        nx: usize,

        #[arg(long, default_value = "1080")]
        ny: usize,
    },
    /// Search for a multi-angle, multi-wavelength pattern set
    Optimize {
        /// Comma separated periods in mirrors, for the shortest wavelength
        #[arg(long, value_delimiter = ',', required = true)]
        period: Vec<f64>,

        #[arg(long, default_value = "3")]
        nangles: usize,

        #[arg(long, default_value = "3")]
        nphases: usize,

        /// Comma separated wavelengths
        #[arg(long, value_delimiter = ',')]
        wavelengths: Vec<f64>,

        /// JSON file with search options
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Overrides bvec_max_size from the config
        #[arg(long)]
        bvec_max_size: Option<i64>,

        /// Overrides avec_max_size from the config
        #[arg(long)]
        avec_max_size: Option<i64>,

        /// Take the cheapest set without leakage minimisation
        #[arg(long)]
        no_leakage: bool,

        #[arg(long, default_value = "1920")]
        nx: usize,

        #[arg(long, default_value = "1080")]
        ny: usize,

        /// Output directory for the JSON records (default: stdout)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Find the closest single pattern on a grid of periods and angles
    OtfTest {
        /// JSON file with grid options
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Overrides min_period from the config
        #[arg(long)]
        min_period: Option<f64>,

        /// Overrides max_period from the config
        #[arg(long)]
        max_period: Option<f64>,

        /// Overrides nperiods from the config
        #[arg(long)]
        nperiods: Option<usize>,

        /// Overrides nangles from the config
        #[arg(long)]
        nangles: Option<usize>,

        #[arg(long, default_value = "1920")]
        nx: usize,

        #[arg(long, default_value = "1080")]
        ny: usize,

        /// Output directory for the JSON record (default: stdout)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Report the on fraction of a uniform gray level after binarization
    Binarize {
        #[arg(long)]
        value: f64,

        #[arg(long, default_value = "64")]
        nx: usize,

        #[arg(long, default_value = "64")]
        ny: usize,

        /// floyd-steinberg, jjn, random or round
        #[arg(long, default_value = "floyd-steinberg")]
        mode: DitherMode,
    },
}

fn parse_vector(s: &str) -> std::result::Result<LatticeVector, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [x, y] => {
            let x = x.parse::<i64>().map_err(|e| format!("invalid x component '{x}': {e}"))?;
            let y = y.parse::<i64>().map_err(|e| format!("invalid y component '{y}': {e}"))?;
            Ok(LatticeVector::new(x, y))
        }
        _ => Err(format!("expected X,Y but got '{s}'")),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Set thread pool size if specified
    if let Some(threads) = cli.threads {
        #[cfg(feature = "parallel")]
        {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .context("Failed to set thread pool size")?;
            info!("Using {} threads", threads);
        }
        #[cfg(not(feature = "parallel"))]
        {
            warn!("Thread count {} specified but parallel feature not enabled. Ignoring.", threads);
        }
    }

    info!("Starting sim-patterns v{}", sim_patterns::VERSION);

    match cli.command {
        Commands::Generate {
            va,
            vb,
            nphases,
            nx,
            ny,
            wavelength,
            pitch,
            invert,
            output,
        } => {
            info!("Generating pattern set record for va = {}, vb = {}", va, vb);
            generate_record(va, vb, nphases, (nx, ny), wavelength, pitch, invert, output.as_deref())
        }
        Commands::Fourier {
            va,
            vb,
            nphases,
            phase_index,
            n,
            m,
            origin,
            nx,
            ny,
        } => fourier_component(va, vb, nphases, phase_index, (n, m), origin, (nx, ny)),
        Commands::Optimize {
            period,
            nangles,
            nphases,
            wavelengths,
            config,
            bvec_max_size,
            avec_max_size,
            no_leakage,
            nx,
            ny,
            output_dir,
        } => {
            let mut options = match config {
                Some(path) => load_options(&path)?,
                None => MulticolorSearchOptions::default(),
            };
            if let Some(size) = bvec_max_size {
                options.bvec_max_size = size;
            }
            if let Some(size) = avec_max_size {
                options.avec_max_size = size;
            }
            if no_leakage {
                options.minimize_leakage = false;
            }
            info!("Searching {} angle pattern sets for {} periods", nangles, period.len());
            optimize(&period, nangles, nphases, &wavelengths, &options, (nx, ny), output_dir.as_deref())
        }
        Commands::OtfTest {
            config,
            min_period,
            max_period,
            nperiods,
            nangles,
            nx,
            ny,
            output_dir,
        } => {
            let mut options: OtfTestOptions = match config {
                Some(path) => load_options(&path)?,
                None => OtfTestOptions::default(),
            };
            options.min_period = min_period.unwrap_or(options.min_period);
            options.max_period = max_period.unwrap_or(options.max_period);
            options.nperiods = nperiods.unwrap_or(options.nperiods);
            options.nangles = nangles.unwrap_or(options.nangles);
            otf_test(&options, (nx, ny), output_dir.as_deref())
        }
        Commands::Binarize { value, nx, ny, mode } => binarize_level(value, (nx, ny), mode),
    }
}

fn load_options<T: DeserializeOwned + std::fmt::Debug>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let options: T = serde_json::from_str(&text).with_context(|| format!("Invalid options in {}", path.display()))?;
    debug!("Loaded options {:?}", options);
    Ok(options)
}

fn write_record(record: &PatternSetRecord, output_dir: Option<&Path>, prefix: &str) -> Result<()> {
    write_json(&record.to_json()?, output_dir, &format!("{prefix}{}", record.file_name()))
}

fn write_json(json: &str, output_dir: Option<&Path>, file_name: &str) -> Result<()> {
    match output_dir {
        Some(dir) => {
            fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
            let path = dir.join(file_name);
            fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn generate_record(
    va: LatticeVector,
    vb: LatticeVector,
    nphases: usize,
    (nx, ny): (usize, usize),
    wavelength: Option<f64>,
    pitch: f64,
    invert: bool,
    output: Option<&Path>,
) -> Result<()> {
    let data = pattern_set_data(nx, ny, &[va], &[vb], nphases, wavelength, invert, pitch, true)?;
    for (jj, pattern) in data.patterns.iter().flatten().enumerate() {
        let on = pattern.iter().filter(|&&on| on).count();
        debug!("Phase {}: {} of {} mirrors on", jj, on, pattern.len());
    }
    write_record(&data.record, output, "")
}

fn fourier_component(
    va: LatticeVector,
    vb: LatticeVector,
    nphases: usize,
    phase_index: usize,
    (n, m): (i64, i64),
    origin: OriginMode,
    canvas: (usize, usize),
) -> Result<()> {
    let cell = sim_unit_cell(va, vb, nphases)?;
    let (component, frequency) =
        pattern_fourier_component(&cell, va, vb, n, m, nphases, phase_index, origin, Some(canvas))?;
    let relative = component.norm() / cell.on_count() as f64;

    println!(
        "f = ({:.6}, {:.6}) 1/mirror, |c| = {:.6} ({:.4} of DC), phase = {:.6} rad",
        frequency.x,
        frequency.y,
        component.norm(),
        relative,
        component.arg()
    );
    Ok(())
}

fn optimize(
    periods: &[f64],
    nangles: usize,
    nphases: usize,
    wavelengths: &[f64],
    options: &MulticolorSearchOptions,
    (nx, ny): (usize, usize),
    output_dir: Option<&Path>,
) -> Result<()> {
    let sets = all_pattern_sets(nx, ny, periods, nangles, nphases, Some(wavelengths), false, options, false)?;

    for (period, set) in periods.iter().zip(&sets) {
        for data in set {
            let record = &data.record;
            if let Some(leakage) = record.min_leakage_angle {
                info!("Period {:.2}, wavelength {}: nearest leakage peak at {:.4e}", period, record.wavelength, leakage);
            }
            let mut prefix = format!("period={period:.2}_");
            if !wavelengths.is_empty() {
                prefix.push_str(&format!("wavelength={:.0}_", record.wavelength));
            }
            write_record(record, output_dir, &prefix)?;
        }
    }
    Ok(())
}

fn otf_test(options: &OtfTestOptions, (nx, ny): (usize, usize), output_dir: Option<&Path>) -> Result<()> {
    let set = otf_test_set(nx, ny, options, false)?;
    info!("{} lattice patterns in the OTF test set", set.record.npatterns());
    write_json(&set.record.to_json()?, output_dir, "otf_test_data.json")
}

fn binarize_level(value: f64, (nx, ny): (usize, usize), mode: DitherMode) -> Result<()> {
    if nx == 0 || ny == 0 {
        bail!("Canvas must be non-empty, got {} x {}", nx, ny);
    }
    let gray = DMatrix::from_element(ny, nx, value);
    let binary = binarize(&gray, mode)?;
    let fraction = binary.iter().filter(|&&on| on).count() as f64 / binary.len() as f64;
    println!("{mode:?}: {fraction:.4} of mirrors on for gray level {value}");
    Ok(())
}
