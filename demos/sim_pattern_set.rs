// Search a two color, three angle SIM pattern set and print its records
//
// Run with: cargo run --release --example sim_pattern_set

use anyhow::Result;
use env_logger::Env;
use log::info;

use sim_patterns::patterns::{
    affine_fit_patterns, calibration_patterns, find_closest_multicolor_set, otf_test_set, pattern_set_data,
    AffineFitOptions, MulticolorSearchOptions, OtfTestOptions,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let (nx, ny) = (1920, 1080);
    let nphases = 3;
    let options = MulticolorSearchOptions {
        bvec_max_size: 30,
        avec_max_size: 30,
        max_solutions_to_search: 10,
        ..MulticolorSearchOptions::default()
    };

    let set = find_closest_multicolor_set(10.0, 3, nphases, Some(&[465.0, 532.0]), &options)?;
    info!("Nearest leakage peak: {:?}", set.min_leakage);

    for ((&wavelength, vec_as), vec_bs) in set.wavelengths.iter().zip(&set.vec_as).zip(&set.vec_bs) {
        let data = pattern_set_data(nx, ny, vec_as, vec_bs, nphases, Some(wavelength), false, options.pitch, true)?;
        info!("{} nm: {} patterns, periods {:?}", wavelength, data.patterns.len() * nphases, data.record.periods);
        println!("{}", data.record.to_json()?);
    }

    let calibration = calibration_patterns(nx, ny, &[50, 100, 200]);
    for (name, pattern) in calibration.iter().take(8) {
        let on = pattern.iter().filter(|&&on| on).count();
        info!("{}: {:.3} of mirrors on", name, on as f64 / pattern.len() as f64);
    }
    info!("{} calibration patterns in total", calibration.len());

    let affine = affine_fit_patterns(nx, ny, &[1.0, 1.5, 2.0], &AffineFitOptions::default())?;
    info!("Affine fit grid with {} spots per pattern", affine.centers.len());

    let otf = otf_test_set(nx, ny, &OtfTestOptions { nperiods: 5, ..OtfTestOptions::default() }, false)?;
    info!("OTF test periods: {:?}", otf.record.periods);

    Ok(())
}
