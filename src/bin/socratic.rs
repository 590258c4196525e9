extern crate clap;
extern crate num_cpus;
extern crate rand;
extern crate socraticwalls;

use clap::{value_t, App, Arg, ArgMatches};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::EnvFilter;

use socraticwalls::{
    ColorMode, Error, GradientRegistry, RenderConfig, Renderer, SearchConfig, View, ViewSearch,
};

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn validate_size(s: &str) -> Result<(), String> {
    match parse_pair::<usize>(s, 'x') {
        Some((w, h)) if w > 0 && h > 0 => Ok(()),
        Some(_) => Err("Image dimensions must be non-zero".to_string()),
        None => Err("Could not parse output image size".to_string()),
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CENTER: &str = "center";
const SCALE: &str = "scale";
const MODE: &str = "mode";
const PALETTE: &str = "palette";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const SEARCH: &str = "search";
const SEED: &str = "seed";
const CANDIDATES: &str = "candidates";
const RANDOM_PALETTE: &str = "random-palette";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("socratic")
        .version("0.1.0")
        .about("Mandelbrot renderer and view finder")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (PNG)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1080x660")
                .validator(|s| validate_size(&s))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(CENTER)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-0.5,0.0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse view center"))
                .help("Center of the view on the complex plane, as RE,IM"),
        )
        .arg(
            Arg::with_name(SCALE)
                .long(SCALE)
                .short("z")
                .takes_value(true)
                .default_value("3.5")
                .validator(|s| match f64::from_str(&s) {
                    Ok(scale) if scale.is_finite() && scale > 0.0 => Ok(()),
                    _ => Err("Scale must be a positive number".to_string()),
                })
                .help("Width of the view on the complex plane"),
        )
        .arg(
            Arg::with_name(MODE)
                .long(MODE)
                .short("m")
                .takes_value(true)
                .default_value("histogram")
                .validator(|s| ColorMode::from_str(&s).map(|_| ()))
                .help("Color mode: 0-4, or smooth-hsv, long-gradient, periodic, angle, histogram"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .long(PALETTE)
                .short("p")
                .takes_value(true)
                .default_value("0")
                .validator(|s| {
                    usize::from_str(&s)
                        .map(|_| ())
                        .map_err(|_| "Could not parse palette index".to_string())
                })
                .help("Index of the gradient to color with"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use (default: all cores)"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        200_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 200000",
                    )
                })
                .help("Iteration cap per pixel"),
        )
        .arg(
            Arg::with_name(SEARCH)
                .long(SEARCH)
                .help("Search for an interesting view instead of using --center and --scale"),
        )
        .arg(
            Arg::with_name(CANDIDATES)
                .long(CANDIDATES)
                .takes_value(true)
                .default_value("2000")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse candidate count",
                        "Candidate count must be between 1 and 1000000",
                    )
                })
                .help("Random views scored by --search"),
        )
        .arg(
            Arg::with_name(SEED)
                .long(SEED)
                .takes_value(true)
                .validator(|s| {
                    u64::from_str(&s)
                        .map(|_| ())
                        .map_err(|_| "Could not parse seed".to_string())
                })
                .help("Seed for the view search and random palette"),
        )
        .arg(
            Arg::with_name(RANDOM_PALETTE)
                .long(RANDOM_PALETTE)
                .help("Generate a random palette and color with it"),
        )
        .get_matches()
}

fn pair_arg<T: FromStr>(matches: &ArgMatches, name: &str, separator: char) -> (T, T) {
    matches
        .value_of(name)
        .and_then(|s| parse_pair(s, separator))
        .unwrap_or_else(|| {
            clap::Error::value_validation_auto(format!("Could not parse --{}", name)).exit()
        })
}

fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn run(matches: &ArgMatches) -> socraticwalls::Result<()> {
    let (width, height) = pair_arg::<usize>(matches, SIZE, 'x');
    let mode = value_t!(matches, MODE, ColorMode).unwrap_or_else(|e| e.exit());
    let palette = value_t!(matches, PALETTE, usize).unwrap_or_else(|e| e.exit());
    let iterations = value_t!(matches, ITERATIONS, usize).unwrap_or_else(|e| e.exit());
    let threads = if matches.is_present(THREADS) {
        value_t!(matches, THREADS, usize).unwrap_or_else(|e| e.exit())
    } else {
        num_cpus::get()
    };
    let seed = if matches.is_present(SEED) {
        Some(value_t!(matches, SEED, u64).unwrap_or_else(|e| e.exit()))
    } else {
        None
    };

    let view = if matches.is_present(SEARCH) {
        let candidates = value_t!(matches, CANDIDATES, usize).unwrap_or_else(|e| e.exit());
        let config = SearchConfig::default()
            .candidates(candidates)
            .threads(threads);
        let mut search = match seed {
            Some(seed) => ViewSearch::with_seed(config, seed),
            None => ViewSearch::new(config),
        };
        search
            .run(1)
            .first()
            .map(|best| best.view)
            .unwrap_or_default()
    } else {
        let (cx, cy) = pair_arg::<f64>(matches, CENTER, ',');
        let scale = value_t!(matches, SCALE, f64).unwrap_or_else(|e| e.exit());
        View::new(cx, cy, scale)?
    };

    let registry = GradientRegistry::new();
    let index = if matches.is_present(RANDOM_PALETTE) {
        registry.append_random(&mut rng(seed)).0
    } else {
        palette
    };
    let gradient = registry.get(index).ok_or(Error::PaletteNotFound(index))?;

    let renderer = Renderer::new(
        RenderConfig::default()
            .max_iterations(iterations)
            .threads(threads),
    );
    info!(width, height, %mode, palette = index, "rendering");
    let image = renderer.render(width, height, &view, mode, Some(&gradient));

    // Output format follows the file extension.
    let output = matches.value_of(OUTPUT).unwrap_or_default();
    image.save(output)?;

    println!("cx={} cy={} scale={}", view.cx, view.cy, view.scale);
    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
