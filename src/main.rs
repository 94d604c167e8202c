/// simsearch - near-duplicate string search CLI
use simsearch::{
    output_file_name, write_pairs_to_path, Corpus, Metric, Region, SearchConfig, SearchError,
    SimSearch, SinkKind, Strategy,
};
use std::env;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{info, Level};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_usage() {
    eprintln!("simsearch v{}", VERSION);
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    simsearch [OPTIONS] <INPUT>");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -h, --help                 Print this help message");
    eprintln!("    -v, --version              Print version information");
    eprintln!("    -s, --strategy <NAME>      patterns | semi | part (default: semi)");
    eprintln!("    -k, --cutoff <K>           Maximum distance (default: 2)");
    eprintln!("    -m, --metric <L|H>         Levenshtein or Hamming (default: L)");
    eprintln!("    --prefix <N>               Key strings by their first N chars");
    eprintln!("    --suffix <N>               Key strings by their last N chars");
    eprintln!("    --middle <START:LEN>       Key strings by everything but a span");
    eprintln!("    --no-eye                   Do not emit self-pairs");
    eprintln!("    --duplicates               Keep duplicate lines, report positions");
    eprintln!("    --small-threshold <N>      Pairwise check below N strings per bucket");
    eprintln!("    --large-threshold <N>      Parallel recursion at N strings per bucket");
    eprintln!("    --shared-sink              Use one shared concurrent pair set");
    eprintln!("    -j, --threads <N>          Worker threads (default: all cores)");
    eprintln!("    --expect <N>               Fail unless exactly N pairs are produced");
    eprintln!("    -c, --config <FILE>        Load settings from a TOML file");
    eprintln!("    -o, --output <FILE>        Output file (default: <INPUT>_<s>_<k>_<m>)");
    eprintln!("    --verbose                  Log per-phase timings");
    eprintln!("    --quiet                    Only log errors");
    eprintln!();
    eprintln!("ARGUMENTS:");
    eprintln!("    <INPUT>                    One string per line");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("    simsearch words.txt");
    eprintln!("    simsearch -k 1 -m H words.txt");
    eprintln!("    simsearch -s part --prefix 4 --large-threshold 5000 words.txt");
}

fn print_version() {
    println!("simsearch {}", VERSION);
}

/// Flags that override the loaded configuration.
#[derive(Default)]
struct Overrides {
    cutoff: Option<usize>,
    metric: Option<Metric>,
    region: Option<Region>,
    no_eye: bool,
    small_threshold: Option<usize>,
    large_threshold: Option<usize>,
    shared_sink: bool,
    threads: Option<usize>,
    expected_pairs: Option<usize>,
}

struct Options {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    strategy: Strategy,
    keep_duplicates: bool,
    level: Level,
    overrides: Overrides,
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("Missing value after {}", flag))
}

fn parse_number(value: &str, flag: &str) -> Result<usize, String> {
    value
        .parse()
        .map_err(|_| format!("Invalid value '{}' for {}", value, flag))
}

fn parse_middle(value: &str) -> Result<Region, String> {
    let (start, len) = value
        .split_once(':')
        .ok_or_else(|| format!("Expected START:LEN for --middle, got '{}'", value))?;
    Ok(Region::Middle {
        start: parse_number(start, "--middle")?,
        len: parse_number(len, "--middle")?,
    })
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();

    let mut options = Options {
        input: None,
        output: None,
        config: None,
        strategy: Strategy::default(),
        keep_duplicates: false,
        level: Level::INFO,
        overrides: Overrides::default(),
    };
    let mut i = 1;

    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                process::exit(0);
            }
            "-s" | "--strategy" => {
                let value = next_value(&args, &mut i, arg)?;
                options.strategy = value.parse().map_err(|e: SearchError| e.to_string())?;
            }
            "-k" | "--cutoff" => {
                let value = next_value(&args, &mut i, arg)?;
                options.overrides.cutoff = Some(parse_number(value, arg)?);
            }
            "-m" | "--metric" => {
                let value = next_value(&args, &mut i, arg)?;
                let mut chars = value.chars();
                let metric = match (chars.next(), chars.next()) {
                    (Some(c), None) => Metric::from_selector(c).map_err(|e| e.to_string())?,
                    _ => return Err(format!("Invalid metric '{}': expected L or H", value)),
                };
                options.overrides.metric = Some(metric);
            }
            "--prefix" => {
                let value = next_value(&args, &mut i, arg)?;
                options.overrides.region = Some(Region::Prefix(parse_number(value, arg)?));
            }
            "--suffix" => {
                let value = next_value(&args, &mut i, arg)?;
                options.overrides.region = Some(Region::Suffix(parse_number(value, arg)?));
            }
            "--middle" => {
                let value = next_value(&args, &mut i, arg)?;
                options.overrides.region = Some(parse_middle(value)?);
            }
            "--no-eye" => {
                options.overrides.no_eye = true;
            }
            "--duplicates" => {
                options.keep_duplicates = true;
            }
            "--small-threshold" => {
                let value = next_value(&args, &mut i, arg)?;
                options.overrides.small_threshold = Some(parse_number(value, arg)?);
            }
            "--large-threshold" => {
                let value = next_value(&args, &mut i, arg)?;
                options.overrides.large_threshold = Some(parse_number(value, arg)?);
            }
            "--shared-sink" => {
                options.overrides.shared_sink = true;
            }
            "-j" | "--threads" => {
                let value = next_value(&args, &mut i, arg)?;
                options.overrides.threads = Some(parse_number(value, arg)?);
            }
            "--expect" => {
                let value = next_value(&args, &mut i, arg)?;
                options.overrides.expected_pairs = Some(parse_number(value, arg)?);
            }
            "-c" | "--config" => {
                options.config = Some(PathBuf::from(next_value(&args, &mut i, arg)?));
            }
            "-o" | "--output" => {
                options.output = Some(PathBuf::from(next_value(&args, &mut i, arg)?));
            }
            "--verbose" => {
                options.level = Level::DEBUG;
            }
            "--quiet" => {
                options.level = Level::ERROR;
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            arg => {
                if options.input.is_some() {
                    return Err("Multiple input files specified".to_string());
                }
                options.input = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }

    Ok(options)
}

fn build_config(options: &Options) -> Result<SearchConfig, SearchError> {
    let mut config = match &options.config {
        Some(path) => SearchConfig::load(path)?,
        None => SearchConfig::default(),
    };

    let o = &options.overrides;
    if let Some(cutoff) = o.cutoff {
        config.cutoff = cutoff;
    }
    if let Some(metric) = o.metric {
        config.metric = metric;
    }
    if let Some(region) = o.region {
        config.region = region;
    }
    if o.no_eye {
        config.include_eye = false;
    }
    if let Some(small) = o.small_threshold {
        config.small_bucket_threshold = small;
    }
    if let Some(large) = o.large_threshold {
        config.large_bucket_threshold = large;
    }
    if o.shared_sink {
        config.sink = SinkKind::Shared;
    }
    if let Some(threads) = o.threads {
        config.threads = threads;
    }
    if let Some(expected) = o.expected_pairs {
        config.expected_pairs = Some(expected);
    }

    config.validate()?;
    Ok(config)
}

fn run(options: &Options, input: &Path) -> Result<(), SearchError> {
    let config = build_config(options)?;
    let corpus = Corpus::read(input, options.keep_duplicates)?;

    let output = options.output.clone().unwrap_or_else(|| {
        output_file_name(input, options.strategy, config.cutoff, config.metric)
    });

    let search = SimSearch::new(corpus.strings(), config)?;
    info!(
        target: "simsearch::cli",
        input = %input.display(),
        strings = corpus.len(),
        strategy = %options.strategy,
        threads = search.num_threads(),
        "Starting search"
    );

    let pairs = search.run(options.strategy, None)?;
    write_pairs_to_path(&output, &corpus, &pairs)?;

    info!(
        target: "simsearch::cli",
        output = %output.display(),
        pairs = pairs.len(),
        "Done"
    );
    Ok(())
}

fn main() {
    let options = match parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(options.level)
        .with_target(true)
        .init();

    let Some(input) = options.input.as_deref() else {
        eprintln!("Error: Missing input file");
        eprintln!();
        print_usage();
        process::exit(1);
    };

    if let Err(e) = run(&options, input) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
