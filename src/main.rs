use std::env;
use std::process;

use ostinato::{
    discover_patterns, logging, report, AnalysisConfig, OstinatoError, OutputFormat, Score,
};
use tracing::info;

const USAGE: &str = "Usage: ostinato [--config <file.yaml>] [--part N] [--min-pattern-size N] \
[--min-translators N] [--json] [--show-score] <score.xml|score.mxl>";

struct Options {
    input: String,
    config: AnalysisConfig,
}

fn main() {
    logging::init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("{}", USAGE);
            process::exit(1);
        }
    };

    if let Err(e) = run(&options) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(options: &Options) -> Result<(), OstinatoError> {
    let config = &options.config;
    let score = Score::from_file(&options.input)?;
    if config.show_score {
        println!("{}", score);
    }

    let dataset = score.to_dataset(config.part)?;
    info!(part = config.part, points = dataset.len(), "analysing part");
    let tecs = discover_patterns(&dataset)?;
    let found = tecs.len();
    let selected = report::select(tecs, config);
    info!(found, reported = selected.len(), "pattern discovery finished");

    match config.format {
        OutputFormat::Text => print!("{}", report::render_text(&selected)),
        OutputFormat::Json => println!("{}", report::render_json(&selected)?),
    }
    Ok(())
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    if args.is_empty() {
        return Err("No input file given".to_string());
    }

    // The config file supplies defaults, so load it before applying other flags.
    let mut config = match args.iter().position(|a| a == "--config") {
        Some(i) => {
            let path = args
                .get(i + 1)
                .ok_or_else(|| "--config requires a file path".to_string())?;
            AnalysisConfig::from_file(path).map_err(|e| e.to_string())?
        }
        None => AnalysisConfig::default(),
    };

    let mut input: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--config" => i += 1,
            "--part" => config.part = flag_value(args, i, arg)?,
            "--min-pattern-size" => config.min_pattern_size = flag_value(args, i, arg)?,
            "--min-translators" => config.min_translators = flag_value(args, i, arg)?,
            "--json" => config.format = OutputFormat::Json,
            "--show-score" => config.show_score = true,
            _ if arg.starts_with("--") => return Err(format!("Unknown option: {}", arg)),
            _ => {
                if input.is_some() {
                    return Err(format!("Unexpected argument: {}", arg));
                }
                input = Some(arg.to_string());
            }
        }
        if matches!(arg, "--part" | "--min-pattern-size" | "--min-translators") {
            i += 1;
        }
        i += 1;
    }

    config.validate().map_err(|e| e.to_string())?;
    let input = input.ok_or_else(|| "No input file given".to_string())?;
    Ok(Options { input, config })
}

fn flag_value(args: &[String], i: usize, flag: &str) -> Result<usize, String> {
    let value = args
        .get(i + 1)
        .ok_or_else(|| format!("{} requires a value", flag))?;
    value
        .parse()
        .map_err(|_| format!("{} expects a non-negative integer, got '{}'", flag, value))
}
