// SPDX-License-Identifier: MIT
//
// gradix — a gradient authoring toolkit for fractal flame renderers.
//
// This is the command-line host that wires together the crates:
//
//   gx-color    → RGB/HSV math, hex parsing, interpolation
//   gx-gradient → blending strategies and color distribution
//   gx-format   → JWildfire MAP/UGR file formats
//
// A typical invocation flows through:
//
//   load inputs (.map/.ugr/preset) → blend or distribute → write output
//
// Inputs can also be described as a JSON recipe so a whole pipeline is
// reproducible from one file.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use gx_color::Rgb;
use gx_format::{load_map, load_ugr, save_map, save_ugr, write_map};
use gx_gradient::blend::{BlendKind, Blender};
use gx_gradient::distribute::{OrderingKey, distribute_with_strength};
use gx_gradient::{Gradient, preset, preset_names};
use serde::Deserialize;
use tracing::{debug, info};

// ─── Command line ────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "gradix", version, about = "Gradient authoring for JWildfire")]
struct Cli {
    /// Print progress details (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Blend two or more gradients into one.
    Blend(BlendArgs),
    /// Reorder a gradient's colors over its existing positions.
    Distribute(DistributeArgs),
    /// List built-in presets, or export one.
    Preset(PresetArgs),
    /// Convert a gradient file between formats.
    Convert(ConvertArgs),
    /// Describe a gradient file.
    Info(InfoArgs),
    /// Run a JSON recipe.
    Recipe(RecipeArgs),
}

#[derive(Debug, Args)]
struct BlendArgs {
    /// Blending strategy name.
    #[arg(short, long)]
    strategy: String,

    /// Input gradients: .map/.ugr paths or preset names. At least one.
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<String>,

    /// Per-input weights (defaults to 1.0 each).
    #[arg(short, long, num_args = 0..)]
    weight: Vec<f32>,

    /// Strategy parameters as key=value pairs.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Output file (.map or .ugr). Prints MAP text to stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// UGR category attribute.
    #[arg(long, default_value = "Custom")]
    category: String,
}

#[derive(Debug, Args)]
struct DistributeArgs {
    /// Input gradient: a .map/.ugr path or preset name.
    #[arg(short, long)]
    input: String,

    /// Ordering key name.
    #[arg(short, long)]
    key: String,

    /// Reference color for the distance key, as hex.
    #[arg(long, default_value = "#808080")]
    reference: String,

    /// Seed for the random key.
    #[arg(long, default_value_t = 0)]
    seed: u32,

    /// Sort descending instead of ascending.
    #[arg(long)]
    reverse: bool,

    /// Let the first and last colors move with the sort.
    #[arg(long)]
    free_endpoints: bool,

    /// Reordering strength, 0-100.
    #[arg(long, default_value_t = 100.0)]
    strength: f32,

    /// Output file (.map or .ugr). Prints MAP text to stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// UGR category attribute.
    #[arg(long, default_value = "Custom")]
    category: String,
}

#[derive(Debug, Args)]
struct PresetArgs {
    /// Preset name. Lists all presets when omitted.
    name: Option<String>,

    /// Output file (.map or .ugr). Prints MAP text to stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// UGR category attribute.
    #[arg(long, default_value = "Custom")]
    category: String,
}

#[derive(Debug, Args)]
struct ConvertArgs {
    /// Input gradient file (.map or .ugr).
    input: PathBuf,

    /// Output gradient file (.map or .ugr).
    output: PathBuf,

    /// UGR category attribute.
    #[arg(long, default_value = "Custom")]
    category: String,
}

#[derive(Debug, Args)]
struct InfoArgs {
    /// Gradient file (.map or .ugr) or preset name.
    input: String,
}

#[derive(Debug, Args)]
struct RecipeArgs {
    /// Recipe JSON file.
    recipe: PathBuf,
}

// ─── Recipe file ─────────────────────────────────────────────────────────────

/// A reproducible blend-then-distribute pipeline.
#[derive(Debug, Deserialize)]
struct Recipe {
    strategy: String,
    #[serde(default)]
    params: BTreeMap<String, f32>,
    inputs: Vec<RecipeInput>,
    #[serde(default)]
    distribute: Option<RecipeDistribute>,
    output: PathBuf,
    #[serde(default = "default_category")]
    category: String,
}

#[derive(Debug, Deserialize)]
struct RecipeInput {
    source: String,
    #[serde(default = "default_weight")]
    weight: f32,
}

#[derive(Debug, Deserialize)]
struct RecipeDistribute {
    key: String,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    seed: u32,
    #[serde(default)]
    reverse: bool,
    #[serde(default)]
    free_endpoints: bool,
    #[serde(default = "default_strength")]
    strength: f32,
}

fn default_category() -> String {
    "Custom".to_string()
}

const fn default_weight() -> f32 {
    1.0
}

const fn default_strength() -> f32 {
    100.0
}

// ─── Entry point ─────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(err) = run(cli.command) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: CliCommand) -> Result<(), Box<dyn Error>> {
    match command {
        CliCommand::Blend(args) => run_blend(&args),
        CliCommand::Distribute(args) => run_distribute(&args),
        CliCommand::Preset(args) => run_preset(&args),
        CliCommand::Convert(args) => run_convert(&args),
        CliCommand::Info(args) => run_info(&args),
        CliCommand::Recipe(args) => run_recipe(&args.recipe),
    }
}

// ─── Subcommands ─────────────────────────────────────────────────────────────

fn run_blend(args: &BlendArgs) -> Result<(), Box<dyn Error>> {
    let kind = BlendKind::from_name(&args.strategy).ok_or_else(|| {
        format!(
            "unknown strategy {:?} (expected one of: {})",
            args.strategy,
            BlendKind::all()
                .iter()
                .map(|k| k.name())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;

    let mut blender = Blender::new(kind);
    for pair in &args.params {
        let (key, value) = parse_param(pair)?;
        if !blender.set(key, value) {
            return Err(format!("strategy {} has no parameter {key:?}", kind.name()).into());
        }
    }

    let gradients: Vec<Gradient> = args
        .input
        .iter()
        .map(|source| load_source(source))
        .collect::<Result<_, _>>()?;
    let inputs: Vec<(&Gradient, f32)> = gradients
        .iter()
        .enumerate()
        .map(|(i, g)| (g, args.weight.get(i).copied().unwrap_or(1.0)))
        .collect();

    let result = blender.blend(&inputs);
    info!(
        strategy = kind.name(),
        inputs = inputs.len(),
        stops = result.len(),
        "blended"
    );
    emit(&result, args.output.as_deref(), &args.category)
}

fn run_distribute(args: &DistributeArgs) -> Result<(), Box<dyn Error>> {
    let mut key = OrderingKey::from_name(&args.key).ok_or_else(|| {
        format!(
            "unknown ordering key {:?} (expected one of: {})",
            args.key,
            OrderingKey::all_names().join(", ")
        )
    })?;
    match &mut key {
        OrderingKey::Distance(reference) => {
            *reference = parse_hex(&args.reference)?;
        }
        OrderingKey::Random { seed } => *seed = args.seed,
        _ => {}
    }

    let gradient = load_source(&args.input)?;
    let stops = distribute_with_strength(
        gradient.stops(),
        key,
        args.reverse,
        !args.free_endpoints,
        args.strength,
    );
    let mut result = Gradient::from_stops(gradient.name().to_string(), stops);
    result.sort_stops();
    info!(key = key.name(), stops = result.len(), "distributed");
    emit(&result, args.output.as_deref(), &args.category)
}

fn run_preset(args: &PresetArgs) -> Result<(), Box<dyn Error>> {
    let Some(name) = &args.name else {
        for name in preset_names() {
            println!("{name}");
        }
        return Ok(());
    };
    let gradient = preset(name).ok_or_else(|| format!("unknown preset {name:?}"))?;
    emit(&gradient, args.output.as_deref(), &args.category)
}

fn run_convert(args: &ConvertArgs) -> Result<(), Box<dyn Error>> {
    let gradient = load_file(&args.input)?;
    emit(&gradient, Some(&args.output), &args.category)
}

fn run_info(args: &InfoArgs) -> Result<(), Box<dyn Error>> {
    let gradient = load_source(&args.input)?;
    let mut out = String::new();
    writeln!(out, "name:  {}", gradient.name())?;
    writeln!(out, "stops: {}", gradient.len())?;
    for stop in gradient.sorted().stops() {
        writeln!(
            out,
            "  {:>7.4}  {}  {}",
            stop.position,
            stop.color.to_hex(),
            stop.color
        )?;
    }
    print!("{out}");
    Ok(())
}

fn run_recipe(path: &Path) -> Result<(), Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    let recipe: Recipe = serde_json::from_str(&text)?;
    debug!(strategy = %recipe.strategy, inputs = recipe.inputs.len(), "running recipe");

    let kind = BlendKind::from_name(&recipe.strategy)
        .ok_or_else(|| format!("unknown strategy {:?}", recipe.strategy))?;
    let mut blender = Blender::new(kind);
    for (key, value) in &recipe.params {
        if !blender.set(key, *value) {
            return Err(format!("strategy {} has no parameter {key:?}", kind.name()).into());
        }
    }

    let gradients: Vec<Gradient> = recipe
        .inputs
        .iter()
        .map(|input| load_source(&input.source))
        .collect::<Result<_, _>>()?;
    let inputs: Vec<(&Gradient, f32)> = gradients
        .iter()
        .zip(&recipe.inputs)
        .map(|(g, input)| (g, input.weight))
        .collect();
    let mut result = blender.blend(&inputs);

    if let Some(dist) = &recipe.distribute {
        let mut key = OrderingKey::from_name(&dist.key)
            .ok_or_else(|| format!("unknown ordering key {:?}", dist.key))?;
        match &mut key {
            OrderingKey::Distance(reference) => {
                if let Some(hex) = &dist.reference {
                    *reference = parse_hex(hex)?;
                }
            }
            OrderingKey::Random { seed } => *seed = dist.seed,
            _ => {}
        }
        let stops = distribute_with_strength(
            result.stops(),
            key,
            dist.reverse,
            !dist.free_endpoints,
            dist.strength,
        );
        let name = result.name().to_string();
        result = Gradient::from_stops(name, stops);
        result.sort_stops();
    }

    emit(&result, Some(&recipe.output), &recipe.category)
}

// ─── Shared plumbing ─────────────────────────────────────────────────────────

/// Load a gradient from a file path or a preset name.
fn load_source(source: &str) -> Result<Gradient, Box<dyn Error>> {
    if let Some(gradient) = preset(source) {
        return Ok(gradient);
    }
    let path = Path::new(source);
    if path.exists() {
        return load_file(path);
    }
    Err(format!(
        "no such input {source:?} (expected a .map/.ugr file or one of: {})",
        preset_names().join(", ")
    )
    .into())
}

/// Load a gradient file by extension. UGR files yield their first gradient.
fn load_file(path: &Path) -> Result<Gradient, Box<dyn Error>> {
    match extension(path) {
        Ext::Map => Ok(load_map(path)?),
        Ext::Ugr => {
            let mut gradients = load_ugr(path)?;
            // Empty is impossible: the parser errors on zero gradients.
            Ok(gradients.remove(0))
        }
    }
}

/// Write a gradient by extension, or dump MAP text to stdout.
fn emit(gradient: &Gradient, output: Option<&Path>, category: &str) -> Result<(), Box<dyn Error>> {
    let Some(path) = output else {
        print!("{}", write_map(gradient));
        return Ok(());
    };
    match extension(path) {
        Ext::Map => save_map(gradient, path)?,
        Ext::Ugr => save_ugr(&[gradient], category, path)?,
    }
    info!(path = %path.display(), "wrote gradient");
    Ok(())
}

enum Ext {
    Map,
    Ugr,
}

/// Pick a format from the file extension; anything that isn't `.ugr` is
/// treated as MAP.
fn extension(path: &Path) -> Ext {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase());
    match ext.as_deref() {
        Some("ugr") => Ext::Ugr,
        _ => Ext::Map,
    }
}

fn parse_param(pair: &str) -> Result<(&str, f32), Box<dyn Error>> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {pair:?}"))?;
    let value: f32 = value
        .parse()
        .map_err(|_| format!("parameter {key:?} has a non-numeric value {value:?}"))?;
    Ok((key, value))
}

fn parse_hex(hex: &str) -> Result<Rgb, Box<dyn Error>> {
    Rgb::hex(hex).ok_or_else(|| format!("invalid hex color {hex:?}").into())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
