//! timbercam — adaptive clearing toolpaths for timber joints.
//!
//! Generates the motion program for a mortise (or tenon) cut from stock,
//! prints it as JSON motion records, and optionally persists the solve
//! state so unchanged reruns skip the 2D solve.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use timbercam_adaptive::{
    AdaptiveOperation, CancelToken, CutSide, DepthParams, Frame, OperationKind, SolveCache,
};
use timbercam_math::{Point3, Vec3};
use timbercam_outline::{mortise_slot, stock_rectangle};
use timbercam_solver::RingSolver;

#[derive(Parser)]
#[command(
    name = "timbercam",
    about = "Adaptive clearing toolpaths for timber joints",
    version
)]
struct Cli {
    /// Log engine progress to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the clearing program for a mortise slot
    Mortise(MortiseArgs),
}

#[derive(Args)]
struct MortiseArgs {
    /// Slot length over the end caps, mm
    #[arg(long, default_value_t = 70.0)]
    length: f64,

    /// Slot width, mm
    #[arg(long, default_value_t = 30.0)]
    width: f64,

    /// Stock face length, mm
    #[arg(long, default_value_t = 102.0)]
    stock_length: f64,

    /// Stock face width, mm
    #[arg(long, default_value_t = 102.0)]
    stock_width: f64,

    /// Tool diameter, mm
    #[arg(long, default_value_t = 12.0)]
    tool: f64,

    /// Stepover as a percentage of the tool diameter
    #[arg(long, default_value_t = 20.0)]
    stepover: f64,

    /// Mortise depth below the face, mm (positive)
    #[arg(long, default_value_t = 60.0)]
    depth: f64,

    /// Maximum material per rough pass, mm
    #[arg(long, default_value_t = 10.0)]
    step_down: f64,

    /// Material removed by the finishing pass, mm
    #[arg(long, default_value_t = 0.0)]
    finish_step: f64,

    /// Clearance height for rapids, mm
    #[arg(long, default_value_t = 80.0)]
    clearance: f64,

    /// Safe height where plunging starts, mm
    #[arg(long, default_value_t = 75.0)]
    safe: f64,

    /// Cut outside the contour (tenon cheeks) instead of inside
    #[arg(long)]
    outside: bool,

    /// Profile the contour instead of clearing the area
    #[arg(long)]
    profile: bool,

    /// Feature position in the assembly, as x,y,z
    #[arg(long, value_delimiter = ',', num_args = 3, allow_hyphen_values = true)]
    position: Option<Vec<f64>>,

    /// Feature face normal, as x,y,z
    #[arg(long, value_delimiter = ',', num_args = 3, allow_hyphen_values = true)]
    normal: Option<Vec<f64>>,

    /// Feature direction (slot long axis), as x,y,z
    #[arg(long, value_delimiter = ',', num_args = 3, allow_hyphen_values = true)]
    direction: Option<Vec<f64>>,

    /// Solve-state file for cache reuse across runs
    #[arg(long)]
    state: Option<PathBuf>,

    /// Write the program here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON records
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }
    match cli.command {
        Command::Mortise(args) => run_mortise(args),
    }
}

fn run_mortise(args: MortiseArgs) -> Result<()> {
    if args.depth <= 0.0 {
        bail!("depth must be positive");
    }
    if args.length < args.width {
        bail!("slot length must be at least its width");
    }

    let mut op = AdaptiveOperation {
        operation: if args.profile {
            OperationKind::Profiling
        } else {
            OperationKind::Clearing
        },
        side: if args.outside {
            CutSide::Outside
        } else {
            CutSide::Inside
        },
        tool_diameter: args.tool,
        stepover_percent: args.stepover,
        depths: DepthParams {
            clearance_height: args.clearance,
            safe_height: args.safe,
            start_depth: 0.0,
            step_down: args.step_down,
            finish_step: args.finish_step,
            final_depth: -args.depth,
        },
        frame: frame_from_args(&args),
        ..AdaptiveOperation::default()
    };

    if let Some(path) = &args.state {
        if path.exists() {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading solve state {}", path.display()))?;
            op.cache = SolveCache::from_json(&json)
                .with_context(|| format!("parsing solve state {}", path.display()))?;
        }
    }

    let base = mortise_slot(args.length, args.width);
    let stock = stock_rectangle(args.stock_length, args.stock_width);
    let program = op.execute(&base, &stock, &RingSolver::new(), &CancelToken::new())?;

    if let Some(path) = &args.state {
        let json = op.cache.to_json().context("serializing solve state")?;
        fs::write(path, json)
            .with_context(|| format!("writing solve state {}", path.display()))?;
    }

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&program)?
    } else {
        serde_json::to_string(&program)?
    };
    match &args.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("writing program {}", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}

fn frame_from_args(args: &MortiseArgs) -> Frame {
    let mut frame = Frame::canonical();
    if let Some(p) = &args.position {
        frame.position = Point3::new(p[0], p[1], p[2]);
    }
    if let Some(n) = &args.normal {
        frame.normal = Vec3::new(n[0], n[1], n[2]);
    }
    if let Some(d) = &args.direction {
        frame.direction = Vec3::new(d[0], d[1], d[2]);
    }
    frame
}
