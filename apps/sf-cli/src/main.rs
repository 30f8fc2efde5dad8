use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use sf_app::{
    AppError, AppResult, ComparisonRequest, FrontEndRequest, ProgressEvent, SelectionMode, Stage,
    SweepOptions, load_project, run_comparison, run_sweep,
};
use sf_results::SortOrder;
use sf_results::csv::{chart_csv, report_csv};
use tracing::Level;

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(about = "SignalFlow CLI - signaling network ODE simulation", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Unperturbed parameters
    Reg,
    /// Knock down the target node
    Kd,
    /// Knock down the target node under high stimulus
    Kdhigh,
    /// High stimulus only
    High,
}

impl From<Mode> for SelectionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Reg => SelectionMode::Regular,
            Mode::Kd => SelectionMode::Knockdown,
            Mode::Kdhigh => SelectionMode::KnockdownStimulus,
            Mode::High => SelectionMode::Stimulus,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    Asc,
    Desc,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project file (.yaml or .json)
        project_path: PathBuf,
    },
    /// List nodes and reactions of a project's network
    Nodes {
        /// Path to the project file (.yaml or .json)
        project_path: PathBuf,
    },
    /// Simulate one scenario and export the trajectory
    Simulate {
        /// Path to the project file (.yaml or .json)
        project_path: PathBuf,
        #[arg(long, value_enum, default_value = "reg")]
        mode: Mode,
        /// Node to knock down (kd, kdhigh)
        #[arg(long)]
        target: Option<String>,
        /// Knockdown fraction in [0, 1] (defaults to the project setting)
        #[arg(long)]
        fraction: Option<f64>,
        /// Simulated time (defaults to the project horizon)
        #[arg(long)]
        horizon: Option<f64>,
        /// Node to chart; repeat up to five times
        #[arg(long = "highlight")]
        highlights: Vec<String>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the chart description as JSON
        #[arg(long)]
        chart_json: Option<PathBuf>,
    },
    /// Compare a knockdown against control, at baseline and under high stimulus
    Compare {
        /// Path to the project file (.yaml or .json)
        project_path: PathBuf,
        /// Node to knock down
        target: String,
        /// Snapshot time (defaults to the project time point)
        #[arg(long)]
        time: Option<f64>,
        #[arg(long, value_enum, default_value = "asc")]
        order: Order,
        /// Output CSV file path for the baseline report (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write both bar charts as JSON
        #[arg(long)]
        chart_json: Option<PathBuf>,
        /// Also export all-node trajectories of the four scenarios into this directory
        #[arg(long, value_name = "DIR")]
        extra: Option<PathBuf>,
    },
    /// Run one snapshot per parameter row
    Sweep {
        /// Path to the project file (.yaml or .json)
        project_path: PathBuf,
        /// Parameter rows (.yaml or .json list with TAU, Y Max, Y Init, W, N, EC50)
        rows_path: PathBuf,
        /// Snapshot time; also the horizon (defaults to the project time point)
        #[arg(long)]
        time: Option<f64>,
        /// Run rows in parallel
        #[arg(long)]
        parallel: bool,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Nodes { project_path } => cmd_nodes(&project_path),
        Commands::Simulate {
            project_path,
            mode,
            target,
            fraction,
            horizon,
            highlights,
            output,
            chart_json,
        } => cmd_simulate(
            &project_path,
            FrontEndRequest {
                mode: mode.into(),
                target,
                knockdown_fraction: fraction,
                horizon,
                highlights,
            },
            output.as_deref(),
            chart_json.as_deref(),
        ),
        Commands::Compare {
            project_path,
            target,
            time,
            order,
            output,
            chart_json,
            extra,
        } => cmd_compare(
            &project_path,
            &target,
            time,
            order,
            output.as_deref(),
            chart_json.as_deref(),
            extra.as_deref(),
        ),
        Commands::Sweep {
            project_path,
            rows_path,
            time,
            parallel,
            output,
        } => cmd_sweep(&project_path, &rows_path, time, parallel, output.as_deref()),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    let (project, model) = load_project(project_path)?;
    println!(
        "✓ Project '{}' is valid ({} nodes, {} reactions)",
        project.name,
        model.node_count(),
        model.reaction_count()
    );
    Ok(())
}

fn cmd_nodes(project_path: &Path) -> AppResult<()> {
    let (project, model) = load_project(project_path)?;
    println!("Nodes:");
    for (i, name) in model.names().enumerate() {
        println!(
            "  {:<16} tau={:<8} ymax={:<8} y0={}",
            name,
            model.tau()[i],
            model.ymax()[i],
            model.y0()[i]
        );
    }
    println!("Reactions:");
    for (reaction, def) in model.reactions().iter().zip(&project.network.reactions) {
        let r = reaction.id.pos();
        println!(
            "  {:<32} w={:<8} n={:<8} ec50={}",
            def.rule,
            model.w()[r],
            model.n()[r],
            model.ec50()[r]
        );
    }
    Ok(())
}

fn render_cli_progress(event: &ProgressEvent, started: Instant) {
    if event.stage != Stage::Integrating {
        return;
    }
    if let Some(p) = &event.integration {
        let width = 28usize;
        let filled = ((p.fraction_complete * width as f64).round() as usize).min(width);
        let bar = format!(
            "{}{}",
            "#".repeat(filled),
            "-".repeat(width.saturating_sub(filled))
        );
        eprint!(
            "\r[{}] {:>6.2}%  {}  t={:.3}/{:.3}  steps={}  elapsed={:.1}s",
            bar,
            p.fraction_complete * 100.0,
            event.scenario,
            p.t,
            p.t_end,
            p.accepted_steps,
            started.elapsed().as_secs_f64()
        );
        let _ = io::stderr().flush();
    }
}

fn write_or_print(output: Option<&Path>, content: &str, what: &str) -> AppResult<()> {
    if let Some(path) = output {
        std::fs::write(path, content)?;
        println!("✓ Exported {} to {}", what, path.display());
    } else {
        print!("{}", content);
    }
    Ok(())
}

fn write_json(path: &Path, value: &impl serde::Serialize) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Results(format!("Failed to serialize chart: {}", e)))?;
    std::fs::write(path, json)?;
    println!("✓ Wrote chart description to {}", path.display());
    Ok(())
}

fn cmd_simulate(
    project_path: &Path,
    request: FrontEndRequest,
    output: Option<&Path>,
    chart_json: Option<&Path>,
) -> AppResult<()> {
    let (project, model) = load_project(project_path)?;
    let started = Instant::now();
    let mut on_progress = |event: ProgressEvent| render_cli_progress(&event, started);
    let response = sf_app::handle_request(
        &model,
        &project.scenario,
        &request,
        None,
        Some(&mut on_progress),
    )?;
    eprintln!();

    if !response.highlights.unknown.is_empty() {
        eprintln!(
            "Unfortunately, these nodes do not exist and were not charted: {}",
            response.highlights.unknown.join(", ")
        );
    }
    if !response.highlights.dropped.is_empty() {
        eprintln!(
            "At most {} nodes can be highlighted; ignored: {}",
            sf_app::MAX_HIGHLIGHTS,
            response.highlights.dropped.join(", ")
        );
    }

    let chart = &response.chart;
    println!("# {} (legend: {})", chart.title, chart.legend.join(", "));
    write_or_print(output, &chart_csv(chart), "trajectory")?;

    if let Some(path) = chart_json {
        write_json(path, chart)?;
    }
    Ok(())
}

fn cmd_compare(
    project_path: &Path,
    target: &str,
    time: Option<f64>,
    order: Order,
    output: Option<&Path>,
    chart_json: Option<&Path>,
    extra: Option<&Path>,
) -> AppResult<()> {
    let (project, model) = load_project(project_path)?;
    let time_point = time.unwrap_or(project.scenario.snapshot_time());
    let request = ComparisonRequest {
        target,
        horizon: time_point.max(project.scenario.horizon),
        time_point,
        order: match order {
            Order::Asc => SortOrder::Ascending,
            Order::Desc => SortOrder::Descending,
        },
        extra_charts: extra.is_some(),
    };
    let started = Instant::now();
    let comparison = run_comparison(&model, &project.scenario, &request, None, None)?;
    println!(
        "✓ Compared knockdown of {} at t={} in {:.2}s",
        target,
        time_point,
        started.elapsed().as_secs_f64()
    );

    println!("# {}", comparison.baseline.title);
    write_or_print(output, &report_csv(&comparison.baseline.report), "baseline report")?;
    if output.is_none() {
        println!("# {}", comparison.high_stimulus.title);
        print!("{}", report_csv(&comparison.high_stimulus.report));
    }

    if let Some(path) = chart_json {
        write_json(path, &[&comparison.baseline, &comparison.high_stimulus])?;
    }

    if let Some(dir) = extra {
        std::fs::create_dir_all(dir)?;
        let stems = ["regular", "knockdown", "knockdown_stimulus", "stimulus"];
        for (chart, stem) in comparison.extra_charts.iter().zip(stems) {
            println!("# {} (legend: {})", chart.title, chart.legend.join(", "));
            let path = dir.join(format!("{stem}.csv"));
            write_or_print(Some(&path), &chart_csv(chart), &chart.title)?;
        }
        write_json(&dir.join("extra_charts.json"), &comparison.extra_charts)?;
    }
    Ok(())
}

fn cmd_sweep(
    project_path: &Path,
    rows_path: &Path,
    time: Option<f64>,
    parallel: bool,
    output: Option<&Path>,
) -> AppResult<()> {
    let (project, model) = load_project(project_path)?;
    let rows = sf_project::load_parameter_rows(rows_path)?;
    let mut options = SweepOptions::from_config(&project.scenario);
    if let Some(t) = time {
        options.horizon = t;
        options.time_point = t;
    }
    options.parallel = parallel;

    let started = Instant::now();
    let outcome = run_sweep(&model, &rows, &options, None, None)?;
    println!(
        "✓ Sweep: {} rows simulated, {} skipped, {} problems in {:.2}s",
        outcome.rows.len(),
        outcome.skipped.len(),
        outcome.problems.len(),
        started.elapsed().as_secs_f64()
    );
    for problem in &outcome.problems {
        eprintln!("  row {}: {:?}", problem.source_index, problem.kind);
    }

    let table = outcome.to_table(&model)?;
    match output {
        Some(path) => {
            table.write_csv(path)?;
            println!("✓ Exported sweep results to {}", path.display());
        }
        None => print!("{}", table.to_csv()),
    }
    Ok(())
}
