mod os_signal_termination;
mod result;
mod search;

use std::io::Write;
use std::str::FromStr;
use std::time::Duration;
use std::time::Instant;

use clap::Parser;
use log::error;
use log::info;
use log::warn;
use log::LevelFilter;
use os_signal_termination::OsSignal;
use quince_core::constraints;
use quince_core::constraints::Constraint;
use quince_core::convert_case::Case;
use quince_core::options::EngineOptions;
use quince_core::options::IdempotencyMode;
use quince_core::statistics::configure_statistic_logging;
use quince_core::statistics::log_statistic;
use quince_core::statistics::log_statistic_postfix;
use quince_core::statistics::should_log_statistics;
use quince_core::termination::Combinator;
use quince_core::termination::TimeBudget;
use quince_core::variables::DomainId;
use quince_core::State;
use result::SolverError;
use result::SolverResult;
use search::DepthFirstSearch;
use search::SearchOutcome;

#[derive(Debug, Parser)]
#[command(
    help_template = "\
{before-help}{name} {version}
Authors: {author}
About: {about}

{usage-heading}\n{tab}{usage}

{all-args}{after-help}
",
    author,
    version,
    about,
    arg_required_else_help = true
)]
struct Args {
    /// The rectangles to place, each given as `WxH`; for example `3x2` is a rectangle which is 3
    /// wide and 2 high.
    #[clap(verbatim_doc_comment, required = true)]
    rectangles: Vec<Extents>,

    /// The width of the board.
    ///
    /// Possible values: i32
    #[arg(long = "width", verbatim_doc_comment)]
    width: i32,

    /// The height of the board.
    ///
    /// Possible values: i32
    #[arg(long = "height", verbatim_doc_comment)]
    height: i32,

    /// The number of solutions after which the search stops; 0 enumerates every solution.
    ///
    /// Possible values: usize
    #[arg(short = 'n', long = "solutions", default_value_t = 1, verbatim_doc_comment)]
    solutions: usize,

    /// What the engine does once its queues are empty:
    /// - "disabled" stops immediately,
    /// - "error" re-runs each propagator on a copy and logs an error if it would still prune,
    /// - "force" re-runs each propagator from scratch until nothing changes.
    #[arg(long, value_enum, default_value_t, verbatim_doc_comment)]
    idempotency: IdempotencyMode,

    /// The seed handed to the propagators which break ties randomly.
    ///
    /// Possible values: u64
    #[arg(long = "seed", default_value_t = 42, verbatim_doc_comment)]
    random_seed: u64,

    /// The number of seconds the search may run. If not provided, the search runs until it is
    /// done or interrupted.
    ///
    /// Possible values: u64 (Optional)
    #[arg(short = 't', long = "time-limit", verbatim_doc_comment)]
    time_limit: Option<u64>,

    /// Only run the non-overlap propagators once a coordinate is fixed, rather than whenever one
    /// of its bounds changes.
    ///
    /// Possible values: bool
    #[arg(long = "instantiation-only", verbatim_doc_comment)]
    instantiation_only: bool,

    /// Enables log message output from the engine.
    ///
    /// Possible values: bool
    #[arg(short = 'v', long = "verbose", verbatim_doc_comment)]
    verbose: bool,

    /// Enables logging of statistics once the search ends.
    ///
    /// Possible values: bool
    #[arg(short = 's', long = "log-statistics", verbatim_doc_comment)]
    log_statistics: bool,
}

/// The extents of one rectangle, parsed from `WxH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Extents {
    width: i32,
    height: i32,
}

impl FromStr for Extents {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected 'WxH', got '{s}'"))?;

        let parse = |extent: &str| {
            extent
                .trim()
                .parse::<i32>()
                .map_err(|e| format!("invalid extent '{extent}' in '{s}': {e}"))
        };

        Ok(Extents {
            width: parse(width)?,
            height: parse(height)?,
        })
    }
}

fn configure_logging(verbose: bool, log_statistics: bool) -> std::io::Result<()> {
    if log_statistics {
        configure_statistic_logging(
            "%%%mzn-stat:",
            Some("%%%mzn-stat-end"),
            Some(Case::Camel),
            None,
        );
    }
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| {
            write!(buf, "% ")?;

            writeln!(buf, "{}", record.args())
        })
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
    info!("Logging successfully configured");
    Ok(())
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> SolverResult<()> {
    let args = Args::parse();

    configure_logging(args.verbose, args.log_statistics)?;

    if quince_core::asserts::QUINCE_ASSERT_LEVEL_DEFINITION
        >= quince_core::asserts::QUINCE_ASSERT_MODERATE
    {
        warn!(
            "Potential performance degradation: the Quince assert level is set to {}, meaning many debug asserts are active which may result in performance degradation.",
            quince_core::asserts::QUINCE_ASSERT_LEVEL_DEFINITION
        );
    };

    let mut state = State::new(EngineOptions {
        idempotency: args.idempotency,
        random_seed: args.random_seed,
        ..Default::default()
    });
    let (x, y) = build_model(&mut state, &args)?;

    let mut termination = Combinator::new(
        OsSignal::install()?,
        args.time_limit
            .map(|seconds| TimeBudget::starting_now(Duration::from_secs(seconds))),
    );

    let coordinates = x
        .iter()
        .zip(&y)
        .flat_map(|(&x, &y)| [x, y])
        .collect::<Vec<_>>();
    let mut search = DepthFirstSearch::new(coordinates);

    let start = Instant::now();
    let mut num_solutions = 0;
    let mut stdout = std::io::stdout().lock();
    let mut write_result = Ok(());
    let outcome = search.solve(&mut state, &mut termination, |state| {
        num_solutions += 1;
        write_result = print_solution(&mut stdout, state, &x, &y);
        write_result.is_ok() && (args.solutions == 0 || num_solutions < args.solutions)
    });
    write_result?;

    match outcome {
        SearchOutcome::Exhausted if num_solutions == 0 => {
            writeln!(stdout, "=====UNSATISFIABLE=====")?
        }
        SearchOutcome::Exhausted => writeln!(stdout, "==========")?,
        SearchOutcome::SolutionLimitReached => {}
        SearchOutcome::Stopped if num_solutions == 0 => writeln!(stdout, "=====UNKNOWN=====")?,
        SearchOutcome::Stopped => {}
    }
    stdout.flush()?;
    drop(stdout);

    if should_log_statistics() {
        log_statistic("solveTime", start.elapsed().as_secs_f64());
        state.log_statistics();
        search.log_statistics();
        log_statistic_postfix();
    }

    Ok(())
}

/// Creates a coordinate pair for every rectangle, such that it lies within the board, and posts
/// the non-overlap constraint over them.
fn build_model(state: &mut State, args: &Args) -> SolverResult<(Vec<DomainId>, Vec<DomainId>)> {
    let mut x = vec![];
    let mut y = vec![];
    let mut widths = vec![];
    let mut heights = vec![];

    for (index, extents) in args.rectangles.iter().enumerate() {
        if extents.width > args.width || extents.height > args.height {
            return Err(SolverError::InvalidInstance(format!(
                "rectangle {index} ({}x{}) does not fit on a {}x{} board",
                extents.width, extents.height, args.width, args.height
            )));
        }

        let name = |axis: &str| format!("{axis}[{index}]");
        x.push(state.new_interval_variable(
            0,
            args.width - extents.width,
            Some(&name("x")),
        )?);
        y.push(state.new_interval_variable(
            0,
            args.height - extents.height,
            Some(&name("y")),
        )?);
        widths.push(state.new_interval_variable(extents.width, extents.width, None)?);
        heights.push(state.new_interval_variable(extents.height, extents.height, None)?);
    }

    constraints::non_overlap(x.clone(), y.clone(), widths, heights)
        .instantiation_only(args.instantiation_only)
        .post(state)?;

    Ok((x, y))
}

fn print_solution(
    writer: &mut impl Write,
    state: &State,
    x: &[DomainId],
    y: &[DomainId],
) -> std::io::Result<()> {
    let positions = x
        .iter()
        .zip(y)
        .map(|(&x, &y)| format!("({},{})", state.lower_bound(x), state.lower_bound(y)))
        .collect::<Vec<_>>();

    writeln!(writer, "{}", positions.join(" "))?;
    writeln!(writer, "----------")
}
