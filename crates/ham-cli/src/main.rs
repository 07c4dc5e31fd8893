//! ham CLI entry point.
//!
//! Usage:
//!   ham                          # Evaluate ./Jamfile
//!   ham -f build.jam all         # Evaluate another file, with targets
//!   ham -c jam                   # Follow Jam 2.5 quirks
//!   ham -s NAME=value            # Preset a global variable
//!   ham -d                       # Print the parsed tree and exit

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

use anyhow::{anyhow, Context, Result};
use ham_kernel::{
    parse, Behavior, Compatibility, EvaluationContext, JumpCondition, StringList, TargetPool,
    VariableDomain,
};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Deep rule recursion needs far more than the main thread's stack.
const EVALUATION_STACK_SIZE: usize = 512 * 1024 * 1024;

fn main() -> ExitCode {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug)]
struct Options {
    compatibility: Compatibility,
    dump: bool,
    jamfile: PathBuf,
    presets: Vec<(String, String)>,
    targets: Vec<String>,
}

fn run() -> Result<ExitCode> {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args)? {
        Some(options) => options,
        None => {
            print_help();
            return Ok(ExitCode::SUCCESS);
        }
    };
    debug!(?options, "starting");

    let source = fs::read_to_string(&options.jamfile)
        .with_context(|| format!("reading {}", options.jamfile.display()))?;

    // The tree shares rule bodies through `Rc`, so it is built on the
    // evaluation thread.
    let handle = thread::Builder::new()
        .name("evaluate".into())
        .stack_size(EVALUATION_STACK_SIZE)
        .spawn(move || execute(&options, &source))
        .context("spawning the evaluation thread")?;
    handle
        .join()
        .map_err(|_| anyhow!("evaluation thread panicked"))?
}

/// `None` means help was requested.
fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut options = Options {
        compatibility: Compatibility::default(),
        dump: false,
        jamfile: PathBuf::from("Jamfile"),
        presets: Vec::new(),
        targets: Vec::new(),
    };

    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "-c" => {
                let mode = args.next().context("-c requires jam, boost or ham")?;
                options.compatibility = mode.parse()?;
            }
            "-d" => options.dump = true,
            "-f" => {
                let path = args.next().context("-f requires a file")?;
                options.jamfile = PathBuf::from(path);
            }
            "-s" => {
                let preset = args.next().context("-s requires NAME=value")?;
                let (name, value) = preset
                    .split_once('=')
                    .with_context(|| format!("-s expects NAME=value, got '{preset}'"))?;
                options.presets.push((name.to_string(), value.to_string()));
            }
            unknown if unknown.starts_with('-') => {
                return Err(anyhow!("unknown option: {unknown} (run 'ham --help')"));
            }
            target => options.targets.push(target.to_string()),
        }
    }
    Ok(Some(options))
}

fn print_help() {
    println!(
        r#"ham v{}

Usage:
  ham [OPTIONS] [TARGET...]

Options:
  -c <mode>                    Compatibility: jam, boost or ham (default: ham)
  -d                           Print the parsed Jamfile and exit
  -f <file>                    Jamfile to evaluate (default: Jamfile)
  -s <NAME=value>              Set a global variable before evaluation
  -h, --help                   Show this help
"#,
        env!("CARGO_PKG_VERSION")
    );
}

/// The environment, as Jam imports it: variables ending in `PATH` are split
/// on the platform's path separator.
fn environment_variables() -> VariableDomain {
    env::vars()
        .map(|(name, value)| {
            let list = if name.ends_with("PATH") {
                env::split_paths(&value)
                    .map(|path| path.to_string_lossy().into_owned())
                    .collect()
            } else {
                StringList::from_element(value)
            };
            (name, list)
        })
        .collect()
}

fn execute(options: &Options, source: &str) -> Result<ExitCode> {
    let program = parse(source)
        .with_context(|| format!("parsing {}", options.jamfile.display()))?;

    if options.dump {
        print!("{}", program.dump_to_string());
        return Ok(ExitCode::SUCCESS);
    }

    let mut globals = environment_variables();
    globals.set(
        "JAMFILE",
        StringList::from_element(options.jamfile.to_string_lossy()),
    );
    let targets: StringList = if options.targets.is_empty() {
        StringList::from_element("all")
    } else {
        options.targets.iter().map(String::as_str).collect()
    };
    globals.set("JAM_TARGETS", targets);
    for (name, value) in &options.presets {
        globals.set(name.as_str(), StringList::from_element(value.as_str()));
    }

    let mut target_pool = TargetPool::new();
    let mut context = EvaluationContext::new(&mut globals, &mut target_pool);
    context.set_behavior(Behavior::new(options.compatibility));

    context
        .evaluate(&program)
        .with_context(|| format!("evaluating {}", options.jamfile.display()))?;

    if context.jump_condition() == JumpCondition::Exit {
        return Ok(ExitCode::FAILURE);
    }
    debug!(targets = context.targets().len(), "evaluation finished");
    Ok(ExitCode::SUCCESS)
}
