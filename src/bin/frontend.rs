//! Command-line front end: parses flags, configures logging and streams the
//! matching paths to standard output.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use enumeration::{
    EnumerationError, EnumerationOptions, FileAttributes, MatchType, SearchTarget, factory,
};
use logging::LogConfig;

const PROGRAM_NAME: &str = "fsenum";

/// Exit status for enumeration failures.
const EXIT_FAILURE: u8 = 1;
/// Exit status for command-line usage errors.
const EXIT_USAGE: u8 = 2;

fn command() -> Command {
    Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("List directory entries matching a wildcard pattern.")
        .arg(
            Arg::new("directory")
                .value_name("DIR")
                .help("Directory to enumerate.")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("pattern")
                .value_name("PATTERN")
                .help("Name pattern; may carry a relative directory prefix.")
                .default_value("*"),
        )
        .arg(
            Arg::new("recurse")
                .short('r')
                .long("recurse")
                .help("Descend into subdirectories.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ignore-inaccessible")
                .long("ignore-inaccessible")
                .help("Skip directories that cannot be opened for lack of permission.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("type")
                .long("type")
                .value_name("KIND")
                .help("Entries to list: f (files), d (directories) or all.")
                .value_parser(["f", "d", "all"])
                .default_value("all"),
        )
        .arg(
            Arg::new("match")
                .long("match")
                .value_name("DIALECT")
                .help("Wildcard dialect: simple (* and ?) or dos (legacy 8.3 rules).")
                .value_parser(["simple", "dos"])
                .default_value("simple"),
        )
        .arg(
            Arg::new("case-sensitive")
                .long("case-sensitive")
                .help("Compare names case-sensitively (simple dialect only).")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("buffer-size")
                .long("buffer-size")
                .value_name("BYTES")
                .help("Listing buffer size hint; 0 selects the default.")
                .value_parser(clap::value_parser!(usize))
                .default_value("0"),
        )
        .arg(
            Arg::new("skip-hidden")
                .long("skip-hidden")
                .help("Neither list nor descend into dot-files.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("null")
                .short('0')
                .long("null")
                .help("Terminate each path with NUL instead of newline.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase diagnostic output; repeat for more.")
                .action(ArgAction::Count),
        )
}

/// Failure of a listing run, kept typed until it is rendered.
#[derive(Debug, thiserror::Error)]
enum ListError {
    #[error(transparent)]
    Enumeration(#[from] EnumerationError),
    #[error("writing output failed: {0}")]
    Output(#[source] io::Error),
}

/// Settings derived from the parsed command line.
#[derive(Debug)]
struct Invocation {
    directory: PathBuf,
    pattern: String,
    target: SearchTarget,
    options: EnumerationOptions,
    terminator: u8,
    log: LogConfig,
}

impl Invocation {
    fn from_matches(matches: &ArgMatches) -> Self {
        let directory = matches
            .get_one::<PathBuf>("directory")
            .cloned()
            .unwrap_or_default();
        let pattern = matches
            .get_one::<String>("pattern")
            .cloned()
            .unwrap_or_else(|| "*".to_owned());
        let target = match matches.get_one::<String>("type").map(String::as_str) {
            Some("f") => SearchTarget::Files,
            Some("d") => SearchTarget::Directories,
            _ => SearchTarget::Both,
        };
        let match_type = match matches.get_one::<String>("match").map(String::as_str) {
            Some("dos") => MatchType::Dos,
            _ => MatchType::Simple,
        };
        let skip = if matches.get_flag("skip-hidden") {
            FileAttributes::HIDDEN
        } else {
            FileAttributes::empty()
        };

        let options = EnumerationOptions::new()
            .with_recurse(matches.get_flag("recurse"))
            .with_ignore_inaccessible(matches.get_flag("ignore-inaccessible"))
            .with_buffer_size_hint(matches.get_one::<usize>("buffer-size").copied().unwrap_or(0))
            .with_attributes_to_skip(skip)
            .with_match_type(match_type)
            .with_case_sensitive(matches.get_flag("case-sensitive"));

        Self {
            directory,
            pattern,
            target,
            options,
            terminator: if matches.get_flag("null") { b'\0' } else { b'\n' },
            log: LogConfig::from_verbose_level(matches.get_count("verbose")),
        }
    }
}

/// Parses `args`, runs the enumeration and maps the outcome to an exit code.
pub fn run_with<I, Out, Err>(args: I, stdout: &mut Out, stderr: &mut Err) -> ExitCode
where
    I: IntoIterator,
    I::Item: Into<OsString> + Clone,
    Out: Write,
    Err: Write,
{
    let matches = match command().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(error) => {
            let rendered = error.render();
            let written = if error.use_stderr() {
                write!(stderr, "{rendered}")
            } else {
                write!(stdout, "{rendered}")
            };
            if written.is_err() || error.use_stderr() {
                return ExitCode::from(EXIT_USAGE);
            }
            return ExitCode::SUCCESS;
        }
    };

    let invocation = Invocation::from_matches(&matches);
    logging::init_tracing(&invocation.log);
    tracing::debug!(?invocation, "starting enumeration");

    match list(&invocation, stdout) {
        Ok(count) => {
            tracing::info!(count, "enumeration complete");
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::debug!(?error, "enumeration failed");
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn list<Out: Write>(invocation: &Invocation, stdout: &mut Out) -> Result<usize, ListError> {
    let enumerable = factory::enumerate(
        &invocation.directory,
        &invocation.pattern,
        invocation.target,
        invocation.options,
    )?;

    let mut count = 0;
    for item in enumerable.enumerator()? {
        let path = item?;
        match write_path(stdout, &path, invocation.terminator) {
            Ok(()) => count += 1,
            Err(error) if error.kind() == io::ErrorKind::BrokenPipe => break,
            Err(error) => return Err(ListError::Output(error)),
        }
    }
    stdout.flush().map_err(ListError::Output)?;
    Ok(count)
}

#[cfg(unix)]
fn write_path<Out: Write>(out: &mut Out, path: &Path, terminator: u8) -> io::Result<()> {
    use std::os::unix::ffi::OsStrExt;

    out.write_all(path.as_os_str().as_bytes())?;
    out.write_all(&[terminator])
}

#[cfg(not(unix))]
fn write_path<Out: Write>(out: &mut Out, path: &Path, terminator: u8) -> io::Result<()> {
    out.write_all(path.to_string_lossy().as_bytes())?;
    out.write_all(&[terminator])
}
