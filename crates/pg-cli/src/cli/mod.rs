use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};
use pg_core::HookKind;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::{Commands, HookArgs};

/// Top-level CLI parser for the `patchgate` binary.
#[derive(Debug, Parser)]
#[command(
    name = "patchgate",
    version,
    about = "Gerrit hooks that gate patches on Bugzilla and keep bug status in sync"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Extra configuration file, layered above the repository's.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Repository the hook runs for.
    #[arg(long, global = true, env = "GIT_DIR")]
    pub git_dir: Option<PathBuf>,

    /// Output format: review, json, raw
    #[arg(short, long, global = true, default_value = "review")]
    pub format: OutputFormat,

    /// Post the report back to the patch set with `gerrit review`.
    #[arg(long, global = true)]
    pub post_review: bool,

    /// Replace the hook's default message header.
    #[arg(long, global = true)]
    pub header: Option<String>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Append logs to this file instead of stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Parse `args`, taking the subcommand from the binary name when it is
    /// installed as `<event>.<hook>` (e.g. `patchset-created.bz.set_post`).
    /// Options this binary does not know are dropped first, since Gerrit
    /// passes per-label and per-release options freely.
    #[must_use]
    pub fn parse_multicall<I>(args: I) -> Self
    where
        I: IntoIterator<Item = OsString>,
    {
        Self::parse_from(drop_unknown_flags(multicall_args(
            args.into_iter().collect(),
        )))
    }

    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            config: self.config.clone(),
            git_dir: self.git_dir.clone(),
            format: self.format,
            post_review: self.post_review,
            header: self.header.clone(),
        }
    }
}

/// The hook named by the suffix of `argv0`'s file name, if any.
fn multicall_hook(argv0: &Path) -> Option<HookKind> {
    let name = argv0.file_name()?.to_str()?;
    let (_, suffix) = name.rsplit_once('.')?;
    suffix.parse().ok()
}

/// Insert the subcommand implied by the binary name after `argv[0]`.
fn multicall_args(mut args: Vec<OsString>) -> Vec<OsString> {
    let hook = args
        .first()
        .and_then(|argv0| multicall_hook(Path::new(argv0)));
    if let Some(hook) = hook {
        args.insert(1, hook.as_str().replace('_', "-").into());
    }
    args
}

/// Long option names and subcommand names the parser accepts. Each option
/// maps to whether it takes a value.
struct KnownArgs {
    options: HashMap<String, bool>,
    subcommands: Vec<String>,
}

impl KnownArgs {
    fn collect() -> Self {
        let mut command = Cli::command();
        command.build();

        let mut options = HashMap::new();
        for cmd in std::iter::once(&command).chain(command.get_subcommands()) {
            for arg in cmd.get_arguments() {
                let takes_value = arg.get_action().takes_values();
                let aliases = arg.get_all_aliases().unwrap_or_default();
                for name in arg.get_long().into_iter().chain(aliases) {
                    options.insert(name.to_string(), takes_value);
                }
            }
        }
        let subcommands = command
            .get_subcommands()
            .map(|cmd| cmd.get_name().to_string())
            .collect();
        Self {
            options,
            subcommands,
        }
    }

    fn is_subcommand(&self, arg: &OsStr) -> bool {
        arg.to_str()
            .is_some_and(|name| self.subcommands.iter().any(|known| known == name))
    }
}

/// Split `--name` or `--name=value` into the name and whether the value is
/// inline.
fn long_option(arg: &OsStr) -> Option<(&str, bool)> {
    let option = arg.to_str()?.strip_prefix("--")?;
    Some(match option.split_once('=') {
        Some((name, _)) => (name, true),
        None => (option, false),
    })
}

/// Remove long options the parser does not know, along with their value.
/// A token after an unknown option counts as its value unless it is itself
/// a long option or a subcommand name. Everything after `--` is kept.
fn drop_unknown_flags(args: Vec<OsString>) -> Vec<OsString> {
    let known = KnownArgs::collect();
    let mut kept = Vec::with_capacity(args.len());
    let mut args = args.into_iter().peekable();
    kept.extend(args.next());

    while let Some(arg) = args.next() {
        if arg == "--" {
            kept.push(arg);
            kept.extend(args);
            break;
        }
        let option = long_option(&arg)
            .map(|(name, inline)| (known.options.get(name).copied(), inline));
        match option {
            None => kept.push(arg),
            Some((Some(takes_value), inline)) => {
                kept.push(arg);
                if takes_value && !inline {
                    kept.extend(args.next());
                }
            }
            Some((None, inline)) => {
                if !inline {
                    args.next_if(|next| long_option(next).is_none() && !known.is_subcommand(next));
                }
            }
        }
    }
    kept
}
