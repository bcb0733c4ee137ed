pub mod hook;

use crate::cli::{Commands, GlobalFlags};

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: &Commands, flags: &GlobalFlags) -> anyhow::Result<()> {
    let (hook, args) = command.hook();
    hook::run(hook, args, flags)
}
