use anyhow::{bail, Context as _};
use pjudge_core::Config;

use crate::util;

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {}

pub fn exec(_args: &Args, _global_args: &GlobalArgs) -> SubcmdResult {
    let dir = util::current_dir();
    if let Ok(path) = Config::find_file_in_ancestors(&dir) {
        bail!(
            "Already configured by {:?}.\nIf it's intentional, remove it and then try again.",
            path
        );
    }

    let path = dir.join(Config::FILENAME);
    fsutil::write_with_mkdir(&path, Config::example_toml())
        .context("Failed to write example config")?;
    println!("Created {}", path.to_string_lossy());
    Ok(())
}
