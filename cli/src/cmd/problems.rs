use std::io;

use pjudge_core::{catalog::ProblemCatalog, style};

use crate::util;

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg(short, long)]
    pub json: bool,
}

pub fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = util::load_config(global_args)?;
    let catalog = util::open_catalog(&cfg)?;

    if args.json {
        serde_json::to_writer_pretty(io::stdout(), catalog.problems())?;
        println!();
        return Ok(());
    }

    for p in catalog.problems() {
        style::print_problem_line(p);
    }
    Ok(())
}
