use std::io;

use pjudge_core::{catalog::ProblemCatalog, style};

use crate::util;

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg()] // positional argument
    pub problem_id: String,

    #[arg(short, long)]
    pub json: bool,
}

pub fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = util::load_config(global_args)?;
    let catalog = util::open_catalog(&cfg)?;
    let problem = catalog.find(&args.problem_id)?;

    if args.json {
        serde_json::to_writer_pretty(io::stdout(), problem)?;
        println!();
        return Ok(());
    }

    style::print_problem_detail(problem);
    Ok(())
}
