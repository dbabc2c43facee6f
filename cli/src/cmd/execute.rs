use std::{io, path::PathBuf};

use anyhow::Context as _;
use pjudge_core::{action, model::Submission, style, testing::Judge};

use crate::util;

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg()] // positional argument
    pub problem_id: String,

    #[arg()] // positional argument
    pub program_file: PathBuf,

    #[arg(short, long, default_value = Submission::EXECUTED_LANGUAGE)]
    pub language: String,

    #[arg(short, long)]
    pub json: bool,
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = util::load_config(global_args)?;
    let catalog = util::open_catalog(&cfg)?;
    let store = util::open_store(&cfg);
    let judge = Judge::new(cfg.runner.build_runner());

    let code = fsutil::read_to_string(&args.program_file)?;
    let submission = Submission {
        problem_id: args.problem_id.clone(),
        code,
        language: args.language.clone(),
    };

    log::info!(
        "Judging {:?} for '{}' with {}",
        args.program_file,
        args.problem_id,
        judge.runner().get_interpreter().to_string_lossy()
    );
    let result = action::execute(&catalog, &store, &judge, submission)
        .await
        .context("Execution failed")?;

    if args.json {
        serde_json::to_writer_pretty(io::stdout(), &result)?;
        println!();
        return Ok(());
    }

    result.test_results.iter().for_each(style::print_testcase_line);
    result
        .test_results
        .iter()
        .filter(|r| !r.passed)
        .for_each(style::print_testcase_detail);
    println!();
    style::print_execution_summary(&result);
    Ok(())
}
