use std::io;

use colored::Colorize;
use pjudge_core::store::SubmissionStore;

use crate::util;

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg(short = 'n', long, default_value_t = 10)]
    pub limit: usize,

    #[arg(short, long)]
    pub json: bool,
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = util::load_config(global_args)?;
    let store = util::open_store(&cfg);
    let records = store.recent(args.limit).await?;

    if args.json {
        serde_json::to_writer_pretty(io::stdout(), &records)?;
        println!();
        return Ok(());
    }

    if records.is_empty() {
        println!("{}", "No submissions yet.".dimmed());
        return Ok(());
    }
    for r in &records {
        let status = if r.result.success {
            "passed".green()
        } else {
            "failed".bright_red()
        };
        println!(
            "{} {:<20} {:<8} {} {}/{} {}",
            r.submitted_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            r.problem_id.bold(),
            r.language,
            status,
            r.result.total_passed,
            r.result.total_tests,
            r.id.to_string().bright_black(),
        );
    }
    Ok(())
}
