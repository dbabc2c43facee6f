pub mod execute;
pub mod init;
pub mod problem;
pub mod problems;
pub mod submissions;

use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct GlobalArgs {
    #[command(subcommand)]
    pub subcmd: Subcommand,

    /// Config file (default: nearest pjudge.toml in the current dir or its ancestors)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    Init(init::Args),
    Problems(problems::Args),
    Problem(problem::Args),

    #[command(alias("x"))]
    Execute(execute::Args),

    #[command(alias("s"))]
    Submissions(submissions::Args),
}

pub type SubcmdResult = anyhow::Result<()>;

impl GlobalArgs {
    pub async fn exec_subcmd(&self) -> SubcmdResult {
        use Subcommand::*;
        match &self.subcmd {
            Init(args) => init::exec(args, self),
            Problems(args) => problems::exec(args, self),
            Problem(args) => problem::exec(args, self),
            Execute(args) => execute::exec(args, self).await,
            Submissions(args) => submissions::exec(args, self).await,
        }
    }
}
