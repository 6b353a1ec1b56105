use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "smartassess",
    version,
    about = "SMARTdenovo parameter-sweep benchmarking on SLURM"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate, submit and chain the jobs of one parameter sweep.
    Sweep(SweepArgs),
    /// Merge the QUAST reports of a sweep into one summary table.
    Aggregate(AggregateArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SweepArgs {
    /// Sweep configuration file (`key=value[,value]*` lines).
    pub config: PathBuf,

    /// Directory in which the `<prefix><N>` working directory is created.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    #[arg(long, default_value = "sbatch")]
    pub sbatch: String,

    #[arg(long, default_value_t = 1000)]
    pub max_workdir_attempts: u32,
}

#[derive(Args, Debug, Clone)]
pub struct AggregateArgs {
    #[arg(long, default_value = ".")]
    pub work_dir: PathBuf,

    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Emit a placeholder column for jobs whose report is missing instead of failing.
    #[arg(long, default_value_t = false)]
    pub allow_missing: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".")]
    pub work_dir: PathBuf,
}
