use std::collections::HashSet;
use std::path::Path;

use super::expand::{Combination, combinations};
use super::sweep_config::{AxisKind, SweepConfig};
use crate::error::ConfigError;
use crate::util::shell_quote;

pub const AGGREGATION_SCRIPT_NAME: &str = "resultParser.slurm";
pub const AGGREGATION_LOG_STEM: &str = "quast_results_parsing";

/// smartdenovo's overlap engine when `-e` is not passed; it names the consensus file.
pub const DEFAULT_OVERLAPPER: &str = "dmo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub name: String,
    pub script_file: String,
    pub body: String,
    pub report_dir: String,
}

/// Builds every job of the sweep in generation order.
pub fn build_plan(config: &SweepConfig) -> Result<Vec<JobSpec>, ConfigError> {
    let mut seen = HashSet::new();
    let mut jobs = Vec::with_capacity(config.combination_count()?);

    for combination in combinations(config) {
        let job = build_job_spec(config, &combination);
        if !seen.insert(job.name.clone()) {
            return Err(ConfigError::DuplicateJobName { name: job.name });
        }
        jobs.push(job);
    }

    Ok(jobs)
}

pub fn build_job_spec(config: &SweepConfig, combination: &Combination<'_>) -> JobSpec {
    let name = combination.job_name(&config.prefix);
    let report_dir = format!("{}/result_{}", config.quast_dir, name);
    let toolchain = &config.toolchain;

    let mut body = render_directives(
        config,
        &format!("{name}.%j.out"),
        &format!("{name}.%j.error"),
    );
    body.push('\n');
    body.push_str(&format!(
        "module load {}\n",
        shell_quote(&toolchain.assembler_module)
    ));
    body.push_str(&format!(
        "module load {}\n",
        shell_quote(&toolchain.quast_module)
    ));
    body.push('\n');

    let mut command = format!("smartdenovo.pl -c 1 -p {name}");
    if let Some(overlapper) = combination.overlapper {
        command.push_str(&format!(
            " {} {overlapper}",
            AxisKind::Overlapper.assembler_flag()
        ));
    }
    if let Some(threads) = config.threads {
        command.push_str(&format!(" -t {threads}"));
    }
    for kind in [AxisKind::Kmer, AxisKind::MinReadLength] {
        if let Some(value) = combination.value(kind) {
            command.push_str(&format!(" {} {value}", kind.assembler_flag()));
        }
    }
    body.push_str(&format!(
        "{command} {} > {name}.mak\n",
        shell_quote(&config.reads_path)
    ));
    body.push_str(&format!("make -f {name}.mak\n"));
    body.push('\n');

    let engine = combination.overlapper.unwrap_or(DEFAULT_OVERLAPPER);
    body.push_str(&format!(
        "python {} {name}.{engine}.cns -o {} --no-html --no-plots\n",
        shell_quote(&toolchain.quast_script),
        shell_quote(&report_dir)
    ));

    JobSpec {
        script_file: format!("{name}.slurm"),
        name,
        body,
        report_dir,
    }
}

/// `#SBATCH` header shared by sweep and aggregation jobs. Every job is named after
/// the prefix so the singleton fallback can hold aggregation behind the sweep.
pub fn render_directives(config: &SweepConfig, stdout: &str, stderr: &str) -> String {
    let mut lines = vec![
        "#!/bin/bash".to_string(),
        format!("#SBATCH -J {}", config.prefix),
        format!("#SBATCH -o {stdout}"),
        format!("#SBATCH -e {stderr}"),
        format!("#SBATCH --partition={}", config.toolchain.partition),
    ];
    if let Some(threads) = config.threads {
        lines.push(format!("#SBATCH -c {threads}"));
    }
    if let Some(email) = &config.email {
        lines.push(format!("#SBATCH --mail-user={email}"));
        lines.push("#SBATCH --mail-type=begin".to_string());
        lines.push("#SBATCH --mail-type=end".to_string());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Script for the dependent job that runs `aggregate` over this working directory.
pub fn build_aggregation_script(config: &SweepConfig, program: &str, work_dir: &Path) -> String {
    let mut body = render_directives(
        config,
        &format!("{AGGREGATION_LOG_STEM}.%j.out"),
        &format!("{AGGREGATION_LOG_STEM}.%j.error"),
    );
    body.push('\n');
    if let Some(module) = &config.toolchain.aggregator_module {
        body.push_str(&format!("module load {}\n", shell_quote(module)));
    }
    body.push_str(&format!(
        "{} aggregate --work-dir {}\n",
        shell_quote(program),
        shell_quote(&work_dir.display().to_string())
    ));
    body
}
