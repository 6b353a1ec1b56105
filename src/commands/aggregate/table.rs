use super::report::METRIC_LABELS;

pub const SUMMARY_FILE_NAME: &str = "assembly_summary.txt";
pub const MISSING_VALUE: &str = "NA";

const HEADER_LABEL: &str = "ASSEMBLY\t\t\t\t";

/// Metric values indexed `[job][metric]`; rendered one metric per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryMatrix {
    job_names: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl SummaryMatrix {
    pub fn push(&mut self, job: &str, values: Vec<String>) {
        self.job_names.push(job.to_string());
        self.rows.push(values);
    }

    pub fn push_missing(&mut self, job: &str) {
        self.push(job, vec![MISSING_VALUE.to_string(); METRIC_LABELS.len()]);
    }

    pub fn job_count(&self) -> usize {
        self.job_names.len()
    }

    /// Tab-padded text for a monospace viewer; not a machine-readable format.
    pub fn render(&self) -> String {
        let mut out = String::from(HEADER_LABEL);
        for name in &self.job_names {
            out.push_str(name);
            out.push_str("\t\t");
        }
        out.push('\n');

        for (metric, label) in METRIC_LABELS.iter().enumerate() {
            push_cell(&mut out, label);
            for row in &self.rows {
                push_cell(&mut out, row.get(metric).map_or(MISSING_VALUE, String::as_str));
            }
            out.push('\n');
        }

        out
    }
}

fn push_cell(out: &mut String, cell: &str) {
    out.push_str(cell);
    for _ in 0..padding_tabs(cell.chars().count()) {
        out.push('\t');
    }
}

/// Tabs after a cell of `len` characters; shorter cells get more.
pub fn padding_tabs(len: usize) -> usize {
    match len {
        0..4 => 6,
        4..8 => 5,
        8..12 => 4,
        12..16 => 3,
        16..20 => 2,
        _ => 1,
    }
}
