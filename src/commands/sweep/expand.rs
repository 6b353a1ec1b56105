use super::sweep_config::{AxisKind, SweepConfig};

/// One point of the sweep; `None` marks an undeclared axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combination<'a> {
    pub kmer: Option<&'a str>,
    pub overlapper: Option<&'a str>,
    pub min_read_length: Option<&'a str>,
}

impl<'a> Combination<'a> {
    pub fn value(&self, kind: AxisKind) -> Option<&'a str> {
        match kind {
            AxisKind::Kmer => self.kmer,
            AxisKind::Overlapper => self.overlapper,
            AxisKind::MinReadLength => self.min_read_length,
        }
    }

    /// `<prefix>[_KM<k>][_OL<o>][_RL<r>]`
    pub fn job_name(&self, prefix: &str) -> String {
        let mut name = prefix.to_string();
        for kind in AxisKind::ALL {
            if let Some(value) = self.value(kind) {
                name.push('_');
                name.push_str(kind.code());
                name.push_str(value);
            }
        }
        name
    }
}

/// Cartesian product in kmer -> overlapper -> minReadLength order, outer to inner.
pub fn combinations(config: &SweepConfig) -> Vec<Combination<'_>> {
    let mut out = Vec::with_capacity(config.combination_count().unwrap_or(0));

    for kmer in config.kmer.points() {
        for overlapper in config.overlapper.points() {
            for min_read_length in config.min_read_length.points() {
                out.push(Combination {
                    kmer,
                    overlapper,
                    min_read_length,
                });
            }
        }
    }

    out
}
