use std::path::{Path, PathBuf};

use clap::Parser;

/// Builds an `ld-prune` command line, and runs it in-process.
#[derive(Debug, Default)]
pub struct LdPruneRunner {
    inputs: Vec<PathBuf>,
    args  : Vec<String>,
}

impl LdPruneRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, vcf: &Path) -> Self {
        self.inputs.push(vcf.to_path_buf());
        self
    }

    pub fn tmpdir(self, dir: &Path) -> Self {
        self.arg("--tmpdir", dir.to_str().expect("Invalid tmpdir"))
    }

    pub fn threshold(self, threshold: f64) -> Self {
        self.arg("--threshold", &threshold.to_string())
    }

    pub fn subsample(self, n: usize) -> Self {
        self.arg("--subsample", &n.to_string())
    }

    pub fn seed(self, seed: u64) -> Self {
        self.arg("--seed", &seed.to_string())
    }

    pub fn as_bed(self) -> Self {
        self.flag("--as-bed")
    }

    pub fn arg(mut self, name: &str, value: &str) -> Self {
        self.args.extend([name.to_string(), value.to_string()]);
        self
    }

    pub fn flag(mut self, name: &str) -> Self {
        self.args.push(name.to_string());
        self
    }

    pub fn cli(&self) -> parser::Cli {
        let inputs = self.inputs.iter().map(|p| p.to_str().expect("Invalid input path").to_string());
        let argv: Vec<String> = std::iter::once("ld-prune".to_string())
            .chain(self.args.iter().cloned())
            .chain(inputs)
            .collect();
        parser::Cli::parse_from(argv)
    }

    pub fn run(&self) -> anyhow::Result<()> {
        ld_prune::run(self.cli())
    }
}
