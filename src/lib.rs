extern crate parser;
extern crate logger;

use parser::Cli;
use pruner::NativeBackend;

#[macro_use]
extern crate log;

use anyhow::Result;
use located_error::LocatedError;

/// Prune every input VCF of `cli`, using the in-process backend.
pub fn run(cli: Cli) -> Result<()> {
    let backend = NativeBackend::new(cli.args.decompression_threads);
    let pruned  = pruner::run(&backend, &cli.vcf, &cli.args).loc("While running ld-prune")?;
    if !pruned.is_empty() {
        let converged = pruned.iter().filter(|file| file.converged).count();
        info!("Done: pruned {} file(s), {converged} of which converged", pruned.len());
    }
    Ok(())
}
