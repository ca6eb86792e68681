mod common;
use common::{Fixture, LdPruneRunner};
use pretty_assertions::assert_eq;

use ldprune_io::store;

#[test]
fn prune_tiny_vcf_with_tmpdir() {
    let vcf    = Fixture::copy("vcf/tiny.vcf");
    let tmpdir = tempfile::tempdir().expect("tmpdir");

    LdPruneRunner::new()
        .input(&vcf)
        .tmpdir(tmpdir.path())
        .threshold(0.5)
        .as_bed()
        .run()
        .expect("ld-prune run");

    // Intermediate store and outputs sit side by side within --tmpdir.
    assert!(tmpdir.path().join("tiny.vcf.zarr").is_dir());
    let output = tmpdir.path().join("tiny.vcf.ld_prune.zarr");
    let bed    = tmpdir.path().join("tiny.vcf.ld_prune.bed");
    validate_file!("test-data/expect/tiny.ld_prune.bed", &bed);

    let pruned = store::read_dataset(&output, 0).expect("pruned store");
    assert_eq!(pruned.variant_id(), ["rs1", "rs3", "rs5", "."]);
    assert_eq!(pruned.contigs(), ["1", "2"]);
    assert_eq!(pruned.sample_id().len(), 6);
    assert_eq!(pruned.chunk_length(), 10_000);
}

#[test]
fn prune_bgzf_vcf_next_to_input() {
    let vcf = Fixture::bgzf("vcf/tiny.vcf");

    LdPruneRunner::new()
        .input(&vcf)
        .threshold(0.5)
        .arg("--decompression-threads", "2")
        .arg("--chunk-length", "2")
        .arg("--output-suffix", ".pruned")
        .run()
        .expect("ld-prune run");

    let output = vcf.dir().join("tiny.vcf.gz.pruned.zarr");
    let pruned = store::read_dataset(&output, 0).expect("pruned store");
    assert_eq!(pruned.n_variants(), 4);
    assert_eq!(store::read_metadata(&output).expect("metadata").n_chunks, 2);
    // The intermediate store lived within a scoped temporary directory.
    assert!(!vcf.dir().join("tiny.vcf.gz.zarr").exists());
    assert!(!vcf.dir().join("tiny.vcf.gz.pruned.bed").exists());
}

#[test]
fn threshold_one_prunes_duplicates() {
    let vcf    = Fixture::copy("vcf/tiny.vcf");
    let tmpdir = tempfile::tempdir().expect("tmpdir");
    LdPruneRunner::new().input(&vcf).tmpdir(tmpdir.path()).threshold(1.0).run().expect("ld-prune run");

    // rs2 duplicates rs1, and rs4 matches rs1 over their shared samples: both have r² = 1.0
    let pruned = store::read_dataset(&tmpdir.path().join("tiny.vcf.ld_prune.zarr"), 0).expect("pruned store");
    assert_eq!(pruned.variant_id(), ["rs1", "rs3", "rs5", "."]);
    assert!(pruned.variant_allele().iter().all(|alleles| alleles.len() == 2));
}

#[test]
fn single_variant_windows_keep_everything() {
    let vcf    = Fixture::copy("vcf/tiny.vcf");
    let tmpdir = tempfile::tempdir().expect("tmpdir");
    LdPruneRunner::new()
        .input(&vcf)
        .tmpdir(tmpdir.path())
        .threshold(0.0)
        .arg("--window-size", "1")
        .arg("--window-step", "1")
        .run()
        .expect("ld-prune run");

    let pruned = store::read_dataset(&tmpdir.path().join("tiny.vcf.ld_prune.zarr"), 0).expect("pruned store");
    assert_eq!(pruned.n_variants(), 6);
    // Allele columns are padded to the widest row (REF + 2 ALT at 1:400).
    assert!(pruned.variant_allele().iter().all(|alleles| alleles.len() == 3));
    assert_eq!(pruned.variant_allele()[0], ["A", "G", ""]);
}

#[test]
fn subsample_before_pruning() {
    let vcf    = Fixture::copy("vcf/tiny.vcf");
    let tmpdir = tempfile::tempdir().expect("tmpdir");
    LdPruneRunner::new()
        .input(&vcf)
        .tmpdir(tmpdir.path())
        .threshold(1.0)
        .arg("--window-size", "1")
        .arg("--window-step", "1")
        .subsample(3)
        .seed(42)
        .as_bed()
        .run()
        .expect("ld-prune run");

    let bed = std::fs::read_to_string(tmpdir.path().join("tiny.vcf.ld_prune.bed")).expect("BED output");
    assert_eq!(bed.lines().count(), 3);
    for line in bed.lines() {
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields.len(), 3);
        let start: u32 = fields[1].parse().expect("BED start");
        let end  : u32 = fields[2].parse().expect("BED end");
        assert_eq!(start + 1, end);
    }
}

#[test]
fn multiple_inputs() {
    let first  = Fixture::copy("vcf/tiny.vcf");
    let second = Fixture::bgzf("vcf/tiny.vcf");
    let tmpdir = tempfile::tempdir().expect("tmpdir");
    LdPruneRunner::new().input(&first).input(&second).tmpdir(tmpdir.path()).threshold(0.5).run().expect("ld-prune run");

    for output in ["tiny.vcf.ld_prune.zarr", "tiny.vcf.gz.ld_prune.zarr"] {
        let pruned = store::read_dataset(&tmpdir.path().join(output), 0).expect("pruned store");
        assert_eq!(pruned.n_variants(), 4);
    }
}

#[test]
fn zero_inputs() {
    let runner = LdPruneRunner::new();
    assert!(runner.cli().vcf.is_empty());
    runner.run().expect("An empty run should succeed");
}

#[test]
fn invalid_input_extension() {
    let vcf    = Fixture::copy("expect/tiny.ld_prune.bed");
    let tmpdir = tempfile::tempdir().expect("tmpdir");
    let err = LdPruneRunner::new().input(&vcf).tmpdir(tmpdir.path()).run().expect_err("not a VCF");
    assert!(err.chain().any(|e| e.to_string().contains("Invalid or missing file extension")));
}
