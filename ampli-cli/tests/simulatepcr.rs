use std::fs;
use std::io::Read;
use std::path::PathBuf;

use assert_cmd::Command;
use flate2::read::GzDecoder;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn data_path(relative: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../tests/data")
        .join(relative)
        .to_string_lossy()
        .into_owned()
}

fn ampli() -> Command {
    let mut cmd = Command::cargo_bin("ampli").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn simulatepcr() -> Command {
    let mut cmd = ampli();
    cmd.arg("simulatepcr");
    cmd
}

#[test]
fn test_single_product_with_primer_roles() {
    simulatepcr()
        .arg(data_path("fasta/scenario.fa"))
        .args(["--forward-primer", "AAA", "--reverse-primer", "CCC", "-m", "1000"])
        .assert()
        .success()
        .stdout("seq1\t7\t10\tAAA+CCC\n");
}

#[test]
fn test_product_longer_than_limit_is_dropped() {
    simulatepcr()
        .arg(data_path("fasta/scenario.fa"))
        .args(["--forward-primer", "AAA", "--reverse-primer", "CCC", "-m", "2"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("Found 0 candidate PCR product(s)"));
}

#[test]
fn test_only_nearest_forward_site_pairs() {
    simulatepcr()
        .arg(data_path("fasta/nearest.fa"))
        .args(["--forward-primer", "AAA", "--reverse-primer", "CCC"])
        .assert()
        .success()
        .stdout("seq1\t8\t10\tAAA+CCC\n");
}

#[test]
fn test_absent_primer_reports_zero_products() {
    simulatepcr()
        .arg(data_path("fasta/scenario.fa"))
        .args(["-p", "ACGTACGTAC"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("Found 0 candidate PCR product(s)"));
}

#[test]
fn test_unrestricted_primers_bind_both_strands() {
    simulatepcr()
        .arg(data_path("fasta/scenario.fa"))
        .args(["-p", "AAA", "-p", "CCC", "--sort"])
        .assert()
        .success()
        .stdout("seq1\t7\t10\tAAA+CCC\nseq1\t10\t13\tCCC+AAA\n");
}

#[test]
fn test_primer_file_plain_and_fasta() {
    for primer_file in ["primers/scenario.txt", "primers/scenario.fa"] {
        simulatepcr()
            .arg(data_path("fasta/scenario.fa"))
            .args(["--primer-file", &data_path(primer_file), "--sort"])
            .assert()
            .success()
            .stdout("seq1\t7\t10\tAAA+CCC\nseq1\t10\t13\tCCC+AAA\n");
    }
}

#[test]
fn test_config_file() {
    simulatepcr()
        .arg(data_path("fasta/scenario.fa"))
        .args(["--config", &data_path("primers/scenario.toml")])
        .assert()
        .success()
        .stdout("seq1\t7\t10\tAAA+CCC\n");
}

#[test]
fn test_flag_overrides_config_max_length() {
    simulatepcr()
        .arg(data_path("fasta/scenario.fa"))
        .args(["--config", &data_path("primers/scenario.toml"), "-m", "2"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_ignore_case() {
    simulatepcr()
        .arg(data_path("fasta/scenario.fa"))
        .args(["--forward-primer", "aaa", "--reverse-primer", "ccc"])
        .assert()
        .success()
        .stdout("");

    simulatepcr()
        .arg(data_path("fasta/scenario.fa"))
        .args(["--forward-primer", "aaa", "--reverse-primer", "ccc", "--ignore-case"])
        .assert()
        .success()
        .stdout("seq1\t7\t10\tAAA+CCC\n");
}

#[test]
fn test_output_file() {
    let tmpdir = TempDir::new().unwrap();
    let out = tmpdir.path().join("nested/products.bed");

    simulatepcr()
        .arg(data_path("fasta/scenario.fa"))
        .arg(&out)
        .args(["--forward-primer", "AAA", "--reverse-primer", "CCC", "-t", "1"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("Wrote 1 PCR product(s)"));

    assert_eq!(fs::read_to_string(&out).unwrap(), "seq1\t7\t10\tAAA+CCC\n");
}

#[test]
fn test_gzipped_output_file() {
    let tmpdir = TempDir::new().unwrap();
    let out = tmpdir.path().join("products.bed.gz");

    simulatepcr()
        .arg(data_path("fasta/scenario.fa"))
        .arg(&out)
        .args(["--forward-primer", "AAA", "--reverse-primer", "CCC"])
        .assert()
        .success();

    let mut decoded = String::new();
    GzDecoder::new(fs::File::open(&out).unwrap())
        .read_to_string(&mut decoded)
        .unwrap();
    assert_eq!(decoded, "seq1\t7\t10\tAAA+CCC\n");
}

#[test]
fn test_gzipped_template() {
    // TTG ends at 3 on chrX, GGAA (the reverse complement of TTCC) starts at 4
    simulatepcr()
        .arg(data_path("fasta/base.fa.gz"))
        .args(["--forward-primer", "TTG", "--reverse-primer", "TTCC"])
        .assert()
        .success()
        .stdout("chrX\t3\t4\tTTG+TTCC\n");
}

#[test]
fn test_multiple_templates_sorted() {
    let tmpdir = TempDir::new().unwrap();
    let fasta = tmpdir.path().join("two.fa");
    fs::write(&fasta, ">b\nAAACCCGGG\n>a\nTTAAACCCGGGTT\n").unwrap();

    simulatepcr()
        .arg(&fasta)
        .args(["--forward-primer", "AAA", "--reverse-primer", "CCC", "--sort", "-t", "2"])
        .assert()
        .success()
        .stdout("a\t5\t8\tAAA+CCC\nb\t3\t6\tAAA+CCC\n");
}

#[test]
fn test_missing_primers_fails() {
    simulatepcr()
        .arg(data_path("fasta/scenario.fa"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--primer"));
}

#[test]
fn test_empty_config_fails_before_reading_templates() {
    let tmpdir = TempDir::new().unwrap();
    let config = tmpdir.path().join("empty.toml");
    fs::write(&config, "max_length = 10\n").unwrap();

    simulatepcr()
        .arg(tmpdir.path().join("missing.fa"))
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No primers supplied"));
}

#[test]
fn test_missing_template_fails() {
    let tmpdir = TempDir::new().unwrap();

    simulatepcr()
        .arg(tmpdir.path().join("missing.fa"))
        .args(["-p", "AAA"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load templates"));
}

#[test]
fn test_failed_run_leaves_no_output() {
    let tmpdir = TempDir::new().unwrap();
    let out = tmpdir.path().join("products.bed");

    simulatepcr()
        .arg(data_path("fasta/scenario.fa"))
        .arg(&out)
        .args(["-p", ""])
        .assert()
        .failure();

    assert!(!out.exists());
}
