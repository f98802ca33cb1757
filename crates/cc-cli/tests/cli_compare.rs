use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cohortcomp"))
}

fn repo_root() -> PathBuf {
    // crates/cc-cli -> repo root
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..").canonicalize().unwrap()
}

fn fixture_path(name: &str) -> PathBuf {
    repo_root().join("tests/fixtures").join(name)
}

fn tmp_path(filename: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("cohortcomp_cli_{}_{}_{}", std::process::id(), nanos, filename));
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn parse_stdout(out: &Output) -> serde_json::Value {
    assert!(
        out.status.success(),
        "command failed: stdout={} stderr={}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    serde_json::from_slice(&out.stdout).expect("stdout should be JSON")
}

fn assert_comparison_contract(v: &serde_json::Value) {
    let p = v.get("p_value").and_then(|x| x.as_f64()).expect("p_value should be a number");
    assert!((0.0..=1.0).contains(&p), "p_value out of range: {}", p);

    let stat = v.get("statistic").and_then(|x| x.as_f64()).expect("statistic should be a number");
    assert!(!stat.is_nan(), "statistic must not be NaN");

    let sig = v.get("significant").and_then(|x| x.as_bool()).expect("significant should be bool");
    assert_eq!(sig, p < 0.05);

    let n_used = v.get("n_used").and_then(|x| x.as_u64()).expect("n_used should be an integer");
    assert!(n_used > 0);
}

#[test]
fn compare_numeric_target_welch() {
    let input = fixture_path("clinic_small.csv");
    let out = run(&["compare", "--input", input.to_str().unwrap(), "--target", "Age"]);
    let v = parse_stdout(&out);
    assert_comparison_contract(&v);

    assert_eq!(v["test"], "welch_t");
    assert_eq!(v["grouping"], "Instability");
    // Rows 9 (grouping=2), 10 (missing Age), 11 (missing grouping) drop out.
    assert_eq!(v["n_used"], 11);
    assert_eq!(v["n_excluded"], 3);

    // Reference Welch on the fixture groups:
    // t = 5.799679040579851, df = 8.563545363883652, p = 3.136313199890589e-4
    let t = v["statistic"].as_f64().unwrap();
    let df = v["df"].as_f64().unwrap();
    let p = v["p_value"].as_f64().unwrap();
    assert!((t - 5.799679040579851).abs() < 1e-9, "t={}", t);
    assert!((df - 8.563545363883652).abs() < 1e-9, "df={}", df);
    assert!((p - 3.136313199890589e-4).abs() < 1e-6, "p={}", p);
    assert_eq!(v["significant"], true);

    let g0 = &v["summaries"]["numeric"]["group0"];
    let g1 = &v["summaries"]["numeric"]["group1"];
    assert_eq!(g0["n"], 6);
    assert_eq!(g1["n"], 5);
    assert!((g0["mean"].as_f64().unwrap() - 42.833333333333336).abs() < 1e-9);
    assert!((g1["mean"].as_f64().unwrap() - 63.6).abs() < 1e-9);
}

#[test]
fn compare_sparse_2x2_uses_fisher() {
    let input = fixture_path("clinic_small.csv");
    let out = run(&["compare", "--input", input.to_str().unwrap(), "--target", "Sex"]);
    let v = parse_stdout(&out);
    assert_comparison_contract(&v);

    assert_eq!(v["test"], "fisher_exact");
    assert_eq!(v["low_expected_counts"], true);
    assert!(v.get("df").is_none(), "exact test carries no df");

    let table = &v["summaries"]["categorical"]["table"];
    assert_eq!(table["categories"], serde_json::json!(["F", "M"]));
    assert_eq!(table["group0"], serde_json::json!([5, 2]));
    assert_eq!(table["group1"], serde_json::json!([2, 3]));
}

#[test]
fn compare_three_category_target_keeps_chi_square() {
    let input = fixture_path("clinic_small.csv");
    let out = run(&["compare", "--input", input.to_str().unwrap(), "--target", "Severity"]);
    let v = parse_stdout(&out);
    assert_comparison_contract(&v);

    assert_eq!(v["test"], "chi_square");
    assert_eq!(v["df"], 2.0);
    // Small fixture, so the approximation is flagged.
    assert_eq!(v["low_expected_counts"], true);
}

#[test]
fn compare_writes_output_and_plot_artifact() {
    let input = fixture_path("clinic_small.csv");
    let out_path = tmp_path("compare.json");
    let plot_path = tmp_path("plot.json");

    let out = run(&[
        "compare",
        "--input",
        input.to_str().unwrap(),
        "--target",
        "CRP",
        "--output",
        out_path.to_str().unwrap(),
        "--plot-output",
        plot_path.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));

    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_comparison_contract(&v);
    assert_eq!(v["significant"], true);

    let plot: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&plot_path).unwrap()).unwrap();
    assert_eq!(plot["schema_version"], "cohortcomp/box_strip/v1");
    let groups = plot["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["label"], "0");
    assert_eq!(groups[0]["n"], 7);
    assert_eq!(groups[1]["n"], 5);

    std::fs::remove_file(&out_path).ok();
    std::fs::remove_file(&plot_path).ok();
}

#[test]
fn categorical_plot_artifact_is_stacked_bars() {
    let input = fixture_path("clinic_small.csv");
    let plot_path = tmp_path("sev_plot.json");

    let out = run(&[
        "compare",
        "--input",
        input.to_str().unwrap(),
        "--target",
        "Severity",
        "--plot-output",
        plot_path.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));

    let plot: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&plot_path).unwrap()).unwrap();
    assert_eq!(plot["schema_version"], "cohortcomp/stacked_bar/v1");
    assert_eq!(plot["categories"], serde_json::json!(["mild", "moderate", "severe"]));
    assert_eq!(plot["group0_counts"], serde_json::json!([6, 1, 0]));
    assert_eq!(plot["group1_counts"], serde_json::json!([0, 1, 4]));

    std::fs::remove_file(&plot_path).ok();
}

#[test]
fn compare_all_reports_every_eligible_column() {
    let input = fixture_path("clinic_small.csv");
    let out = run(&["compare-all", "--input", input.to_str().unwrap()]);
    let v = parse_stdout(&out);

    assert_eq!(v["grouping"], "Instability");
    let results = v["results"].as_array().unwrap();
    let targets: Vec<&str> = results.iter().map(|r| r["target"].as_str().unwrap()).collect();
    assert_eq!(targets, vec!["PatientID", "Age", "Sex", "CRP", "Severity"]);
    for r in results {
        assert_comparison_contract(r);
    }
    assert!(v["failures"].as_array().unwrap().is_empty());
}

#[test]
fn missing_target_column_fails_cleanly() {
    let input = fixture_path("clinic_small.csv");
    let out = run(&["compare", "--input", input.to_str().unwrap(), "--target", "Nope"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Nope"), "stderr should name the column: {}", stderr);
}

#[test]
fn missing_input_file_fails_cleanly() {
    let out = run(&["compare", "--input", "/nonexistent/data.csv", "--target", "Age"]);
    assert!(!out.status.success());
}

#[test]
fn custom_grouping_config_resolves_alias() {
    let input = fixture_path("clinic_small.csv");
    let cfg_path = tmp_path("grouping.json");
    std::fs::write(&cfg_path, r#"{ "aliases": ["Unstable", "INSTABILITY"] }"#).unwrap();

    let out = run(&[
        "compare",
        "--input",
        input.to_str().unwrap(),
        "--target",
        "Age",
        "--grouping-config",
        cfg_path.to_str().unwrap(),
    ]);
    let v = parse_stdout(&out);
    assert_eq!(v["grouping"], "Instability");

    std::fs::remove_file(&cfg_path).ok();
}

#[test]
fn unresolvable_grouping_fails_cleanly() {
    let input = fixture_path("clinic_small.csv");
    let cfg_path = tmp_path("bad_grouping.json");
    std::fs::write(&cfg_path, r#"{ "aliases": ["Unstable"] }"#).unwrap();

    let out = run(&[
        "compare",
        "--input",
        input.to_str().unwrap(),
        "--target",
        "Age",
        "--grouping-config",
        cfg_path.to_str().unwrap(),
    ]);
    assert!(!out.status.success());

    std::fs::remove_file(&cfg_path).ok();
}
