use super::helpers::{stderr, stdout, TestRepo};

#[test]
fn test_clean_repository_passes() {
    let repo = TestRepo::with_policy();
    repo.write("src/main.rs", "fn main() {\n    println!(\"hello\");\n}\n");

    let output = repo.run(&["scan"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("No violations found"));
}

#[test]
fn test_error_violation_fails_the_gate() {
    let repo = TestRepo::with_policy();
    repo.write("src/auth.rs", "fn login() {\n    // seed\n    let user = \"demo@example.com\";\n}\n");

    let (code, json) = repo.run_json(&["scan", "--format", "json"]);

    assert_eq!(code, Some(1));
    assert_eq!(json["policy_version"], "2.1.0");
    assert_eq!(json["violations_by_severity"]["error"], 1);
    assert_eq!(json["violations_by_severity"]["warning"], 0);

    let violation = &json["violations"][0];
    assert_eq!(violation["file"], "src/auth.rs");
    assert_eq!(violation["line"], 3);
    assert_eq!(violation["pattern_id"], "demo-credentials");
    assert_eq!(violation["severity"], "error");
    assert_eq!(violation["excerpt"], "let user = \"demo@example.com\";");
}

#[test]
fn test_warnings_never_fail_the_gate() {
    let repo = TestRepo::with_policy();
    repo.write("src/ui.ts", "const title = 'LegacyPOS';\n");

    let output = repo.run(&["scan"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("Violations found: 1 total (0 errors, 1 warnings)"));
    assert!(stdout(&output).contains("Warnings (1):"));
}

#[test]
fn test_excluded_paths_are_never_scanned() {
    let repo = TestRepo::with_policy();
    repo.write("archive/old_login.rs", "demo@example.com\n");
    repo.write("src/tests/login_test.rs", "demo@example.com\n");
    repo.write("src/lib.rs", "pub fn ok() {}\n");

    let (code, json) = repo.run_json(&["scan", "--format", "json"]);

    assert_eq!(code, Some(0));
    assert_eq!(json["violations"].as_array().unwrap().len(), 0);
    assert_eq!(json["scanned_file_count"], 1);
}

#[test]
fn test_exception_applies_to_one_pattern_only() {
    let repo = TestRepo::with_policy();
    repo.write("src/fixtures/seed.rs", "demo@example.com\nLegacyPOS\n");

    let (code, json) = repo.run_json(&["scan", "--format", "json"]);

    assert_eq!(code, Some(0));
    let violations = json["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["pattern_id"], "legacy-branding");
    assert_eq!(violations[0]["line"], 2);
}

#[test]
fn test_repeated_scans_are_identical() {
    let repo = TestRepo::with_policy();
    for i in 0..12 {
        repo.write(
            &format!("src/module_{}/mod.rs", i),
            "LegacyPOS\nfn f() {}\ndemo@example.com LegacyPOS\n",
        );
    }

    let (_, first) = repo.run_json(&["scan", "--format", "json", "--threads", "4"]);
    let (_, second) = repo.run_json(&["scan", "--format", "json", "--threads", "1"]);

    assert_eq!(first["violations"], second["violations"]);
    assert_eq!(first["violations"].as_array().unwrap().len(), 36);
    assert_eq!(first["violations"][0]["file"], "src/module_0/mod.rs");
    assert_eq!(first["violations"][0]["line"], 1);
}

#[test]
fn test_missing_scan_path_is_a_warning() {
    let repo = TestRepo::with_policy();
    repo.write("src/main.rs", "fn main() {}\n");

    let (code, json) = repo.run_json(&["scan", "--format", "json"]);

    assert_eq!(code, Some(0));
    let warnings = json["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().unwrap().contains("archive"));
}

#[test]
fn test_exit_zero_overrides_failure() {
    let repo = TestRepo::with_policy();
    repo.write("src/auth.rs", "demo@example.com\n");

    let output = repo.run(&["scan", "--exit-zero"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Errors (1):"));
}

#[test]
fn test_both_format_writes_report_file() {
    let repo = TestRepo::with_policy();
    repo.write("src/auth.rs", "demo@example.com\n");

    let output = repo.run(&["scan", "--format", "both"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Errors (1):"));

    let report = std::fs::read_to_string(repo.file("release-gate-report.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(json["violations_by_severity"]["error"], 1);
}

#[test]
fn test_settings_file_supplies_policy_and_format() {
    let repo = TestRepo::new();
    repo.write("ci/gate-policy.json", super::helpers::TEST_POLICY);
    repo.write(
        "release-gate.toml",
        "policy = \"ci/gate-policy.json\"\nformat = \"json\"\nthreads = 2\n",
    );
    repo.write("src/ui.ts", "LegacyPOS\n");

    let (code, json) = repo.run_json(&["scan"]);

    assert_eq!(code, Some(0));
    assert_eq!(json["violations_by_severity"]["warning"], 1);
}

#[test]
fn test_malformed_policy_aborts_before_scanning() {
    let repo = TestRepo::new();
    repo.write(
        "release-policy.json",
        r#"{
  "version": "1",
  "scanPaths": ["src"],
  "forbiddenPatterns": [
    { "id": "broken", "pattern": "(unclosed", "message": "m", "severity": "error" },
    { "id": "loud", "pattern": "x", "message": "m", "severity": "critical" }
  ]
}"#,
    );
    repo.write("src/main.rs", "fn main() {}\n");

    let output = repo.run(&["scan", "--format", "json"]);

    assert_ne!(output.status.code(), Some(0));
    assert!(stdout(&output).is_empty());
    let err = stderr(&output);
    assert!(err.contains("forbiddenPatterns[0] (broken): pattern does not compile"), "{}", err);
    assert!(err.contains("severity 'critical' is not one of: error, warning"), "{}", err);
}

#[test]
fn test_missing_policy_is_fatal() {
    let repo = TestRepo::new();
    repo.write("src/main.rs", "fn main() {}\n");

    let output = repo.run(&["scan"]);

    assert_ne!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("failed to read policy"));
}

#[test]
fn test_check_attaches_profile_validation() {
    let repo = TestRepo::with_policy();
    repo.write("src/main.rs", "fn main() {}\n");
    repo.write(".env.prod", "DATABASE_PATH=/srv/app.db\nJWT_SECRET=CHANGE_ME\n");

    let (code, json) = repo.run_json(&[
        "check",
        "--format",
        "json",
        "--profile",
        "prod",
        "--env-file",
        ".env.prod",
    ]);

    assert_eq!(code, Some(1));
    assert_eq!(json["violations"].as_array().unwrap().len(), 0);
    let validation = &json["config_validation"];
    assert_eq!(validation["profile"], "prod");
    assert_eq!(validation["missing_fields"][0], "STORE_ID");
    assert_eq!(validation["placeholder_violations"][0]["field"], "JWT_SECRET");
}

#[test]
fn test_check_without_profile_is_a_plain_scan() {
    let repo = TestRepo::with_policy();
    repo.write("src/main.rs", "fn main() {}\n");

    let (code, json) = repo.run_json(&["check", "--format", "json"]);

    assert_eq!(code, Some(0));
    assert!(json.get("config_validation").is_none());
}
