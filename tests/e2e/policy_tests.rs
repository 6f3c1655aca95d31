use super::helpers::{stderr, stdout, TestRepo};

#[test]
fn test_init_writes_a_valid_reference_policy() {
    let repo = TestRepo::new();

    let init = repo.run(&["init"]);
    assert_eq!(init.status.code(), Some(0), "{}", stderr(&init));
    assert!(repo.file("release-policy.json").exists());

    let validate = repo.run(&["policy", "--validate"]);
    assert_eq!(validate.status.code(), Some(0), "{}", stderr(&validate));
    assert!(stdout(&validate).contains("Policy is valid: version 1.0.0, 4 patterns, 3 scan paths"));
}

#[test]
fn test_init_refuses_to_overwrite_without_force() {
    let repo = TestRepo::new();
    repo.write("release-policy.json", "{\"version\": \"custom\"}");

    let output = repo.run(&["init"]);
    assert_ne!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("--force"));

    let forced = repo.run(&["init", "--force"]);
    assert_eq!(forced.status.code(), Some(0));
    let content = std::fs::read_to_string(repo.file("release-policy.json")).unwrap();
    assert!(content.contains("sql-string-interpolation"));
}

#[test]
fn test_reference_policy_flags_seeded_repository() {
    let repo = TestRepo::new();
    assert_eq!(repo.run(&["init"]).status.code(), Some(0));

    repo.write(
        "backend/crates/server/src/handlers/auth.rs",
        "let q = format!(\"SELECT * FROM users WHERE email = '{}'\", email);\n",
    );
    repo.write("frontend/src/Header.tsx", "<h1>Legacy POS</h1>\n");
    repo.write("backend/crates/server/fixtures/seed.rs", "demo@example.com\n");
    repo.write("archive/v1/login.ts", "password123\n");

    let (code, json) = repo.run_json(&["scan", "--format", "json"]);

    assert_eq!(code, Some(1));
    assert_eq!(json["violations_by_severity"]["error"], 1);
    assert_eq!(json["violations_by_severity"]["warning"], 1);
    assert_eq!(json["violations"][0]["file"], "backend/crates/server/src/handlers/auth.rs");
    assert_eq!(json["violations"][0]["pattern_id"], "sql-string-interpolation");
    assert_eq!(json["violations"][1]["file"], "frontend/src/Header.tsx");
}

#[test]
fn test_policy_show_prints_document() {
    let repo = TestRepo::with_policy();

    let (code, json) = repo.run_json(&["policy", "--show"]);

    assert_eq!(code, Some(0));
    assert_eq!(json["version"], "2.1.0");
    assert_eq!(json["forbiddenPatterns"][1]["id"], "legacy-branding");
}

#[test]
fn test_policy_validate_reports_problems() {
    let repo = TestRepo::new();
    repo.write(
        "release-policy.json",
        r#"{"version": "", "scanPaths": [], "forbiddenPatterns": [], "allowedExceptions": {"ghost": ["**"]}}"#,
    );

    let output = repo.run(&["policy", "--validate"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Policy validation failed: 3 problems in release-policy.json"), "{}", err);
    assert!(err.contains("  - version: must be a non-empty string"), "{}", err);
    assert!(err.contains("scanPaths: at least one directory root is required"), "{}", err);
    assert!(err.contains("allowedExceptions.ghost: no forbidden pattern has this id"), "{}", err);
}
