use super::helpers::{stderr, stdout, TestRepo};

#[test]
fn test_prod_lists_every_missing_field() {
    let repo = TestRepo::new();
    repo.write(".env", "STORE_ID=store-7\n");

    let output = repo.run(&["validate", "--profile", "prod", "--env-file", ".env"]);

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("- DATABASE_PATH"), "{}", out);
    assert!(out.contains("- JWT_SECRET"), "{}", out);
    assert!(!out.contains("- STORE_ID"), "{}", out);
    assert!(stderr(&output).contains("Configuration invalid for profile 'prod': 2 problems"));
}

#[test]
fn test_dev_accepts_empty_configuration() {
    let repo = TestRepo::new();
    repo.write(".env", "# nothing here\n");

    let output = repo.run(&["validate", "--profile", "dev", "--env-file", ".env"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Configuration is valid"));
}

#[test]
fn test_prod_rejects_placeholder_secret() {
    let repo = TestRepo::new();
    repo.write(
        ".env",
        "DATABASE_PATH=/srv/app.db\nSTORE_ID=store-7\nJWT_SECRET=\"please-CHANGE_ME-now\"\n",
    );

    let (code, json) = repo.run_json(&["validate", "--profile", "prod", "--env-file", ".env", "--json"]);

    assert_eq!(code, Some(1));
    assert_eq!(json["missing_fields"].as_array().unwrap().len(), 0);
    let placeholders = json["placeholder_violations"].as_array().unwrap();
    assert_eq!(placeholders.len(), 1);
    assert_eq!(placeholders[0]["field"], "JWT_SECRET");
    assert_eq!(placeholders[0]["matched_pattern"], "CHANGE_ME");
}

#[test]
fn test_legacy_key_satisfies_canonical_field_with_warning() {
    let repo = TestRepo::new();
    repo.write(
        "runtime.toml",
        "DATABASE_URL = \"/srv/app.db\"\nSTORE_ID = 7\nJWT_SECRET = \"k3y-from-vault\"\n",
    );

    let output = repo.run(&["validate", "--profile", "prod", "--config", "runtime.toml"]);

    assert_eq!(output.status.code(), Some(0), "{}", stdout(&output));
    let out = stdout(&output);
    assert!(out.contains("DATABASE_URL is deprecated, use DATABASE_PATH"));
    assert!(out.contains("Configuration is valid"));
}

#[test]
fn test_env_file_overrides_toml_values() {
    let repo = TestRepo::new();
    repo.write(
        "runtime.toml",
        "DATABASE_PATH = \"/srv/app.db\"\nSTORE_ID = \"7\"\nJWT_SECRET = \"CHANGE_ME\"\n",
    );
    repo.write(".env", "JWT_SECRET=k3y-from-vault\n");

    let output = repo.run(&[
        "validate",
        "--profile",
        "prod",
        "--config",
        "runtime.toml",
        "--env-file",
        ".env",
    ]);

    assert_eq!(output.status.code(), Some(0), "{}", stdout(&output));
}

#[test]
fn test_profile_from_settings_file_with_override() {
    let repo = TestRepo::new();
    repo.write(
        "release-gate.toml",
        "profile = \"prod\"\n\n[profiles.prod]\nrequired_fields = [\"SMTP_HOST\"]\n",
    );
    repo.write(".env", "DATABASE_PATH=/srv/app.db\n");

    let (code, json) = repo.run_json(&["validate", "--env-file", ".env", "--json"]);

    assert_eq!(code, Some(1));
    assert_eq!(json["profile"], "prod");
    assert_eq!(json["missing_fields"], serde_json::json!(["SMTP_HOST"]));
}

#[test]
fn test_validate_requires_a_profile() {
    let repo = TestRepo::new();

    let output = repo.run(&["validate"]);

    assert_ne!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("No runtime profile selected"));
}
