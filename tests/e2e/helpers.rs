use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

pub const TEST_POLICY: &str = r#"{
  "version": "2.1.0",
  "scanPaths": ["src", "archive"],
  "exclusions": ["archive/**", "**/tests/**"],
  "forbiddenPatterns": [
    {
      "id": "demo-credentials",
      "pattern": "demo@example\\.com",
      "message": "Demo credentials must not ship",
      "severity": "error"
    },
    {
      "id": "legacy-branding",
      "pattern": "LegacyPOS",
      "message": "Old product name",
      "severity": "warning"
    }
  ],
  "allowedExceptions": {
    "demo-credentials": ["src/fixtures/**"]
  }
}
"#;

pub struct TestRepo {
    pub dir: TempDir,
    pub binary_path: String,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let binary_path = env!("CARGO_BIN_EXE_release-gate").to_string();

        Self { dir, binary_path }
    }

    /// Repository with `release-policy.json` set to [`TEST_POLICY`]
    pub fn with_policy() -> Self {
        let repo = Self::new();
        repo.write("release-policy.json", TEST_POLICY);
        repo
    }

    pub fn file(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.file(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create directories");
        }
        fs::write(path, content).expect("Failed to write file");
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(&self.binary_path)
            .args(args)
            .current_dir(self.dir.path())
            .env_remove("RELEASE_GATE_LOG")
            .output()
            .expect("Failed to run release-gate")
    }

    pub fn run_json(&self, args: &[&str]) -> (Option<i32>, serde_json::Value) {
        let output = self.run(args);
        let json = serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
            panic!(
                "stdout is not JSON ({}):\n{}\nstderr:\n{}",
                e,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            )
        });
        (output.status.code(), json)
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
