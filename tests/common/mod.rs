//! Common test infrastructure for doko integration tests.
//!
//! Provides:
//! - TestProject: temp directory the binary runs in, with optional git repo
//! - Output assertion helpers
//! - skip_if_no_git! for environments without a git binary

use std::process::{Command, Output};

/// A test project with an isolated directory.
pub struct TestProject {
    pub dir: tempfile::TempDir,
}

impl TestProject {
    /// Create an empty project directory (no git repository).
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Create a project with an initialized git repository on the given branch.
    #[allow(dead_code)]
    pub fn with_branch(branch: &str) -> Self {
        let project = Self::empty();
        project.git(&["init", "--quiet"]);
        project.git(&["config", "user.email", "doko-tests@example.com"]);
        project.git(&["config", "user.name", "doko tests"]);
        project.git(&["commit", "--allow-empty", "--quiet", "-m", "init"]);
        project.git(&["checkout", "--quiet", "-B", branch]);
        project
    }

    /// Detach HEAD from whatever branch is checked out.
    #[allow(dead_code)]
    pub fn detach_head(&self) {
        self.git(&["checkout", "--quiet", "--detach", "HEAD"]);
    }

    /// Run a git command inside the project, asserting success.
    #[allow(dead_code)]
    pub fn git(&self, args: &[&str]) {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.dir.path())
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed:\n{}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    /// Write a file into the project directory.
    #[allow(dead_code)]
    pub fn write_file(&self, relative: &str, contents: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(path, contents).unwrap_or_else(|_| panic!("Failed to write {}", relative));
    }

    /// Run doko with isolated environment.
    pub fn run_doko(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_doko"))
            .args(args)
            .current_dir(self.dir.path())
            // Isolate environment
            .env_clear()
            .env("HOME", self.dir.path())
            .env("PATH", std::env::var("PATH").unwrap_or_default())
            .output()
            .expect("Failed to execute doko")
    }

    /// Run doko and assert success.
    pub fn run_doko_ok(&self, args: &[&str]) -> Output {
        let output = self.run_doko(args);
        assert!(
            output.status.success(),
            "doko {:?} failed (exit {:?}):\nstdout: {}\nstderr: {}",
            args,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        output
    }

    /// Run doko and assert failure with a specific exit code.
    #[allow(dead_code)]
    pub fn run_doko_fails(&self, args: &[&str], expected_code: i32) -> Output {
        let output = self.run_doko(args);
        assert_eq!(
            output.status.code(),
            Some(expected_code),
            "doko {:?} expected exit {} but got {:?}:\nstdout: {}\nstderr: {}",
            args,
            expected_code,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        output
    }

    /// Get path to a file in the project
    pub fn path(&self, relative: &str) -> std::path::PathBuf {
        self.dir.path().join(relative)
    }
}

// ============================================================================
// Output assertion helpers
// ============================================================================

/// Assert stdout contains a substring
pub fn assert_stdout_contains(output: &Output, expected: &str) {
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains(expected),
        "Expected stdout to contain '{}':\n{}",
        expected,
        stdout
    );
}

/// Assert stderr contains a substring
#[allow(dead_code)]
pub fn assert_stderr_contains(output: &Output, expected: &str) {
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(expected),
        "Expected stderr to contain '{}':\n{}",
        expected,
        stderr
    );
}

/// Get stdout as string
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

// ============================================================================
// Test skip helper
// ============================================================================

/// Check that a git binary is available on PATH.
#[allow(dead_code)]
pub fn can_run_git() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Skip test if git is not available
#[macro_export]
macro_rules! skip_if_no_git {
    () => {
        if !$crate::common::can_run_git() {
            eprintln!("Skipping test: git binary not available");
            return;
        }
    };
}
