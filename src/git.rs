//! Repository introspection via the `git` binary.
//!
//! doko only consults git when no database-selection flag was given (branch
//! based name resolution) and when `migrate latest` needs the manifest, so
//! runs with an explicit --dbname work outside any repository.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::process::Command;

/// Current HEAD state of the enclosing repository.
#[derive(Debug, Clone, PartialEq)]
pub enum BranchState {
    /// Checked-out branch name, e.g. `feature/x`
    Branch(String),
    /// Detached HEAD, no branch name available
    Detached,
}

/// Return the branch state of the repository enclosing the working directory.
pub fn branch_state() -> Result<BranchState> {
    let name = git(&["rev-parse", "--abbrev-ref", "HEAD"])
        .context("Failed to read current branch (not inside a git repository?)")?;
    // rev-parse prints the literal "HEAD" when detached
    if name == "HEAD" {
        Ok(BranchState::Detached)
    } else {
        Ok(BranchState::Branch(name))
    }
}

/// Return the top-level directory of the enclosing repository.
pub fn toplevel() -> Result<PathBuf> {
    let path = git(&["rev-parse", "--show-toplevel"])
        .context("Failed to locate repository root (not inside a git repository?)")?;
    Ok(PathBuf::from(path))
}

fn git(args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .output()
        .context("Failed to run git")?;
    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
