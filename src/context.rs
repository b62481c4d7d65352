//! Invocation context resolution.
//!
//! The context (target database name + override environment) is computed once
//! at startup from the global flags and, when no flag selects a database, the
//! current git branch. Handlers receive it by reference and never mutate it.

use std::collections::BTreeMap;

use anyhow::Result;

use crate::config::Config;
use crate::git::{self, BranchState};

/// Global database-selection and behavior flags, lifted off the CLI.
#[derive(Debug, Clone, Default)]
pub struct ContextFlags {
    pub core: bool,
    pub test: bool,
    pub scratch: bool,
    pub dbname: Option<String>,
    pub nomig: bool,
    pub demo: bool,
}

/// Resolved once per run, consumed by every action handler.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    /// Effective target database name.
    pub db_name: String,
    /// Environment overrides merged into every handler's environment,
    /// winning on key collision.
    pub override_env: BTreeMap<String, String>,
}

impl InvocationContext {
    /// Resolve the context. Git is only consulted when none of the
    /// database-selection flags is set.
    pub fn resolve(flags: &ContextFlags, config: &Config) -> Result<Self> {
        let branch = if flags.core || flags.test || flags.scratch || flags.dbname.is_some() {
            None
        } else {
            Some(git::branch_state()?)
        };
        Ok(Self::resolve_with_branch(flags, config, branch))
    }

    /// Pure resolution given an already-fetched branch state.
    pub fn resolve_with_branch(
        flags: &ContextFlags,
        config: &Config,
        branch: Option<BranchState>,
    ) -> Self {
        let mut override_env = BTreeMap::new();

        let db_name = if flags.core {
            config.core_db().to_string()
        } else if flags.scratch {
            override_env.insert("MIGRATE".to_string(), "false".to_string());
            config.scratch_db().to_string()
        } else if flags.test {
            override_env.insert("MIGRATE".to_string(), "false".to_string());
            config.test_db().to_string()
        } else if let Some(name) = &flags.dbname {
            name.clone()
        } else {
            match branch {
                Some(BranchState::Detached) | None => config.scratch_db().to_string(),
                Some(BranchState::Branch(name)) if name == config.primary_branch() => {
                    config.core_db().to_string()
                }
                Some(BranchState::Branch(name)) => name.replace('/', "-"),
            }
        };

        if flags.nomig {
            override_env.insert("MIGRATE".to_string(), "false".to_string());
        }
        if flags.demo {
            override_env.insert("DEMO".to_string(), "true".to_string());
        }

        InvocationContext {
            db_name,
            override_env,
        }
    }
}
