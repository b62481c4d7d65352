//! Command assembly for doko.
//!
//! Handlers produce a `ComposeCommand` (the logical tuple: service, container
//! subcommand, runtime flags, environment, subcommand flags, trailing args).
//! `assemble` flattens it into the single `docker-compose run --rm ...` string
//! handed to the executor. All of this is pure string building.

use std::collections::BTreeMap;

/// Fixed invocation prefix for every assembled command.
const COMPOSE_PREFIX: &str = "docker-compose run --rm";

/// A flag entry. `None` marks a boolean flag: the key is emitted alone,
/// with no separator or value.
pub type Flag = (String, Option<String>);

/// Logical command tuple produced by each action handler.
#[derive(Debug, Clone, Default)]
pub struct ComposeCommand {
    /// Compose service to run (e.g. `odoo`).
    pub service: String,
    /// Command the container entrypoint dispatches on (e.g. `odoo`, `migrate`).
    pub subcommand: String,
    /// Flags for `docker-compose run` itself (e.g. port publishing).
    pub runtime_flags: Vec<Flag>,
    /// Environment passed into the container via `-e`.
    pub env: BTreeMap<String, String>,
    /// Flags for the container subcommand.
    pub flags: Vec<Flag>,
    /// Trailing positional arguments, passed through verbatim.
    pub args: Vec<String>,
}

impl ComposeCommand {
    pub fn new(service: &str, subcommand: &str) -> Self {
        Self {
            service: service.to_string(),
            subcommand: subcommand.to_string(),
            ..Default::default()
        }
    }

    pub fn runtime_flag(mut self, key: &str, value: Option<&str>) -> Self {
        self.runtime_flags
            .push((key.to_string(), value.map(str::to_string)));
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn flag(mut self, key: &str, value: Option<&str>) -> Self {
        self.flags.push((key.to_string(), value.map(str::to_string)));
        self
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.args.push(arg.to_string());
        self
    }
}

/// Flatten flag entries into a space-joined token string.
///
/// A `None` value emits only the key (the key carries its own dash prefix).
/// A `Some` value emits `key{separator}value`, prepended with the literal
/// `lead` token when one is given.
pub fn squash(entries: &[Flag], lead: Option<&str>, separator: &str) -> String {
    entries
        .iter()
        .map(|(key, value)| match value {
            None => key.clone(),
            Some(v) => match lead {
                Some(lead) => format!("{} {}{}{}", lead, key, separator, v),
                None => format!("{}{}{}", key, separator, v),
            },
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the final command string.
///
/// The override environment wins over the handler's own entries on key
/// collision. Empty pieces are skipped so the output never carries doubled
/// spaces.
pub fn assemble(cmd: &ComposeCommand, override_env: &BTreeMap<String, String>) -> String {
    let mut env = cmd.env.clone();
    for (key, value) in override_env {
        env.insert(key.clone(), value.clone());
    }
    let env_entries: Vec<Flag> = env
        .into_iter()
        .map(|(key, value)| (key, Some(value)))
        .collect();

    let pieces = [
        COMPOSE_PREFIX.to_string(),
        squash(&cmd.runtime_flags, None, " "),
        squash(&env_entries, Some("-e"), "="),
        cmd.service.clone(),
        cmd.subcommand.clone(),
        squash(&cmd.flags, None, "="),
        cmd.args.join(" "),
    ];

    pieces
        .iter()
        .filter(|piece| !piece.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}
