use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{bail, Context, Result};

use bosun_core::write_text_atomic;

/// Named console-command sequences persisted as one JSON document.
///
/// Mutations save the whole document atomically; a missing file on load means
/// an empty library, not an error.
pub struct CommandLibrary {
    path: PathBuf,
    commands: BTreeMap<String, Vec<String>>,
}

impl CommandLibrary {
    pub fn load(path: PathBuf) -> Result<Self> {
        let commands = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str::<BTreeMap<String, Vec<String>>>(&raw)
                .with_context(|| format!("failed to parse command library {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, commands })
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.commands.get(name).map(|steps| steps.as_slice())
    }

    pub fn names(&self) -> Vec<String> {
        self.commands.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Adds or replaces a named command sequence and saves the library.
    pub fn upsert(&mut self, name: &str, steps: Vec<String>) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            bail!("custom command name must be non-empty");
        }
        if steps.is_empty() {
            bail!("custom command '{name}' must have at least one step");
        }
        self.commands.insert(name.to_string(), steps);
        self.save()
    }

    /// Removes a named command sequence; false when the name was unknown.
    pub fn remove(&mut self, name: &str) -> Result<bool> {
        if self.commands.remove(name).is_none() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Renders the library as pretty JSON, the shape operators see on `list`.
    pub fn render(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.commands).context("failed to render command library")
    }

    fn save(&self) -> Result<()> {
        let mut payload = serde_json::to_string_pretty(&self.commands)
            .context("failed to serialize command library")?;
        payload.push('\n');
        write_text_atomic(&self.path, &payload)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}
