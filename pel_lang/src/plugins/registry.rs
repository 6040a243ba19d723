//! Plugin registration and trigger lookup

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::grammar::keywords::is_reserved_word;
use crate::plugins::ExprPlugin;

// === ERRORS ===

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Plugin '{name}' is already registered")]
    DuplicatePlugin { name: String },

    #[error("Plugin '{name}' declares no start tokens")]
    NoStartTokens { name: String },

    #[error("Plugin '{name}' declares an empty start token")]
    EmptyStartToken { name: String },

    #[error("Plugin '{name}' trigger '{trigger}' collides with a reserved word")]
    ReservedTrigger { name: String, trigger: String },
}

// === REGISTRY ===

/// Immutable trigger-to-plugin index consulted at primary position
///
/// Triggers are stored lowercased; candidate order within a trigger is
/// registration order, and the parser takes the first plugin that accepts.
#[derive(Default)]
pub struct PluginRegistry {
    by_trigger: HashMap<String, Vec<Arc<dyn ExprPlugin>>>,
    plugin_names: Vec<String>,
}

impl PluginRegistry {
    pub fn builder() -> PluginRegistryBuilder {
        PluginRegistryBuilder::new()
    }

    /// Plugins registered for `trigger`, in registration order
    pub fn candidates(&self, trigger: &str) -> &[Arc<dyn ExprPlugin>] {
        self.by_trigger
            .get(&trigger.to_lowercase())
            .map(|plugins| plugins.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_trigger(&self, trigger: &str) -> bool {
        self.by_trigger.contains_key(&trigger.to_lowercase())
    }

    pub fn plugin_count(&self) -> usize {
        self.plugin_names.len()
    }

    /// Registered plugin names, in registration order
    pub fn plugin_names(&self) -> &[String] {
        &self.plugin_names
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.plugin_names)
            .field("trigger_count", &self.by_trigger.len())
            .finish()
    }
}

// === BUILDER ===

/// Builds a registry, validating each plugin as it is registered
#[derive(Default)]
pub struct PluginRegistryBuilder {
    by_trigger: HashMap<String, Vec<Arc<dyn ExprPlugin>>>,
    plugin_names: Vec<String>,
}

impl PluginRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin under every trigger it declares
    ///
    /// Triggers are lowercased and de-duplicated per plugin, so declaring
    /// both spellings of a word registers it once.
    pub fn register(mut self, plugin: Arc<dyn ExprPlugin>) -> Result<Self, RegistryError> {
        let name = plugin.name().to_string();
        if self.plugin_names.iter().any(|existing| existing == &name) {
            return Err(RegistryError::DuplicatePlugin { name });
        }

        let declared = plugin.start_tokens();
        if declared.is_empty() {
            return Err(RegistryError::NoStartTokens { name });
        }

        let mut triggers: Vec<String> = Vec::with_capacity(declared.len());
        for trigger in &declared {
            if trigger.trim().is_empty() {
                return Err(RegistryError::EmptyStartToken { name });
            }
            let lowered = trigger.to_lowercase();
            if is_reserved_word(&lowered) {
                return Err(RegistryError::ReservedTrigger {
                    name,
                    trigger: trigger.clone(),
                });
            }
            if !triggers.contains(&lowered) {
                triggers.push(lowered);
            }
        }

        for trigger in triggers {
            self.by_trigger
                .entry(trigger)
                .or_default()
                .push(Arc::clone(&plugin));
        }
        self.plugin_names.push(name);
        Ok(self)
    }

    pub fn build(self) -> PluginRegistry {
        PluginRegistry {
            by_trigger: self.by_trigger,
            plugin_names: self.plugin_names,
        }
    }
}

impl fmt::Debug for PluginRegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistryBuilder")
            .field("plugins", &self.plugin_names)
            .field("trigger_count", &self.by_trigger.len())
            .finish()
    }
}
