//! Run preset manager.
//!
//! Holds named [`RunConfig`]s behind a lock so a host can share one manager
//! between threads. The standard presets are loaded read-only.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{ConfigError, ConfigResult, Validate};
use crate::run::RunConfig;

/// Central registry of named run presets.
///
/// # Example
///
/// ```rust
/// use descent_config::{ConfigManager, RunConfig};
///
/// let manager = ConfigManager::new();
/// let bowl = manager.get("bowl").unwrap();
/// assert_eq!(bowl.function, "quadratic");
///
/// manager.register(RunConfig::new("mine", "booth", 1.0, 1.0)).unwrap();
/// let mut optimizer = manager.get("mine").unwrap().build().unwrap();
/// optimizer.run_to_convergence().unwrap();
/// ```
pub struct ConfigManager {
    /// Presets keyed by name.
    presets: RwLock<HashMap<String, RunConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Creates a manager with the standard presets loaded.
    pub fn new() -> Self {
        let manager = Self::empty();
        manager.load_standard_presets();
        manager
    }

    /// Creates a manager with no presets.
    pub fn empty() -> Self {
        Self {
            presets: RwLock::new(HashMap::new()),
        }
    }

    fn load_standard_presets(&self) {
        for preset in RunConfig::standard_presets() {
            if let Err(e) = self.register(preset) {
                log::warn!("skipping standard preset: {}", e);
            }
        }
    }

    /// Registers a preset, replacing any writable preset of the same name.
    pub fn register(&self, config: RunConfig) -> ConfigResult<()> {
        config.validate_or_error()?;

        let mut presets = self
            .presets
            .write()
            .map_err(|e| ConfigError::Conflict(format!("Lock error: {}", e)))?;

        // Check if read-only config already exists
        if let Some(existing) = presets.get(&config.name) {
            if existing.read_only {
                return Err(ConfigError::ReadOnly {
                    key: config.name.clone(),
                });
            }
        }

        log::debug!("registered preset '{}'", config.name);
        presets.insert(config.name.clone(), config);
        Ok(())
    }

    /// Gets a preset by name.
    pub fn get(&self, name: &str) -> ConfigResult<RunConfig> {
        let presets = self
            .presets
            .read()
            .map_err(|e| ConfigError::Conflict(format!("Lock error: {}", e)))?;

        presets
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::not_found(name))
    }

    /// Preset names, sorted.
    pub fn names(&self) -> ConfigResult<Vec<String>> {
        let presets = self
            .presets
            .read()
            .map_err(|e| ConfigError::Conflict(format!("Lock error: {}", e)))?;

        let mut names: Vec<String> = presets.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// All presets, sorted by name.
    pub fn list(&self) -> ConfigResult<Vec<RunConfig>> {
        let presets = self
            .presets
            .read()
            .map_err(|e| ConfigError::Conflict(format!("Lock error: {}", e)))?;

        let mut configs: Vec<RunConfig> = presets.values().cloned().collect();
        configs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(configs)
    }

    /// Deletes a preset. Returns whether it existed.
    pub fn delete(&self, name: &str) -> ConfigResult<bool> {
        let mut presets = self
            .presets
            .write()
            .map_err(|e| ConfigError::Conflict(format!("Lock error: {}", e)))?;

        if let Some(config) = presets.get(name) {
            if config.read_only {
                return Err(ConfigError::ReadOnly {
                    key: name.to_string(),
                });
            }
        }

        Ok(presets.remove(name).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use descent_math::OptimizerConfig;

    #[test]
    fn test_config_manager_new() {
        let manager = ConfigManager::new();

        assert!(manager.get("bowl").is_ok());
        assert!(manager.get("rosenbrock-momentum").is_ok());
        assert!(manager.get("himmelblau-decay").is_ok());
        assert!(manager.get("unstable-bowl").is_ok());
        assert_eq!(
            manager.names().unwrap().len(),
            RunConfig::standard_presets().len()
        );
    }

    #[test]
    fn test_register_custom_preset() {
        let manager = ConfigManager::new();

        let custom = RunConfig::new("slow-booth", "booth", 3.0, -3.0)
            .with_description("Booth at a tenth of its usual rate")
            .with_optimizer(OptimizerConfig::default().with_learning_rate(0.005));

        manager.register(custom).unwrap();

        let retrieved = manager.get("slow-booth").unwrap();
        assert_eq!(retrieved.optimizer.unwrap().learning_rate, 0.005);
    }

    #[test]
    fn test_writable_preset_can_be_replaced_and_deleted() {
        let manager = ConfigManager::empty();
        manager.register(RunConfig::new("p", "booth", 0.0, 0.0)).unwrap();
        manager.register(RunConfig::new("p", "matyas", 1.0, 1.0)).unwrap();

        assert_eq!(manager.get("p").unwrap().function, "matyas");
        assert!(manager.delete("p").unwrap());
        assert!(!manager.delete("p").unwrap());
    }

    #[test]
    fn test_read_only_preset() {
        let manager = ConfigManager::new();

        let result = manager.register(RunConfig::bowl());
        assert!(matches!(result, Err(ConfigError::ReadOnly { .. })));

        let result = manager.delete("bowl");
        assert!(matches!(result, Err(ConfigError::ReadOnly { .. })));
    }

    #[test]
    fn test_invalid_preset_rejected() {
        let manager = ConfigManager::empty();
        let result = manager.register(RunConfig::new("bad", "quadratic", f64::INFINITY, 0.0));
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
        assert!(manager.names().unwrap().is_empty());
    }

    #[test]
    fn test_config_not_found() {
        let manager = ConfigManager::new();

        let result = manager.get("NONEXISTENT");
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_list_sorted() {
        let manager = ConfigManager::new();

        let names = manager.names().unwrap();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);

        let listed: Vec<String> = manager.list().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(listed, names);
    }
}
