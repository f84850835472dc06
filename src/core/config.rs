use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Portal settings: identity conventions, department mapping, and alert
/// pipeline tunables. Persisted as settings.json.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PortalConfig {
    /// Reserved super-admin address; this exact email always resolves to admin.
    pub super_admin_email: String,
    /// Institutional email domain; any other address on it is a department login.
    pub department_domain: String,
    /// Email local part -> display name of the department.
    pub department_names: HashMap<String, String>,
    /// Department name used when the local part has no mapping.
    pub unassigned_department: String,
    /// Bounded wait for the one-shot geolocation read.
    pub geolocation_timeout_secs: u64,
    /// Origin allowed to call the alert endpoint cross-origin.
    pub allowed_origin: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        let mut department_names = HashMap::new();
        department_names.insert("it".to_string(), "IT Department".to_string());
        department_names.insert("maintenance".to_string(), "Maintenance".to_string());
        department_names.insert("hostel".to_string(), "Hostel Affairs".to_string());
        department_names.insert("academics".to_string(), "Academics".to_string());

        Self {
            super_admin_email: "admin@system.com".to_string(),
            department_domain: "system.com".to_string(),
            department_names,
            unassigned_department: "Unassigned".to_string(),
            geolocation_timeout_secs: 5,
            allowed_origin: "https://portal.system.com".to_string(),
        }
    }
}

impl PortalConfig {
    /// Resolve a department display name from an email local part.
    pub fn department_name(&self, local_part: &str) -> String {
        self.department_names
            .get(&local_part.to_lowercase())
            .cloned()
            .unwrap_or_else(|| self.unassigned_department.clone())
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(app_config_dir: PathBuf) -> Self {
        Self {
            config_path: app_config_dir.join("settings.json"),
        }
    }

    pub fn load(&self) -> PortalConfig {
        if self.config_path.exists() {
            if let Ok(content) = fs::read_to_string(&self.config_path) {
                if let Ok(config) = serde_json::from_str(&content) {
                    return config;
                }
            }
        }
        PortalConfig::default()
    }

    pub fn save(&self, config: &PortalConfig) -> io::Result<()> {
        // Ensure directory exists
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_department_table() {
        let config = PortalConfig::default();
        assert_eq!(config.department_name("hostel"), "Hostel Affairs");
        assert_eq!(config.department_name("it"), "IT Department");
        assert_eq!(config.department_name("registrar"), "Unassigned");
    }

    #[test]
    fn test_department_name_is_case_insensitive() {
        let config = PortalConfig::default();
        assert_eq!(config.department_name("Hostel"), "Hostel Affairs");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().to_path_buf());

        let default = manager.load();
        assert_eq!(default.geolocation_timeout_secs, 5);

        let mut changed = default.clone();
        changed.geolocation_timeout_secs = 10;
        changed.super_admin_email = "root@system.com".to_string();

        manager.save(&changed).unwrap();
        let loaded = manager.load();

        assert_eq!(loaded.geolocation_timeout_secs, 10);
        assert_eq!(loaded.super_admin_email, "root@system.com");
    }
}
