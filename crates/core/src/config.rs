//! User settings
//!
//! Local preference flags (autosave, validation display, theme, backup
//! schedule) and the storage location, read from and written to a TOML file.

use crate::error::{FormError, FormResult};
use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default settings file name
pub const SETTINGS_FILE_NAME: &str = "formkit.toml";

/// Default accent colour
pub const DEFAULT_ACCENT_COLOR: &str = "#007AFF";

// ============================================================================
// Settings
// ============================================================================

/// User preferences and storage locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Save edits without an explicit save action
    pub autosave_enabled: bool,

    /// Show inline validation state
    pub show_validation: bool,

    /// Title of the template offered first when creating a page
    pub default_template: Option<String>,

    /// How often an export backup is written
    pub backup_frequency: BackupFrequency,

    /// When the last backup was written
    pub last_backup: Option<DateTime<Utc>>,

    /// JSON file backing the store (in-memory when unset)
    pub storage_path: Option<PathBuf>,

    /// Directory receiving backup exports
    pub backup_dir: Option<PathBuf>,

    /// Appearance
    pub theme: Theme,
}

impl Settings {
    /// Create settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file, using defaults when the file is absent
    pub fn load(path: impl AsRef<Path>) -> FormResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|e| FormError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let settings: Settings =
            toml::from_str(&raw).map_err(|e| FormError::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Write settings to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> FormResult<()> {
        let path = path.as_ref();
        self.validate()?;
        let raw =
            toml::to_string_pretty(self).map_err(|e| FormError::InvalidConfig(e.to_string()))?;
        std::fs::write(path, raw).map_err(|e| FormError::FileWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Check the values that have a constrained format
    pub fn validate(&self) -> FormResult<()> {
        if !is_hex_color(&self.theme.accent_color) {
            return Err(FormError::InvalidConfig(format!(
                "accent color '{}' must look like #RRGGBB",
                self.theme.accent_color
            )));
        }
        if matches!(&self.default_template, Some(t) if t.trim().is_empty()) {
            return Err(FormError::InvalidConfig(
                "default template cannot be blank".to_string(),
            ));
        }
        Ok(())
    }

    /// Restore every preference to its default
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether a backup is due at `now`
    pub fn should_backup(&self, now: DateTime<Utc>) -> bool {
        if self.backup_frequency == BackupFrequency::Never {
            return false;
        }
        let Some(last) = self.last_backup else {
            return true;
        };

        match self.backup_frequency {
            BackupFrequency::Daily => last.date_naive() != now.date_naive(),
            BackupFrequency::Weekly => now.signed_duration_since(last) >= chrono::Duration::weeks(1),
            BackupFrequency::Monthly => last
                .checked_add_months(Months::new(1))
                .is_some_and(|due| due <= now),
            BackupFrequency::Never => false,
        }
    }

    /// Record that a backup was written at `at`
    pub fn mark_backed_up(&mut self, at: DateTime<Utc>) {
        self.last_backup = Some(at);
    }

    /// Set the storage path
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Set the backup frequency
    pub fn with_backup_frequency(mut self, frequency: BackupFrequency) -> Self {
        self.backup_frequency = frequency;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            autosave_enabled: true,
            show_validation: true,
            default_template: None,
            backup_frequency: BackupFrequency::Weekly,
            last_backup: None,
            storage_path: None,
            backup_dir: None,
            theme: Theme::default(),
        }
    }
}

// ============================================================================
// Theme
// ============================================================================

/// Appearance preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub dark_mode: bool,
    pub accent_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            dark_mode: false,
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
        }
    }
}

// ============================================================================
// BackupFrequency
// ============================================================================

/// Backup schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupFrequency {
    Daily,
    Weekly,
    Monthly,
    Never,
}

impl BackupFrequency {
    /// Get the display name
    pub fn display_name(&self) -> &'static str {
        match self {
            BackupFrequency::Daily => "Daily",
            BackupFrequency::Weekly => "Weekly",
            BackupFrequency::Monthly => "Monthly",
            BackupFrequency::Never => "Never",
        }
    }

    /// Get all frequencies
    pub fn all() -> &'static [BackupFrequency] {
        &[
            BackupFrequency::Daily,
            BackupFrequency::Weekly,
            BackupFrequency::Monthly,
            BackupFrequency::Never,
        ]
    }
}

impl std::fmt::Display for BackupFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// `#RRGGBB`
fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s.chars().skip(1).all(|c| c.is_ascii_hexdigit())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.autosave_enabled);
        assert!(settings.show_validation);
        assert!(!settings.theme.dark_mode);
        assert_eq!(settings.backup_frequency, BackupFrequency::Weekly);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);

        let mut settings = Settings::new()
            .with_storage_path("/tmp/forms.json")
            .with_backup_frequency(BackupFrequency::Daily);
        settings.theme.dark_mode = true;
        settings.mark_backed_up(at(2024, 5, 1, 8));
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let loaded = Settings::load("/nonexistent/formkit.toml").unwrap();
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "autosave_enabled = false\nbackup_frequency = \"never\"\n").unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert!(!loaded.autosave_enabled);
        assert_eq!(loaded.backup_frequency, BackupFrequency::Never);
        assert_eq!(loaded.theme, Theme::default());
    }

    #[test]
    fn test_invalid_accent_color() {
        let mut settings = Settings::default();
        settings.theme.accent_color = "blue".to_string();
        assert!(matches!(
            settings.validate(),
            Err(FormError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_reset() {
        let mut settings = Settings::default();
        settings.autosave_enabled = false;
        settings.default_template = Some("Contact Form".to_string());
        settings.reset();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_should_backup_schedules() {
        let now = at(2024, 5, 10, 12);
        let mut settings = Settings::default();

        // Never backed up
        assert!(settings.should_backup(now));

        settings.backup_frequency = BackupFrequency::Never;
        assert!(!settings.should_backup(now));

        settings.backup_frequency = BackupFrequency::Daily;
        settings.mark_backed_up(at(2024, 5, 10, 1));
        assert!(!settings.should_backup(now));
        settings.mark_backed_up(at(2024, 5, 9, 23));
        assert!(settings.should_backup(now));

        settings.backup_frequency = BackupFrequency::Weekly;
        settings.mark_backed_up(at(2024, 5, 5, 12));
        assert!(!settings.should_backup(now));
        settings.mark_backed_up(at(2024, 5, 3, 12));
        assert!(settings.should_backup(now));

        settings.backup_frequency = BackupFrequency::Monthly;
        settings.mark_backed_up(at(2024, 4, 20, 12));
        assert!(!settings.should_backup(now));
        settings.mark_backed_up(at(2024, 4, 10, 12));
        assert!(settings.should_backup(now));
    }
}
