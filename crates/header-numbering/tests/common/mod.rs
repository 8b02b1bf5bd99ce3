// Test infrastructure and utilities for header-numbering tests

#![allow(dead_code)]

use header_numbering::settings::{SETTINGS_DIR, SETTINGS_FILE};
use header_numbering::{Settings, Vault};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builder for a vault of markdown documents in a temporary directory
pub struct VaultBuilder {
    files: Vec<(String, String)>,
    settings: Option<String>,
}

impl VaultBuilder {
    pub fn new() -> Self {
        Self { files: Vec::new(), settings: None }
    }

    pub fn document(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    /// Raw TOML written to the settings file
    pub fn settings_toml(mut self, toml: impl Into<String>) -> Self {
        self.settings = Some(toml.into());
        self
    }

    pub fn settings(self, settings: &Settings) -> Self {
        let toml = toml::to_string_pretty(settings).unwrap();
        self.settings_toml(toml)
    }

    pub fn build(self) -> TestVault {
        let temp = TempDir::new().unwrap();
        for (path, content) in &self.files {
            let full = temp.path().join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(full, content).unwrap();
        }
        if let Some(settings) = &self.settings {
            let dir = temp.path().join(SETTINGS_DIR);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(SETTINGS_FILE), settings).unwrap();
        }
        TestVault { temp }
    }
}

impl Default for VaultBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A built vault; the directory is removed on drop
pub struct TestVault {
    temp: TempDir,
}

impl TestVault {
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn vault(&self) -> Vault {
        Vault::new(self.temp.path())
    }

    pub fn file(&self, path: &str) -> PathBuf {
        self.temp.path().join(path)
    }

    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.file(path)).unwrap()
    }

    pub fn settings(&self) -> Settings {
        Settings::load(self.temp.path()).unwrap()
    }
}

/// Settings with bulk pacing switched off
pub fn fast_settings() -> Settings {
    Settings { bulk: header_numbering::bulk::unpaced(), ..Default::default() }
}
