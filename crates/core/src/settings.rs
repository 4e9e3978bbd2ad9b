use crate::traits::SettingsStore;
use crate::SettingsError;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::debug;

pub const LANGUAGE_KEY: &str = "app_lang";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Language codes offered by the language selector, with their display names.
pub const SUPPORTED_LANGUAGES: [(&str, &str); 10] = [
    ("en", "English"),
    ("hi", "हिन्दी"),
    ("te", "తెలుగు"),
    ("ta", "தமிழ்"),
    ("mr", "मराठी"),
    ("bn", "বাংলা"),
    ("kn", "ಕನ್ನಡ"),
    ("ml", "മലയാളം"),
    ("gu", "ગુજરાતી"),
    ("pa", "ਪੰਜਾਬੀ"),
];

pub fn is_supported_language(code: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|(known, _)| *known == code)
}

#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: HashMap<String, String>,
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Settings kept in a flat JSON object on disk. Every `set` rewrites the file.
#[derive(Debug, Clone)]
pub struct FileSettings {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileSettings {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let values = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, serde_json::to_string_pretty(&self.values)?)?;
        fs::rename(&staging, &self.path)?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }
}

/// The persisted interface language. Changes are written to the store and
/// then broadcast to every subscriber.
pub struct LanguagePreference<S> {
    store: S,
    sender: watch::Sender<String>,
}

impl<S: SettingsStore> LanguagePreference<S> {
    /// Stored codes that are not supported fall back to `DEFAULT_LANGUAGE`.
    pub fn new(store: S) -> Self {
        let current = store
            .get(LANGUAGE_KEY)
            .filter(|code| is_supported_language(code))
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let (sender, _) = watch::channel(current);
        Self { store, sender }
    }

    pub fn current(&self) -> String {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.sender.subscribe()
    }

    pub fn set(&mut self, code: &str) -> Result<(), SettingsError> {
        let code = code.trim();
        if !is_supported_language(code) {
            return Err(SettingsError::UnsupportedLanguage(code.to_string()));
        }

        self.store.set(LANGUAGE_KEY, code)?;
        self.sender.send_replace(code.to_string());
        Ok(())
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
