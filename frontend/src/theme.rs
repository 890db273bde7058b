//! Light/dark theme preference, persisted in `localStorage`.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::THEME_STORAGE_KEY;
use crate::error::{AppError, AppResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Icon of the toggle button: the theme you would switch to.
    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value persistence.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
}

/// `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> AppResult<web_sys::Storage> {
        gloo_utils::window()
            .local_storage()
            .map_err(AppError::storage)?
            .ok_or_else(|| AppError::Storage("localStorage is not available".into()))
    }
}

impl PreferenceStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        match Self::storage() {
            Ok(storage) => storage.get_item(key).ok().flatten(),
            Err(e) => {
                log::warn!("Cannot read preference {}: {}", key, e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        Self::storage()?.set_item(key, value).map_err(AppError::storage)
    }
}

/// Current theme, backed by a [`PreferenceStore`].
#[derive(Clone)]
pub struct ThemePreference {
    store: Rc<dyn PreferenceStore>,
    current: Rc<Cell<Theme>>,
}

impl ThemePreference {
    /// Read the stored theme; unknown or missing values fall back to light.
    pub fn load(store: Rc<dyn PreferenceStore>) -> Self {
        let current = match store.get(THEME_STORAGE_KEY) {
            Some(value) => Theme::parse(&value).unwrap_or_else(|| {
                log::warn!("Ignoring unknown theme {:?}", value);
                Theme::default()
            }),
            None => Theme::default(),
        };

        Self {
            store,
            current: Rc::new(Cell::new(current)),
        }
    }

    pub fn current(&self) -> Theme {
        self.current.get()
    }

    /// Switch and persist. The in-memory theme changes even if the write fails.
    pub fn toggle(&self) -> AppResult<Theme> {
        let next = self.current.get().toggled();
        self.current.set(next);
        self.store.set(THEME_STORAGE_KEY, next.as_str())?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore(RefCell<HashMap<String, String>>);

    impl PreferenceStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) -> AppResult<()> {
            self.0.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_defaults_to_light() {
        let store = Rc::new(MemoryStore::default());
        assert_eq!(ThemePreference::load(store).current(), Theme::Light);
    }

    #[test]
    fn test_toggle_persists_under_fixed_key() {
        let store = Rc::new(MemoryStore::default());
        let theme = ThemePreference::load(store.clone());

        assert_eq!(theme.toggle().unwrap(), Theme::Dark);
        assert_eq!(store.get("pdftool-theme").as_deref(), Some("dark"));

        let reloaded = ThemePreference::load(store.clone());
        assert_eq!(reloaded.current(), Theme::Dark);
        assert_eq!(reloaded.toggle().unwrap(), Theme::Light);
        assert_eq!(store.get("pdftool-theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_unknown_value_falls_back() {
        let store = Rc::new(MemoryStore::default());
        store.set(THEME_STORAGE_KEY, "sepia").unwrap();
        assert_eq!(ThemePreference::load(store).current(), Theme::Light);
    }

    #[test]
    fn test_icons() {
        assert_eq!(Theme::Light.icon(), "🌙");
        assert_eq!(Theme::Dark.icon(), "☀️");
        assert_eq!(Theme::Dark.to_string(), "dark");
    }
}
