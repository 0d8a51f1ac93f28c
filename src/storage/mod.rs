use serde::{Deserialize, Serialize};

pub(crate) const UI_PREFS_KEY: &str = "bid_outline_ui_prefs";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct UiPrefs {
    #[serde(default = "default_true")]
    pub show_word_counts: bool,
}

fn default_true() -> bool {
    true
}

impl Default for UiPrefs {
    fn default() -> Self {
        Self {
            show_word_counts: true,
        }
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    if !cfg!(target_arch = "wasm32") {
        return None;
    }
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let storage = local_storage()?;
    let json = storage.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(key, &json);
        }
    }
}

pub(crate) fn load_ui_prefs() -> UiPrefs {
    load_json_from_storage::<UiPrefs>(UI_PREFS_KEY).unwrap_or_default()
}

pub(crate) fn save_ui_prefs(prefs: &UiPrefs) {
    save_json_to_storage(UI_PREFS_KEY, prefs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_prefs_missing_field_defaults_to_visible() {
        let prefs: UiPrefs = serde_json::from_str("{}").expect("prefs should parse");
        assert!(prefs.show_word_counts);
    }

    #[test]
    fn test_load_ui_prefs_without_browser() {
        assert_eq!(load_ui_prefs(), UiPrefs::default());
    }
}
