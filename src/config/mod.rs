use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_INDENT_UNIT_PX: u32 = 16;
pub(crate) const DEFAULT_INDENT_BASE_PX: u32 = 8;
pub(crate) const DEFAULT_GENERATION_DELAY_MS: u32 = 1500;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct IndentConfig {
    pub unit_px: u32,
    pub base_px: u32,
}

impl Default for IndentConfig {
    fn default() -> Self {
        Self {
            unit_px: DEFAULT_INDENT_UNIT_PX,
            base_px: DEFAULT_INDENT_BASE_PX,
        }
    }
}

/// Runtime settings injected by the hosting page via `window.ENV`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct EnvConfig {
    pub indent: IndentConfig,
    pub generation_delay_ms: u32,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            indent: IndentConfig::default(),
            generation_delay_ms: DEFAULT_GENERATION_DELAY_MS,
        }
    }
}

impl EnvConfig {
    pub fn new() -> Self {
        let mut cfg = Self::default();

        let Some(env) = window_env() else {
            return cfg;
        };

        if let Some(v) = read_u32(&env, "INDENT_UNIT_PX") {
            cfg.indent.unit_px = v;
        }
        if let Some(v) = read_u32(&env, "INDENT_BASE_PX") {
            cfg.indent.base_px = v;
        }
        if let Some(v) = read_u32(&env, "GENERATION_DELAY_MS") {
            cfg.generation_delay_ms = v;
        }

        cfg
    }
}

fn window_env() -> Option<wasm_bindgen::JsValue> {
    // `web_sys::window()` is only meaningful in the browser; native test
    // builds fall back to defaults.
    if !cfg!(target_arch = "wasm32") {
        return None;
    }
    let env = web_sys::window()?.get("ENV")?;
    if env.is_undefined() || !env.is_object() {
        return None;
    }
    Some(env.into())
}

/// Reads `KEY`, then `key`, accepting numbers or numeric strings.
fn read_u32(env: &wasm_bindgen::JsValue, key: &str) -> Option<u32> {
    for k in [key.to_string(), key.to_lowercase()] {
        let Ok(v) = js_sys::Reflect::get(env, &k.as_str().into()) else {
            continue;
        };
        if let Some(n) = v.as_f64() {
            if n.is_finite() && n >= 0.0 {
                return Some(n as u32);
            }
        }
        if let Some(parsed) = v.as_string().and_then(|s| s.trim().parse::<u32>().ok()) {
            return Some(parsed);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_config_defaults_outside_browser() {
        let cfg = EnvConfig::new();
        assert_eq!(cfg, EnvConfig::default());
        assert_eq!(cfg.indent.unit_px, 16);
        assert_eq!(cfg.indent.base_px, 8);
        assert_eq!(cfg.generation_delay_ms, 1500);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_env_config_reads_window_env() {
        let window = web_sys::window().expect("browser window");
        let env = js_sys::Object::new();
        let _ = js_sys::Reflect::set(&env, &"INDENT_UNIT_PX".into(), &24.into());
        let _ = js_sys::Reflect::set(&env, &"generation_delay_ms".into(), &"200".into());
        let _ = js_sys::Reflect::set(&window, &"ENV".into(), &env);

        let cfg = EnvConfig::new();
        assert_eq!(cfg.indent.unit_px, 24);
        assert_eq!(cfg.indent.base_px, DEFAULT_INDENT_BASE_PX);
        assert_eq!(cfg.generation_delay_ms, 200);

        let _ = js_sys::Reflect::delete_property(&window, &"ENV".into());
    }
}
