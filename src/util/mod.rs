pub(crate) fn now_ms() -> i64 {
    if cfg!(target_arch = "wasm32") {
        js_sys::Date::now().round() as i64
    } else {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

/// Counts characters the way the word-count badges do: non-whitespace chars.
pub(crate) fn count_chars(s: &str) -> u32 {
    s.chars().filter(|c| !c.is_whitespace()).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_chars_ignores_whitespace() {
        assert_eq!(count_chars("投标 函\n"), 3);
        assert_eq!(count_chars("   "), 0);
    }
}
