/*
 * attr.rs
 * Copyright (c) 2025 Posit, PBC
 */

use hashlink::LinkedHashMap;

pub fn empty_attr() -> Attr {
    (String::new(), vec![], LinkedHashMap::new())
}

/// Pandoc's `Attr`: (identifier, classes, key-value attributes).
pub type Attr = (String, Vec<String>, LinkedHashMap<String, String>);

pub fn is_empty_attr(attr: &Attr) -> bool {
    attr.0.is_empty() && attr.1.is_empty() && attr.2.is_empty()
}

/// Returns true if the attribute's class list contains `class`.
pub fn has_class(attr: &Attr, class: &str) -> bool {
    attr.1.iter().any(|c| c == class)
}

/// Look up a key-value attribute.
pub fn attr_value<'a>(attr: &'a Attr, key: &str) -> Option<&'a str> {
    attr.2.get(key).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_class_and_attr_value() {
        let mut kvs = LinkedHashMap::new();
        kvs.insert("source".to_string(), "talks.yaml".to_string());
        let attr: Attr = (
            "talks".to_string(),
            vec!["FILTER-inject".to_string(), "wide".to_string()],
            kvs,
        );

        assert!(has_class(&attr, "FILTER-inject"));
        assert!(!has_class(&attr, "FILTER"));
        assert_eq!(attr_value(&attr, "source"), Some("talks.yaml"));
        assert_eq!(attr_value(&attr, "select"), None);
        assert!(!is_empty_attr(&attr));
        assert!(is_empty_attr(&empty_attr()));
    }
}
