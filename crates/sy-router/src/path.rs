//! Translates a parsed `{name}` URI template into axum's `:name` route
//! syntax, and validates declared query parameters against a request.

/// `/u/{id}/b` -> `/u/:id/b`. Non-brace segments pass through unchanged.
pub fn to_axum_path(path_template: &str) -> String {
    path_template
        .split('/')
        .map(|segment| {
            if segment.starts_with('{') && segment.ends_with('}') && segment.len() > 2 {
                format!(":{}", &segment[1..segment.len() - 1])
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Query-parameter validation: a resource with declared query params
/// rejects any request carrying an undeclared key, or missing a declared
/// one. A resource with no declared query params accepts anything.
pub fn validate_query(
    declared: &indexmap::IndexMap<String, String>,
    actual_keys: impl Iterator<Item = String>,
) -> Result<(), String> {
    if declared.is_empty() {
        return Ok(());
    }
    let actual: std::collections::HashSet<String> = actual_keys.collect();
    for key in declared.keys() {
        if !actual.contains(key) {
            return Err(format!("missing required query parameter {key:?}"));
        }
    }
    for key in &actual {
        if !declared.contains_key(key) {
            return Err(format!("undeclared query parameter {key:?}"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn converts_brace_segments() {
        assert_eq!(to_axum_path("/u/{id}/b"), "/u/:id/b");
        assert_eq!(to_axum_path("/plain"), "/plain");
    }

    #[test]
    fn missing_declared_param_is_rejected() {
        let mut declared = IndexMap::new();
        declared.insert("f".to_string(), "flag".to_string());
        let err = validate_query(&declared, std::iter::empty()).unwrap_err();
        assert!(err.contains("missing"));
    }

    #[test]
    fn undeclared_param_is_rejected() {
        let mut declared = IndexMap::new();
        declared.insert("f".to_string(), "flag".to_string());
        let err = validate_query(&declared, vec!["f".to_string(), "bogus".to_string()].into_iter()).unwrap_err();
        assert!(err.contains("undeclared"));
    }

    #[test]
    fn no_declared_params_accepts_anything() {
        let declared = IndexMap::new();
        assert!(validate_query(&declared, vec!["whatever".to_string()].into_iter()).is_ok());
    }
}
