//! URI template parsing: `/a/{id}/b?q={qVar}&r={rVar}`.

use crate::error::ModelError;
use indexmap::IndexMap;

/// A parsed URI template.
///
/// `query_params` maps the request-visible query key to the variable name
/// it is bound to under `MessageContext.properties["queryParams"]` — for
/// `?q={qVar}` that is `{"q": "qVar"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplateInfo {
    pub full_template: String,
    pub path_template: String,
    pub path_params: Vec<String>,
    pub query_params: IndexMap<String, String>,
}

impl UriTemplateInfo {
    pub fn parse(full_template: &str) -> Result<Self, ModelError> {
        let (path_part, query_part) = match full_template.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (full_template, None),
        };

        let path_params = parse_path_params(full_template, path_part)?;
        let query_params = match query_part {
            Some(q) => parse_query_params(full_template, q)?,
            None => IndexMap::new(),
        };

        Ok(Self {
            full_template: full_template.to_string(),
            path_template: path_part.to_string(),
            path_params,
            query_params,
        })
    }

    /// Reconstruct a full template string from the parsed parts, used to
    /// test that parse-then-reconstruct round-trips to the original.
    pub fn reconstruct_full_template(&self) -> String {
        if self.query_params.is_empty() {
            return self.path_template.clone();
        }
        let query: Vec<String> = self
            .query_params
            .iter()
            .map(|(k, v)| format!("{}={{{}}}", k, v))
            .collect();
        format!("{}?{}", self.path_template, query.join("&"))
    }
}

fn parse_path_params(full: &str, path: &str) -> Result<Vec<String>, ModelError> {
    let mut params = Vec::new();
    for segment in path.split('/') {
        if segment.is_empty() {
            continue;
        }
        if segment.contains('{') || segment.contains('}') {
            if !(segment.starts_with('{') && segment.ends_with('}') && segment.len() > 2) {
                return Err(ModelError::MalformedUriTemplate(
                    full.to_string(),
                    format!("path segment {:?} must be a lone {{name}} placeholder", segment),
                ));
            }
            let name = &segment[1..segment.len() - 1];
            if name.is_empty() || name.contains('{') || name.contains('}') {
                return Err(ModelError::MalformedUriTemplate(
                    full.to_string(),
                    format!("unbalanced braces in path segment {:?}", segment),
                ));
            }
            if params.iter().any(|p: &String| p == name) {
                return Err(ModelError::MalformedUriTemplate(
                    full.to_string(),
                    format!("duplicate path parameter {:?}", name),
                ));
            }
            params.push(name.to_string());
        }
    }
    Ok(params)
}

fn parse_query_params(full: &str, query: &str) -> Result<IndexMap<String, String>, ModelError> {
    let mut map = IndexMap::new();
    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            ModelError::MalformedUriTemplate(
                full.to_string(),
                format!("query component {:?} is missing '='", pair),
            )
        })?;
        if key.is_empty() {
            return Err(ModelError::MalformedUriTemplate(
                full.to_string(),
                "empty query parameter name".to_string(),
            ));
        }
        if !(value.starts_with('{') && value.ends_with('}') && value.len() > 2) {
            return Err(ModelError::MalformedUriTemplate(
                full.to_string(),
                format!("query value for {:?} must be a {{variable}} placeholder", key),
            ));
        }
        let var_name = &value[1..value.len() - 1];
        if var_name.is_empty() || var_name.contains('{') || var_name.contains('}') {
            return Err(ModelError::MalformedUriTemplate(
                full.to_string(),
                format!("unbalanced braces in query value for {:?}", key),
            ));
        }
        if map.contains_key(key) {
            return Err(ModelError::MalformedUriTemplate(
                full.to_string(),
                format!("duplicate query parameter {:?}", key),
            ));
        }
        map.insert(key.to_string(), var_name.to_string());
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_path_and_query_params() {
        let info = UriTemplateInfo::parse("/u/{id}?f={flag}").unwrap();
        assert_eq!(info.path_template, "/u/{id}");
        assert_eq!(info.path_params, vec!["id".to_string()]);
        assert_eq!(info.query_params.get("f"), Some(&"flag".to_string()));
    }

    #[test]
    fn parses_multiple_query_params() {
        let info = UriTemplateInfo::parse("/a/{id}/b?q={qVar}&r={rVar}").unwrap();
        assert_eq!(info.path_params, vec!["id".to_string()]);
        assert_eq!(info.query_params.get("q"), Some(&"qVar".to_string()));
        assert_eq!(info.query_params.get("r"), Some(&"rVar".to_string()));
    }

    #[test]
    fn rejects_duplicate_path_params() {
        let err = UriTemplateInfo::parse("/a/{id}/{id}").unwrap_err();
        assert!(matches!(err, ModelError::MalformedUriTemplate(_, _)));
    }

    #[test]
    fn rejects_duplicate_query_params() {
        let err = UriTemplateInfo::parse("/a?q={x}&q={y}").unwrap_err();
        assert!(matches!(err, ModelError::MalformedUriTemplate(_, _)));
    }

    #[test]
    fn rejects_non_lone_brace_segment() {
        let err = UriTemplateInfo::parse("/a/prefix{id}").unwrap_err();
        assert!(matches!(err, ModelError::MalformedUriTemplate(_, _)));
    }

    #[test]
    fn rejects_unbalanced_braces() {
        assert!(UriTemplateInfo::parse("/a/{id").is_err());
        assert!(UriTemplateInfo::parse("/a?q={x").is_err());
    }

    #[test]
    fn reconstruction_round_trips() {
        let original = "/a/{id}/b?q={qVar}&r={rVar}";
        let parsed = UriTemplateInfo::parse(original).unwrap();
        let reconstructed = parsed.reconstruct_full_template();
        let reparsed = UriTemplateInfo::parse(&reconstructed).unwrap();
        assert_eq!(parsed.path_template, reparsed.path_template);
        assert_eq!(parsed.path_params, reparsed.path_params);
        assert_eq!(parsed.query_params, reparsed.query_params);
    }

    #[test]
    fn no_query_params_is_fine() {
        let info = UriTemplateInfo::parse("/plain/path").unwrap();
        assert!(info.query_params.is_empty());
        assert!(info.path_params.is_empty());
    }
}
