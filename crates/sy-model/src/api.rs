//! API and Resource shapes (C2) — the routable surface of an Artifact
//! Graph, as produced by parsing `<api>` elements under `APIs/`.

use crate::cors::CorsConfig;
use crate::error::ModelError;
use crate::sequence::Sequence;
use crate::uri_template::UriTemplateInfo;
use sy_common::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionType {
    Url,
    Context,
}

impl VersionType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "url" => Some(VersionType::Url),
            "context" => Some(VersionType::Context),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub methods: Vec<String>,
    pub uri_template: UriTemplateInfo,
    pub in_sequence: Sequence,
    pub fault_sequence: Option<Sequence>,
    pub position: Position,
}

impl Resource {
    pub fn accepts(&self, method: &str) -> bool {
        self.methods.iter().any(|m| m.eq_ignore_ascii_case(method))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Api {
    pub name: String,
    pub context: String,
    pub version: Option<String>,
    pub version_type: Option<VersionType>,
    pub resources: Vec<Resource>,
    pub cors: CorsConfig,
    pub position: Position,
}

impl Api {
    /// Validate the invariants that don't depend on sibling APIs: context
    /// shape, version/versionType pairing, resource method lists, and
    /// uniqueness of path+query parameter names isn't re-checked here —
    /// `UriTemplateInfo::parse` already enforces that at construction.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.context.starts_with('/') {
            return Err(ModelError::InvalidContext(self.context.clone()));
        }
        if self.version.is_some() != self.version_type.is_some() {
            return Err(ModelError::VersionMismatch);
        }
        if self.version_type == Some(VersionType::Context) && !self.context.contains("{version}") {
            return Err(ModelError::MissingVersionPlaceholder(self.context.clone()));
        }
        for resource in &self.resources {
            if resource.methods.is_empty() {
                return Err(ModelError::EmptyMethods);
            }
        }
        Ok(())
    }

    /// The effective base path this API is served under, folding in
    /// version per `version_type`:
    /// - `url`: version is inserted as its own path segment after context.
    /// - `context`: the `{version}` placeholder in context is substituted
    ///   with the version (enforced present by `validate()`).
    /// - none: context alone.
    pub fn base_path(&self) -> String {
        match (&self.version, self.version_type) {
            (Some(v), Some(VersionType::Url)) => format!("{}/{}", self.context, v),
            (Some(v), Some(VersionType::Context)) => self.context.replacen("{version}", v, 1),
            _ => self.context.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use sy_common::Position;

    fn pos() -> Position {
        Position::new("test.xml".to_string(), 1, "TestAPI".to_string())
    }

    fn empty_sequence() -> Sequence {
        Sequence {
            name: None,
            mediators: Vec::new(),
            position: pos(),
        }
    }

    fn sample_api(context: &str) -> Api {
        Api {
            name: "TestAPI".to_string(),
            context: context.to_string(),
            version: None,
            version_type: None,
            resources: vec![Resource {
                methods: vec!["GET".to_string()],
                uri_template: UriTemplateInfo {
                    full_template: "/x".to_string(),
                    path_template: "/x".to_string(),
                    path_params: Vec::new(),
                    query_params: IndexMap::new(),
                },
                in_sequence: empty_sequence(),
                fault_sequence: None,
                position: pos(),
            }],
            cors: CorsConfig::default(),
            position: pos(),
        }
    }

    #[test]
    fn rejects_context_without_leading_slash() {
        let api = sample_api("foo");
        assert!(matches!(api.validate(), Err(ModelError::InvalidContext(_))));
    }

    #[test]
    fn url_version_inserts_segment() {
        let mut api = sample_api("/foo");
        api.version = Some("v1".to_string());
        api.version_type = Some(VersionType::Url);
        assert_eq!(api.base_path(), "/foo/v1");
    }

    #[test]
    fn context_version_substitutes_placeholder() {
        let mut api = sample_api("/api/{version}/foo");
        api.version = Some("v1".to_string());
        api.version_type = Some(VersionType::Context);
        assert_eq!(api.base_path(), "/api/v1/foo");
    }

    #[test]
    fn context_version_without_placeholder_is_rejected() {
        let mut api = sample_api("/foo");
        api.version = Some("v1".to_string());
        api.version_type = Some(VersionType::Context);
        assert!(matches!(api.validate(), Err(ModelError::MissingVersionPlaceholder(_))));
    }

    #[test]
    fn version_without_version_type_is_rejected() {
        let mut api = sample_api("/foo");
        api.version = Some("v1".to_string());
        assert!(matches!(api.validate(), Err(ModelError::VersionMismatch)));
    }

    #[test]
    fn resource_accepts_is_case_insensitive() {
        let api = sample_api("/foo");
        assert!(api.resources[0].accepts("get"));
        assert!(!api.resources[0].accepts("post"));
    }
}
