/// CORS configuration parsed from an API's `<cors>` element.
///
/// Defaults (no `<cors>` element, or an element with no attributes)
/// disable CORS entirely — an API with CORS unconfigured behaves exactly
/// as it did before CORS support existed, which is the least surprising
/// default for an artifact format with no schema validation. See
/// DESIGN.md for the Open Question this resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub enabled: bool,
    pub allow_origins: Vec<String>,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
    pub expose_headers: Vec<String>,
    pub allow_credentials: bool,
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allow_origins: Vec::new(),
            allow_methods: vec![
                "GET".to_string(),
                "POST".to_string(),
                "PUT".to_string(),
                "DELETE".to_string(),
                "OPTIONS".to_string(),
            ],
            allow_headers: vec!["Content-Type".to_string(), "Authorization".to_string()],
            expose_headers: Vec::new(),
            allow_credentials: false,
            max_age: Some(3600),
        }
    }
}

impl CorsConfig {
    /// Check whether `origin` is permitted by `allow_origins`, which may
    /// contain exact origins, `*` (match anything), or `*.suffix`
    /// wildcards.
    pub fn origin_allowed(&self, origin: &str) -> bool {
        if !self.enabled {
            return false;
        }
        self.allow_origins.iter().any(|pattern| {
            if pattern == "*" {
                true
            } else if let Some(suffix) = pattern.strip_prefix("*.") {
                origin
                    .strip_prefix("http://")
                    .or_else(|| origin.strip_prefix("https://"))
                    .map(|rest| rest == suffix || rest.ends_with(&format!(".{}", suffix)))
                    .unwrap_or(false)
            } else {
                pattern == origin
            }
        })
    }
}
