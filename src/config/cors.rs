use serde::Deserialize;

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// List of allowed origins for CORS (use ["*"] for all origins)
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// Parse `ALLOWED_ORIGINS`: `*` or a comma-separated list
    pub fn parse(raw: &str) -> Self {
        let allowed_origins = if raw.trim() == "*" {
            vec!["*".to_string()]
        } else {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        };

        Self { allowed_origins }
    }

    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}
