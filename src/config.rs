use leptos::logging::warn;

static BACKEND_API_URL: Option<&'static str> = option_env!("BACKEND_API_URL");

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Key under which the bearer token survives reloads.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub backend_url: String,
    pub token_key: &'static str,
}

impl Config {
    pub fn from_env() -> Self {
        Self::resolve(BACKEND_API_URL)
    }

    fn resolve(backend_url: Option<&str>) -> Self {
        let backend_url = match backend_url.map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => {
                warn!("BACKEND_API_URL wasn't set, using {DEFAULT_BACKEND_URL}");
                DEFAULT_BACKEND_URL.to_string()
            }
        };
        Self {
            backend_url,
            token_key: TOKEN_KEY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_localhost() {
        assert_eq!(Config::resolve(None).backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(Config::resolve(Some("  ")).backend_url, DEFAULT_BACKEND_URL);
    }

    #[test]
    fn keeps_configured_url() {
        let config = Config::resolve(Some("https://api.example.com/v1"));
        assert_eq!(config.backend_url, "https://api.example.com/v1");
        assert_eq!(config.token_key, "token");
    }
}
