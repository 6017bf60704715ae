use serde::{Deserialize, Serialize};

/// Response of the download request endpoint.
///
/// `redirect_url` may start with a `~` placeholder standing in for the API
/// base URL.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DownloadDescriptor {
    pub redirect_url: String,
}

impl DownloadDescriptor {
    /// Placeholder the server uses for its own base URL.
    pub const PLACEHOLDER: char = '~';

    /// Replaces the placeholder with `base` (trailing slash dropped).
    pub fn resolve(&self, base: &str) -> String {
        self.redirect_url
            .replace(Self::PLACEHOLDER, base.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_substitutes_placeholder() {
        let d = DownloadDescriptor {
            redirect_url: "~/download/?token=abc".to_string(),
        };
        assert_eq!(
            d.resolve("https://arquivos.b3.com.br/api"),
            "https://arquivos.b3.com.br/api/download/?token=abc"
        );
    }

    #[test]
    fn resolve_drops_trailing_slash() {
        let d = DownloadDescriptor {
            redirect_url: "~/file".to_string(),
        };
        assert_eq!(d.resolve("http://127.0.0.1:8080/"), "http://127.0.0.1:8080/file");
    }

    #[test]
    fn resolve_leaves_absolute_urls_alone() {
        let d = DownloadDescriptor {
            redirect_url: "https://cdn.example.com/x.csv".to_string(),
        };
        assert_eq!(d.resolve("https://other"), "https://cdn.example.com/x.csv");
    }
}
