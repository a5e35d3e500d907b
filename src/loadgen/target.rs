use reqwest::Url;
use super::LoadTestError;

pub const HOSTNAME_ENV: &str = "SOME_SERVICE_HOSTNAME";
pub const PORT_ENV: &str = "SOME_SERVICE_HOSTPORT";
pub const DEFAULT_HOSTNAME: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;

/// Base address of the service under load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    base: String,
}

impl Target {
    pub fn new(hostname: &str, port: u16) -> Result<Self, LoadTestError> {
        let base = format!("http://{hostname}:{port}");
        Url::parse(&base).map_err(|e| LoadTestError::InvalidTarget(format!("{base}: {e}")))?;
        Ok(Self { base })
    }

    /// Explicit values win over `SOME_SERVICE_HOSTNAME` / `SOME_SERVICE_HOSTPORT`
    /// read through `lookup`, which win over the defaults
    pub fn resolve<F>(
        hostname: Option<String>,
        port: Option<u16>,
        lookup: F,
    ) -> Result<Self, LoadTestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let hostname = hostname
            .or_else(|| lookup(HOSTNAME_ENV).filter(|v| !v.is_empty()))
            .unwrap_or_else(|| DEFAULT_HOSTNAME.to_string());

        let port = match port {
            Some(port) => port,
            None => match lookup(PORT_ENV).filter(|v| !v.is_empty()) {
                Some(raw) => raw
                    .parse()
                    .map_err(|_| LoadTestError::InvalidPort(raw.clone()))?,
                None => DEFAULT_PORT,
            },
        };

        Self::new(&hostname, port)
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn document_url(&self, document_id: i32) -> String {
        format!("{}/api/documents/{}", self.base, document_id)
    }

    pub fn documents_url(&self) -> String {
        format!("{}/api/documents/", self.base)
    }
}
