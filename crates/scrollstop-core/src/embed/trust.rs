//! Which origins may talk to the page

use url::{Origin, Url};

use crate::{Error, Result};

/// Explicit allow-list of message origins
///
/// Origins are compared as parsed (scheme, host, port) tuples, so
/// `https://instagram.com.evil.example` or `http://instagram.com` never
/// match `https://instagram.com`.
#[derive(Debug, Clone)]
pub struct TrustPolicy {
    allowed: Vec<Origin>,
}

impl TrustPolicy {
    pub fn new<I, S>(origins: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed = Vec::new();
        for origin in origins {
            let url = Url::parse(origin.as_ref())?;
            let parsed = url.origin();
            if !parsed.is_tuple() {
                return Err(Error::Config(format!(
                    "trusted origin has no host: {}",
                    origin.as_ref()
                )));
            }
            allowed.push(parsed);
        }
        Ok(Self { allowed })
    }

    /// Policy that trusts nobody
    pub fn deny_all() -> Self {
        Self {
            allowed: Vec::new(),
        }
    }

    pub fn is_trusted(&self, origin: &str) -> bool {
        if origin.is_empty() {
            return false;
        }
        match Url::parse(origin) {
            Ok(url) => self.allowed.contains(&url.origin()),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instagram() -> TrustPolicy {
        TrustPolicy::new(["https://www.instagram.com", "https://instagram.com"]).unwrap()
    }

    #[test]
    fn test_exact_origins_trusted() {
        let policy = instagram();
        assert!(policy.is_trusted("https://www.instagram.com"));
        assert!(policy.is_trusted("https://instagram.com"));
        // Default port is the same origin
        assert!(policy.is_trusted("https://www.instagram.com:443"));
    }

    #[test]
    fn test_lookalikes_rejected() {
        let policy = instagram();
        assert!(!policy.is_trusted("https://instagram.com.evil.example"));
        assert!(!policy.is_trusted("https://evil-instagram.com"));
        assert!(!policy.is_trusted("http://www.instagram.com"));
        assert!(!policy.is_trusted("https://www.instagram.com:8443"));
        assert!(!policy.is_trusted("null"));
        assert!(!policy.is_trusted(""));
    }

    #[test]
    fn test_invalid_allow_list_entry() {
        assert!(TrustPolicy::new(["not a url"]).is_err());
        assert!(TrustPolicy::new(["data:text/plain,hi"]).is_err());
    }

    #[test]
    fn test_deny_all() {
        assert!(!TrustPolicy::deny_all().is_trusted("https://instagram.com"));
    }
}
