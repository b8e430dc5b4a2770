// Messaging deep links for contacting a tutor
//
// Only builds the URI. Launching it (and coping with the app not being
// installed) is left to the platform.

use std::fmt;

pub const DEFAULT_MESSAGING_SCHEME: &str = "whatsapp";

/// `<scheme>://send?phone=<handle>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactLink {
    scheme: String,
    handle: String,
}

impl ContactLink {
    /// The handle is passed through untouched; no format validation is done.
    pub fn new(scheme: &str, handle: &str) -> Self {
        Self {
            scheme: scheme.trim().trim_end_matches("://").to_string(),
            handle: handle.to_string(),
        }
    }

    pub fn whatsapp(handle: &str) -> Self {
        Self::new(DEFAULT_MESSAGING_SCHEME, handle)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn uri(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ContactLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://send?phone={}", self.scheme, self.handle)
    }
}
