//! Provider identity.

use std::fmt;

use serde::Serialize;

/// Whether a provider synthesises offers or calls a live API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Mock,
    Live,
}

/// Who produced an offer.
///
/// `name` is stamped into every offer's `price.platform`; `platform` is the
/// short tag live adapters stamp into `operator.platform`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderIdentity {
    pub name: String,
    pub platform: String,
    pub kind: ProviderKind,
}

impl ProviderIdentity {
    /// Identity of a synthetic provider.
    pub fn mock(name: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platform: platform.into(),
            kind: ProviderKind::Mock,
        }
    }

    /// Identity of a live API integration.
    pub fn live(name: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platform: platform.into(),
            kind: ProviderKind::Live,
        }
    }
}

impl fmt::Display for ProviderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
