//! Block explorer links.

use crate::config::ExplorerConfig;

/// Kind of explorer page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Tx,
    Address,
}

impl LinkKind {
    fn path(self) -> &'static str {
        match self {
            LinkKind::Tx => "tx",
            LinkKind::Address => "address",
        }
    }
}

/// Formats explorer URLs for a configured explorer origin.
#[derive(Debug, Clone)]
pub struct ExplorerLinks {
    base_url: String,
    root_code: String,
}

impl ExplorerLinks {
    pub fn new(config: &ExplorerConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            root_code: config.root_code.clone(),
        }
    }

    /// Link to `id` on the network identified by `network_code`.
    ///
    /// The root network is served without a prefix; every other network
    /// lives under `/<code>/`.
    pub fn link(&self, network_code: &str, id: &str, kind: LinkKind) -> String {
        if network_code == self.root_code {
            format!("{}/{}/{}", self.base_url, kind.path(), id)
        } else {
            format!("{}/{}/{}/{}", self.base_url, network_code, kind.path(), id)
        }
    }
}

impl Default for ExplorerLinks {
    fn default() -> Self {
        Self::new(&ExplorerConfig::default())
    }
}
