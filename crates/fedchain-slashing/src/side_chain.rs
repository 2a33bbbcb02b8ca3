//! Side-chain registry and store scoping.
//!
//! Maps a packet's chain selector to the chain name and provides the store
//! namespace under which that chain's slashing state lives. The namespace
//! keeps per-chain key families prefix-contained within the backing store.

use std::collections::BTreeMap;

use fedchain_types::{
    SideChainId, SIDE_CHAIN_ID_BSC, SIDE_CHAIN_ID_CHAPEL, SIDE_CHAIN_ID_RIALTO,
};

#[derive(Clone, Debug, Default)]
pub struct SideChainRegistry {
    chains: BTreeMap<SideChainId, String>,
}

impl SideChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the well-known chains.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SIDE_CHAIN_ID_BSC, "bsc");
        registry.register(SIDE_CHAIN_ID_CHAPEL, "chapel");
        registry.register(SIDE_CHAIN_ID_RIALTO, "rialto");
        registry
    }

    pub fn register(&mut self, id: SideChainId, name: &str) {
        self.chains.insert(id, name.to_string());
    }

    /// Chain name for a packet's selector; `None` for unknown chains.
    pub fn dest_chain_name(&self, id: SideChainId) -> Option<&str> {
        self.chains.get(&id).map(String::as_str)
    }

    /// Store namespace for a side chain's slashing state.
    pub fn store_namespace(chain_name: &str) -> Vec<u8> {
        let mut ns = Vec::with_capacity(3 + chain_name.len() + 1);
        ns.extend_from_slice(b"sc/");
        ns.extend_from_slice(chain_name.as_bytes());
        ns.push(b'/');
        ns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_well_known_chains() {
        let registry = SideChainRegistry::with_defaults();
        assert_eq!(registry.dest_chain_name(SIDE_CHAIN_ID_BSC), Some("bsc"));
        assert_eq!(
            registry.dest_chain_name(SIDE_CHAIN_ID_CHAPEL),
            Some("chapel")
        );
        assert_eq!(
            registry.dest_chain_name(SIDE_CHAIN_ID_RIALTO),
            Some("rialto")
        );
        assert_eq!(registry.dest_chain_name(SideChainId(1)), None);
    }

    #[test]
    fn test_namespaces_do_not_prefix_each_other() {
        let bsc = SideChainRegistry::store_namespace("bsc");
        let chapel = SideChainRegistry::store_namespace("chapel");
        assert!(!bsc.starts_with(&chapel));
        assert!(!chapel.starts_with(&bsc));
        assert_eq!(bsc, b"sc/bsc/".to_vec());
    }
}
