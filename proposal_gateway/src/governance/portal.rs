//! Proposal portals: which contract receives the proposal and who sponsors it

use super::proposal::ProposalVariant;
use crate::common::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Proposal schema a portal accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalKind {
    /// V0 body, no labels
    Standard,
    /// V1 body with a linked RFP, category as label
    Infrastructure,
}

/// One proposal portal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portal {
    /// Contract receiving `add_proposal`
    pub contract: String,
    /// Account placed in `requested_sponsor`
    pub requested_sponsor: String,
    /// Body schema
    pub kind: ProposalKind,
}

impl Portal {
    pub fn new(contract: &str, requested_sponsor: &str, kind: ProposalKind) -> Self {
        Self {
            contract: contract.to_string(),
            requested_sponsor: requested_sponsor.to_string(),
            kind,
        }
    }

    /// Variant for this portal; standard portals ignore `linked_rfp`
    pub fn variant(&self, linked_rfp: Option<String>) -> ProposalVariant {
        match self.kind {
            ProposalKind::Standard => ProposalVariant::Standard,
            ProposalKind::Infrastructure => ProposalVariant::Infrastructure { linked_rfp },
        }
    }
}

/// Built-in portal table
pub fn default_portals() -> BTreeMap<String, Portal> {
    BTreeMap::from([
        (
            "devhub".to_string(),
            Portal::new("devhub.near", "neardevdao.near", ProposalKind::Standard),
        ),
        (
            "events".to_string(),
            Portal::new("events-committee.near", "events-committee.near", ProposalKind::Standard),
        ),
        (
            "infrastructure".to_string(),
            Portal::new(
                "infrastructure-committee.near",
                "infrastructure-committee.near",
                ProposalKind::Infrastructure,
            ),
        ),
    ])
}

/// Look up a portal by its route name
pub fn lookup<'a>(portals: &'a BTreeMap<String, Portal>, name: &str) -> Result<&'a Portal> {
    portals
        .get(name)
        .ok_or_else(|| GatewayError::malformed("portal", format!("unknown portal `{}`", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_portals() {
        let portals = default_portals();
        assert_eq!(lookup(&portals, "devhub").unwrap().requested_sponsor, "neardevdao.near");
        assert_eq!(lookup(&portals, "events").unwrap().contract, "events-committee.near");
        assert_eq!(lookup(&portals, "infrastructure").unwrap().kind, ProposalKind::Infrastructure);
        assert!(lookup(&portals, "grants").is_err());
    }

    #[test]
    fn test_standard_portal_drops_linked_rfp() {
        let portals = default_portals();
        let devhub = lookup(&portals, "devhub").unwrap();
        assert_eq!(devhub.variant(Some("rfp-1".into())), ProposalVariant::Standard);

        let infra = lookup(&portals, "infrastructure").unwrap();
        assert_eq!(
            infra.variant(Some("rfp-1".into())),
            ProposalVariant::Infrastructure {
                linked_rfp: Some("rfp-1".into())
            }
        );
    }
}
