//! Governance proposals
//! Portal table and `add_proposal` argument construction

pub mod portal;
pub mod proposal;

pub use portal::{default_portals, lookup, Portal, ProposalKind};
pub use proposal::{
    build_proposal_args, proposal_call, BodyVersion, ProposalArgs, ProposalBody, ProposalParams,
    ProposalVariant, ADD_PROPOSAL_METHOD,
};
