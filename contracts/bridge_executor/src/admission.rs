//! Admission gate: authenticates an inbound relay message before its payload
//! reaches the decoder.
//!
//! Each bridge backend proves the origin of a message differently, but the
//! queue only ever sees an authenticated, opaque payload:
//!
//! | Variant        | Transport check            | Origin check                          |
//! |----------------|----------------------------|---------------------------------------|
//! | `Amb`          | caller == AMB endpoint     | source chain id, then message sender  |
//! | `FxPortal`     | caller == FxChild          | explicit `root_message_sender` field  |
//! | `RelayerAlias` | caller == aliased relayer  | implied by the alias                  |
//!
//! Soroban forbids contract re-entry, so a bridge cannot be queried for the
//! message metadata while it is delivering; the authenticated endpoint
//! attests it as part of the delivery call instead.

use soroban_sdk::{contracttype, Address, Bytes, BytesN, Env};

use crate::errors::ExecutorError;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AmbIdentity {
    /// Arbitrary-message-bridge endpoint allowed to deliver.
    pub amb: Address,
    /// Governance controller on the origin chain.
    pub controller: BytesN<32>,
    /// Origin chain identifier.
    pub chain_id: BytesN<32>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FxPortalIdentity {
    /// State-sync receiver predeploy allowed to deliver.
    pub fx_child: Address,
    /// Governance executor on the root chain.
    pub fx_root_sender: BytesN<32>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RelayerAliasIdentity {
    /// Aliased address of the origin-chain governance executor.
    pub relayer: Address,
}

/// Transport-specific identity persisted in the executor configuration.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BridgeIdentity {
    Amb(AmbIdentity),
    FxPortal(FxPortalIdentity),
    RelayerAlias(RelayerAliasIdentity),
}

/// Which delivery entry point a message came through.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transport {
    Amb,
    FxPortal,
    RelayerAlias,
}

/// An inbound message as handed over by a delivery entry point.
///
/// `caller` has already been authenticated with `require_auth`.
#[derive(Clone, Debug)]
pub struct Envelope {
    pub transport: Transport,
    pub caller: Address,
    pub source_chain_id: Option<BytesN<32>>,
    pub sender: Option<BytesN<32>>,
    pub payload: Bytes,
}

/// Capability implemented once per bridge backend.
pub trait AdmissionGate {
    /// Validate `envelope` and release its payload, or fail without side
    /// effects.
    fn admit(&self, envelope: Envelope) -> Result<Bytes, ExecutorError>;
}

impl AdmissionGate for AmbIdentity {
    fn admit(&self, envelope: Envelope) -> Result<Bytes, ExecutorError> {
        if envelope.transport != Transport::Amb || envelope.caller != self.amb {
            return Err(ExecutorError::UnauthorizedTransport);
        }
        if envelope.source_chain_id.as_ref() != Some(&self.chain_id) {
            return Err(ExecutorError::UnauthorizedChainId);
        }
        if envelope.sender.as_ref() != Some(&self.controller) {
            return Err(ExecutorError::UnauthorizedController);
        }
        Ok(envelope.payload)
    }
}

impl AdmissionGate for FxPortalIdentity {
    fn admit(&self, envelope: Envelope) -> Result<Bytes, ExecutorError> {
        if envelope.transport != Transport::FxPortal || envelope.caller != self.fx_child {
            return Err(ExecutorError::UnauthorizedTransport);
        }
        if envelope.sender.as_ref() != Some(&self.fx_root_sender) {
            return Err(ExecutorError::UnauthorizedController);
        }
        Ok(envelope.payload)
    }
}

impl AdmissionGate for RelayerAliasIdentity {
    fn admit(&self, envelope: Envelope) -> Result<Bytes, ExecutorError> {
        if envelope.transport != Transport::RelayerAlias || envelope.caller != self.relayer {
            return Err(ExecutorError::UnauthorizedTransport);
        }
        Ok(envelope.payload)
    }
}

impl AdmissionGate for BridgeIdentity {
    fn admit(&self, envelope: Envelope) -> Result<Bytes, ExecutorError> {
        match self {
            BridgeIdentity::Amb(gate) => gate.admit(envelope),
            BridgeIdentity::FxPortal(gate) => gate.admit(envelope),
            BridgeIdentity::RelayerAlias(gate) => gate.admit(envelope),
        }
    }
}

impl BridgeIdentity {
    /// Endpoint address of the configured transport.
    pub fn endpoint(&self) -> &Address {
        match self {
            BridgeIdentity::Amb(id) => &id.amb,
            BridgeIdentity::FxPortal(id) => &id.fx_child,
            BridgeIdentity::RelayerAlias(id) => &id.relayer,
        }
    }
}

/// Run the configured gate over `envelope`.
pub fn admit(env: &Env, envelope: Envelope) -> Result<Bytes, ExecutorError> {
    let identity = crate::config::bridge_identity(env)?;
    identity.admit(envelope)
}
