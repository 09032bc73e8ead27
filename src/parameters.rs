multiversx_sc::imports!();

use crate::access_control;
use crate::errors::*;
use crate::pause;
use crate::types::{ParameterKind, Role};

// ============================================================
// Known parameter keys and their defaults
// ============================================================

pub const VOTING_PERIOD_KEY: &[u8] = b"votingPeriod";
pub const TIMELOCK_PERIOD_KEY: &[u8] = b"timelockPeriod";
pub const QUORUM_BPS_KEY: &[u8] = b"quorumBps";
pub const MAJORITY_THRESHOLD_BPS_KEY: &[u8] = b"majorityThresholdBps";
pub const MIN_PROPOSAL_THRESHOLD_KEY: &[u8] = b"minProposalThreshold";
pub const AGENT_ACTION_COOLDOWN_KEY: &[u8] = b"agentActionCooldown";
pub const MIN_STAKE_DURATION_KEY: &[u8] = b"minStakeDuration";
pub const EARLY_UNSTAKE_PENALTY_BPS_KEY: &[u8] = b"earlyUnstakePenaltyBps";

/// 7 days in seconds
pub const DEFAULT_VOTING_PERIOD: u64 = 604_800;
/// 2 days in seconds
pub const DEFAULT_TIMELOCK_PERIOD: u64 = 172_800;
/// 4% of staked supply must take part
pub const DEFAULT_QUORUM_BPS: u64 = 400;
/// More than 50% of cast votes
pub const DEFAULT_MAJORITY_THRESHOLD_BPS: u64 = 5_000;
/// 1 hour between two actions of the same agent
pub const DEFAULT_AGENT_ACTION_COOLDOWN: u64 = 3_600;
/// 7 days in seconds
pub const DEFAULT_MIN_STAKE_DURATION: u64 = 604_800;
/// 10% kept when unstaking early
pub const DEFAULT_EARLY_UNSTAKE_PENALTY_BPS: u64 = 1_000;

pub const BPS_DENOMINATOR: u64 = 10_000;
/// Upper bound for every duration parameter: 10 years in seconds.
pub const MAX_DURATION: u64 = 315_360_000;

const BPS_KEYS: &[&[u8]] = &[
    QUORUM_BPS_KEY,
    MAJORITY_THRESHOLD_BPS_KEY,
    EARLY_UNSTAKE_PENALTY_BPS_KEY,
];
const PERIOD_KEYS: &[&[u8]] = &[VOTING_PERIOD_KEY, TIMELOCK_PERIOD_KEY];
const DURATION_KEYS: &[&[u8]] = &[
    VOTING_PERIOD_KEY,
    TIMELOCK_PERIOD_KEY,
    AGENT_ACTION_COOLDOWN_KEY,
    MIN_STAKE_DURATION_KEY,
];
const U64_KEYS: &[&[u8]] = &[
    VOTING_PERIOD_KEY,
    TIMELOCK_PERIOD_KEY,
    QUORUM_BPS_KEY,
    MAJORITY_THRESHOLD_BPS_KEY,
    AGENT_ACTION_COOLDOWN_KEY,
    MIN_STAKE_DURATION_KEY,
    EARLY_UNSTAKE_PENALTY_BPS_KEY,
];

/// Typed key/value registry for the DAO's tunables.
///
/// A key's type is fixed by its first write. Admins can change values
/// directly; executed proposals targeting the DAO do it through the
/// `Governance` role held by the contract address.
#[multiversx_sc::module]
pub trait ParametersModule: access_control::AccessControlModule + pause::PauseModule {
    #[endpoint(setUintParameter)]
    fn set_uint_parameter(&self, key: ManagedBuffer, value: BigUint) {
        self.require_parameter_setter();
        self.validate_uint_parameter(&key, &value);
        self.claim_parameter_kind(&key, ParameterKind::Uint);

        self.uint_parameter(&key).set(&value);
        self.uint_parameter_set_event(&key, &value);
    }

    #[endpoint(setBoolParameter)]
    fn set_bool_parameter(&self, key: ManagedBuffer, value: bool) {
        self.require_parameter_setter();
        self.claim_parameter_kind(&key, ParameterKind::Bool);

        self.bool_parameter(&key).set(value);
        self.bool_parameter_set_event(&key, value);
    }

    #[endpoint(setAddressParameter)]
    fn set_address_parameter(&self, key: ManagedBuffer, value: ManagedAddress) {
        self.require_parameter_setter();
        self.claim_parameter_kind(&key, ParameterKind::Address);

        self.address_parameter(&key).set(&value);
        self.address_parameter_set_event(&key, &value);
    }

    #[endpoint(setStringParameter)]
    fn set_string_parameter(&self, key: ManagedBuffer, value: ManagedBuffer) {
        self.require_parameter_setter();
        self.claim_parameter_kind(&key, ParameterKind::Text);

        self.string_parameter(&key).set(&value);
        self.string_parameter_set_event(&key, &value);
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getUintParameter)]
    fn get_uint_parameter(&self, key: ManagedBuffer) -> BigUint {
        self.require_parameter_kind(&key, ParameterKind::Uint);
        self.uint_parameter(&key).get()
    }

    #[view(getBoolParameter)]
    fn get_bool_parameter(&self, key: ManagedBuffer) -> bool {
        self.require_parameter_kind(&key, ParameterKind::Bool);
        self.bool_parameter(&key).get()
    }

    #[view(getAddressParameter)]
    fn get_address_parameter(&self, key: ManagedBuffer) -> ManagedAddress {
        self.require_parameter_kind(&key, ParameterKind::Address);
        self.address_parameter(&key).get()
    }

    #[view(getStringParameter)]
    fn get_string_parameter(&self, key: ManagedBuffer) -> ManagedBuffer {
        self.require_parameter_kind(&key, ParameterKind::Text);
        self.string_parameter(&key).get()
    }

    #[view(getParameterKeys)]
    fn get_parameter_keys(&self) -> MultiValueEncoded<MultiValue2<ManagedBuffer, ParameterKind>> {
        let mut result = MultiValueEncoded::new();
        for (key, kind) in self.parameter_kinds().iter() {
            result.push((key, kind).into());
        }
        result
    }

    // ========================================================
    // INTERNAL
    // ========================================================

    /// Seeds the governance defaults. Called once from `init`.
    fn init_parameters(&self, min_proposal_threshold: &BigUint) {
        let defaults: [(&[u8], u64); 7] = [
            (VOTING_PERIOD_KEY, DEFAULT_VOTING_PERIOD),
            (TIMELOCK_PERIOD_KEY, DEFAULT_TIMELOCK_PERIOD),
            (QUORUM_BPS_KEY, DEFAULT_QUORUM_BPS),
            (MAJORITY_THRESHOLD_BPS_KEY, DEFAULT_MAJORITY_THRESHOLD_BPS),
            (AGENT_ACTION_COOLDOWN_KEY, DEFAULT_AGENT_ACTION_COOLDOWN),
            (MIN_STAKE_DURATION_KEY, DEFAULT_MIN_STAKE_DURATION),
            (EARLY_UNSTAKE_PENALTY_BPS_KEY, DEFAULT_EARLY_UNSTAKE_PENALTY_BPS),
        ];
        for (key, value) in defaults.iter() {
            let key = ManagedBuffer::from(*key);
            self.parameter_kinds().insert(key.clone(), ParameterKind::Uint);
            self.uint_parameter(&key).set(BigUint::from(*value));
        }

        let key = ManagedBuffer::from(MIN_PROPOSAL_THRESHOLD_KEY);
        self.parameter_kinds().insert(key.clone(), ParameterKind::Uint);
        self.uint_parameter(&key).set(min_proposal_threshold);
    }

    fn uint_param(&self, key: &[u8]) -> BigUint {
        self.uint_parameter(&ManagedBuffer::from(key)).get()
    }

    fn uint_param_u64(&self, key: &[u8]) -> u64 {
        match self.uint_param(key).to_u64() {
            Some(value) => value,
            None => sc_panic!(ERR_PARAMETER_OUT_OF_RANGE),
        }
    }

    fn require_parameter_setter(&self) {
        self.require_not_paused();
        self.require_any_role(&[Role::Admin, Role::Governance], ERR_CANNOT_SET_PARAMETERS);
    }

    fn claim_parameter_kind(&self, key: &ManagedBuffer, kind: ParameterKind) {
        require!(!key.is_empty(), ERR_EMPTY_KEY);
        match self.parameter_kinds().get(key) {
            Some(existing) => {
                require!(existing == kind, ERR_PARAMETER_TYPE_MISMATCH);
            },
            None => {
                self.parameter_kinds().insert(key.clone(), kind);
            },
        }
    }

    fn require_parameter_kind(&self, key: &ManagedBuffer, kind: ParameterKind) {
        match self.parameter_kinds().get(key) {
            Some(existing) => {
                require!(existing == kind, ERR_PARAMETER_TYPE_MISMATCH);
            },
            None => sc_panic!(ERR_PARAMETER_NOT_FOUND),
        }
    }

    fn validate_uint_parameter(&self, key: &ManagedBuffer, value: &BigUint) {
        if U64_KEYS.iter().any(|k| key == &ManagedBuffer::from(*k)) {
            require!(value.to_u64().is_some(), ERR_PARAMETER_OUT_OF_RANGE);
        }
        if BPS_KEYS.iter().any(|k| key == &ManagedBuffer::from(*k)) {
            require!(*value <= BPS_DENOMINATOR, ERR_INVALID_BPS);
        }
        if PERIOD_KEYS.iter().any(|k| key == &ManagedBuffer::from(*k)) {
            require!(*value > 0u64, ERR_INVALID_PERIOD);
        }
        if DURATION_KEYS.iter().any(|k| key == &ManagedBuffer::from(*k)) {
            require!(*value <= MAX_DURATION, ERR_PARAMETER_OUT_OF_RANGE);
        }
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("uintParameterSet")]
    fn uint_parameter_set_event(&self, #[indexed] key: &ManagedBuffer, value: &BigUint);

    #[event("boolParameterSet")]
    fn bool_parameter_set_event(&self, #[indexed] key: &ManagedBuffer, value: bool);

    #[event("addressParameterSet")]
    fn address_parameter_set_event(&self, #[indexed] key: &ManagedBuffer, value: &ManagedAddress);

    #[event("stringParameterSet")]
    fn string_parameter_set_event(&self, #[indexed] key: &ManagedBuffer, value: &ManagedBuffer);

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("parameterKinds")]
    fn parameter_kinds(&self) -> MapMapper<ManagedBuffer, ParameterKind>;

    #[storage_mapper("uintParameter")]
    fn uint_parameter(&self, key: &ManagedBuffer) -> SingleValueMapper<BigUint>;

    #[storage_mapper("boolParameter")]
    fn bool_parameter(&self, key: &ManagedBuffer) -> SingleValueMapper<bool>;

    #[storage_mapper("addressParameter")]
    fn address_parameter(&self, key: &ManagedBuffer) -> SingleValueMapper<ManagedAddress>;

    #[storage_mapper("stringParameter")]
    fn string_parameter(&self, key: &ManagedBuffer) -> SingleValueMapper<ManagedBuffer>;
}
