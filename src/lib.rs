#![no_std]

multiversx_sc::imports!();

pub mod access_control;
pub mod agent_gateway;
pub mod errors;
pub mod governance;
pub mod parameters;
pub mod pause;
pub mod staking;
pub mod treasury;
pub mod types;

use errors::{ERR_INVALID_TOKEN, ERR_ZERO_ADDRESS};
use parameters::{
    AGENT_ACTION_COOLDOWN_KEY, EARLY_UNSTAKE_PENALTY_BPS_KEY, MAJORITY_THRESHOLD_BPS_KEY,
    MIN_PROPOSAL_THRESHOLD_KEY, MIN_STAKE_DURATION_KEY, QUORUM_BPS_KEY, TIMELOCK_PERIOD_KEY,
    VOTING_PERIOD_KEY,
};
use types::{DaoConfig, Role};

// ============================================================
// Contract
//
// Staking-weighted governance over a multi-asset treasury, with
// rate-limited, capped spending for autonomous agents.
// ============================================================

#[multiversx_sc::contract]
pub trait AutonomousDao:
    access_control::AccessControlModule
    + pause::PauseModule
    + parameters::ParametersModule
    + staking::StakingModule
    + agent_gateway::AgentGatewayModule
    + treasury::TreasuryModule
    + governance::GovernanceModule
{
    // ========================================================
    // Init / Upgrade
    // ========================================================

    /// The deployer becomes the first admin and the DAO's own address
    /// holds the Governance role, so executed proposals can call back in.
    #[init]
    fn init(
        &self,
        stake_token: EgldOrEsdtTokenIdentifier,
        guardian: ManagedAddress,
        min_proposal_threshold: BigUint,
    ) {
        require!(stake_token.is_valid(), ERR_INVALID_TOKEN);
        require!(!guardian.is_zero(), ERR_ZERO_ADDRESS);

        let caller = self.blockchain().get_caller();
        let own_address = self.blockchain().get_sc_address();

        self.role_members(Role::Admin).insert(caller);
        self.role_members(Role::Governance).insert(own_address);
        self.role_members(Role::Guardian).insert(guardian);

        self.stake_token().set(&stake_token);
        self.total_staked().set(BigUint::zero());
        self.proposal_count().set(0u64);
        self.agent_action_count().set(0u64);
        self.paused().set(false);

        self.init_parameters(&min_proposal_threshold);
    }

    #[upgrade]
    fn upgrade(&self) {}

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getDaoConfig)]
    fn get_dao_config(&self) -> DaoConfig<Self::Api> {
        DaoConfig {
            stake_token: self.stake_token().get(),
            voting_period: self.uint_param_u64(VOTING_PERIOD_KEY),
            timelock_period: self.uint_param_u64(TIMELOCK_PERIOD_KEY),
            quorum_bps: self.uint_param_u64(QUORUM_BPS_KEY),
            majority_threshold_bps: self.uint_param_u64(MAJORITY_THRESHOLD_BPS_KEY),
            min_proposal_threshold: self.uint_param(MIN_PROPOSAL_THRESHOLD_KEY),
            agent_action_cooldown: self.uint_param_u64(AGENT_ACTION_COOLDOWN_KEY),
            min_stake_duration: self.uint_param_u64(MIN_STAKE_DURATION_KEY),
            early_unstake_penalty_bps: self.uint_param_u64(EARLY_UNSTAKE_PENALTY_BPS_KEY),
            paused: self.paused().get(),
        }
    }
}
