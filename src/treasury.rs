multiversx_sc::imports!();

use crate::access_control;
use crate::agent_gateway;
use crate::errors::*;
use crate::parameters;
use crate::pause;
use crate::staking;
use crate::types::{AgentActionKind, Asset, Role, SpendingLimit};

/// Length of the AI spending window in seconds.
pub const SPENDING_WINDOW: u64 = 86_400;

/// Multi-asset treasury with per-agent spending limits.
///
/// Balances are tracked internally: only what comes in through
/// `receiveTokens` counts, whatever the account's on-chain balance is.
#[multiversx_sc::module]
pub trait TreasuryModule:
    access_control::AccessControlModule
    + pause::PauseModule
    + parameters::ParametersModule
    + staking::StakingModule
    + agent_gateway::AgentGatewayModule
{
    // ========================================================
    // ENDPOINT: addAsset
    // ========================================================

    #[endpoint(addAsset)]
    fn add_asset(
        &self,
        token_id: EgldOrEsdtTokenIdentifier,
        name: ManagedBuffer,
        symbol: ManagedBuffer,
    ) {
        self.require_not_paused();
        self.require_role(Role::Admin, ERR_NOT_ADMIN);
        require!(token_id.is_valid(), ERR_INVALID_TOKEN);
        require!(
            self.assets(&token_id).is_empty(),
            ERR_ASSET_ALREADY_REGISTERED
        );

        let asset = Asset {
            token_id: token_id.clone(),
            name,
            symbol,
            balance: BigUint::zero(),
        };
        self.assets(&token_id).set(&asset);
        self.asset_ids().insert(token_id.clone());

        self.asset_added_event(&token_id, &asset.symbol);
    }

    // ========================================================
    // ENDPOINT: receiveTokens
    // Native and ESDT deposits both go through here.
    // ========================================================

    #[endpoint(receiveTokens)]
    #[payable("*")]
    fn receive_tokens(&self) {
        self.require_not_paused();
        let payment = self.call_value().egld_or_single_esdt();
        require!(payment.amount > 0u64, ERR_ZERO_AMOUNT);

        let mut asset = self.require_asset(&payment.token_identifier);
        asset.balance += &payment.amount;
        self.assets(&payment.token_identifier).set(&asset);

        let caller = self.blockchain().get_caller();
        self.tokens_received_event(&payment.token_identifier, &caller, &payment.amount);
    }

    // ========================================================
    // ENDPOINT: setAISpendingLimit
    // Overwrites any previous limit and resets its counters.
    // ========================================================

    #[endpoint(setAISpendingLimit)]
    fn set_ai_spending_limit(
        &self,
        agent: ManagedAddress,
        token_id: EgldOrEsdtTokenIdentifier,
        daily_limit: BigUint,
        total_limit: BigUint,
    ) {
        self.require_not_paused();
        self.require_role(Role::Admin, ERR_NOT_ADMIN);
        require!(!agent.is_zero(), ERR_ZERO_ADDRESS);
        self.require_asset(&token_id);

        let limit = SpendingLimit {
            daily_limit,
            total_limit,
            spent_today: BigUint::zero(),
            spent_total: BigUint::zero(),
            day_window_start: self.blockchain().get_block_timestamp(),
        };
        self.spending_limits(&agent, &token_id).set(&limit);

        self.spending_limit_set_event(&agent, &token_id, &limit.daily_limit, &limit.total_limit);
    }

    // ========================================================
    // ENDPOINT: executeAISpending
    // All-or-nothing: any failed check leaves the limit untouched.
    // ========================================================

    #[endpoint(executeAISpending)]
    fn execute_ai_spending(
        &self,
        token_id: EgldOrEsdtTokenIdentifier,
        amount: BigUint,
        recipient: ManagedAddress,
        memo: ManagedBuffer,
    ) {
        self.require_not_paused();
        let agent = self.require_role(Role::AiAgent, ERR_NOT_AI_AGENT);
        require!(amount > 0u64, ERR_ZERO_AMOUNT);
        require!(!recipient.is_zero(), ERR_ZERO_ADDRESS);
        self.require_agent_cooldown(&agent);

        let mut asset = self.require_asset(&token_id);
        require!(asset.balance >= amount, ERR_INSUFFICIENT_TREASURY_BALANCE);

        require!(
            !self.spending_limits(&agent, &token_id).is_empty(),
            ERR_NO_SPENDING_LIMIT
        );
        let now = self.blockchain().get_block_timestamp();
        let mut limit = self.spending_limits(&agent, &token_id).get();
        self.roll_spending_window(&mut limit, now);

        require!(
            &limit.spent_today + &amount <= limit.daily_limit,
            ERR_DAILY_LIMIT_EXCEEDED
        );
        require!(
            &limit.spent_total + &amount <= limit.total_limit,
            ERR_TOTAL_LIMIT_EXCEEDED
        );

        limit.spent_today += &amount;
        limit.spent_total += &amount;
        self.spending_limits(&agent, &token_id).set(&limit);

        asset.balance -= &amount;
        self.assets(&token_id).set(&asset);

        self.send().direct(&recipient, &token_id, 0, &amount);

        let spend_ordinal = self
            .agent_action_kind_count(&agent, AgentActionKind::Spend)
            .get();
        self.record_agent_action(&agent, AgentActionKind::Spend, spend_ordinal, memo.clone());

        self.ai_spending_event(&agent, &token_id, &recipient, &amount, &memo);
    }

    // ========================================================
    // ENDPOINT: emergencyWithdraw
    // Guardian-only. Ignores spending limits.
    // ========================================================

    #[endpoint(emergencyWithdraw)]
    fn emergency_withdraw(
        &self,
        token_id: EgldOrEsdtTokenIdentifier,
        amount: BigUint,
        recipient: ManagedAddress,
    ) {
        self.require_not_paused();
        let guardian = self.require_role(Role::Guardian, ERR_NOT_GUARDIAN);
        require!(amount > 0u64, ERR_ZERO_AMOUNT);
        require!(!recipient.is_zero(), ERR_ZERO_ADDRESS);

        self.debit_asset(&token_id, &amount);
        self.send().direct(&recipient, &token_id, 0, &amount);

        self.emergency_withdrawal_event(&guardian, &token_id, &recipient, &amount);
    }

    // ========================================================
    // ENDPOINT: sweepPenaltiesToTreasury
    // Moves retained early-unstake penalties into the stake token asset.
    // ========================================================

    #[endpoint(sweepPenaltiesToTreasury)]
    fn sweep_penalties_to_treasury(&self) {
        self.require_not_paused();
        self.require_role(Role::Admin, ERR_NOT_ADMIN);

        let penalties = self.retained_penalties().get();
        require!(penalties > 0u64, ERR_NO_PENALTIES);

        let token_id = self.stake_token().get();
        let mut asset = self.require_asset(&token_id);
        asset.balance += &penalties;
        self.assets(&token_id).set(&asset);
        self.retained_penalties().clear();

        self.penalties_swept_event(&token_id, &penalties);
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getAssetBalance)]
    fn get_asset_balance(&self, token_id: EgldOrEsdtTokenIdentifier) -> BigUint {
        self.require_asset(&token_id).balance
    }

    #[view(getAsset)]
    fn get_asset(&self, token_id: EgldOrEsdtTokenIdentifier) -> OptionalValue<Asset<Self::Api>> {
        if self.assets(&token_id).is_empty() {
            OptionalValue::None
        } else {
            OptionalValue::Some(self.assets(&token_id).get())
        }
    }

    #[view(getAssets)]
    fn get_assets(&self) -> MultiValueEncoded<Asset<Self::Api>> {
        let mut result = MultiValueEncoded::new();
        for token_id in self.asset_ids().iter() {
            result.push(self.assets(&token_id).get());
        }
        result
    }

    /// The limit as the next spend would see it, with the window already rolled.
    #[view(getSpendingLimit)]
    fn get_spending_limit(
        &self,
        agent: ManagedAddress,
        token_id: EgldOrEsdtTokenIdentifier,
    ) -> OptionalValue<SpendingLimit<Self::Api>> {
        if self.spending_limits(&agent, &token_id).is_empty() {
            return OptionalValue::None;
        }

        let mut limit = self.spending_limits(&agent, &token_id).get();
        self.roll_spending_window(&mut limit, self.blockchain().get_block_timestamp());
        OptionalValue::Some(limit)
    }

    // ========================================================
    // INTERNAL
    // ========================================================

    fn require_asset(&self, token_id: &EgldOrEsdtTokenIdentifier) -> Asset<Self::Api> {
        require!(!self.assets(token_id).is_empty(), ERR_ASSET_NOT_FOUND);
        self.assets(token_id).get()
    }

    /// Decrements the tracked balance. Used by withdrawals and proposal execution.
    fn debit_asset(&self, token_id: &EgldOrEsdtTokenIdentifier, amount: &BigUint) {
        let mut asset = self.require_asset(token_id);
        require!(asset.balance >= *amount, ERR_INSUFFICIENT_TREASURY_BALANCE);
        asset.balance -= amount;
        self.assets(token_id).set(&asset);
    }

    /// Resets `spent_today` once `now` has left the current 24h window.
    /// The new window starts on the last whole-day boundary, not at `now`.
    fn roll_spending_window(&self, limit: &mut SpendingLimit<Self::Api>, now: u64) {
        if now < limit.day_window_start + SPENDING_WINDOW {
            return;
        }

        let elapsed_windows = (now - limit.day_window_start) / SPENDING_WINDOW;
        limit.day_window_start += elapsed_windows * SPENDING_WINDOW;
        limit.spent_today = BigUint::zero();
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("assetAdded")]
    fn asset_added_event(
        &self,
        #[indexed] token_id: &EgldOrEsdtTokenIdentifier,
        symbol: &ManagedBuffer,
    );

    #[event("tokensReceived")]
    fn tokens_received_event(
        &self,
        #[indexed] token_id: &EgldOrEsdtTokenIdentifier,
        #[indexed] from: &ManagedAddress,
        amount: &BigUint,
    );

    #[event("spendingLimitSet")]
    fn spending_limit_set_event(
        &self,
        #[indexed] agent: &ManagedAddress,
        #[indexed] token_id: &EgldOrEsdtTokenIdentifier,
        #[indexed] daily_limit: &BigUint,
        total_limit: &BigUint,
    );

    #[event("aiSpending")]
    fn ai_spending_event(
        &self,
        #[indexed] agent: &ManagedAddress,
        #[indexed] token_id: &EgldOrEsdtTokenIdentifier,
        #[indexed] recipient: &ManagedAddress,
        #[indexed] amount: &BigUint,
        memo: &ManagedBuffer,
    );

    #[event("emergencyWithdrawal")]
    fn emergency_withdrawal_event(
        &self,
        #[indexed] guardian: &ManagedAddress,
        #[indexed] token_id: &EgldOrEsdtTokenIdentifier,
        #[indexed] recipient: &ManagedAddress,
        amount: &BigUint,
    );

    #[event("penaltiesSwept")]
    fn penalties_swept_event(&self, #[indexed] token_id: &EgldOrEsdtTokenIdentifier, amount: &BigUint);

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("assets")]
    fn assets(&self, token_id: &EgldOrEsdtTokenIdentifier) -> SingleValueMapper<Asset<Self::Api>>;

    #[storage_mapper("assetIds")]
    fn asset_ids(&self) -> UnorderedSetMapper<EgldOrEsdtTokenIdentifier>;

    #[storage_mapper("spendingLimits")]
    fn spending_limits(
        &self,
        agent: &ManagedAddress,
        token_id: &EgldOrEsdtTokenIdentifier,
    ) -> SingleValueMapper<SpendingLimit<Self::Api>>;
}
