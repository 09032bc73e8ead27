multiversx_sc::imports!();

use crate::access_control;
use crate::errors::*;
use crate::parameters::{self, BPS_DENOMINATOR, EARLY_UNSTAKE_PENALTY_BPS_KEY, MIN_STAKE_DURATION_KEY};
use crate::pause;
use crate::types::{Stake, SupplyCheckpoint};

/// Stake ledger. Voting power is the live staked amount.
///
/// Each change of the total staked supply is checkpointed so governance can
/// read the supply as it stood at a proposal's voting deadline.
///
/// Every stake call restarts the holding period for the whole position:
/// topping up a matured stake makes all of it subject to the early-unstake
/// penalty again.
#[multiversx_sc::module]
pub trait StakingModule:
    access_control::AccessControlModule + pause::PauseModule + parameters::ParametersModule
{
    // ========================================================
    // ENDPOINT: stake
    // ========================================================

    #[endpoint(stake)]
    #[payable("*")]
    fn stake(&self) {
        self.require_not_paused();
        let payment = self.call_value().egld_or_single_esdt();
        require!(
            payment.token_identifier == self.stake_token().get(),
            ERR_WRONG_STAKE_TOKEN
        );
        require!(payment.amount > 0u64, ERR_ZERO_AMOUNT);

        let caller = self.blockchain().get_caller();
        let now = self.blockchain().get_block_timestamp();

        let mut stake = self.get_stake(caller.clone());
        stake.amount += &payment.amount;
        stake.timestamp = now;

        self.stakes(&caller).set(&stake);
        self.total_staked().update(|total| *total += &payment.amount);
        self.record_supply_checkpoint();

        self.staked_event(&caller, &payment.amount, &stake.amount);
    }

    // ========================================================
    // ENDPOINT: unstake
    // Early exits pay the penalty into the retained pool.
    // ========================================================

    #[endpoint(unstake)]
    fn unstake(&self, amount: BigUint) {
        self.require_not_paused();
        require!(amount > 0u64, ERR_ZERO_AMOUNT);

        let caller = self.blockchain().get_caller();
        let mut stake = self.get_stake(caller.clone());
        require!(amount <= stake.amount, ERR_INSUFFICIENT_STAKE);

        let returned = self.compute_unstake_return(&stake, &amount);
        let penalty = &amount - &returned;

        stake.amount -= &amount;
        self.stakes(&caller).set(&stake);
        self.total_staked().update(|total| *total -= &amount);
        self.record_supply_checkpoint();
        if penalty > 0u64 {
            self.retained_penalties().update(|pool| *pool += &penalty);
        }

        if returned > 0u64 {
            let token = self.stake_token().get();
            self.send().direct(&caller, &token, 0, &returned);
        }

        self.unstaked_event(&caller, &amount, &returned, &penalty);
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getStake)]
    fn get_stake(&self, account: ManagedAddress) -> Stake<Self::Api> {
        if self.stakes(&account).is_empty() {
            Stake {
                amount: BigUint::zero(),
                timestamp: 0,
            }
        } else {
            self.stakes(&account).get()
        }
    }

    #[view(getVotingPower)]
    fn get_voting_power(&self, account: ManagedAddress) -> BigUint {
        self.voting_power_of(&account)
    }

    #[view(getTotalStaked)]
    fn get_total_staked(&self) -> BigUint {
        self.total_staked().get()
    }

    /// Total staked supply as of `timestamp` (inclusive).
    #[view(getTotalStakedAt)]
    fn get_total_staked_at(&self, timestamp: u64) -> BigUint {
        self.total_staked_at(timestamp)
    }

    #[view(getRetainedPenalties)]
    fn get_retained_penalties(&self) -> BigUint {
        self.retained_penalties().get()
    }

    /// Amount `account` would receive if it unstaked `amount` right now.
    #[view(getUnstakeReturn)]
    fn get_unstake_return(&self, account: ManagedAddress, amount: BigUint) -> BigUint {
        let stake = self.get_stake(account);
        require!(amount <= stake.amount, ERR_INSUFFICIENT_STAKE);
        self.compute_unstake_return(&stake, &amount)
    }

    #[view(getStakeToken)]
    fn get_stake_token(&self) -> EgldOrEsdtTokenIdentifier {
        self.stake_token().get()
    }

    // ========================================================
    // INTERNAL
    // ========================================================

    fn voting_power_of(&self, account: &ManagedAddress) -> BigUint {
        if self.stakes(account).is_empty() {
            return BigUint::zero();
        }
        self.stakes(account).get().amount
    }

    fn compute_unstake_return(&self, stake: &Stake<Self::Api>, amount: &BigUint) -> BigUint {
        let now = self.blockchain().get_block_timestamp();
        let min_duration = self.uint_param_u64(MIN_STAKE_DURATION_KEY);
        if now >= stake.timestamp.saturating_add(min_duration) {
            return amount.clone();
        }

        let penalty_bps = self.uint_param_u64(EARLY_UNSTAKE_PENALTY_BPS_KEY);
        amount * (BPS_DENOMINATOR - penalty_bps) / BPS_DENOMINATOR
    }

    /// One checkpoint per block timestamp; later changes in the same
    /// block overwrite it.
    fn record_supply_checkpoint(&self) {
        let checkpoint = SupplyCheckpoint {
            timestamp: self.blockchain().get_block_timestamp(),
            total_staked: self.total_staked().get(),
        };

        let mut checkpoints = self.supply_checkpoints();
        let len = checkpoints.len();
        if len > 0 && checkpoints.get(len).timestamp == checkpoint.timestamp {
            checkpoints.set(len, &checkpoint);
        } else {
            checkpoints.push(&checkpoint);
        }
    }

    /// Binary search for the last checkpoint at or before `timestamp`.
    fn total_staked_at(&self, timestamp: u64) -> BigUint {
        let checkpoints = self.supply_checkpoints();
        let mut found = BigUint::zero();
        let mut low = 1usize;
        let mut high = checkpoints.len();

        while low <= high {
            let mid = low + (high - low) / 2;
            let checkpoint = checkpoints.get(mid);
            if checkpoint.timestamp <= timestamp {
                found = checkpoint.total_staked;
                low = mid + 1;
            } else {
                high = mid - 1;
            }
        }
        found
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("staked")]
    fn staked_event(
        &self,
        #[indexed] account: &ManagedAddress,
        #[indexed] amount: &BigUint,
        new_total: &BigUint,
    );

    #[event("unstaked")]
    fn unstaked_event(
        &self,
        #[indexed] account: &ManagedAddress,
        #[indexed] amount: &BigUint,
        #[indexed] returned: &BigUint,
        penalty: &BigUint,
    );

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("stakeToken")]
    fn stake_token(&self) -> SingleValueMapper<EgldOrEsdtTokenIdentifier>;

    #[storage_mapper("stakes")]
    fn stakes(&self, account: &ManagedAddress) -> SingleValueMapper<Stake<Self::Api>>;

    #[storage_mapper("totalStaked")]
    fn total_staked(&self) -> SingleValueMapper<BigUint>;

    #[storage_mapper("supplyCheckpoints")]
    fn supply_checkpoints(&self) -> VecMapper<SupplyCheckpoint<Self::Api>>;

    #[storage_mapper("retainedPenalties")]
    fn retained_penalties(&self) -> SingleValueMapper<BigUint>;
}
