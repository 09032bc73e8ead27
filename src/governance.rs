multiversx_sc::imports!();

use crate::access_control;
use crate::agent_gateway;
use crate::errors::*;
use crate::parameters::{
    self, BPS_DENOMINATOR, MAJORITY_THRESHOLD_BPS_KEY, MIN_PROPOSAL_THRESHOLD_KEY, QUORUM_BPS_KEY,
    TIMELOCK_PERIOD_KEY, VOTING_PERIOD_KEY,
};
use crate::pause;
use crate::staking;
use crate::treasury;
use crate::types::{AgentActionKind, Proposal, ProposalStatus, Role, VoteDirection, VoteRecord};

/// Proposal registry and lifecycle.
///
/// The stored status only changes on explicit transitions; while a proposal
/// is stored as Active its effective status is derived from the clock and the
/// tallies (see `effective_status`). Views always report the effective one.
#[multiversx_sc::module]
pub trait GovernanceModule:
    access_control::AccessControlModule
    + pause::PauseModule
    + parameters::ParametersModule
    + staking::StakingModule
    + agent_gateway::AgentGatewayModule
    + treasury::TreasuryModule
{
    // ========================================================
    // ENDPOINT: createProposal
    // Any staker at or above the proposal threshold.
    // ========================================================

    #[endpoint(createProposal)]
    fn create_proposal(
        &self,
        target: ManagedAddress,
        value: BigUint,
        function: ManagedBuffer,
        arguments: ManagedVec<ManagedBuffer>,
        description: ManagedBuffer,
    ) -> u64 {
        self.require_not_paused();
        let caller = self.blockchain().get_caller();

        self.store_new_proposal(&caller, target, value, function, arguments, description, None)
    }

    // ========================================================
    // ENDPOINT: createAIProposal
    // AI agents only, rate limited, optionally under a stricter threshold.
    // ========================================================

    #[endpoint(createAIProposal)]
    fn create_ai_proposal(
        &self,
        target: ManagedAddress,
        value: BigUint,
        function: ManagedBuffer,
        arguments: ManagedVec<ManagedBuffer>,
        description: ManagedBuffer,
        custom_threshold_bps: OptionalValue<u64>,
    ) -> u64 {
        self.create_agent_proposal(
            target,
            value,
            function,
            arguments,
            description,
            ManagedBuffer::new(),
            custom_threshold_bps.into_option(),
        )
    }

    // ========================================================
    // ENDPOINT: submitAITriggeredProposal
    // Same as createAIProposal; the trigger reason lands in the action log.
    // ========================================================

    #[endpoint(submitAITriggeredProposal)]
    fn submit_ai_triggered_proposal(
        &self,
        target: ManagedAddress,
        value: BigUint,
        function: ManagedBuffer,
        arguments: ManagedVec<ManagedBuffer>,
        description: ManagedBuffer,
        trigger_reason: ManagedBuffer,
        custom_threshold_bps: OptionalValue<u64>,
    ) -> u64 {
        self.create_agent_proposal(
            target,
            value,
            function,
            arguments,
            description,
            trigger_reason,
            custom_threshold_bps.into_option(),
        )
    }

    // ========================================================
    // ENDPOINT: vote
    // Weighted by the caller's stake at the time of the vote.
    // ========================================================

    #[endpoint(vote)]
    fn vote(&self, proposal_id: u64, support: bool) {
        self.require_not_paused();
        let caller = self.blockchain().get_caller();
        let mut proposal = self.require_proposal(proposal_id);

        require!(
            proposal.status == ProposalStatus::Active,
            ERR_PROPOSAL_NOT_ACTIVE
        );
        let now = self.blockchain().get_block_timestamp();
        require!(now <= proposal.voting_deadline, ERR_VOTING_CLOSED);
        require!(
            !self.has_voted(proposal_id, &caller).get(),
            ERR_ALREADY_VOTED
        );

        let weight = self.voting_power_of(&caller);
        require!(weight > 0u64, ERR_NO_VOTING_POWER);

        let direction = if support {
            proposal.votes_for += &weight;
            VoteDirection::For
        } else {
            proposal.votes_against += &weight;
            VoteDirection::Against
        };
        proposal.voter_count += 1;

        let vote_record = VoteRecord {
            voter: caller.clone(),
            direction,
            weight: weight.clone(),
            timestamp: now,
        };
        self.vote_records(proposal_id).push(&vote_record);
        self.has_voted(proposal_id, &caller).set(true);
        self.proposals(proposal_id).set(&proposal);

        self.vote_event(proposal_id, &caller, support, &weight);
    }

    // ========================================================
    // ENDPOINT: finalizeProposal
    // Anyone can persist the outcome once voting is over. This is also the
    // call that drops a defeated proposal from the open set.
    // ========================================================

    #[endpoint(finalizeProposal)]
    fn finalize_proposal(&self, proposal_id: u64) -> ProposalStatus {
        self.require_not_paused();
        let mut proposal = self.require_proposal(proposal_id);
        require!(
            proposal.status == ProposalStatus::Active,
            ERR_PROPOSAL_NOT_ACTIVE
        );
        let now = self.blockchain().get_block_timestamp();
        require!(now > proposal.voting_deadline, ERR_VOTING_NOT_ENDED);

        proposal.status = self.tally_outcome(&proposal);
        self.proposals(proposal_id).set(&proposal);
        self.emit_outcome(&proposal);

        proposal.status
    }

    // ========================================================
    // ENDPOINT: queueProposal
    // Succeeded → Queued, starting the time-lock.
    // ========================================================

    #[endpoint(queueProposal)]
    fn queue_proposal(&self, proposal_id: u64) -> u64 {
        self.require_not_paused();
        let mut proposal = self.require_proposal(proposal_id);
        require!(
            self.effective_status(&proposal) == ProposalStatus::Succeeded,
            ERR_PROPOSAL_NOT_SUCCEEDED
        );

        let now = self.blockchain().get_block_timestamp();
        proposal.status = ProposalStatus::Queued;
        proposal.executable_at = now.saturating_add(self.uint_param_u64(TIMELOCK_PERIOD_KEY));
        self.proposals(proposal_id).set(&proposal);

        self.proposal_queued_event(proposal_id, proposal.executable_at);

        proposal.executable_at
    }

    // ========================================================
    // ENDPOINT: executeProposal
    // Tentative → committed: the proposal is marked Executed and the
    // treasury debited before the call; a failing call reverts the whole
    // transaction, leaving the proposal Queued.
    // ========================================================

    #[endpoint(executeProposal)]
    fn execute_proposal(&self, proposal_id: u64) {
        self.require_not_paused();
        let mut proposal = self.require_proposal(proposal_id);
        require!(
            proposal.status != ProposalStatus::Executed,
            ERR_ALREADY_EXECUTED
        );
        require!(
            proposal.status == ProposalStatus::Queued,
            ERR_PROPOSAL_NOT_QUEUED
        );
        let now = self.blockchain().get_block_timestamp();
        require!(now >= proposal.executable_at, ERR_TIMELOCK_ACTIVE);

        if proposal.value > 0u64 {
            self.debit_asset(&EgldOrEsdtTokenIdentifier::egld(), &proposal.value);
        }

        proposal.status = ProposalStatus::Executed;
        self.proposals(proposal_id).set(&proposal);
        self.open_proposals().swap_remove(&proposal_id);

        self.dispatch_call(&proposal);

        let caller = self.blockchain().get_caller();
        self.proposal_executed_event(proposal_id, &caller, &proposal.target, &proposal.value);
    }

    // ========================================================
    // ENDPOINT: cancelProposal
    // Admins and guardians until execution; the proposer while Active.
    // ========================================================

    #[endpoint(cancelProposal)]
    fn cancel_proposal(&self, proposal_id: u64) {
        self.require_not_paused();
        let caller = self.blockchain().get_caller();
        let mut proposal = self.require_proposal(proposal_id);
        let status = self.effective_status(&proposal);

        require!(
            matches!(
                status,
                ProposalStatus::Active | ProposalStatus::Succeeded | ProposalStatus::Queued
            ),
            ERR_NOT_CANCELLABLE
        );

        let privileged =
            self.has_role(Role::Admin, &caller) || self.has_role(Role::Guardian, &caller);
        let proposer_while_active =
            caller == proposal.proposer && status == ProposalStatus::Active;
        require!(privileged || proposer_while_active, ERR_CANNOT_CANCEL);

        proposal.status = ProposalStatus::Cancelled;
        self.proposals(proposal_id).set(&proposal);
        self.open_proposals().swap_remove(&proposal_id);

        self.proposal_cancelled_event(proposal_id, &caller);
    }

    // ========================================================
    // VIEWS: read-only queries
    // ========================================================

    /// The stored record with its effective status.
    #[view(getProposal)]
    fn get_proposal(&self, proposal_id: u64) -> Proposal<Self::Api> {
        let mut proposal = self.require_proposal(proposal_id);
        proposal.status = self.effective_status(&proposal);
        proposal
    }

    #[view(getProposalStatus)]
    fn get_proposal_status(&self, proposal_id: u64) -> ProposalStatus {
        let proposal = self.require_proposal(proposal_id);
        self.effective_status(&proposal)
    }

    #[view(getProposalCount)]
    fn get_proposal_count(&self) -> u64 {
        self.proposal_count().get()
    }

    /// Proposals still moving through the lifecycle (Active, Succeeded, Queued).
    /// Defeated proposals nobody finalized are still in the open set and get
    /// filtered here.
    #[view(getActiveProposals)]
    fn get_active_proposals(&self) -> MultiValueEncoded<Proposal<Self::Api>> {
        let mut result = MultiValueEncoded::new();
        for proposal_id in self.open_proposals().iter() {
            let mut proposal = self.proposals(proposal_id).get();
            proposal.status = self.effective_status(&proposal);
            if !proposal.status.is_terminal() {
                result.push(proposal);
            }
        }
        result
    }

    #[view(getProposalsByProposer)]
    fn get_proposals_by_proposer(&self, proposer: ManagedAddress) -> MultiValueEncoded<u64> {
        let mut result = MultiValueEncoded::new();
        for proposal_id in self.proposer_proposals(&proposer).iter() {
            result.push(proposal_id);
        }
        result
    }

    #[view(getVoteRecords)]
    fn get_vote_records(&self, proposal_id: u64) -> MultiValueEncoded<VoteRecord<Self::Api>> {
        let mut result = MultiValueEncoded::new();
        for record in self.vote_records(proposal_id).iter() {
            result.push(record);
        }
        result
    }

    #[view(hasVoted)]
    fn has_voted_view(&self, proposal_id: u64, voter: ManagedAddress) -> bool {
        self.has_voted(proposal_id, &voter).get()
    }

    // ========================================================
    // INTERNAL: proposal creation
    // ========================================================

    #[allow(clippy::too_many_arguments)]
    fn create_agent_proposal(
        &self,
        target: ManagedAddress,
        value: BigUint,
        function: ManagedBuffer,
        arguments: ManagedVec<ManagedBuffer>,
        description: ManagedBuffer,
        details: ManagedBuffer,
        custom_threshold_bps: Option<u64>,
    ) -> u64 {
        self.require_not_paused();
        let agent = self.require_role(Role::AiAgent, ERR_NOT_AI_AGENT);
        self.require_agent_cooldown(&agent);

        if let Some(threshold) = custom_threshold_bps {
            let default_threshold = self.uint_param_u64(MAJORITY_THRESHOLD_BPS_KEY);
            require!(
                threshold >= default_threshold && threshold <= BPS_DENOMINATOR,
                ERR_INVALID_THRESHOLD
            );
        }

        let proposal_id = self.store_new_proposal(
            &agent,
            target,
            value,
            function,
            arguments,
            description,
            custom_threshold_bps,
        );
        self.record_agent_action(&agent, AgentActionKind::ProposalCreate, proposal_id, details);

        proposal_id
    }

    #[allow(clippy::too_many_arguments)]
    fn store_new_proposal(
        &self,
        proposer: &ManagedAddress,
        target: ManagedAddress,
        value: BigUint,
        function: ManagedBuffer,
        arguments: ManagedVec<ManagedBuffer>,
        description: ManagedBuffer,
        custom_threshold_bps: Option<u64>,
    ) -> u64 {
        require!(!target.is_zero(), ERR_ZERO_ADDRESS);
        let min_power = self.uint_param(MIN_PROPOSAL_THRESHOLD_KEY);
        require!(
            self.voting_power_of(proposer) >= min_power,
            ERR_BELOW_PROPOSAL_THRESHOLD
        );

        let proposal_id = self.proposal_count().get();
        let now = self.blockchain().get_block_timestamp();
        let voting_deadline = now.saturating_add(self.uint_param_u64(VOTING_PERIOD_KEY));
        let agent_originated = self.has_role(Role::AiAgent, proposer);
        let threshold_bps = match custom_threshold_bps {
            Some(threshold) => threshold,
            None => self.uint_param_u64(MAJORITY_THRESHOLD_BPS_KEY),
        };

        let proposal = Proposal {
            id: proposal_id,
            proposer: proposer.clone(),
            target,
            value,
            function,
            arguments,
            description,
            created_at: now,
            voting_deadline,
            executable_at: 0,
            votes_for: BigUint::zero(),
            votes_against: BigUint::zero(),
            voter_count: 0,
            custom_threshold_bps,
            quorum_bps: self.uint_param_u64(QUORUM_BPS_KEY),
            threshold_bps,
            agent_originated,
            status: ProposalStatus::Active,
        };

        self.proposals(proposal_id).set(&proposal);
        self.proposal_count().set(proposal_id + 1);
        self.open_proposals().insert(proposal_id);
        self.proposer_proposals(proposer).push(&proposal_id);

        self.proposal_created_event(proposal_id, proposer, &proposal.target, voting_deadline);

        proposal_id
    }

    // ========================================================
    // INTERNAL: tallying
    // ========================================================

    fn effective_status(&self, proposal: &Proposal<Self::Api>) -> ProposalStatus {
        if proposal.status != ProposalStatus::Active {
            return proposal.status;
        }

        let now = self.blockchain().get_block_timestamp();
        if now <= proposal.voting_deadline {
            return ProposalStatus::Active;
        }

        self.tally_outcome(proposal)
    }

    /// Succeeded iff for > against, quorum of the supply staked at the
    /// deadline took part, and the for-share reaches the proposal's threshold.
    /// Ties never pass. Everything read here is fixed once the deadline is
    /// behind us, so the outcome cannot move afterwards.
    fn tally_outcome(&self, proposal: &Proposal<Self::Api>) -> ProposalStatus {
        let total_votes = &proposal.votes_for + &proposal.votes_against;

        let supply_at_deadline = self.total_staked_at(proposal.voting_deadline);
        let quorum_votes = supply_at_deadline * proposal.quorum_bps / BPS_DENOMINATOR;
        let quorum_met = total_votes >= quorum_votes;

        let threshold_met =
            &proposal.votes_for * BPS_DENOMINATOR >= &total_votes * proposal.threshold_bps;

        if proposal.votes_for > proposal.votes_against && quorum_met && threshold_met {
            ProposalStatus::Succeeded
        } else {
            ProposalStatus::Defeated
        }
    }

    fn emit_outcome(&self, proposal: &Proposal<Self::Api>) {
        match proposal.status {
            ProposalStatus::Succeeded => {
                self.proposal_succeeded_event(proposal.id, &proposal.votes_for);
            },
            ProposalStatus::Defeated => {
                self.open_proposals().swap_remove(&proposal.id);
                self.proposal_defeated_event(proposal.id, &proposal.votes_against);
            },
            _ => {},
        }
    }

    // ========================================================
    // INTERNAL: execution boundary
    // ========================================================

    /// Plain EGLD transfer when no function is set, otherwise a synchronous
    /// call. A failure of the callee fails this transaction.
    fn dispatch_call(&self, proposal: &Proposal<Self::Api>) {
        if proposal.function.is_empty() {
            if proposal.value > 0u64 {
                self.send().direct_egld(&proposal.target, &proposal.value);
            }
            return;
        }

        let mut call = self
            .tx()
            .to(&proposal.target)
            .egld(&proposal.value)
            .raw_call(proposal.function.clone());
        for argument in proposal.arguments.iter() {
            call = call.argument(&*argument);
        }
        call.sync_call();
    }

    fn require_proposal(&self, proposal_id: u64) -> Proposal<Self::Api> {
        require!(
            !self.proposals(proposal_id).is_empty(),
            ERR_PROPOSAL_NOT_FOUND
        );
        self.proposals(proposal_id).get()
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("proposalCreated")]
    fn proposal_created_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] proposer: &ManagedAddress,
        #[indexed] target: &ManagedAddress,
        voting_deadline: u64,
    );

    #[event("vote")]
    fn vote_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] voter: &ManagedAddress,
        #[indexed] support: bool,
        weight: &BigUint,
    );

    #[event("proposalSucceeded")]
    fn proposal_succeeded_event(&self, #[indexed] proposal_id: u64, votes_for: &BigUint);

    #[event("proposalDefeated")]
    fn proposal_defeated_event(&self, #[indexed] proposal_id: u64, votes_against: &BigUint);

    #[event("proposalQueued")]
    fn proposal_queued_event(&self, #[indexed] proposal_id: u64, executable_at: u64);

    #[event("proposalExecuted")]
    fn proposal_executed_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] executor: &ManagedAddress,
        #[indexed] target: &ManagedAddress,
        value: &BigUint,
    );

    #[event("proposalCancelled")]
    fn proposal_cancelled_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] cancelled_by: &ManagedAddress,
    );

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("proposalCount")]
    fn proposal_count(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("proposals")]
    fn proposals(&self, id: u64) -> SingleValueMapper<Proposal<Self::Api>>;

    #[storage_mapper("openProposals")]
    fn open_proposals(&self) -> UnorderedSetMapper<u64>;

    #[storage_mapper("proposerProposals")]
    fn proposer_proposals(&self, proposer: &ManagedAddress) -> VecMapper<u64>;

    #[storage_mapper("voteRecords")]
    fn vote_records(&self, proposal_id: u64) -> VecMapper<VoteRecord<Self::Api>>;

    #[storage_mapper("hasVoted")]
    fn has_voted(&self, proposal_id: u64, voter: &ManagedAddress) -> SingleValueMapper<bool>;
}
