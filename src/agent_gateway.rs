multiversx_sc::imports!();

use crate::access_control;
use crate::errors::*;
use crate::parameters::{self, AGENT_ACTION_COOLDOWN_KEY};
use crate::pause;
use crate::types::{AgentAction, AgentActionKind, AgentStats};

/// Rate limiting and the append-only log of agent-originated actions.
///
/// Endpoints that act for an agent call `require_agent_cooldown` before doing
/// anything and `record_agent_action` once the underlying operation went
/// through. A rejected operation reverts the whole transaction, so it never
/// consumes the agent's slot.
#[multiversx_sc::module]
pub trait AgentGatewayModule:
    access_control::AccessControlModule + pause::PauseModule + parameters::ParametersModule
{
    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getAgentStats)]
    fn get_agent_stats(&self, agent: ManagedAddress) -> AgentStats {
        let action_ids = self.agent_action_ids(&agent);
        let last_action_at = if action_ids.is_empty() {
            0
        } else {
            self.agent_actions(action_ids.get(action_ids.len())).get().timestamp
        };

        AgentStats {
            total_actions: action_ids.len() as u64,
            proposals_created: self
                .agent_action_kind_count(&agent, AgentActionKind::ProposalCreate)
                .get(),
            spends_executed: self
                .agent_action_kind_count(&agent, AgentActionKind::Spend)
                .get(),
            last_action_at,
        }
    }

    /// Newest first.
    #[view(getRecentActionsByAgent)]
    fn get_recent_actions_by_agent(
        &self,
        agent: ManagedAddress,
        limit: u64,
    ) -> MultiValueEncoded<AgentAction<Self::Api>> {
        let mut result = MultiValueEncoded::new();
        let action_ids = self.agent_action_ids(&agent);
        let total = action_ids.len();
        let take = core::cmp::min(limit as usize, total);

        for offset in 0..take {
            let action_id = action_ids.get(total - offset);
            result.push(self.agent_actions(action_id).get());
        }
        result
    }

    #[view(getAgentAction)]
    fn get_agent_action(&self, action_id: u64) -> OptionalValue<AgentAction<Self::Api>> {
        if self.agent_actions(action_id).is_empty() {
            OptionalValue::None
        } else {
            OptionalValue::Some(self.agent_actions(action_id).get())
        }
    }

    #[view(getAgentActionCount)]
    fn get_agent_action_count(&self) -> u64 {
        self.agent_action_count().get()
    }

    // ========================================================
    // INTERNAL
    // ========================================================

    fn require_agent_cooldown(&self, agent: &ManagedAddress) {
        let action_ids = self.agent_action_ids(agent);
        if action_ids.is_empty() {
            return;
        }

        let last = self.agent_actions(action_ids.get(action_ids.len())).get();
        let cooldown = self.uint_param_u64(AGENT_ACTION_COOLDOWN_KEY);
        let now = self.blockchain().get_block_timestamp();
        require!(now >= last.timestamp.saturating_add(cooldown), ERR_AGENT_COOLDOWN);
    }

    /// Appends the action and returns its id. Ids start at 0.
    fn record_agent_action(
        &self,
        agent: &ManagedAddress,
        kind: AgentActionKind,
        reference_id: u64,
        details: ManagedBuffer,
    ) -> u64 {
        let action_id = self.agent_action_count().get();
        let timestamp = self.blockchain().get_block_timestamp();

        let action = AgentAction {
            id: action_id,
            agent: agent.clone(),
            kind,
            timestamp,
            reference_id,
            details,
        };

        self.agent_actions(action_id).set(&action);
        self.agent_action_count().set(action_id + 1);
        self.agent_action_ids(agent).push(&action_id);
        self.agent_action_kind_count(agent, kind).update(|count| *count += 1);

        self.agent_action_recorded_event(action_id, agent, kind, reference_id, timestamp);

        action_id
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("agentActionRecorded")]
    fn agent_action_recorded_event(
        &self,
        #[indexed] action_id: u64,
        #[indexed] agent: &ManagedAddress,
        #[indexed] kind: AgentActionKind,
        #[indexed] reference_id: u64,
        timestamp: u64,
    );

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("agentActionCount")]
    fn agent_action_count(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("agentActions")]
    fn agent_actions(&self, action_id: u64) -> SingleValueMapper<AgentAction<Self::Api>>;

    #[storage_mapper("agentActionIds")]
    fn agent_action_ids(&self, agent: &ManagedAddress) -> VecMapper<u64>;

    #[storage_mapper("agentActionKindCount")]
    fn agent_action_kind_count(
        &self,
        agent: &ManagedAddress,
        kind: AgentActionKind,
    ) -> SingleValueMapper<u64>;
}
