multiversx_sc::imports!();
multiversx_sc::derive_imports!();

// ============================================================
// Proposal Status: lifecycle states
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum ProposalStatus {
    /// Never persisted: proposals open for voting as soon as they are created.
    Pending,
    /// Voting window open.
    Active,
    /// Window closed without quorum, or the approval threshold was not met.
    Defeated,
    /// Window closed with quorum and threshold met. Waiting to be queued.
    Succeeded,
    /// Time-lock running; executable once `executable_at` is reached.
    Queued,
    /// Call dispatched. Terminal state.
    Executed,
    /// Cancelled by an admin, a guardian or (while Active) the proposer.
    Cancelled,
}

impl ProposalStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProposalStatus::Defeated | ProposalStatus::Executed | ProposalStatus::Cancelled
        )
    }
}

// ============================================================
// Proposal: the core governance record
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct Proposal<M: ManagedTypeApi> {
    pub id: u64,
    pub proposer: ManagedAddress<M>,
    pub target: ManagedAddress<M>,
    /// Native (EGLD) amount sent along with the call, paid from the treasury.
    pub value: BigUint<M>,
    /// Endpoint to call on `target`. Empty means a plain transfer of `value`.
    pub function: ManagedBuffer<M>,
    pub arguments: ManagedVec<M, ManagedBuffer<M>>,
    pub description: ManagedBuffer<M>,
    pub created_at: u64,
    pub voting_deadline: u64,
    /// Stamped by `queueProposal` (0 until then).
    pub executable_at: u64,
    pub votes_for: BigUint<M>,
    pub votes_against: BigUint<M>,
    pub voter_count: u64,
    /// Overrides the default majority threshold for this proposal only.
    pub custom_threshold_bps: Option<u64>,
    /// Quorum in force when the proposal was created.
    pub quorum_bps: u64,
    /// Approval threshold the tally uses: the custom one if set, else the
    /// default in force at creation.
    pub threshold_bps: u64,
    pub agent_originated: bool,
    pub status: ProposalStatus,
}

// ============================================================
// Supply Checkpoint: total staked from `timestamp` on
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct SupplyCheckpoint<M: ManagedTypeApi> {
    pub timestamp: u64,
    pub total_staked: BigUint<M>,
}

// ============================================================
// Vote Record: one entry per voter per proposal
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum VoteDirection {
    For,
    Against,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct VoteRecord<M: ManagedTypeApi> {
    pub voter: ManagedAddress<M>,
    pub direction: VoteDirection,
    pub weight: BigUint<M>,
    pub timestamp: u64,
}

// ============================================================
// Stake
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct Stake<M: ManagedTypeApi> {
    pub amount: BigUint<M>,
    /// Most recent stake call; the holding period runs from here.
    pub timestamp: u64,
}

// ============================================================
// Treasury
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct Asset<M: ManagedTypeApi> {
    pub token_id: EgldOrEsdtTokenIdentifier<M>,
    pub name: ManagedBuffer<M>,
    pub symbol: ManagedBuffer<M>,
    pub balance: BigUint<M>,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct SpendingLimit<M: ManagedTypeApi> {
    pub daily_limit: BigUint<M>,
    pub total_limit: BigUint<M>,
    pub spent_today: BigUint<M>,
    pub spent_total: BigUint<M>,
    pub day_window_start: u64,
}

// ============================================================
// Agent actions
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum AgentActionKind {
    ProposalCreate,
    Spend,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct AgentAction<M: ManagedTypeApi> {
    pub id: u64,
    pub agent: ManagedAddress<M>,
    pub kind: AgentActionKind,
    pub timestamp: u64,
    /// Proposal id for `ProposalCreate`, spend ordinal of the agent for `Spend`.
    pub reference_id: u64,
    pub details: ManagedBuffer<M>,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug, Default)]
pub struct AgentStats {
    pub total_actions: u64,
    pub proposals_created: u64,
    pub spends_executed: u64,
    pub last_action_at: u64,
}

// ============================================================
// Access control / parameters
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum Role {
    Admin,
    AiAgent,
    Guardian,
    /// Held by the DAO's own address, so executed proposals can reconfigure it.
    Governance,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum ParameterKind {
    Uint,
    Bool,
    Address,
    Text,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct DaoConfig<M: ManagedTypeApi> {
    pub stake_token: EgldOrEsdtTokenIdentifier<M>,
    pub voting_period: u64,
    pub timelock_period: u64,
    pub quorum_bps: u64,
    pub majority_threshold_bps: u64,
    pub min_proposal_threshold: BigUint<M>,
    pub agent_action_cooldown: u64,
    pub min_stake_duration: u64,
    pub early_unstake_penalty_bps: u64,
    pub paused: bool,
}
