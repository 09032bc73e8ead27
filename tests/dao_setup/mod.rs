#![allow(dead_code)]

use autonomous_dao::access_control::AccessControlModule;
use autonomous_dao::governance::GovernanceModule;
use autonomous_dao::staking::StakingModule;
use autonomous_dao::treasury::TreasuryModule;
use autonomous_dao::types::{ProposalStatus, Role};
use autonomous_dao::AutonomousDao;
use multiversx_sc::codec::multi_types::OptionalValue;
use multiversx_sc::types::{Address, EgldOrEsdtTokenIdentifier, ManagedBuffer, ManagedVec};
use multiversx_sc_scenario::{
    managed_address, managed_biguint, managed_buffer, managed_token_id, rust_biguint,
    whitebox_legacy::*, DebugApi,
};

pub const WASM_PATH: &str = "output/autonomous-dao.wasm";

pub const GOV_TOKEN: &[u8] = b"GOV-123456";
pub const USDC_TOKEN: &[u8] = b"USDC-abcdef";

pub const DAY: u64 = 86_400;
pub const HOUR: u64 = 3_600;
pub const START: u64 = 1_700_000_000;
pub const MIN_PROPOSAL_THRESHOLD: u64 = 100;

pub const INITIAL_GOV_BALANCE: u64 = 100_000;
pub const INITIAL_EGLD_BALANCE: u64 = 1_000_000;

pub fn gov_token() -> EgldOrEsdtTokenIdentifier<DebugApi> {
    EgldOrEsdtTokenIdentifier::esdt(managed_token_id!(GOV_TOKEN))
}

pub fn usdc_token() -> EgldOrEsdtTokenIdentifier<DebugApi> {
    EgldOrEsdtTokenIdentifier::esdt(managed_token_id!(USDC_TOKEN))
}

pub fn egld() -> EgldOrEsdtTokenIdentifier<DebugApi> {
    EgldOrEsdtTokenIdentifier::egld()
}

pub struct DaoSetup<DaoObjBuilder>
where
    DaoObjBuilder: 'static + Copy + Fn() -> autonomous_dao::ContractObj<DebugApi>,
{
    pub b_mock: BlockchainStateWrapper,
    pub admin: Address,
    pub guardian: Address,
    pub agent: Address,
    pub alice: Address,
    pub bob: Address,
    pub carol: Address,
    pub outsider: Address,
    pub dao_wrapper: ContractObjWrapper<autonomous_dao::ContractObj<DebugApi>, DaoObjBuilder>,
}

impl<DaoObjBuilder> DaoSetup<DaoObjBuilder>
where
    DaoObjBuilder: 'static + Copy + Fn() -> autonomous_dao::ContractObj<DebugApi>,
{
    pub fn new(builder: DaoObjBuilder) -> Self {
        let rust_zero = rust_biguint!(0);
        let mut b_mock = BlockchainStateWrapper::new();

        let admin = b_mock.create_user_account(&rust_biguint!(INITIAL_EGLD_BALANCE));
        let guardian = b_mock.create_user_account(&rust_zero);
        let agent = b_mock.create_user_account(&rust_zero);
        let alice = b_mock.create_user_account(&rust_zero);
        let bob = b_mock.create_user_account(&rust_zero);
        let carol = b_mock.create_user_account(&rust_zero);
        let outsider = b_mock.create_user_account(&rust_zero);

        for holder in [&agent, &alice, &bob, &carol, &outsider] {
            b_mock.set_esdt_balance(holder, GOV_TOKEN, &rust_biguint!(INITIAL_GOV_BALANCE));
        }
        b_mock.set_esdt_balance(&admin, GOV_TOKEN, &rust_biguint!(INITIAL_GOV_BALANCE));
        b_mock.set_esdt_balance(&admin, USDC_TOKEN, &rust_biguint!(INITIAL_GOV_BALANCE));

        let dao_wrapper =
            b_mock.create_sc_account(&rust_zero, Some(&admin), builder, WASM_PATH);

        b_mock.set_block_timestamp(START);

        b_mock
            .execute_tx(&admin, &dao_wrapper, &rust_zero, |sc| {
                sc.init(
                    gov_token(),
                    managed_address!(&guardian),
                    managed_biguint!(MIN_PROPOSAL_THRESHOLD),
                );
            })
            .assert_ok();

        b_mock
            .execute_tx(&admin, &dao_wrapper, &rust_zero, |sc| {
                sc.grant_role(Role::AiAgent, managed_address!(&agent));
            })
            .assert_ok();

        DaoSetup {
            b_mock,
            admin,
            guardian,
            agent,
            alice,
            bob,
            carol,
            outsider,
            dao_wrapper,
        }
    }

    pub fn set_time(&mut self, timestamp: u64) {
        self.b_mock.set_block_timestamp(timestamp);
    }

    pub fn stake(&mut self, who: &Address, amount: u64) -> TxResult {
        self.b_mock.execute_esdt_transfer(
            who,
            &self.dao_wrapper,
            GOV_TOKEN,
            0,
            &rust_biguint!(amount),
            |sc| {
                sc.stake();
            },
        )
    }

    pub fn unstake(&mut self, who: &Address, amount: u64) -> TxResult {
        self.b_mock
            .execute_tx(who, &self.dao_wrapper, &rust_biguint!(0), |sc| {
                sc.unstake(managed_biguint!(amount));
            })
    }

    /// Plain transfer proposal; returns the new id.
    pub fn create_proposal(&mut self, proposer: &Address, target: &Address, value: u64) -> u64 {
        let mut proposal_id = u64::MAX;
        self.b_mock
            .execute_tx(proposer, &self.dao_wrapper, &rust_biguint!(0), |sc| {
                proposal_id = sc.create_proposal(
                    managed_address!(target),
                    managed_biguint!(value),
                    ManagedBuffer::new(),
                    ManagedVec::new(),
                    managed_buffer!(b"pay contributor"),
                );
            })
            .assert_ok();
        proposal_id
    }

    pub fn create_ai_proposal(
        &mut self,
        agent: &Address,
        target: &Address,
        custom_threshold_bps: Option<u64>,
    ) -> TxResult {
        self.b_mock
            .execute_tx(agent, &self.dao_wrapper, &rust_biguint!(0), |sc| {
                let threshold = match custom_threshold_bps {
                    Some(bps) => OptionalValue::Some(bps),
                    None => OptionalValue::None,
                };
                sc.create_ai_proposal(
                    managed_address!(target),
                    managed_biguint!(0),
                    ManagedBuffer::new(),
                    ManagedVec::new(),
                    managed_buffer!(b"rebalance treasury"),
                    threshold,
                );
            })
    }

    pub fn vote(&mut self, voter: &Address, proposal_id: u64, support: bool) -> TxResult {
        self.b_mock
            .execute_tx(voter, &self.dao_wrapper, &rust_biguint!(0), |sc| {
                sc.vote(proposal_id, support);
            })
    }

    pub fn queue(&mut self, caller: &Address, proposal_id: u64) -> TxResult {
        self.b_mock
            .execute_tx(caller, &self.dao_wrapper, &rust_biguint!(0), |sc| {
                sc.queue_proposal(proposal_id);
            })
    }

    pub fn execute(&mut self, caller: &Address, proposal_id: u64) -> TxResult {
        self.b_mock
            .execute_tx(caller, &self.dao_wrapper, &rust_biguint!(0), |sc| {
                sc.execute_proposal(proposal_id);
            })
    }

    pub fn check_status(&mut self, proposal_id: u64, expected: ProposalStatus) {
        self.b_mock
            .execute_query(&self.dao_wrapper, |sc| {
                assert_eq!(sc.get_proposal_status(proposal_id), expected);
            })
            .assert_ok();
    }

    pub fn grant_role(&mut self, role: Role, who: &Address) {
        let admin = self.admin.clone();
        self.b_mock
            .execute_tx(&admin, &self.dao_wrapper, &rust_biguint!(0), |sc| {
                sc.grant_role(role, managed_address!(who));
            })
            .assert_ok();
    }

    /// Registers EGLD as a treasury asset and deposits `amount` into it.
    pub fn fund_egld(&mut self, amount: u64) {
        let admin = self.admin.clone();
        self.b_mock
            .execute_tx(&admin, &self.dao_wrapper, &rust_biguint!(0), |sc| {
                sc.add_asset(egld(), managed_buffer!(b"eGold"), managed_buffer!(b"EGLD"));
            })
            .assert_ok();
        self.b_mock
            .execute_tx(&admin, &self.dao_wrapper, &rust_biguint!(amount), |sc| {
                sc.receive_tokens();
            })
            .assert_ok();
    }

    pub fn set_spending_limit(&mut self, agent: &Address, daily: u64, total: u64) {
        let admin = self.admin.clone();
        self.b_mock
            .execute_tx(&admin, &self.dao_wrapper, &rust_biguint!(0), |sc| {
                sc.set_ai_spending_limit(
                    managed_address!(agent),
                    egld(),
                    managed_biguint!(daily),
                    managed_biguint!(total),
                );
            })
            .assert_ok();
    }

    pub fn ai_spend(&mut self, agent: &Address, amount: u64, recipient: &Address) -> TxResult {
        self.b_mock
            .execute_tx(agent, &self.dao_wrapper, &rust_biguint!(0), |sc| {
                sc.execute_ai_spending(
                    egld(),
                    managed_biguint!(amount),
                    managed_address!(recipient),
                    managed_buffer!(b"compute credits"),
                );
            })
    }

    pub fn check_treasury_balance(&mut self, token: fn() -> EgldOrEsdtTokenIdentifier<DebugApi>, expected: u64) {
        self.b_mock
            .execute_query(&self.dao_wrapper, |sc| {
                assert_eq!(sc.get_asset_balance(token()), managed_biguint!(expected));
            })
            .assert_ok();
    }
}
