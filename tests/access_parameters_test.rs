mod dao_setup;

use autonomous_dao::access_control::AccessControlModule;
use autonomous_dao::errors::*;
use autonomous_dao::governance::GovernanceModule;
use autonomous_dao::parameters::{
    ParametersModule, MAX_DURATION, MIN_STAKE_DURATION_KEY, QUORUM_BPS_KEY, VOTING_PERIOD_KEY,
};
use autonomous_dao::types::{ParameterKind, Role};
use dao_setup::*;
use multiversx_sc::types::ManagedBuffer;
use multiversx_sc_scenario::{managed_address, managed_biguint, managed_buffer, rust_biguint};

#[test]
fn roles_are_granted_and_revoked() {
    let mut setup = DaoSetup::new(autonomous_dao::contract_obj);
    let admin = setup.admin.clone();
    let alice = setup.alice.clone();
    let bob = setup.bob.clone();

    setup
        .b_mock
        .execute_tx(&alice, &setup.dao_wrapper, &rust_biguint!(0), |sc| {
            sc.grant_role(Role::Guardian, managed_address!(&alice));
        })
        .assert_user_error(ERR_CANNOT_MANAGE_ROLES);

    setup.grant_role(Role::Guardian, &alice);
    setup
        .b_mock
        .execute_tx(&admin, &setup.dao_wrapper, &rust_biguint!(0), |sc| {
            sc.grant_role(Role::Guardian, managed_address!(&alice));
        })
        .assert_user_error(ERR_ROLE_ALREADY_GRANTED);

    setup
        .b_mock
        .execute_tx(&admin, &setup.dao_wrapper, &rust_biguint!(0), |sc| {
            sc.revoke_role(Role::AiAgent, managed_address!(&bob));
        })
        .assert_user_error(ERR_ROLE_NOT_HELD);

    setup
        .b_mock
        .execute_tx(&admin, &setup.dao_wrapper, &rust_biguint!(0), |sc| {
            sc.revoke_role(Role::Guardian, managed_address!(&alice));
        })
        .assert_ok();

    setup
        .b_mock
        .execute_query(&setup.dao_wrapper, |sc| {
            assert!(!sc.has_role_view(Role::Guardian, managed_address!(&alice)));
            assert!(sc.has_role_view(Role::Admin, managed_address!(&admin)));
            assert!(sc.has_role_view(
                Role::Governance,
                managed_address!(setup.dao_wrapper.address_ref())
            ));
            assert_eq!(sc.get_role_members(Role::Guardian).into_iter().count(), 1);
        })
        .assert_ok();
}

#[test]
fn last_admin_stays() {
    let mut setup = DaoSetup::new(autonomous_dao::contract_obj);
    let admin = setup.admin.clone();
    let alice = setup.alice.clone();

    setup
        .b_mock
        .execute_tx(&admin, &setup.dao_wrapper, &rust_biguint!(0), |sc| {
            sc.revoke_role(Role::Admin, managed_address!(&admin));
        })
        .assert_user_error(ERR_LAST_ADMIN);

    setup.grant_role(Role::Admin, &alice);
    setup
        .b_mock
        .execute_tx(&alice, &setup.dao_wrapper, &rust_biguint!(0), |sc| {
            sc.revoke_role(Role::Admin, managed_address!(&admin));
        })
        .assert_ok();
}

#[test]
fn defaults_are_seeded_at_init() {
    let mut setup = DaoSetup::new(autonomous_dao::contract_obj);

    setup
        .b_mock
        .execute_query(&setup.dao_wrapper, |sc| {
            let keys: Vec<_> = sc
                .get_parameter_keys()
                .into_iter()
                .map(|pair| pair.into_tuple())
                .collect();
            assert_eq!(keys.len(), 8);
            assert!(keys.iter().all(|(_, kind)| *kind == ParameterKind::Uint));

            assert_eq!(
                sc.get_uint_parameter(ManagedBuffer::from(VOTING_PERIOD_KEY)),
                managed_biguint!(7 * DAY)
            );
            assert_eq!(
                sc.get_uint_parameter(managed_buffer!(b"minProposalThreshold")),
                managed_biguint!(MIN_PROPOSAL_THRESHOLD)
            );
        })
        .assert_ok();
}

#[test]
fn parameters_keep_their_type() {
    let mut setup = DaoSetup::new(autonomous_dao::contract_obj);
    let admin = setup.admin.clone();
    let carol = setup.carol.clone();

    setup
        .b_mock
        .execute_tx(&admin, &setup.dao_wrapper, &rust_biguint!(0), |sc| {
            sc.set_bool_parameter(managed_buffer!(b"agentSpendingEnabled"), true);
            sc.set_address_parameter(managed_buffer!(b"feeCollector"), managed_address!(&carol));
            sc.set_string_parameter(managed_buffer!(b"charterUri"), managed_buffer!(b"ipfs://dao"));
        })
        .assert_ok();

    setup
        .b_mock
        .execute_tx(&admin, &setup.dao_wrapper, &rust_biguint!(0), |sc| {
            sc.set_uint_parameter(managed_buffer!(b"agentSpendingEnabled"), managed_biguint!(1));
        })
        .assert_user_error(ERR_PARAMETER_TYPE_MISMATCH);

    setup
        .b_mock
        .execute_tx(&admin, &setup.dao_wrapper, &rust_biguint!(0), |sc| {
            sc.set_bool_parameter(ManagedBuffer::new(), true);
        })
        .assert_user_error(ERR_EMPTY_KEY);

    setup
        .b_mock
        .execute_query(&setup.dao_wrapper, |sc| {
            assert!(sc.get_bool_parameter(managed_buffer!(b"agentSpendingEnabled")));
            assert_eq!(
                sc.get_address_parameter(managed_buffer!(b"feeCollector")),
                managed_address!(&carol)
            );
            assert_eq!(
                sc.get_string_parameter(managed_buffer!(b"charterUri")),
                managed_buffer!(b"ipfs://dao")
            );
        })
        .assert_ok();

    setup
        .b_mock
        .execute_query(&setup.dao_wrapper, |sc| {
            let _ = sc.get_uint_parameter(managed_buffer!(b"feeCollector"));
        })
        .assert_user_error(ERR_PARAMETER_TYPE_MISMATCH);

    setup
        .b_mock
        .execute_query(&setup.dao_wrapper, |sc| {
            let _ = sc.get_bool_parameter(managed_buffer!(b"neverSet"));
        })
        .assert_user_error(ERR_PARAMETER_NOT_FOUND);
}

#[test]
fn governance_parameters_are_validated() {
    let mut setup = DaoSetup::new(autonomous_dao::contract_obj);
    let admin = setup.admin.clone();
    let alice = setup.alice.clone();

    setup
        .b_mock
        .execute_tx(&alice, &setup.dao_wrapper, &rust_biguint!(0), |sc| {
            sc.set_uint_parameter(ManagedBuffer::from(QUORUM_BPS_KEY), managed_biguint!(1_000));
        })
        .assert_user_error(ERR_CANNOT_SET_PARAMETERS);

    setup
        .b_mock
        .execute_tx(&admin, &setup.dao_wrapper, &rust_biguint!(0), |sc| {
            sc.set_uint_parameter(ManagedBuffer::from(QUORUM_BPS_KEY), managed_biguint!(10_001));
        })
        .assert_user_error(ERR_INVALID_BPS);

    setup
        .b_mock
        .execute_tx(&admin, &setup.dao_wrapper, &rust_biguint!(0), |sc| {
            sc.set_uint_parameter(ManagedBuffer::from(VOTING_PERIOD_KEY), managed_biguint!(0));
        })
        .assert_user_error(ERR_INVALID_PERIOD);

    setup
        .b_mock
        .execute_tx(&admin, &setup.dao_wrapper, &rust_biguint!(0), |sc| {
            sc.set_uint_parameter(ManagedBuffer::from(VOTING_PERIOD_KEY), managed_biguint!(DAY));
        })
        .assert_ok();

    // new proposals pick up the shorter voting period
    let carol = setup.carol.clone();
    setup.stake(&alice, 1_000).assert_ok();
    let id = setup.create_proposal(&alice, &carol, 0);
    setup
        .b_mock
        .execute_query(&setup.dao_wrapper, |sc| {
            assert_eq!(sc.get_proposal(id).voting_deadline, START + DAY);
        })
        .assert_ok();
}

#[test]
fn durations_are_capped() {
    let mut setup = DaoSetup::new(autonomous_dao::contract_obj);
    let admin = setup.admin.clone();
    let alice = setup.alice.clone();

    setup
        .b_mock
        .execute_tx(&admin, &setup.dao_wrapper, &rust_biguint!(0), |sc| {
            sc.set_uint_parameter(
                ManagedBuffer::from(MIN_STAKE_DURATION_KEY),
                multiversx_sc::types::BigUint::from_bytes_be(&u64::MAX.to_be_bytes()),
            );
        })
        .assert_user_error(ERR_PARAMETER_OUT_OF_RANGE);

    setup
        .b_mock
        .execute_tx(&admin, &setup.dao_wrapper, &rust_biguint!(0), |sc| {
            sc.set_uint_parameter(
                ManagedBuffer::from(VOTING_PERIOD_KEY),
                managed_biguint!(MAX_DURATION + 1),
            );
        })
        .assert_user_error(ERR_PARAMETER_OUT_OF_RANGE);

    setup
        .b_mock
        .execute_tx(&admin, &setup.dao_wrapper, &rust_biguint!(0), |sc| {
            sc.set_uint_parameter(
                ManagedBuffer::from(MIN_STAKE_DURATION_KEY),
                managed_biguint!(MAX_DURATION),
            );
        })
        .assert_ok();

    // the longest holding period still charges the early-unstake penalty
    setup.stake(&alice, 1_000).assert_ok();
    setup.set_time(START + 365 * DAY);
    setup.unstake(&alice, 1_000).assert_ok();
    setup.b_mock.check_esdt_balance(
        &alice,
        GOV_TOKEN,
        &rust_biguint!(INITIAL_GOV_BALANCE - 100),
    );
}
