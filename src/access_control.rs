multiversx_sc::imports!();

use crate::errors::*;
use crate::types::Role;

/// Role membership consulted by every other module.
#[multiversx_sc::module]
pub trait AccessControlModule {
    #[endpoint(grantRole)]
    fn grant_role(&self, role: Role, account: ManagedAddress) {
        self.require_role_manager();
        require!(!account.is_zero(), ERR_ZERO_ADDRESS);
        require!(
            self.role_members(role).insert(account.clone()),
            ERR_ROLE_ALREADY_GRANTED
        );

        let caller = self.blockchain().get_caller();
        self.role_granted_event(role, &account, &caller);
    }

    #[endpoint(revokeRole)]
    fn revoke_role(&self, role: Role, account: ManagedAddress) {
        self.require_role_manager();
        require!(self.has_role(role, &account), ERR_ROLE_NOT_HELD);
        if role == Role::Admin {
            require!(self.role_members(Role::Admin).len() > 1, ERR_LAST_ADMIN);
        }

        self.role_members(role).swap_remove(&account);

        let caller = self.blockchain().get_caller();
        self.role_revoked_event(role, &account, &caller);
    }

    #[view(hasRole)]
    fn has_role_view(&self, role: Role, account: ManagedAddress) -> bool {
        self.has_role(role, &account)
    }

    #[view(getRoleMembers)]
    fn get_role_members(&self, role: Role) -> MultiValueEncoded<ManagedAddress> {
        let mut result = MultiValueEncoded::new();
        for member in self.role_members(role).iter() {
            result.push(member);
        }
        result
    }

    fn has_role(&self, role: Role, account: &ManagedAddress) -> bool {
        self.role_members(role).contains(account)
    }

    fn require_role(&self, role: Role, err_msg: &str) -> ManagedAddress {
        let caller = self.blockchain().get_caller();
        require!(self.has_role(role, &caller), err_msg);
        caller
    }

    fn require_any_role(&self, roles: &[Role], err_msg: &str) -> ManagedAddress {
        let caller = self.blockchain().get_caller();
        let allowed = roles.iter().any(|role| self.has_role(*role, &caller));
        require!(allowed, err_msg);
        caller
    }

    fn require_role_manager(&self) {
        self.require_any_role(&[Role::Admin, Role::Governance], ERR_CANNOT_MANAGE_ROLES);
    }

    #[event("roleGranted")]
    fn role_granted_event(
        &self,
        #[indexed] role: Role,
        #[indexed] account: &ManagedAddress,
        sender: &ManagedAddress,
    );

    #[event("roleRevoked")]
    fn role_revoked_event(
        &self,
        #[indexed] role: Role,
        #[indexed] account: &ManagedAddress,
        sender: &ManagedAddress,
    );

    #[storage_mapper("roleMembers")]
    fn role_members(&self, role: Role) -> UnorderedSetMapper<ManagedAddress>;
}
