multiversx_sc::imports!();

use crate::access_control;
use crate::errors::*;
use crate::types::Role;

/// Circuit breaker. Guardians can stop the DAO; only admins or governance restart it.
#[multiversx_sc::module]
pub trait PauseModule: access_control::AccessControlModule {
    #[endpoint(pause)]
    fn pause(&self) {
        let caller = self.require_any_role(&[Role::Admin, Role::Guardian], ERR_CANNOT_PAUSE);
        require!(!self.paused().get(), ERR_ALREADY_PAUSED);

        self.paused().set(true);
        self.paused_event(&caller);
    }

    #[endpoint(unpause)]
    fn unpause(&self) {
        let caller =
            self.require_any_role(&[Role::Admin, Role::Governance], ERR_CANNOT_UNPAUSE);
        require!(self.paused().get(), ERR_NOT_PAUSED);

        self.paused().set(false);
        self.unpaused_event(&caller);
    }

    #[view(isPaused)]
    fn is_paused(&self) -> bool {
        self.paused().get()
    }

    fn require_not_paused(&self) {
        require!(!self.paused().get(), ERR_PAUSED);
    }

    #[event("paused")]
    fn paused_event(&self, #[indexed] by: &ManagedAddress);

    #[event("unpaused")]
    fn unpaused_event(&self, #[indexed] by: &ManagedAddress);

    #[storage_mapper("paused")]
    fn paused(&self) -> SingleValueMapper<bool>;
}
