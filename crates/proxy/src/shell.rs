//! Proxy shell state machine
//!
//! Holds admin and implementation slots and walks them through the
//! two-step protocols: an admin nominates (pending slot), the nominee
//! accepts. Nomination failures are soft (code + Failure event);
//! adopting an implementation whose storage layout would corrupt the
//! shell's storage is a hard abort.

use lendcore_core::{Address, ErrorCode, FailureInfo};

use crate::error::ProxyError;
use crate::events::ProxyEvent;
use crate::schema::StorageLayout;

/// The storage-holding shell beneath the risk engine.
#[derive(Debug, Default)]
pub struct ProxyShell {
    admin: Address,
    pending_admin: Address,
    implementation: Address,
    pending_implementation: Address,
    active_layout: Option<StorageLayout>,
    events: Vec<ProxyEvent>,
}

impl ProxyShell {
    /// Create a shell administered by `admin`, with no implementation.
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            ..Default::default()
        }
    }

    pub fn admin(&self) -> Address {
        self.admin
    }

    pub fn pending_admin(&self) -> Address {
        self.pending_admin
    }

    pub fn implementation(&self) -> Address {
        self.implementation
    }

    pub fn pending_implementation(&self) -> Address {
        self.pending_implementation
    }

    /// Layout of the active implementation, if one has been adopted.
    pub fn active_layout(&self) -> Option<&StorageLayout> {
        self.active_layout.as_ref()
    }

    /// Events emitted so far.
    pub fn events(&self) -> &[ProxyEvent] {
        &self.events
    }

    /// Drain the event log.
    pub fn take_events(&mut self) -> Vec<ProxyEvent> {
        std::mem::take(&mut self.events)
    }

    fn fail(&mut self, error: ErrorCode, info: FailureInfo) -> ErrorCode {
        tracing::debug!(?error, ?info, "proxy soft failure");
        self.events.push(ProxyEvent::Failure { error, info });
        error
    }

    /// Nominate a new implementation. Admin only; a prior pending value
    /// is silently overwritten.
    pub fn set_pending_implementation(&mut self, caller: Address, new_pending: Address) -> ErrorCode {
        if caller != self.admin {
            return self.fail(
                ErrorCode::Unauthorized,
                FailureInfo::SetPendingImplementationOwnerCheck,
            );
        }

        let old_pending = self.pending_implementation;
        self.pending_implementation = new_pending;
        self.events.push(ProxyEvent::NewPendingImplementation {
            old_pending,
            new_pending,
        });
        ErrorCode::NoError
    }

    /// Called by the pending implementation to take over. The caller
    /// must be the nonzero pending implementation; its storage layout
    /// must extend the active one append-only or the call aborts.
    pub fn accept_implementation(
        &mut self,
        caller: Address,
        layout: &StorageLayout,
    ) -> Result<ErrorCode, ProxyError> {
        if caller != self.pending_implementation || caller.is_zero() {
            return Ok(self.fail(
                ErrorCode::Unauthorized,
                FailureInfo::AcceptPendingImplementationAddressCheck,
            ));
        }

        if let Some(active) = &self.active_layout {
            if !layout.is_append_only_extension_of(active) {
                return Err(ProxyError::IncompatibleLayout {
                    implementation: caller,
                });
            }
        }

        let old_implementation = self.implementation;
        let old_pending = self.pending_implementation;

        self.implementation = self.pending_implementation;
        self.pending_implementation = Address::ZERO;
        self.active_layout = Some(layout.clone());

        tracing::debug!(implementation = %self.implementation, "implementation adopted");
        self.events.push(ProxyEvent::NewImplementation {
            old_implementation,
            new_implementation: self.implementation,
        });
        self.events.push(ProxyEvent::NewPendingImplementation {
            old_pending,
            new_pending: Address::ZERO,
        });
        Ok(ErrorCode::NoError)
    }

    /// Nominate a new admin. Admin only.
    pub fn set_pending_admin(&mut self, caller: Address, new_pending: Address) -> ErrorCode {
        if caller != self.admin {
            return self.fail(ErrorCode::Unauthorized, FailureInfo::SetPendingAdminOwnerCheck);
        }

        let old_pending = self.pending_admin;
        self.pending_admin = new_pending;
        self.events.push(ProxyEvent::NewPendingAdmin {
            old_pending,
            new_pending,
        });
        ErrorCode::NoError
    }

    /// Called by the pending admin to complete the transfer. Any other
    /// caller (including when no admin is pending) is rejected softly
    /// and the admin slot never changes.
    pub fn accept_admin(&mut self, caller: Address) -> ErrorCode {
        if caller != self.pending_admin || caller.is_zero() {
            return self.fail(
                ErrorCode::Unauthorized,
                FailureInfo::AcceptAdminPendingAdminCheck,
            );
        }

        let old_admin = self.admin;
        let old_pending = self.pending_admin;

        self.admin = self.pending_admin;
        self.pending_admin = Address::ZERO;

        self.events.push(ProxyEvent::NewAdmin {
            old_admin,
            new_admin: self.admin,
        });
        self.events.push(ProxyEvent::NewPendingAdmin {
            old_pending,
            new_pending: Address::ZERO,
        });
        ErrorCode::NoError
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDef;

    const ROOT: Address = Address::new([1u8; 20]);

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    fn layout_v1() -> StorageLayout {
        StorageLayout::new(&[
            FieldDef::new("admin", "Address"),
            FieldDef::new("close_factor_mantissa", "u128"),
        ])
    }

    fn layout_v2() -> StorageLayout {
        StorageLayout::new(&[
            FieldDef::new("admin", "Address"),
            FieldDef::new("close_factor_mantissa", "u128"),
            FieldDef::new("borrow_caps", "map<Address,u128>"),
        ])
    }

    #[test]
    fn test_constructor_zeroes_slots() {
        let shell = ProxyShell::new(ROOT);
        assert_eq!(shell.admin(), ROOT);
        assert_eq!(shell.pending_admin(), Address::ZERO);
        assert_eq!(shell.implementation(), Address::ZERO);
        assert_eq!(shell.pending_implementation(), Address::ZERO);
    }

    #[test]
    fn test_set_pending_implementation_requires_admin() {
        let mut shell = ProxyShell::new(ROOT);
        let code = shell.set_pending_implementation(addr(5), addr(10));
        assert_eq!(code, ErrorCode::Unauthorized);
        assert_eq!(shell.pending_implementation(), Address::ZERO);
        assert_eq!(
            shell.events().last(),
            Some(&ProxyEvent::Failure {
                error: ErrorCode::Unauthorized,
                info: FailureInfo::SetPendingImplementationOwnerCheck,
            })
        );
    }

    #[test]
    fn test_set_pending_implementation_overwrites_and_emits() {
        let mut shell = ProxyShell::new(ROOT);
        assert_eq!(shell.set_pending_implementation(ROOT, addr(10)), ErrorCode::NoError);
        assert_eq!(shell.set_pending_implementation(ROOT, addr(11)), ErrorCode::NoError);
        assert_eq!(shell.pending_implementation(), addr(11));
        assert_eq!(
            shell.events(),
            &[
                ProxyEvent::NewPendingImplementation {
                    old_pending: Address::ZERO,
                    new_pending: addr(10),
                },
                ProxyEvent::NewPendingImplementation {
                    old_pending: addr(10),
                    new_pending: addr(11),
                },
            ]
        );
    }

    #[test]
    fn test_accept_implementation_checks_caller() {
        let mut shell = ProxyShell::new(ROOT);
        shell.set_pending_implementation(ROOT, addr(10));

        // a different contract cannot accept
        let code = shell.accept_implementation(addr(11), &layout_v1()).unwrap();
        assert_eq!(code, ErrorCode::Unauthorized);
        assert_eq!(shell.implementation(), Address::ZERO);

        // neither can the zero address when nothing is pending
        let mut fresh = ProxyShell::new(ROOT);
        let code = fresh.accept_implementation(Address::ZERO, &layout_v1()).unwrap();
        assert_eq!(code, ErrorCode::Unauthorized);
    }

    #[test]
    fn test_adoption_activates_and_clears_pending() {
        let mut shell = ProxyShell::new(ROOT);
        shell.set_pending_implementation(ROOT, addr(10));
        let code = shell.accept_implementation(addr(10), &layout_v1()).unwrap();
        assert_eq!(code, ErrorCode::NoError);
        assert_eq!(shell.implementation(), addr(10));
        assert_eq!(shell.pending_implementation(), Address::ZERO);
        assert_eq!(shell.active_layout(), Some(&layout_v1()));
    }

    #[test]
    fn test_upgrade_with_appended_fields() {
        let mut shell = ProxyShell::new(ROOT);
        shell.set_pending_implementation(ROOT, addr(10));
        shell.accept_implementation(addr(10), &layout_v1()).unwrap();

        shell.set_pending_implementation(ROOT, addr(20));
        let code = shell.accept_implementation(addr(20), &layout_v2()).unwrap();
        assert_eq!(code, ErrorCode::NoError);
        assert_eq!(shell.implementation(), addr(20));
    }

    #[test]
    fn test_incompatible_layout_aborts() {
        let mut shell = ProxyShell::new(ROOT);
        shell.set_pending_implementation(ROOT, addr(10));
        shell.accept_implementation(addr(10), &layout_v2()).unwrap();

        // v1 drops a field: rejected hard, nothing changes
        shell.set_pending_implementation(ROOT, addr(20));
        let result = shell.accept_implementation(addr(20), &layout_v1());
        assert_eq!(
            result,
            Err(ProxyError::IncompatibleLayout {
                implementation: addr(20)
            })
        );
        assert_eq!(shell.implementation(), addr(10));
        assert_eq!(shell.pending_implementation(), addr(20));
    }

    #[test]
    fn test_set_pending_admin_requires_admin() {
        let mut shell = ProxyShell::new(ROOT);
        assert_eq!(shell.set_pending_admin(addr(5), addr(5)), ErrorCode::Unauthorized);
        assert_eq!(shell.pending_admin(), Address::ZERO);
        assert_eq!(shell.admin(), ROOT);
    }

    #[test]
    fn test_two_step_admin_transfer() {
        let mut shell = ProxyShell::new(ROOT);
        assert_eq!(shell.set_pending_admin(ROOT, addr(5)), ErrorCode::NoError);
        assert_eq!(shell.admin(), ROOT);
        assert_eq!(shell.pending_admin(), addr(5));

        // current admin cannot accept on the nominee's behalf
        assert_eq!(shell.accept_admin(ROOT), ErrorCode::Unauthorized);
        assert_eq!(shell.admin(), ROOT);

        assert_eq!(shell.accept_admin(addr(5)), ErrorCode::NoError);
        assert_eq!(shell.admin(), addr(5));
        assert_eq!(shell.pending_admin(), Address::ZERO);

        assert_eq!(
            &shell.events()[shell.events().len() - 2..],
            &[
                ProxyEvent::NewAdmin {
                    old_admin: ROOT,
                    new_admin: addr(5),
                },
                ProxyEvent::NewPendingAdmin {
                    old_pending: addr(5),
                    new_pending: Address::ZERO,
                },
            ]
        );
    }

    #[test]
    fn test_accept_admin_fails_when_nothing_pending() {
        let mut shell = ProxyShell::new(ROOT);
        assert_eq!(shell.accept_admin(ROOT), ErrorCode::Unauthorized);
        assert_eq!(shell.admin(), ROOT);
    }

    #[test]
    fn test_only_pending_admin_ever_becomes_admin() {
        let mut shell = ProxyShell::new(ROOT);
        shell.set_pending_admin(ROOT, addr(5));
        for stranger in [addr(6), addr(7), Address::ZERO, ROOT] {
            assert_eq!(shell.accept_admin(stranger), ErrorCode::Unauthorized);
            assert_eq!(shell.admin(), ROOT);
        }
    }
}
