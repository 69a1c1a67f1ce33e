//! Owner and admin role slots.
//!
//! The two roles are independent. The owner writes content and may hand
//! ownership to anyone; the admin may only hand the admin role on. Holding
//! one role never grants the other, even when both name the same account.

use serde::{Deserialize, Serialize};

use bth_types::Address;

use crate::error::{Result, VerificationError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    owner: Address,
    admin: Address,
}

impl AccessControl {
    /// Roles for a freshly deployed registry. Rejects a zero admin.
    pub fn new(owner: Address, admin: Address) -> Result<Self> {
        if admin.is_zero() {
            return Err(VerificationError::InvalidAdminAddress);
        }
        Ok(Self { owner, admin })
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn admin(&self) -> Address {
        self.admin
    }

    pub fn ensure_owner(&self, caller: Address) -> Result<()> {
        if caller != self.owner {
            return Err(VerificationError::NotOwner { caller });
        }
        Ok(())
    }

    pub fn ensure_admin(&self, caller: Address) -> Result<()> {
        if caller != self.admin {
            return Err(VerificationError::NotAdmin { caller });
        }
        Ok(())
    }

    /// Move the owner role. Returns the previous owner.
    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<Address> {
        self.ensure_owner(caller)?;
        if new_owner.is_zero() {
            return Err(VerificationError::InvalidAddress);
        }
        Ok(std::mem::replace(&mut self.owner, new_owner))
    }

    /// Move the admin role. Returns the previous admin.
    pub fn update_admin(&mut self, caller: Address, new_admin: Address) -> Result<Address> {
        self.ensure_admin(caller)?;
        if new_admin.is_zero() {
            return Err(VerificationError::InvalidAddress);
        }
        Ok(std::mem::replace(&mut self.admin, new_admin))
    }
}
