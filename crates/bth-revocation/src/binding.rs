//! One-time binding of a revocation registry to its verification contract.
//!
//! A fresh registry holds a [`Binder`]: a capability that can be spent
//! exactly once. Spending it produces a [`BoundRegistrar`], which exposes the
//! bound address and nothing else. There is no path from `Bound` back to
//! `Unbound`, so rebinding requires deploying a new registry.

use serde::{Deserialize, Serialize};

use bth_types::Address;

use crate::error::{Result, RevocationError};

/// Unspent right to name the registrar. Only this crate can create one.
#[derive(Debug, PartialEq, Eq)]
pub struct Binder {
    _private: (),
}

impl Binder {
    fn bind(self, verification_contract: Address) -> BoundRegistrar {
        BoundRegistrar(verification_contract)
    }
}

/// The frozen registrar address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundRegistrar(Address);

impl BoundRegistrar {
    pub fn address(&self) -> Address {
        self.0
    }
}

/// Binding state of a revocation registry.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<Address>", into = "Option<Address>")]
pub enum Binding {
    Unbound(Binder),
    Bound(BoundRegistrar),
}

impl Binding {
    /// A fresh, unbound state.
    pub fn new() -> Self {
        Binding::Unbound(Binder { _private: () })
    }

    /// The bound registrar, if any.
    pub fn registrar(&self) -> Option<Address> {
        match self {
            Binding::Bound(registrar) => Some(registrar.address()),
            Binding::Unbound(_) => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Binding::Bound(_))
    }

    /// Spend the binder on `verification_contract`.
    pub fn bind(&mut self, verification_contract: Address) -> Result<Address> {
        if let Binding::Bound(registrar) = self {
            return Err(RevocationError::AlreadyBound {
                current: registrar.address(),
            });
        }
        if verification_contract.is_zero() {
            return Err(RevocationError::InvalidAddress);
        }
        if let Binding::Unbound(binder) = std::mem::take(self) {
            *self = Binding::Bound(binder.bind(verification_contract));
        }
        Ok(verification_contract)
    }
}

impl Default for Binding {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Binding {
    fn clone(&self) -> Self {
        Binding::from(self.registrar())
    }
}

impl From<Option<Address>> for Binding {
    fn from(registrar: Option<Address>) -> Self {
        match registrar {
            Some(address) if !address.is_zero() => Binding::Bound(BoundRegistrar(address)),
            _ => Binding::new(),
        }
    }
}

impl From<Binding> for Option<Address> {
    fn from(binding: Binding) -> Self {
        binding.registrar()
    }
}
