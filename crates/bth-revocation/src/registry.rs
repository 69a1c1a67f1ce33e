use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use bth_chain::Transaction;
use bth_types::{Address, Bytes32};

use crate::binding::Binding;
use crate::error::{Result, RevocationError};
use crate::event::RevocationEvent;
use crate::reason::RevocationReason;
use crate::record::{RevocationRecord, RevocationStatus};
use crate::traits::{Registrar, RevocationReader};

/// Category-agnostic ledger of registered and revoked identifiers.
///
/// Every write validates all of its inputs before touching state, so a
/// failed call (single or batch) changes nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "R: RevocationReason")]
pub struct RevocationRegistry<R> {
    address: Address,
    owner: Address,
    binding: Binding,
    records: BTreeMap<Bytes32, RevocationRecord<R>>,
}

impl<R: RevocationReason> RevocationRegistry<R> {
    /// A registry at `address`, owned for its whole life by `owner`.
    pub fn new(address: Address, owner: Address) -> Self {
        Self {
            address,
            owner,
            binding: Binding::new(),
            records: BTreeMap::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// The bound verification contract, if set.
    pub fn verification_contract(&self) -> Option<Address> {
        self.binding.registrar()
    }

    // ---- Binding ----

    /// Bind the single contract allowed to register ids. Owner only, once.
    pub fn set_verification_contract(
        &mut self,
        tx: &mut Transaction,
        verification_contract: Address,
    ) -> Result<()> {
        self.ensure_owner(tx)?;
        if let Some(current) = self.binding.registrar() {
            return Err(RevocationError::AlreadyBound { current });
        }
        if verification_contract.is_zero() {
            return Err(RevocationError::InvalidAddress);
        }
        tx.emit(
            self.address,
            &RevocationEvent::<R>::VerificationContractSet {
                verification_contract,
            },
        )?;
        self.binding.bind(verification_contract)?;
        info!(
            registry = %self.address,
            verification_contract = %verification_contract,
            "verification contract bound"
        );
        Ok(())
    }

    // ---- Registration ----

    /// Mark `id` registered and valid. Bound verification contract only.
    pub fn register(&mut self, tx: &mut Transaction, id: Bytes32) -> Result<()> {
        self.ensure_registrar(tx)?;
        if self.records.contains_key(&id) {
            return Err(RevocationError::AlreadyRegistered { id });
        }
        let timestamp = tx.block_time();
        tx.emit(self.address, &RevocationEvent::<R>::Registered { id, timestamp })?;
        self.records.insert(id, RevocationRecord::registered_at(timestamp));
        debug!(registry = %self.address, id = %id.short_hex(), "id registered");
        Ok(())
    }

    /// Register every id or none of them.
    pub fn register_batch(&mut self, tx: &mut Transaction, ids: &[Bytes32]) -> Result<()> {
        self.ensure_registrar(tx)?;
        if ids.is_empty() {
            return Err(RevocationError::EmptyArrays);
        }
        let mut seen = HashSet::with_capacity(ids.len());
        for id in ids {
            if self.records.contains_key(id) || !seen.insert(*id) {
                return Err(RevocationError::AlreadyRegistered { id: *id });
            }
        }

        let timestamp = tx.block_time();
        tx.emit(
            self.address,
            &RevocationEvent::<R>::BatchRegistered {
                ids: ids.to_vec(),
                timestamp,
            },
        )?;
        for id in ids {
            self.records
                .insert(*id, RevocationRecord::registered_at(timestamp));
        }
        debug!(registry = %self.address, count = ids.len(), "batch registered");
        Ok(())
    }

    // ---- Revocation ----

    /// Permanently revoke `id` with `reason`. Owner only.
    pub fn revoke(&mut self, tx: &mut Transaction, id: Bytes32, reason: R) -> Result<()> {
        self.ensure_owner(tx)?;
        Self::ensure_reason(reason)?;
        self.ensure_revocable(&id)?;

        let timestamp = tx.block_time();
        tx.emit(
            self.address,
            &RevocationEvent::Revoked {
                id,
                reason,
                timestamp,
            },
        )?;
        if let Some(record) = self.records.get_mut(&id) {
            record.revoke(reason, timestamp);
        }
        debug!(registry = %self.address, id = %id.short_hex(), %reason, "id revoked");
        Ok(())
    }

    /// Revoke every id with the same reason, or none of them.
    pub fn revoke_batch(&mut self, tx: &mut Transaction, ids: &[Bytes32], reason: R) -> Result<()> {
        self.ensure_owner(tx)?;
        Self::ensure_reason(reason)?;
        if ids.is_empty() {
            return Err(RevocationError::EmptyArrays);
        }
        let mut seen = HashSet::with_capacity(ids.len());
        for id in ids {
            self.ensure_revocable(id)?;
            if !seen.insert(*id) {
                return Err(RevocationError::AlreadyRevoked { id: *id });
            }
        }

        let timestamp = tx.block_time();
        tx.emit(
            self.address,
            &RevocationEvent::BatchRevoked {
                ids: ids.to_vec(),
                reason,
                timestamp,
            },
        )?;
        for id in ids {
            if let Some(record) = self.records.get_mut(id) {
                record.revoke(reason, timestamp);
            }
        }
        debug!(registry = %self.address, count = ids.len(), %reason, "batch revoked");
        Ok(())
    }

    /// [`revoke`](Self::revoke) with a raw wire reason code.
    pub fn revoke_code(&mut self, tx: &mut Transaction, id: Bytes32, code: u8) -> Result<()> {
        let reason = R::from_code(code).ok_or(RevocationError::UnknownReason(code))?;
        self.revoke(tx, id, reason)
    }

    /// [`revoke_batch`](Self::revoke_batch) with a raw wire reason code.
    pub fn revoke_batch_code(
        &mut self,
        tx: &mut Transaction,
        ids: &[Bytes32],
        code: u8,
    ) -> Result<()> {
        let reason = R::from_code(code).ok_or(RevocationError::UnknownReason(code))?;
        self.revoke_batch(tx, ids, reason)
    }

    // ---- Reads ----

    pub fn is_registered(&self, id: &Bytes32) -> bool {
        self.records.get(id).is_some_and(|r| r.registered)
    }

    pub fn is_revoked(&self, id: &Bytes32) -> bool {
        self.records.get(id).is_some_and(|r| r.revoked)
    }

    /// `registered && !revoked`; `false` for unknown ids.
    pub fn is_valid(&self, id: &Bytes32) -> bool {
        self.records.get(id).is_some_and(RevocationRecord::is_valid)
    }

    pub fn get_status(&self, id: &Bytes32) -> RevocationStatus<R> {
        match self.records.get(id) {
            Some(record) => RevocationStatus {
                exists: record.registered,
                valid: record.is_valid(),
                reason: record.reason,
            },
            None => RevocationStatus::unknown(),
        }
    }

    /// `NONE` unless the id has been revoked.
    pub fn get_revocation_reason(&self, id: &Bytes32) -> R {
        self.records.get(id).map(|r| r.reason).unwrap_or(R::NONE)
    }

    pub fn record(&self, id: &Bytes32) -> Option<&RevocationRecord<R>> {
        self.records.get(id)
    }

    pub fn registered_count(&self) -> usize {
        self.records.len()
    }

    pub fn revoked_count(&self) -> usize {
        self.records.values().filter(|r| r.revoked).count()
    }

    /// Every known id with its record, in id order.
    pub fn records(&self) -> impl Iterator<Item = (&Bytes32, &RevocationRecord<R>)> {
        self.records.iter()
    }

    // ---- Guards ----

    /// `NotOwner` unless the transaction sender owns the registry.
    pub fn ensure_owner(&self, tx: &Transaction) -> Result<()> {
        let caller = tx.sender();
        if caller != self.owner {
            return Err(RevocationError::NotOwner { caller });
        }
        Ok(())
    }

    fn ensure_registrar(&self, tx: &Transaction) -> Result<()> {
        let caller = tx.sender();
        match self.binding.registrar() {
            Some(registrar) if registrar == caller => Ok(()),
            _ => Err(RevocationError::NotVerificationContract { caller }),
        }
    }

    fn ensure_reason(reason: R) -> Result<()> {
        if reason.is_none() {
            return Err(RevocationError::MustProvideReason);
        }
        Ok(())
    }

    fn ensure_revocable(&self, id: &Bytes32) -> Result<()> {
        match self.records.get(id) {
            None => Err(RevocationError::NotRegistered { id: *id }),
            Some(record) if record.revoked => Err(RevocationError::AlreadyRevoked { id: *id }),
            Some(_) => Ok(()),
        }
    }
}

impl<R: RevocationReason> RevocationReader for RevocationRegistry<R> {
    fn address(&self) -> Address {
        self.address
    }

    fn is_registered(&self, id: &Bytes32) -> bool {
        RevocationRegistry::is_registered(self, id)
    }

    fn is_revoked(&self, id: &Bytes32) -> bool {
        RevocationRegistry::is_revoked(self, id)
    }

    fn is_valid(&self, id: &Bytes32) -> bool {
        RevocationRegistry::is_valid(self, id)
    }
}

impl<R: RevocationReason> Registrar for RevocationRegistry<R> {
    fn register(&mut self, tx: &mut Transaction, id: Bytes32) -> Result<()> {
        RevocationRegistry::register(self, tx, id)
    }

    fn register_batch(&mut self, tx: &mut Transaction, ids: &[Bytes32]) -> Result<()> {
        RevocationRegistry::register_batch(self, tx, ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reason::tests::TestReason;
    use bth_types::BlockTime;
    use proptest::prelude::*;

    fn owner() -> Address {
        Address::derive("owner")
    }

    fn verifier() -> Address {
        Address::derive("verification-contract")
    }

    fn stranger() -> Address {
        Address::derive("stranger")
    }

    fn id(label: &str) -> Bytes32 {
        Bytes32::from_label(label)
    }

    fn tx(sender: Address) -> Transaction {
        Transaction::new(sender, BlockTime::from_secs(1_700_000_000))
    }

    fn fresh() -> RevocationRegistry<TestReason> {
        RevocationRegistry::new(Address::derive("registry"), owner())
    }

    fn bound() -> RevocationRegistry<TestReason> {
        let mut registry = fresh();
        registry
            .set_verification_contract(&mut tx(owner()), verifier())
            .unwrap();
        registry
    }

    fn with(ids: &[&str]) -> RevocationRegistry<TestReason> {
        let mut registry = bound();
        for label in ids {
            registry.register(&mut tx(verifier()), id(label)).unwrap();
        }
        registry
    }

    // ---- Binding ----

    #[test]
    fn deployer_is_owner() {
        let registry = fresh();
        assert_eq!(registry.owner(), owner());
        assert_eq!(registry.verification_contract(), None);
    }

    #[test]
    fn binding_sets_verification_contract_and_emits() {
        let mut registry = fresh();
        let mut t = tx(owner());
        registry.set_verification_contract(&mut t, verifier()).unwrap();
        assert_eq!(registry.verification_contract(), Some(verifier()));
        let events = t.into_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "VerificationContractSet");
    }

    #[test]
    fn second_binding_is_rejected() {
        let mut registry = bound();
        let err = registry
            .set_verification_contract(&mut tx(owner()), stranger())
            .unwrap_err();
        assert_eq!(err, RevocationError::AlreadyBound { current: verifier() });
        assert_eq!(registry.verification_contract(), Some(verifier()));
    }

    #[test]
    fn binding_requires_owner() {
        let mut registry = fresh();
        let err = registry
            .set_verification_contract(&mut tx(stranger()), verifier())
            .unwrap_err();
        assert_eq!(err, RevocationError::NotOwner { caller: stranger() });
        assert_eq!(registry.verification_contract(), None);
    }

    #[test]
    fn binding_rejects_zero_address() {
        let mut registry = fresh();
        let mut t = tx(owner());
        let err = registry
            .set_verification_contract(&mut t, Address::ZERO)
            .unwrap_err();
        assert_eq!(err, RevocationError::InvalidAddress);
        assert!(t.events().is_empty());
    }

    // ---- Registration ----

    #[test]
    fn registrar_can_register() {
        let mut registry = bound();
        let mut t = tx(verifier());
        registry.register(&mut t, id("doc-1")).unwrap();
        assert!(registry.is_registered(&id("doc-1")));
        assert!(registry.is_valid(&id("doc-1")));
        assert_eq!(t.events()[0].name, "Registered");
        let record = registry.record(&id("doc-1")).unwrap();
        assert_eq!(record.registered_at, BlockTime::from_secs(1_700_000_000));
        assert_eq!(record.reason, TestReason::None);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = with(&["doc-1"]);
        let err = registry.register(&mut tx(verifier()), id("doc-1")).unwrap_err();
        assert_eq!(err, RevocationError::AlreadyRegistered { id: id("doc-1") });
    }

    #[test]
    fn owner_cannot_register_directly() {
        let mut registry = bound();
        let err = registry.register(&mut tx(owner()), id("doc-1")).unwrap_err();
        assert_eq!(err, RevocationError::NotVerificationContract { caller: owner() });
        assert!(!registry.is_registered(&id("doc-1")));
    }

    #[test]
    fn unbound_registry_accepts_no_registrations() {
        let mut registry = fresh();
        let err = registry.register(&mut tx(verifier()), id("doc-1")).unwrap_err();
        assert!(matches!(err, RevocationError::NotVerificationContract { .. }));
    }

    #[test]
    fn batch_registers_all_with_one_event() {
        let mut registry = bound();
        let ids = [id("a"), id("b"), id("c")];
        let mut t = tx(verifier());
        registry.register_batch(&mut t, &ids).unwrap();
        assert!(ids.iter().all(|i| registry.is_registered(i)));
        let events = t.into_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "BatchRegistered");
    }

    #[test]
    fn batch_with_existing_id_applies_nothing() {
        let mut registry = with(&["a"]);
        let mut t = tx(verifier());
        let err = registry
            .register_batch(&mut t, &[id("b"), id("a")])
            .unwrap_err();
        assert_eq!(err, RevocationError::AlreadyRegistered { id: id("a") });
        assert!(!registry.is_registered(&id("b")));
        assert!(t.events().is_empty());
    }

    #[test]
    fn batch_with_repeated_id_applies_nothing() {
        let mut registry = bound();
        let err = registry
            .register_batch(&mut tx(verifier()), &[id("a"), id("a")])
            .unwrap_err();
        assert_eq!(err, RevocationError::AlreadyRegistered { id: id("a") });
        assert!(!registry.is_registered(&id("a")));
    }

    #[test]
    fn empty_batch_is_rejected() {
        let mut registry = bound();
        assert_eq!(
            registry.register_batch(&mut tx(verifier()), &[]).unwrap_err(),
            RevocationError::EmptyArrays
        );
    }

    #[test]
    fn stranger_cannot_batch_register() {
        let mut registry = bound();
        let err = registry
            .register_batch(&mut tx(stranger()), &[id("a")])
            .unwrap_err();
        assert_eq!(err, RevocationError::NotVerificationContract { caller: stranger() });
    }

    // ---- Revocation ----

    #[test]
    fn owner_revokes_with_reason() {
        let mut registry = with(&["a"]);
        let mut t = tx(owner());
        registry.revoke(&mut t, id("a"), TestReason::Expired).unwrap();
        assert!(registry.is_revoked(&id("a")));
        assert!(!registry.is_valid(&id("a")));
        assert_eq!(registry.get_revocation_reason(&id("a")), TestReason::Expired);
        assert_eq!(t.events()[0].name, "Revoked");
        assert_eq!(
            registry.record(&id("a")).unwrap().revoked_at,
            Some(BlockTime::from_secs(1_700_000_000))
        );
    }

    #[test]
    fn revoking_unregistered_id_fails() {
        let mut registry = with(&["a"]);
        let err = registry
            .revoke(&mut tx(owner()), id("b"), TestReason::Fraud)
            .unwrap_err();
        assert_eq!(err, RevocationError::NotRegistered { id: id("b") });
    }

    #[test]
    fn revocation_is_one_way() {
        let mut registry = with(&["a"]);
        registry.revoke(&mut tx(owner()), id("a"), TestReason::Fraud).unwrap();
        let err = registry
            .revoke(&mut tx(owner()), id("a"), TestReason::Expired)
            .unwrap_err();
        assert_eq!(err, RevocationError::AlreadyRevoked { id: id("a") });
        assert_eq!(registry.get_revocation_reason(&id("a")), TestReason::Fraud);
    }

    #[test]
    fn revoke_requires_reason() {
        let mut registry = with(&["a"]);
        let err = registry
            .revoke(&mut tx(owner()), id("a"), TestReason::None)
            .unwrap_err();
        assert_eq!(err, RevocationError::MustProvideReason);
        assert!(registry.is_valid(&id("a")));
    }

    #[test]
    fn revoke_requires_owner() {
        let mut registry = with(&["a"]);
        for caller in [stranger(), verifier()] {
            let err = registry
                .revoke(&mut tx(caller), id("a"), TestReason::Fraud)
                .unwrap_err();
            assert_eq!(err, RevocationError::NotOwner { caller });
        }
        assert!(registry.is_valid(&id("a")));
    }

    #[test]
    fn revoke_by_code() {
        let mut registry = with(&["a", "b"]);
        registry.revoke_code(&mut tx(owner()), id("a"), 2).unwrap();
        assert_eq!(registry.get_revocation_reason(&id("a")), TestReason::Expired);
        assert_eq!(
            registry.revoke_code(&mut tx(owner()), id("b"), 0).unwrap_err(),
            RevocationError::MustProvideReason
        );
        assert_eq!(
            registry.revoke_code(&mut tx(owner()), id("b"), 77).unwrap_err(),
            RevocationError::UnknownReason(77)
        );
        assert!(registry.is_valid(&id("b")));
    }

    #[test]
    fn batch_revoke_applies_shared_reason() {
        let mut registry = with(&["a", "b", "c"]);
        let mut t = tx(owner());
        registry
            .revoke_batch(&mut t, &[id("a"), id("b")], TestReason::OwnerRequest)
            .unwrap();
        assert_eq!(registry.get_revocation_reason(&id("a")), TestReason::OwnerRequest);
        assert_eq!(registry.get_revocation_reason(&id("b")), TestReason::OwnerRequest);
        assert!(!registry.is_revoked(&id("c")));
        let events = t.into_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "BatchRevoked");
    }

    #[test]
    fn batch_revoke_with_unregistered_id_applies_nothing() {
        let mut registry = with(&["a"]);
        let err = registry
            .revoke_batch(&mut tx(owner()), &[id("a"), id("ghost")], TestReason::Fraud)
            .unwrap_err();
        assert_eq!(err, RevocationError::NotRegistered { id: id("ghost") });
        assert!(!registry.is_revoked(&id("a")));
    }

    #[test]
    fn batch_revoke_with_revoked_id_applies_nothing() {
        let mut registry = with(&["a", "b"]);
        registry.revoke(&mut tx(owner()), id("a"), TestReason::Fraud).unwrap();
        let err = registry
            .revoke_batch(&mut tx(owner()), &[id("b"), id("a")], TestReason::Expired)
            .unwrap_err();
        assert_eq!(err, RevocationError::AlreadyRevoked { id: id("a") });
        assert!(registry.is_valid(&id("b")));
    }

    #[test]
    fn batch_revoke_with_repeated_id_applies_nothing() {
        let mut registry = with(&["a"]);
        let err = registry
            .revoke_batch(&mut tx(owner()), &[id("a"), id("a")], TestReason::Fraud)
            .unwrap_err();
        assert_eq!(err, RevocationError::AlreadyRevoked { id: id("a") });
        assert!(registry.is_valid(&id("a")));
    }

    #[test]
    fn batch_revoke_guards() {
        let mut registry = with(&["a"]);
        assert_eq!(
            registry
                .revoke_batch(&mut tx(owner()), &[id("a")], TestReason::None)
                .unwrap_err(),
            RevocationError::MustProvideReason
        );
        assert_eq!(
            registry
                .revoke_batch(&mut tx(stranger()), &[id("a")], TestReason::Fraud)
                .unwrap_err(),
            RevocationError::NotOwner { caller: stranger() }
        );
        assert_eq!(
            registry
                .revoke_batch(&mut tx(owner()), &[], TestReason::Fraud)
                .unwrap_err(),
            RevocationError::EmptyArrays
        );
    }

    // ---- Reads ----

    #[test]
    fn status_for_valid_revoked_and_unknown() {
        let mut registry = with(&["a"]);
        assert_eq!(
            registry.get_status(&id("a")),
            RevocationStatus {
                exists: true,
                valid: true,
                reason: TestReason::None
            }
        );
        registry.revoke(&mut tx(owner()), id("a"), TestReason::Fraud).unwrap();
        assert_eq!(
            registry.get_status(&id("a")),
            RevocationStatus {
                exists: true,
                valid: false,
                reason: TestReason::Fraud
            }
        );
        assert_eq!(registry.get_status(&id("zzz")), RevocationStatus::unknown());
        assert_eq!(registry.get_revocation_reason(&id("zzz")), TestReason::None);
        assert!(!registry.is_valid(&id("zzz")));
    }

    #[test]
    fn counts() {
        let mut registry = with(&["a", "b"]);
        registry.revoke(&mut tx(owner()), id("a"), TestReason::Fraud).unwrap();
        assert_eq!(registry.registered_count(), 2);
        assert_eq!(registry.revoked_count(), 1);
        assert_eq!(registry.records().count(), 2);
    }

    #[test]
    fn serde_roundtrip_preserves_binding_and_records() {
        let mut registry = with(&["a", "b"]);
        registry.revoke(&mut tx(owner()), id("b"), TestReason::Fraud).unwrap();
        let json = serde_json::to_string(&registry).unwrap();
        let parsed: RevocationRegistry<TestReason> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, registry);
        assert_eq!(parsed.verification_contract(), Some(verifier()));
    }

    // ---- Properties ----

    #[derive(Clone, Debug)]
    enum Op {
        Register(u8),
        RegisterBatch(Vec<u8>),
        Revoke(u8, u8),
        RevokeBatch(Vec<u8>, u8),
        RegisterAsStranger(u8),
        RevokeAsStranger(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        let key = 0u8..8;
        prop_oneof![
            key.clone().prop_map(Op::Register),
            prop::collection::vec(key.clone(), 0..4).prop_map(Op::RegisterBatch),
            (key.clone(), 0u8..5).prop_map(|(k, r)| Op::Revoke(k, r)),
            (prop::collection::vec(key.clone(), 0..4), 0u8..5)
                .prop_map(|(ks, r)| Op::RevokeBatch(ks, r)),
            key.clone().prop_map(Op::RegisterAsStranger),
            key.prop_map(Op::RevokeAsStranger),
        ]
    }

    fn key(k: u8) -> Bytes32 {
        Bytes32::from_raw([k + 1; 32])
    }

    fn apply(registry: &mut RevocationRegistry<TestReason>, op: &Op) -> Result<()> {
        match op {
            Op::Register(k) => registry.register(&mut tx(verifier()), key(*k)),
            Op::RegisterBatch(ks) => {
                let ids: Vec<_> = ks.iter().map(|k| key(*k)).collect();
                registry.register_batch(&mut tx(verifier()), &ids)
            }
            Op::Revoke(k, r) => registry.revoke_code(&mut tx(owner()), key(*k), *r),
            Op::RevokeBatch(ks, r) => {
                let ids: Vec<_> = ks.iter().map(|k| key(*k)).collect();
                registry.revoke_batch_code(&mut tx(owner()), &ids, *r)
            }
            Op::RegisterAsStranger(k) => registry.register(&mut tx(stranger()), key(*k)),
            Op::RevokeAsStranger(k) => {
                registry.revoke(&mut tx(stranger()), key(*k), TestReason::Fraud)
            }
        }
    }

    proptest! {
        #[test]
        fn state_invariants_hold_after_every_operation(ops in prop::collection::vec(op(), 1..40)) {
            let mut registry = bound();
            for op in &ops {
                let before = registry.clone();
                let was_revoked: Vec<bool> = (0..8).map(|k| registry.is_revoked(&key(k))).collect();
                let result = apply(&mut registry, op);

                if result.is_err() {
                    // Failed calls, single or batch, change nothing.
                    prop_assert_eq!(&registry, &before);
                }
                if matches!(op, Op::RegisterAsStranger(_) | Op::RevokeAsStranger(_)) {
                    prop_assert!(result.is_err());
                }
                for k in 0..8u8 {
                    let id = key(k);
                    prop_assert_eq!(
                        registry.is_valid(&id),
                        registry.is_registered(&id) && !registry.is_revoked(&id)
                    );
                    if registry.is_revoked(&id) {
                        prop_assert!(registry.is_registered(&id));
                    }
                    prop_assert_eq!(
                        registry.get_revocation_reason(&id) != TestReason::None,
                        registry.is_revoked(&id)
                    );
                    if was_revoked[k as usize] {
                        prop_assert!(registry.is_revoked(&id));
                    }
                }
            }
        }

        #[test]
        fn second_registration_always_fails(k in 0u8..8) {
            let mut registry = bound();
            registry.register(&mut tx(verifier()), key(k)).unwrap();
            prop_assert_eq!(
                registry.register(&mut tx(verifier()), key(k)).unwrap_err(),
                RevocationError::AlreadyRegistered { id: key(k) }
            );
        }
    }
}
