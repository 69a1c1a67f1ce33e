use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use bth_chain::{Journal, Reversible, Transaction};
use bth_revocation::{Registrar, RevocationReader};
use bth_types::{Address, Bytes32};

use crate::access::AccessControl;
use crate::category::{
    Category, Registration, VerificationEntry, VerificationRecord, VerificationStatus,
};
use crate::error::{Result, VerificationError};
use crate::event::VerificationEvent;

/// A category's content ledger, paired with one revocation registry.
///
/// Writes take the paired registry explicitly as a [`Registrar`]; reads take
/// it as a [`RevocationReader`]. Registration stores the local record first
/// and then registers the id with the revocation registry inside a nested
/// call. If that call fails, the local write is rolled back and the events
/// buffered since the start of the call are discarded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct VerificationRegistry<C: Category> {
    address: Address,
    revocation_registry: Address,
    access: AccessControl,
    records: BTreeMap<Bytes32, VerificationRecord<C::Fields>>,
    /// Insertion order, for index-based iteration.
    ids: Vec<Bytes32>,
}

/// Undo command for a verification registry write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistryUndo {
    Insert(Bytes32),
}

impl<C: Category> Reversible for VerificationRegistry<C> {
    type Undo = RegistryUndo;

    fn revert(&mut self, undo: RegistryUndo) {
        match undo {
            RegistryUndo::Insert(id) => {
                self.records.remove(&id);
                if self.ids.last() == Some(&id) {
                    self.ids.pop();
                } else {
                    self.ids.retain(|known| *known != id);
                }
            }
        }
    }
}

impl<C: Category> VerificationRegistry<C> {
    /// Deploy at `address`; `owner` is the deploying account.
    pub fn new(
        address: Address,
        owner: Address,
        revocation_registry: Address,
        admin: Address,
    ) -> Result<Self> {
        if revocation_registry.is_zero() {
            return Err(VerificationError::InvalidRegistryAddress);
        }
        let access = AccessControl::new(owner, admin)?;
        Ok(Self {
            address,
            revocation_registry,
            access,
            records: BTreeMap::new(),
            ids: Vec::new(),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn revocation_registry(&self) -> Address {
        self.revocation_registry
    }

    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    pub fn admin(&self) -> Address {
        self.access.admin()
    }

    // ---- Registration ----

    /// Store one record and register its id with the paired registry.
    pub fn register<G>(
        &mut self,
        tx: &mut Transaction,
        registrar: &mut G,
        registration: Registration<C::Fields>,
    ) -> Result<()>
    where
        G: Registrar + ?Sized,
    {
        self.ensure_owner(tx)?;
        self.ensure_paired(registrar.address())?;
        self.check_new(&registration)?;

        let id = registration.id;
        self.atomically(tx, |this, tx, journal| {
            this.store(tx, journal, registration)?;
            tx.call(this.address, |tx| registrar.register(tx, id))?;
            Ok(())
        })?;
        debug!(registry = %self.address, category = C::NAME, id = %id.short_hex(), "registered");
        Ok(())
    }

    /// Store every record and register every id, or nothing at all.
    pub fn register_batch<G>(
        &mut self,
        tx: &mut Transaction,
        registrar: &mut G,
        registrations: Vec<Registration<C::Fields>>,
    ) -> Result<()>
    where
        G: Registrar + ?Sized,
    {
        self.ensure_owner(tx)?;
        self.ensure_paired(registrar.address())?;
        if registrations.is_empty() {
            return Err(VerificationError::EmptyArrays);
        }
        let mut seen = HashSet::with_capacity(registrations.len());
        for registration in &registrations {
            self.check_new(registration)?;
            if !seen.insert(registration.id) {
                return Err(self.already_registered(registration.id));
            }
        }

        let ids: Vec<Bytes32> = registrations.iter().map(|r| r.id).collect();
        let count = ids.len();
        self.atomically(tx, |this, tx, journal| {
            for registration in registrations {
                this.store(tx, journal, registration)?;
            }
            tx.emit(
                this.address,
                &VerificationEvent::<C::Fields>::BatchRegistered {
                    ids: ids.clone(),
                    count,
                    issuer: tx.sender(),
                    timestamp: tx.block_time(),
                },
            )?;
            tx.call(this.address, |tx| registrar.register_batch(tx, &ids))?;
            Ok(())
        })?;
        debug!(registry = %self.address, category = C::NAME, count, "batch registered");
        Ok(())
    }

    // ---- Access control ----

    /// Owner only. The new owner gains register rights immediately.
    pub fn transfer_ownership(&mut self, tx: &mut Transaction, new_owner: Address) -> Result<()> {
        let mut access = self.access.clone();
        let previous_owner = access.transfer_ownership(tx.sender(), new_owner)?;
        tx.emit(
            self.address,
            &VerificationEvent::<C::Fields>::OwnershipTransferred {
                previous_owner,
                new_owner,
            },
        )?;
        self.access = access;
        info!(registry = %self.address, %previous_owner, %new_owner, "ownership transferred");
        Ok(())
    }

    /// Admin only.
    pub fn update_admin(&mut self, tx: &mut Transaction, new_admin: Address) -> Result<()> {
        let mut access = self.access.clone();
        let previous_admin = access.update_admin(tx.sender(), new_admin)?;
        tx.emit(
            self.address,
            &VerificationEvent::<C::Fields>::AdminUpdated {
                previous_admin,
                new_admin,
            },
        )?;
        self.access = access;
        info!(registry = %self.address, %previous_admin, %new_admin, "admin updated");
        Ok(())
    }

    // ---- Reads ----

    pub fn exists(&self, id: &Bytes32) -> bool {
        self.records.contains_key(id)
    }

    /// `true` iff the record exists, its hash equals `content_hash`, and the
    /// paired registry reports the id valid. Never fails.
    pub fn verify<V>(&self, reader: &V, id: &Bytes32, content_hash: &Bytes32) -> bool
    where
        V: RevocationReader + ?Sized,
    {
        self.records
            .get(id)
            .is_some_and(|r| r.content_hash == *content_hash && self.live_valid(reader, id))
    }

    pub fn is_valid<V>(&self, reader: &V, id: &Bytes32) -> bool
    where
        V: RevocationReader + ?Sized,
    {
        self.exists(id) && self.live_valid(reader, id)
    }

    pub fn is_revoked<V>(&self, reader: &V, id: &Bytes32) -> bool
    where
        V: RevocationReader + ?Sized,
    {
        self.exists(id) && self.is_paired(reader) && reader.is_revoked(id)
    }

    pub fn status<V>(&self, reader: &V, id: &Bytes32) -> VerificationStatus
    where
        V: RevocationReader + ?Sized,
    {
        match self.records.get(id) {
            Some(record) => VerificationStatus {
                exists: true,
                valid: self.live_valid(reader, id),
                revoked: self.is_paired(reader) && reader.is_revoked(id),
                registered_at: record.registered_at,
            },
            None => VerificationStatus::default(),
        }
    }

    /// The stored record with its live validity; `NotFound` for unknown ids.
    pub fn get<V>(&self, reader: &V, id: &Bytes32) -> Result<VerificationEntry<C::Fields>>
    where
        V: RevocationReader + ?Sized,
    {
        let record = self.record(id)?;
        Ok(VerificationEntry {
            record: record.clone(),
            is_valid: self.live_valid(reader, id),
        })
    }

    /// The stored record alone; `NotFound` for unknown ids.
    pub fn record(&self, id: &Bytes32) -> Result<&VerificationRecord<C::Fields>> {
        self.records.get(id).ok_or(VerificationError::NotFound {
            category: C::NAME,
            id: *id,
        })
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    pub fn id_at_index(&self, index: usize) -> Result<Bytes32> {
        self.ids
            .get(index)
            .copied()
            .ok_or(VerificationError::IndexOutOfBounds {
                index,
                count: self.ids.len(),
            })
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> &[Bytes32] {
        &self.ids
    }

    /// Records in registration order.
    pub fn records(&self) -> impl Iterator<Item = &VerificationRecord<C::Fields>> {
        self.ids.iter().filter_map(|id| self.records.get(id))
    }

    // ---- Internals ----

    pub(crate) fn ensure_owner(&self, tx: &Transaction) -> Result<()> {
        self.access.ensure_owner(tx.sender())
    }

    fn is_paired<V>(&self, reader: &V) -> bool
    where
        V: RevocationReader + ?Sized,
    {
        reader.address() == self.revocation_registry
    }

    fn live_valid<V>(&self, reader: &V, id: &Bytes32) -> bool
    where
        V: RevocationReader + ?Sized,
    {
        self.is_paired(reader) && reader.is_valid(id)
    }

    fn ensure_paired(&self, actual: Address) -> Result<()> {
        if actual != self.revocation_registry {
            return Err(VerificationError::RegistryMismatch {
                expected: self.revocation_registry,
                actual,
            });
        }
        Ok(())
    }

    fn check_new(&self, registration: &Registration<C::Fields>) -> Result<()> {
        if registration.content_hash.is_zero() {
            return Err(VerificationError::InvalidHash {
                field: C::HASH_FIELD,
            });
        }
        if self.records.contains_key(&registration.id) {
            return Err(self.already_registered(registration.id));
        }
        Ok(())
    }

    fn already_registered(&self, id: Bytes32) -> VerificationError {
        VerificationError::AlreadyRegistered {
            category: C::NAME,
            id,
        }
    }

    fn store(
        &mut self,
        tx: &mut Transaction,
        journal: &mut Journal<RegistryUndo>,
        registration: Registration<C::Fields>,
    ) -> Result<()> {
        let record = VerificationRecord {
            id: registration.id,
            content_hash: registration.content_hash,
            issuer: tx.sender(),
            uri: registration.uri,
            fields: registration.fields,
            registered_at: tx.block_time(),
        };
        let event = VerificationEvent::Registered {
            id: record.id,
            content_hash: record.content_hash,
            issuer: record.issuer,
            uri: record.uri.clone(),
            fields: record.fields.clone(),
            timestamp: record.registered_at,
        };
        let id = record.id;
        self.records.insert(id, record);
        self.ids.push(id);
        journal.record(RegistryUndo::Insert(id));
        tx.emit(self.address, &event)?;
        Ok(())
    }

    /// Run `op` as one unit: on error, undo its local writes and drop the
    /// events it buffered.
    fn atomically<T>(
        &mut self,
        tx: &mut Transaction,
        op: impl FnOnce(&mut Self, &mut Transaction, &mut Journal<RegistryUndo>) -> Result<T>,
    ) -> Result<T> {
        let checkpoint = tx.checkpoint();
        let mut journal = Journal::new();
        match op(self, tx, &mut journal) {
            Ok(out) => {
                journal.commit();
                Ok(out)
            }
            Err(err) => {
                let undone = journal.rollback(self);
                tx.revert_to(checkpoint);
                debug!(registry = %self.address, undone, error = %err, "rolled back");
                Err(err)
            }
        }
    }
}

/// Check one parallel batch array against the id array.
pub(crate) fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(VerificationError::ArrayLengthMismatch {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}
