//! Dataset verification: data hash, URI and a free-form dataset type.

use serde::{Deserialize, Serialize};

use bth_chain::Transaction;
use bth_revocation::{Registrar, RevocationReader, RevocationRegistry};
use bth_types::Bytes32;

use crate::category::{Category, Registration, VerificationEntry, VerificationStatus};
use crate::error::Result;
use crate::registry::{check_len, VerificationRegistry};

bth_revocation::revocation_reasons! {
    /// Why a dataset was revoked.
    pub enum DatasetReason {
        None = 0 => "NONE",
        Outdated = 1 => "OUTDATED",
        Corrupted = 2 => "CORRUPTED",
        Retracted = 3 => "RETRACTED",
        OwnerRequest = 4 => "OWNER_REQUEST",
        Other = 5 => "OTHER",
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dataset;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetFields {
    pub dataset_type: String,
}

impl Category for Dataset {
    const NAME: &'static str = "dataset";
    const HASH_FIELD: &'static str = "data hash";
    type Reason = DatasetReason;
    type Fields = DatasetFields;
}

pub type DatasetRegistry = VerificationRegistry<Dataset>;
pub type DatasetRevocationRegistry = RevocationRegistry<DatasetReason>;

impl VerificationRegistry<Dataset> {
    pub fn register_dataset<G>(
        &mut self,
        tx: &mut Transaction,
        registrar: &mut G,
        id: Bytes32,
        data_hash: Bytes32,
        uri: impl Into<String>,
        dataset_type: impl Into<String>,
    ) -> Result<()>
    where
        G: Registrar + ?Sized,
    {
        let fields = DatasetFields {
            dataset_type: dataset_type.into(),
        };
        self.register(tx, registrar, Registration::new(id, data_hash, uri, fields))
    }

    pub fn register_dataset_batch<G, U, T>(
        &mut self,
        tx: &mut Transaction,
        registrar: &mut G,
        ids: &[Bytes32],
        data_hashes: &[Bytes32],
        uris: &[U],
        dataset_types: &[T],
    ) -> Result<()>
    where
        G: Registrar + ?Sized,
        U: AsRef<str>,
        T: AsRef<str>,
    {
        self.ensure_owner(tx)?;
        check_len("data hashes", ids.len(), data_hashes.len())?;
        check_len("uris", ids.len(), uris.len())?;
        check_len("dataset types", ids.len(), dataset_types.len())?;
        let registrations = ids
            .iter()
            .zip(data_hashes)
            .zip(uris)
            .zip(dataset_types)
            .map(|(((id, hash), uri), dataset_type)| {
                let fields = DatasetFields {
                    dataset_type: dataset_type.as_ref().to_string(),
                };
                Registration::new(*id, *hash, uri.as_ref(), fields)
            })
            .collect();
        self.register_batch(tx, registrar, registrations)
    }

    pub fn verify_dataset<V>(&self, reader: &V, id: &Bytes32, data_hash: &Bytes32) -> bool
    where
        V: RevocationReader + ?Sized,
    {
        self.verify(reader, id, data_hash)
    }

    pub fn is_dataset_valid<V: RevocationReader + ?Sized>(&self, reader: &V, id: &Bytes32) -> bool {
        self.is_valid(reader, id)
    }

    pub fn is_dataset_revoked<V: RevocationReader + ?Sized>(&self, reader: &V, id: &Bytes32) -> bool {
        self.is_revoked(reader, id)
    }

    pub fn dataset_status<V: RevocationReader + ?Sized>(
        &self,
        reader: &V,
        id: &Bytes32,
    ) -> VerificationStatus {
        self.status(reader, id)
    }

    pub fn dataset<V: RevocationReader + ?Sized>(
        &self,
        reader: &V,
        id: &Bytes32,
    ) -> Result<VerificationEntry<DatasetFields>> {
        self.get(reader, id)
    }

    pub fn dataset_count(&self) -> usize {
        self.count()
    }

    pub fn dataset_id_at_index(&self, index: usize) -> Result<Bytes32> {
        self.id_at_index(index)
    }
}
