//! Image verification: content hash plus metadata and perceptual hashes.

use serde::{Deserialize, Serialize};

use bth_chain::Transaction;
use bth_revocation::{Registrar, RevocationReader, RevocationRegistry};
use bth_types::Bytes32;

use crate::category::{Category, Registration, VerificationEntry, VerificationStatus};
use crate::error::Result;
use crate::registry::{check_len, VerificationRegistry};

bth_revocation::revocation_reasons! {
    /// Why an image was revoked.
    pub enum ImageReason {
        None = 0 => "NONE",
        Copyright = 1 => "COPYRIGHT",
        Manipulated = 2 => "MANIPULATED",
        Inappropriate = 3 => "INAPPROPRIATE",
        OwnerRequest = 4 => "OWNER_REQUEST",
        Other = 5 => "OTHER",
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Image;

/// Image-specific record fields. Both hashes may be zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFields {
    pub metadata_hash: Bytes32,
    pub image_type: String,
    pub perceptual_hash: Bytes32,
}

impl ImageFields {
    pub fn new(metadata_hash: Bytes32, image_type: impl Into<String>, perceptual_hash: Bytes32) -> Self {
        Self {
            metadata_hash,
            image_type: image_type.into(),
            perceptual_hash,
        }
    }
}

/// Perceptual hash with live validity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageExtended {
    pub perceptual_hash: Bytes32,
    pub is_valid: bool,
}

impl Category for Image {
    const NAME: &'static str = "image";
    const HASH_FIELD: &'static str = "image hash";
    type Reason = ImageReason;
    type Fields = ImageFields;
}

pub type ImageRegistry = VerificationRegistry<Image>;
pub type ImageRevocationRegistry = RevocationRegistry<ImageReason>;

impl VerificationRegistry<Image> {
    pub fn register_image<G>(
        &mut self,
        tx: &mut Transaction,
        registrar: &mut G,
        id: Bytes32,
        image_hash: Bytes32,
        uri: impl Into<String>,
        fields: ImageFields,
    ) -> Result<()>
    where
        G: Registrar + ?Sized,
    {
        self.register(tx, registrar, Registration::new(id, image_hash, uri, fields))
    }

    pub fn register_image_batch<G, U>(
        &mut self,
        tx: &mut Transaction,
        registrar: &mut G,
        ids: &[Bytes32],
        image_hashes: &[Bytes32],
        uris: &[U],
        fields: &[ImageFields],
    ) -> Result<()>
    where
        G: Registrar + ?Sized,
        U: AsRef<str>,
    {
        self.ensure_owner(tx)?;
        check_len("image hashes", ids.len(), image_hashes.len())?;
        check_len("uris", ids.len(), uris.len())?;
        check_len("image fields", ids.len(), fields.len())?;
        let registrations = ids
            .iter()
            .zip(image_hashes)
            .zip(uris)
            .zip(fields)
            .map(|(((id, hash), uri), fields)| {
                Registration::new(*id, *hash, uri.as_ref(), fields.clone())
            })
            .collect();
        self.register_batch(tx, registrar, registrations)
    }

    pub fn verify_image<V>(&self, reader: &V, id: &Bytes32, image_hash: &Bytes32) -> bool
    where
        V: RevocationReader + ?Sized,
    {
        self.verify(reader, id, image_hash)
    }

    pub fn is_image_valid<V: RevocationReader + ?Sized>(&self, reader: &V, id: &Bytes32) -> bool {
        self.is_valid(reader, id)
    }

    pub fn is_image_revoked<V: RevocationReader + ?Sized>(&self, reader: &V, id: &Bytes32) -> bool {
        self.is_revoked(reader, id)
    }

    pub fn image_status<V: RevocationReader + ?Sized>(
        &self,
        reader: &V,
        id: &Bytes32,
    ) -> VerificationStatus {
        self.status(reader, id)
    }

    pub fn image<V: RevocationReader + ?Sized>(
        &self,
        reader: &V,
        id: &Bytes32,
    ) -> Result<VerificationEntry<ImageFields>> {
        self.get(reader, id)
    }

    /// Perceptual hash and live validity; `NotFound` for unknown ids.
    pub fn image_extended<V: RevocationReader + ?Sized>(
        &self,
        reader: &V,
        id: &Bytes32,
    ) -> Result<ImageExtended> {
        let entry = self.get(reader, id)?;
        Ok(ImageExtended {
            perceptual_hash: entry.record.fields.perceptual_hash,
            is_valid: entry.is_valid,
        })
    }

    pub fn image_count(&self) -> usize {
        self.count()
    }

    pub fn image_id_at_index(&self, index: usize) -> Result<Bytes32> {
        self.id_at_index(index)
    }
}
