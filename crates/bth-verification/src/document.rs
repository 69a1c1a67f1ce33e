//! Document verification: a content hash and a URI, nothing more.

use bth_chain::Transaction;
use bth_revocation::{Registrar, RevocationReader, RevocationRegistry};
use bth_types::Bytes32;

use crate::category::{Category, Registration, VerificationEntry, VerificationStatus};
use crate::error::Result;
use crate::registry::{check_len, VerificationRegistry};

bth_revocation::revocation_reasons! {
    /// Why a document was revoked.
    pub enum DocumentReason {
        None = 0 => "NONE",
        Fraud = 1 => "FRAUD",
        Expired = 2 => "EXPIRED",
        Superseded = 3 => "SUPERSEDED",
        OwnerRequest = 4 => "OWNER_REQUEST",
        Other = 5 => "OTHER",
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Document;

impl Category for Document {
    const NAME: &'static str = "document";
    const HASH_FIELD: &'static str = "document hash";
    type Reason = DocumentReason;
    type Fields = ();
}

pub type DocumentRegistry = VerificationRegistry<Document>;
pub type DocumentRevocationRegistry = RevocationRegistry<DocumentReason>;

impl VerificationRegistry<Document> {
    pub fn register_document<G>(
        &mut self,
        tx: &mut Transaction,
        registrar: &mut G,
        id: Bytes32,
        document_hash: Bytes32,
        uri: impl Into<String>,
    ) -> Result<()>
    where
        G: Registrar + ?Sized,
    {
        self.register(tx, registrar, Registration::new(id, document_hash, uri, ()))
    }

    /// All-or-nothing; the three arrays must have the same non-zero length.
    pub fn register_document_batch<G, U>(
        &mut self,
        tx: &mut Transaction,
        registrar: &mut G,
        ids: &[Bytes32],
        document_hashes: &[Bytes32],
        uris: &[U],
    ) -> Result<()>
    where
        G: Registrar + ?Sized,
        U: AsRef<str>,
    {
        self.ensure_owner(tx)?;
        check_len("document hashes", ids.len(), document_hashes.len())?;
        check_len("uris", ids.len(), uris.len())?;
        let registrations = ids
            .iter()
            .zip(document_hashes)
            .zip(uris)
            .map(|((id, hash), uri)| Registration::new(*id, *hash, uri.as_ref(), ()))
            .collect();
        self.register_batch(tx, registrar, registrations)
    }

    pub fn verify_document<V>(&self, reader: &V, id: &Bytes32, document_hash: &Bytes32) -> bool
    where
        V: RevocationReader + ?Sized,
    {
        self.verify(reader, id, document_hash)
    }

    pub fn is_document_valid<V: RevocationReader + ?Sized>(&self, reader: &V, id: &Bytes32) -> bool {
        self.is_valid(reader, id)
    }

    pub fn is_document_revoked<V: RevocationReader + ?Sized>(&self, reader: &V, id: &Bytes32) -> bool {
        self.is_revoked(reader, id)
    }

    pub fn document_status<V: RevocationReader + ?Sized>(
        &self,
        reader: &V,
        id: &Bytes32,
    ) -> VerificationStatus {
        self.status(reader, id)
    }

    pub fn document<V: RevocationReader + ?Sized>(
        &self,
        reader: &V,
        id: &Bytes32,
    ) -> Result<VerificationEntry<()>> {
        self.get(reader, id)
    }

    pub fn document_count(&self) -> usize {
        self.count()
    }

    pub fn document_id_at_index(&self, index: usize) -> Result<Bytes32> {
        self.id_at_index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VerificationError;
    use bth_revocation::{RevocationError, RevocationReason};
    use bth_types::{Address, BlockTime};

    fn owner() -> Address {
        Address::derive("owner")
    }

    fn tx(sender: Address) -> Transaction {
        Transaction::new(sender, BlockTime::from_secs(1_700_000_000))
    }

    fn deploy() -> (DocumentRegistry, DocumentRevocationRegistry) {
        let mut revocation = DocumentRevocationRegistry::new(Address::derive("doc-revocation"), owner());
        let documents = DocumentRegistry::new(
            Address::derive("doc-verification"),
            owner(),
            revocation.address(),
            Address::derive("admin"),
        )
        .unwrap();
        revocation
            .set_verification_contract(&mut tx(owner()), documents.address())
            .unwrap();
        (documents, revocation)
    }

    fn id(label: &str) -> Bytes32 {
        Bytes32::from_label(label)
    }

    fn hash(label: &str) -> Bytes32 {
        Bytes32::digest(label.as_bytes())
    }

    #[test]
    fn register_and_verify() {
        let (mut documents, mut revocation) = deploy();
        documents
            .register_document(&mut tx(owner()), &mut revocation, id("A"), hash("a"), "ipfs://a")
            .unwrap();
        assert!(documents.verify_document(&revocation, &id("A"), &hash("a")));
        assert!(!documents.verify_document(&revocation, &id("A"), &hash("b")));
        assert_eq!(documents.document(&revocation, &id("A")).unwrap().record.uri, "ipfs://a");
    }

    #[test]
    fn empty_uri_is_allowed() {
        let (mut documents, mut revocation) = deploy();
        documents
            .register_document(&mut tx(owner()), &mut revocation, id("A"), hash("a"), "")
            .unwrap();
        assert_eq!(documents.document_count(), 1);
    }

    #[test]
    fn duplicate_rejected_regardless_of_payload() {
        let (mut documents, mut revocation) = deploy();
        documents
            .register_document(&mut tx(owner()), &mut revocation, id("A"), hash("a"), "x")
            .unwrap();
        let err = documents
            .register_document(&mut tx(owner()), &mut revocation, id("A"), hash("other"), "y")
            .unwrap_err();
        assert_eq!(
            err,
            VerificationError::AlreadyRegistered {
                category: "document",
                id: id("A")
            }
        );
        assert_eq!(err.to_string(), format!("document already registered: {}", id("A")));
    }

    #[test]
    fn zero_hash_rejected() {
        let (mut documents, mut revocation) = deploy();
        let err = documents
            .register_document(&mut tx(owner()), &mut revocation, id("A"), Bytes32::ZERO, "x")
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid document hash");
        assert!(!revocation.is_registered(&id("A")));
    }

    #[test]
    fn batch_with_registered_member_applies_nothing() {
        let (mut documents, mut revocation) = deploy();
        documents
            .register_document(&mut tx(owner()), &mut revocation, id("B"), hash("b"), "uri-b")
            .unwrap();
        let err = documents
            .register_document_batch(
                &mut tx(owner()),
                &mut revocation,
                &[id("A"), id("B")],
                &[hash("a"), hash("b")],
                &["uri-a", "uri-b"],
            )
            .unwrap_err();
        assert!(matches!(err, VerificationError::AlreadyRegistered { .. }));
        assert!(!revocation.is_registered(&id("A")));
        assert!(!documents.exists(&id("A")));
        assert_eq!(documents.document_count(), 1);
    }

    #[test]
    fn batch_registers_everything_with_summary_event() {
        let (mut documents, mut revocation) = deploy();
        let mut t = tx(owner());
        documents
            .register_document_batch(
                &mut t,
                &mut revocation,
                &[id("A"), id("B")],
                &[hash("a"), hash("b")],
                &["uri-a", "uri-b"],
            )
            .unwrap();
        assert_eq!(documents.document_id_at_index(0).unwrap(), id("A"));
        assert_eq!(documents.document_id_at_index(1).unwrap(), id("B"));
        let names: Vec<_> = t.events().iter().map(|e| e.name.clone()).collect();
        assert_eq!(
            names,
            ["Registered", "Registered", "BatchRegistered", "BatchRegistered"]
        );
    }

    #[test]
    fn batch_length_and_emptiness_checks() {
        let (mut documents, mut revocation) = deploy();
        let err = documents
            .register_document_batch(
                &mut tx(owner()),
                &mut revocation,
                &[id("A"), id("B")],
                &[hash("a")],
                &["x", "y"],
            )
            .unwrap_err();
        assert!(matches!(err, VerificationError::ArrayLengthMismatch { .. }));

        let none: [&str; 0] = [];
        assert_eq!(
            documents
                .register_document_batch(&mut tx(owner()), &mut revocation, &[], &[], &none)
                .unwrap_err(),
            VerificationError::EmptyArrays
        );
    }

    #[test]
    fn non_owner_batch_is_rejected_before_shape_checks() {
        let (mut documents, mut revocation) = deploy();
        let stranger = Address::derive("stranger");
        let err = documents
            .register_document_batch(
                &mut tx(stranger),
                &mut revocation,
                &[id("A")],
                &[],
                &["x"],
            )
            .unwrap_err();
        assert_eq!(err, VerificationError::NotOwner { caller: stranger });
    }

    #[test]
    fn revocation_flips_validity_but_keeps_content() {
        let (mut documents, mut revocation) = deploy();
        documents
            .register_document(&mut tx(owner()), &mut revocation, id("A"), hash("a"), "x")
            .unwrap();
        revocation
            .revoke(&mut tx(owner()), id("A"), DocumentReason::Superseded)
            .unwrap();
        assert!(!documents.verify_document(&revocation, &id("A"), &hash("a")));
        assert!(documents.is_document_revoked(&revocation, &id("A")));
        assert!(!documents.is_document_valid(&revocation, &id("A")));
        let entry = documents.document(&revocation, &id("A")).unwrap();
        assert_eq!(entry.record.content_hash, hash("a"));
        assert!(!entry.is_valid);
        let status = documents.document_status(&revocation, &id("A"));
        assert!(status.exists && status.revoked && !status.valid);
    }

    #[test]
    fn verification_contract_cannot_revoke() {
        let (documents, mut revocation) = deploy();
        let err = revocation
            .revoke(&mut tx(documents.address()), id("A"), DocumentReason::Fraud)
            .unwrap_err();
        assert_eq!(err, RevocationError::NotOwner { caller: documents.address() });
    }

    #[test]
    fn reason_codes() {
        assert_eq!(DocumentReason::from_code(3), Some(DocumentReason::Superseded));
        assert_eq!(DocumentReason::OwnerRequest.code(), 4);
        assert_eq!(DocumentReason::from_code(6), None);
        assert_eq!(DocumentReason::revocable().len(), 5);
    }
}
