//! Category-agnostic access to a deployment, for tooling.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use bth_chain::{Clock, EventLog};
use bth_revocation::RevocationReason;
use bth_types::{parse_bytes32_or_label, Address, BlockTime, Bytes32};
use bth_verification::{
    Category, Dataset, DatasetFields, Document, Image, ImageFields, Registration,
    VerificationStatus,
};

use crate::audit::{AuditReport, IdHistory};
use crate::config::CategoryKind;
use crate::deployment::Deployment;
use crate::error::LedgerResult;
use crate::store;

/// Category fields in untyped form. Each category reads what it needs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldArgs {
    pub metadata_hash: Bytes32,
    pub image_type: String,
    pub perceptual_hash: Bytes32,
    pub dataset_type: String,
}

impl FieldArgs {
    /// Parse an optional hash field; unset means zero.
    pub fn parse_hash(input: Option<&str>) -> LedgerResult<Bytes32> {
        match input {
            Some(input) => Ok(parse_bytes32_or_label(input)?),
            None => Ok(Bytes32::ZERO),
        }
    }
}

/// A registration request before the category is known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRegistration {
    pub id: Bytes32,
    pub content_hash: Bytes32,
    pub uri: String,
    pub fields: FieldArgs,
}

impl RawRegistration {
    /// Build from user input: `id` and `hash` are hex or labels.
    pub fn parse(
        id: &str,
        hash: &str,
        uri: impl Into<String>,
        fields: FieldArgs,
    ) -> LedgerResult<Self> {
        Ok(Self {
            id: parse_bytes32_or_label(id)?,
            content_hash: parse_bytes32_or_label(hash)?,
            uri: uri.into(),
            fields,
        })
    }

    fn typed<F: FromFieldArgs>(&self) -> Registration<F> {
        Registration::new(
            self.id,
            self.content_hash,
            self.uri.clone(),
            F::from_field_args(&self.fields),
        )
    }
}

trait FromFieldArgs {
    fn from_field_args(args: &FieldArgs) -> Self;
}

impl FromFieldArgs for () {
    fn from_field_args(_: &FieldArgs) -> Self {}
}

impl FromFieldArgs for ImageFields {
    fn from_field_args(args: &FieldArgs) -> Self {
        ImageFields::new(args.metadata_hash, args.image_type.clone(), args.perceptual_hash)
    }
}

impl FromFieldArgs for DatasetFields {
    fn from_field_args(args: &FieldArgs) -> Self {
        DatasetFields {
            dataset_type: args.dataset_type.clone(),
        }
    }
}

/// One record with live status, fields rendered as JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecordView {
    pub id: Bytes32,
    pub content_hash: Bytes32,
    pub issuer: Address,
    pub uri: String,
    pub registered_at: BlockTime,
    pub valid: bool,
    pub revoked: bool,
    pub reason: String,
    pub fields: serde_json::Value,
}

/// Addresses and roles of a deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeploymentInfo {
    pub category: CategoryKind,
    pub deployer: Address,
    pub revocation: Address,
    pub verification: Address,
    pub owner: Address,
    pub admin: Address,
    pub records: usize,
    pub log_entries: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum AnyDeployment {
    Document(Deployment<Document>),
    Image(Deployment<Image>),
    Dataset(Deployment<Dataset>),
}

macro_rules! each {
    ($self:expr, $d:ident => $body:expr) => {
        match $self {
            AnyDeployment::Document($d) => $body,
            AnyDeployment::Image($d) => $body,
            AnyDeployment::Dataset($d) => $body,
        }
    };
}

fn view<C: Category>(d: &Deployment<C>, id: &Bytes32) -> LedgerResult<RecordView> {
    let entry = d.get(id)?;
    let status = d.revocation_status(id);
    Ok(RecordView {
        id: entry.record.id,
        content_hash: entry.record.content_hash,
        issuer: entry.record.issuer,
        uri: entry.record.uri,
        registered_at: entry.record.registered_at,
        valid: entry.is_valid,
        revoked: !status.reason.is_none(),
        reason: status.reason.label().to_string(),
        fields: serde_json::to_value(&entry.record.fields)?,
    })
}

impl AnyDeployment {
    pub fn deploy(
        category: CategoryKind,
        deployer: Address,
        admin: Address,
        clock: Arc<dyn Clock>,
    ) -> LedgerResult<Self> {
        Ok(match category {
            CategoryKind::Document => Self::Document(Deployment::deploy(deployer, admin, clock)?),
            CategoryKind::Image => Self::Image(Deployment::deploy(deployer, admin, clock)?),
            CategoryKind::Dataset => Self::Dataset(Deployment::deploy(deployer, admin, clock)?),
        })
    }

    pub fn category(&self) -> CategoryKind {
        match self {
            Self::Document(_) => CategoryKind::Document,
            Self::Image(_) => CategoryKind::Image,
            Self::Dataset(_) => CategoryKind::Dataset,
        }
    }

    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        match self {
            Self::Document(d) => Self::Document(d.with_clock(clock)),
            Self::Image(d) => Self::Image(d.with_clock(clock)),
            Self::Dataset(d) => Self::Dataset(d.with_clock(clock)),
        }
    }

    pub fn save(&self, path: &Path) -> LedgerResult<()> {
        store::save_json(self, path)
    }

    /// Load persisted state and attach `clock` for new transactions.
    pub fn load(path: &Path, clock: Arc<dyn Clock>) -> LedgerResult<Self> {
        let loaded: Self = store::load_json(path)?;
        Ok(loaded.with_clock(clock))
    }

    // ---- Writes ----

    pub fn register(&mut self, caller: Address, raw: &RawRegistration) -> LedgerResult<()> {
        each!(self, d => d.register(caller, raw.typed()))
    }

    pub fn register_batch(&mut self, caller: Address, raws: &[RawRegistration]) -> LedgerResult<()> {
        each!(self, d => d.register_batch(caller, raws.iter().map(RawRegistration::typed).collect()))
    }

    /// `reason` is a code or a label of this deployment's category.
    pub fn revoke(&mut self, caller: Address, id: Bytes32, reason: &str) -> LedgerResult<()> {
        each!(self, d => d.revoke_str(caller, id, reason))
    }

    pub fn revoke_batch(&mut self, caller: Address, ids: &[Bytes32], reason: &str) -> LedgerResult<()> {
        each!(self, d => d.revoke_batch_str(caller, ids, reason))
    }

    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> LedgerResult<()> {
        each!(self, d => d.transfer_ownership(caller, new_owner))
    }

    pub fn update_admin(&mut self, caller: Address, new_admin: Address) -> LedgerResult<()> {
        each!(self, d => d.update_admin(caller, new_admin))
    }

    // ---- Reads ----

    pub fn verify(&self, id: &Bytes32, content_hash: &Bytes32) -> bool {
        each!(self, d => d.verify(id, content_hash))
    }

    pub fn status(&self, id: &Bytes32) -> VerificationStatus {
        each!(self, d => d.status(id))
    }

    pub fn show(&self, id: &Bytes32) -> LedgerResult<RecordView> {
        each!(self, d => view(d, id))
    }

    /// Every record in registration order.
    pub fn list(&self) -> LedgerResult<Vec<RecordView>> {
        each!(self, d => d.ids().iter().map(|id| view(d, id)).collect())
    }

    /// Labels of the reasons a revoke call accepts.
    pub fn reason_labels(&self) -> Vec<&'static str> {
        fn labels<R: RevocationReason>() -> Vec<&'static str> {
            R::revocable().into_iter().map(R::label).collect()
        }
        match self {
            Self::Document(_) => labels::<<Document as Category>::Reason>(),
            Self::Image(_) => labels::<<Image as Category>::Reason>(),
            Self::Dataset(_) => labels::<<Dataset as Category>::Reason>(),
        }
    }

    pub fn info(&self) -> DeploymentInfo {
        let category = self.category();
        each!(self, d => DeploymentInfo {
            category,
            deployer: d.deployer(),
            revocation: d.revocation().address(),
            verification: d.verification().address(),
            owner: d.verification().owner(),
            admin: d.verification().admin(),
            records: d.verification().count(),
            log_entries: d.log().len(),
        })
    }

    pub fn log(&self) -> &EventLog {
        each!(self, d => d.log())
    }

    pub fn history(&self, id: &Bytes32) -> IdHistory {
        each!(self, d => d.history(id))
    }

    pub fn audit(&self) -> AuditReport {
        each!(self, d => d.audit())
    }
}
