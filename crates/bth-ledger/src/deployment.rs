use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use bth_chain::{contract_address, Clock, EventLog, SystemClock, Transaction};
use bth_revocation::{RevocationReason, RevocationRegistry, RevocationStatus};
use bth_types::{Address, Bytes32};
use bth_verification::{
    Category, Registration, VerificationEntry, VerificationRegistry, VerificationStatus,
};

use crate::audit::{self, AuditReport, IdHistory};
use crate::error::{LedgerError, LedgerResult};

/// The linked contract pair of one deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Contracts<C: Category> {
    pub revocation: RevocationRegistry<C::Reason>,
    pub verification: VerificationRegistry<C>,
}

/// A deployed, linked registry pair with its committed event log.
///
/// Every write runs through [`execute`](Self::execute) as one transaction:
/// its events reach the log only if the whole operation succeeds.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Deployment<C: Category> {
    deployer: Address,
    contracts: Contracts<C>,
    log: EventLog,
    #[serde(skip, default = "system_clock")]
    clock: Arc<dyn Clock>,
}

fn system_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}

impl<C: Category> Deployment<C> {
    /// Deploy the revocation registry, deploy the verification registry
    /// against it, then bind the two. Each step is its own transaction.
    pub fn deploy(deployer: Address, admin: Address, clock: Arc<dyn Clock>) -> LedgerResult<Self> {
        let mut log = EventLog::new();

        let revocation_address = contract_address(&deployer, 0);
        let tx = Transaction::new(deployer, clock.now());
        let mut revocation = RevocationRegistry::new(revocation_address, deployer);
        log.commit(tx.into_events());

        let verification_address = contract_address(&deployer, 1);
        let tx = Transaction::new(deployer, clock.now());
        let verification =
            VerificationRegistry::new(verification_address, deployer, revocation_address, admin)?;
        log.commit(tx.into_events());

        let mut tx = Transaction::new(deployer, clock.now());
        revocation.set_verification_contract(&mut tx, verification_address)?;
        log.commit(tx.into_events());

        info!(
            category = C::NAME,
            %deployer,
            revocation = %revocation_address,
            verification = %verification_address,
            "deployment linked"
        );
        Ok(Self {
            deployer,
            contracts: Contracts {
                revocation,
                verification,
            },
            log,
            clock,
        })
    }

    /// Replace the clock, e.g. after loading persisted state.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Run `op` as one transaction submitted by `caller`.
    pub fn execute<T>(
        &mut self,
        caller: Address,
        op: impl FnOnce(&mut Contracts<C>, &mut Transaction) -> LedgerResult<T>,
    ) -> LedgerResult<T> {
        let mut tx = Transaction::new(caller, self.clock.now());
        match op(&mut self.contracts, &mut tx) {
            Ok(out) => {
                let seqs = self.log.commit(tx.into_events());
                debug!(%caller, first = seqs.start(), last = seqs.end(), "transaction committed");
                Ok(out)
            }
            Err(err) => {
                warn!(%caller, category = C::NAME, error = %err, "transaction rejected");
                Err(err)
            }
        }
    }

    // ---- Writes ----

    pub fn register(&mut self, caller: Address, registration: Registration<C::Fields>) -> LedgerResult<()> {
        self.execute(caller, |c, tx| {
            Ok(c.verification.register(tx, &mut c.revocation, registration)?)
        })
    }

    pub fn register_batch(
        &mut self,
        caller: Address,
        registrations: Vec<Registration<C::Fields>>,
    ) -> LedgerResult<()> {
        self.execute(caller, |c, tx| {
            Ok(c.verification.register_batch(tx, &mut c.revocation, registrations)?)
        })
    }

    pub fn revoke(&mut self, caller: Address, id: Bytes32, reason: C::Reason) -> LedgerResult<()> {
        self.execute(caller, |c, tx| Ok(c.revocation.revoke(tx, id, reason)?))
    }

    pub fn revoke_batch(
        &mut self,
        caller: Address,
        ids: &[Bytes32],
        reason: C::Reason,
    ) -> LedgerResult<()> {
        self.execute(caller, |c, tx| Ok(c.revocation.revoke_batch(tx, ids, reason)?))
    }

    /// [`revoke`](Self::revoke) with the reason as text. The owner check runs
    /// before the reason is parsed.
    pub fn revoke_str(&mut self, caller: Address, id: Bytes32, reason: &str) -> LedgerResult<()> {
        self.execute(caller, |c, tx| {
            c.revocation.ensure_owner(tx)?;
            let reason = parse_reason::<C>(reason)?;
            Ok(c.revocation.revoke(tx, id, reason)?)
        })
    }

    pub fn revoke_batch_str(
        &mut self,
        caller: Address,
        ids: &[Bytes32],
        reason: &str,
    ) -> LedgerResult<()> {
        self.execute(caller, |c, tx| {
            c.revocation.ensure_owner(tx)?;
            let reason = parse_reason::<C>(reason)?;
            Ok(c.revocation.revoke_batch(tx, ids, reason)?)
        })
    }

    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> LedgerResult<()> {
        self.execute(caller, |c, tx| {
            Ok(c.verification.transfer_ownership(tx, new_owner)?)
        })
    }

    pub fn update_admin(&mut self, caller: Address, new_admin: Address) -> LedgerResult<()> {
        self.execute(caller, |c, tx| Ok(c.verification.update_admin(tx, new_admin)?))
    }

    // ---- Reads ----

    pub fn verify(&self, id: &Bytes32, content_hash: &Bytes32) -> bool {
        self.contracts
            .verification
            .verify(&self.contracts.revocation, id, content_hash)
    }

    pub fn status(&self, id: &Bytes32) -> VerificationStatus {
        self.contracts
            .verification
            .status(&self.contracts.revocation, id)
    }

    pub fn revocation_status(&self, id: &Bytes32) -> RevocationStatus<C::Reason> {
        self.contracts.revocation.get_status(id)
    }

    pub fn get(&self, id: &Bytes32) -> LedgerResult<VerificationEntry<C::Fields>> {
        Ok(self
            .contracts
            .verification
            .get(&self.contracts.revocation, id)?)
    }

    pub fn ids(&self) -> &[Bytes32] {
        self.contracts.verification.ids()
    }

    pub fn deployer(&self) -> Address {
        self.deployer
    }

    pub fn revocation(&self) -> &RevocationRegistry<C::Reason> {
        &self.contracts.revocation
    }

    pub fn verification(&self) -> &VerificationRegistry<C> {
        &self.contracts.verification
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Parse a reason given as a wire code (`"1"`) or a label (`"outdated"`).
    pub fn parse_reason(&self, input: &str) -> LedgerResult<C::Reason> {
        parse_reason::<C>(input)
    }

    // ---- Audit ----

    /// Reconstruct one id's history from the event log alone.
    pub fn history(&self, id: &Bytes32) -> IdHistory {
        let mut all = self.histories();
        all.remove(id).unwrap_or_else(|| IdHistory::new(*id))
    }

    /// Histories of every id the log mentions. Undecodable entries are
    /// skipped; [`audit`](Self::audit) reports them.
    pub fn histories(&self) -> BTreeMap<Bytes32, IdHistory> {
        audit::replay::<C>(
            &self.log,
            self.contracts.verification.address(),
            self.contracts.revocation.address(),
        )
        .histories
    }

    pub fn audit(&self) -> AuditReport {
        audit::audit(
            &self.log,
            &self.contracts.revocation,
            &self.contracts.verification,
        )
    }
}

fn parse_reason<C: Category>(input: &str) -> LedgerResult<C::Reason> {
    let parsed = match input.trim().parse::<u8>() {
        Ok(code) => C::Reason::from_code(code),
        Err(_) => C::Reason::from_label(input),
    };
    parsed.ok_or_else(|| LedgerError::UnknownReason {
        category: C::NAME,
        input: input.to_string(),
    })
}

impl<C: Category> PartialEq for Deployment<C> {
    fn eq(&self, other: &Self) -> bool {
        self.deployer == other.deployer && self.contracts == other.contracts && self.log == other.log
    }
}
