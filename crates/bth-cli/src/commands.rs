use std::path::PathBuf;

use anyhow::{bail, Context};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use tracing::Level;

use bth_ledger::{
    AnyDeployment, AuditReport, DeploymentInfo, FieldArgs, IdHistory, LedgerConfig, LedgerError,
    LedgerResult, RawRegistration, RecordView,
};
use bth_types::{parse_address_or_label, parse_bytes32_or_label, Address, Bytes32};

use crate::cli::*;

/// Settings shared by every command after the config is resolved.
struct Session {
    config: LedgerConfig,
    state: PathBuf,
    account: Option<Address>,
    format: OutputFormat,
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = LedgerConfig::load_or_default(&cli.config)
        .with_context(|| format!("reading config {}", cli.config.display()))?;
    init_tracing(&config, cli.verbose);

    let session = Session {
        state: cli.state.unwrap_or_else(|| config.state_file.clone()),
        account: cli.account.as_deref().map(parse_address_or_label).transpose()?,
        format: cli.format,
        config,
    };

    match cli.command {
        Command::Deploy(args) => cmd_deploy(&session, args),
        Command::Register(args) => cmd_register(&session, args),
        Command::RegisterBatch(args) => cmd_register_batch(&session, args),
        Command::Verify(args) => cmd_verify(&session, args),
        Command::Revoke(args) => cmd_revoke(&session, args),
        Command::RevokeBatch(args) => cmd_revoke_batch(&session, args),
        Command::Status(args) => cmd_status(&session, args),
        Command::Show(args) => cmd_show(&session, args),
        Command::List(args) => cmd_list(&session, args),
        Command::Info(_) => cmd_info(&session),
        Command::TransferOwnership(args) => cmd_transfer_ownership(&session, args),
        Command::UpdateAdmin(args) => cmd_update_admin(&session, args),
        Command::Log(args) => cmd_log(&session, args),
    }
}

fn init_tracing(config: &LedgerConfig, verbose: bool) {
    let level = if verbose {
        Level::DEBUG
    } else {
        config.log_level.parse().unwrap_or(Level::INFO)
    };
    // A second initialisation (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

pub(crate) fn field_args(flags: &FieldFlags) -> LedgerResult<FieldArgs> {
    Ok(FieldArgs {
        metadata_hash: FieldArgs::parse_hash(flags.metadata_hash.as_deref())?,
        image_type: flags.image_type.clone(),
        perceptual_hash: FieldArgs::parse_hash(flags.perceptual_hash.as_deref())?,
        dataset_type: flags.dataset_type.clone(),
    })
}

fn raw_registration(id: &str, hash: &str, uri: String, flags: &FieldFlags) -> LedgerResult<RawRegistration> {
    RawRegistration::parse(id, hash, uri, field_args(flags)?)
}

/// One element of a `register-batch` file.
#[derive(Debug, Deserialize)]
struct BatchItem {
    id: String,
    hash: String,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    metadata_hash: Option<String>,
    #[serde(default)]
    image_type: String,
    #[serde(default)]
    perceptual_hash: Option<String>,
    #[serde(default)]
    dataset_type: String,
}

impl BatchItem {
    fn into_raw(self) -> LedgerResult<RawRegistration> {
        let flags = FieldFlags {
            metadata_hash: self.metadata_hash,
            image_type: self.image_type,
            perceptual_hash: self.perceptual_hash,
            dataset_type: self.dataset_type,
        };
        raw_registration(&self.id, &self.hash, self.uri, &flags)
    }
}

impl Session {
    fn load(&self) -> anyhow::Result<AnyDeployment> {
        if !self.state.exists() {
            bail!(
                "no deployment at {}; run `bth deploy` first",
                self.state.display()
            );
        }
        AnyDeployment::load(&self.state, self.config.clock())
            .with_context(|| format!("loading {}", self.state.display()))
    }

    fn save(&self, deployment: &AnyDeployment) -> anyhow::Result<()> {
        deployment
            .save(&self.state)
            .with_context(|| format!("saving {}", self.state.display()))
    }

    /// `--as`, or the deployer when none is given.
    fn caller(&self, deployment: &AnyDeployment) -> Address {
        self.account.unwrap_or_else(|| deployment.info().deployer)
    }

    /// Print `value` as JSON, or run `text` for the human format.
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T)) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Text => text(value),
        }
        Ok(())
    }
}

/// Attach the accepted labels to an unknown-reason error.
fn with_reason_hint(result: LedgerResult<()>, labels: &[&str]) -> anyhow::Result<()> {
    match result {
        Err(err @ LedgerError::UnknownReason { .. }) => {
            Err(anyhow::Error::new(err).context(format!("accepted reasons: {}", labels.join(", "))))
        }
        other => Ok(other?),
    }
}

fn cmd_deploy(s: &Session, args: DeployArgs) -> anyhow::Result<()> {
    if s.state.exists() && !args.force {
        bail!(
            "{} already holds a deployment; pass --force to replace it",
            s.state.display()
        );
    }
    let category = args.category.unwrap_or(s.config.category);
    let deployer = s.account.unwrap_or_else(|| Address::derive("deployer"));
    let admin = parse_address_or_label(&args.admin)?;
    let deployment = AnyDeployment::deploy(category, deployer, admin, s.config.clock())?;
    s.save(&deployment)?;

    s.emit(&deployment.info(), |info| {
        println!("{} Deployed {} registry pair", "✓".green().bold(), info.category.to_string().cyan());
        print_info(info);
        println!("  State:        {}", s.state.display());
    })
}

fn cmd_register(s: &Session, args: RegisterArgs) -> anyhow::Result<()> {
    let mut d = s.load()?;
    let raw = raw_registration(&args.id, &args.hash, args.uri, &args.fields)?;
    d.register(s.caller(&d), &raw)?;
    s.save(&d)?;

    s.emit(&d.show(&raw.id)?, |view| {
        println!("{} Registered {} ({})", "✓".green().bold(), args.id.yellow(), view.id.short_hex().dimmed());
        println!("  Content hash: {}", view.content_hash);
        println!("  Issuer:       {}", view.issuer);
    })
}

fn cmd_register_batch(s: &Session, args: RegisterBatchArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let items: Vec<BatchItem> = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", args.file.display()))?;
    let raws = items
        .into_iter()
        .map(BatchItem::into_raw)
        .collect::<LedgerResult<Vec<_>>>()
        .with_context(|| format!("parsing {}", args.file.display()))?;

    let mut d = s.load()?;
    d.register_batch(s.caller(&d), &raws)?;
    s.save(&d)?;

    let ids: Vec<Bytes32> = raws.iter().map(|r| r.id).collect();
    s.emit(&ids, |ids| {
        println!("{} Registered {} records", "✓".green().bold(), ids.len().to_string().bold());
        for id in ids {
            println!("  {}", id.short_hex().dimmed());
        }
    })
}

#[derive(Serialize)]
struct VerifyOutput {
    id: Bytes32,
    content_hash: Bytes32,
    valid: bool,
}

fn cmd_verify(s: &Session, args: VerifyArgs) -> anyhow::Result<()> {
    let d = s.load()?;
    let id = parse_bytes32_or_label(&args.id)?;
    let content_hash = parse_bytes32_or_label(&args.hash)?;
    let out = VerifyOutput {
        id,
        content_hash,
        valid: d.verify(&id, &content_hash),
    };
    s.emit(&out, |out| {
        if out.valid {
            println!("{} {} is valid", "✓".green().bold(), args.id.yellow());
        } else {
            println!("{} {} is not valid", "✗".red().bold(), args.id.yellow());
        }
    })
}

fn cmd_revoke(s: &Session, args: RevokeArgs) -> anyhow::Result<()> {
    let mut d = s.load()?;
    let id = parse_bytes32_or_label(&args.id)?;
    let labels = d.reason_labels();
    let caller = s.caller(&d);
    with_reason_hint(d.revoke(caller, id, &args.reason), &labels)?;
    s.save(&d)?;

    s.emit(&d.show(&id)?, |view| {
        println!("{} Revoked {} ({})", "✓".green().bold(), args.id.yellow(), view.reason.red());
    })
}

fn cmd_revoke_batch(s: &Session, args: RevokeBatchArgs) -> anyhow::Result<()> {
    let mut d = s.load()?;
    let ids = args
        .ids
        .iter()
        .map(|i| parse_bytes32_or_label(i))
        .collect::<Result<Vec<_>, _>>()?;
    let labels = d.reason_labels();
    let caller = s.caller(&d);
    with_reason_hint(d.revoke_batch(caller, &ids, &args.reason), &labels)?;
    s.save(&d)?;

    s.emit(&ids, |ids| {
        println!("{} Revoked {} records", "✓".green().bold(), ids.len().to_string().bold());
    })
}

fn cmd_status(s: &Session, args: IdArgs) -> anyhow::Result<()> {
    let d = s.load()?;
    let status = d.status(&parse_bytes32_or_label(&args.id)?);
    s.emit(&status, |st| {
        println!("{}", args.id.yellow().bold());
        println!("  Exists:     {}", yes_no(st.exists));
        println!("  Valid:      {}", yes_no(st.valid));
        println!("  Revoked:    {}", yes_no(st.revoked));
        if st.exists {
            println!("  Registered: {}", st.registered_at);
        }
    })
}

fn cmd_show(s: &Session, args: IdArgs) -> anyhow::Result<()> {
    let d = s.load()?;
    let view = d.show(&parse_bytes32_or_label(&args.id)?)?;
    s.emit(&view, print_record)
}

fn cmd_list(s: &Session, args: ListArgs) -> anyhow::Result<()> {
    let d = s.load()?;
    let views: Vec<RecordView> = d
        .list()?
        .into_iter()
        .filter(|v| !args.valid || v.valid)
        .collect();
    s.emit(&views, |views| {
        if views.is_empty() {
            println!("No records.");
        }
        for v in views {
            let mark = if v.valid { "✓".green() } else { "✗".red() };
            println!("{} {}  {}  {}", mark, v.id.short_hex().yellow(), v.registered_at, v.uri.dimmed());
        }
    })
}

fn cmd_info(s: &Session) -> anyhow::Result<()> {
    let d = s.load()?;
    s.emit(&d.info(), |info| {
        println!("{} registry pair", info.category.to_string().cyan().bold());
        print_info(info);
    })
}

fn cmd_transfer_ownership(s: &Session, args: AccountArgs) -> anyhow::Result<()> {
    let mut d = s.load()?;
    let new_owner = parse_address_or_label(&args.target)?;
    d.transfer_ownership(s.caller(&d), new_owner)?;
    s.save(&d)?;
    s.emit(&d.info(), |info| {
        println!("{} Ownership transferred to {}", "✓".green().bold(), info.owner.to_string().bold());
    })
}

fn cmd_update_admin(s: &Session, args: AccountArgs) -> anyhow::Result<()> {
    let mut d = s.load()?;
    let new_admin = parse_address_or_label(&args.target)?;
    d.update_admin(s.caller(&d), new_admin)?;
    s.save(&d)?;
    s.emit(&d.info(), |info| {
        println!("{} Admin is now {}", "✓".green().bold(), info.admin.to_string().bold());
    })
}

fn cmd_log(s: &Session, args: LogArgs) -> anyhow::Result<()> {
    let d = s.load()?;
    if let Some(id) = &args.history {
        let history = d.history(&parse_bytes32_or_label(id)?);
        return s.emit(&history, |h| print_history(id, h));
    }
    if args.audit {
        let report = d.audit();
        s.emit(&report, print_audit)?;
        if !report.is_clean() {
            bail!("audit of {} failed", s.state.display());
        }
        return Ok(());
    }

    let entries = d.log().entries();
    let tail = &entries[entries.len().saturating_sub(args.limit)..];
    s.emit(&tail, |tail| {
        for e in tail.iter() {
            println!(
                "{} {} {}  {} {}",
                format!("#{}", e.seq).yellow(),
                e.short_hash().dimmed(),
                e.block_time,
                e.name.bold(),
                e.emitter.short_hex().dimmed()
            );
        }
    })
}

fn yes_no(flag: bool) -> colored::ColoredString {
    if flag {
        "yes".green()
    } else {
        "no".red()
    }
}

fn print_info(info: &DeploymentInfo) {
    println!("  Deployer:     {}", info.deployer);
    println!("  Revocation:   {}", info.revocation);
    println!("  Verification: {}", info.verification);
    println!("  Owner:        {}", info.owner);
    println!("  Admin:        {}", info.admin);
    println!("  Records:      {}", info.records);
    println!("  Log entries:  {}", info.log_entries);
}

fn print_record(v: &RecordView) {
    println!("{}", v.id.to_hex().yellow().bold());
    println!("  Content hash: {}", v.content_hash);
    println!("  Issuer:       {}", v.issuer);
    println!("  URI:          {}", v.uri);
    println!("  Registered:   {}", v.registered_at);
    println!("  Valid:        {}", yes_no(v.valid));
    if v.revoked {
        println!("  Reason:       {}", v.reason.red());
    }
    if let Some(fields) = v.fields.as_object() {
        for (key, value) in fields {
            println!("  {key}: {value}");
        }
    }
}

fn print_history(label: &str, h: &IdHistory) {
    if !h.is_known() {
        println!("{} has no entries in the log", label.yellow());
        return;
    }
    println!("{}", label.yellow().bold());
    if let (Some(at), Some(issuer)) = (h.registered_at, h.issuer) {
        println!("  Registered at {at} by {issuer}");
    }
    if let Some(hash) = h.content_hash {
        println!("  Content hash: {hash}");
    }
    match &h.revoked {
        Some(r) => println!("  Revoked at {} ({} = {})", r.at, r.code, r.reason.red()),
        None => println!("  Not revoked"),
    }
}

fn print_audit(report: &AuditReport) {
    if let Some(err) = &report.chain_error {
        println!("{} Hash chain broken: {}", "✗".red().bold(), err);
        return;
    }
    println!("  Hash chain: {} ({} entries)", "valid".green(), report.entries);
    println!("  Records checked: {}", report.ids_checked);
    for u in &report.undecodable {
        println!("  {} entry #{} ({}) does not decode: {}", "✗".red(), u.seq, u.name.yellow(), u.reason);
    }
    if report.is_clean() {
        println!("{} Log and state agree", "✓".green().bold());
    }
    for d in &report.discrepancies {
        println!("  {} {}: {}", "✗".red(), d.id.short_hex().yellow(), d.description);
    }
}
