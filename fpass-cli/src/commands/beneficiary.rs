//! Beneficiary commands - saved recipients

use anyhow::{bail, Result};
use clap::Subcommand;
use comfy_table::Cell;
use dialoguer::{Confirm, Input};
use fpass_core::domain::{search_beneficiaries, Beneficiary, BeneficiaryDraft};

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum BeneficiaryCommands {
    /// List saved beneficiaries
    List {
        /// Filter by name or tag
        #[arg(long, short)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save a new beneficiary
    Add {
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Wallet ID to send to
        #[arg(long)]
        wallet_id: Option<String>,
        /// Optional tag (family, landlord, ...)
        #[arg(long)]
        tag: Option<String>,
    },
    /// Show one beneficiary
    Show {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a beneficiary
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        wallet_id: Option<String>,
        #[arg(long)]
        tag: Option<String>,
    },
    /// Delete a beneficiary
    Remove {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub async fn run(command: BeneficiaryCommands) -> Result<()> {
    match command {
        BeneficiaryCommands::List { search, json } => list(search.as_deref(), json).await,
        BeneficiaryCommands::Add {
            name,
            wallet_id,
            tag,
        } => add(name, wallet_id, tag).await,
        BeneficiaryCommands::Show { id, json } => show(&id, json).await,
        BeneficiaryCommands::Edit {
            id,
            name,
            wallet_id,
            tag,
        } => edit(&id, name, wallet_id, tag).await,
        BeneficiaryCommands::Remove { id, force } => remove(&id, force).await,
    }
}

fn beneficiaries_table(list: &[&Beneficiary]) -> comfy_table::Table {
    let mut table = output::create_table();
    table.set_header(vec!["ID", "Name", "Tag", "Wallet ID"]);
    for b in list {
        table.add_row(vec![
            Cell::new(&b.id),
            Cell::new(&b.name),
            Cell::new(b.tag.as_deref().unwrap_or("-")),
            Cell::new(&b.wallet_id),
        ]);
    }
    table
}

pub async fn list(search: Option<&str>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    ctx.auth.require_session()?;
    let all = output::with_spinner("Loading beneficiaries...", ctx.beneficiaries.list()).await?;
    let hits = search_beneficiaries(&all, search.unwrap_or(""));

    if json {
        return output::json(&hits);
    }

    if hits.is_empty() {
        println!("No beneficiaries found.");
        return Ok(());
    }
    println!("{}", beneficiaries_table(&hits));
    Ok(())
}

/// Flag value, else the current value when editing by flags, else a prompt
fn resolve_field(
    value: Option<String>,
    prompt: &str,
    current: &str,
    interactive: bool,
) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None if !interactive && !current.is_empty() => Ok(current.to_string()),
        None => {
            let v: String = Input::new()
                .with_prompt(prompt)
                .with_initial_text(current)
                .allow_empty(true)
                .interact_text()?;
            Ok(v.trim().to_string())
        }
    }
}

fn build_draft(
    name: Option<String>,
    wallet_id: Option<String>,
    tag: Option<String>,
    current: &BeneficiaryDraft,
) -> Result<BeneficiaryDraft> {
    let interactive = name.is_none() && wallet_id.is_none() && tag.is_none();
    let current_tag = current.tag.as_deref().unwrap_or("");

    let name = resolve_field(name, "Name", &current.name, interactive)?;
    let wallet_id = resolve_field(wallet_id, "Wallet ID", &current.wallet_id, interactive)?;
    let tag = match tag {
        Some(t) => t,
        None if interactive => resolve_field(None, "Tag (optional)", current_tag, true)?,
        None => current_tag.to_string(),
    };

    let draft = BeneficiaryDraft {
        name,
        wallet_id,
        tag: (!tag.trim().is_empty()).then_some(tag),
    };
    if let Err(msg) = draft.validate() {
        bail!("Invalid beneficiary: {}", msg);
    }
    Ok(draft)
}

pub async fn add(name: Option<String>, wallet_id: Option<String>, tag: Option<String>) -> Result<()> {
    let ctx = get_context()?;
    ctx.auth.require_session()?;
    let draft = build_draft(name, wallet_id, tag, &BeneficiaryDraft::default())?;

    let created =
        output::with_spinner("Saving beneficiary...", ctx.beneficiaries.create(&draft)).await?;
    output::success(&format!("Saved {} ({})", created.name, created.wallet_id));
    Ok(())
}

pub async fn show(id: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    ctx.auth.require_session()?;
    let b = output::with_spinner("Loading beneficiary...", ctx.beneficiaries.get(id)).await?;

    if json {
        return output::json(&b);
    }
    println!("{}", beneficiaries_table(&[&b]));
    Ok(())
}

pub async fn edit(
    id: &str,
    name: Option<String>,
    wallet_id: Option<String>,
    tag: Option<String>,
) -> Result<()> {
    let ctx = get_context()?;
    ctx.auth.require_session()?;
    let existing = output::with_spinner("Loading beneficiary...", ctx.beneficiaries.get(id)).await?;
    let current = BeneficiaryDraft::from(&existing);

    let draft = build_draft(name, wallet_id, tag, &current)?;

    let updated =
        output::with_spinner("Saving beneficiary...", ctx.beneficiaries.update(id, &draft)).await?;
    output::success(&format!("Updated {} ({})", updated.name, updated.wallet_id));
    Ok(())
}

pub async fn remove(id: &str, force: bool) -> Result<()> {
    let ctx = get_context()?;
    ctx.auth.require_session()?;

    if !force
        && !Confirm::new()
            .with_prompt(format!("Delete beneficiary {}?", id))
            .default(false)
            .interact()?
    {
        output::warning("Cancelled.");
        return Ok(());
    }

    let ack = output::with_spinner("Deleting...", ctx.beneficiaries.delete(id)).await?;
    output::success(ack.message_or("Beneficiary deleted"));
    Ok(())
}
