//! Send command - quote, confirm and send money

use anyhow::{bail, Result};
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use fpass_core::api::Recipient;
use fpass_core::domain::money::PRESET_AMOUNTS;
use fpass_core::domain::{search_beneficiaries, Beneficiary};
use fpass_core::services::BalanceUpdate;
use fpass_core::FpassContext;

use super::get_context;
use crate::output;

/// Amount from the argument, or picked from the presets
pub fn prompt_amount(amount: Option<String>) -> Result<String> {
    if let Some(a) = amount {
        return Ok(a);
    }

    let mut items: Vec<String> = PRESET_AMOUNTS.iter().map(|a| format!("${}", a)).collect();
    items.push("Other amount".to_string());

    let choice = Select::new()
        .with_prompt("Amount")
        .items(&items)
        .default(0)
        .interact()?;

    match PRESET_AMOUNTS.get(choice) {
        Some(preset) => Ok(preset.to_string()),
        None => {
            let a: String = Input::new().with_prompt("Enter amount").interact_text()?;
            Ok(a)
        }
    }
}

/// Print the balance after a mutation, flagging an unconfirmed one
pub fn report_balance(update: &BalanceUpdate) {
    let wallet = update.wallet();
    println!(
        "New balance: {}",
        output::money(wallet.balance, &wallet.currency).bold()
    );
    if update.authoritative.is_none() {
        output::warning("Balance not yet confirmed by the server; it will update on the next refresh.");
    } else if !update.reconciled() {
        output::warning("Balance was corrected by the server.");
    }
}

fn pick_beneficiary<'a>(candidates: &[&'a Beneficiary]) -> Result<&'a Beneficiary> {
    let items: Vec<String> = candidates
        .iter()
        .map(|b| match &b.tag {
            Some(tag) => format!("{} ({}) {}", b.name, tag, b.wallet_id),
            None => format!("{} {}", b.name, b.wallet_id),
        })
        .collect();
    let choice = Select::new()
        .with_prompt("Send to")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(candidates[choice])
}

async fn resolve_recipient(
    ctx: &FpassContext,
    to_wallet: Option<String>,
    to_user: Option<String>,
    beneficiary: Option<String>,
) -> Result<(Recipient, String)> {
    if let Some(wallet_id) = to_wallet {
        return Ok((Recipient::WalletId(wallet_id.clone()), wallet_id));
    }
    if let Some(user_id) = to_user {
        return Ok((Recipient::ReceiverId(user_id.clone()), format!("user {}", user_id)));
    }

    let saved =
        output::with_spinner("Loading beneficiaries...", ctx.beneficiaries.list()).await?;
    let query = beneficiary.unwrap_or_default();
    let matches = search_beneficiaries(&saved, &query);

    let chosen = match matches.as_slice() {
        [] if saved.is_empty() => {
            bail!("No beneficiaries saved. Use --to-wallet or 'fpass beneficiary add'.")
        }
        [] => bail!("No beneficiaries found matching '{}'", query),
        [only] if !query.is_empty() => *only,
        _ => pick_beneficiary(&matches)?,
    };
    Ok((
        Recipient::WalletId(chosen.wallet_id.clone()),
        format!("{} ({})", chosen.name, chosen.wallet_id),
    ))
}

pub async fn run(
    amount: Option<String>,
    to_wallet: Option<String>,
    to_user: Option<String>,
    beneficiary: Option<String>,
    note: Option<String>,
    yes: bool,
) -> Result<()> {
    let ctx = get_context()?;
    ctx.auth.require_session()?;

    let (recipient, label) = resolve_recipient(&ctx, to_wallet, to_user, beneficiary).await?;
    let amount = prompt_amount(amount)?;
    let note = note.unwrap_or_default();

    // Bad input and an insufficient balance stop here, before anything is sent
    let quote = output::with_spinner("Checking balance...", ctx.payments.quote(&amount)).await?;
    let currency = ctx.session.currency();

    println!("{}", "Transfer Summary".bold());
    let mut rows = vec![
        ("To", label),
        ("Amount", output::money(quote.amount, &currency)),
        ("Fee (1.5%)", output::money(quote.fee, &currency)),
        ("Total", output::money(quote.total, &currency)),
    ];
    if !note.is_empty() {
        rows.push(("Note", note.clone()));
    }
    println!("{}", output::detail_table(&rows));

    if !yes
        && !Confirm::new()
            .with_prompt("Send this transfer?")
            .default(false)
            .interact()?
    {
        output::warning("Transfer cancelled.");
        return Ok(());
    }

    let outcome =
        output::with_spinner("Sending...", ctx.payments.send(recipient, &amount, &note)).await?;

    output::success(
        outcome
            .receipt
            .message
            .as_deref()
            .unwrap_or("Transfer successful"),
    );
    report_balance(&outcome.balance);
    Ok(())
}
