//! Add-funds command - top up the wallet

use anyhow::Result;
use dialoguer::Confirm;
use fpass_core::api::DEFAULT_FUNDING_METHOD;
use fpass_core::domain::money::parse_amount;

use super::get_context;
use super::send::{prompt_amount, report_balance};
use crate::output;

pub async fn run(
    amount: Option<String>,
    note: Option<String>,
    method: Option<String>,
    yes: bool,
) -> Result<()> {
    let ctx = get_context()?;
    ctx.auth.require_session()?;

    let amount = prompt_amount(amount)?;
    let parsed = parse_amount(&amount)?;
    let method = method.unwrap_or_else(|| DEFAULT_FUNDING_METHOD.to_string());

    if !yes
        && !Confirm::new()
            .with_prompt(format!(
                "Add {} to your wallet via {}?",
                output::money(parsed, &ctx.session.currency()),
                method
            ))
            .default(true)
            .interact()?
    {
        output::warning("Cancelled.");
        return Ok(());
    }

    let outcome = output::with_spinner(
        "Adding funds...",
        ctx.payments
            .add_funds(&amount, note.as_deref().unwrap_or(""), &method),
    )
    .await?;

    output::success(outcome.receipt.message.as_deref().unwrap_or("Funds added successfully"));
    report_balance(&outcome.balance);
    Ok(())
}
