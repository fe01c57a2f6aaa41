use serde_json::Value;

use crate::swap::{RateQuote, Reported, SwapLeg, SwapRecord, SwapStatus, UNAVAILABLE, UNKNOWN};

/// Numbers get at most 8 decimals with trailing zeros trimmed; anything else
/// is shown as the service sent it.
pub fn format_amount(amount: &Reported) -> String {
    match amount {
        Reported::Value(Value::Number(n)) => match n.as_f64() {
            Some(f) => {
                let fixed = format!("{f:.8}");
                fixed.trim_end_matches('0').trim_end_matches('.').to_string()
            }
            None => n.to_string(),
        },
        other => other.text_or(UNAVAILABLE),
    }
}

pub fn render_quote(quote: &RateQuote, from: &str, to: &str) -> String {
    let max = if quote.max_amount.is_missing() {
        "No Limit".to_string()
    } else {
        format!("{} {from}", format_amount(&quote.max_amount))
    };

    format!(
        "Exchange Rate:\n  1 {from} = {rate} {to}\n\nMin Amount: {min} {from}\nMax Amount: {max}",
        rate = quote.rate_with_commission,
        min = format_amount(&quote.min_amount),
    )
}

pub fn render_order_confirmation(
    amount: &str,
    from: &str,
    to: &str,
    receiving_address: &str,
    refund_address: &str,
) -> String {
    format!(
        "Swap Details:\n  {amount} {from} -> {to}\n  Receiving Address: {receiving_address}\n  Refund Address: {refund_address}",
        from = from.to_uppercase(),
        to = to.to_uppercase(),
    )
}

pub fn render_created(record: &SwapRecord, from: &str) -> String {
    format!(
        "Swap Created Successfully!\nSwap ID: {id}\nPlease send {amount} {from} to:\n  {send_to}\n\nYou can check your swap status anytime using the Swap ID.",
        id = record.swap_id,
        amount = record.expected_amount,
        from = from.to_uppercase(),
        send_to = record.send_to,
    )
}

pub fn render_status(swap_id: &str, status: &SwapStatus) -> String {
    format!(
        "Swap ID: {swap_id}\nCreated At: {created}\nStatus: {label}\n\nDeposit Details:\n{deposit}\n\nWithdrawal Details:\n{withdrawal}",
        created = status.created_at.text_or(UNKNOWN),
        label = status.status.to_uppercase(),
        deposit = render_leg(&status.deposit),
        withdrawal = render_leg(&status.withdrawal),
    )
}

fn render_leg(leg: &SwapLeg) -> String {
    let symbol = leg.symbol.text_or("").to_uppercase();
    let amount = format!("{} {symbol}", leg.amount);
    format!(
        "  - Amount: {}\n  - Address: {}\n  - Explorer: {}",
        amount.trim_end(),
        leg.address,
        leg.explorer_url,
    )
}
