//! Plain-text receipt rendering

use sadaqa_core::traits::DonationReceipt;
use sadaqa_core::value_objects::MinorUnits;

/// Format minor units as a major-unit amount with a currency marker
///
/// `1650` in `gbp` renders as `£16.50`. Currencies without a known symbol
/// fall back to an ISO suffix, `16.50 CHF`.
pub fn format_amount(amount: MinorUnits, currency: &str) -> String {
    let major = amount / 100;
    let minor = (amount % 100).abs();
    match currency.to_lowercase().as_str() {
        "gbp" => format!("\u{a3}{major}.{minor:02}"),
        "usd" => format!("${major}.{minor:02}"),
        "eur" => format!("\u{20ac}{major}.{minor:02}"),
        other => format!("{major}.{minor:02} {}", other.to_uppercase()),
    }
}

/// Subject line for a receipt mail
pub fn receipt_subject(receipt: &DonationReceipt) -> String {
    format!("Donation receipt {}", receipt.reference)
}

/// Render the receipt body
pub fn render_receipt(receipt: &DonationReceipt) -> String {
    let mut body = String::new();

    match &receipt.donor_name {
        Some(name) => body.push_str(&format!("Dear {name},\n\n")),
        None => body.push_str("Dear donor,\n\n"),
    }
    body.push_str("Thank you for your donation.\n\n");

    body.push_str(&format!("Reference:     {}\n", receipt.reference));
    body.push_str(&format!(
        "Date:          {}\n",
        receipt.completed_at.format("%-d %B %Y")
    ));
    body.push_str(&format!("Type:          {}\n", receipt.donation_type));
    body.push_str(&format!("Frequency:     {}\n", receipt.frequency));
    body.push_str(&format!(
        "Donation:      {}\n",
        format_amount(receipt.amount, &receipt.currency)
    ));
    if receipt.platform_fee > 0 {
        body.push_str(&format!(
            "Platform fee:  {}\n",
            format_amount(receipt.platform_fee, &receipt.currency)
        ));
    }
    body.push_str(&format!(
        "Total charged: {}\n",
        format_amount(receipt.total, &receipt.currency)
    ));

    if receipt.gift_aid > 0 {
        body.push_str(&format!(
            "\nGift Aid: your declaration adds {} at no extra cost to you.\n",
            format_amount(receipt.gift_aid, &receipt.currency)
        ));
    }

    body.push_str("\nThis receipt confirms your payment was received.\n");
    body
}
