//! Printable document rendering.
//!
//! Quotations and invoices render to self-contained HTML pages the browser
//! prints; there is no server-side PDF pipeline. All customer-supplied text
//! is HTML-escaped.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use aperture_shared::types::format_inr;

/// One line item on a printable document.
#[derive(Debug, Clone)]
pub struct DocumentLine {
    /// Display position.
    pub position: i32,
    /// Category label ("Photography", "Print & Gifts", ...).
    pub category: String,
    /// Service description.
    pub description: String,
    /// Units.
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Line total.
    pub total_price: Decimal,
}

/// Event and customer header shared by both documents.
#[derive(Debug, Clone)]
pub struct DocumentHeader {
    /// Studio name shown in the masthead.
    pub studio_name: String,
    /// Document number (`QT_AKP_26_0001` / `ORD_AKP_26_0001`).
    pub number: String,
    /// Customer name.
    pub customer_name: String,
    /// Customer phone.
    pub customer_phone: String,
    /// Event type.
    pub event_type: String,
    /// Event start date.
    pub event_date: NaiveDate,
    /// Event end date for multi-day coverage.
    pub event_end_date: Option<NaiveDate>,
    /// Venue name.
    pub venue: Option<String>,
    /// Venue city.
    pub city: Option<String>,
    /// Package name.
    pub package: Option<String>,
}

/// Pricing block shared by both documents.
#[derive(Debug, Clone)]
pub struct DocumentTotals {
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Discount applied.
    pub discount_amount: Decimal,
    /// Amount owed.
    pub total_amount: Decimal,
}

/// A payment row on an invoice.
#[derive(Debug, Clone)]
pub struct PaymentLine {
    /// Receipt number (`PAY_AKP_26_0001`).
    pub number: String,
    /// Payment date.
    pub date: NaiveDate,
    /// Method label ("UPI", "Cash", ...).
    pub method: String,
    /// Amount received.
    pub amount: Decimal,
}

/// Renders a printable quotation.
#[must_use]
pub fn quotation_html(
    header: &DocumentHeader,
    lines: &[DocumentLine],
    totals: &DocumentTotals,
    valid_until: NaiveDate,
    notes: Option<&str>,
) -> String {
    let mut extra = format!(
        "<p class=\"validity\">Valid until {}</p>",
        valid_until.format("%d %b %Y")
    );
    if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
        extra.push_str(&format!("<p class=\"notes\">{}</p>", escape(notes)));
    }
    render(header, "Quotation", lines, totals, &String::new(), &extra)
}

/// Renders a printable invoice with its payment history.
#[must_use]
pub fn invoice_html(
    header: &DocumentHeader,
    lines: &[DocumentLine],
    totals: &DocumentTotals,
    amount_paid: Decimal,
    balance_due: Decimal,
    payments: &[PaymentLine],
) -> String {
    let money_rows = format!(
        "<tr><td>Amount Paid</td><td class=\"num\">{}</td></tr>\
         <tr class=\"grand\"><td>Balance Due</td><td class=\"num\">{}</td></tr>",
        format_inr(amount_paid),
        format_inr(balance_due),
    );

    let mut extra = String::new();
    if !payments.is_empty() {
        extra.push_str("<h2>Payments</h2><table class=\"lines\"><thead><tr>\
             <th>Receipt</th><th>Date</th><th>Method</th><th class=\"num\">Amount</th>\
             </tr></thead><tbody>");
        for payment in payments {
            extra.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"num\">{}</td></tr>",
                escape(&payment.number),
                payment.date.format("%d %b %Y"),
                escape(&payment.method),
                format_inr(payment.amount),
            ));
        }
        extra.push_str("</tbody></table>");
    }

    render(header, "Invoice", lines, totals, &money_rows, &extra)
}

/// Suggested filename for a saved/printed document.
///
/// The customer name is reduced to alphanumerics and single underscores so
/// the result is safe on every filesystem.
#[must_use]
pub fn pdf_filename(number: &str, customer_name: &str) -> String {
    let mut sanitized = String::with_capacity(customer_name.len());
    let mut last_was_underscore = true;
    for c in customer_name.chars() {
        if c.is_ascii_alphanumeric() {
            sanitized.push(c);
            last_was_underscore = false;
        } else if !last_was_underscore {
            sanitized.push('_');
            last_was_underscore = true;
        }
    }
    let sanitized = sanitized.trim_end_matches('_');
    if sanitized.is_empty() {
        format!("{number}.pdf")
    } else {
        format!("{number}_{sanitized}.pdf")
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render(
    header: &DocumentHeader,
    title: &str,
    lines: &[DocumentLine],
    totals: &DocumentTotals,
    extra_money_rows: &str,
    extra_sections: &str,
) -> String {
    let event_dates = match header.event_end_date {
        Some(end) if end != header.event_date => format!(
            "{} – {}",
            header.event_date.format("%d %b %Y"),
            end.format("%d %b %Y")
        ),
        _ => header.event_date.format("%d %b %Y").to_string(),
    };

    let mut meta = format!(
        "<p><strong>{}</strong> · {}</p><p>{} · {}</p>",
        escape(&header.customer_name),
        escape(&header.customer_phone),
        escape(&header.event_type),
        event_dates,
    );
    let place: Vec<String> = [header.venue.as_deref(), header.city.as_deref()]
        .into_iter()
        .flatten()
        .map(escape)
        .collect();
    if !place.is_empty() {
        meta.push_str(&format!("<p>{}</p>", place.join(", ")));
    }
    if let Some(package) = header.package.as_deref() {
        meta.push_str(&format!("<p>Package: {}</p>", escape(package)));
    }

    let mut rows = String::new();
    for line in lines {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"num\">{}</td>\
             <td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
            line.position,
            escape(&line.category),
            escape(&line.description),
            line.quantity,
            format_inr(line.unit_price),
            format_inr(line.total_price),
        ));
    }

    let mut money = format!(
        "<tr><td>Subtotal</td><td class=\"num\">{}</td></tr>",
        format_inr(totals.subtotal)
    );
    if totals.discount_amount != Decimal::ZERO {
        money.push_str(&format!(
            "<tr><td>Discount</td><td class=\"num\">-{}</td></tr>",
            format_inr(totals.discount_amount)
        ));
    }
    money.push_str(&format!(
        "<tr class=\"grand\"><td>Total</td><td class=\"num\">{}</td></tr>",
        format_inr(totals.total_amount)
    ));
    money.push_str(extra_money_rows);

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} {number}</title>\n<style>\n\
         body {{ font-family: Georgia, serif; margin: 2rem auto; max-width: 48rem; color: #222; }}\n\
         h1 {{ margin-bottom: 0; }}\n\
         .number {{ color: #666; margin-top: 0.25rem; }}\n\
         table.lines {{ width: 100%; border-collapse: collapse; margin-top: 1rem; }}\n\
         table.lines th, table.lines td {{ border-bottom: 1px solid #ddd; padding: 0.4rem 0.6rem; text-align: left; }}\n\
         td.num, th.num {{ text-align: right; }}\n\
         table.money {{ margin-left: auto; margin-top: 1rem; }}\n\
         table.money td {{ padding: 0.2rem 0.6rem; }}\n\
         tr.grand td {{ font-weight: bold; border-top: 2px solid #222; }}\n\
         .validity, .notes {{ margin-top: 1.5rem; color: #444; }}\n\
         @media print {{ body {{ margin: 0; }} }}\n\
         </style>\n</head>\n<body>\n\
         <h1>{studio}</h1>\n<p class=\"number\">{title} {number}</p>\n\
         {meta}\n\
         <table class=\"lines\"><thead><tr><th>#</th><th>Category</th><th>Description</th>\
         <th class=\"num\">Qty</th><th class=\"num\">Unit Price</th><th class=\"num\">Amount</th>\
         </tr></thead><tbody>{rows}</tbody></table>\n\
         <table class=\"money\"><tbody>{money}</tbody></table>\n\
         {extra_sections}\n</body>\n</html>\n",
        studio = escape(&header.studio_name),
        number = escape(&header.number),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn header() -> DocumentHeader {
        DocumentHeader {
            studio_name: "Aperture Studio".to_string(),
            number: "QT_AKP_26_0007".to_string(),
            customer_name: "Rohan & Priya".to_string(),
            customer_phone: "919876543210".to_string(),
            event_type: "Wedding".to_string(),
            event_date: NaiveDate::from_ymd_opt(2026, 11, 20).unwrap(),
            event_end_date: Some(NaiveDate::from_ymd_opt(2026, 11, 22).unwrap()),
            venue: Some("Lakeside Gardens".to_string()),
            city: Some("Hyderabad".to_string()),
            package: None,
        }
    }

    fn lines() -> Vec<DocumentLine> {
        vec![DocumentLine {
            position: 1,
            category: "Photography".to_string(),
            description: "Candid photography <3 days>".to_string(),
            quantity: 3,
            unit_price: dec!(30000),
            total_price: dec!(90000),
        }]
    }

    fn totals() -> DocumentTotals {
        DocumentTotals {
            subtotal: dec!(90000),
            discount_amount: dec!(9000),
            total_amount: dec!(81000),
        }
    }

    #[test]
    fn test_quotation_html_escapes_and_formats() {
        let html = quotation_html(
            &header(),
            &lines(),
            &totals(),
            NaiveDate::from_ymd_opt(2026, 9, 24).unwrap(),
            Some("Drone <extra>".into()),
        );
        assert!(html.contains("Rohan &amp; Priya"));
        assert!(html.contains("Candid photography &lt;3 days&gt;"));
        assert!(html.contains("Drone &lt;extra&gt;"));
        assert!(html.contains("90,000"));
        assert!(html.contains("81,000"));
        assert!(html.contains("Valid until 24 Sep 2026"));
        assert!(html.contains("20 Nov 2026 – 22 Nov 2026"));
    }

    #[test]
    fn test_zero_discount_row_omitted() {
        let mut t = totals();
        t.discount_amount = Decimal::ZERO;
        t.total_amount = t.subtotal;
        let html = quotation_html(
            &header(),
            &lines(),
            &t,
            NaiveDate::from_ymd_opt(2026, 9, 24).unwrap(),
            None,
        );
        assert!(!html.contains("Discount"));
    }

    #[test]
    fn test_invoice_shows_payments_and_balance() {
        let payments = vec![PaymentLine {
            number: "PAY_AKP_26_0001".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            method: "UPI".to_string(),
            amount: dec!(40000),
        }];
        let html = invoice_html(
            &header(),
            &lines(),
            &totals(),
            dec!(40000),
            dec!(41000),
            &payments,
        );
        assert!(html.contains("PAY_AKP_26_0001"));
        assert!(html.contains("Amount Paid"));
        assert!(html.contains("41,000"));
    }

    #[test]
    fn test_pdf_filename_sanitizes_name() {
        assert_eq!(
            pdf_filename("QT_AKP_26_0007", "Rohan & Priya"),
            "QT_AKP_26_0007_Rohan_Priya.pdf"
        );
        assert_eq!(
            pdf_filename("ORD_AKP_26_0001", "  A.B. O'Neil  "),
            "ORD_AKP_26_0001_A_B_O_Neil.pdf"
        );
        assert_eq!(pdf_filename("QT_AKP_26_0008", "***"), "QT_AKP_26_0008.pdf");
    }
}
