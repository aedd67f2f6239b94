//! The base HTML template and small shared rendering helpers.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, html};
use numfmt::{Formatter, Precision};

use crate::endpoints;

/// Wrap `content` in the full HTML document: head, stylesheet, htmx script,
/// and page container.
pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Expenseur" }
                link href={ (endpoints::STATIC) "/main.css" } rel="stylesheet";
                script src="https://unpkg.com/htmx.org@2.0.8" {}
            }

            body
            {
                main class="page" { (content) }
            }
        }
    }
}

/// Format an amount for display, e.g. `₱1,234.50`.
pub fn currency(amount: f64) -> String {
    static FMT: OnceLock<Formatter> = OnceLock::new();

    let fmt = FMT.get_or_init(|| {
        Formatter::currency("₱")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    let mut formatted = if amount > 0.0 {
        fmt.fmt_string(amount)
    } else {
        // Zero is hardcoded as "0", so the formatted string for zero must
        // be spelled out. Amounts are never negative.
        "₱0.00".to_owned()
    };

    // numfmt trims trailing zeros, so "12.30" renders as "12.3" and "12.00"
    // as "12". Pad back to exactly two decimal places.
    match formatted.rfind('.') {
        Some(dot) => {
            for _ in (formatted.len() - dot - 1)..2 {
                formatted.push('0');
            }
        }
        None => formatted.push_str(".00"),
    }

    formatted
}
