//! Notification payload and template rendering
//!
//! The payload is derived from a finished summary: the ending balance and
//! both category averages rounded to two decimals, plus an HTML table body
//! with one row per month.

use crate::types::{Category, MonthlyHistogram, Summary};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Subject used when none is configured
pub const DEFAULT_SUBJECT: &str = "CSV summary account information";

/// Template used when none is configured
///
/// Placeholders: `{{name}}`, `{{ending_balance}}`, `{{debit_average}}`,
/// `{{credit_average}}`, `{{monthly_summary}}`.
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, Helvetica, sans-serif; color: #070715;">
<h2>Account summary</h2>
<p>Hello {{name}},</p>
<p>Total balance is <strong>{{ending_balance}}</strong></p>
<p>Average debit amount: {{debit_average}}<br>Average credit amount: {{credit_average}}</p>
<table>
<tr><th align="center">Month</th><th align="center">Number of transactions</th></tr>
{{monthly_summary}}
</table>
</body>
</html>
"#;

const CELL_OPEN: &str = "<td align=\"center\" width=\"20%\">";
const CELL_CLOSE: &str = "</td>";

/// Values substituted into the notification template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationPayload {
    /// Addressee shown in the greeting
    pub name: String,

    /// Running balance, two decimals
    pub ending_balance: String,

    /// Mean debit amount, two decimals
    pub debit_average: String,

    /// Mean credit amount, two decimals
    pub credit_average: String,

    /// Table rows, one per month with at least one transaction
    pub monthly_summary_markup: String,
}

impl NotificationPayload {
    /// Derive the payload from a finished summary
    pub fn from_summary(summary: &Summary, monthly: &MonthlyHistogram, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ending_balance: format_amount(summary.running_balance),
            debit_average: format_amount(summary.average(Category::Debit)),
            credit_average: format_amount(summary.average(Category::Credit)),
            monthly_summary_markup: monthly_summary_markup(monthly),
        }
    }
}

/// Format an amount with exactly two decimals, rounding half away from zero
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Render the monthly histogram as HTML table rows in calendar order
pub fn monthly_summary_markup(monthly: &MonthlyHistogram) -> String {
    monthly
        .iter()
        .map(|(month, count)| {
            format!(
                "<tr>{open}{month}{close}{open}{count}{close}</tr>",
                open = CELL_OPEN,
                close = CELL_CLOSE,
                month = month,
                count = count
            )
        })
        .collect()
}

/// Substitute payload values into a template
///
/// The template is scanned once, so substituted values are never scanned
/// again for placeholders. The name is HTML-escaped; the monthly markup is
/// inserted as is. Placeholders that are not recognised are left untouched.
pub fn render_template(template: &str, payload: &NotificationPayload) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        rendered.push_str(&rest[..open]);
        let inner = &rest[open + 2..];

        let substituted = inner.find("}}").and_then(|close| {
            placeholder_value(&inner[..close], payload).map(|value| (value, close))
        });
        match substituted {
            Some((value, close)) => {
                rendered.push_str(&value);
                rest = &inner[close + 2..];
            }
            None => {
                rendered.push_str("{{");
                rest = inner;
            }
        }
    }

    rendered.push_str(rest);
    rendered
}

fn placeholder_value(key: &str, payload: &NotificationPayload) -> Option<String> {
    let value = match key {
        "name" => escape_html(&payload.name),
        "ending_balance" => payload.ending_balance.clone(),
        "debit_average" => payload.debit_average.clone(),
        "credit_average" => payload.credit_average.clone(),
        "monthly_summary" => payload.monthly_summary_markup.clone(),
        _ => return None,
    };
    Some(value)
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Transaction;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn tx(id: u64, amount: Decimal, month: u32, day: u32) -> Transaction {
        Transaction::new(id, amount, NaiveDate::from_ymd_opt(0, month, day).unwrap())
    }

    fn example() -> (Summary, MonthlyHistogram) {
        let summary = Summary {
            debit: vec![tx(0, Decimal::new(605, 1), 7, 15), tx(3, Decimal::new(10, 0), 8, 13)],
            credit: vec![tx(1, Decimal::new(-103, 1), 7, 28), tx(2, Decimal::new(-2046, 2), 8, 2)],
            debit_total: Decimal::new(705, 1),
            credit_total: Decimal::new(-3076, 2),
            running_balance: Decimal::new(3974, 2),
        };
        let mut monthly = MonthlyHistogram::new();
        for month in [7, 7, 8, 8] {
            monthly.record(month);
        }
        (summary, monthly)
    }

    #[rstest]
    #[case::already_two_places(Decimal::new(3974, 2), "39.74")]
    #[case::pads_zeros(Decimal::new(10, 0), "10.00")]
    #[case::one_place(Decimal::new(605, 1), "60.50")]
    #[case::rounds_half_away(Decimal::new(12345, 3), "12.35")]
    #[case::rounds_negative_half_away(Decimal::new(-12345, 3), "-12.35")]
    #[case::zero(Decimal::ZERO, "0.00")]
    fn test_format_amount(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_amount(amount), expected);
    }

    #[test]
    fn test_payload_from_summary() {
        let (summary, monthly) = example();
        let payload = NotificationPayload::from_summary(&summary, &monthly, "Ada");

        assert_eq!(payload.name, "Ada");
        assert_eq!(payload.ending_balance, "39.74");
        assert_eq!(payload.debit_average, "35.25");
        assert_eq!(payload.credit_average, "-15.38");
        assert!(payload.monthly_summary_markup.contains("July"));
        assert!(payload.monthly_summary_markup.contains("August"));
    }

    #[test]
    fn test_payload_for_empty_summary() {
        let payload =
            NotificationPayload::from_summary(&Summary::default(), &MonthlyHistogram::new(), "Ada");
        assert_eq!(payload.ending_balance, "0.00");
        assert_eq!(payload.debit_average, "0.00");
        assert_eq!(payload.credit_average, "0.00");
        assert_eq!(payload.monthly_summary_markup, "");
    }

    #[test]
    fn test_monthly_markup_one_row_per_month_in_calendar_order() {
        let (_, monthly) = example();
        let markup = monthly_summary_markup(&monthly);

        assert_eq!(markup.matches("<tr>").count(), 2);
        let july = markup.find("July").unwrap();
        let august = markup.find("August").unwrap();
        assert!(july < august);
        assert!(markup.contains(&format!("{}2{}", CELL_OPEN, CELL_CLOSE)));
    }

    #[test]
    fn test_render_template_substitutes_every_placeholder() {
        let (summary, monthly) = example();
        let payload = NotificationPayload::from_summary(&summary, &monthly, "Ada");
        let rendered = render_template(DEFAULT_TEMPLATE, &payload);

        assert!(!rendered.contains("{{"));
        assert!(rendered.contains("Hello Ada,"));
        assert!(rendered.contains("<strong>39.74</strong>"));
        assert!(rendered.contains("Average debit amount: 35.25"));
        assert!(rendered.contains("Average credit amount: -15.38"));
        assert!(rendered.contains(&payload.monthly_summary_markup));
    }

    #[test]
    fn test_render_template_escapes_name_and_keeps_unknown_placeholders() {
        let payload = NotificationPayload {
            name: "<Ada & Co>".to_string(),
            ending_balance: "1.00".to_string(),
            debit_average: "1.00".to_string(),
            credit_average: "0.00".to_string(),
            monthly_summary_markup: String::new(),
        };
        let rendered = render_template("{{name}} {{ending_balance}} {{unknown}}", &payload);
        assert_eq!(rendered, "&lt;Ada &amp; Co&gt; 1.00 {{unknown}}");
    }

    #[rstest]
    #[case::placeholder_in_name("{{monthly_summary}}", "{{monthly_summary}}")]
    #[case::balance_placeholder_in_name("{{ending_balance}}!", "{{ending_balance}}!")]
    #[case::unterminated("{{name", "{{name")]
    fn test_render_template_never_rescans_values(#[case] name: &str, #[case] expected: &str) {
        let payload = NotificationPayload {
            name: name.to_string(),
            ending_balance: "1.00".to_string(),
            debit_average: "1.00".to_string(),
            credit_average: "0.00".to_string(),
            monthly_summary_markup: "<tr></tr>".to_string(),
        };
        assert_eq!(render_template("{{name}}", &payload), expected);
    }

    #[test]
    fn test_render_template_handles_stray_braces() {
        let payload = NotificationPayload {
            name: "Ada".to_string(),
            ending_balance: "1.00".to_string(),
            debit_average: "1.00".to_string(),
            credit_average: "0.00".to_string(),
            monthly_summary_markup: String::new(),
        };
        assert_eq!(
            render_template("{{ {{name}} }} {{ending_balance", &payload),
            "{{ Ada }} {{ending_balance"
        );
    }
}
