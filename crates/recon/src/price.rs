// Price parsing for display strings coming back from web search.

use serde::{Deserialize, Deserializer};

/// Parse a display price:
/// - Strip `$`, commas, whitespace
/// - Handle `(12.99)` → `-12.99`
/// - Returns None if anything non-numeric remains ("See price in cart", "N/A")
pub fn parse_price(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (is_negative, inner) = if trimmed.starts_with('(') && trimmed.ends_with(')') {
        (true, &trimmed[1..trimmed.len() - 1])
    } else {
        (false, trimmed)
    };

    let cleaned: String = inner
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    for (i, c) in cleaned.chars().enumerate() {
        match c {
            '0'..='9' | '.' => {}
            '-' | '+' if i == 0 && !is_negative => {}
            _ => return None,
        }
    }

    let value: f64 = cleaned.parse().ok()?;
    Some(if is_negative { -value } else { value })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(f64),
    Text(String),
}

/// Accepts `12.99`, `"$12.99"`, `null` or a missing key.
/// Text that does not parse as a price is treated as absent.
pub(crate) fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawPrice>::deserialize(deserializer)? {
        None => None,
        Some(RawPrice::Number(n)) => Some(n),
        Some(RawPrice::Text(s)) => {
            let parsed = parse_price(&s);
            if parsed.is_none() && !s.trim().is_empty() {
                log::debug!("ignoring unparseable price {s:?}");
            }
            parsed
        }
    })
}
