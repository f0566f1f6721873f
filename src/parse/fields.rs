//! Field extraction from the response `data` object.

use serde_json::Value;

/// `pricing.total`, as a number or a numeric string (`"$1,234.50"` allowed).
pub fn extract_total_price(data: &Value) -> Option<f64> {
    data.get("pricing")
        .and_then(|pricing| pricing.get("total"))
        .and_then(as_price)
}

/// `facility_name`, falling back to `facility.name`.
pub fn extract_facility_name(data: &Value) -> Option<String> {
    data.get("facility_name")
        .or_else(|| data.get("facility").and_then(|f| f.get("name")))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// `(size, price)` pairs from `pricing.units`; incomplete entries are skipped.
pub fn extract_units(data: &Value) -> Vec<(String, f64)> {
    let Some(units) = data
        .get("pricing")
        .and_then(|pricing| pricing.get("units"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    units
        .iter()
        .filter_map(|unit| {
            let size = unit.get("size").and_then(Value::as_str)?.trim();
            let price = unit.get("price").and_then(as_price)?;
            (!size.is_empty()).then(|| (size.to_string(), price))
        })
        .collect()
}

fn as_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| !matches!(c, '$' | ','))
                .collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    };
    price.filter(|p| p.is_finite())
}
