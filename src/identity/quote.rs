//! Quote form payload.

use chrono::{Days, NaiveDate};
use rand::Rng;

use super::QuoteIdentity;
use crate::input::ZipCode;

/// Days between today and the requested move-in date.
const MOVE_IN_OFFSET_DAYS: u64 = 3;

/// Form fields of one quote request, in the order the site's own form sends
/// them.
pub type QuoteForm = Vec<(&'static str, String)>;

/// Builds the form body for `zip`.
///
/// `data[date]` is the move-in date (`today` + 3, `MM/DD/YYYY`) and
/// `data[ldate]` the lead date (`today`, `YYYY-MM-DD`).
pub fn quote_form(zip: &ZipCode, identity: &QuoteIdentity, today: NaiveDate) -> QuoteForm {
    let mut rng = rand::rng();
    let move_in = today
        .checked_add_days(Days::new(MOVE_IN_OFFSET_DAYS))
        .unwrap_or(today);

    vec![
        ("action", "submit_quote_function".to_string()),
        ("data[date]", move_in.format("%m/%d/%Y").to_string()),
        ("data[discount]", "n".to_string()),
        ("data[distance]", "0".to_string()),
        ("data[email]", identity.email.clone()),
        ("data[formtype]", "storage".to_string()),
        ("data[homecubicft]", "830".to_string()),
        ("data[homelinearft]", "12".to_string()),
        ("data[ldate]", today.format("%Y-%m-%d").to_string()),
        ("data[location]", "onsite".to_string()),
        ("data[months]", "1".to_string()),
        ("data[name]", identity.name.clone()),
        ("data[newsletter]", "false".to_string()),
        ("data[phone]", identity.phone.clone()),
        ("data[q]", "quoterequest".to_string()),
        ("data[rooms]", rng.random_range(2..=5).to_string()),
        ("data[sixteens]", "0".to_string()),
        ("data[twelves]", rng.random_range(1..=5).to_string()),
        ("data[warehouseDistance]", "0".to_string()),
        ("data[zip1]", zip.to_string()),
        ("data[zip2]", String::new()),
        ("data[promocode]", String::new()),
        ("data[track]", String::new()),
        ("track", String::new()),
    ]
}
