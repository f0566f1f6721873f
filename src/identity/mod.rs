//! Randomized client identity.
//!
//! Every quote request carries a plausible customer (name, email, phone) and
//! a user agent drawn at random, so consecutive requests do not share a
//! fingerprint. Emails are never reused within a run.

mod quote;
mod user_agent;

use std::collections::HashSet;
use std::sync::Mutex;

use rand::distr::Alphanumeric;
use rand::seq::IndexedRandom;
use rand::Rng;

pub use quote::{quote_form, QuoteForm};
pub use user_agent::{random_user_agent, USER_AGENTS};

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "David",
    "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Carlos", "Maria", "Daniel", "Karen", "Matthew", "Nancy", "Anthony", "Lisa", "Mark", "Betty",
    "Steven", "Sandra", "Andrew", "Ashley", "Kevin", "Emily", "Brian", "Michelle",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez",
    "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young", "Allen", "King",
];

const WORDS: &[&str] = &[
    "river", "stone", "maple", "cloud", "harbor", "cedar", "falcon", "meadow", "summit", "willow",
    "ember", "canyon", "orchid", "pine", "delta", "aspen",
];

const EMAIL_DOMAINS: &[&[&str]] = &[
    &["gmail.com", "googlemail.com"],
    &["yahoo.com", "yahoo.co.uk", "ymail.com"],
    &["hotmail.com", "outlook.com", "live.com"],
    &["gmail.com", "yahoo.com", "hotmail.com", "outlook.com", "icloud.com"],
];

const AREA_CODES: &[&str] = &[
    "201", "202", "203", "205", "206", "207", "208", "209", "210", "212", "213", "214", "215",
    "216", "217", "218", "219", "224", "225", "228", "303", "305", "312", "404", "415", "469",
    "503", "512", "602", "617", "702", "713", "726", "818", "830", "901", "972", "986", "989",
];

/// Customer details sent with one quote request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteIdentity {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub user_agent: &'static str,
}

/// Generates identities, remembering every email handed out.
#[derive(Debug, Default)]
pub struct IdentityGenerator {
    used_emails: Mutex<HashSet<String>>,
}

impl IdentityGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh identity with an email not issued before by this generator.
    pub fn generate(&self) -> QuoteIdentity {
        let mut rng = rand::rng();
        let first = *FIRST_NAMES.choose(&mut rng).unwrap_or(&"Alex");
        let last = *LAST_NAMES.choose(&mut rng).unwrap_or(&"Smith");

        QuoteIdentity {
            name: format!("{first} {last}"),
            email: self.unique_email(first, last),
            phone: random_phone(&mut rng),
            user_agent: random_user_agent(),
        }
    }

    fn unique_email(&self, first: &str, last: &str) -> String {
        let mut rng = rand::rng();
        let mut used = match self.used_emails.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        loop {
            let email = random_email(&mut rng, first, last);
            if used.insert(email.clone()) {
                return email;
            }
        }
    }
}

fn random_email<R: Rng + ?Sized>(rng: &mut R, first: &str, last: &str) -> String {
    let username = match rng.random_range(0..4) {
        0 => format!(
            "{}.{}{}",
            first.to_lowercase(),
            last.to_lowercase(),
            rng.random_range(100..1000)
        ),
        1 => format!(
            "{}{}{}",
            first.to_lowercase(),
            last.to_lowercase(),
            rng.random_range(10..100)
        ),
        2 => (0..10)
            .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_lowercase())
            .collect(),
        _ => {
            let a = WORDS.choose(rng).unwrap_or(&"blue");
            let b = WORDS.choose(rng).unwrap_or(&"sky");
            format!("{a}{b}{}", rng.random_range(100..1000))
        }
    };
    let domains = EMAIL_DOMAINS.choose(rng).copied().unwrap_or(&["gmail.com"]);
    let domain = domains.choose(rng).unwrap_or(&"gmail.com");
    format!("{username}@{domain}")
}

/// US phone number formatted `(AAA) PPP-LLLL`.
fn random_phone<R: Rng + ?Sized>(rng: &mut R) -> String {
    let area = AREA_CODES.choose(rng).unwrap_or(&"210");
    format!(
        "({area}) {}-{}",
        rng.random_range(200..1000),
        rng.random_range(1000..10000)
    )
}
