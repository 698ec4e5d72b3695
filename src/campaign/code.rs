//! Campaign codes.
//!
//! A campaign code is `{partner code}{MMDD}{sequence}` with no separators, e.g.
//! `AC3109271` is the first campaign partner `AC31` created on September 27th.
//! Codes are derived once when a campaign is created and never change.

use std::str::FromStr;

use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub const PARTNER_PREFIX: &str = "AC";

// `\d` would accept any unicode digit, the code only ever carries ascii ones
static CAMPAIGN_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^AC([0-9]{1,2})([0-9]{4})([0-9])$").expect("campaign code pattern is valid")
});

/// A partner's `AC` code, always `AC` followed by one or two ascii digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PartnerCode(String);

impl PartnerCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PartnerCode {
    type Err = ();

    /// Accepts anything whose digits, once everything else is stripped, are
    /// one or two long. `AC31`, `ac31` and `31` all become `AC31`.
    fn from_str(s: &str) -> Result<PartnerCode, ()> {
        let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() || digits.len() > 2 {
            return Err(());
        }

        Ok(PartnerCode(format!("{}{}", PARTNER_PREFIX, digits)))
    }
}

/// The result of generating a code for a new campaign.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GeneratedCode {
    pub full_code: String,
    pub display_code: String,
}

/// A valid campaign code broken back into its fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParsedCode {
    pub partner_code: String,
    pub partner_number: u32,
    pub date_string: String,
    pub sequence_number: u32,
    pub month: String,
    pub day: String,
    pub full_code: String,
}

/// Renders the `MMDD` segment of a code.
pub fn date_string<D: Datelike>(date: &D) -> String {
    format!("{:02}{:02}", date.month(), date.day())
}

/// Builds the code for the campaign following `existing_count` others the
/// partner already created on `date`.
///
/// Nothing is checked here: a tenth campaign on the same day yields a two digit
/// sequence and therefore a code that [`validate`] refuses. Callers that persist
/// codes are expected to validate first.
pub fn generate<D: Datelike>(partner_code: &str, date: &D, existing_count: u64) -> GeneratedCode {
    let sequence_number = existing_count + 1;
    let full_code = format!("{}{}{}", partner_code, date_string(date), sequence_number);
    let display_code = format_display_code(&full_code);

    GeneratedCode {
        full_code,
        display_code,
    }
}

/// Hook for a friendlier rendering of codes. Codes are currently shown as-is.
pub fn format_display_code(code: &str) -> String {
    code.to_string()
}

/// Checks that `code` is a well-formed campaign code: the `AC` prefix, one or
/// two partner digits, an `MMDD` date and a single sequence digit.
///
/// The partner length is only known from the total length, so a code missing
/// its sequence digit (`AC310927`) still has the shape of a one digit partner
/// code. The `MMDD` segment must therefore also be a plausible date, month
/// `01`-`12` and day `01`-`31`.
pub fn validate(code: &str) -> bool {
    split(code).is_some()
}

/// Splits a code into its fields, or `None` if it is not a valid code.
pub fn parse(code: &str) -> Option<ParsedCode> {
    let (partner_digits, date_string, sequence) = split(code)?;

    Some(ParsedCode {
        partner_code: format!("{}{}", PARTNER_PREFIX, partner_digits),
        partner_number: partner_digits.parse().ok()?,
        date_string: date_string.to_string(),
        sequence_number: sequence.parse().ok()?,
        month: date_string[..2].to_string(),
        day: date_string[2..].to_string(),
        full_code: code.to_string(),
    })
}

fn split(code: &str) -> Option<(&str, &str, &str)> {
    let captures = CAMPAIGN_CODE.captures(code)?;
    let partner_digits = captures.get(1)?.as_str();
    let date_string = captures.get(2)?.as_str();
    let sequence = captures.get(3)?.as_str();

    let month: u32 = date_string[..2].parse().ok()?;
    let day: u32 = date_string[2..].parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    Some((partner_digits, date_string, sequence))
}
