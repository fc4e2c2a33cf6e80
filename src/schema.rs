use crate::model::FormData;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// One named, independently validated unit of form input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Name,
    Email,
    NumberOfSeatTickets,
    NumberOfGoodsTickets,
    PaymentMethod,
    Remarks,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::NumberOfSeatTickets => "number_of_seat_tickets",
            Field::NumberOfGoodsTickets => "number_of_goods_tickets",
            Field::PaymentMethod => "payment_method",
            Field::Remarks => "remarks",
        }
    }
}

/// Field name -> human-readable message, replaced wholesale on every
/// validation pass.
pub type FieldErrors = BTreeMap<Field, String>;

struct Rule {
    field: Field,
    message: &'static str,
    // true = value passes
    check: fn(&FormData) -> bool,
}

// Rules as data: one row per field constraint. `remarks` carries no rule.
const RULES: &[Rule] = &[
    Rule {
        field: Field::Name,
        message: "Name is required",
        check: |d| !d.name.trim().is_empty(),
    },
    Rule {
        field: Field::Email,
        message: "Enter a valid email address",
        check: |d| email_re().is_match(d.email.trim()),
    },
    Rule {
        field: Field::NumberOfSeatTickets,
        message: "Seat tickets must be at least 1",
        check: |d| d.number_of_seat_tickets >= 1,
    },
    Rule {
        field: Field::NumberOfGoodsTickets,
        message: "Goods tickets cannot be negative",
        check: |d| d.number_of_goods_tickets >= 0,
    },
    Rule {
        field: Field::PaymentMethod,
        message: "Select a payment method",
        check: |d| d.payment_method.is_some(),
    },
];

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"))
}

/// Run every rule against the candidate data. Empty map = valid; otherwise
/// the first failing message per field. No side effects.
pub fn validate(data: &FormData) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for rule in RULES {
        if !errors.contains_key(&rule.field) && !(rule.check)(data) {
            errors.insert(rule.field, rule.message.to_string());
        }
    }
    errors
}
