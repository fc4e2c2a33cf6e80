use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Payment method offered by the form's select control.
/// Wire values are the snake_case tokens the API expects.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Square,
    BankTransfer,
    Cash,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Square,
        PaymentMethod::BankTransfer,
        PaymentMethod::Cash,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Square => "Square",
            PaymentMethod::BankTransfer => "Bank transfer",
            PaymentMethod::Cash => "Cash",
        }
    }
}

/// Ticket type carried in the route path. Wire values are camelCase
/// ("onTheDay"), matching the API's `type` field.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TicketType {
    Staff,
    Crowdfunding,
    Preorder,
    OnTheDay,
}

impl TicketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::Staff => "staff",
            TicketType::Crowdfunding => "crowdfunding",
            TicketType::Preorder => "preorder",
            TicketType::OnTheDay => "onTheDay",
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staff" => Ok(TicketType::Staff),
            "crowdfunding" => Ok(TicketType::Crowdfunding),
            "preorder" => Ok(TicketType::Preorder),
            "onTheDay" => Ok(TicketType::OnTheDay),
            _ => Err(()),
        }
    }
}

/// Parameters extracted from a valid form route. Immutable for the lifetime
/// of the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteParams {
    pub movie_id: String,
    pub ticket_type: TicketType,
}

/// Form values as owned by the form controller. Numeric fields are signed so
/// out-of-range input (0 seat tickets, negative counts) is representable and
/// rejected by the schema rather than by parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct FormData {
    pub name: String,
    pub email: String,
    pub number_of_seat_tickets: i64,
    pub number_of_goods_tickets: i64,
    pub payment_method: Option<PaymentMethod>,
    pub remarks: String,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            number_of_seat_tickets: 1,
            number_of_goods_tickets: 0,
            payment_method: None,
            remarks: String::new(),
        }
    }
}

pub const PAYMENT_STATUS_PENDING: &str = "pending";

/// Exact wire shape POSTed to `{base}/{version}/user/forms`.
/// Constructed only by `payload::build_payload` from validated form data.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SubmissionPayload {
    pub name: String,
    pub email: String,
    pub number_of_seat_tickets: i64,
    pub number_of_goods_tickets: i64,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub movie_id: String,
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
    pub is_verified: bool,
    pub payment_status: String,
}

/// Decoded success body from the API.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FormResponse {
    pub message: String,
}
