use crate::model::{FormData, RouteParams, SubmissionPayload, PAYMENT_STATUS_PENDING};

/// Assemble the wire payload from validated form data and the route params.
/// Fixed assignments only: `is_verified` is always false and `payment_status`
/// always "pending" at creation. Callers must run `schema::validate` first;
/// the payment method is guaranteed present on that path.
pub fn build_payload(data: &FormData, route: &RouteParams) -> SubmissionPayload {
    SubmissionPayload {
        name: data.name.clone(),
        email: data.email.clone(),
        number_of_seat_tickets: data.number_of_seat_tickets,
        number_of_goods_tickets: data.number_of_goods_tickets,
        payment_method: data
            .payment_method
            .expect("payload built from unvalidated form data"),
        remarks: Some(data.remarks.clone()),
        movie_id: route.movie_id.clone(),
        ticket_type: route.ticket_type,
        is_verified: false,
        payment_status: PAYMENT_STATUS_PENDING.to_string(),
    }
}
