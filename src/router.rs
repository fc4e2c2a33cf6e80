use crate::model::{RouteParams, TicketType};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("route is missing a movie id")]
    MissingMovieId,
    #[error("route is missing a ticket type")]
    MissingTicketType,
    #[error("unknown ticket type: {0}")]
    UnknownTicketType(String),
    #[error("no view registered for path: {0}")]
    UnknownPath(String),
}

/// Tagged routing result; rendering branches on this and nothing else.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteMatch {
    Landing,
    Form(RouteParams),
    Invalid(RouteError),
}

/// Map a URL-style path onto a view. `/` is the landing view,
/// `/user/form/{movie_id}/{type}` the purchase form. Trailing slashes and
/// repeated separators are tolerated; anything else is rejected with an
/// explicit error, never a panic.
pub fn parse_route(path: &str) -> RouteMatch {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [] => RouteMatch::Landing,
        ["user", "form"] => RouteMatch::Invalid(RouteError::MissingMovieId),
        ["user", "form", _movie_id] => RouteMatch::Invalid(RouteError::MissingTicketType),
        ["user", "form", movie_id, raw_type] => match raw_type.parse::<TicketType>() {
            Ok(ticket_type) => RouteMatch::Form(RouteParams {
                movie_id: (*movie_id).to_string(),
                ticket_type,
            }),
            Err(()) => RouteMatch::Invalid(RouteError::UnknownTicketType((*raw_type).to_string())),
        },
        _ => RouteMatch::Invalid(RouteError::UnknownPath(path.to_string())),
    }
}
