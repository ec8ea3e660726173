//! Access decision for a single request.

use super::routes::{RouteClass, RouteTable};

pub const SIGN_IN_PATH: &str = "/sign-in";
pub const HOME_PATH: &str = "/home";

/// Outcome of the access gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// Page request answered with a temporary redirect
    RedirectTo(String),
    /// API request without a subject
    Unauthorized,
}

/// Decide whether a request may proceed.
///
/// `subject` is the authenticated caller, if any. A blank subject counts as unauthenticated.
pub fn decide(table: &RouteTable, path: &str, subject: Option<&str>) -> GateDecision {
    let authenticated = subject.is_some_and(|s| !s.trim().is_empty());

    match (table.classify(path), authenticated) {
        (RouteClass::ProtectedPage, false) => GateDecision::RedirectTo(SIGN_IN_PATH.to_string()),
        (RouteClass::ProtectedApi, false) => GateDecision::Unauthorized,
        (RouteClass::PublicPage, true) if table.is_entry_page(path) => {
            GateDecision::RedirectTo(HOME_PATH.to_string())
        }
        _ => GateDecision::Allow,
    }
}
