//! Reasons for failed template fetches
//!
//! The template is cloned once and then fast-forwarded. Both can only fail in
//! a handful of ways for a public HTTPS or local template, and each reason
//! tells the operator what to do about it.

use git2::{Error, ErrorClass, ErrorCode};

use crate::config::{DIR_ENV, URL_ENV};

/// What went wrong while fetching the template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cause {
    /// Nothing at the URL, or the host wants credentials for it
    Missing,
    /// The host could not be reached
    Unreachable,
    /// TLS verification of the host failed
    Certificate,
    /// The checkout on disk cannot be updated in place
    Checkout,
}

fn cause(err: &Error) -> Option<Cause> {
    let message = err.message().to_lowercase();

    match (err.code(), err.class()) {
        (ErrorCode::Certificate, _) | (_, ErrorClass::Ssl) => Some(Cause::Certificate),
        // Private or missing GitHub repositories answer with an auth challenge.
        (ErrorCode::Auth, _) => Some(Cause::Missing),
        (_, ErrorClass::Net) => Some(Cause::Unreachable),
        (ErrorCode::NotFound, _) => Some(Cause::Missing),
        _ if ["404", "could not find repository", "failed to resolve path"]
            .iter()
            .any(|needle| message.contains(needle)) =>
        {
            Some(Cause::Missing)
        }
        (ErrorCode::Locked | ErrorCode::Conflict | ErrorCode::UnbornBranch, _)
        | (
            _,
            ErrorClass::Repository
            | ErrorClass::Reference
            | ErrorClass::Odb
            | ErrorClass::Index
            | ErrorClass::Checkout
            | ErrorClass::Object,
        ) => Some(Cause::Checkout),
        _ => None,
    }
}

/// Why cloning the template failed
pub fn clone_reason(err: &Error) -> String {
    match cause(err) {
        Some(Cause::Missing) => format!("no public repository at this URL; check {URL_ENV}"),
        Some(Cause::Unreachable) => {
            format!("the template host is unreachable ({})", err.message())
        }
        Some(Cause::Certificate) => "the template host's TLS certificate was rejected".to_string(),
        Some(Cause::Checkout) => format!(
            "could not write the checkout; remove the directory or set {DIR_ENV} elsewhere ({})",
            err.message()
        ),
        None => err.message().to_string(),
    }
}

/// Why fast-forwarding the existing template checkout failed
pub fn pull_reason(err: &Error) -> String {
    match cause(err) {
        // On pull, a missing object or reference is local damage.
        Some(Cause::Missing | Cause::Checkout) => stale_checkout(err.message()),
        Some(Cause::Unreachable) => format!(
            "the template host is unreachable; the checkout was left as it was ({})",
            err.message()
        ),
        Some(Cause::Certificate) => "the template host's TLS certificate was rejected".to_string(),
        None => err.message().to_string(),
    }
}

/// Reason for a checkout that has to be cloned again
pub fn stale_checkout(detail: &str) -> String {
    format!("{detail}; delete the checkout or point {DIR_ENV} at a new directory to clone it again")
}
