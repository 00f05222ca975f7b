//! The tenant that owns a set of records.
//!
//! Every store and settings call takes the company explicitly instead of
//! looking up a "current company" from request-global state.

/// Database identifier for a company.
pub type CompanyId = i64;
