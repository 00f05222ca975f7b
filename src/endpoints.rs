//! The API endpoints URIs.
//!
//! For endpoints that take parameters, e.g., '/api/companies/{company_id}/transactions/export',
//! use [format_endpoint].

/// The route to delete a category of a company.
pub const DELETE_CATEGORY: &str = "/api/companies/{company_id}/categories/{category_id}";
/// The route to download a company's transactions as CSV.
pub const TRANSACTIONS_EXPORT: &str = "/api/companies/{company_id}/transactions/export";
/// The route to download a company's items as CSV.
pub const ITEMS_EXPORT: &str = "/api/companies/{company_id}/items/export";

/// Replace the parameters in `endpoint_path` with `ids`, in order.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/companies/{company_id}', '{company_id}' is the parameter.
///
/// Parameters without a matching ID are left as they are.
pub fn format_endpoint(endpoint_path: &str, ids: &[i64]) -> String {
    let mut formatted = String::with_capacity(endpoint_path.len());
    let mut rest = endpoint_path;
    let mut ids = ids.iter();

    while let Some(start) = rest.find('{') {
        let Some(end) = rest[start..].find('}').map(|end| start + end + 1) else {
            break;
        };

        let Some(id) = ids.next() else {
            break;
        };

        formatted.push_str(&rest[..start]);
        formatted.push_str(&id.to_string());
        rest = &rest[end..];
    }

    formatted.push_str(rest);
    formatted
}
