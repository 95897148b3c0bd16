// 🧭 Request Router - chain of responsibility for rental requests
//
// Operator -> Manager -> Admin. Each handler takes the request type it owns
// and forwards everything else to its successor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RentalError, RentalResult};

// ============================================================================
// REQUESTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    Simple,
    Discount,
    Complex,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Simple => "simple",
            RequestType::Discount => "discount",
            RequestType::Complex => "complex",
        }
    }
}

impl FromStr for RequestType {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(RequestType::Simple),
            "discount" => Ok(RequestType::Discount),
            "complex" => Ok(RequestType::Complex),
            other => Err(RentalError::validation(
                "request_type",
                format!("unknown request type '{}'", other),
            )),
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalRequest {
    pub request_type: RequestType,
    pub amount: f64,
    pub description: String,
}

impl RentalRequest {
    pub fn new(request_type: RequestType, amount: f64, description: impl Into<String>) -> Self {
        RentalRequest {
            request_type,
            amount,
            description: description.into(),
        }
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

/// RequestHandler - one link in the chain
pub trait RequestHandler {
    /// Role name used in replies ("Operator", "Manager", "Admin")
    fn role(&self) -> &'static str;

    /// The request type this link resolves itself
    fn handled_type(&self) -> RequestType;

    fn successor(&self) -> Option<&dyn RequestHandler>;

    /// Resolve the request here, forward it, or report that nobody can
    fn handle_request(&self, request: &RentalRequest) -> String {
        if request.request_type == self.handled_type() {
            tracing::debug!(role = self.role(), request_type = %request.request_type, "Request handled");
            return format!(
                "{} handled {} request: {} (amount: {})",
                self.role(),
                request.request_type,
                request.description,
                request.amount
            );
        }

        match self.successor() {
            Some(next) => next.handle_request(request),
            None => {
                tracing::warn!(role = self.role(), request_type = %request.request_type, "Request fell off the chain");
                format!("{} cannot handle request: {}", self.role(), request.description)
            }
        }
    }
}

#[derive(Default)]
pub struct Operator {
    successor: Option<Box<dyn RequestHandler>>,
}

impl Operator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_successor(successor: Box<dyn RequestHandler>) -> Self {
        Operator {
            successor: Some(successor),
        }
    }
}

impl RequestHandler for Operator {
    fn role(&self) -> &'static str {
        "Operator"
    }

    fn handled_type(&self) -> RequestType {
        RequestType::Simple
    }

    fn successor(&self) -> Option<&dyn RequestHandler> {
        self.successor.as_deref()
    }
}

#[derive(Default)]
pub struct Manager {
    successor: Option<Box<dyn RequestHandler>>,
}

impl Manager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_successor(successor: Box<dyn RequestHandler>) -> Self {
        Manager {
            successor: Some(successor),
        }
    }
}

impl RequestHandler for Manager {
    fn role(&self) -> &'static str {
        "Manager"
    }

    fn handled_type(&self) -> RequestType {
        RequestType::Discount
    }

    fn successor(&self) -> Option<&dyn RequestHandler> {
        self.successor.as_deref()
    }
}

/// Last link; never forwards
#[derive(Debug, Default, Clone, Copy)]
pub struct Admin;

impl RequestHandler for Admin {
    fn role(&self) -> &'static str {
        "Admin"
    }

    fn handled_type(&self) -> RequestType {
        RequestType::Complex
    }

    fn successor(&self) -> Option<&dyn RequestHandler> {
        None
    }
}

/// Operator -> Manager -> Admin, built tail-first
pub fn standard_chain() -> Operator {
    let admin = Box::new(Admin);
    let manager = Box::new(Manager::with_successor(admin));
    Operator::with_successor(manager)
}

/// Parse a request type and route it through the standard chain
pub fn route(request_type: &str, amount: f64, description: &str) -> RentalResult<String> {
    let request = RentalRequest::new(request_type.parse()?, amount, description);
    Ok(standard_chain().handle_request(&request))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_type_reaches_its_handler() {
        let chain = standard_chain();

        let simple = chain.handle_request(&RentalRequest::new(RequestType::Simple, 100.0, "Guitar rental"));
        assert_eq!(simple, "Operator handled simple request: Guitar rental (amount: 100)");

        let discount = chain.handle_request(&RentalRequest::new(RequestType::Discount, 50.0, "Student discount"));
        assert!(discount.starts_with("Manager handled discount request"));

        let complex = chain.handle_request(&RentalRequest::new(RequestType::Complex, 1000.0, "Concert hall"));
        assert!(complex.starts_with("Admin handled complex request"));
    }

    #[test]
    fn test_handler_without_successor() {
        let manager = Manager::new();
        let reply = manager.handle_request(&RentalRequest::new(RequestType::Complex, 1.0, "Tour"));
        assert_eq!(reply, "Manager cannot handle request: Tour");

        let reply = Admin.handle_request(&RentalRequest::new(RequestType::Simple, 1.0, "Strings"));
        assert_eq!(reply, "Admin cannot handle request: Strings");
    }

    #[test]
    fn test_route_parses_type() {
        let reply = route("DISCOUNT", 20.0, "Loyalty").unwrap();
        assert!(reply.starts_with("Manager"));

        assert!(matches!(route("urgent", 1.0, "x"), Err(RentalError::Validation { .. })));
    }
}
