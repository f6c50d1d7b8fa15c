//! Partner WSDL operation catalog.
//!
//! The Partner API ships a static WSDL; the set of operations it declares
//! does not change at runtime. This module carries that set so the client
//! surface can enumerate supported operations without fetching or parsing
//! the WSDL itself.

/// Operation names declared by the Partner WSDL.
static PARTNER_OPERATIONS: &[&str] = &[
    "login",
    "logout",
    "query",
    "queryAll",
    "queryMore",
    "search",
    "create",
    "update",
    "upsert",
    "delete",
    "undelete",
    "retrieve",
    "merge",
    "describeSObject",
    "describeSObjects",
    "describeGlobal",
    "describeLayout",
    "describeTabs",
    "getDeleted",
    "getUpdated",
    "getUserInfo",
    "getServerTimestamp",
    "setPassword",
    "resetPassword",
    "process",
    "convertLead",
    "emptyRecycleBin",
    "invalidateSessions",
    "sendEmail",
];

/// Catalog of operations the remote service supports.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationCatalog;

impl OperationCatalog {
    /// The operation names declared by the Partner WSDL.
    pub fn operations(&self) -> &'static [&'static str] {
        PARTNER_OPERATIONS
    }

    /// Whether the WSDL declares the given operation.
    pub fn supports(&self, name: &str) -> bool {
        PARTNER_OPERATIONS.contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_contains_core_operations() {
        let catalog = OperationCatalog;
        for op in [
            "login",
            "logout",
            "query",
            "queryAll",
            "queryMore",
            "search",
            "create",
            "update",
            "upsert",
            "delete",
            "retrieve",
            "describeSObject",
            "describeSObjects",
            "getUserInfo",
        ] {
            assert!(catalog.supports(op), "missing operation {op}");
        }
    }

    #[test]
    fn test_catalog_rejects_unknown_operation() {
        let catalog = OperationCatalog;
        assert!(!catalog.supports("describeEverything"));
        assert!(!catalog.supports(""));
        // Lookup is case-sensitive, matching the WSDL element names.
        assert!(!catalog.supports("Query"));
    }
}
