//! Route prefixes shared by the router, the OpenAPI document and the service index.

pub const API_PREFIX: &str = "/api";

/// Static route for images written by the local store.
pub const UPLOADS_ROUTE: &str = "/uploads";

pub const SERVICE_NAME: &str = "Landmark Real Estate API";
