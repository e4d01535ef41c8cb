//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay free of utoipa derives. The wrappers here mirror the
//! wire shape of their domain counterparts and exist only for documentation.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A backing store is temporarily unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Human-readable message returned to clients.
    #[schema(example = "Dispenser not found")]
    error: String,
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::DispenserKind`].
#[derive(ToSchema)]
#[schema(as = crate::domain::DispenserKind)]
pub enum DispenserKindSchema {
    /// Cold drinks.
    #[schema(rename = "DR")]
    Drink,
    /// Snacks.
    #[schema(rename = "SN")]
    Snack,
    /// Coffee.
    #[schema(rename = "CO")]
    Coffee,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use utoipa::PartialSchema;

    fn schema_json<T: PartialSchema>() -> serde_json::Value {
        serde_json::to_value(T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_schema_uses_wire_field_names() {
        let schema = schema_json::<ErrorSchema>();
        let properties = schema["properties"].as_object().expect("properties");

        for field in ["error", "code", "traceId", "details"] {
            assert!(properties.contains_key(field), "missing {field}");
        }
    }

    #[test]
    fn error_codes_are_snake_case() {
        let schema = schema_json::<ErrorCodeSchema>().to_string();
        for code in [
            "invalid_request",
            "unauthorized",
            "not_found",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema.contains(code), "missing {code}");
        }
    }

    #[test]
    fn dispenser_kinds_use_codes() {
        let schema = schema_json::<DispenserKindSchema>().to_string();
        for code in ["DR", "SN", "CO"] {
            assert!(schema.contains(code), "missing {code}");
        }
    }
}
