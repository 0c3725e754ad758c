//! The single validation unit for candidate sales.
//!
//! Every entry point funnels through [`validate_create_sale`]; rules are
//! collected in one pass so the caller sees every violation at once, not
//! just the first.

use crate::errors::{FieldError, ServiceError};
use crate::services::sales::CreateSaleRequest;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Sales dated on or before this instant are outside the business window.
fn min_sale_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap()
}

/// Runs every create-sale rule and collects all violations.
///
/// Pure check: no entity resolution and no persistence happens here. `now`
/// comes from the injected clock so the future-date rule is deterministic.
pub fn validate_create_sale(
    request: &CreateSaleRequest,
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    let mut errors: Vec<FieldError> = Vec::new();

    if let Err(derive_errors) = request.validate() {
        flatten_into("", &derive_errors, &mut errors);
    }

    if request.sale_date <= min_sale_date() {
        errors.push(FieldError::new(
            "sale_date",
            "The date must be after 01/01/1990.",
        ));
    } else if request.sale_date > now {
        errors.push(FieldError::new(
            "sale_date",
            "The date cannot be in the future.",
        ));
    }

    if request.items.is_empty() {
        errors.push(FieldError::new("items", "The product list cannot be empty."));
    }

    // client-supplied total is checked at the boundary, then discarded in
    // favor of the recomputed sum
    if let Some(total) = request.total_amount {
        if total <= Decimal::ZERO {
            errors.push(FieldError::new(
                "total_amount",
                "The Total Sales Amount must be positive.",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::ValidationFailed(errors))
    }
}

/// Validates a standalone entity payload (customer, branch, product create
/// endpoints reuse the same flattening as the sale pipeline).
pub fn validate_entity<T: Validate>(value: &T) -> Result<(), ServiceError> {
    value.validate().map_err(|e| {
        let mut errors = Vec::new();
        flatten_into("", &e, &mut errors);
        ServiceError::ValidationFailed(errors)
    })
}

/// Flattens derive-produced [`ValidationErrors`] into field-path/message
/// pairs, recursing through nested structs and lists.
pub fn flatten(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    flatten_into("", errors, &mut out);
    out
}

fn flatten_into(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            (*field).to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(violations) => {
                for violation in violations {
                    let message = violation
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value for rule `{}`", violation.code));
                    out.push(FieldError::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => flatten_into(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    flatten_into(&format!("{path}[{index}]"), nested, out);
                }
            }
        }
    }
}

/// Rule shared by every monetary request field.
pub fn validate_positive_price(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        let mut error = ValidationError::new("positive");
        error.message = Some("Product Unit Price must be greater than zero.".into());
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::branches::BranchRef;
    use crate::services::customers::CustomerRef;
    use crate::services::sales::SaleLineRequest;
    use assert_matches::assert_matches;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn valid_request(now: DateTime<Utc>) -> CreateSaleRequest {
        CreateSaleRequest {
            sale_date: now - Duration::hours(1),
            customer: CustomerRef {
                id: None,
                name: "Ana Souza".to_string(),
                status: Default::default(),
            },
            branch: BranchRef {
                id: None,
                name: "Downtown".to_string(),
            },
            total_amount: None,
            is_cancelled: false,
            status: Default::default(),
            items: vec![SaleLineRequest {
                product_id: None,
                name: "Beer".to_string(),
                quantity: 5,
                unit_price: dec!(100),
            }],
        }
    }

    #[test]
    fn valid_request_passes() {
        let now = Utc::now();
        assert!(validate_create_sale(&valid_request(now), now).is_ok());
    }

    #[test]
    fn date_before_1990_is_rejected() {
        let now = Utc::now();
        let mut request = valid_request(now);
        request.sale_date = Utc.with_ymd_and_hms(1985, 1, 1, 0, 0, 0).unwrap();

        let err = validate_create_sale(&request, now).unwrap_err();
        assert_matches!(err, ServiceError::ValidationFailed(errors) => {
            assert!(errors.iter().any(|e| e.field == "sale_date"
                && e.message.contains("after 01/01/1990")));
        });
    }

    #[test]
    fn future_date_is_rejected() {
        let now = Utc::now();
        let mut request = valid_request(now);
        request.sale_date = now + Duration::hours(2);

        let err = validate_create_sale(&request, now).unwrap_err();
        assert_matches!(err, ServiceError::ValidationFailed(errors) => {
            assert!(errors.iter().any(|e| e.field == "sale_date"
                && e.message.contains("future")));
        });
    }

    #[test]
    fn all_violations_are_collected_in_one_pass() {
        let now = Utc::now();
        let mut request = valid_request(now);
        request.customer.name = "ab".to_string(); // too short
        request.total_amount = Some(dec!(-10));
        request.items = vec![SaleLineRequest {
            product_id: None,
            name: String::new(),
            quantity: 0,
            unit_price: dec!(0),
        }];

        let err = validate_create_sale(&request, now).unwrap_err();
        assert_matches!(err, ServiceError::ValidationFailed(errors) => {
            let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
            assert!(fields.contains(&"customer.name"));
            assert!(fields.contains(&"total_amount"));
            assert!(fields.contains(&"items[0].name"));
            assert!(fields.contains(&"items[0].quantity"));
            assert!(fields.contains(&"items[0].unit_price"));
        });
    }

    #[test]
    fn empty_product_list_is_rejected() {
        let now = Utc::now();
        let mut request = valid_request(now);
        request.items.clear();

        let err = validate_create_sale(&request, now).unwrap_err();
        assert_matches!(err, ServiceError::ValidationFailed(errors) => {
            assert!(errors.iter().any(|e| e.field == "items"
                && e.message == "The product list cannot be empty."));
        });
    }

    #[test]
    fn supplied_total_must_be_positive_but_is_not_required() {
        let now = Utc::now();
        let mut request = valid_request(now);
        request.total_amount = Some(dec!(0));
        assert!(validate_create_sale(&request, now).is_err());

        request.total_amount = None;
        assert!(validate_create_sale(&request, now).is_ok());
    }
}
