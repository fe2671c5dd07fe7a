//! Required-field checks for the login, signup and donation forms.

use crate::contract::error::FieldErrors;
use crate::contract::model::{Credentials, NewFoodPost, Registration};
use crate::domain::error::DomainError;

fn require(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), message.to_string());
    }
}

fn finish(errors: FieldErrors) -> Result<(), DomainError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(DomainError::validation(errors))
    }
}

pub fn validate_credentials(credentials: &Credentials) -> Result<(), DomainError> {
    let mut errors = FieldErrors::new();
    require(&mut errors, "email", &credentials.email, "Email is required");
    require(&mut errors, "password", &credentials.password, "Password is required");
    finish(errors)
}

pub fn validate_registration(registration: &Registration) -> Result<(), DomainError> {
    let mut errors = FieldErrors::new();
    require(&mut errors, "name", &registration.name, "Name is required");
    require(&mut errors, "email", &registration.email, "Email is required");
    require(&mut errors, "password", &registration.password, "Password is required");
    finish(errors)
}

pub fn validate_draft(draft: &NewFoodPost) -> Result<(), DomainError> {
    let mut errors = FieldErrors::new();
    require(&mut errors, "foodName", &draft.food_name, "Food name is required");
    require(&mut errors, "quantity", &draft.quantity, "Quantity is required");
    require(&mut errors, "pickupDate", &draft.pickup_date, "Pickup date is required");
    require(&mut errors, "pickupTime", &draft.pickup_time, "Pickup time is required");
    require(
        &mut errors,
        "contactNumber",
        &draft.contact_number,
        "Contact number is required",
    );
    require(&mut errors, "address", &draft.address, "Address is required");
    match draft.estimated_weight {
        None => {
            errors.insert(
                "estimatedWeight".into(),
                "Estimated weight is required".into(),
            );
        }
        Some(w) if !w.is_finite() || w <= 0.0 => {
            errors.insert(
                "estimatedWeight".into(),
                "Estimated weight must be greater than zero".into(),
            );
        }
        Some(_) => {}
    }
    finish(errors)
}
