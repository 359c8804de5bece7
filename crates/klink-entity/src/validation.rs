//! Turning `validator` failures into application errors.

use validator::{Validate, ValidationErrors};

use klink_core::{AppError, AppResult};

/// Validate a DTO, collecting every failure into one 400 message.
pub fn validate<T: Validate>(dto: &T) -> AppResult<()> {
    dto.validate().map_err(into_app_error)
}

fn into_app_error(errors: ValidationErrors) -> AppError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value for {field}"),
            })
        })
        .collect();
    messages.sort();
    AppError::validation(format!("Invalid input data. {}", messages.join(". ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Please add a name"))]
        name: String,
        #[validate(range(min = 0.0))]
        price: f64,
    }

    #[test]
    fn test_messages_are_collected() {
        let err = validate(&Sample {
            name: String::new(),
            price: -1.0,
        })
        .unwrap_err();
        assert_eq!(
            err.message,
            "Invalid input data. Invalid value for price. Please add a name"
        );
    }

    #[test]
    fn test_valid_passes() {
        assert!(validate(&Sample {
            name: "chair".into(),
            price: 3.0
        })
        .is_ok());
    }
}
