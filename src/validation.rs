//! Validation of the admin product form.
//!
//! Text fields go through a `validator` derive; the two uploads are checked by
//! hand since their rules depend on whether a product is being created or
//! edited. Failures are collected per field, never short-circuited.

use validator::{Validate, ValidationErrors};

use crate::dtos::product::{ProductFormData, UploadedFile};
use crate::error::FieldErrors;

const REQUIRED: &str = "Required";

#[derive(Debug, Validate)]
struct ProductFields {
    #[validate(length(min = 1, message = "Required"))]
    name: String,
    #[validate(length(min = 1, message = "Required"))]
    description: String,
    #[validate(range(min = 1, max = 2147483647, message = "Must be a whole number of cents, at least 1"))]
    price_in_cents: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Uploads {
    Required,
    Optional,
}

/// A product form that passed validation.
#[derive(Debug, Clone)]
pub struct ValidProductForm {
    pub name: String,
    pub description: String,
    pub price_in_cents: i32,
    /// Always present for creation. `None` on edit means "keep the stored file".
    pub file: Option<UploadedFile>,
    pub image: Option<UploadedFile>,
}

/// All fields are required, and both uploads must carry content.
pub fn validate_new_product(form: ProductFormData) -> Result<ValidProductForm, FieldErrors> {
    validate(form, Uploads::Required)
}

/// Same text rules as creation; empty or missing uploads are accepted.
pub fn validate_product_edit(form: ProductFormData) -> Result<ValidProductForm, FieldErrors> {
    validate(form, Uploads::Optional)
}

fn validate(form: ProductFormData, uploads: Uploads) -> Result<ValidProductForm, FieldErrors> {
    let mut errors = FieldErrors::new();

    let raw_price = form.price_in_cents.as_deref().map(str::trim).unwrap_or("");
    let price_in_cents = if raw_price.is_empty() {
        push(&mut errors, "price_in_cents", REQUIRED);
        None
    } else {
        match raw_price.parse::<i64>() {
            Ok(p) => Some(p),
            Err(_) => {
                push(&mut errors, "price_in_cents", "Expected a whole number");
                None
            }
        }
    };

    let fields = ProductFields {
        name: form.name.unwrap_or_default(),
        description: form.description.unwrap_or_default(),
        price_in_cents,
    };
    if let Err(e) = fields.validate() {
        merge(&mut errors, &e);
    }

    let file = check_upload(&mut errors, "file", form.file, uploads, false);
    let image = check_upload(&mut errors, "image", form.image, uploads, true);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidProductForm {
        name: fields.name,
        description: fields.description,
        // range-checked above
        price_in_cents: fields.price_in_cents.unwrap_or_default() as i32,
        file,
        image,
    })
}

fn check_upload(
    errors: &mut FieldErrors,
    field: &str,
    upload: Option<UploadedFile>,
    uploads: Uploads,
    image_only: bool,
) -> Option<UploadedFile> {
    let upload = upload.filter(|u| !u.is_empty());
    match upload {
        None => {
            if uploads == Uploads::Required {
                push(errors, field, REQUIRED);
            }
            None
        }
        Some(u) if image_only && !u.is_image() => {
            push(errors, field, "Must be an image");
            None
        }
        Some(u) => Some(u),
    }
}

fn push(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

fn merge(errors: &mut FieldErrors, validation: &ValidationErrors) {
    for (field, field_errors) in validation.field_errors() {
        for err in field_errors.iter() {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            push(errors, &field.to_string(), &message);
        }
    }
}
