//! Form-field validation.
//!
//! `validators` holds the single-field checks; `form` applies them to a whole
//! form through per-field rule lists.

pub mod form;
pub mod validators;

pub use form::{CustomCheck, FieldRules, FormErrors, FormRules, Rule, validate_form};
pub use validators::{
    validate_date_range, validate_did, validate_email, validate_future_date, validate_json,
    validate_password, validate_password_match, validate_required, validate_url,
    validate_username,
};
