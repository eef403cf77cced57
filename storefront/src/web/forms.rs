// storefront/src/web/forms.rs

//! Request payloads and their field-level validation.
//!
//! Numeric fields arrive as raw JSON values so that `"12.50"` and `12.5` are
//! both accepted and a wrong type becomes a field error (401) rather than a
//! body rejection (400).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::ProductChanges;

const REQUIRED: &str = "This field is required.";
const NAME_MAX_CHARS: usize = 255;
const DESCRIPTION_MIN_CHARS: usize = 20;
const IMAGE_EXTENSIONS: [&str; 3] = [".png", ".jpg", ".jpeg"];

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
  pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
    self.0.entry(field).or_default().push(message.into());
  }

  pub fn single(field: &'static str, message: impl Into<String>) -> Self {
    let mut errors = Self::default();
    errors.add(field, message);
    errors
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn get(&self, field: &str) -> Option<&[String]> {
    self.0.get(field).map(Vec::as_slice)
  }
}

impl fmt::Display for FieldErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, messages) in &self.0 {
      if !first {
        write!(f, "; ")?;
      }
      first = false;
      write!(f, "{}: {}", field, messages.join(" "))?;
    }
    Ok(())
  }
}

/// Product form as submitted for create and update.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ProductForm {
  pub name: Option<String>,
  pub description: Option<String>,
  pub price: Option<Value>,
  pub quantity: Option<Value>,
  pub image_url: Option<String>,
  pub csrf_token: Option<String>,
}

/// A product form that passed validation.
#[derive(Debug, Clone)]
pub struct ValidProductForm {
  pub changes: ProductChanges,
  pub image_url: Option<String>,
}

impl ProductForm {
  /// Validates every field and the CSRF double-submit token.
  ///
  /// `require_image` is set on create, where a preview image is mandatory.
  pub fn validate(&self, csrf_cookie: Option<&str>, require_image: bool) -> Result<ValidProductForm, FieldErrors> {
    let mut errors = FieldErrors::default();

    check_csrf(self.csrf_token.as_deref(), csrf_cookie, &mut errors);

    let name = non_blank(self.name.as_deref());
    match name {
      None => errors.add("name", REQUIRED),
      Some(n) if n.chars().count() > NAME_MAX_CHARS => {
        errors.add("name", format!("Name must be at most {} characters.", NAME_MAX_CHARS))
      }
      Some(_) => {}
    }

    let description = non_blank(self.description.as_deref());
    match description {
      None => errors.add("description", REQUIRED),
      Some(d) if d.chars().count() < DESCRIPTION_MIN_CHARS => errors.add(
        "description",
        format!("Description must be at least {} characters.", DESCRIPTION_MIN_CHARS),
      ),
      Some(_) => {}
    }

    let price = match self.price.as_ref() {
      None | Some(Value::Null) => {
        errors.add("price", REQUIRED);
        None
      }
      Some(value) => match as_float(value) {
        Some(p) if p > 0.0 => Some(p),
        Some(_) => {
          errors.add("price", "Price must be greater than 0.");
          None
        }
        None => {
          errors.add("price", "Not a valid float value.");
          None
        }
      },
    };

    let quantity = match positive_integer(self.quantity.as_ref()) {
      Ok(q) => Some(q),
      Err(message) => {
        errors.add("quantity", message);
        None
      }
    };

    let image_url = non_blank(self.image_url.as_deref());
    match image_url {
      None if require_image => errors.add("image_url", "Preview image is required."),
      Some(url) if !has_image_extension(url) => {
        errors.add("image_url", "Image URL must end in .png, .jpg, or .jpeg")
      }
      _ => {}
    }

    match (name, description, price, quantity) {
      (Some(name), Some(description), Some(price), Some(quantity)) if errors.is_empty() => Ok(ValidProductForm {
        changes: ProductChanges {
          name: name.to_string(),
          description: description.to_string(),
          price,
          quantity,
        },
        image_url: image_url.map(str::to_string),
      }),
      _ => Err(errors),
    }
  }
}

#[derive(Deserialize, Debug, Default)]
pub struct AddCartItemPayload {
  pub product_id: Option<Value>,
  pub quantity: Option<Value>,
}

impl AddCartItemPayload {
  /// Returns `(product_id, quantity)`.
  pub fn validate(&self) -> Result<(i64, i64), FieldErrors> {
    let mut errors = FieldErrors::default();
    let product_id = record_id(self.product_id.as_ref(), "product_id", &mut errors);
    let quantity = cart_quantity(self.quantity.as_ref(), &mut errors);
    match (product_id, quantity) {
      (Some(product_id), Some(quantity)) => Ok((product_id, quantity)),
      _ => Err(errors),
    }
  }
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateCartItemPayload {
  pub id: Option<Value>,
  pub quantity: Option<Value>,
}

impl UpdateCartItemPayload {
  /// Returns `(cart_item_id, quantity)`.
  pub fn validate(&self) -> Result<(i64, i64), FieldErrors> {
    let mut errors = FieldErrors::default();
    let item_id = record_id(self.id.as_ref(), "id", &mut errors);
    let quantity = cart_quantity(self.quantity.as_ref(), &mut errors);
    match (item_id, quantity) {
      (Some(item_id), Some(quantity)) => Ok((item_id, quantity)),
      _ => Err(errors),
    }
  }
}

#[derive(Deserialize, Debug, Default)]
pub struct RemoveCartItemPayload {
  pub id: Option<Value>,
}

impl RemoveCartItemPayload {
  pub fn validate(&self) -> Result<i64, FieldErrors> {
    let mut errors = FieldErrors::default();
    record_id(self.id.as_ref(), "id", &mut errors).ok_or(errors)
  }
}

fn cart_quantity(value: Option<&Value>, errors: &mut FieldErrors) -> Option<i64> {
  positive_integer(value)
    .map_err(|message| errors.add("quantity", message))
    .ok()
}

fn record_id(value: Option<&Value>, field: &'static str, errors: &mut FieldErrors) -> Option<i64> {
  match value {
    None | Some(Value::Null) => {
      errors.add(field, REQUIRED);
      None
    }
    Some(v) => match as_integer(v) {
      Some(id) if id > 0 => Some(id),
      _ => {
        errors.add(field, "Not a valid id.");
        None
      }
    },
  }
}

fn check_csrf(form_token: Option<&str>, cookie_token: Option<&str>, errors: &mut FieldErrors) {
  match (non_blank(form_token), cookie_token) {
    (Some(submitted), Some(expected)) if tokens_match(submitted, expected) => {}
    (Some(_), Some(_)) => errors.add("csrf_token", "The CSRF tokens do not match."),
    _ => errors.add("csrf_token", "The CSRF token is missing."),
  }
}

/// Compares tokens without short-circuiting on the first differing byte.
fn tokens_match(submitted: &str, expected: &str) -> bool {
  let (submitted, expected) = (submitted.as_bytes(), expected.as_bytes());
  if submitted.len() != expected.len() {
    return false;
  }
  submitted
    .iter()
    .zip(expected)
    .fold(0u8, |diff, (a, b)| diff | (a ^ b))
    == 0
}

fn non_blank(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|v| !v.is_empty())
}

fn as_float(value: &Value) -> Option<f64> {
  let parsed = match value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  };
  parsed.filter(|f| f.is_finite())
}

fn as_integer(value: &Value) -> Option<i64> {
  match value {
    Value::Number(n) => n.as_i64(),
    Value::String(s) => s.trim().parse::<i64>().ok(),
    _ => None,
  }
}

fn positive_integer(value: Option<&Value>) -> Result<i64, String> {
  match value {
    None | Some(Value::Null) => Err(REQUIRED.to_string()),
    Some(v) => match as_integer(v) {
      Some(q) if q > 0 => Ok(q),
      Some(_) => Err("Quantity must be at least 1.".to_string()),
      None => Err("Not a valid integer value.".to_string()),
    },
  }
}

fn has_image_extension(url: &str) -> bool {
  let lowered = url.to_ascii_lowercase();
  IMAGE_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext))
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn valid_form() -> ProductForm {
    ProductForm {
      name: Some("Brass Desk Lamp".to_string()),
      description: Some("A sturdy brass lamp with a linen shade.".to_string()),
      price: Some(json!(64.5)),
      quantity: Some(json!(3)),
      image_url: Some("https://img.example.com/lamp.JPG".to_string()),
      csrf_token: Some("tok".to_string()),
    }
  }

  #[test]
  fn accepts_a_complete_form() {
    let valid = valid_form().validate(Some("tok"), true).unwrap();
    assert_eq!(valid.changes.name, "Brass Desk Lamp");
    assert_eq!(valid.changes.price, 64.5);
    assert_eq!(valid.changes.quantity, 3);
    assert_eq!(valid.image_url.as_deref(), Some("https://img.example.com/lamp.JPG"));
  }

  #[test]
  fn numeric_strings_are_coerced() {
    let form = ProductForm {
      price: Some(json!("19.99")),
      quantity: Some(json!(" 7 ")),
      ..valid_form()
    };
    let valid = form.validate(Some("tok"), false).unwrap();
    assert_eq!(valid.changes.price, 19.99);
    assert_eq!(valid.changes.quantity, 7);
  }

  #[test]
  fn empty_form_reports_every_field() {
    let errors = ProductForm::default().validate(None, true).unwrap_err();
    for field in ["name", "description", "price", "quantity", "image_url", "csrf_token"] {
      assert!(errors.get(field).is_some(), "expected an error for {}", field);
    }
  }

  #[test]
  fn short_description_and_bad_numbers_are_rejected() {
    let form = ProductForm {
      description: Some("too short".to_string()),
      price: Some(json!(0)),
      quantity: Some(json!("lots")),
      ..valid_form()
    };
    let errors = form.validate(Some("tok"), false).unwrap_err();
    assert_eq!(
      errors.get("description").unwrap(),
      ["Description must be at least 20 characters.".to_string()]
    );
    assert_eq!(errors.get("price").unwrap(), ["Price must be greater than 0.".to_string()]);
    assert_eq!(errors.get("quantity").unwrap(), ["Not a valid integer value.".to_string()]);
  }

  #[test]
  fn csrf_token_must_match_cookie() {
    let errors = valid_form().validate(Some("other"), false).unwrap_err();
    assert_eq!(errors.get("csrf_token").unwrap(), ["The CSRF tokens do not match.".to_string()]);

    let errors = valid_form().validate(None, false).unwrap_err();
    assert_eq!(errors.get("csrf_token").unwrap(), ["The CSRF token is missing.".to_string()]);
  }

  #[test]
  fn image_is_optional_on_update_but_must_be_an_image() {
    let form = ProductForm {
      image_url: None,
      ..valid_form()
    };
    assert!(form.validate(Some("tok"), false).is_ok());

    let form = ProductForm {
      image_url: Some("https://img.example.com/lamp.gif".to_string()),
      ..valid_form()
    };
    let errors = form.validate(Some("tok"), false).unwrap_err();
    assert!(errors.get("image_url").is_some());
  }

  #[test]
  fn cart_payloads_report_every_bad_field() {
    let payload = AddCartItemPayload {
      product_id: Some(json!("abc")),
      quantity: Some(json!(0)),
    };
    let errors = payload.validate().unwrap_err();
    assert_eq!(errors.get("product_id").unwrap(), ["Not a valid id.".to_string()]);
    assert_eq!(errors.get("quantity").unwrap(), ["Quantity must be at least 1.".to_string()]);

    let errors = UpdateCartItemPayload::default().validate().unwrap_err();
    assert_eq!(errors.get("id").unwrap(), [REQUIRED.to_string()]);
    assert_eq!(errors.get("quantity").unwrap(), [REQUIRED.to_string()]);

    let errors = RemoveCartItemPayload { id: Some(json!(-4)) }.validate().unwrap_err();
    assert!(errors.get("id").is_some());
  }

  #[test]
  fn cart_payloads_accept_numeric_strings() {
    let payload = AddCartItemPayload {
      product_id: Some(json!("12")),
      quantity: Some(json!(2)),
    };
    assert_eq!(payload.validate().unwrap(), (12, 2));
    assert_eq!(RemoveCartItemPayload { id: Some(json!(5)) }.validate().unwrap(), 5);
  }

  #[test]
  fn token_comparison_requires_exact_match() {
    assert!(tokens_match("abc123", "abc123"));
    assert!(!tokens_match("abc123", "abc124"));
    assert!(!tokens_match("abc", "abc123"));
    assert!(!tokens_match("", "x"));
  }
}
