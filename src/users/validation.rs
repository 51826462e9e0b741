//! Input validation for registration and profile updates.
//!
//! Payloads arrive as raw JSON so every rule can report its own message and
//! all violations are collected before failing, the way a schema validator
//! with early-abort disabled would.

use crate::error::ApiError;
use crate::users::models::{NewUser, UserUpdate};
use serde_json::{Map, Value};

const NEW_USER_KEYS: &[&str] = &[
    "name",
    "email",
    "password",
    "age",
    "city",
    "zipCode",
    "phone",
    "googleId",
    "isVerified",
    "isActive",
];

const UPDATE_KEYS: &[&str] = &["name", "age", "city", "zipCode", "phone"];

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_PHONE_LEN: usize = 10;
pub const MAX_PHONE_LEN: usize = 12;
pub const MAX_AGE: i64 = 150;

/// Outcome of reading a single integer field
enum IntField {
    Missing,
    NotNumber,
    NotInteger,
    Value(i64),
}

/// Accumulates violations across all fields of one payload.
struct Checker<'a> {
    object: &'a Map<String, Value>,
    errors: Vec<String>,
}

impl<'a> Checker<'a> {
    fn new(object: &'a Map<String, Value>) -> Self {
        Self {
            object,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn reject_unknown_keys(&mut self, allowed: &[&str]) {
        let unknown: Vec<String> = self
            .object
            .keys()
            .filter(|k| !allowed.contains(&k.as_str()))
            .map(|k| format!("\"{}\" is not allowed", k))
            .collect();
        self.errors.extend(unknown);
    }

    /// Present, non-null value for `key`
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.object.get(key).filter(|v| !v.is_null())
    }

    fn required_string(&mut self, key: &str, required_message: &str) -> Option<String> {
        match self.get(key) {
            None => {
                self.fail(required_message);
                None
            }
            Some(value) => self.string_value(key, value),
        }
    }

    fn optional_string(&mut self, key: &str) -> Option<String> {
        let value = self.get(key)?;
        self.string_value(key, value)
    }

    fn string_value(&mut self, key: &str, value: &Value) -> Option<String> {
        match value.as_str() {
            Some(s) if s.trim().is_empty() => {
                self.fail(format!("\"{}\" is not allowed to be empty", key));
                None
            }
            Some(s) => Some(s.to_string()),
            None => {
                self.fail(format!("\"{}\" must be a string", key));
                None
            }
        }
    }

    fn int_field(&self, key: &str) -> IntField {
        let Some(value) = self.get(key) else {
            return IntField::Missing;
        };
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => IntField::Value(i),
                None => match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        IntField::Value(f as i64)
                    }
                    Some(_) => IntField::NotInteger,
                    None => IntField::NotNumber,
                },
            },
            // Numeric strings are converted, as a lenient schema validator would.
            Value::String(s) => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    IntField::Value(i)
                } else if s.parse::<f64>().map(f64::is_finite).unwrap_or(false) {
                    IntField::NotInteger
                } else {
                    IntField::NotNumber
                }
            }
            _ => IntField::NotNumber,
        }
    }

    fn integer(&mut self, key: &str, label: &str, required: bool) -> Option<i64> {
        match self.int_field(key) {
            IntField::Value(i) => Some(i),
            IntField::Missing => {
                if required {
                    self.fail(format!("{} is required", label));
                }
                None
            }
            IntField::NotNumber => {
                self.fail(format!("{} must be a number", label));
                None
            }
            IntField::NotInteger => {
                self.fail(format!("{} must be an integer", label));
                None
            }
        }
    }

    fn optional_bool(&mut self, key: &str) {
        if let Some(value) = self.get(key) {
            if !value.is_boolean() {
                self.fail(format!("\"{}\" must be a boolean", key));
            }
        }
    }

    fn finish<T>(self, value: Option<T>) -> Result<T, ApiError> {
        match value {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ => Err(ApiError::Validation(self.errors.join(". "))),
        }
    }
}

/// Minimal structural email check: one `@`, a local part, and a dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// Validate a registration payload (`userData`).
pub fn validate_new_user(payload: Option<&Value>) -> Result<NewUser, ApiError> {
    let Some(object) = payload.and_then(Value::as_object) else {
        return Err(ApiError::InvalidPayload("Please enter valid user details"));
    };
    let mut checker = Checker::new(object);
    checker.reject_unknown_keys(NEW_USER_KEYS);

    let name = checker.required_string("name", "Name is required");

    let email = checker
        .required_string("email", "Email is required")
        .and_then(|email| {
            let email = email.trim().to_lowercase();
            if is_valid_email(&email) {
                Some(email)
            } else {
                checker.fail("Invalid email format");
                None
            }
        });

    let password = checker
        .required_string("password", "Password is required")
        .and_then(|password| {
            if password.chars().count() < MIN_PASSWORD_LEN {
                checker.fail("Password must be at least 6 characters long");
                None
            } else {
                Some(password)
            }
        });

    let age = checker.integer("age", "Age", true);
    let city = checker.required_string("city", "City is required");
    let zip_code = checker.integer("zipCode", "Zip/Postal code", true);

    let phone = checker.optional_string("phone").and_then(|phone| {
        let len = phone.chars().count();
        if len < MIN_PHONE_LEN {
            checker.fail("Phone number must be at least 10 characters long");
            None
        } else if len > MAX_PHONE_LEN {
            checker.fail("Phone number cannot be more than 12 characters long");
            None
        } else {
            Some(phone)
        }
    });
    let phone_ok = checker.get("phone").is_none() || phone.is_some();

    let google_id = checker.optional_string("googleId");
    checker.optional_bool("isVerified");
    checker.optional_bool("isActive");

    let new_user = match (name, email, password, age, city, zip_code) {
        (Some(name), Some(email), Some(password), Some(age), Some(city), Some(zip_code))
            if phone_ok =>
        {
            Some(NewUser {
                name,
                email,
                password,
                age,
                city,
                zip_code,
                phone,
                google_id,
            })
        }
        _ => None,
    };
    checker.finish(new_user)
}

/// Validate a profile update payload (`updateData`).
pub fn validate_user_update(payload: Option<&Value>) -> Result<UserUpdate, ApiError> {
    let Some(object) = payload.and_then(Value::as_object) else {
        return Err(ApiError::InvalidPayload(
            "Please provide valid user update details",
        ));
    };
    let mut checker = Checker::new(object);
    if object.is_empty() {
        checker.fail("At least one field must be provided");
    }
    checker.reject_unknown_keys(UPDATE_KEYS);

    let mut update = UserUpdate {
        name: checker.optional_string("name").map(|s| s.trim().to_string()),
        city: checker.optional_string("city").map(|s| s.trim().to_string()),
        ..Default::default()
    };

    update.age = checker.integer("age", "Age", false).and_then(|age| {
        if (0..=MAX_AGE).contains(&age) {
            Some(age)
        } else {
            checker.fail("Age must be between 0 and 150");
            None
        }
    });

    update.zip_code = checker
        .integer("zipCode", "Zip/Postal code", false)
        .and_then(|zip| {
            if zip > 0 {
                Some(zip)
            } else {
                checker.fail("Zip/Postal code must be a positive number");
                None
            }
        });

    if let Some(raw) = object.get("phone") {
        if raw.is_null() {
            update.phone = Some(None);
        } else if let Some(phone) = checker.optional_string("phone") {
            let phone = phone.trim().to_string();
            let digits_only = phone.chars().all(|c| c.is_ascii_digit());
            if digits_only && (MIN_PHONE_LEN..=MAX_PHONE_LEN).contains(&phone.len()) {
                update.phone = Some(Some(phone));
            } else {
                checker.fail("Phone number must contain 10 to 12 digits");
            }
        }
    }

    checker.finish(Some(update))
}
