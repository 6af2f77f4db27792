//! Form field sets and their validation rules.
//!
//! Each form mirrors an HTML form posted as `application/x-www-form-urlencoded`.
//! Missing fields deserialize to empty strings so that every violated
//! constraint surfaces as a per-field message instead of a deserialization
//! rejection; on failure the submitted values are echoed back so a renderer
//! can repopulate the form.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

use crate::db::CafeUpsert;

/// Allowed values for the `seats` choice field.
pub const SEAT_BUCKETS: [&str; 6] = ["0-10", "10-20", "20-30", "30-40", "40-50", "50+"];

/// Allowed values for the amenity flags. The first entry is the default when
/// a flag is not submitted.
pub const AMENITY_CHOICES: [&str; 2] = ["Yes", "No"];

const REQUIRED: &str = "This field is required.";
const INVALID_URL: &str = "Invalid URL.";
const INVALID_CHOICE: &str = "Not a valid choice.";

/// Per-field validation failure, with the offending submission preserved.
/// Password values are never echoed back.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationRejection {
    pub fields: BTreeMap<&'static str, &'static str>,
    pub values: BTreeMap<&'static str, String>,
}

impl ValidationRejection {
    fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
            values: BTreeMap::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn require<'a>(
    rejection: &mut ValidationRejection,
    field: &'static str,
    value: &'a str,
) -> Option<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        rejection.fields.insert(field, REQUIRED);
        None
    } else {
        Some(trimmed)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterForm {
    /// All three fields are required; no format or strength checks beyond
    /// non-empty.
    pub fn validate(&self) -> Result<(), ValidationRejection> {
        let mut rejection = ValidationRejection::new();
        require(&mut rejection, "name", &self.name);
        require(&mut rejection, "email", &self.email);
        require(&mut rejection, "password", &self.password);
        if rejection.is_empty() {
            Ok(())
        } else {
            rejection
                .values
                .insert("name", self.name.trim().to_string());
            rejection
                .values
                .insert("email", self.email.trim().to_string());
            Err(rejection)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationRejection> {
        let mut rejection = ValidationRejection::new();
        require(&mut rejection, "email", &self.email);
        require(&mut rejection, "password", &self.password);
        if rejection.is_empty() {
            Ok(())
        } else {
            rejection
                .values
                .insert("email", self.email.trim().to_string());
            Err(rejection)
        }
    }
}

/// The add/edit cafe form. Field names follow the HTML form, which differ
/// from the stored column names for `cafe_name` and `image_url`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CafeForm {
    #[serde(default)]
    pub cafe_name: String,
    #[serde(default)]
    pub map_url: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub seats: String,
    pub has_sockets: Option<String>,
    pub has_toilet: Option<String>,
    pub has_wifi: Option<String>,
    pub can_take_calls: Option<String>,
    #[serde(default)]
    pub coffee_price: String,
}

impl CafeForm {
    /// Validates the submission and converts it into the repository's upsert
    /// payload. No partial persistence: the caller only sees a complete,
    /// validated field set or the full rejection.
    pub fn validate(&self) -> Result<CafeUpsert, ValidationRejection> {
        let mut rejection = ValidationRejection::new();

        let name = require(&mut rejection, "cafe_name", &self.cafe_name);
        let map_url = validate_url(&mut rejection, "map_url", &self.map_url);
        let img_url = validate_url(&mut rejection, "image_url", &self.image_url);
        let location = require(&mut rejection, "location", &self.location);
        let seats = validate_choice(&mut rejection, "seats", &self.seats, &SEAT_BUCKETS);
        let coffee_price = require(&mut rejection, "coffee_price", &self.coffee_price);

        let has_sockets = validate_flag(&mut rejection, "has_sockets", self.has_sockets.as_deref());
        let has_toilet = validate_flag(&mut rejection, "has_toilet", self.has_toilet.as_deref());
        let has_wifi = validate_flag(&mut rejection, "has_wifi", self.has_wifi.as_deref());
        let can_take_calls = validate_flag(
            &mut rejection,
            "can_take_calls",
            self.can_take_calls.as_deref(),
        );

        if rejection.is_empty() {
            Ok(CafeUpsert {
                name: name.unwrap_or_default().to_string(),
                map_url: map_url.unwrap_or_default().to_string(),
                img_url: img_url.unwrap_or_default().to_string(),
                location: location.unwrap_or_default().to_string(),
                seats: seats.unwrap_or_default().to_string(),
                has_sockets: has_sockets.to_string(),
                has_toilet: has_toilet.to_string(),
                has_wifi: has_wifi.to_string(),
                can_take_calls: can_take_calls.to_string(),
                coffee_price: coffee_price.unwrap_or_default().to_string(),
            })
        } else {
            for (field, value) in [
                ("cafe_name", &self.cafe_name),
                ("map_url", &self.map_url),
                ("image_url", &self.image_url),
                ("location", &self.location),
                ("seats", &self.seats),
                ("coffee_price", &self.coffee_price),
            ] {
                rejection.values.insert(field, value.trim().to_string());
            }
            rejection
                .values
                .insert("has_sockets", flag_value(self.has_sockets.as_deref()));
            rejection
                .values
                .insert("has_toilet", flag_value(self.has_toilet.as_deref()));
            rejection
                .values
                .insert("has_wifi", flag_value(self.has_wifi.as_deref()));
            rejection.values.insert(
                "can_take_calls",
                flag_value(self.can_take_calls.as_deref()),
            );
            Err(rejection)
        }
    }
}

fn validate_url<'a>(
    rejection: &mut ValidationRejection,
    field: &'static str,
    value: &'a str,
) -> Option<&'a str> {
    let trimmed = require(rejection, field, value)?;
    if Url::parse(trimmed).is_ok() {
        Some(trimmed)
    } else {
        rejection.fields.insert(field, INVALID_URL);
        None
    }
}

fn validate_choice<'a>(
    rejection: &mut ValidationRejection,
    field: &'static str,
    value: &'a str,
    choices: &[&str],
) -> Option<&'a str> {
    let trimmed = require(rejection, field, value)?;
    if choices.contains(&trimmed) {
        Some(trimmed)
    } else {
        rejection.fields.insert(field, INVALID_CHOICE);
        None
    }
}

/// Amenity flags default to the first choice when absent or empty, matching
/// an HTML select with a preselected option.
fn validate_flag(
    rejection: &mut ValidationRejection,
    field: &'static str,
    value: Option<&str>,
) -> &'static str {
    match value.map(str::trim) {
        None | Some("") => AMENITY_CHOICES[0],
        Some("Yes") => "Yes",
        Some("No") => "No",
        Some(_) => {
            rejection.fields.insert(field, INVALID_CHOICE);
            AMENITY_CHOICES[0]
        }
    }
}

fn flag_value(value: Option<&str>) -> String {
    match value.map(str::trim) {
        None | Some("") => AMENITY_CHOICES[0].to_string(),
        Some(v) => v.to_string(),
    }
}
