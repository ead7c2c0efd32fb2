//! Clinic data schema
//!
//! These types are both the shape the model is asked to fill in (through the
//! JSON Schema derived by `schemars`) and the typed result handed back to API
//! callers. Every field is optional and absent fields are left out of the JSON,
//! so a clinic about which nothing was found serializes as `{}`.

use schemars::r#gen::SchemaSettings;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single value or a list of values, as found on the site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum TextOrList {
    One(String),
    Many(Vec<String>),
}

impl TextOrList {
    /// All values, in order
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::One(value) => vec![value.as_str()],
            Self::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

/// Hours of one service on one day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ServiceHours {
    /// Name of the service, e.g. "Regular OPD", "Emergency", "Surgery"
    pub service_name: String,

    /// Whether the hours were read into `open_time` / `close_time`
    #[serde(default)]
    pub parsed: bool,

    /// Hours as written on the site, used when they could not be parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_string: Option<String>,

    /// Opening time, 24 hour `HH:MM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_time: Option<String>,

    /// Closing time, 24 hour `HH:MM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_time: Option<String>,

    /// Whether the service never closes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_24_7: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Per-service hours for a day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ServiceSchedule {
    pub services: Vec<ServiceHours>,
}

/// Hours of a single day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DayHours {
    /// Uniform hours as free text, e.g. "9am-5pm" or "Closed"
    Text(String),

    /// Different hours per service
    Structured(ServiceSchedule),
}

/// Opening hours for each day of the week
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BusinessHours {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thursday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunday: Option<DayHours>,
}

impl BusinessHours {
    /// Days with known hours, Monday first
    pub fn known_days(&self) -> Vec<(&'static str, &DayHours)> {
        [
            ("monday", &self.monday),
            ("tuesday", &self.tuesday),
            ("wednesday", &self.wednesday),
            ("thursday", &self.thursday),
            ("friday", &self.friday),
            ("saturday", &self.saturday),
            ("sunday", &self.sunday),
        ]
        .into_iter()
        .filter_map(|(day, hours)| hours.as_ref().map(|hours| (day, hours)))
        .collect()
    }
}

/// Opening hours, per weekday or as one text for the whole week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum OpeningHours {
    /// Hours written as a single text, e.g. "Mon-Fri 8am-6pm, Sat 9am-1pm"
    Text(String),

    Weekly(BusinessHours),
}

impl OpeningHours {
    /// The per-day hours, when they were given that way
    pub fn weekly(&self) -> Option<&BusinessHours> {
        match self {
            Self::Text(_) => None,
            Self::Weekly(hours) => Some(hours),
        }
    }
}

/// A member of the clinic staff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StaffMember {
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// A question answered on the site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

/// Structured information about a veterinary clinic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClinicData {
    /// Business name of the clinic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<TextOrList>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<TextOrList>,

    /// Street address including city, state and postal code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<TextOrList>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_hours: Option<OpeningHours>,

    /// Services offered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff: Option<Vec<StaffMember>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faqs: Option<Vec<Faq>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policies: Option<TextOrList>,

    /// Anything else worth knowing: parking, accessibility, languages spoken
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl ClinicData {
    /// Whether nothing at all was extracted
    pub fn is_empty(&self) -> bool {
        self.present_fields().is_empty()
    }

    /// Names of the fields that carry a value
    pub fn present_fields(&self) -> Vec<&'static str> {
        [
            ("name", self.name.is_some()),
            ("phone", self.phone.is_some()),
            ("email", self.email.is_some()),
            ("address", self.address.is_some()),
            ("business_hours", self.business_hours.is_some()),
            ("services", self.services.is_some()),
            ("staff", self.staff.is_some()),
            ("faqs", self.faqs.is_some()),
            ("policies", self.policies.is_some()),
            ("additional_info", self.additional_info.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, present)| present.then_some(field))
        .collect()
    }
}

/// JSON Schema of `ClinicData`, in the form sent as `responseJsonSchema`
///
/// Subschemas are inlined and the `$schema` keyword is left out so the result
/// is self-contained.
pub fn response_schema() -> serde_json::Value {
    let settings = SchemaSettings::draft07().with(|s| {
        s.inline_subschemas = true;
        s.meta_schema = None;
    });
    let schema = settings.into_generator().into_root_schema_for::<ClinicData>();
    serde_json::to_value(schema).unwrap_or_default()
}
