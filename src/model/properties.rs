//! Package properties from `docProps/*.xml`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A W3CDTF timestamp as found in core properties (`2016-08-12T03:16:56Z`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DateTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl DateTime {
    /// Parse `YYYY-MM-DD`, optionally followed by `Thh:mm[:ss[.fff]]` and a
    /// `Z` or `+hh:mm` zone. Zone offsets are dropped.
    pub fn parse_w3cdtf(text: &str) -> Result<Self> {
        let invalid = || Error::invalid_value("W3CDTF date", text);
        let text = text.trim();

        let (date, time) = match text.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (text, None),
        };

        let mut parts = date.splitn(3, '-');
        let year = parts.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
        let month = parts.next().map_or(Ok(1), |s| s.parse()).map_err(|_| invalid())?;
        let day = parts.next().map_or(Ok(1), |s| s.parse()).map_err(|_| invalid())?;

        let mut result = DateTime {
            year,
            month,
            day,
            ..Default::default()
        };

        if let Some(time) = time {
            let time = time
                .split(['Z', '+'])
                .next()
                .unwrap_or(time);
            // a trailing "-hh:mm" zone
            let time = match time.rfind('-') {
                Some(pos) => &time[..pos],
                None => time,
            };
            let mut fields = time.split(':');
            result.hour = fields.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
            result.minute = fields.next().map_or(Ok(0), |s| s.parse()).map_err(|_| invalid())?;
            result.second = match fields.next() {
                Some(s) => s
                    .split('.')
                    .next()
                    .unwrap_or(s)
                    .parse()
                    .map_err(|_| invalid())?,
                None => 0,
            };
        }

        if !(1..=12).contains(&result.month)
            || !(1..=31).contains(&result.day)
            || result.hour > 23
            || result.minute > 59
            || result.second > 60
        {
            return Err(invalid());
        }

        Ok(result)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// A user-defined property from `docProps/custom.xml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomProperty {
    pub name: String,
    pub value: String,
}

/// Core and extended document properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub keywords: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_security: Option<i32>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub scale_crop: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub shared_doc: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hyperlinks_changed: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub links_up_to_date: bool,

    /// Titles of parts (sheet names) as recorded by the writing application.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub titles_of_parts: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub custom: Vec<CustomProperty>,
}

impl DocumentProperties {
    /// Value of a custom property.
    pub fn custom_property(&self, name: &str) -> Option<&str> {
        self.custom
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}
