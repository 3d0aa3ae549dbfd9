//! Full person record returned by the `/person` endpoint.

use serde::{Deserialize, Serialize};

/// One row of the free-form attribute list a person can carry (phone
/// numbers, chat handles, escalation links and the like).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraInfo {
    pub information: String,
    /// Icon identifier; the backend defaults missing ones to "FaMinus".
    pub icon: String,
    pub icon_color: String,
    pub url: Option<String>,
}

/// Full person detail as served by `/person`.
///
/// Unlike [`super::PersonSummary`] the uid arrives as a string here; the
/// backend stringifies it on this endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDetail {
    pub uid: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub img_filename: Option<String>,
    pub img_width: Option<i64>,
    pub img_height: Option<i64>,
    pub extra_attributes: Vec<ExtraInfo>,
    pub last_update: String,
    pub error_msg: String,
    /// False when the backend's person synchronization is failing; the
    /// record may be outdated but is still served.
    pub sync: bool,
}

impl PersonDetail {
    /// Preferred label for display: username, else email, else the
    /// "unknown" placeholder.
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_decodes_camel_case_payload() {
        let detail: PersonDetail = serde_json::from_value(serde_json::json!({
            "uid": "42",
            "username": "al",
            "email": "al@example.com",
            "imgFilename": "7f9c",
            "imgWidth": 200,
            "imgHeight": 200,
            "extraAttributes": [{
                "information": "+31 6 1234 5678",
                "icon": "FaPhone",
                "iconColor": "black",
                "url": null,
            }],
            "lastUpdate": "2024-05-01 10:00:00 CEST",
            "errorMsg": "",
            "sync": true,
        }))
        .unwrap();
        assert_eq!(detail.display_name(), "al");
        assert_eq!(detail.extra_attributes[0].icon, "FaPhone");
    }

    #[test]
    fn display_name_falls_back_to_placeholder() {
        let detail = PersonDetail {
            uid: "17".to_string(),
            username: None,
            email: None,
            img_filename: None,
            img_width: None,
            img_height: None,
            extra_attributes: Vec::new(),
            last_update: String::new(),
            error_msg: String::new(),
            sync: true,
        };
        assert_eq!(detail.display_name(), "unknown");
    }
}
