use serde::{Deserialize, Deserializer, Serialize};

/// Sex column values: 0 female, 1 male, 2 unknown.
pub const SEX_UNKNOWN: u8 = 2;

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationData {
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_sex")]
    pub sex: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhoneUpdate {
    pub user_id: String,
    pub phone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhoneDelete {
    pub phone: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SexFilter {
    #[serde(default, deserialize_with = "lenient_sex")]
    pub sex: Option<u8>,
}

/// Projection returned by `/findSome`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListing {
    pub phone: String,
    pub user_id: String,
}

/// Form posts carry every field as a string, JSON posts may carry numbers.
/// Either way the value must be 0, 1 or 2.
fn lenient_sex<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u8),
        Text(String),
    }

    let sex = match Option::<Raw>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Raw::Number(n)) => n,
        Some(Raw::Text(s)) if s.trim().is_empty() => return Ok(None),
        Some(Raw::Text(s)) => s.trim().parse::<u8>().map_err(serde::de::Error::custom)?,
    };

    if sex > SEX_UNKNOWN {
        return Err(serde::de::Error::custom(format!(
            "sex must be 0, 1 or 2 (got {})",
            sex
        )));
    }
    Ok(Some(sex))
}
