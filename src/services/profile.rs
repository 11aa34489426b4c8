//! User profile (mypage) data.

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Profile {
    pub uid: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub neighborhood: String,
}

impl Profile {
    /// Blank profile shown on a user's first visit to mypage, before they
    /// have saved anything.
    #[must_use]
    pub fn empty(uid: &str, display_name: Option<&str>) -> Self {
        Self {
            uid: uid.to_owned(),
            display_name: display_name.unwrap_or_default().to_owned(),
            bio: String::new(),
            neighborhood: String::new(),
        }
    }
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
