use validator::validate_email;

/// An email address that passed syntactic validation. Uniqueness is compared on the exact
/// string, so no normalization (trimming, lowercasing) is applied.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(email: String) -> Result<SubscriberEmail, String> {
        // The domain must contain a dot: `frank@localhost` is not accepted
        let has_dotted_domain = email
            .rsplit_once('@')
            .map_or(false, |(_, domain)| domain.contains('.'));
        let is_valid_email = validate_email(&email) && has_dotted_domain;

        if !is_valid_email {
            return Err(format!("{} email is not valid", email));
        }

        Ok(Self(email))
    }

    /// Wraps an email read back from the subscribers table, which only holds parsed emails.
    pub(crate) fn from_stored(email: String) -> SubscriberEmail {
        Self(email)
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
