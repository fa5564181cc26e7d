/// Marketo SOAP API credential: the web-services user id and the shared
/// encryption key used to sign requests.
///
/// The `Debug` implementation redacts `encryption_key` to prevent
/// accidental leakage in logs.
#[derive(Clone)]
pub struct Credential {
    pub user_id: String,
    pub encryption_key: String,
}

impl Credential {
    pub fn new(user_id: impl Into<String>, encryption_key: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            encryption_key: encryption_key.into(),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("user_id", &self.user_id)
            .field("encryption_key", &"****")
            .finish()
    }
}
