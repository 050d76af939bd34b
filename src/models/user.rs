use serde::Deserialize;
use validator::Validate;

use crate::backend::Credentials;

/// Form body of `POST /login` and `POST /signup`.
///
/// Missing fields deserialize as empty strings so that they fail validation and
/// surface as the generic auth error instead of a framework 400.
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsForm {
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
}

/// Form body of `POST /auth`: one form, two submit buttons.
#[derive(Debug, Deserialize)]
pub struct AuthForm {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl AuthForm {
    pub fn into_parts(self) -> (String, CredentialsForm) {
        let credentials = CredentialsForm {
            email: self.email,
            password: self.password,
        };
        (self.action, credentials)
    }
}

impl From<CredentialsForm> for Credentials {
    fn from(form: CredentialsForm) -> Self {
        Credentials {
            email: form.email,
            password: form.password,
        }
    }
}
