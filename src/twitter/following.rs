//! Twitter API integration for following accounts.

use log::info;
use reqwest::Method;

use crate::error::{Error, Result};

use super::api::{Payload, TwitterClient};

/// "Cannot find specified user."
const CODE_USER_NOT_FOUND: i64 = 108;
/// "User not found."
const CODE_NO_SUCH_USER: i64 = 50;

/// Whether a failed API call means the target account does not exist.
pub(crate) fn is_not_found(error: &Error) -> bool {
    match error {
        Error::Api { status, codes, .. } => {
            *status == 404
                || codes
                    .iter()
                    .any(|code| *code == CODE_USER_NOT_FOUND || *code == CODE_NO_SUCH_USER)
        }
        _ => false,
    }
}

impl TwitterClient {
    /// Follows the account `screen_name`.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: If the friendship was created (or already existed)
    /// - `Err(Error::NotFound)`: If the account does not exist
    /// - `Err(Error)`: For any other failure
    pub(crate) async fn follow(&self, screen_name: &str) -> Result<()> {
        info!("Following @{}", screen_name);

        let url = format!("{}/friendships/create.json", self.api_base);
        let params = vec![("screen_name".to_string(), screen_name.to_string())];

        match self
            .make_signed_request(Method::POST, &url, Payload::Form(params), "create_friendship")
            .await
        {
            Ok(_) => {
                info!("Now following @{}", screen_name);
                Ok(())
            }
            Err(e) if is_not_found(&e) => Err(Error::NotFound {
                screen_name: screen_name.to_string(),
            }),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16, codes: Vec<i64>) -> Error {
        Error::Api {
            operation: "create_friendship".into(),
            status,
            codes,
            message: String::new(),
        }
    }

    #[test]
    fn test_is_not_found() {
        assert!(is_not_found(&api_error(404, vec![])));
        assert!(is_not_found(&api_error(403, vec![108])));
        assert!(is_not_found(&api_error(400, vec![50])));
        assert!(!is_not_found(&api_error(429, vec![88])));
        assert!(!is_not_found(&api_error(500, vec![])));
        assert!(!is_not_found(&Error::Config("x".into())));
    }
}
