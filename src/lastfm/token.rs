/// Request token service (`auth.getToken`)
use crate::lastfm::error::{LastfmError, Result};
use crate::lastfm::request::{extract_tag_sized, perform, sign, Arguments, Verb};
use log::debug;

const REQUEST_TOKEN_LEN: usize = 32;

pub struct TokenService {
    agent: ureq::Agent,
    args: Arguments,
    secret: String,
    request_token: String,
}

impl TokenService {
    pub fn new(agent: ureq::Agent, api_key: &str, secret: &str) -> Self {
        let mut args = Arguments::new();
        args.set("api_key", api_key);
        Self {
            agent,
            args,
            secret: secret.to_string(),
            request_token: String::new(),
        }
    }

    pub fn request_token(&self) -> &str {
        &self.request_token
    }

    /// Fetch a request token from the service
    ///
    /// Idempotent after the first success: a held token is returned
    /// without a network call.
    pub fn fetch(&mut self) -> Result<()> {
        if !self.request_token.is_empty() {
            debug!("Request token already held, skipping fetch");
            return Ok(());
        }

        let sig = sign("auth.getToken", &self.args, &self.secret);
        self.args.set("api_sig", sig);

        let body = perform(&self.agent, Verb::Get, "auth.getToken", &self.args)?;

        let token = extract_tag_sized("token", &body, REQUEST_TOKEN_LEN).unwrap_or("");
        if token.is_empty() {
            return Err(LastfmError::Protocol("Invalid response".to_string()));
        }

        self.request_token = token.to_string();
        debug!("Received new request token");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_is_idempotent_once_token_held() {
        let mut service = TokenService::new(ureq::agent(), "key", "secret");
        service.request_token = "0123456789abcdef0123456789abcdef".to_string();

        // Returns without touching the network
        assert!(service.fetch().is_ok());
        assert_eq!(service.request_token(), "0123456789abcdef0123456789abcdef");
    }
}
