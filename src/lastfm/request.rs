/// Signed request handling for the Last.fm API
///
/// Every call shares one execution routine: render the ordered parameter
/// set into a query string, send it as a GET query or POST body, and
/// reject responses carrying the failure marker. The differences between
/// the individual API methods are data (method name and verb), not types.
use crate::lastfm::error::{LastfmError, Result};
use crate::lastfm::LASTFM_API_ROOT;
use log::debug;

/// Request verb for an API method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
}

/// Ordered set of request parameters
///
/// Insertion order is significant: it fixes both the signature base
/// string and the rendered query. Keys are unique, last write wins in
/// place.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    entries: Vec<(String, String)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing the value in place if the key exists
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key.to_string(), value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Compute the API signature for a method call
///
/// The base string is the method name (as the `method` parameter) first,
/// then every parameter key immediately followed by its raw value in
/// insertion order, skipping `api_sig` itself, with the shared secret
/// appended. The signature is the lowercase hex MD5 of that string.
pub fn sign(method: &str, args: &Arguments, secret: &str) -> String {
    let mut base = String::from("method");
    base.push_str(method);

    for (key, value) in args.iter() {
        if key == "api_sig" {
            continue;
        }
        base.push_str(key);
        base.push_str(value);
    }

    base.push_str(secret);

    format!("{:x}", md5::compute(base))
}

/// Render the parameter set as a URL-encoded query string
///
/// Values are percent-escaped; keys never are. The signature value is
/// hex and passes through escaping unchanged.
pub fn render_query(method: &str, args: &Arguments) -> String {
    let mut query = format!("method={}", method);
    for (key, value) in args.iter() {
        query.push('&');
        query.push_str(key);
        query.push('=');
        query.push_str(&urlencoding::encode(value));
    }
    query
}

/// Extract the value of `<name>...</name>` from a response body
pub fn extract_tag<'a>(name: &str, body: &'a str) -> Option<&'a str> {
    let open = format!("<{}>", name);
    let start = body.find(&open)? + open.len();
    let close = format!("</{}>", name);
    let end = body[start..].find(&close)? + start;
    Some(&body[start..end])
}

/// Extract a fixed-size value following `<name>`
///
/// Takes exactly `size` bytes after the opening tag without looking for
/// a closing tag, clamped to the end of the body. Used for the 32-char
/// tokens, which are always plain hex.
pub fn extract_tag_sized<'a>(name: &str, body: &'a str, size: usize) -> Option<&'a str> {
    let open = format!("<{}>", name);
    let start = body.find(&open)? + open.len();
    let end = std::cmp::min(start + size, body.len());
    body.get(start..end)
}

/// Whether the response body carries the service failure marker
pub fn action_failed(body: &str) -> bool {
    body.contains("status=\"failed\"")
}

/// Execute a signed API call and return the response body
///
/// GET appends the rendered query to the API root; POST sends the same
/// string as a form-encoded body. Transport errors surface their message
/// verbatim; a failure marker in the body is reported as an invalid
/// response.
pub fn perform(agent: &ureq::Agent, verb: Verb, method: &str, args: &Arguments) -> Result<String> {
    let params = render_query(method, args);
    debug!("calling {} via {:?}", method, verb);

    let response = match verb {
        Verb::Get => agent.get(&format!("{}?{}", LASTFM_API_ROOT, params)).call(),
        Verb::Post => agent
            .post(LASTFM_API_ROOT)
            .set("Content-Type", "application/x-www-form-urlencoded")
            .send_string(&params),
    };

    let body = match response {
        Ok(resp) => resp
            .into_string()
            .map_err(|e| LastfmError::Transport(e.to_string()))?,
        // Error statuses still carry the failure marker we report on below
        Err(ureq::Error::Status(_, resp)) => resp
            .into_string()
            .map_err(|e| LastfmError::Transport(e.to_string()))?,
        Err(e) => return Err(LastfmError::Transport(e.to_string())),
    };

    if action_failed(&body) {
        return Err(LastfmError::Protocol("Invalid response".to_string()));
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_args() -> Arguments {
        let mut args = Arguments::new();
        args.set("api_key", "0123456789abcdef");
        args.set("token", "fedcba9876543210");
        args
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut args = sample_args();
        args.set("api_key", "other");
        assert_eq!(args.get("api_key"), Some("other"));
        // Order is unchanged by the overwrite
        let keys: Vec<&str> = args.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["api_key", "token"]);
    }

    #[test]
    fn test_signature_is_deterministic() {
        let args = sample_args();
        let first = sign("auth.getSession", &args, "secret");
        let second = sign("auth.getSession", &args, "secret");
        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_signature_changes_with_value() {
        let args = sample_args();
        let original = sign("auth.getSession", &args, "secret");

        let mut changed = sample_args();
        changed.set("token", "0000000000000000");
        assert_ne!(original, sign("auth.getSession", &changed, "secret"));
    }

    #[test]
    fn test_signature_skips_api_sig() {
        let mut args = sample_args();
        let original = sign("auth.getSession", &args, "secret");
        args.set("api_sig", "1234");
        assert_eq!(original, sign("auth.getSession", &args, "secret"));
    }

    #[test]
    fn test_render_query_escapes_values_not_keys() {
        let mut args = Arguments::new();
        args.set("artist", "Simon & Garfunkel");
        args.set("track", "The 59th Street Bridge Song");
        let query = render_query("track.scrobble", &args);
        assert_eq!(
            query,
            "method=track.scrobble&artist=Simon%20%26%20Garfunkel&track=The%2059th%20Street%20Bridge%20Song"
        );
    }

    #[test]
    fn test_render_query_leaves_signature_intact() {
        let mut args = Arguments::new();
        args.set("api_key", "abc123");
        let sig = sign("auth.getToken", &args, "secret");
        args.set("api_sig", sig.clone());
        let query = render_query("auth.getToken", &args);
        assert!(query.ends_with(&format!("api_sig={}", sig)));
    }

    #[test]
    fn test_extract_tag() {
        assert_eq!(extract_tag("key", "<key>abc</key>"), Some("abc"));
        assert_eq!(extract_tag("missing", "<other>x</other>"), None);
        assert_eq!(extract_tag("key", "<key>unterminated"), None);
    }

    #[test]
    fn test_extract_tag_sized() {
        let token = "0123456789abcdef0123456789abcdef";
        let body = format!("<lfm status=\"ok\"><token>{}</token></lfm>", token);
        assert_eq!(extract_tag_sized("token", &body, 32), Some(token));

        // A closing tag is not required
        let unterminated = format!("<token>{}", token);
        assert_eq!(extract_tag_sized("token", &unterminated, 32), Some(token));

        // Truncated bodies are clamped, not panicked on
        assert_eq!(extract_tag_sized("token", "<token>abc", 32), Some("abc"));
    }

    #[test]
    fn test_action_failed() {
        assert!(action_failed("<lfm status=\"failed\"><error code=\"4\"/></lfm>"));
        assert!(!action_failed("<lfm status=\"ok\"></lfm>"));
    }
}
