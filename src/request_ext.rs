use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use hyper::header::{AsHeaderName, AUTHORIZATION};
use hyper::http::request::Parts;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static DIGEST_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<key>[A-Za-z0-9_-]+)\s*=\s*(?:"(?P<quoted>(?:[^"\\]|\\.)*)"|(?P<token>[^,\s]*))"#)
        .unwrap()
});

pub trait HeaderExt {
    fn get_header<K: AsHeaderName>(&self, header: K) -> Option<String>;
    fn authorization(&self) -> Option<(String, String)>;
    fn bearer_token(&self) -> Option<String>;
    fn basic_auth(&self) -> Option<(String, String)>;
    fn digest_params(&self) -> Option<HashMap<String, String>>;
}

fn credentials_for(parts: &Parts, scheme: &str) -> Option<String> {
    let (name, credentials) = parts.authorization()?;
    name.eq_ignore_ascii_case(scheme).then_some(credentials)
}

impl HeaderExt for Parts {
    fn get_header<K>(&self, header: K) -> Option<String>
    where
        K: AsHeaderName,
    {
        self.headers
            .get(header)
            .and_then(|header| header.to_str().ok())
            .map(ToString::to_string)
    }

    /// Splits the `Authorization` header into its scheme name and credentials.
    fn authorization(&self) -> Option<(String, String)> {
        let authorization = self.get_header(AUTHORIZATION)?;
        let (scheme, credentials) = authorization.trim().split_once(' ')?;
        Some((scheme.to_string(), credentials.trim().to_string()))
    }

    fn bearer_token(&self) -> Option<String> {
        credentials_for(self, "Bearer")
    }

    fn basic_auth(&self) -> Option<(String, String)> {
        let value = credentials_for(self, "Basic")?;
        let value = BASE64_STANDARD.decode(value).ok()?;
        let value = String::from_utf8(value).ok()?;

        let (username, password) = value.split_once(':')?;
        Some((username.to_string(), password.to_string()))
    }

    fn digest_params(&self) -> Option<HashMap<String, String>> {
        let value = credentials_for(self, "Digest")?;

        let params = DIGEST_PARAM_RE
            .captures_iter(&value)
            .filter_map(|captures| {
                let key = captures.name("key")?.as_str().to_ascii_lowercase();
                let value = match captures.name("quoted") {
                    Some(quoted) => quoted.as_str().replace("\\\"", "\"").replace("\\\\", "\\"),
                    None => captures.name("token")?.as_str().to_string(),
                };
                Some((key, value))
            })
            .collect::<HashMap<_, _>>();

        (!params.is_empty()).then_some(params)
    }
}
