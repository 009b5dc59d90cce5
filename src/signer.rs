//! Request signing for the affiliate API.
//!
//! The signed string is the optional API path followed by every parameter as
//! `key` + `value` in ascending key order, with no separators. The signature is the
//! upper-case hex HMAC-SHA256 of that string keyed with the app secret.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Value of the `sign_method` parameter for signatures produced here.
pub const SIGN_METHOD: &str = "sha256";

/// Build the exact string that gets signed.
pub fn sign_string<I, K, V>(params: I, path: Option<&str>) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(K, V)> = params.into_iter().collect();
    pairs.sort_by(|(a, _), (b, _)| a.as_ref().cmp(b.as_ref()));

    let mut out = String::from(path.unwrap_or_default());
    for (key, value) in &pairs {
        out.push_str(key.as_ref());
        out.push_str(value.as_ref());
    }
    out
}

/// Sign a parameter set. Pass `path` for system calls, `None` for business calls.
///
/// Any input is signable: an empty secret yields a well-formed signature the
/// remote side will reject.
pub fn sign<I, K, V>(params: I, secret: &str, path: Option<&str>) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let payload = sign_string(params, path);
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(payload.as_bytes());
    hex::encode_upper(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use super::*;

    #[test]
    fn test_sign_string_layout() {
        let params = [("timestamp", "1700000000000"), ("app_key", "123"), ("method", "m")];
        assert_eq!(
            sign_string(params, None),
            "app_key123methodmtimestamp1700000000000"
        );
        assert_eq!(
            sign_string(params, Some("/auth/token/refresh")),
            "/auth/token/refreshapp_key123methodmtimestamp1700000000000"
        );
    }

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2: HMAC-SHA256(key = "Jefe", "what do ya want for nothing?")
        let params = [("what do ya want ", "for nothing?")];
        assert_eq!(
            sign(params, "Jefe", None),
            "5BDCC146BF60754E6A042426089575C75A003F089D2739839DEC58B964EC3843"
        );
    }

    #[test]
    fn test_order_does_not_matter() {
        let forward: Vec<(&str, &str)> = vec![("a", "1"), ("b", "2"), ("c", "3")];
        let backward: Vec<(&str, &str)> = vec![("c", "3"), ("b", "2"), ("a", "1")];
        let hashed: HashMap<String, String> = forward
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let sorted: BTreeMap<&str, &str> = backward.iter().copied().collect();

        let expected = sign(forward.clone(), "secret", None);
        assert_eq!(sign(backward, "secret", None), expected);
        assert_eq!(sign(&hashed, "secret", None), expected);
        assert_eq!(sign(sorted, "secret", None), expected);
    }

    #[test]
    fn test_output_is_uppercase_hex() {
        let signature = sign([("k", "v")], "secret", None);
        assert_eq!(signature.len(), 64);
        assert!(
            signature
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        );
    }

    #[test]
    fn test_value_change_changes_signature() {
        let a = sign([("keywords", "shirt"), ("page_no", "1")], "secret", None);
        let b = sign([("keywords", "shirt"), ("page_no", "2")], "secret", None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_path_changes_signature() {
        let params = [("app_key", "123"), ("refresh_token", "r")];
        assert_ne!(
            sign(params, "secret", None),
            sign(params, "secret", Some("/auth/token/refresh"))
        );
        // An empty path signs the same string as no path.
        assert_eq!(sign(params, "secret", None), sign(params, "secret", Some("")));
    }

    #[test]
    fn test_empty_secret_still_signs() {
        let signature = sign([("k", "v")], "", None);
        assert_eq!(signature.len(), 64);
    }
}
