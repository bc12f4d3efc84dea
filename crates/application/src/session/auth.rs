//! Login request construction.

use serde_json::{Map, Value, json};
use smc_domain::{ApiVersion, AuthProvider, Credential, TransportRequest, merge_objects};

/// Builds the `POST {url}/{version}/{login|lms_login}` request.
///
/// API keys travel in the body as `authenticationkey`; login/password pairs
/// travel as query parameters. Extra arguments are merged into the body.
pub(super) fn build_auth_request(
    url: &str,
    api_version: &ApiVersion,
    credential: &Credential,
    domain: &str,
    extra_args: &Map<String, Value>,
) -> TransportRequest {
    let mut body = Map::new();
    body.insert("domain".to_string(), json!(domain));

    let mut request = TransportRequest::post(credential.entry_point(url, api_version.as_str()))
        .with_header("content-type", "application/json");

    let fields = credential.credentials_as_map();
    match credential.provider_name() {
        AuthProvider::Login => {
            if let Some(key) = fields.get("api_key") {
                body.insert("authenticationkey".to_string(), json!(key));
            }
        }
        AuthProvider::LmsLogin => {
            for (name, value) in fields {
                request = request.with_query(name, value);
            }
        }
    }

    merge_objects(&mut body, extra_args, false);
    request.with_json(Value::Object(body))
}
