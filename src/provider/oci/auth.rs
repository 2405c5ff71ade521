//! OCI request signing
//!
//! Loads signing material from an OCI CLI config file profile and signs
//! requests with the OCI HTTP signature scheme (`rsa-sha256`).
//!
//! Two key id forms are supported:
//! - session token: `ST$<token>` when the profile names a `security_token_file`
//! - API key: `<tenancy>/<user>/<fingerprint>`
//!
//! References:
//! - [Request signatures](https://docs.oracle.com/en-us/iaas/Content/API/Concepts/signingrequests.htm)
//! - [SDK and CLI configuration file](https://docs.oracle.com/en-us/iaas/Content/API/Concepts/sdkconfig.htm)

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use reqwest::header::{
    HeaderName, HeaderValue, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, DATE, HOST,
};
use reqwest::{Method, Request};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::constants::DEFAULT_OCI_PROFILE;
use crate::error::VaultError;

const CONTENT_SHA256: HeaderName = HeaderName::from_static("x-content-sha256");
const JSON_CONTENT_TYPE: &str = "application/json";

/// Where signing material is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSource {
    pub config_file: PathBuf,
    pub profile: String,
}

/// Resolved profile from the OCI config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OciProfile {
    pub region: String,
    pub key_file: PathBuf,
    pub auth: ProfileAuth,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileAuth {
    SessionToken { token_file: PathBuf },
    ApiKey {
        tenancy: String,
        user: String,
        fingerprint: String,
    },
}

impl OciProfile {
    /// Read `source.config_file` and resolve `source.profile`
    pub fn load(source: &CredentialSource) -> Result<Self, VaultError> {
        let path = expand_home(&source.config_file.to_string_lossy());
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            VaultError::credential(format!(
                "failed to read OCI config file {}: {e}",
                path.display()
            ))
        })?;
        Self::parse(&contents, &source.profile)
    }

    /// Resolve `profile` from config file contents. Keys in `DEFAULT` are
    /// inherited by every other profile.
    pub fn parse(contents: &str, profile: &str) -> Result<Self, VaultError> {
        let sections = parse_ini(contents);
        let mut values = sections.get(DEFAULT_OCI_PROFILE).cloned().unwrap_or_default();
        match sections.get(profile) {
            Some(own) => values.extend(own.clone()),
            None => {
                return Err(VaultError::credential(format!(
                    "profile '{profile}' not found in OCI config file"
                )));
            }
        }

        let required = |key: &str| {
            values
                .get(key)
                .filter(|v| !v.is_empty())
                .cloned()
                .ok_or_else(|| {
                    VaultError::credential(format!("profile '{profile}' is missing '{key}'"))
                })
        };

        let region = required("region")?;
        let key_file = expand_home(&required("key_file")?);
        let auth = match values.get("security_token_file").filter(|v| !v.is_empty()) {
            Some(token_file) => ProfileAuth::SessionToken {
                token_file: expand_home(token_file),
            },
            None => ProfileAuth::ApiKey {
                tenancy: required("tenancy")?,
                user: required("user")?,
                fingerprint: required("fingerprint")?,
            },
        };

        Ok(Self {
            region,
            key_file,
            auth,
        })
    }
}

/// Minimal INI reader for the OCI config format: `[section]` headers,
/// `key=value` lines, `#`/`;` comments.
fn parse_ini(contents: &str) -> BTreeMap<String, BTreeMap<String, String>> {
    let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim().to_string();
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }
        if let (Some(section), Some((key, value))) = (current.as_ref(), line.split_once('=')) {
            sections
                .entry(section.clone())
                .or_default()
                .insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    sections
}

/// Expand a leading `~` against `$HOME`
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix('~'), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => {
            let mut expanded = PathBuf::from(home);
            let rest = rest.trim_start_matches('/');
            if !rest.is_empty() {
                expanded.push(rest);
            }
            expanded
        }
        _ => PathBuf::from(path),
    }
}

/// Load an unencrypted RSA private key in PKCS#8 or PKCS#1 PEM form
pub fn load_private_key(path: &Path) -> Result<RsaPrivateKey, VaultError> {
    let pem = std::fs::read_to_string(path).map_err(|e| {
        VaultError::credential(format!("failed to read key file {}: {e}", path.display()))
    })?;

    RsaPrivateKey::from_pkcs8_pem(&pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(&pem))
        .map_err(|e| {
            VaultError::credential(format!(
                "failed to parse RSA private key {}: {e}",
                path.display()
            ))
        })
}

/// Load a session token and reject it when its `exp` claim has passed
pub fn load_session_token(path: &Path) -> Result<String, VaultError> {
    let token = std::fs::read_to_string(path).map_err(|e| {
        VaultError::credential(format!(
            "failed to read session token file {}: {e}",
            path.display()
        ))
    })?;
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(VaultError::credential(format!(
            "session token file {} is empty",
            path.display()
        )));
    }

    if let Some(expiry) = jwt_expiry(&token) {
        if expiry <= Utc::now().timestamp() {
            return Err(VaultError::credential(format!(
                "session token in {} has expired; refresh it with `oci session refresh`",
                path.display()
            )));
        }
    }

    Ok(token)
}

/// `exp` claim of a JWT, if the token is one and carries it
fn jwt_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let decoded = general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&decoded).ok()?;
    claims.get("exp")?.as_i64()
}

/// Signs requests with one key id and private key
#[derive(Clone)]
pub struct RequestSigner {
    key_id: String,
    signing_key: SigningKey<Sha256>,
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key_id = if self.key_id.starts_with("ST$") {
            "ST$<session token>"
        } else {
            self.key_id.as_str()
        };
        f.debug_struct("RequestSigner")
            .field("key_id", &key_id)
            .finish_non_exhaustive()
    }
}

impl RequestSigner {
    pub fn new(key_id: String, private_key: RsaPrivateKey) -> Self {
        Self {
            key_id,
            signing_key: SigningKey::<Sha256>::new(private_key),
        }
    }

    /// Build a signer from a resolved profile, reading key and token files
    pub fn from_profile(profile: &OciProfile) -> Result<Self, VaultError> {
        let private_key = load_private_key(&profile.key_file)?;
        let key_id = match &profile.auth {
            ProfileAuth::SessionToken { token_file } => {
                format!("ST${}", load_session_token(token_file)?)
            }
            ProfileAuth::ApiKey {
                tenancy,
                user,
                fingerprint,
            } => format!("{tenancy}/{user}/{fingerprint}"),
        };
        debug!(region = %profile.region, "Loaded OCI signing credentials");
        Ok(Self::new(key_id, private_key))
    }

    /// Add `date`, `host`, body digest headers and `authorization` to `request`
    ///
    /// Requests with a body (POST, PUT, PATCH) additionally sign
    /// `content-length`, `content-type` and `x-content-sha256`.
    pub fn sign(&self, request: &mut Request) -> Result<(), VaultError> {
        let url = request.url().clone();
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(VaultError::validation(format!("request URL {url} has no host")));
            }
        };
        let target = match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_string(),
        };
        let method = request.method().clone();
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();

        let mut signed = vec![
            ("date", date.clone()),
            (
                "(request-target)",
                format!("{} {target}", method.as_str().to_lowercase()),
            ),
            ("host", host.clone()),
        ];

        let headers = request.headers_mut();
        headers.insert(DATE, header_value(&date)?);
        headers.insert(HOST, header_value(&host)?);

        if has_body(&method) {
            let body = request
                .body()
                .and_then(reqwest::Body::as_bytes)
                .unwrap_or_default()
                .to_vec();
            let digest = general_purpose::STANDARD.encode(Sha256::digest(&body));
            let length = body.len().to_string();
            let content_type = request
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or(JSON_CONTENT_TYPE)
                .to_string();

            let headers = request.headers_mut();
            headers.insert(CONTENT_LENGTH, header_value(&length)?);
            headers.insert(CONTENT_TYPE, header_value(&content_type)?);
            headers.insert(CONTENT_SHA256, header_value(&digest)?);

            signed.push(("content-length", length));
            signed.push(("content-type", content_type));
            signed.push(("x-content-sha256", digest));
        }

        let signing_string = signed
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("\n");
        let signature = self.signing_key.sign(signing_string.as_bytes());
        let header_names = signed
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(" ");

        let authorization = format!(
            "Signature version=\"1\",keyId=\"{}\",algorithm=\"rsa-sha256\",headers=\"{header_names}\",signature=\"{}\"",
            self.key_id,
            general_purpose::STANDARD.encode(signature.to_bytes())
        );
        request
            .headers_mut()
            .insert(AUTHORIZATION, header_value(&authorization)?);

        Ok(())
    }
}

fn has_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

fn header_value(value: &str) -> Result<HeaderValue, VaultError> {
    HeaderValue::from_str(value)
        .map_err(|e| VaultError::validation(format!("invalid header value: {e}")))
}
