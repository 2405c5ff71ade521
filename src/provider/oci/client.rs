//! Signed HTTP core shared by the vaults and secrets clients
//!
//! Every request gets a fresh `opc-request-id`, the server `user-agent`, and
//! an OCI HTTP signature. Non-2xx responses are decoded into
//! `VaultError::RemoteService` with the service's `code`, `message` and
//! request id carried through verbatim.

use reqwest::header::{HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info_span, warn, Instrument};

use super::auth::RequestSigner;
use super::responses::OciErrorBody;
use crate::constants::{NEXT_PAGE_HEADER, REQUEST_ID_HEADER, SERVER_NAME};
use crate::error::VaultError;
use crate::observability::metrics;

/// One OCI endpoint (base URL plus API version) and the signer used for it
pub(crate) struct OciHttpClient {
    http: Client,
    signer: RequestSigner,
    base_url: String,
    api_version: &'static str,
    /// Metrics label (`vaults` or `secrets`)
    endpoint: &'static str,
}

impl std::fmt::Debug for OciHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OciHttpClient")
            .field("endpoint", &self.endpoint)
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

/// Decoded success response
pub(crate) struct OciResponse<T> {
    pub body: T,
    pub next_page: Option<String>,
}

impl OciHttpClient {
    pub(crate) fn new(
        http: Client,
        signer: RequestSigner,
        base_url: &str,
        api_version: &'static str,
        endpoint: &'static str,
    ) -> Self {
        Self {
            http,
            signer,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_version,
            endpoint,
        }
    }

    /// Send a signed request and return the raw successful response
    ///
    /// `path` holds unencoded segments below the API version; each one is
    /// percent-encoded on its own, so ids can never add segments or a query.
    pub(crate) async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &[&str],
        query: &[(&str, String)],
        body: Option<&B>,
        operation: &'static str,
    ) -> Result<Response, VaultError> {
        let url = endpoint_url(&self.base_url, self.api_version, path)?;
        let request_id = uuid::Uuid::new_v4().to_string();

        let span = info_span!(
            "oci.request",
            endpoint = self.endpoint,
            operation = operation,
            method = %method,
            opc_request_id = %request_id
        );

        let result: Result<Response, VaultError> = async move {
            let mut builder = self
                .http
                .request(method.clone(), url)
                .header(
                    USER_AGENT,
                    format!("{SERVER_NAME}/{}", env!("CARGO_PKG_VERSION")),
                )
                .header(REQUEST_ID_HEADER, &request_id);
            if !query.is_empty() {
                builder = builder.query(query);
            }
            if let Some(body) = body {
                let payload = serde_json::to_vec(body).map_err(|e| {
                    VaultError::validation(format!("failed to encode {operation} request: {e}"))
                })?;
                builder = builder
                    .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                    .body(payload);
            }

            let mut request = builder.build()?;
            self.signer.sign(&mut request)?;

            debug!(url = %request.url(), "Sending OCI request");
            metrics::increment_remote_requests(self.endpoint, method.as_str());

            let response = self.http.execute(request).await?;
            if response.status().is_success() {
                Ok(response)
            } else {
                Err(decode_error(response).await)
            }
        }
        .instrument(span)
        .await;
        result
    }

    /// Signed `GET` decoded into `T`
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &[&str],
        query: &[(&str, String)],
        operation: &'static str,
    ) -> Result<OciResponse<T>, VaultError> {
        self.send_json::<T, ()>(Method::GET, path, query, None, operation)
            .await
    }

    /// Send a signed request and decode its JSON body into `T`
    pub(crate) async fn send_json<T, B>(
        &self,
        method: Method,
        path: &[&str],
        query: &[(&str, String)],
        body: Option<&B>,
        operation: &'static str,
    ) -> Result<OciResponse<T>, VaultError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, query, body, operation).await?;
        let next_page = response
            .headers()
            .get(NEXT_PAGE_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        let bytes = response.bytes().await?;
        let body = serde_json::from_slice(&bytes).map_err(|e| VaultError::MalformedResponse {
            operation,
            message: e.to_string(),
        })?;
        Ok(OciResponse { body, next_page })
    }
}

/// `{base_url}/{api_version}/{segments...}` with every segment percent-encoded
pub(crate) fn endpoint_url(
    base_url: &str,
    api_version: &str,
    segments: &[&str],
) -> Result<Url, VaultError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| VaultError::validation(format!("invalid endpoint URL {base_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| VaultError::validation(format!("endpoint URL {base_url} cannot hold a path")))?
        .pop_if_empty()
        .push(api_version)
        .extend(segments);
    Ok(url)
}

/// Turn a non-2xx response into `RemoteService`
async fn decode_error(response: Response) -> VaultError {
    let status = response.status();
    let opc_request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let text = response.text().await.unwrap_or_default();

    let (code, message) = match serde_json::from_str::<OciErrorBody>(&text) {
        Ok(body) => (body.code, body.message),
        Err(_) => (
            status
                .canonical_reason()
                .unwrap_or("Unknown")
                .replace(' ', ""),
            text,
        ),
    };

    warn!(
        status = status.as_u16(),
        code = %code,
        opc_request_id = opc_request_id.as_deref().unwrap_or("-"),
        "OCI request failed"
    );

    VaultError::RemoteService {
        status: status.as_u16(),
        code,
        message,
        opc_request_id,
    }
}
