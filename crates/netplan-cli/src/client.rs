use anyhow::Result;
use http_body_util::{BodyExt, Full};
use hyper::{body::Bytes, Request, Response};
use hyper_util::client::legacy::Client;
use hyperlocal::{UnixClientExt, UnixConnector, Uri};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SOCKET: &str = "/var/run/netplan.sock";

pub enum ApiClient {
    Unix {
        client: Client<UnixConnector, Full<Bytes>>,
        socket_path: String,
    },
    Http {
        client: Client<hyper_util::client::legacy::connect::HttpConnector, Full<Bytes>>,
        base_url: String,
    },
}

impl ApiClient {
    /// HTTP client for `http(s)://` URLs, Unix socket client for anything else
    pub fn from_target(target: &str) -> Self {
        if target.starts_with("http://") || target.starts_with("https://") {
            Self::new_http(target)
        } else {
            Self::new_unix(target)
        }
    }

    pub fn new_unix(socket_path: &str) -> Self {
        let client = Client::unix();
        Self::Unix {
            client,
            socket_path: socket_path.to_string(),
        }
    }

    pub fn new_http(base_url: &str) -> Self {
        let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build_http();
        Self::Http {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build_uri(&self, path: &str) -> Result<hyper::Uri> {
        match self {
            Self::Unix { socket_path, .. } => Ok(Uri::new(socket_path, path).into()),
            Self::Http { base_url, .. } => Ok(format!("{}{}", base_url, path).parse()?),
        }
    }

    async fn send(&self, req: Request<Full<Bytes>>) -> Result<Response<hyper::body::Incoming>> {
        let response = match self {
            Self::Unix { client, .. } => client.request(req).await?,
            Self::Http { client, .. } => client.request(req).await?,
        };
        Ok(response)
    }

    async fn read_json<R: for<'de> Deserialize<'de>>(
        response: Response<hyper::body::Incoming>,
    ) -> Result<R> {
        let status = response.status();
        let body = response.into_body().collect().await?.to_bytes();

        if !status.is_success() {
            let message = serde_json::from_slice::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v["error"].as_str().map(str::to_string))
                .unwrap_or_else(|| String::from_utf8_lossy(&body).to_string());
            anyhow::bail!("Request failed with status {}: {}", status, message);
        }

        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T> {
        let req = Request::builder()
            .method("GET")
            .uri(self.build_uri(path)?)
            .body(Full::default())?;

        let response = self.send(req).await?;
        Self::read_json(response).await
    }

    pub async fn post<T: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R> {
        let body_bytes = serde_json::to_vec(body)?;

        let req = Request::builder()
            .method("POST")
            .uri(self.build_uri(path)?)
            .header("content-type", "application/json")
            .body(Full::new(Bytes::from(body_bytes)))?;

        let response = self.send(req).await?;
        Self::read_json(response).await
    }
}
