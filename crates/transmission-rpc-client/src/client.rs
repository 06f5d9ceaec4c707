use thiserror::Error;

use crate::types::*;

pub struct Client {
    rpc_url: url::Url,
    client: reqwest::Client,
    credentials: Option<Credentials>,
    state: ClientState,
    tag: i32,
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("the response type does not match the request")]
    ResponseTypeMismatch,
    #[error("the response tag does not match the request tag")]
    TagMismatch,
    #[error("could not acquire session id")]
    NoSessionId,
    #[error("the daemon rejected the request: {0}")]
    Failure(String),
    #[error(transparent)]
    UnicodeError(#[from] reqwest::header::ToStrError),
    #[error(transparent)]
    HttpError(#[from] reqwest::Error),
}

const SESSION_ID_HEADER: &str = "X-Transmission-Session-Id";

struct Credentials {
    username: String,
    password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum ClientState {
    #[default]
    NoSession,
    HasSession(String),
}

impl ClientState {
    fn get_session_id(&self) -> Result<&str> {
        match self {
            Self::HasSession(id) => Ok(id.as_str()),
            _ => Err(Error::NoSessionId),
        }
    }
}

macro_rules! rpc_call {
    ($self:ident, $call:expr, $resp:path) => {
        Ok(match $self.rpc_call($call).await?.arguments {
            Some($resp(value)) => value,
            _ => {
                return Err(Error::ResponseTypeMismatch);
            }
        })
    };
}

impl Client {
    pub fn new(rpc_url: impl reqwest::IntoUrl) -> Result<Self> {
        Self::with_client(rpc_url, reqwest::Client::new())
    }

    pub fn with_client(rpc_url: impl reqwest::IntoUrl, client: reqwest::Client) -> Result<Self> {
        Ok(Self {
            rpc_url: rpc_url.into_url()?,
            client,
            credentials: None,
            state: Default::default(),
            tag: 57680,
        })
    }

    /// Authenticate every request with HTTP basic auth
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: Option<String>,
    ) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password,
        });
        self
    }

    pub fn rpc_url(&self) -> &url::Url {
        &self.rpc_url
    }

    fn post(&self) -> reqwest::RequestBuilder {
        let builder = self.client.post(self.rpc_url.clone());

        match &self.credentials {
            Some(Credentials { username, password }) => {
                builder.basic_auth(username, password.as_ref())
            }
            None => builder,
        }
    }

    async fn rpc_call(&mut self, call: MethodCall) -> Result<Response> {
        // Check that we have a session id
        match self.state {
            ClientState::NoSession => {
                let response = self.post().send().await?;
                if let Some(session_id_value) = response.headers().get(SESSION_ID_HEADER) {
                    self.state = ClientState::HasSession(session_id_value.to_str()?.to_owned());
                } else {
                    // No session header usually means the credentials were refused
                    response.error_for_status()?;
                }
            }
            ClientState::HasSession(_) => {}
        }

        // Get session id
        let session_id = self.state.get_session_id()?.to_owned();

        // Build request
        let request = Request {
            call,
            tag: Some(self.tag),
        };

        // Increment tag for next requests
        self.tag += 1;

        let response: Response = self
            .post()
            .header(SESSION_ID_HEADER, session_id)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.tag != request.tag {
            return Err(Error::TagMismatch);
        }

        if let ResponseStatus::Failure(reason) = &response.result {
            return Err(Error::Failure(reason.clone()));
        }

        Ok(response)
    }

    pub async fn torrent_get(&mut self, arguments: TorrentGet) -> Result<Torrents> {
        rpc_call!(
            self,
            MethodCall::TorrentGet { arguments },
            ResponseKind::Torrents
        )
    }
}
