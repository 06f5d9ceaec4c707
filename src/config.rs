use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use transmission_rpc_client::client::Client;
use url::Url;

use crate::{
    error::{Error, Result},
    report::FinishedPolicy,
};

pub const DEFAULT_OUTPUT: &str = "/output/test_script_output.txt";

/// Where the Transmission daemon lives and how to log into it
#[derive(Debug)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

impl ConnectionConfig {
    pub fn rpc_url(&self) -> Result<Url> {
        let url = format!("http://{}:{}/transmission/rpc", self.host, self.port);

        Url::parse(&url).map_err(|source| Error::InvalidUrl {
            url: url.clone(),
            source,
        })
    }

    pub fn client(&self) -> Result<Client> {
        let client = Client::new(self.rpc_url()?)?;

        if self.username.is_none() && self.password.is_none() {
            return Ok(client);
        }

        Ok(client.with_credentials(
            self.username.clone().unwrap_or_default(),
            self.password
                .as_ref()
                .map(|password| password.expose_secret().to_owned()),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Destination file, overwritten on every run
    pub output: PathBuf,
    pub policy: FinishedPolicy,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            policy: FinishedPolicy::default(),
        }
    }
}
