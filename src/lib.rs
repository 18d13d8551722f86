pub mod alfred;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

use std::io;

use clap::Parser;
use tracing::{error, info};

use alfred::AlfredCollection;
use auth::CredentialChain;
use client::{ClientError, SearchClient, search_url};
use config::{Cli, Config};
use error::CliError;
use logging::Logger;

/// Parses the command line, sets up the file logger and prints the Alfred
/// items for the query on stdout.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);
    let query = cli.query.as_deref().unwrap_or_default().trim().to_string();

    let logger = Logger::new(&config.log).map_err(|e| CliError::logging(format!("{e:#}")))?;
    logger.scope(|| {
        let result = search_dashboards(&config, &query).and_then(|collection| {
            info!(items = collection.items.len(), "writing alfred items");
            collection
                .write_json(io::stdout().lock())
                .map_err(|e| CliError::output(format!("{e:#}")))
        });
        if let Err(err) = &result {
            error!("ERROR: {err}");
        }
        result
    })
}

/// Queries the search API once and maps the hits to Alfred items.
pub fn search_dashboards(config: &Config, query: &str) -> Result<AlfredCollection, CliError> {
    let host = config.host_url()?;
    let url = search_url(&host, query);
    let credentials = CredentialChain::from_config(config).resolve(&url);

    let client = SearchClient::new().map_err(client_error)?;
    let dashboards = client.search(&url, &credentials).map_err(client_error)?;
    Ok(AlfredCollection::from_dashboards(&dashboards, &host))
}

fn client_error(err: ClientError) -> CliError {
    match &err {
        ClientError::Build(_) => CliError::request(err.to_string()),
        ClientError::Network { source, .. } if source.is_builder() => {
            CliError::request(err.to_string())
        }
        ClientError::Network { .. } | ClientError::Body(_) => CliError::network(err.to_string()),
        ClientError::Status(status) => CliError::http_status(status.as_u16()),
        ClientError::Decode(_) => CliError::decode(err.to_string()),
    }
}
