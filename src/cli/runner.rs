//! CLI command execution

use super::commands::{Cli, Commands};
use crate::client::ApiClient;
use crate::config::{ClientConfig, Credentials, API_KEY_ENV, API_SECRET_ENV};
use crate::console::{ConsoleIo, StdConsole};
use crate::error::{Error, Result};
use crate::lineage;
use crate::models::Group;
use futures::StreamExt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Executes a parsed CLI invocation
pub struct Runner {
    cli: Cli,
    console: StdConsole,
}

impl Runner {
    /// Create a runner for the given invocation
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            console: StdConsole,
        }
    }

    /// Run the selected command
    pub async fn run(self) -> Result<()> {
        let cancel = CancellationToken::new();

        // Ctrl-C cancels every in-flight suspension point.
        let ctrl_c_cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                ctrl_c_cancel.cancel();
            }
        });

        match &self.cli.command {
            Commands::Groups => {
                let client = self.client(self.credentials()?)?;
                self.print_groups(&client, &cancel).await?;
            }
            Commands::Connectors { group } => {
                let client = self.client(self.credentials()?)?;
                let mut connectors = std::pin::pin!(client.connectors(group, &cancel));
                let mut found = false;
                while let Some(connector) = connectors.next().await {
                    let connector = connector?;
                    found = true;
                    self.console.write_line(&format!(
                        "{} (service: {}, schema: {})",
                        connector.id,
                        connector.service.as_deref().unwrap_or("-"),
                        connector.schema.as_deref().unwrap_or("-"),
                    ));
                }
                if !found {
                    return Err(Error::NoConnectors {
                        group_id: group.clone(),
                    });
                }
            }
            Commands::Mappings { group } => {
                let client = self.client(self.credentials()?)?;
                self.print_mappings(&client, group, &cancel).await?;
            }
            Commands::Import => {
                let credentials = match self.credentials() {
                    Ok(credentials) => credentials,
                    Err(_) => prompt_credentials(&self.console)?,
                };
                let client = self.client(credentials)?;

                self.console.write_line("Fetching groups, please wait...");
                let groups: Vec<Group> = client
                    .groups(&cancel)
                    .collect::<Vec<_>>()
                    .await
                    .into_iter()
                    .collect::<Result<_>>()?;
                let group_id = select_group(&self.console, &groups)?;

                self.print_mappings(&client, &group_id, &cancel).await?;
                self.console.write_line("Import completed successfully.");
            }
        }

        Ok(())
    }

    /// Resolve credentials from flags, then the environment
    fn credentials(&self) -> Result<Credentials> {
        match (&self.cli.api_key, &self.cli.api_secret) {
            (Some(key), Some(secret)) => Ok(Credentials::new(key, secret)),
            (Some(_), None) => Err(Error::MissingCredential {
                name: "API secret".to_string(),
                env: API_SECRET_ENV.to_string(),
            }),
            (None, Some(_)) => Err(Error::MissingCredential {
                name: "API key".to_string(),
                env: API_KEY_ENV.to_string(),
            }),
            (None, None) => Credentials::from_env(),
        }
    }

    fn client(&self, credentials: Credentials) -> Result<ApiClient> {
        let mut builder = ClientConfig::builder()
            .timeout(Duration::from_secs(self.cli.timeout_secs))
            .max_concurrent_requests(self.cli.max_concurrent_requests)
            .cache_ttl(Duration::from_secs(self.cli.cache_ttl_secs))
            .fan_out_width(self.cli.fan_out_width);
        if let Some(base_url) = &self.cli.base_url {
            builder = builder.base_url(base_url);
        }
        ApiClient::new(&builder.build(), credentials)
    }

    async fn print_groups(&self, client: &ApiClient, cancel: &CancellationToken) -> Result<()> {
        let mut groups = std::pin::pin!(client.groups(cancel));
        let mut found = false;
        while let Some(group) = groups.next().await {
            let group = group?;
            found = true;
            self.console.write_line(&format!(
                "{} (ID: {})",
                group.name.as_deref().unwrap_or("<unnamed>"),
                group.id
            ));
        }
        if !found {
            return Err(Error::NoGroups);
        }
        Ok(())
    }

    async fn print_mappings(
        &self,
        client: &ApiClient,
        group_id: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let mappings = lineage::collect_lineage(client, group_id, cancel).await?;
        if mappings.connector_count == 0 {
            return Err(Error::NoConnectors {
                group_id: group_id.to_string(),
            });
        }

        self.console.write_line("Lineage mappings:");
        for line in &mappings.lines {
            self.console.write_line(&format!("  {line}"));
        }
        self.console.write_line(&format!(
            "{} connectors, {} mappings, {} failures",
            mappings.connector_count,
            mappings.lines.len() - mappings.failure_count,
            mappings.failure_count
        ));
        Ok(())
    }
}

/// Ask for an API key and secret on the console
pub fn prompt_credentials(console: &dyn ConsoleIo) -> Result<Credentials> {
    console.write("Provide your Fivetran API Key: ");
    let api_key = console
        .read_line()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| Error::invalid_selection("API key must not be empty"))?;
    console.write("Provide your Fivetran API Secret: ");
    let api_secret = console
        .read_line()
        .filter(|secret| !secret.trim().is_empty())
        .ok_or_else(|| Error::invalid_selection("API secret must not be empty"))?;
    Ok(Credentials::new(api_key, api_secret))
}

/// Present a numbered group list and return the selected group id
pub fn select_group(console: &dyn ConsoleIo, groups: &[Group]) -> Result<String> {
    if groups.is_empty() {
        return Err(Error::NoGroups);
    }

    let mut listing = String::from("Available groups in Fivetran account:\n");
    for (index, group) in groups.iter().enumerate() {
        listing.push_str(&format!(
            "{}. {} (ID: {})\n",
            index + 1,
            group.name.as_deref().unwrap_or("<unnamed>"),
            group.id
        ));
    }
    listing.push_str("Please select a group to import from (by number): ");
    console.write(&listing);

    let input = console.read_line().unwrap_or_default();
    let selected: usize = input
        .trim()
        .parse()
        .map_err(|_| Error::invalid_selection(format!("not a number: '{input}'")))?;
    if selected < 1 || selected > groups.len() {
        return Err(Error::invalid_selection(format!(
            "number out of range: {selected}"
        )));
    }

    Ok(groups[selected - 1].id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::scripted::ScriptedConsole;

    fn group(id: &str, name: &str) -> Group {
        Group {
            id: id.to_string(),
            name: Some(name.to_string()),
            created_at: None,
        }
    }

    #[test]
    fn test_prompt_credentials_reads_key_and_secret() {
        let console = ScriptedConsole::with_inputs(&["my-key", "my-secret"]);
        let credentials = prompt_credentials(&console).unwrap();
        assert_eq!(credentials.api_key, "my-key");
        assert_eq!(credentials.api_secret, "my-secret");
        assert!(console.output().contains("API Key"));
        assert!(console.output().contains("API Secret"));
    }

    #[test]
    fn test_prompt_credentials_rejects_empty_key() {
        let console = ScriptedConsole::with_inputs(&[""]);
        assert!(prompt_credentials(&console).is_err());
    }

    #[test]
    fn test_select_group_by_number() {
        let console = ScriptedConsole::with_inputs(&["2"]);
        let groups = vec![group("g1", "Group 1"), group("g2", "Group 2")];

        let selected = select_group(&console, &groups).unwrap();
        assert_eq!(selected, "g2");

        let output = console.output();
        assert!(output.contains("1. Group 1 (ID: g1)"));
        assert!(output.contains("2. Group 2 (ID: g2)"));
    }

    #[test]
    fn test_select_group_rejects_out_of_range() {
        let console = ScriptedConsole::with_inputs(&["3"]);
        let groups = vec![group("g1", "Group 1")];
        assert!(matches!(
            select_group(&console, &groups),
            Err(Error::InvalidSelection { .. })
        ));
    }

    #[test]
    fn test_select_group_rejects_garbage() {
        let console = ScriptedConsole::with_inputs(&["abc"]);
        let groups = vec![group("g1", "Group 1")];
        assert!(select_group(&console, &groups).is_err());
    }

    #[test]
    fn test_select_group_empty_list() {
        let console = ScriptedConsole::with_inputs(&["1"]);
        assert!(matches!(select_group(&console, &[]), Err(Error::NoGroups)));
    }
}
