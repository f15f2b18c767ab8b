use anyhow::anyhow;
use chrono::{DateTime, Utc};
use fota_common::SessionContext;
use serde::Serialize;

use crate::backend::FotaApi;
use crate::views;

pub const HELP: &str = "\
Usage: fota-frontend <command> [args]

  activations            running and upcoming activations
  activation <id>        activation header with its timeline
  contacts <id>          contact log of one activation
  past                   completed activations (yours when logged in)
  on-air                 on-air activations placed on the map
  sites                  site map
  browse                 active sites
  dashboard              greeting and message of the day
  categories             location categories
  spot <id> <text...>    post an update to an activation
  end <id>               end an activation now
  help                   this text";

/// A command-line request, one per page of the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Activations,
    Activation(Option<String>),
    Contacts(Option<String>),
    Past,
    OnAir,
    Sites,
    Browse,
    Dashboard,
    Categories,
    Spot { activation_id: String, content: String },
    End(Option<String>),
    Help,
    Unknown(String),
}

impl Command {
    /// Parse a command line. A leading `/` or `\` on the keyword is
    /// accepted and ignored; keywords are case-insensitive.
    ///
    /// # Examples
    /// ```
    /// use fota_frontend::command::Command;
    /// let cmd = Command::parse("spot 42 QRV 20m CW");
    /// assert_eq!(cmd, Command::Spot { activation_id: "42".into(), content: "QRV 20m CW".into() });
    /// ```
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let (keyword, rest) = match trimmed.find(char::is_whitespace) {
            Some(pos) => (&trimmed[..pos], trimmed[pos..].trim()),
            None => (trimmed, ""),
        };
        let keyword = keyword.trim_start_matches(['/', '\\']).to_lowercase();
        let first_arg = rest.split_whitespace().next().map(str::to_string);

        match keyword.as_str() {
            "activations" | "list" => Command::Activations,
            "activation" | "details" => Command::Activation(first_arg),
            "contacts" => Command::Contacts(first_arg),
            "past" => Command::Past,
            "on-air" | "onair" | "map" => Command::OnAir,
            "sites" => Command::Sites,
            "browse" => Command::Browse,
            "dashboard" => Command::Dashboard,
            "categories" => Command::Categories,
            "spot" => {
                let (activation_id, content) = match rest.find(char::is_whitespace) {
                    Some(pos) => (&rest[..pos], rest[pos..].trim()),
                    None => (rest, ""),
                };
                Command::Spot {
                    activation_id: activation_id.to_string(),
                    content: content.to_string(),
                }
            }
            "end" => Command::End(first_arg),
            "" | "help" => Command::Help,
            _ => Command::Unknown(keyword),
        }
    }

    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Self {
        Self::parse(&args.into_iter().collect::<Vec<_>>().join(" "))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Activations => "activations",
            Command::Activation(_) => "activation",
            Command::Contacts(_) => "contacts",
            Command::Past => "past",
            Command::OnAir => "on-air",
            Command::Sites => "sites",
            Command::Browse => "browse",
            Command::Dashboard => "dashboard",
            Command::Categories => "categories",
            Command::Spot { .. } => "spot",
            Command::End(_) => "end",
            Command::Help => "help",
            Command::Unknown(_) => "unknown",
        }
    }

    pub fn is_command(&self) -> bool {
        !matches!(self, Command::Unknown(_))
    }
}

fn pretty<T: Serialize>(view: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}

/// Run a command and render its view as pretty JSON.
pub async fn run(
    command: &Command,
    api: &dyn FotaApi,
    session: &SessionContext,
    now: DateTime<Utc>,
) -> anyhow::Result<String> {
    tracing::debug!("Running command '{}'", command.name());

    match command {
        Command::Activations => pretty(&views::load_activations_list(api, now).await),
        Command::Activation(id) => {
            pretty(&views::load_activation_details(api, id.as_deref(), now).await)
        }
        Command::Contacts(id) => pretty(&views::load_activation_contacts(api, id.as_deref()).await),
        Command::Past => pretty(&views::load_past_activations(api, session, now).await),
        Command::OnAir => pretty(&views::load_on_air_map(api, now).await),
        Command::Sites => pretty(&views::load_site_map(api).await),
        Command::Browse => pretty(&views::load_site_browser(api).await),
        Command::Dashboard => pretty(&views::load_dashboard(api, session).await),
        Command::Categories => pretty(&views::load_location_categories(api).await),
        Command::Spot {
            activation_id,
            content,
        } => {
            let draft = views::SpotDraft {
                activation_id: activation_id.clone(),
                content: content.clone(),
                created_at_now: true,
            };
            pretty(&views::submit_spot(api, &draft, session, now).await)
        }
        Command::End(id) => {
            let activation =
                views::end_activation(api, id.as_deref().unwrap_or_default(), now).await?;
            pretty(&activation)
        }
        Command::Help => Ok(HELP.to_string()),
        Command::Unknown(keyword) => Err(anyhow!(
            "Unknown command '{}'. Run 'fota-frontend help' for a list.",
            keyword
        )),
    }
}
