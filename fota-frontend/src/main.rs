use fota_frontend::backend::ApiClient;
use fota_frontend::command::{self, Command};
use fota_frontend::config;
use fota_frontend::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::read_config("config.toml")?;
    let _logging_guard = logging::init_logging(&config.log_dir, "fota-frontend", &config.log_level)?;

    let command = Command::from_args(std::env::args().skip(1));
    tracing::info!("FOTA frontend started, command '{}'.", command.name());

    let api = ApiClient::new(&config.api)?;
    let session = config.session();

    let output = command::run(&command, &api, &session, chrono::Utc::now()).await?;
    println!("{}", output);

    Ok(())
}
