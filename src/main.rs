use anyhow::{bail, Context, Result};
use oncoderma::analysis::{AnalysisClient, AnalysisOutcome, PatientMetadata};
use oncoderma::auth::{AuthService, SessionStore};
use oncoderma::cache::ResultCache;
use oncoderma::commands::{create_base_commands, get_config_path, wants_json};
use oncoderma::config::Config;
use oncoderma::db::LocalStorage;
use oncoderma::fingerprint::{DiskFile, FileSource, FingerprintGenerator};
use oncoderma::http::HttpTransport;
use oncoderma::logger::LOGGER;
use oncoderma::ui::{print_health, print_outcome, print_session, print_welcome};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = create_base_commands().get_matches();
    let json = wants_json(&matches);
    let config = Config::from_file(&get_config_path(&matches))?;

    let storage = LocalStorage::open(&config.session_path)
        .with_context(|| format!("opening session storage at {}", config.session_path))?;
    let transport = HttpTransport::new(&config.api_base_url)
        .with_context(|| format!("invalid api_base_url {}", config.api_base_url))?;
    let mut auth = AuthService::start(transport, SessionStore::new(storage))?;

    if !json {
        print_welcome(&config.api_base_url);
    }

    match matches.subcommand() {
        Some(("login", sub)) => {
            let username = sub.get_one::<String>("username").cloned().unwrap_or_default();
            let password = sub.get_one::<String>("password").cloned().unwrap_or_default();
            let session = auth.login(&username, &password).await?;
            print_session(Some(session));
        }
        Some(("logout", _)) => {
            auth.logout()?;
            print_session(None);
        }
        Some(("whoami", _)) => print_session(auth.session()),
        Some((command @ ("analyze" | "health"), sub)) => {
            let transport = HttpTransport::new(&config.api_base_url)?;
            transport.set_bearer(auth.token().map(str::to_string));
            let client = AnalysisClient::new(
                transport,
                FingerprintGenerator::default(),
                Arc::new(ResultCache::with_system_clock()),
                config.analysis_settings(),
            );

            if command == "health" {
                let status = client.check_health().await;
                if json {
                    println!("{}", serde_json::to_string_pretty(&status)?);
                } else {
                    print_health(&status);
                }
                return Ok(());
            }

            let path = sub.get_one::<String>("file").cloned().unwrap_or_default();
            let file = DiskFile::open(&path)
                .await
                .with_context(|| format!("cannot open {}", path))?;
            let patient = PatientMetadata {
                age: sub.get_one::<u32>("age").copied(),
                sex: sub.get_one::<String>("sex").cloned(),
                lesion_location: sub.get_one::<String>("site").cloned(),
            };

            let outcome = client
                .analyze(Some(&file as &dyn FileSource), &patient)
                .await;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.to_json())?);
            } else {
                print_outcome(&outcome);
            }
            if let AnalysisOutcome::Failed(failure) = outcome {
                LOGGER.debug(&format!("analysis failed with {}", failure.code));
                std::process::exit(1);
            }
        }
        Some((other, _)) => bail!("unknown command {}", other),
        None => bail!("no command given"),
    }

    Ok(())
}
