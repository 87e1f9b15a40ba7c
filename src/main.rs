mod cli;

use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;

use cli::{render_actions, Cli, Commands, ConsoleNotifier, OutputArgs};
use post_downloader_lib::config::AppConfig;
use post_downloader_lib::downloader::backends::{
    AssumeLoaded, DryRunLinkTrigger, HttpAssetProbe, HttpLinkTrigger, TracingNotifier,
};
use post_downloader_lib::downloader::{
    classify, Action, AssetProbe, DownloadError, Downloader, LinkTrigger, Notifier, OpenPreview,
    PreviewOverlay, ResolverOrchestrator, Session,
};
use post_downloader_lib::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            match e {
                DownloadError::InvalidUrl(_) | DownloadError::Config(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig, DownloadError> {
    match &cli.config {
        Some(path) => {
            let mut config = AppConfig::load_from(path)?;
            config.apply_env(|key| std::env::var(key).ok());
            config.validate()?;
            Ok(config)
        }
        None => AppConfig::load(),
    }
}

fn build_downloader(config: &AppConfig, output: &OutputArgs) -> Result<Downloader, DownloadError> {
    let links: Arc<dyn LinkTrigger> = if output.dry_run {
        Arc::new(DryRunLinkTrigger)
    } else {
        let dir = output.out.clone().unwrap_or_else(|| config.output_dir());
        Arc::new(HttpLinkTrigger::new(
            dir,
            config.download.proxy.as_deref(),
            config.timeout(),
        )?)
    };

    // Keep stdout clean for JSON: notifications go through the log instead
    let notifier: Arc<dyn Notifier> = if output.json {
        Arc::new(TracingNotifier)
    } else {
        Arc::new(ConsoleNotifier)
    };

    Ok(Downloader::new(
        ResolverOrchestrator::new(config.resolver_config()),
        notifier,
        links,
    )
    .with_durations(config.durations()))
}

async fn run(cli: Cli) -> Result<(), DownloadError> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Classify { url } => {
            let platform = classify(&url)?;
            println!("{}", platform);
            Ok(())
        }
        Commands::Fetch {
            url,
            download,
            all,
            output,
        } => {
            let downloader = build_downloader(&config, &output)?;
            let mut overlay = PreviewOverlay::new(Arc::new(AssumeLoaded), downloader.notifier())
                .with_durations(config.durations());

            let session = downloader.fetch(&url).await?;
            let actions = session.actions();

            if output.json {
                println!(
                    "{}",
                    to_json(&FetchOutput {
                        session: &session,
                        actions: &actions,
                    })?
                );
            } else {
                print!("{}", render_actions(&actions));
            }

            let chosen = select_actions(&actions, &download, all)?;
            let mut failure = None;
            for action in chosen {
                if let Err(e) = downloader.run(action, &mut overlay).await {
                    failure = Some(e);
                }
            }
            failure.map_or(Ok(()), Err)
        }
        Commands::Preview {
            url,
            download,
            check_assets,
            output,
        } => {
            let downloader = build_downloader(&config, &output)?;
            let probe: Arc<dyn AssetProbe> = if check_assets {
                Arc::new(HttpAssetProbe::new(
                    config.download.proxy.as_deref(),
                    config.timeout(),
                )?)
            } else {
                Arc::new(AssumeLoaded)
            };
            let mut overlay =
                PreviewOverlay::new(probe, downloader.notifier()).with_durations(config.durations());

            let session = downloader.preview(&url, &mut overlay).await?;
            let Some(open) = overlay.current() else {
                return Err(DownloadError::AssetLoadFailure(format!(
                    "{} preview",
                    session.media().kind()
                )));
            };

            if output.json {
                println!(
                    "{}",
                    to_json(&PreviewOutput {
                        session: &session,
                        preview: open,
                    })?
                );
            } else {
                println!("{}", open.title);
                println!("{}", session.media().primary_url());
            }

            if download {
                let actions = downloader.download_options(&session, &mut overlay);
                if output.json {
                    println!("{}", to_json(&actions)?);
                } else {
                    print!("{}", render_actions(&actions));
                }
            }
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct FetchOutput<'a> {
    session: &'a Session,
    actions: &'a [Action],
}

#[derive(Serialize)]
struct PreviewOutput<'a> {
    session: &'a Session,
    preview: &'a OpenPreview,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, DownloadError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| DownloadError::Io(format!("could not encode JSON output: {}", e)))
}

/// Actions picked with `--download N` (1-based) or `--all`
fn select_actions<'a>(
    actions: &'a [Action],
    numbers: &[usize],
    all: bool,
) -> Result<Vec<&'a Action>, DownloadError> {
    if all {
        if let Some(every) = actions.iter().find(|a| matches!(a, Action::DownloadAll { .. })) {
            return Ok(vec![every]);
        }
        return Ok(actions.iter().filter(|a| a.is_download()).collect());
    }

    numbers
        .iter()
        .map(|&n| {
            n.checked_sub(1)
                .and_then(|i| actions.get(i))
                .ok_or_else(|| {
                    DownloadError::InvalidMedia(format!(
                        "no action {} (choose 1-{})",
                        n,
                        actions.len()
                    ))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use post_downloader_lib::downloader::{ImageMedia, MediaResult, Platform};

    fn session() -> Session {
        let media: MediaResult = ImageMedia::new("https://i.jpg").unwrap().into();
        Session::new(Platform::Instagram, "https://instagram.com/p/A", media)
    }

    #[test]
    fn test_fetch_output_json() {
        let session = session();
        let actions = session.actions();
        let text = to_json(&FetchOutput {
            session: &session,
            actions: &actions,
        })
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["actions"].as_array().unwrap().len(), actions.len());
        assert_eq!(value["actions"][1]["action"], "download");
    }

    #[test]
    fn test_select_actions_rejects_out_of_range() {
        let actions = session().actions();
        assert!(matches!(
            select_actions(&actions, &[0], false),
            Err(DownloadError::InvalidMedia(_))
        ));
        assert!(select_actions(&actions, &[actions.len() + 1], false).is_err());

        let picked = select_actions(&actions, &[], true).unwrap();
        assert_eq!(picked.len(), 1);
        assert!(picked[0].is_download());
    }
}
