use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use post_downloader_lib::downloader::{Action, DownloadProgress, Notification, Notifier, Severity};

/// Resolve social-media post URLs into previewable, downloadable media
#[derive(Parser)]
#[command(name = "post-downloader", version)]
#[command(about = "Preview and download media from Instagram post URLs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Alternate config file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the platform a URL belongs to
    Classify {
        url: String,
    },
    /// Fetch a post and list its download options
    Fetch {
        url: String,

        /// Run the numbered action from the list (repeatable)
        #[arg(short, long = "download", value_name = "N")]
        download: Vec<usize>,

        /// Download every item
        #[arg(long, conflicts_with = "download")]
        all: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Preview a post without listing download options
    Preview {
        url: String,

        /// Switch from the preview to the download options
        #[arg(long)]
        download: bool,

        /// Check that the preview asset actually loads
        #[arg(long)]
        check_assets: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
pub struct OutputArgs {
    /// Directory for downloaded files
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Log downloads instead of performing them
    #[arg(long)]
    pub dry_run: bool,
}

/// Notification surface for the terminal
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, n: Notification) {
        let tag = match n.severity {
            Severity::Info => "info",
            Severity::Success => "ok",
            Severity::Error => "error",
        };
        eprintln!("[{}] {}", tag, n.message);
    }

    fn progress(&self, p: DownloadProgress) {
        eprintln!("[{:>3}%] {}", p.percent.round() as u32, p.status);
    }
}

/// One line per action, numbered from 1
pub fn render_actions(actions: &[Action]) -> String {
    let mut out = String::new();
    for (i, action) in actions.iter().enumerate() {
        let line = match action {
            Action::Preview { label, title, .. } | Action::PreviewAll { label, title, .. } => {
                format!("{:<20} {}", label, title)
            }
            Action::Download { label, target, .. } => {
                format!("{:<20} {} <- {}", label, target.filename, target.source_url)
            }
            Action::DownloadAll { label, targets } => {
                format!("{:<20} {} files", label, targets.len())
            }
            Action::Info {
                kind,
                caption,
                description,
            } => {
                let mut info = format!("{:<20} type: {}", "Media Info", kind);
                if let Some(c) = caption {
                    info.push_str(&format!(", caption: {}", c));
                }
                if let Some(d) = description {
                    info.push_str(&format!(", description: {}", d));
                }
                info
            }
        };
        out.push_str(&format!("{:>3}. {}\n", i + 1, line));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use post_downloader_lib::downloader::{ImageMedia, MediaResult, Platform, PresentationSelector};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_fetch_with_downloads() {
        let cli = Cli::parse_from([
            "post-downloader",
            "fetch",
            "https://instagram.com/p/A",
            "-d",
            "2",
            "-d",
            "4",
            "--out",
            "/tmp/x",
            "-vv",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Fetch {
                download, output, ..
            } => {
                assert_eq!(download, [2, 4]);
                assert_eq!(output.out, Some(PathBuf::from("/tmp/x")));
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_render_numbers_actions() {
        let media: MediaResult = ImageMedia::new("https://i.jpg")
            .unwrap()
            .with_caption("hi")
            .into();
        let text = render_actions(&PresentationSelector::select(&media, Platform::Instagram));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("  1. Preview"));
        assert!(lines[1].contains("instagram_image.jpg <- https://i.jpg"));
        assert!(lines[2].ends_with("type: image, caption: hi"));
    }
}
