use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use timetable_viewer::core::api_client::TimetableClient;
use timetable_viewer::core::export::{ExportFormat, Notifier, TriggerControl};
use timetable_viewer::core::html_renderer::{render_comparison, render_page};
use timetable_viewer::core::viewer::{ComparisonViewer, RenderedTimetable, TimetableViewer};
use timetable_viewer::model::section::Section;
use timetable_viewer::utils::config::AppConfig;
use timetable_viewer::utils::input::{require_section, select_section};
use timetable_viewer::utils::logging::initialize_logging;
use timetable_viewer::utils::output::export_path;

#[derive(Parser, Debug)]
#[command(version, about = "Timetable viewer and shared-lecturer comparison")]
struct Cli {
    /// Backend base URL, e.g. http://127.0.0.1:5000/
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Configuration file (defaults to ./timetable-viewer.{toml,json,yaml} if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for generated exports
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available sections
    Sections,
    /// Show which other sections share each course's lecturer
    Compare {
        section: Option<String>,
        /// Also write the course cards as an HTML page
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Render a section's weekly timetable
    Show {
        #[arg(conflicts_with = "upload")]
        section: Option<String>,
        /// Upload a timetable PDF instead of picking a section
        #[arg(long)]
        upload: Option<PathBuf>,
        /// Write the rendered table as an HTML page
        #[arg(long)]
        html: Option<PathBuf>,
        #[arg(long, value_enum)]
        export: Option<ExportFormat>,
        /// Export destination (defaults to a timestamped name in the output directory)
        #[arg(long, requires = "export")]
        output: Option<PathBuf>,
        /// Print the export as a data: URL
        #[arg(long, requires = "export")]
        data_url: bool,
    },
}

/// Alerts go to stderr.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        eprintln!("[!] {}", message);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    initialize_logging(cli.verbose)?;

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
    }
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }

    let api = Arc::new(
        TimetableClient::new(&config.api_base_url, config.request_timeout())
            .with_context(|| format!("invalid API url {}", config.api_base_url))?,
    );
    log::debug!("using backend {}", api.base_url());

    match cli.command {
        Command::Sections => {
            let viewer = TimetableViewer::new(api, Arc::new(ConsoleNotifier));
            let sections = viewer.load_sections().await;
            if sections.is_empty() {
                println!("No sections available.");
            }
            for section in sections {
                println!("Section {}", section);
            }
        }
        Command::Compare { section, html } => {
            let viewer = ComparisonViewer::new(api);
            let (section, view) = match section {
                Some(section) => {
                    let section = Section::from(section.as_str());
                    let (known, view) = futures::future::join(
                        viewer.load_sections(),
                        viewer.select_section(&section),
                    )
                    .await;
                    if let Ok(known) = known
                        && !known.contains(&section)
                    {
                        log::warn!("section {} is not in the backend's section list", section);
                    }
                    (section, view)
                }
                None => {
                    let sections = viewer.load_sections().await.map_err(anyhow::Error::msg)?;
                    let section = prompt_section(sections).await?;
                    let view = viewer.select_section(&section).await;
                    (section, view)
                }
            };

            let Some(view) = view else {
                bail!("comparison for section {} was superseded", section);
            };
            print!("{}", view.render_text());
            if let Some(path) = html {
                let page = render_page(
                    &format!("Shared lecturers - Section {}", section),
                    &render_comparison(&view),
                );
                write_file(&path, page.as_bytes()).await?;
                println!("Wrote {}", path.display());
            }
        }
        Command::Show {
            section,
            upload,
            html,
            export,
            output,
            data_url,
        } => {
            let viewer = TimetableViewer::new(api, Arc::new(ConsoleNotifier));
            let rendered = match upload {
                Some(path) => viewer.upload(&path).await,
                None => {
                    let section = match section {
                        Some(section) => Section::from(section.as_str()),
                        None => prompt_section(viewer.load_sections().await).await?,
                    };
                    viewer.select_section(&section).await
                }
            };
            let Some(rendered) = rendered else {
                bail!("no timetable loaded");
            };
            print_summary(&rendered);

            if let Some(path) = html {
                let page = render_page(
                    &format!("Timetable - Section {}", rendered.timetable.section),
                    &rendered.html,
                );
                write_file(&path, page.as_bytes()).await?;
                println!("Wrote {}", path.display());
            }

            if let Some(format) = export {
                let mut trigger =
                    TriggerControl::new(format!("Export {}", format.extension().to_uppercase()));
                let Some(file) = viewer.export(format, &mut trigger) else {
                    bail!("export failed");
                };
                let path = export_path(
                    output.as_deref(),
                    &config.output_dir,
                    &rendered.timetable.section,
                    format.extension(),
                );
                write_file(&path, &file.bytes).await?;
                println!(
                    "Exported {}x{} {} to {}",
                    file.width,
                    file.height,
                    format.extension(),
                    path.display()
                );
                if data_url {
                    println!("{}", file.data_url());
                }
            }
        }
    }

    Ok(())
}

async fn prompt_section(sections: Vec<Section>) -> anyhow::Result<Section> {
    let choice = tokio::task::spawn_blocking(move || select_section(&sections)).await??;
    Ok(require_section(choice)?)
}

fn print_summary(rendered: &RenderedTimetable) {
    let layout = &rendered.layout;
    println!(
        "Section {}: {} time slots across {} days",
        layout.section,
        layout.slot_count(),
        layout.rows.len()
    );
    let slot6 = &layout.break_slot;
    println!(
        "Slot 6: {} ({} day(s) with data{})",
        if slot6.is_break() { "break" } else { "classes" },
        slot6.days_with_break_data,
        if slot6.has_long_codes { ", course codes" } else { "" }
    );
}

async fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}
