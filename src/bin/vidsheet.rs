use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use vidsheet::{
    CapturePolicy, Color, ContactSheet, FfmpegLogLevel, MediaFile, MediaProbe, OutputFormat,
    ProgressCallback, ProgressInfo, SheetOptions, format_timecode,
};

const CLI_AFTER_HELP: &str = "Examples:\n  vidsheet generate input.mp4 --out preview.png\n  vidsheet generate input.mp4 --out sheet.jpg --rows 4 --cols 5 --cell-width 240 --background '#202020' --progress\n  vidsheet probe input.mp4 --json\n  vidsheet completions zsh > _vidsheet";

#[derive(Debug, Parser)]
#[command(
    name = "vidsheet",
    version,
    about = "Build a contact-sheet image from evenly spaced video frames",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Print every captured frame.
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a progress bar while capturing frames.
    #[arg(long, global = true)]
    progress: bool,

    /// Allow overwriting an existing output file.
    #[arg(long, global = true)]
    overwrite: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Worker thread count for --parallel.
    #[arg(long, global = true)]
    threads: Option<usize>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a contact sheet.
    #[command(
        about = "Generate a contact sheet",
        visible_alias = "sheet",
        after_help = "Examples:\n  vidsheet generate input.mp4\n  vidsheet generate input.mp4 --out grid.jpg --quality 80 --cell-height 180 --margin 0"
    )]
    Generate {
        /// Input video path.
        input: PathBuf,
        /// Output image path; the extension picks the format (.png, .jpg, .jpeg).
        #[arg(long, short, default_value = "preview.png")]
        out: PathBuf,
        /// Number of grid rows.
        #[arg(long, default_value_t = 3)]
        rows: u32,
        /// Number of grid columns.
        #[arg(long, default_value_t = 3)]
        cols: u32,
        /// Cell width in pixels.
        #[arg(long, default_value_t = 320)]
        cell_width: u32,
        /// Cell height in pixels; 0 follows the video's aspect ratio.
        #[arg(long, default_value_t = 0)]
        cell_height: u32,
        /// Gap between cells and around the edge, in pixels.
        #[arg(long, default_value_t = 8)]
        margin: u32,
        /// JPEG quality (1-100).
        #[arg(long, default_value_t = 90)]
        quality: u8,
        /// Background color (#RRGGBB or #RRGGBBAA).
        #[arg(long, default_value = "#FFFFFF")]
        background: String,
        /// Leave cells blank when a frame cannot be captured instead of failing.
        #[arg(long)]
        skip_failed: bool,
        /// Capture frames on multiple threads (requires the `rayon` feature).
        #[arg(long)]
        parallel: bool,
        /// Print a machine-readable summary.
        #[arg(long)]
        json: bool,
    },

    /// Print duration and resolution of a video.
    #[command(
        about = "Print video metadata",
        visible_alias = "info",
        after_help = "Examples:\n  vidsheet probe input.mp4\n  vidsheet probe input.mp4 --json"
    )]
    Probe {
        /// Input video path.
        input: PathBuf,
        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Grid and output flags of the `generate` command.
struct GenerateArguments<'a> {
    rows: u32,
    cols: u32,
    cell_width: u32,
    cell_height: u32,
    margin: u32,
    quality: u8,
    background: &'a str,
    skip_failed: bool,
}

fn build_options(arguments: &GenerateArguments<'_>) -> Result<SheetOptions, vidsheet::SheetError> {
    let background: Color = arguments.background.parse()?;
    let policy = if arguments.skip_failed {
        CapturePolicy::SkipFailed
    } else {
        CapturePolicy::Abort
    };

    let options = SheetOptions::new()
        .with_rows(arguments.rows)
        .with_columns(arguments.cols)
        .with_cell_width(arguments.cell_width)
        .with_cell_height(arguments.cell_height)
        .with_margin(arguments.margin)
        .with_quality(arguments.quality)
        .with_background(background)
        .with_capture_policy(policy);
    options.validate()?;
    Ok(options)
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(level) = &global.log_level {
        let parsed: FfmpegLogLevel = level.parse()?;
        vidsheet::set_ffmpeg_log_level(parsed);
    }

    #[cfg(feature = "rayon")]
    {
        if let Some(threads) = global.threads.filter(|&threads| threads > 0) {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()?;
        }
    }

    #[cfg(not(feature = "rayon"))]
    {
        if global.threads.is_some() {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                "--threads requires building with the `rayon` feature".yellow()
            );
        }
    }

    Ok(())
}

/// Reports capture progress on the terminal.
struct TerminalProgress {
    bar: Option<ProgressBar>,
    verbose: bool,
}

impl TerminalProgress {
    fn new(show_bar: bool, verbose: bool) -> Result<Self, Box<dyn std::error::Error>> {
        let bar = if show_bar {
            let bar = ProgressBar::new(0);
            let style = ProgressStyle::with_template(
                "{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}",
            )?;
            bar.set_style(style.progress_chars("##-"));
            Some(bar)
        } else {
            None
        };
        Ok(Self { bar, verbose })
    }

    fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message("done");
        }
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        let timecode = info
            .current_timestamp
            .map(format_timecode)
            .unwrap_or_default();

        if let Some(bar) = &self.bar {
            bar.set_length(info.total);
            bar.set_position(info.current);
            bar.set_message(timecode.clone());
        }
        if self.verbose {
            let line = format!("captured frame {}/{} at {timecode}", info.current, info.total);
            match &self.bar {
                Some(bar) => bar.println(line),
                None => eprintln!("{line}"),
            }
        }
    }
}

fn generate_sheet(
    input: &Path,
    options: &SheetOptions,
    parallel: bool,
) -> Result<ContactSheet, vidsheet::SheetError> {
    #[cfg(feature = "rayon")]
    {
        if parallel {
            return ContactSheet::generate_parallel(input, options);
        }
    }

    #[cfg(not(feature = "rayon"))]
    {
        if parallel {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                "--parallel requires building with the `rayon` feature; capturing sequentially"
                    .yellow()
            );
        }
    }

    let mut media = MediaFile::open(input)?;
    ContactSheet::generate(&mut media, options)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Generate {
            input,
            out,
            rows,
            cols,
            cell_width,
            cell_height,
            margin,
            quality,
            background,
            skip_failed,
            parallel,
            json,
        } => {
            let arguments = GenerateArguments {
                rows,
                cols,
                cell_width,
                cell_height,
                margin,
                quality,
                background: &background,
                skip_failed,
            };
            let options = build_options(&arguments)?;
            let format = OutputFormat::from_path(&out)?;
            ensure_writable_path(&out, cli.global.overwrite)?;

            let progress = Arc::new(TerminalProgress::new(
                cli.global.progress,
                cli.global.verbose,
            )?);
            let options = options.with_progress(progress.clone());

            let sheet = generate_sheet(&input, &options, parallel)?;
            progress.finish();
            sheet.save(&out)?;

            for &index in sheet.skipped() {
                eprintln!(
                    "{} {}",
                    "warning:".yellow().bold(),
                    format!(
                        "frame {} at {} could not be captured and was left blank",
                        index + 1,
                        format_timecode(sheet.timestamps()[index])
                    )
                    .yellow()
                );
            }

            if json {
                let layout = sheet.layout();
                let metadata = sheet.metadata();
                let (canvas_width, canvas_height) = layout.canvas_dimensions();
                let payload = json!({
                    "output": out.display().to_string(),
                    "format": format.to_string(),
                    "duration_seconds": metadata.duration,
                    "source": { "width": metadata.width, "height": metadata.height },
                    "grid": {
                        "rows": layout.rows(),
                        "cols": layout.columns(),
                        "cell_width": layout.cell_width(),
                        "cell_height": layout.cell_height(),
                        "margin": layout.margin(),
                        "background": layout.background().to_string(),
                    },
                    "canvas": { "width": canvas_width, "height": canvas_height },
                    "timestamps": sheet.timestamps(),
                    "skipped": sheet.skipped(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!(
                    "{} {}",
                    "success:".green().bold(),
                    format!("Generated contact sheet {}", out.display()).green()
                );
            }
        }
        Commands::Probe { input, json } => {
            let mut media = MediaFile::open(&input)?;
            let metadata = media.probe()?;
            if json {
                let payload = json!({
                    "path": input.display().to_string(),
                    "format": media.format_name(),
                    "codec": media.codec_name(),
                    "duration_seconds": metadata.duration,
                    "start_time_seconds": media.start_time(),
                    "width": metadata.width,
                    "height": metadata.height,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Format: {}", media.format_name());
                println!(
                    "Duration: {} ({:.3}s)",
                    format_timecode(metadata.duration),
                    metadata.duration
                );
                println!(
                    "Video: {}x{} [{}]",
                    metadata.width,
                    metadata.height,
                    media.codec_name()
                );
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "vidsheet", &mut io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
