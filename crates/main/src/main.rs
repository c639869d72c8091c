use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::debug;
use propwell_brief::BriefConfig;

/// Renders the Propwell AMP Weekly Platform Brief to PDF.
///
/// Fonts are looked up in `--fonts-dir`, then `assets/fonts` next to the binary and in the
/// library crate, then in the system font directories.
#[derive(Parser)]
#[command(author, version, about = "Generate the Propwell AMP weekly brief PDF")]
struct Cli {
    /// Output file.  Defaults to ~/Downloads/Propwell_AMP_Weekly_Brief_02.23.26.pdf.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Directory holding Liberation Sans, Arial or DejaVu Sans TrueType files.
    #[arg(long, value_name = "DIR", env = "PROPWELL_BRIEF_FONTS_DIR")]
    fonts_dir: Option<PathBuf>,

    /// Add a bookmark outline of the section headings (needs the `bookmarks` feature).
    #[arg(long)]
    bookmarks: bool,
}

impl Cli {
    fn into_config(self) -> BriefConfig {
        let mut config = match self.output {
            Some(output) => BriefConfig::with_output(output),
            None => BriefConfig::default(),
        };
        config.fonts_dir = self.fonts_dir;
        config.bookmarks = self.bookmarks;
        config
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().into_config();
    debug!("configuration: {:?}", config);

    match propwell_brief::generate(&config) {
        Ok(rendered) => {
            println!(
                "PDF saved to: {} ({} pages)",
                config.output.display(),
                rendered.page_count
            );
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            print_error_sources(&err);
            std::process::exit(1);
        }
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
