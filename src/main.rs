use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use hotel_catalog::config::{CatalogConfig, PageFormat, PageResolution};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    A4,
    Trade,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResolutionArg {
    Full,
    OnePagePerProvince,
}

#[derive(Parser, Debug)]
#[command(name = "hotel-catalog")]
#[command(version, about = "Turn a spreadsheet of hotels into a paginated PDF catalog", long_about = None)]
struct Args {
    /// Input workbook (.xlsx)
    input: PathBuf,

    /// Output PDF
    #[arg(short, long, default_value = "catalogo_hoteles.pdf")]
    output: PathBuf,

    /// Full-page cover image
    #[arg(long)]
    cover: Option<PathBuf>,

    /// Full-page image printed before the province index
    #[arg(long)]
    intro: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = FormatArg::A4)]
    format: FormatArg,

    /// How the province index learns its page numbers
    #[arg(long, value_enum, default_value_t = ResolutionArg::Full)]
    resolution: ResolutionArg,

    /// Log phase timings
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    let default_level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = CatalogConfig {
        format: match args.format {
            FormatArg::A4 => PageFormat::A4,
            FormatArg::Trade => PageFormat::Trade,
        },
        cover_image: args.cover,
        intro_image: args.intro,
        resolution: match args.resolution {
            ResolutionArg::Full => PageResolution::FullSimulation,
            ResolutionArg::OnePagePerProvince => PageResolution::OnePagePerProvince,
        },
        ..CatalogConfig::default()
    };

    if let Err(e) = hotel_catalog::generate_catalog(&args.input, &args.output, &config) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    println!("Wrote {}", args.output.display());
}
