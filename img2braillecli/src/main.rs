use clap::Parser;
use img2braille::error::Error;
use img2braille::loader::Source;
use img2braille::mapping::Mapping;
use img2braille::pipeline::{
    DEFAULT_BLANK_VALUE, DEFAULT_PADDING_VALUE, DEFAULT_WIDTH, ImagePipeline, PipelineConfig,
    Resolution,
};
use std::{io, path::PathBuf, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod prompt;

/// Command line arguments structure.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image path or http(s) URL, asked for interactively when missing
    input: Option<String>,
    /// Name of the file to output to
    #[arg(short, long, default_value = "output.txt")]
    output: PathBuf,
    /// Output width in pixels (two pixels per glyph)
    #[arg(short, long, default_value_t = DEFAULT_WIDTH)]
    width: u32,
    /// Output height in pixels, derived from the aspect ratio when omitted
    #[arg(long)]
    height: Option<u32>,
    /// Pixels darker than this become dots
    #[arg(short, long, default_value_t = DEFAULT_BLANK_VALUE)]
    blank_value: u8,
    /// Gray value used to pad the image to whole blocks
    #[arg(short, long, default_value_t = DEFAULT_PADDING_VALUE)]
    padding_value: u8,
    /// JSON file mapping dot patterns to glyphs
    #[arg(short, long)]
    mapping: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> PipelineConfig {
        PipelineConfig {
            resolution: Resolution::new(self.width, self.height),
            blank_value: self.blank_value,
            padding_value: self.padding_value,
        }
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let input = match &args.input {
        Some(input) => input.clone(),
        None => prompt::read_until_non_empty(
            &mut io::stdin().lock(),
            &mut io::stdout(),
            "Enter image path:",
        )?,
    };

    run(&args, &input).inspect_err(|err| error!("{err}"))
}

fn load_mapping(args: &Args) -> Result<Mapping, Error> {
    let Some(path) = &args.mapping else {
        return Ok(Mapping::standard());
    };
    let mapping = Mapping::from_path(path)?;
    let missing = mapping.missing_keys();
    if !missing.is_empty() {
        warn!(
            path = %path.display(),
            missing = missing.len(),
            "mapping does not cover every dot pattern"
        );
    }
    Ok(mapping)
}

fn run(args: &Args, input: &str) -> Result<(), Error> {
    let mapping = Arc::new(load_mapping(args)?);
    let img = Source::parse(input).open()?;

    info!("converting image to braille art");
    let pipeline = ImagePipeline::new(args.config(), mapping);
    let frame = pipeline.convert(&img)?;

    frame.save(&args.output)?;
    info!("done");
    Ok(())
}
