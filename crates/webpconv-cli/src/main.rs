//! webpconv-cli: convert a WebP image on disk to JPEG or PNG.
//!
//! Runs the same acquire → convert → export flow as the browser app,
//! reading the source from a file and writing the export to disk.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin webpconv-cli -- [OPTIONS] <INPUT>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use webpconv_core::{ConversionSettings, ConverterState, OutputFormat, Quality, SourceImage};

/// Convert a WebP image to JPEG, JPG, or PNG.
///
/// Without `--output`, the result is written as `converted-image.<format>`
/// inside `--out-dir`.
#[derive(Parser)]
#[command(name = "webpconv-cli", version)]
struct Cli {
    /// Path to the input image.
    input: PathBuf,

    /// Output format token; also used as the file extension.
    #[arg(long, value_enum, default_value_t = Format::Jpeg)]
    format: Format,

    /// Output quality (1-100). Ignored for PNG.
    #[arg(long, default_value_t = Quality::DEFAULT.get(), value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Exact output path. Overrides `--out-dir`.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Directory for the synthesized `converted-image.<format>` file.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Full conversion settings as a JSON string.
    ///
    /// When provided, `--format` and `--quality` are ignored. Example:
    /// `{"format":"png","quality":80}`.
    #[arg(long)]
    settings_json: Option<String>,

    /// Log conversion steps to stderr.
    #[arg(long, short)]
    verbose: bool,
}

/// Output format selection.
#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// JPEG, saved with the `.jpeg` extension.
    Jpeg,
    /// JPEG, saved with the `.jpg` extension.
    Jpg,
    /// Lossless PNG.
    Png,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Jpeg => Self::Jpeg,
            Format::Jpg => Self::Jpg,
            Format::Png => Self::Png,
        }
    }
}

/// Errors surfaced to the user by the CLI.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("error parsing --settings-json: {0}")]
    SettingsJson(#[from] serde_json::Error),

    #[error(transparent)]
    Convert(#[from] webpconv_core::ConvertError),

    #[error("error reading {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error writing {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("conversion of {0} failed: {1}")]
    Conversion(PathBuf, String),
}

/// Build [`ConversionSettings`] from CLI arguments.
///
/// `--settings-json` wins over the individual flags.
fn settings_from_cli(cli: &Cli) -> Result<ConversionSettings, CliError> {
    if let Some(ref json) = cli.settings_json {
        return Ok(serde_json::from_str(json)?);
    }
    Ok(ConversionSettings {
        format: cli.format.into(),
        quality: Quality::new(cli.quality)?,
    })
}

/// Where the export should be written.
fn output_path(cli: &Cli, filename: &str) -> PathBuf {
    cli.output
        .clone()
        .unwrap_or_else(|| cli.out_dir.join(filename))
}

fn read_source(path: &Path) -> Result<SourceImage, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .map(str::to_owned);
    Ok(SourceImage::new(name, bytes))
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let settings = settings_from_cli(cli)?;
    let mut state = ConverterState::new(settings);

    state.acquire(read_source(&cli.input)?);

    if !state.convert_now() {
        let message = state
            .last_failure()
            .unwrap_or("no image was produced")
            .to_owned();
        return Err(CliError::Conversion(cli.input.clone(), message));
    }

    let (Some(converted), Some(download)) = (state.converted(), state.export()) else {
        return Err(CliError::Conversion(
            cli.input.clone(),
            "no image was produced".to_owned(),
        ));
    };

    let path = output_path(cli, &download.filename);
    std::fs::write(&path, &download.bytes).map_err(|source| CliError::Write {
        path: path.clone(),
        source,
    })?;

    println!(
        "{} -> {} ({}, {} bytes, {})",
        cli.input.display(),
        path.display(),
        converted.dimensions,
        download.bytes.len(),
        download.mime_type,
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("webpconv-cli").chain(args.iter().copied())).unwrap()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("webpconv-cli-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_webp(path: &Path, width: u32, height: u32) {
        let img = image::RgbaImage::from_fn(width, height, |_, _| image::Rgba([10, 20, 30, 255]));
        let mut buf = Vec::new();
        let encoder = image::codecs::webp::WebPEncoder::new_lossless(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        std::fs::write(path, buf).unwrap();
    }

    #[test]
    fn defaults_match_browser_defaults() {
        let cli = parse(&["in.webp"]);
        assert_eq!(settings_from_cli(&cli).unwrap(), ConversionSettings::default());
    }

    #[test]
    fn quality_out_of_range_is_rejected_by_parser() {
        let result = Cli::try_parse_from(["webpconv-cli", "in.webp", "--quality", "0"]);
        assert!(result.is_err());
        let result = Cli::try_parse_from(["webpconv-cli", "in.webp", "--quality", "101"]);
        assert!(result.is_err());
    }

    #[test]
    fn settings_json_overrides_flags() {
        let cli = parse(&[
            "in.webp",
            "--format",
            "jpg",
            "--settings-json",
            r#"{"format":"png","quality":5}"#,
        ]);
        let settings = settings_from_cli(&cli).unwrap();
        assert_eq!(settings.format, OutputFormat::Png);
        assert_eq!(settings.quality.get(), 5);
    }

    #[test]
    fn bad_settings_json_is_an_error() {
        let cli = parse(&["in.webp", "--settings-json", r#"{"format":"gif"}"#]);
        assert!(matches!(
            settings_from_cli(&cli),
            Err(CliError::SettingsJson(_))
        ));
    }

    #[test]
    fn default_output_uses_synthesized_name() {
        let cli = parse(&["in.webp", "--out-dir", "out"]);
        assert_eq!(
            output_path(&cli, "converted-image.jpg"),
            Path::new("out").join("converted-image.jpg")
        );
        let cli = parse(&["in.webp", "-o", "explicit.png"]);
        assert_eq!(
            output_path(&cli, "converted-image.png"),
            PathBuf::from("explicit.png")
        );
    }

    #[test]
    fn converts_file_into_out_dir() {
        let dir = scratch_dir("convert");
        let input = dir.join("input.webp");
        write_webp(&input, 12, 8);

        let input_arg = input.to_str().unwrap();
        let dir_arg = dir.to_str().unwrap();
        let cli = parse(&[input_arg, "--format", "png", "--out-dir", dir_arg]);
        run(&cli).unwrap();

        let written = std::fs::read(dir.join("converted-image.png")).unwrap();
        let decoded = image::load_from_memory(&written).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 8));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn undecodable_input_reports_failure() {
        let dir = scratch_dir("corrupt");
        let input = dir.join("broken.webp");
        std::fs::write(&input, b"definitely not an image").unwrap();

        let cli = parse(&[input.to_str().unwrap(), "--out-dir", dir.to_str().unwrap()]);
        assert!(matches!(run(&cli), Err(CliError::Conversion(..))));
        assert!(!dir.join("converted-image.jpeg").exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_input_is_a_read_error() {
        let cli = parse(&["/nonexistent/webpconv/input.webp"]);
        assert!(matches!(run(&cli), Err(CliError::Read { .. })));
    }
}
