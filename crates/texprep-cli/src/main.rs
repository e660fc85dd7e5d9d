//! CLI binary for texprep.

mod commands;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use texprep_core::texture::SlotHash;
use texprep_core::{Color, Config, CropPosition, CropSize, FilterType, Transform};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Config file picked up from the working directory when `--config` is not given.
const LOCAL_CONFIG: &str = "texprep.toml";

/// Batch image preparation for texture mods.
#[derive(Debug, Parser)]
#[command(name = "texprep", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rotate or flip every image in a folder, in place.
    Transform {
        dir: PathBuf,
        /// rotate-90, rotate-180, rotate-270 (counter-clockwise), flip-horizontal or flip-vertical.
        operation: Transform,
    },

    /// Crop every image in a folder, in place.
    Crop {
        dir: PathBuf,
        /// Aspect ratio (`16:9`) or exact size (`800x600`).
        #[arg(long, default_value = "1:1")]
        size: CropSize,
        /// left, center, right, top-left, bottom-right or custom:LEFT,TOP.
        #[arg(long, default_value = "center")]
        position: CropPosition,
    },

    /// Resize every image in a folder, in place.
    Resize {
        dir: PathBuf,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        /// Letterbox onto the background instead of stretching.
        #[arg(long)]
        keep_aspect: bool,
        /// Letterbox fill, `#rrggbb` or `r,g,b`.
        #[arg(long)]
        background: Option<Color>,
        /// nearest, bilinear or lanczos3.
        #[arg(long)]
        filter: Option<FilterType>,
    },

    /// Stitch the images of a folder into one grid sheet.
    Stitch {
        dir: PathBuf,
        #[arg(long)]
        rows: Option<u32>,
        #[arg(long)]
        cols: Option<u32>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Placeholder fill, `#rrggbb` or `r,g,b`.
        #[arg(long)]
        fill: Option<Color>,
    },

    /// Center every image of a folder on a background, in place.
    Composite {
        dir: PathBuf,
        /// Background image.
        #[arg(long)]
        background: Option<PathBuf>,
    },

    /// Rename the images of a folder to a numbered sequence.
    Rename {
        dir: PathBuf,
        #[arg(long, default_value = "")]
        prefix: String,
        #[arg(long, default_value = "")]
        suffix: String,
        /// First sequence number.
        #[arg(long, default_value_t = 0)]
        start: u32,
        /// Zero-padded digit count.
        #[arg(long, default_value_t = 3)]
        digits: usize,
    },

    /// Convert replacement images to DDS textures and write the mod INI.
    Texture {
        /// IB slot check hash, 8 hex digits.
        #[arg(long)]
        hash: SlotHash,
        /// Folder of reference textures carrying the hash pairs.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Folder of replacement images.
        #[arg(long)]
        images: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// texconv executable.
        #[arg(long)]
        texconv: Option<PathBuf>,
        /// INI file name inside the output folder.
        #[arg(long)]
        ini: Option<String>,
    },

    /// Manage the list of working folders and clear them.
    Folders {
        #[command(subcommand)]
        action: FoldersAction,
    },
}

#[derive(Debug, Subcommand)]
enum FoldersAction {
    /// Show the remembered folders.
    List,
    /// Remember folders.
    Add {
        #[arg(required = true)]
        folders: Vec<PathBuf>,
    },
    /// Forget folders.
    Remove {
        #[arg(required = true)]
        folders: Vec<PathBuf>,
    },
    /// Delete everything inside every remembered folder.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Transform { dir, operation } => commands::images::transform(&config, &dir, operation),
        Command::Crop {
            dir,
            size,
            position,
        } => commands::images::crop(&config, &dir, size, position),
        Command::Resize {
            dir,
            width,
            height,
            keep_aspect,
            background,
            filter,
        } => {
            let mut spec = config.resize;
            spec.width = width.unwrap_or(spec.width);
            spec.height = height.unwrap_or(spec.height);
            spec.keep_aspect_ratio |= keep_aspect;
            spec.background = background.unwrap_or(spec.background);
            spec.filter = filter.unwrap_or(spec.filter);
            commands::images::resize(&config, &dir, spec)
        }
        Command::Stitch {
            dir,
            rows,
            cols,
            output,
            fill,
        } => {
            let mut grid = config.grid.clone();
            grid.rows = rows.unwrap_or(grid.rows);
            grid.cols = cols.unwrap_or(grid.cols);
            grid.fill = fill.unwrap_or(grid.fill);
            if let Some(output) = output {
                grid.output = output;
            }
            commands::stitch::run(&config, &dir, grid)
        }
        Command::Composite { dir, background } => {
            let background = background.unwrap_or_else(|| config.composite.background.clone());
            commands::images::composite(&config, &dir, &background)
        }
        Command::Rename {
            dir,
            prefix,
            suffix,
            start,
            digits,
        } => {
            let mut sequence = texprep_core::NamingSequence::new(prefix, suffix);
            sequence.next = start;
            sequence.width = digits;
            commands::rename::run(&dir, sequence)
        }
        Command::Texture {
            hash,
            input,
            images,
            output,
            texconv,
            ini,
        } => {
            let mut job = config.texture.clone();
            job.reference_dir = input.unwrap_or(job.reference_dir);
            job.images_dir = images.unwrap_or(job.images_dir);
            job.output_dir = output.unwrap_or(job.output_dir);
            job.ini_name = ini.unwrap_or(job.ini_name);
            let mut converter = config.texconv.clone();
            converter.exe = texconv.unwrap_or(converter.exe);
            commands::texture::run(job, hash, converter)
        }
        Command::Folders { action } => {
            let list = config.folders.list.as_path();
            match action {
                FoldersAction::List => commands::folders::list(list),
                FoldersAction::Add { folders } => commands::folders::add(list, &folders),
                FoldersAction::Remove { folders } => commands::folders::remove(list, &folders),
                FoldersAction::Clear { yes } => commands::folders::clear(list, yes),
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "texprep=debug,texprep_core=debug"
    } else {
        "texprep=info,texprep_core=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// `--config` if given, else `texprep.toml` in the working directory if
/// present, else defaults.
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match path {
        Some(path) => path,
        None if Path::new(LOCAL_CONFIG).is_file() => Path::new(LOCAL_CONFIG),
        None => return Ok(Config::default()),
    };
    debug!("loading config from {}", path.display());
    Config::from_file(path).with_context(|| format!("loading {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("texprep").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_transform_args() {
        let cli = parse(&["transform", "out", "rotate-90", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Transform {
                operation: Transform::Rotate90,
                ..
            }
        ));
        assert!(Cli::try_parse_from(["texprep", "transform", "out", "spin"]).is_err());
    }

    #[test]
    fn test_crop_defaults_and_custom() {
        match parse(&["crop", "out"]).command {
            Command::Crop { size, position, .. } => {
                assert_eq!(size, CropSize::Ratio { width: 1, height: 1 });
                assert_eq!(position, CropPosition::Center);
            }
            other => panic!("unexpected {other:?}"),
        }
        match parse(&["crop", "out", "--size", "800x600", "--position", "custom:10,20"]).command {
            Command::Crop { size, position, .. } => {
                assert_eq!(size, CropSize::Exact { width: 800, height: 600 });
                assert_eq!(position, CropPosition::Custom { left: 10, top: 20 });
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_texture_hash_validated() {
        match parse(&["texture", "--hash", "C44D57B0"]).command {
            Command::Texture { hash, .. } => assert_eq!(hash.as_str(), "c44d57b0"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(Cli::try_parse_from(["texprep", "texture", "--hash", "nothex!!"]).is_err());
    }

    #[test]
    fn test_folders_add_requires_paths() {
        assert!(Cli::try_parse_from(["texprep", "folders", "add"]).is_err());
        match parse(&["folders", "clear", "--yes"]).command {
            Command::Folders {
                action: FoldersAction::Clear { yes },
            } => assert!(yes),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_stitch_overrides() {
        let cli = parse(&[
            "--config", "custom.toml", "stitch", "out", "--rows", "2", "--fill", "#000000",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        match cli.command {
            Command::Stitch { rows, cols, fill, .. } => {
                assert_eq!(rows, Some(2));
                assert_eq!(cols, None);
                assert_eq!(fill, Some(Color::BLACK));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_missing_config_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(dir.path().join("none.toml").as_path())).is_err());
    }
}
