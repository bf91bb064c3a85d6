//! Watch Face Resource CLI Utility
//!
//! A command-line tool for packing, unpacking and checking DT NO.1 /
//! ATS3085-S watch face resources.
//!
//! # Features
//!
//! - **pack**: Pack a watch face source directory into a `Clock*_res` container
//! - **unpack**: Unpack a container back into images and a `config.json`
//! - **batch-unpack**: Unpack every container in a folder matching a pattern
//! - **check**: Validate a source directory without packing
//!
//! # Usage
//!
//! ```bash
//! # Pack a source folder (clock id taken from the folder name)
//! clockres pack faces/MyFace_50001
//!
//! # Pack with explicit options
//! clockres pack faces/MyFace --clock-id 50001 --face-size 466_466 --no-lz4
//!
//! # Unpack a container
//! clockres unpack Clock50001_res
//!
//! # Unpack a whole folder of containers
//! clockres batch-unpack firmware_dump/
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use clockres_rs::clockres_pack::{
	PackError, PackOptions, SourceDir, UnpackOptions, default_out_dir, pack, unpack, unpack_batch,
	validate,
};
use clockres_rs::clockres_types::file::{Resolution, config};

#[derive(Parser)]
#[command(name = "clockres")]
#[command(author = "clockres-rs project")]
#[command(version = "1.0")]
#[command(about = "DT NO.1 / ATS3085-S watch face resource utility", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Pack a watch face source directory into a Clock*_res container
	Pack {
		/// Source folder containing config.json and layer images
		#[arg(value_name = "SOURCE_DIR")]
		src: PathBuf,

		/// Clock id (50000..65535); extracted from the folder name if omitted
		#[arg(long)]
		clock_id: Option<u32>,

		/// Watch face size (e.g. 466_466); detected from the first layer image if omitted
		#[arg(long)]
		face_size: Option<Resolution>,

		/// Thumbnail image path, overriding filename-based detection
		#[arg(long)]
		thumbnail: Option<PathBuf>,

		/// Disable LZ4 compression of device-RGB chunks
		#[arg(long)]
		no_lz4: bool,

		/// Use the idle-screen magic string instead of the default
		#[arg(long)]
		idle: bool,

		/// Output directory
		#[arg(long, default_value = ".")]
		out: PathBuf,
	},

	/// Unpack a Clock*_res container into images and a config.json
	Unpack {
		/// Container file to unpack
		#[arg(value_name = "RES_FILE")]
		src: PathBuf,

		/// Output directory (default: <name>_unpacked next to the container)
		#[arg(short, long)]
		out: Option<PathBuf>,

		/// Minimum length to treat an (offset, length) pair as an image chunk
		#[arg(long, default_value_t = 16)]
		min_chunk_len: u32,

		/// Assumed count for dataType 112 area_num lists
		#[arg(long, default_value_t = 4)]
		area_num_count: u32,
	},

	/// Unpack every container in a folder matching a pattern
	BatchUnpack {
		/// Folder containing Clock*_res files
		#[arg(value_name = "FOLDER")]
		folder: PathBuf,

		/// Glob pattern to match resource files
		#[arg(short, long, default_value = "Clock*_res")]
		pattern: String,

		/// Output root (default: *_unpacked next to each source)
		#[arg(short, long)]
		out_root: Option<PathBuf>,

		/// Minimum length to treat an (offset, length) pair as an image chunk
		#[arg(long, default_value_t = 16)]
		min_chunk_len: u32,

		/// Assumed count for dataType 112 area_num lists
		#[arg(long, default_value_t = 4)]
		area_num_count: u32,
	},

	/// Validate a source directory without packing
	Check {
		/// Source folder containing config.json and layer images
		#[arg(value_name = "SOURCE_DIR")]
		src: PathBuf,
	},
}

fn handle_pack(
	src: PathBuf,
	clock_id: Option<u32>,
	face_size: Option<Resolution>,
	thumbnail: Option<PathBuf>,
	no_lz4: bool,
	idle: bool,
	out: PathBuf,
) -> anyhow::Result<()> {
	let options = PackOptions {
		clock_id_base: clock_id,
		resolution: face_size,
		thumbnail,
		compress: !no_lz4,
		idle,
	};

	let outcome = pack(&src, &out, &options)?;
	println!(
		"✓ Packed {} -> {} (clock id 0x{:08X}, {} bytes)",
		src.display(),
		outcome.path.display(),
		outcome.clock_id,
		outcome.file_size,
	);
	Ok(())
}

fn handle_unpack(
	src: PathBuf,
	out: Option<PathBuf>,
	min_chunk_len: u32,
	area_num_count: u32,
) -> anyhow::Result<()> {
	let out_dir = out.unwrap_or_else(|| default_out_dir(&src));
	let options = UnpackOptions {
		min_chunk_len,
		area_num_count,
	};

	let outcome = unpack(&src, &out_dir, &options)?;
	println!(
		"✓ Unpacked {} -> {} ({} layers, {} images)",
		src.display(),
		outcome.out_dir.display(),
		outcome.layer_count,
		outcome.image_count,
	);
	Ok(())
}

fn handle_batch_unpack(
	folder: PathBuf,
	pattern: String,
	out_root: Option<PathBuf>,
	min_chunk_len: u32,
	area_num_count: u32,
) -> anyhow::Result<()> {
	let options = UnpackOptions {
		min_chunk_len,
		area_num_count,
	};

	let outcomes = unpack_batch(&folder, &pattern, out_root.as_deref(), &options)?;
	println!("✓ Unpacked {} container(s) from {}", outcomes.len(), folder.display());
	Ok(())
}

fn handle_check(src: PathBuf) -> anyhow::Result<()> {
	let source = SourceDir::scan(&src)?;
	let config_path = source.config_path();
	if !config_path.is_file() {
		return Err(PackError::ConfigMissing(config_path).into());
	}
	let layers = config::parse(&std::fs::read(&config_path)?)?;

	let report = validate(&layers, &source);
	if report.is_ok() {
		println!("✓ {} is valid ({} layers)", src.display(), layers.len());
		Ok(())
	} else {
		Err(PackError::Validation(report).into())
	}
}

fn main() {
	// Initialize logger with default level set to info if RUST_LOG is not set
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();

	let result = match cli.command {
		Commands::Pack {
			src,
			clock_id,
			face_size,
			thumbnail,
			no_lz4,
			idle,
			out,
		} => handle_pack(src, clock_id, face_size, thumbnail, no_lz4, idle, out),

		Commands::Unpack {
			src,
			out,
			min_chunk_len,
			area_num_count,
		} => handle_unpack(src, out, min_chunk_len, area_num_count),

		Commands::BatchUnpack {
			folder,
			pattern,
			out_root,
			min_chunk_len,
			area_num_count,
		} => handle_batch_unpack(folder, pattern, out_root, min_chunk_len, area_num_count),

		Commands::Check {
			src,
		} => handle_check(src),
	};

	if let Err(e) = result {
		log::error!("{e}");
		std::process::exit(2);
	}
}
