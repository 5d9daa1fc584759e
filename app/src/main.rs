use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use common::hexfile::HexFile;
use common::*;
use log::info;
use ucode::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Hex,
    Binary,
}

#[derive(Parser)]
#[command(name = "romgen")]
#[command(version)]
#[command(about = "Generates control-logic microcode ROM images", long_about = None)]
struct Cli {
    /// Build profile
    #[arg(short, long, default_value_t = Profile::Agc)]
    profile: Profile,

    /// Output file prefix (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Hex)]
    format: Format,

    /// Print the microprogram table instead of the image
    #[arg(long)]
    dump: bool,

    /// Trace every emitted step
    #[arg(short, long)]
    verbose: bool,
}

fn chip_path(prefix: &Path, chip: Option<usize>, format: Format) -> PathBuf {
    let ext = match format {
        Format::Hex => "hex",
        Format::Binary => "bin",
    };
    let mut name = prefix.as_os_str().to_owned();
    match chip {
        Some(i) => name.push(format!(".{}.{}", i, ext)),
        None => name.push(format!(".{}", ext)),
    }
    PathBuf::from(name)
}

fn hex_header(hex: &mut HexFile, build: &UcodeBuild, profile: Profile) {
    hex.comment(&format!("profile:{} hash:{:08x}", profile, build.rom.hash()));
    for line in build.partition.describe() {
        hex.comment(&line);
    }
}

fn write_chip<W: Write>(w: W, build: &UcodeBuild, profile: Profile, chip: Option<usize>, rom: &RomImage, format: Format) -> io::Result<()> {
    match format {
        Format::Binary => {
            let mut w = w;
            w.write_all(rom.bytes())?;
            w.flush()
        }
        Format::Hex => {
            let mut hex = HexFile::default();
            hex_header(&mut hex, build, profile);
            if let Some(i) = chip {
                hex.comment(&format!("chip {} of {}", i, build.rom.chips().len()));
            }
            hex.push_bytes(rom.bytes());
            hex.write(w)
        }
    }
}

/// The whole logical image as one stream, chips back to back under a single
/// header.
fn write_image<W: Write>(w: W, build: &UcodeBuild, profile: Profile, format: Format) -> io::Result<()> {
    match format {
        Format::Binary => {
            let mut w = w;
            w.write_all(&build.rom.concat())?;
            w.flush()
        }
        Format::Hex => {
            let chips = build.rom.chips();
            let mut hex = HexFile::default();
            hex_header(&mut hex, build, profile);
            for (i, rom) in chips.iter().enumerate() {
                if chips.len() > 1 {
                    hex.comment(&format!("chip {} of {}", i, chips.len()));
                }
                hex.push_bytes(rom.bytes());
            }
            hex.write(w)
        }
    }
}

fn dump(set: &dyn InstructionSet, build: &UcodeBuild) {
    let config = set.config();
    let base = match build.table.table(0) {
        Some(t) => t,
        None => return,
    };

    for (signal, bit) in build.catalog.iter() {
        println!("# bit {:2} {:4} {}", bit, signal, signal.description());
    }

    for flags in 0..build.table.combinations() {
        let table = match build.table.table(flags) {
            Some(t) => t,
            None => continue,
        };
        for opcode in 0..table.len() {
            let program = match table.program(opcode) {
                Some(p) => p,
                None => continue,
            };
            if flags != 0 && Some(program) == base.program(opcode) {
                continue;
            }

            let name = set.mnemonic(opcode as u8).unwrap_or_else(|| "-".to_owned());
            let steps: Vec<String> = program.steps()[..program.semantic_len()]
                .iter()
                .map(|w| build.catalog.format(*w))
                .collect();
            println!("[{}] {:02x} {:6} {}", config.describe_flags(flags), opcode, name, steps.join(", "));
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let set = instruction_set(cli.profile);
    let build = ucode(set.as_ref(), cli.verbose)?;

    if cli.dump {
        dump(set.as_ref(), &build);
        return Ok(());
    }

    let chips = build.rom.chips();
    let split = chips.len() > 1;

    match &cli.output {
        Some(prefix) => {
            for (i, rom) in chips.iter().enumerate() {
                let chip = if split { Some(i) } else { None };
                let path = chip_path(prefix, chip, cli.format);
                let file = BufWriter::new(File::create(&path)?);
                write_chip(file, &build, cli.profile, chip, rom, cli.format)?;
                info!("wrote {} ({} bytes)", path.display(), rom.len());
            }
        }
        None => write_image(io::stdout().lock(), &build, cli.profile, cli.format)?,
    }

    Ok(())
}
