mod format;
mod logging;

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use devtree_host_macos::{
    build_disk_report, capture_ioreg_archive, host_info, list_processes, resolve_config,
    EnumerationConfig, RegistrySource,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "devtree", version, about = "Disks and partitions from the hardware registry")]
struct Cli {
    /// JSON config file (defaults to $DEVTREE_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging; repeat for more
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List disks and partitions
    Disks {
        /// Read a captured `ioreg -a` archive instead of the live registry
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
        /// Pretty-print JSON
        #[arg(long, requires = "json")]
        pretty: bool,
    },
    /// Print operating system version and machine model
    Os,
    /// List running processes and their executable paths
    Processes,
    /// Disks, operating system and processes in one run
    All {
        /// Read a captured `ioreg -a` archive instead of the live registry
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Save an `ioreg -a -l` archive for later `disks --snapshot`
    Capture {
        #[arg(long, short)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut config = resolve_config(cli.config.as_deref())?;
    logging::init(&config.log_level, cli.verbose);

    match command {
        Command::Disks {
            snapshot,
            json,
            pretty,
        } => {
            if let Some(path) = snapshot {
                config.source = RegistrySource::Snapshot(path);
            }
            if json {
                let report = build_disk_report(&config)?;
                println!("{}", report.to_json(pretty)?);
                return Ok(());
            }
            print_disks(&config)
        }
        Command::Os => {
            print_os();
            Ok(())
        }
        Command::Processes => print_processes(),
        Command::All { snapshot } => {
            if let Some(path) = snapshot {
                config.source = RegistrySource::Snapshot(path);
            }
            print_disks(&config)?;
            print_os();
            print_processes()
        }
        Command::Capture { output } => {
            let archive = capture_ioreg_archive()?;
            std::fs::write(&output, &archive)
                .with_context(|| format!("write {}", output.display()))?;
            info!(bytes = archive.len(), path = %output.display(), "registry snapshot saved");
            println!("snapshot: {}", output.display());
            Ok(())
        }
    }
}

fn print_disks(config: &EnumerationConfig) -> Result<()> {
    let report = build_disk_report(config)?;
    println!("Disk Info:");
    for serial in &report.serial_numbers {
        println!("    Serial Number: {serial}");
    }
    for disk in &report.disks {
        println!("    {}", format::disk_line(disk));
    }
    println!();
    Ok(())
}

fn print_os() {
    let host = host_info();
    println!("Operating System: {}", format::os_version(&host.os_version));
    println!("Machine: {}", host.machine);
    println!();
}

fn print_processes() -> Result<()> {
    let processes = list_processes()?;
    println!("All Running Processes (Total: {}):", processes.len());
    for process in &processes {
        println!("    {}", format::process_line(process));
    }
    Ok(())
}
