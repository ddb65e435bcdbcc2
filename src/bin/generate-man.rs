use clap::CommandFactory;
use std::path::PathBuf;
use taskboard::cli::Cli;

/// Write taskboard.1 (and one page per subcommand) into the given directory,
/// or the current directory when none is given.
fn main() -> anyhow::Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)?;

    let cmd = Cli::command();
    let mut buffer: Vec<u8> = Vec::new();
    clap_mangen::Man::new(cmd.clone()).render(&mut buffer)?;
    std::fs::write(out_dir.join("taskboard.1"), &buffer)?;

    for sub in cmd.get_subcommands() {
        let name = format!("taskboard-{}", sub.get_name());
        let mut buffer: Vec<u8> = Vec::new();
        clap_mangen::Man::new(sub.clone()).render(&mut buffer)?;
        std::fs::write(out_dir.join(format!("{}.1", name)), &buffer)?;
    }

    println!("Wrote man pages to {}", out_dir.display());
    Ok(())
}
