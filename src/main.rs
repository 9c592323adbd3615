use clap::Parser;
use minish::config::{self, ShellConfig};
use minish::flags::Flags;
use minish::shell::Shell;
use std::process;

fn main() {
    let flags = Flags::parse();
    config::init_logging();

    let shell_config = ShellConfig::from_flags(&flags);
    let mut shell = match Shell::new(shell_config) {
        Ok(shell) => shell,
        Err(e) => {
            eprintln!("minish: {}", e);
            process::exit(1);
        }
    };

    process::exit(shell.run());
}
