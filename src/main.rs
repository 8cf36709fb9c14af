use colored::Colorize;
use machine_report::cli::{self, commands::report_command};

fn main() {
    let args = cli::parse_args();

    if let Err(e) = report_command::handle_report(args) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
