use clap::Parser;

mod commands;
mod output;

use commands::run::RunArgs;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "tfbench")]
#[command(version = VERSION)]
#[command(about = "Benchmark Terraform commands across provider versions")]
struct Cli {
    #[command(flatten)]
    run: RunArgs,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let exit_code = output::print_result(commands::run::run(cli.run));
    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
