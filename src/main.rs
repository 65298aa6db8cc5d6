//! latplot - plot the latency CDF of a benchmark log

use clap::Parser;
use latency_cdf::{
    app::App,
    cli::Cli,
    error::{AppError, ErrorReporter, Result},
};
use std::process;

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        eprintln!("Please report this issue with the command line and input log that triggered it.");
        process::exit(AppError::internal("panic").exit_code());
    }));

    let cli = Cli::parse();
    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose);

    if let Err(e) = run_application(cli) {
        reporter.report_error(&e);
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
fn run_application(cli: Cli) -> Result<()> {
    if cli.should_show_topic_help() {
        println!("{}", cli.display_help());
        return Ok(());
    }

    let mut app = App::from_cli(cli)?;
    app.run()?;
    Ok(())
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::EmptyResult(_) => {
            eprintln!();
            eprintln!("No latency lines found:");
            eprintln!("  - Lines must contain 'took <N> us' or end in ';<N>'");
            eprintln!("  - Check that the log is the benchmark output, not a summary");
            eprintln!("  - Run 'latplot --help-topic patterns' for details");
        }
        AppError::Io(_) => {
            eprintln!();
            eprintln!("File troubleshooting:");
            eprintln!("  - Check that the input path exists and is readable");
            eprintln!("  - Check that the output directory exists and is writable");
        }
        AppError::Render(_) => {
            eprintln!();
            eprintln!("Rendering help:");
            eprintln!("  - Try a smaller --width/--height");
            eprintln!("  - Pass a different font with --font");
        }
        _ => {}
    }
}
