use readmegen::cli;
use readmegen::error::Error;
use readmegen::logger;
use readmegen::ui;

#[tokio::main]
async fn main() {
    if let Err(e) = logger::init() {
        eprintln!("Failed to initialize logging: {e}");
    }

    if let Err(e) = cli::main().await {
        if ui::is_debug_mode() {
            // Alternate debug formatting prints the full cause chain
            ui::print_error(&format!("Error: {e:?}"));
        } else {
            ui::print_error(&format!("Error: {e}"));
        }

        // Stable exit codes: 2 configuration, 3 filesystem, 1 everything else
        let code = e
            .downcast_ref::<Error>()
            .map_or(1, Error::exit_code);
        std::process::exit(code);
    }
}
