use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use csved::cli::{Args, expand_path};
use csved::controller::Controller;
use csved::ui::TableUI;
use csved::{AppError, Model, Status, logging};

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = logging::init(&args.log_path()) {
        eprintln!("Error: could not create log file: {e}");
        return ExitCode::FAILURE;
    }

    let result = run(args);
    ratatui::restore();
    match result {
        Err(e) => {
            error!("Exiting with error: {e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn run(args: Args) -> Result<(), AppError> {
    info!("Starting csved!");
    let config = args.config();

    let mut terminal = ratatui::init();
    let size = terminal.size()?;
    let mut model = Model::init(&config, size.width as usize, size.height as usize)?;
    if let Some(path) = &args.path {
        model.open(expand_path(path));
    }

    let ui = TableUI::new();
    let controller = Controller::new(&config);

    while model.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|f| ui.draw(model.get_uidata(), f))?;

        // Handle events and map to a Message
        let message = controller.handle_event(&model)?;
        model.update(message)?;
    }

    info!("Bye!");
    Ok(())
}
