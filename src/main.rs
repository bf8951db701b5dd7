use kuroneko::logger::{self, LoggerConfig};
use kuroneko::{Config, ImageClient, SubmitOutcome, UiController};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  style <tag>       default, ghibli, cyberpunk, anime, portrait, chibi, pixel art, oil painting, 3d
  size <key>        1:1, 3:2, 2:3
  prompt <text>     set the prompt
  generate [text]   generate an image (optionally setting the prompt first)
  download          save the current image
  reset             clear everything
  show              redraw the page
  help              this text
  quit";

fn print_page(ui: &UiController, colors: bool) {
    println!("{}", ui.view().to_terminal(colors));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let config = Config::from_env();

    logger::init_with_config(LoggerConfig::from_app_config(&config))?;
    if dotenv_loaded {
        log::info!("✅ .env file loaded");
    } else {
        log::debug!("No .env file found, using system environment variables");
    }
    logger::log_startup_info("kuroneko", env!("CARGO_PKG_VERSION"), &config);

    let client = match ImageClient::new(&config.deepimg) {
        Ok(client) => client,
        Err(e) => {
            log::error!("❌ Failed to create DeepImg client: {}", e);
            return Err(e.into());
        }
    };
    let ui = Arc::new(UiController::new(Arc::new(client), &config));
    let colors = colored::control::SHOULD_COLORIZE.should_colorize();

    println!("{}\n", HELP);
    print_page(&ui, colors);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, arg) = match line.split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command {
            "" => continue,
            "style" => match ui.select_style_tag(arg) {
                Ok(_) => print_page(&ui, colors),
                Err(e) => println!("{}", e),
            },
            "size" => match ui.select_size_key(arg) {
                Ok(_) => print_page(&ui, colors),
                Err(e) => println!("{}", e),
            },
            "prompt" => {
                ui.set_prompt(arg);
                print_page(&ui, colors);
            }
            "generate" | "go" => {
                if !arg.is_empty() {
                    ui.set_prompt(arg);
                }
                if !ui.view().submit_enabled {
                    println!("⏳ A generation is already running");
                    continue;
                }

                let task_ui = Arc::clone(&ui);
                tokio::spawn(async move {
                    match task_ui.submit().await {
                        SubmitOutcome::Succeeded { url } => log::info!("Result: {}", url),
                        SubmitOutcome::Cancelled => return,
                        _ => {}
                    }
                    print_page(&task_ui, colors);
                });
                print_page(&ui, colors);
            }
            "download" => match ui.download(&config.download_dir).await {
                Ok(Some(path)) => println!("💾 Saved {}", path.display()),
                Ok(None) => println!("No image to download yet"),
                Err(e) => log::error!("❌ Download failed: {}", e),
            },
            "reset" => {
                ui.reset();
                print_page(&ui, colors);
            }
            "show" => print_page(&ui, colors),
            "help" => println!("{}", HELP),
            "quit" | "exit" => break,
            other => println!("Unknown command '{}', try 'help'", other),
        }
    }

    ui.dispose();
    log::info!("👋 Bye");
    Ok(())
}
