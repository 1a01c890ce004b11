//! Login prompt.

use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::History;

use pawfinder_application::PawfinderApp;

use crate::helper::CliHelper;

/// Prompts until the user signs in. Returns `Ok(false)` if they leave instead.
pub async fn sign_in<H: History>(
    rl: &mut Editor<CliHelper, H>,
    app: &PawfinderApp,
) -> rustyline::Result<bool> {
    println!("{}", "Please sign in to browse dogs.".bright_yellow());

    loop {
        let Some(name) = ask(rl, "Name: ")? else {
            return Ok(false);
        };
        let Some(email) = ask(rl, "Email: ")? else {
            return Ok(false);
        };

        match app.login(&name, &email).await {
            Ok(()) => {
                println!("{}", format!("Welcome, {}!", name.trim()).bright_green());
                return Ok(true);
            }
            Err(e) if e.is_retryable() => println!("{}", e.to_string().red()),
            Err(e) => println!("{}", e.to_string().yellow()),
        }
    }
}

/// Reads one line. `None` on Ctrl-D or a quit word.
fn ask<H: History>(rl: &mut Editor<CliHelper, H>, prompt: &str) -> rustyline::Result<Option<String>> {
    loop {
        match rl.readline(prompt) {
            Ok(line) if matches!(line.trim(), "quit" | "exit") => return Ok(None),
            Ok(line) => return Ok(Some(line)),
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => return Ok(None),
            Err(err) => return Err(err),
        }
    }
}

/// Asks a yes/no question. Anything but an explicit yes is a no.
pub fn confirm<H: History>(rl: &mut Editor<CliHelper, H>, question: &str) -> bool {
    match rl.readline(&format!("{} (yes/no) ", question)) {
        Ok(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
