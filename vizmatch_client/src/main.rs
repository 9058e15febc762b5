use std::{fs, path::Path, thread};

use ctrlc::set_handler;
use pico_args::Arguments;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc::{Receiver, Sender};
use vizmatch::Product;

mod models;

use models::{
    client::{MatcherClient, SearchError},
    input,
    repl::{ServerRequest, ServerResponse, UserRequest},
    session::{NO_MATCHES_ADVISORY, SearchSession, SearchStatus, SessionView},
};

/// Loop for talking to the relay. Waits for a request, performs the single
/// gateway call, and reports the one completion event back with the request
/// id so stale completions can be dropped by the session.
async fn client(url: String, mut rx: Receiver<ServerRequest>, tx: Sender<ServerResponse>) {
    let matcher = MatcherClient::new(&url);

    while let Some(request) = rx.recv().await {
        let response = match request {
            ServerRequest::Search { id, request } => {
                let outcome = matcher.search(&request).await;
                ServerResponse::Search { id, outcome }
            }
            ServerRequest::Health => ServerResponse::Health(matcher.health().await),
        };
        tx.send(response)
            .await
            .expect("server response channel full");
    }
}

const COMMANDS: &str = "\
COMMANDS:
  file <path>      Search with a local image file
  url <link>       Search with an image URL
  threshold <t>    Set the minimum similarity in [0, 1]
  results          Re-print the current filtered results
  health           Check whether the relay is reachable
  help             Print this help
  quit             Exit
";

/// Turn one input line into a request for the main loop. Local rejections
/// (bad file type, blank input, unreadable files) come back as printable
/// messages and never leave the terminal.
fn read_command(line: &str) -> Result<UserRequest, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(SearchError::EmptyInput.to_string());
    }
    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed, ""),
    };
    match command {
        "file" => {
            let path = Path::new(rest);
            let media_type = input::media_type_for(path)
                .ok_or_else(|| SearchError::InvalidFileType.to_string())?;
            let bytes =
                fs::read(path).map_err(|err| format!("Could not read {rest}: {err}"))?;
            let request =
                input::normalize_file(media_type, &bytes).map_err(|err| err.to_string())?;
            Ok(UserRequest::Search {
                preview: rest.to_string(),
                request,
            })
        }
        "url" => {
            let request = input::normalize_url(rest).map_err(|err| err.to_string())?;
            Ok(UserRequest::Search {
                preview: rest.trim().to_string(),
                request,
            })
        }
        "threshold" => {
            // "nan" and "inf" parse as f64, so finiteness needs its own check.
            let threshold = rest
                .parse::<f64>()
                .ok()
                .filter(|threshold| threshold.is_finite())
                .ok_or_else(|| format!("Not a similarity threshold: {rest}"))?;
            Ok(UserRequest::SetThreshold(threshold))
        }
        "results" => Ok(UserRequest::ShowResults),
        "health" => Ok(UserRequest::Health),
        _ => Err(format!("Unknown command: {command}. Try 'help'.")),
    }
}

/// User REPL loop. Commands that only need local handling are resolved
/// right here; everything else is handed to the main loop, and this REPL is
/// inactive until the main loop hands the prompt back.
fn repl(mut rx: Receiver<()>, tx: Sender<UserRequest>) -> Result<(), ReadlineError> {
    let mut rl = DefaultEditor::new()?;
    println!("Visual product matcher. Type 'help' for commands.");

    while rx.blocking_recv().is_some() {
        loop {
            match rl.readline(">> ") {
                Ok(input) => {
                    let trimmed = input.trim();
                    if trimmed == "quit" || trimmed == "exit" {
                        std::process::exit(0);
                    }
                    if trimmed == "help" {
                        println!("{COMMANDS}");
                        continue;
                    }
                    match read_command(&input) {
                        Ok(request) => {
                            tx.blocking_send(request).expect("user request channel full");
                            break;
                        }
                        Err(message) => println!("{message}"),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    std::process::exit(0);
                }
                _ => {}
            }
        }
    }
    Ok(())
}

/// For catching user interrupts while a search is in flight. If no search
/// is active, the interrupt handling inside the REPL takes precedence.
fn ctrlc_handler(tx: Sender<UserRequest>) -> Result<(), ctrlc::Error> {
    set_handler(move || {
        tx.blocking_send(UserRequest::Cancel)
            .expect("user request interrupt channel full");
    })?;

    thread::park();

    Ok(())
}

fn print_products(session: &SearchSession, products: &[Product]) {
    if let Some(preview) = session.query_preview() {
        println!("Query: {preview}");
    }
    println!(
        "{} of {} matches at threshold {:.2}",
        products.len(),
        session.results().len(),
        session.threshold()
    );
    for product in products {
        println!(
            "  {:>5.1}%  {} [{}]  {}",
            product.similarity * 100.0,
            product.name,
            product.category,
            product.id
        );
    }
}

/// Exactly one of {result listing, no-matches advisory, error banner} is
/// printed for a settled search.
fn print_view(session: &SearchSession) {
    match session.view() {
        SessionView::Idle => {}
        SessionView::Loading => println!("Searching..."),
        SessionView::Results(products) => print_products(session, &products),
        SessionView::NoMatches => println!("{NO_MATCHES_ADVISORY}"),
        SessionView::Error(message) => println!("Error: {message}"),
    }
}

const HELP: &str = "\
Search a product catalog by image

USAGE:
  vizmatch_client [OPTIONS]

OPTIONS:
  --url     Relay server base URL  [default: http://127.0.0.1:5000]

FLAGS:
  -h, --help    Print help information
";


/// Minimal REPL
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        println!("{}", HELP);
        std::process::exit(0);
    }

    let url: String = pargs
        .value_from_str("--url")
        .unwrap_or("http://127.0.0.1:5000".into());

    // Channels for all the IPC going on.
    let (start_repl_sender, start_repl_receiver) = tokio::sync::mpsc::channel(1);
    let (user_request_sender, mut user_request_receiver): (
        Sender<UserRequest>,
        Receiver<UserRequest>,
    ) = tokio::sync::mpsc::channel(1);
    let ctrlc_user_request_sender = user_request_sender.clone();
    let (server_request_sender, server_request_receiver): (
        Sender<ServerRequest>,
        Receiver<ServerRequest>,
    ) = tokio::sync::mpsc::channel(1);
    let (server_response_sender, mut server_response_receiver): (
        Sender<ServerResponse>,
        Receiver<ServerResponse>,
    ) = tokio::sync::mpsc::channel(1);

    // Begin background processes.
    thread::spawn(|| repl(start_repl_receiver, user_request_sender));
    tokio::spawn(client(url, server_request_receiver, server_response_sender));
    thread::spawn(|| ctrlc_handler(ctrlc_user_request_sender));

    // Kick-off the user prompt.
    start_repl_sender.send(()).await?;

    // Main loop. The session is the single owner of search state; the REPL
    // and the relay client only talk to it through the channels above.
    let mut session = SearchSession::new();
    loop {
        tokio::select! {
            Some(user_request) = user_request_receiver.recv() => {
                match user_request {
                    UserRequest::Search { preview, request } => {
                        let id = session.submit(preview);
                        print_view(&session);
                        server_request_sender
                            .send(ServerRequest::Search { id, request })
                            .await?;
                        // Prompt stays parked until the completion arrives.
                    }
                    UserRequest::SetThreshold(threshold) => {
                        session.set_threshold(threshold);
                        println!(
                            "Minimum similarity set to {:.2}",
                            session.threshold()
                        );
                        if session.status() == SearchStatus::Success {
                            print_view(&session);
                        }
                        start_repl_sender.send(()).await?;
                    }
                    UserRequest::ShowResults => {
                        print_view(&session);
                        start_repl_sender.send(()).await?;
                    }
                    UserRequest::Health => {
                        server_request_sender.send(ServerRequest::Health).await?;
                    }
                    UserRequest::Cancel => {
                        if session.status() == SearchStatus::Loading {
                            session.cancel();
                            println!("Search cancelled.");
                            start_repl_sender.send(()).await?;
                        }
                    }
                }
            }
            Some(server_response) = server_response_receiver.recv() => {
                match server_response {
                    ServerResponse::Search { id, outcome } => {
                        // A stale completion means the search was cancelled or
                        // superseded; the prompt was already handed back then.
                        if session.complete(id, outcome) {
                            print_view(&session);
                            start_repl_sender.send(()).await?;
                        }
                    }
                    ServerResponse::Health(ok) => {
                        if ok {
                            println!("Server is reachable.");
                        } else {
                            println!("Server is unreachable.");
                        }
                        start_repl_sender.send(()).await?;
                    }
                }
            }
        }
    }
}
