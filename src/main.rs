use spelltip::from_json::request_from_json;
use spelltip::{render, RenderMode};

use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .with_writer(io::stderr)
        .init();

    let mut input = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut input) {
        eprintln!("ERROR: failed to read stdin: {}", err);
        std::process::exit(1);
    }

    let request = match request_from_json(&input) {
        Ok(request) => request,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    };

    let output = render(&request);
    if request.mode == RenderMode::Validate && !output.is_empty() {
        eprintln!("{}", output);
        std::process::exit(1);
    }
    println!("{}", output);
}
