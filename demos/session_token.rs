//! Issue and verify session tokens from the command line.
//!
//! Loads `.env` automatically if present, otherwise reads from the environment.
//!
//! ```bash
//! cargo run --example session_token -- secret
//! cargo run --example session_token -- generate PlayerOne
//! cargo run --example session_token -- verify eyJhbG...
//! ```

use bingus_session::{build_session_payload, verify_session_token, SessionConfig, SessionSecret};
use tracing_subscriber::EnvFilter;

fn main() {
    // Load .env if present; silently ignore if absent.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        usage();
    }

    if args[0] == "secret" {
        println!("{}", SessionSecret::generate(48));
        return;
    }

    let config = match SessionConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match args[0].as_str() {
        "generate" => {
            let subject = args.get(1).unwrap_or_else(|| usage());
            let payload = build_session_payload(subject, &config);
            match serde_json::to_string_pretty(&payload) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
        "verify" => {
            let token = args.get(1).map(String::as_str);
            match verify_session_token(token, &config) {
                Ok(c) => {
                    println!("Valid\n");
                    println!("  sub : {}", c.sub);
                    println!("  iat : {}", c.iat);
                    match c.exp {
                        Some(exp) => println!("  exp : {exp}"),
                        None => println!("  exp : never"),
                    }
                }
                Err(e) => {
                    eprintln!("Failed: {} ({e})", e.as_str());
                    std::process::exit(1);
                }
            }
        }
        _ => usage(),
    }
}

fn usage() -> ! {
    eprintln!("Usage:");
    eprintln!("  cargo run --example session_token -- secret");
    eprintln!("  cargo run --example session_token -- generate <username>");
    eprintln!("  cargo run --example session_token -- verify  <token>");
    std::process::exit(1);
}
