//! Print a sample label with the JSON dialect
//!
//! The transport is read from `PRINT_LABEL_TRANSPORT` as JSON, e.g.
//! `{"type": "tcp", "host": "192.168.1.100"}`. Defaults to stdout.
//!
//! ```bash
//! RUST_LOG=debug cargo run -p print-label --example print_json
//! ```

use print_label::{Json, Label, PrintResult, TransportConfig, Unit, print_label};
use tracing_subscriber::EnvFilter;

fn main() -> PrintResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::var("PRINT_LABEL_TRANSPORT") {
        Ok(json) => TransportConfig::from_json(&json)?,
        Err(_) => TransportConfig::default(),
    };

    let mut label = Label::new(50.0, 25.0, Unit::Millimeters);
    label.create_field(2.0, 2.0, Some("title"))?;
    label.create_field(2.0, 10.0, None)?;
    label.create_field(2.0, 18.0, None)?;

    let mut conn = config.build()?;
    print_label(&label, &Json::pretty(), &mut conn)?;
    if config == TransportConfig::Stdout {
        println!();
    }
    Ok(())
}
