// Copyright 2019 Colin Finck <colin@reactos.org>
// SPDX-License-Identifier: GPL-2.0-or-later

use nt_reg::*;
use std::env;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), RegistryError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Usage: regquery <KEY PATH>");
        return Ok(());
    }

    let gateway = StoreGateway::system();
    let key = gateway.fetch_key(&args[1])?;

    println!("{}", key.path());
    if let Some(default_value) = key.default_value() {
        println!("  (Default) {}: {:?}", default_value.value_type(), default_value.data());
    }

    for value in key.values() {
        println!("  {} {}: {:?}", value.name(), value.value_type(), value.data());
    }

    for child in key.children() {
        println!("  [{}]", leaf_name(child));
    }

    Ok(())
}
