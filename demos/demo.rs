//! Loads the configuration under `demos/config`, then reads, converts and
//! writes values through a shared application context.
//!
//! Run with `RUST_LOG=dynstore=debug cargo run --example demo`; set
//! `DYNSTORE_RUNMODE=prod` to load `demos/config/prod` instead of `dev`.

use dynstore::value::{convert, Lookup};
use dynstore::config::RUN_MODE_VAR;
use dynstore::{AppContext, Config, Kind, Value};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Pool {
    name: String,
    size: u32,
}

fn main() -> Result<(), dynstore::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dynstore=info")),
        )
        .init();

    let root = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/config");
    let store = Config::builder()
        .with_file(format!("{root}/default.toml"), true)
        .with_run_mode_dir(root, RUN_MODE_VAR)
        .with_env("DYNSTORE", "__")
        .build()?;

    let ctx = AppContext::builder().with_config(store).build()?;
    let settings = ctx.settings();
    println!(
        "{} {} ({}), http on {}",
        settings.app_name, settings.app_version, settings.run_mode, settings.http_addr
    );

    {
        let store = ctx.read();
        println!("api url: {}", store.get("server.url").as_string());

        let port = store.get("database.primary.port");
        println!("database port: {} ({})", port.as_int(), port.kind());

        match store.get("database.primary.port").try_as::<Vec<i64>>() {
            Lookup::Found(ports) => println!("ports: {ports:?}"),
            Lookup::NotFound => println!("no port configured"),
            Lookup::Unsupported(kind) => println!("port is a {kind}, not a list"),
        }

        let pools: Vec<Pool> = store.extract("database.primary.pools")?;
        for pool in &pools {
            println!("pool {} holds {} connections", pool.name, pool.size);
        }
    }

    ctx.update(|store| {
        store.set("features.tags.2", "gamma");
        store.set("features.limits.max", 3.9);
    });

    let strict = ctx.update(|store| store.try_set("features.tags.9", "late"));
    if let Err(err) = strict {
        println!("strict write refused: {err}");
    }

    let store = ctx.read();
    println!("tags: {:?}", store.get("features.tags").as_string_seq());
    println!(
        "max as int: {:?}",
        convert(store.get("features.limits.max").value(), Kind::Int)
    );
    println!(
        "unknown path reads as {:?}",
        store.get("features.nothing.here").value() == &Value::Nil
    );

    Ok(())
}
