//! Generates the protocol constants and constructors from the bundled
//! AMQP type documents, plus the map-encoded fixture used by `tests/`.

use anyhow::Context;
use std::env;
use std::path::{Path, PathBuf};

const DOCUMENTS: &[&str] = &["schema/transport.xml", "schema/messaging.xml"];
const FIXTURES: &[&str] = &["tests/fixtures/settings.xml"];

fn generate(documents: &[&str], out_dir: &Path) -> anyhow::Result<()> {
    for document in documents {
        println!("cargo::rerun-if-changed={document}");
    }

    let paths: Vec<&Path> = documents.iter().map(Path::new).collect();
    let generated = amp_codegen::generate_from_files(&paths)
        .with_context(|| format!("failed to generate constructors for {documents:?}"))?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    generated
        .write_to(out_dir)
        .with_context(|| format!("failed to write artifacts to {}", out_dir.display()))?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    println!("cargo::rerun-if-changed=build.rs");

    let out_dir = PathBuf::from(env::var("OUT_DIR").context("OUT_DIR not set")?);
    generate(DOCUMENTS, &out_dir)?;
    generate(FIXTURES, &out_dir.join("fixtures"))?;

    Ok(())
}
