pub mod args;
pub mod ast;
pub mod builder;
pub mod config;
pub mod error;
pub mod extract;
pub mod golang;
pub mod inflect;
pub mod naming;
pub mod resolver;
pub mod serializer;
pub mod service;

pub use args::Args;
pub use error::Error;

use log::info;
use wasm_bindgen::prelude::*;

use args::Command;
use builder::BuildOptions;
use config::Options;
use serializer::{ErFile, serialize};
use service::{Generator, build_diagram};

/// Run the command given on the command line.
pub fn run(args: &Args) -> Result<(), Error> {
    match &args.command {
        Command::Generate(generate) => {
            let mut options = config::load_config(generate.config.as_ref())?;
            generate.apply(&mut options);
            options.validate()?;

            let writer = ErFile::new(&options.output_path, &options.output_filename);
            info!(output_file = writer.path().display().to_string(); "Generating diagram");
            Generator::new(options, writer).generate()
        }
    }
}

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Convert one Go source to `.er` text using the default options
#[wasm_bindgen(js_name = "goToEr")]
pub fn go_to_er(source: &str, title: Option<String>) -> Result<String, String> {
    let file = golang::parse_go(source).map_err(|e| e.to_string())?;
    let title = title.unwrap_or_else(|| Options::default().title);

    let diagram = build_diagram(&[file], &BuildOptions::default(), &title, Vec::new())
        .map_err(|e| e.to_string())?;

    Ok(serialize(&diagram))
}
