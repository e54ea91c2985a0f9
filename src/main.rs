// shaderpp - a preprocessor for HLSL-style shader source.
// Copyright (C) 2026 The shaderpp authors.
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <http://www.gnu.org/licenses/>.

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Result};
use clap::Parser;
use encoding_rs::Encoding;

use shaderpp::{
    include::{read_source, FileResolver},
    output::preprocess_with,
};

/// Preprocess an HLSL-style shader source file.
///
/// Runs the shaderpp preprocessor over INPUT and writes the reformatted
/// result to stdout (or to `-o FILE`).  Preprocessing errors go to stderr,
/// one per line, and do not stop the run.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Shader source file to preprocess.
    input: PathBuf,

    /// Write the output here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Predefine a macro, with an optional replacement text.
    #[arg(short = 'D', value_name = "NAME[=VALUE]")]
    define: Vec<String>,

    /// Add a directory to the include search path.
    #[arg(short = 'I', value_name = "DIR")]
    include_dir: Vec<PathBuf>,

    /// Character encoding of the input files, when auto-detection guesses
    /// wrong.
    #[arg(long, value_parser = parse_encoding)]
    encoding: Option<&'static Encoding>,
}

fn parse_encoding(arg: &str) -> Result<&'static Encoding> {
    Encoding::for_label(arg.as_bytes()).ok_or_else(|| anyhow!("unknown encoding label '{arg}'"))
}

fn main() -> Result<()> {
    let Cli {
        input,
        output,
        define,
        include_dir,
        encoding,
    } = Cli::parse();

    let source = read_source(&input, encoding)?;
    let filename = input.display().to_string();

    let defines = define
        .iter()
        .map(|definition| match definition.split_once('=') {
            Some((name, value)) => (name, value),
            None => (definition.as_str(), "1"),
        })
        .collect::<Vec<_>>();

    let mut resolver = FileResolver::new();
    if let Some(dir) = input.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        resolver.push_search_dir(dir);
    }
    for dir in &include_dir {
        resolver.push_search_dir(dir);
    }
    if let Some(encoding) = encoding {
        resolver.set_encoding(encoding);
    }

    let result = preprocess_with(Some(&filename), source, &defines, resolver);

    for diagnostic in &result.diagnostics {
        eprintln!("{diagnostic}");
    }

    match &output {
        Some(path) => write_output(path, &result.output)?,
        None => {
            let stdout = std::io::stdout();
            stdout.lock().write_all(result.output.as_bytes())?;
        }
    }

    if result.diagnostics.is_empty() {
        Ok(())
    } else {
        Err(anyhow!(
            "{} preprocessing error(s) in {}",
            result.diagnostics.len(),
            filename
        ))
    }
}

fn write_output(path: &Path, output: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(output.as_bytes())?;
    Ok(())
}
