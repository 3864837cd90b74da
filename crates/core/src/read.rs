//! Pipeline orchestrator: bytes -> raw tokens -> semantic tokens ->
//! per-section ranges -> model.
//!
//! This is a thin driver that calls each stage in order. The whole input is
//! consumed before any result is returned; on the first structural
//! violation the parse aborts with a single fatal [`LpError`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::classify::classify;
use crate::error::LpError;
use crate::lexer::{Lexer, TokenWindow};
use crate::model::Model;
use crate::parser::build_model;
use crate::sections::split_sections;

/// Read an LP-format file from disk and return the parsed model.
pub fn read_model(path: &Path) -> Result<Model, LpError> {
    let file = File::open(path).map_err(|e| LpError::UnopenableInput {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_reader(BufReader::new(file), &path.display().to_string())
}

/// Run the pipeline over any line-readable source. A transparent
/// decompression layer is just another `BufRead` in front of this seam.
pub fn parse_reader<R: BufRead>(reader: R, filename: &str) -> Result<Model, LpError> {
    let mut window = TokenWindow::new(Lexer::new(reader, filename))?;
    let tokens = classify(&mut window)?;
    let sections = split_sections(&tokens, filename)?;
    build_model(&tokens, &sections, filename)
}

/// Parse LP-format text held in memory.
pub fn parse_str(src: &str, filename: &str) -> Result<Model, LpError> {
    parse_reader(src.as_bytes(), filename)
}
