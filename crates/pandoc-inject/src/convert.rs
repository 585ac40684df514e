/*
 * convert.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Converting rendered text back into document nodes.
 */

use std::io::Write;
use std::process::{Command, Stdio};

use crate::config::InjectConfig;
use crate::error::ConvertError;
use crate::pandoc::Blocks;
use crate::readers;

/// Turns rendered text in a given input format into blocks.
pub trait TextToNodes {
    fn convert(&mut self, text: &str, format: &str) -> Result<Blocks, ConvertError>;
}

/// Converts by running `pandoc -f <format> -t json` on the text.
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: String,
    reader_extensions: String,
    extra_args: Vec<String>,
}

impl PandocConverter {
    pub fn new(program: impl Into<String>) -> Self {
        PandocConverter {
            program: program.into(),
            reader_extensions: String::new(),
            extra_args: vec![],
        }
    }

    pub fn from_config(config: &InjectConfig) -> Self {
        PandocConverter {
            program: config.pandoc.clone(),
            reader_extensions: config.reader_extensions.clone(),
            extra_args: config.extra_args.clone(),
        }
    }

    /// Arguments passed to pandoc for `format`.
    pub fn args(&self, format: &str) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            format!("{}{}", format, self.reader_extensions),
            "-t".to_string(),
            "json".to_string(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

impl Default for PandocConverter {
    fn default() -> Self {
        Self::from_config(&InjectConfig::default())
    }
}

impl TextToNodes for PandocConverter {
    fn convert(&mut self, text: &str, format: &str) -> Result<Blocks, ConvertError> {
        let args = self.args(format);
        tracing::debug!("running {} {}", self.program, args.join(" "));

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ConvertError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // stdin is dropped at the end of this block, signaling EOF
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(ConvertError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let json = String::from_utf8(output.stdout)?;
        let doc = readers::json::read(&mut json.as_bytes())?;
        Ok(doc.blocks)
    }
}
