//! Command-line front-end.
//!
//! Argument parsing and the load-render-save run behind `instafilter
//! process`. The binary only prints what these return.

use crate::config::AppConfig;
use crate::core::error::{InstafilterError, InstafilterResult, SessionError};
use crate::core::types::ParameterValues;
use crate::filters::descriptor::FilterDescriptor;
use crate::filters::kernel::FilterKernel;
use crate::filters::registry::FilterRegistry;
use crate::io::{FilePicker, ImagePicker, PathSink, PersistReceipt};
use crate::session::processing::ProcessingSession;
use log::debug;
use std::path::PathBuf;
use std::sync::Arc;

const PROCESS_FLAGS: [&str; 5] = ["--filter", "--intensity", "--radius", "--scale", "--config"];

/// Options of the `process` command.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcessOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Overrides the configured default filter.
    pub filter: Option<String>,
    pub intensity: Option<f64>,
    pub radius: Option<f64>,
    pub scale: Option<f64>,
    pub config: Option<PathBuf>,
}

impl ProcessOptions {
    /// Parse the arguments following `process`: `<input> <output> [--flag value]...`.
    pub fn parse(args: &[String]) -> InstafilterResult<Self> {
        let [input, output, rest @ ..] = args else {
            return Err(usage("expected <input> <output>"));
        };

        let mut options = ProcessOptions {
            input: PathBuf::from(input),
            output: PathBuf::from(output),
            ..Default::default()
        };

        let mut i = 0;
        while i < rest.len() {
            let flag = rest[i].as_str();
            if !PROCESS_FLAGS.contains(&flag) {
                return Err(usage(format!("unknown option '{}'", flag)));
            }
            let value = rest
                .get(i + 1)
                .ok_or_else(|| usage(format!("{} needs a value", flag)))?;

            match flag {
                "--filter" => options.filter = Some(value.clone()),
                "--intensity" => options.intensity = Some(parse_raw(flag, value)?),
                "--radius" => options.radius = Some(parse_raw(flag, value)?),
                "--scale" => options.scale = Some(parse_raw(flag, value)?),
                _ => options.config = Some(PathBuf::from(value)),
            }
            i += 2;
        }
        Ok(options)
    }

    /// `base` with every slider given on the command line replaced.
    pub fn raw_values(&self, base: ParameterValues) -> ParameterValues {
        ParameterValues {
            intensity: self.intensity.unwrap_or(base.intensity),
            radius: self.radius.unwrap_or(base.radius),
            scale: self.scale.unwrap_or(base.scale),
        }
    }
}

fn usage(message: impl Into<String>) -> InstafilterError {
    InstafilterError::Usage(message.into())
}

fn parse_raw(flag: &str, value: &str) -> InstafilterResult<f64> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(usage(format!("{} expects a number, got '{}'", flag, value))),
    }
}

/// Outcome of a successful `process` run.
#[derive(Debug, Clone)]
pub struct ProcessReport {
    pub filter: FilterDescriptor,
    pub width: u32,
    pub height: u32,
    pub receipt: PersistReceipt,
}

/// Load the input, render the chosen filter once and write the output.
pub fn run_process<K: FilterKernel>(
    options: &ProcessOptions,
    kernel: K,
) -> InstafilterResult<ProcessReport> {
    let config = match &options.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let mut registry = config.registry()?;
    if let Some(id) = &options.filter {
        if !registry.set_default(id) {
            return Err(SessionError::UnknownFilter(id.clone()).into());
        }
    }

    let raw = options.raw_values(config.parameters);
    let mut session = ProcessingSession::new(Arc::new(registry), kernel)?.with_parameters(raw);
    debug!("Processing with '{}'", session.selected_filter().id);

    let image = FilePicker::new([options.input.clone()]).acquire_image()?;
    let output = session.import_image(image)?;
    let receipt = session.save(&mut PathSink::new(&options.output))?;

    Ok(ProcessReport {
        filter: session.selected_filter().clone(),
        width: output.width(),
        height: output.height(),
        receipt,
    })
}

/// Every descriptor as pretty-printed JSON, in registration order.
pub fn filters_json(registry: &FilterRegistry) -> InstafilterResult<String> {
    let filters: Vec<&FilterDescriptor> = registry.descriptors().collect();
    Ok(serde_json::to_string_pretty(&filters)?)
}
