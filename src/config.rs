use std::path::PathBuf;

use clap::Parser;

use crate::prediction::OutputKind;
use crate::preprocess::{Layout, Normalization, Preprocessor, ResizeMode};

/// Leaf disease classification server.
#[derive(Debug, Clone, Parser)]
#[command(name = "leaf-classifier", version, about)]
pub struct Config {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// ONNX model loaded at startup.
    #[arg(long, env = "MODEL_PATH", default_value = "model.onnx")]
    pub model_path: PathBuf,

    /// Class names, one per line, in model output order. Falls back to
    /// `labels.txt` next to the model, then the built-in potato leaf labels.
    #[arg(long, env = "LABELS_PATH")]
    pub labels_path: Option<PathBuf>,

    /// Side length of the square image the model expects.
    #[arg(
        long,
        env = "INPUT_SIZE",
        default_value_t = 256,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub input_size: u32,

    #[arg(long, env = "INPUT_LAYOUT", value_enum, default_value_t = Layout::Nhwc)]
    pub layout: Layout,

    #[arg(long, env = "INPUT_NORMALIZATION", value_enum, default_value_t = Normalization::Raw)]
    pub normalization: Normalization,

    #[arg(long, env = "RESIZE_MODE", value_enum, default_value_t = ResizeMode::Stretch)]
    pub resize: ResizeMode,

    #[arg(long, env = "MODEL_OUTPUT", value_enum, default_value_t = OutputKind::Probabilities)]
    pub output: OutputKind,

    /// HTTP worker threads; defaults to the number of physical cores.
    #[arg(long, env = "WORKERS")]
    pub workers: Option<usize>,

    /// Reject bodies above this many bytes. Unlimited when unset.
    #[arg(long, env = "MAX_BODY_BYTES")]
    pub max_body_bytes: Option<usize>,
}

impl Config {
    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }

    pub fn preprocessor(&self) -> Preprocessor {
        Preprocessor {
            size: self.input_size,
            layout: self.layout,
            normalization: self.normalization,
            resize: self.resize,
        }
    }

    pub fn payload_limit(&self) -> usize {
        self.max_body_bytes.unwrap_or(usize::MAX)
    }
}
