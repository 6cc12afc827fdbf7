use mdl2obj_core::{ConvertError, batch::BatchError};
use snafu::Snafu;

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CliError {
    #[snafu(display("Failed to convert {input}: {source}"))]
    Convert { input: String, source: ConvertError },

    #[snafu(display("{source}"))]
    Discover { source: BatchError },

    #[snafu(display(
        "An OUTPUT path cannot be combined with '*'; \
         batch output goes to --out-dir ({out_dir})"
    ))]
    BatchWithOutput { out_dir: String },

    #[snafu(display("{flag} only applies to batch mode (INPUT '*')"))]
    BatchOnlyFlag { flag: &'static str },

    #[snafu(display("{failed} of {total} models failed to convert"))]
    BatchFailed { failed: usize, total: usize },
}
