pub mod converter;
pub mod optimizer;
pub mod raw_io;

pub use converter::{compare, ConversionService, MetricsReport};
pub use optimizer::{OptimizeResult, Optimizer, Param, ParamRange};
pub use raw_io::{read_rgba, write_rgba};
