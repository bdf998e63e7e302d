pub mod clear;
pub mod play;
pub mod queue;
pub mod resume;
pub mod skip;
pub mod stop;

pub mod audio_sources;
pub mod utils;

use crate::{CommandResult, Context};
