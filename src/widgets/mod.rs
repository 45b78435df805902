//! Page widgets unrelated to the graph.

pub mod dropzone;
pub mod lightbox;

use crate::error::Result;

pub fn install() -> Result<()> {
	dropzone::install()?;
	lightbox::install()?;
	Ok(())
}
