// ABOUTME: Validated domain types for image transfer.
// ABOUTME: Image names and the pull/build descriptor.

mod image;
mod image_name;

pub use image::Image;
pub use image_name::{ImageName, ParseImageNameError};
