//! Capture Context - 采集限界上下文
//!
//! 职责:
//! - 相机采集的临时图像实体

mod captured_image;

pub use captured_image::CapturedImage;
