//! Camera Adapters - 相机适配器

mod fake_camera;
mod ip_webcam;

pub use fake_camera::FakeCamera;
pub use ip_webcam::{IpWebcamClient, IpWebcamConfig};
