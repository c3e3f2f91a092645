//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Book Context: 书目记录
//! - Capture Context: 采集图像

pub mod book;
pub mod capture;
