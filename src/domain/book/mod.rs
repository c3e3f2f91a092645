//! Book Context - 书目限界上下文
//!
//! 职责:
//! - 书目元数据与主题分类的值对象
//! - 阅读状态及其操作员代码
//! - 完整书目记录的合并与校验

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::CompleteBookRecord;
pub use errors::BookError;
pub use value_objects::{BookMetadata, ReadingStatus, SubjectInfo};
