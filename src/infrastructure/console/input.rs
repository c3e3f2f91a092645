//! 标准输入行读取

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;

/// 进程内共享的标准输入行读取器
///
/// 命令循环与状态提问共用同一个缓冲；两个独立的 BufReader
/// 会各自预读，把对方的输入行吞掉。
#[derive(Clone)]
pub struct ConsoleInput {
    reader: Arc<Mutex<BufReader<Stdin>>>,
}

impl ConsoleInput {
    pub fn new() -> Self {
        Self {
            reader: Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()))),
        }
    }

    /// 读取一行；输入流关闭时返回 None
    pub async fn read_line(&self) -> std::io::Result<Option<String>> {
        let mut reader = self.reader.lock().await;
        let mut line = String::new();
        let bytes = reader.read_line(&mut line).await?;
        if bytes == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

impl Default for ConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}
