//! Interactive Loop - 命令循环
//!
//! capture / test / quit 三个命令，进程生命周期内反复执行工作流。

use std::io::Write;

use crate::application::workflow::BookWorkflow;

use super::ConsoleInput;

/// 控制台命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Capture,
    Test,
    Quit,
    /// 空行，静默忽略
    Empty,
    Unknown,
}

/// 解析一行命令输入，大小写不敏感
pub fn parse_command(line: &str) -> ConsoleCommand {
    match line.trim().to_ascii_lowercase().as_str() {
        "capture" => ConsoleCommand::Capture,
        "test" => ConsoleCommand::Test,
        "quit" => ConsoleCommand::Quit,
        "" => ConsoleCommand::Empty,
        _ => ConsoleCommand::Unknown,
    }
}

/// 交互式主循环
///
/// 每轮回到命令提示符；工作流失败打印错误后继续。
/// 输入流关闭等同于 quit。
pub async fn run_interactive(
    workflow: &BookWorkflow,
    input: &ConsoleInput,
) -> std::io::Result<()> {
    println!("Starting interactive book processing mode...");
    println!("Commands:");
    println!("  'capture' - Capture and process a book");
    println!("  'test' - Test camera connection");
    println!("  'quit' - Exit the program");
    println!("{}", "-".repeat(50));

    loop {
        print!("\nEnter command (capture/test/quit): ");
        std::io::stdout().flush()?;

        let Some(line) = input.read_line().await? else {
            println!();
            break;
        };

        match parse_command(&line) {
            ConsoleCommand::Capture => {
                println!("\nPosition a book title page in front of the camera...");
                print!("Press Enter when ready to capture...");
                std::io::stdout().flush()?;
                if input.read_line().await?.is_none() {
                    println!();
                    break;
                }

                match workflow.process_complete_book().await {
                    Ok(report) => {
                        println!("\nFinal book information:");
                        println!("{}", "-".repeat(40));
                        println!("{}", report.record);
                        println!("{}", "-".repeat(40));
                        println!("✓ Added to catalog with row id {}", report.row_id);
                        println!("\nReady for next book.");
                    }
                    Err(e) => {
                        println!("✗ Book processing failed: {e}");
                    }
                }
            }
            ConsoleCommand::Test => {
                println!("\nTesting camera connection...");
                match workflow.run_connectivity_test().await {
                    Ok(()) => println!("✓ Connection successful!"),
                    Err(e) => println!("✗ Connection failed: {e}"),
                }
            }
            ConsoleCommand::Quit => {
                println!("\nExiting...");
                break;
            }
            ConsoleCommand::Empty => {}
            ConsoleCommand::Unknown => {
                println!("Invalid command. Please enter 'capture', 'test', or 'quit'.");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_known_words() {
        assert_eq!(parse_command("capture"), ConsoleCommand::Capture);
        assert_eq!(parse_command("  TEST \n"), ConsoleCommand::Test);
        assert_eq!(parse_command("Quit"), ConsoleCommand::Quit);
    }

    #[test]
    fn test_parse_command_blank_and_noise() {
        assert_eq!(parse_command("\n"), ConsoleCommand::Empty);
        assert_eq!(parse_command("   "), ConsoleCommand::Empty);
        assert_eq!(parse_command("frobnicate"), ConsoleCommand::Unknown);
    }
}
