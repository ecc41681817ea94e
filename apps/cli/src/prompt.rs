//! 交互式冲突策略

use std::io::{self, BufRead, Write};
use std::sync::Mutex;

use zmb_map::{ConflictPolicy, Resolution};

/// 解析用户输入："0" 替换，其余都视为重命名
pub fn parse_answer(answer: &str) -> Resolution {
    match answer.trim() {
        "0" => Resolution::Replace,
        _ => Resolution::Rename,
    }
}

/// 从输入流读取用户的选择
pub struct PromptPolicy<R> {
    input: Mutex<R>,
}

impl PromptPolicy<io::BufReader<io::Stdin>> {
    pub fn stdin() -> Self {
        Self::new(io::BufReader::new(io::stdin()))
    }
}

impl<R: BufRead + Send> PromptPolicy<R> {
    pub fn new(input: R) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }
}

impl<R: BufRead + Send> ConflictPolicy for PromptPolicy<R> {
    fn choose(&self, name: &str) -> Resolution {
        eprint!(
            "A map named '{name}' already exists.\n\
             Type 0 to replace it, or anything else to create the new map with a random suffix: "
        );
        if let Err(e) = io::stderr().flush() {
            tracing::debug!(error = %e, "could not flush the prompt");
        }

        let mut answer = String::new();
        let read = match self.input.lock() {
            Ok(mut input) => input.read_line(&mut answer),
            Err(_) => Ok(0),
        };

        match read {
            Ok(_) => parse_answer(&answer),
            Err(e) => {
                tracing::warn!(error = %e, "could not read the answer, renaming the new map");
                Resolution::Rename
            }
        }
    }
}
