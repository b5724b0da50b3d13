// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Operator confirmation for destructive steps.

use std::io::{BufRead, Write};

use async_trait::async_trait;

use crate::errors::AppError;

#[async_trait]
pub trait ConfirmationProvider: Send + Sync {
    /// Asks the operator `prompt` and returns their raw answer.
    async fn ask(&self, prompt: &str) -> Result<String, AppError>;

    /// True only for an explicit affirmative answer. Errors count as refusal.
    async fn confirm(&self, prompt: &str) -> bool {
        match self.ask(prompt).await {
            Ok(answer) => is_affirmative(&answer),
            Err(err) => {
                tracing::warn!("[rotation] no confirmation received: {}", err);
                false
            }
        }
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// Prompts on stdout and reads one line from stdin.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

#[async_trait]
impl ConfirmationProvider for TerminalPrompt {
    async fn ask(&self, prompt: &str) -> Result<String, AppError> {
        let prompt = prompt.to_string();
        // stdin is blocking; the whole run waits for the answer
        tokio::task::spawn_blocking(move || {
            let mut stdout = std::io::stdout().lock();
            write!(stdout, "{prompt}")?;
            stdout.flush()?;

            let mut answer = String::new();
            std::io::stdin().lock().read_line(&mut answer)?;
            Ok::<_, AppError>(answer)
        })
        .await
        .map_err(|err| AppError::Io(err.to_string()))?
    }
}

/// Answers every prompt with the same text.
#[derive(Debug, Clone)]
pub struct FixedAnswer(String);

impl FixedAnswer {
    pub fn new(answer: impl Into<String>) -> Self {
        Self(answer.into())
    }

    pub fn yes() -> Self {
        Self::new("y")
    }

    pub fn no() -> Self {
        Self::new("n")
    }
}

#[async_trait]
impl ConfirmationProvider for FixedAnswer {
    async fn ask(&self, prompt: &str) -> Result<String, AppError> {
        tracing::debug!("[rotation] answering {:?} with {:?}", prompt, self.0);
        Ok(self.0.clone())
    }
}
