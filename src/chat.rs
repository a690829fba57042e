// src/chat.rs
use serde::Serialize;
use std::io::{self, BufRead, Write};

use crate::document::Document;
use crate::engine::{Answer, AnswerStatus, Engine};

const RULE_WIDTH: usize = 60;
const EXIT_COMMANDS: [&str; 2] = ["quit", "exit"];

#[derive(Serialize)]
struct JsonReply<'a> {
    question: &'a str,
    #[serde(flatten)]
    answer: &'a Answer,
    status: AnswerStatus,
}

/// Answers one question and writes the reply, as text or a single JSON line.
pub fn reply<W: Write>(
    engine: &Engine,
    document: &Document,
    question: &str,
    json: bool,
    output: &mut W,
) -> io::Result<()> {
    if json {
        let (answer, status) = engine.answer_with_status(document, question);
        tracing::debug!("Answered '{}' with status {:?}", question, status);
        let line = serde_json::to_string(&JsonReply { question, answer: &answer, status })?;
        writeln!(output, "{}", line)
    } else {
        let answer = engine.answer_question(document, question);
        write!(output, "{}", render(&answer, document.format().source_label()))
    }
}

/// Human-readable reply: the answer, then where it came from.
pub fn render(answer: &Answer, source_label: &str) -> String {
    let mut text = format!("\nBot: {}\n\n", answer.answer);
    if !answer.sources.is_empty() {
        let sources = answer
            .sources
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        text.push_str(&format!("Sources: {} {}\n", source_label, sources));
        text.push_str(&format!("{}\n\n", "-".repeat(RULE_WIDTH)));
    }
    text
}

/// Reads questions line by line until `quit`, `exit` or end of input.
/// Returns how many questions were answered.
pub fn run<R: BufRead, W: Write>(
    engine: &Engine,
    document: &Document,
    mut input: R,
    output: &mut W,
    json: bool,
) -> io::Result<usize> {
    if !json {
        writeln!(output, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(output, "Document Q&A - Interactive Mode")?;
        writeln!(output, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(output, "Type 'quit' or 'exit' to end the conversation\n")?;
    }

    let mut answered = 0;
    let mut line = String::new();
    loop {
        if !json {
            write!(output, "You: ")?;
            output.flush()?;
        }

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if EXIT_COMMANDS.contains(&question.to_lowercase().as_str()) {
            if !json {
                writeln!(output, "Bot: Goodbye!")?;
            }
            break;
        }
        if question.is_empty() {
            continue;
        }

        reply(engine, document, question, json, output)?;
        answered += 1;
    }

    tracing::info!("Interactive session ended after {} question(s)", answered);
    Ok(answered)
}
