//! Interactive sessions: the agent REPL and the plain knowledge-query REPL.
//!
//! A failed question never ends the session; the error is printed and the
//! prompt comes back. Only EOF, `exit`/`quit`, or an interrupt end it, and
//! a shutdown banner is printed on the way out.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::agent::{Agent, TraceEntry, TraceKind};
use crate::context::AppContext;
use crate::rag::KnowledgeBase;

/// Run the agent REPL until the user exits.
pub async fn run_agent_repl(ctx: &AppContext) -> anyhow::Result<()> {
    println!("--- ARK agent ready. Type 'help' for tools, 'exit' to quit. ---");

    let agent = Agent::new(ctx);
    let mut verbose = false;

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        prompt_marker();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input {
            "" => continue,
            "exit" | "quit" => break,
            "help" => {
                println!("Available tools:\n{}", agent.tools().descriptions());
                continue;
            }
            "verbose on" => {
                verbose = true;
                println!("Verbose output enabled.");
                continue;
            }
            "verbose off" => {
                verbose = false;
                println!("Verbose output disabled.");
                continue;
            }
            question => match agent.answer(question).await {
                Ok((outcome, trace)) => {
                    if verbose {
                        print_trace(&trace);
                    }
                    println!("\n> ARK: {}", outcome.text());
                }
                Err(e) => {
                    // Fatal for this question only; the session survives.
                    println!("\nError: {}", e);
                }
            },
        }
    }

    println!("\nARK shutting down. Goodbye.");
    Ok(())
}

/// Run the plain RAG query REPL against one collection.
pub async fn run_ask_repl(ctx: &AppContext, collection: &str) -> anyhow::Result<()> {
    println!(
        "--- ARK ready. Querying '{}'. Type 'exit' or 'quit' to end. ---",
        collection
    );

    let kb = KnowledgeBase::new(
        ctx.llm.clone(),
        ctx.embedder.clone(),
        Arc::clone(&ctx.store),
        ctx.config.retrieval_top_k,
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        prompt_marker();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();

        match question {
            "" => continue,
            "exit" | "quit" => break,
            _ => match kb.answer(collection, question).await {
                Ok(answer) => println!("\n> ARK: {}", answer),
                Err(e) => println!("\nAn error occurred: {}", e),
            },
        }
    }

    println!("\nARK shutting down. Goodbye.");
    Ok(())
}

fn prompt_marker() {
    print!("\n> You: ");
    let _ = std::io::stdout().flush();
}

fn print_trace(trace: &[TraceEntry]) {
    for entry in trace {
        let label = match entry.kind {
            TraceKind::ModelOutput => "model",
            TraceKind::ToolCall => "tool call",
            TraceKind::ToolResult => "tool result",
        };
        println!("\n[{}]\n{}", label, entry.content);
    }
}
