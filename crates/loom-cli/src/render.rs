//! Renders [`WireMessage`]s to the terminal.
//!
//! Deliberately minimal: real terminal UI rendering (syntax highlighting,
//! diff views, a TUI) is out of scope here, specified only at the wire
//! contract. This prints a plain, line-oriented transcript good enough to
//! drive the loop interactively and to watch approvals/tool calls happen.

use loom_wire::{Wire, WireMessage};

/// Subscribe to `wire` and print every message until it closes.
pub fn spawn(wire: &Wire) -> tokio::task::JoinHandle<()> {
    let mut rx = wire.subscribe();
    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            render(&message, 0);
        }
    })
}

fn render(message: &WireMessage, depth: usize) {
    let indent = "  ".repeat(depth);
    match message {
        WireMessage::TurnBegin { input, .. } => println!("{indent}» {input}"),
        WireMessage::StepBegin { step_no } => println!("{indent}  [step {step_no}]"),
        WireMessage::TextPart { delta, .. } => print!("{delta}"),
        WireMessage::ThinkPart { delta, .. } => print!("\x1b[2m{delta}\x1b[0m"),
        WireMessage::ToolCall { function, tool_call_id, .. } => {
            println!("{indent}  → {function} ({tool_call_id})");
        }
        WireMessage::ToolResult { return_value, is_error, .. } => {
            let marker = if *is_error { "✗" } else { "✓" };
            println!("{indent}  {marker} {return_value}");
        }
        WireMessage::ApprovalRequest { action, description, .. } => {
            println!("{indent}  ? approval requested for {action}: {description}");
        }
        WireMessage::CompactionBegin => println!("{indent}  (compacting history…)"),
        WireMessage::CompactionEnd { messages_before, messages_after } => {
            println!("{indent}  (compacted {messages_before} → {messages_after} messages)");
        }
        WireMessage::StepInterrupted { reason } => println!("{indent}  ! interrupted: {reason}"),
        WireMessage::TurnEnd => println!(),
        WireMessage::SubagentEvent { label, inner } => {
            print!("{indent}  [{label}] ");
            render(inner, depth + 1);
        }
        WireMessage::ToolCallPart { .. } | WireMessage::StatusUpdate { .. } | WireMessage::ApprovalResponse { .. } => {}
    }
}
