//! 1C help MCP server — discovers the installed 1C:Enterprise platform,
//! indexes its help corpus into a local full-text search database, and
//! serves `search_1c_help` / `get_1c_help_topic` / `list_1c_help_versions`
//! / `reindex_1c_help` over `rmcp`'s stdio JSON-RPC transport.
//!
//! Diagnostics go to stderr exclusively (`HELP_STATUS:`-prefixed status
//! lines and `[1c-help] `-prefixed log lines) so stdout stays clean for
//! the RPC framing.

use help_server::{status, HelpServer};
use rmcp::transport::stdio;
use rmcp::ServiceExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let state = help_server::startup().await?;
    let server = HelpServer::new(state);

    let service = server.serve(stdio()).await.inspect_err(|err| {
        status::log(&format!("failed to start RPC transport: {err}"));
    })?;

    service.waiting().await?;
    Ok(())
}
