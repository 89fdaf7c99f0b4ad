use help_types::Category;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{tool, tool_router, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::lifecycle::{trigger_reindex, ReindexOutcome};
use crate::messages;
use crate::state::{AppState, Phase};

const DEFAULT_SEARCH_LIMIT: u32 = 5;
/// Upper bound on `limit`, regardless of what the caller asks for — a
/// caller passing an enormous limit shouldn't be able to force the whole
/// index into one response.
const MAX_SEARCH_LIMIT: u32 = 50;

/// The `category` argument accepted by `search_1c_help`. `All` means "no
/// restriction" and is not itself a [`Category`] value.
#[derive(Clone, Copy, Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    Syntax,
    Query,
    Language,
    #[default]
    All,
}

impl CategoryFilter {
    fn into_category(self) -> Option<Category> {
        match self {
            Self::Syntax => Some(Category::Syntax),
            Self::Query => Some(Category::Query),
            Self::Language => Some(Category::Language),
            Self::All => None,
        }
    }
}

#[derive(Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Text to search for in indexed 1C help topics.
    pub query: String,
    /// Maximum number of results to return (default 5).
    pub limit: Option<u32>,
    /// Restrict results to one category, or "all" for no restriction.
    pub category: Option<CategoryFilter>,
}

#[derive(Deserialize, JsonSchema)]
pub struct GetTopicParams {
    /// Identifier returned by `search_1c_help`, e.g. `8.3.27.1989/syntax/a.html`.
    pub topic_id: String,
}

/// Routes the four `rmcp` tools against the shared [`AppState`], per spec
/// §4.9/§6.1. Every method returns `Ok(CallToolResult::success(...))` —
/// expected conditions (empty index, busy, not found) are communicated as
/// text, never as an RPC fault.
#[derive(Clone)]
pub struct HelpServer {
    state: AppState,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<HelpServer>,
}

impl HelpServer {
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    fn text_result(text: String) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_router]
impl HelpServer {
    #[tool(description = "Search the indexed 1C Platform help corpus by free text.")]
    pub async fn search_1c_help(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let phase = self.state.current_phase().await;
        let Some(store) = &self.state.store else {
            let text = if phase.is_indexing() {
                messages::store_preparing()
            } else {
                messages::store_unavailable()
            };
            return Self::text_result(text);
        };

        let query = params.query.trim();
        if query.is_empty() {
            return Self::text_result(messages::empty_query());
        }

        let limit = params
            .limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT) as usize;
        let category = params.category.unwrap_or_default().into_category();

        let guard = store.lock().await;
        let hits = match guard.search(query, category, limit) {
            Ok(hits) => hits,
            Err(err) => {
                return Self::text_result(format!("⚠️ Ошибка поиска: {err}"));
            }
        };
        drop(guard);

        if hits.is_empty() {
            return Self::text_result(messages::no_search_results(query));
        }
        Self::text_result(messages::search_results(query, &hits))
    }

    #[tool(description = "Fetch the full text of one indexed 1C help topic by its id.")]
    pub async fn get_1c_help_topic(
        &self,
        Parameters(params): Parameters<GetTopicParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let phase = self.state.current_phase().await;
        let Some(store) = &self.state.store else {
            let text = if phase.is_indexing() {
                messages::store_preparing()
            } else {
                messages::store_unavailable()
            };
            return Self::text_result(text);
        };

        let guard = store.lock().await;
        let topic = match guard.get(&params.topic_id) {
            Ok(topic) => topic,
            Err(err) => return Self::text_result(format!("⚠️ Ошибка чтения темы: {err}")),
        };
        drop(guard);

        match topic {
            Some(topic) => Self::text_result(messages::topic_body(&topic.title, &topic.content)),
            None => Self::text_result(messages::topic_not_found(&params.topic_id)),
        }
    }

    #[tool(description = "Report which 1C Platform version's help corpus is currently indexed.")]
    pub async fn list_1c_help_versions(&self) -> Result<CallToolResult, rmcp::ErrorData> {
        let phase = self.state.current_phase().await;
        let Some(store) = &self.state.store else {
            let text = if phase.is_indexing() {
                messages::store_preparing()
            } else {
                messages::store_unavailable()
            };
            return Self::text_result(text);
        };

        let guard = store.lock().await;
        let meta = match guard.read_meta() {
            Ok(meta) => meta,
            Err(err) => return Self::text_result(format!("⚠️ Ошибка чтения метаданных: {err}")),
        };
        drop(guard);

        if meta.is_empty() {
            return Self::text_result(messages::no_indexed_versions());
        }
        Self::text_result(messages::version_status(&meta))
    }

    #[tool(description = "Force a fresh re-indexing run of the installed 1C help corpus.")]
    pub async fn reindex_1c_help(&self) -> Result<CallToolResult, rmcp::ErrorData> {
        match trigger_reindex(&self.state).await {
            ReindexOutcome::Started => Self::text_result(messages::reindex_started()),
            ReindexOutcome::AlreadyIndexing => Self::text_result(messages::reindex_busy()),
            ReindexOutcome::NoPlatform => Self::text_result(messages::reindex_no_platform()),
            ReindexOutcome::StoreFailure(reason) => {
                Self::text_result(messages::reindex_store_failure(&reason))
            }
        }
    }
}

impl ServerHandler for HelpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            server_info: Implementation {
                name: "1c-help".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Search and retrieve entries from the 1C:Enterprise 8.3 platform help corpus."
                    .to_owned(),
            ),
        }
    }

    async fn call_tool(
        &self,
        request: rmcp::model::CallToolRequestParams,
        context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let tcc = rmcp::handler::server::tool::ToolCallContext::new(self, request, context);
        self.tool_router.call(tcc).await
    }

    async fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<rmcp::model::ListToolsResult, rmcp::ErrorData> {
        Ok(rmcp::model::ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        })
    }

    fn get_tool(&self, name: &str) -> Option<rmcp::model::Tool> {
        self.tool_router.get(name).cloned()
    }
}
