//! MCP Server for catalog-mcp
//!
//! MCP Protocol (stdio) <-> application::CatalogService
//!
//! 8 tools: add_book, list_books, search_books, filter_genre, loan_book,
//! return_book, delete_book, report

use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rmcp::{
    handler::server::{tool::ToolCallContext, tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
    transport::stdio,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::application::error::AppError;
use crate::application::service::{CatalogService, LoadOutcome};
use crate::domain::error::DomainError;
use crate::domain::model::book::AddBookRequest;
use crate::domain::model::catalog::{DeleteOutcome, SearchField};
use crate::domain::model::id::BookId;
use crate::infra::json_store::JsonCatalogRepository;

use super::render::{describe, format_report, format_table};

// =============================================================================
// Public entry point
// =============================================================================

/// MCP Serverを起動する。終了時にカタログ全体を書き出す。
pub async fn run(catalog_path: PathBuf) -> anyhow::Result<()> {
    let repo = JsonCatalogRepository::new(&catalog_path);
    let (service, outcome) = CatalogService::open(repo);
    match &outcome {
        LoadOutcome::Missing => tracing::info!(
            path = %catalog_path.display(),
            "no catalog document yet, starting empty"
        ),
        LoadOutcome::Loaded { count } => tracing::info!(
            path = %catalog_path.display(),
            count,
            "catalog loaded"
        ),
        LoadOutcome::Recovered { reason } => tracing::warn!(
            path = %catalog_path.display(),
            %reason,
            "catalog document is corrupt, starting with an empty catalog"
        ),
    }

    let server = CatalogMcpServer::new(service);
    let shared = Arc::clone(&server.service);
    let running = server.serve(stdio()).await?;
    running.waiting().await?;

    // 最終保存。失敗しても報告だけして終了する。
    let guard = shared
        .read()
        .map_err(|_| anyhow::anyhow!("catalog lock poisoned"))?;
    if let Err(e) = guard.save() {
        tracing::error!("final save failed: {}", e);
    }
    Ok(())
}

// =============================================================================
// MCP Server
// =============================================================================

type SharedService = Arc<RwLock<CatalogService<JsonCatalogRepository>>>;

#[derive(Clone)]
struct CatalogMcpServer {
    service: SharedService,
    tool_router: ToolRouter<Self>,
}

impl CatalogMcpServer {
    fn new(service: CatalogService<JsonCatalogRepository>) -> Self {
        Self {
            service: Arc::new(RwLock::new(service)),
            tool_router: Self::tool_router(),
        }
    }

    fn read(
        &self,
    ) -> Result<RwLockReadGuard<'_, CatalogService<JsonCatalogRepository>>, McpError> {
        self.service
            .read()
            .map_err(|_| McpError::internal_error("Lock poisoned", None))
    }

    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, CatalogService<JsonCatalogRepository>>, McpError> {
        self.service
            .write()
            .map_err(|_| McpError::internal_error("Lock poisoned", None))
    }

    /// 入力・状態の誤りは invalid_params、保存失敗は internal_error。
    fn to_mcp_error(e: AppError) -> McpError {
        match e {
            AppError::Domain(_) => McpError::invalid_params(format!("{e}"), None),
            AppError::StorageWrite(_) => McpError::internal_error(format!("{e}"), None),
        }
    }
}

// =============================================================================
// ServerHandler impl
// =============================================================================

impl ServerHandler for CatalogMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "catalog-mcp".to_string(),
                title: Some("Catalog MCP — Personal Library".to_string()),
                description: Some(
                    "Personal library catalog: books, loans, and statistics kept in one JSON file."
                        .to_string(),
                ),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Track a personal book collection.\n\
                 \n\
                 Tools: `add_book`, `list_books` → pick an ID → `loan_book`/`return_book`/`delete_book`. \
                 `search_books` and `filter_genre` narrow the list, `report` summarizes it. \
                 Every change is saved immediately."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool_ctx = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_ctx).await
    }
}

// =============================================================================
// Request types
// =============================================================================

/// 数値はJSON数値でも文字列でも受け付け、Domain側でテキストとして解釈させる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
enum TextOrNumber {
    Number(f64),
    Text(String),
}

impl TextOrNumber {
    fn to_text(&self) -> String {
        match self {
            TextOrNumber::Number(n) => n.to_string(),
            TextOrNumber::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpAddBookRequest {
    #[schemars(description = "Book title (required)")]
    pub title: String,
    #[schemars(description = "Author name (required)")]
    pub author: String,
    #[schemars(description = "Genre, e.g. 'Science-Fiction' (required)")]
    pub genre: String,
    #[schemars(description = "Publication year, between 1000 and the current year")]
    pub year: TextOrNumber,
    #[schemars(description = "Price, strictly positive")]
    pub price: TextOrNumber,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpListRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpSearchRequest {
    #[schemars(description = "Field to search: title, author, or genre")]
    pub field: String,
    #[schemars(description = "Text to look for (case-insensitive, partial match)")]
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpFilterGenreRequest {
    #[schemars(description = "Genre to show (case-insensitive, exact match)")]
    pub genre: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookIdRequest {
    #[schemars(description = "Book ID from `list_books` output")]
    pub id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpDeleteRequest {
    #[schemars(description = "Book ID from `list_books` output")]
    pub id: u32,
    #[schemars(
        description = "Set true once the user confirmed the deletion. Default false: nothing is deleted."
    )]
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpReportRequest {}

// =============================================================================
// Tool implementations
// =============================================================================

#[tool_router]
impl CatalogMcpServer {
    #[tool(
        name = "add_book",
        description = "Add a book to the catalog. The ID is assigned automatically and the book starts as available.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn add_book(
        &self,
        Parameters(req): Parameters<McpAddBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let add_req = AddBookRequest::parse(
            &req.title,
            &req.author,
            &req.genre,
            &req.year.to_text(),
            &req.price.to_text(),
        )
        .map_err(|e| Self::to_mcp_error(e.into()))?;

        let book = self
            .write()?
            .add_book(add_req)
            .map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Added: {}",
            describe(&book)
        ))]))
    }

    #[tool(
        name = "list_books",
        description = "Show every book as a table (ID, title, author, genre, price, status), in the order they were added.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn list_books(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpListRequest>,
    ) -> Result<CallToolResult, McpError> {
        let svc = self.read()?;
        let books = svc.catalog().list_books();

        if books.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "The catalog is empty. Use `add_book` to add books.",
            )]));
        }

        Ok(CallToolResult::success(vec![Content::text(format!(
            "# Catalog ({} books)\n\n{}",
            books.len(),
            format_table(books)
        ))]))
    }

    #[tool(
        name = "search_books",
        description = "Find books whose title, author, or genre contains the query (case-insensitive).",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn search_books(
        &self,
        Parameters(req): Parameters<McpSearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let field: SearchField = req
            .field
            .parse()
            .map_err(|e: DomainError| Self::to_mcp_error(e.into()))?;

        let svc = self.read()?;
        let found = svc.catalog().search(field, &req.query);

        if found.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(format!(
                "No book matches {} '{}'.",
                field.as_str(),
                req.query
            ))]));
        }

        Ok(CallToolResult::success(vec![Content::text(format!(
            "{} result(s):\n\n{}",
            found.len(),
            format_table(found)
        ))]))
    }

    #[tool(
        name = "filter_genre",
        description = "Show only the books of one genre (case-insensitive, exact match).",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn filter_genre(
        &self,
        Parameters(req): Parameters<McpFilterGenreRequest>,
    ) -> Result<CallToolResult, McpError> {
        let svc = self.read()?;
        let found = svc.catalog().filter_by_genre(&req.genre);

        if found.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(format!(
                "No book found for genre '{}'.",
                req.genre
            ))]));
        }

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Genre '{}':\n\n{}",
            req.genre,
            format_table(found)
        ))]))
    }

    #[tool(
        name = "loan_book",
        description = "Mark a book as loaned. Fails if the ID is unknown or the book is already on loan.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn loan_book(
        &self,
        Parameters(req): Parameters<McpBookIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        let book = self
            .write()?
            .loan(BookId::new(req.id))
            .map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Loaned: {}",
            describe(&book)
        ))]))
    }

    #[tool(
        name = "return_book",
        description = "Mark a loaned book as returned. Fails if the ID is unknown or the book is already available.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn return_book(
        &self,
        Parameters(req): Parameters<McpBookIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        let book = self
            .write()?
            .return_book(BookId::new(req.id))
            .map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Returned: {}",
            describe(&book)
        ))]))
    }

    #[tool(
        name = "delete_book",
        description = "Delete a book. Ask the user first, then call with confirm=true. Without confirm the catalog is left untouched.",
        annotations(
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn delete_book(
        &self,
        Parameters(req): Parameters<McpDeleteRequest>,
    ) -> Result<CallToolResult, McpError> {
        let id = BookId::new(req.id);
        let mut svc = self.write()?;

        // キャンセル時の表示用に削除前の情報を取っておく
        let label = svc.catalog().get(id).map(describe);

        let outcome = svc
            .delete_book(id, req.confirm)
            .map_err(Self::to_mcp_error)?;

        let text = match outcome {
            DeleteOutcome::Deleted(book) => format!("Deleted: {}", describe(&book)),
            DeleteOutcome::Cancelled => format!(
                "Cancelled: {} was not deleted. Call again with confirm=true to delete it.",
                label.unwrap_or_else(|| format!("#{id}"))
            ),
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        name = "report",
        description = "Show catalog statistics: counts, total value, most and least expensive book, most frequent genre.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn report(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpReportRequest>,
    ) -> Result<CallToolResult, McpError> {
        let stats = self
            .read()?
            .catalog()
            .report()
            .map_err(|e| Self::to_mcp_error(e.into()))?;

        Ok(CallToolResult::success(vec![Content::text(format_report(
            &stats,
        ))]))
    }
}

// =============================================================================
// Tests
// =============================================================================
