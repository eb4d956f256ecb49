//! Personal library catalog: typed book records, loan tracking and
//! statistics over a single JSON document, served as an MCP tool server.

pub mod domain {
    pub mod error;
    pub mod repository;

    pub mod model {
        pub mod book;
        pub mod catalog;
        pub mod id;
        pub mod report;
    }
}

pub mod application {
    pub mod error;
    pub mod service;
}

pub mod infra {
    pub mod json_store;
}

pub mod interface {
    pub mod mcp;
    pub mod render;
}
