//! `searchql-core`: a Lucene/OpenSearch-style query language compiler.
//!
//! A query string is lexed, parsed into an [`ast::AstNode`], resolved
//! against a [`schema::Schema`], and translated into either a
//! parameterized SQL `WHERE` clause (Postgres/MySQL/SQLite) or a document
//! filter, by one of the [`translate`] module's [`translate::Translator`]
//! implementations. [`compile::compile`] wires the three stages together.

pub mod ast;
pub mod cache;
pub mod compile;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod schema;
pub mod translate;

pub use cache::ParseCache;
pub use compile::{compile as compile_query, CompileError};
pub use position::Position;
