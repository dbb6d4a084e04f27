//! Query submission against a (mocked) graph backend and the result views.

pub mod backend;
pub mod errors;
pub mod request;
pub mod result;
pub mod session;
pub mod table;
pub mod templates;

pub use backend::{DEFAULT_MOCK_DELAY, MockQueryBackend, QueryBackend, fixture_result};
pub use errors::QueryError;
pub use request::{DEFAULT_QUERY_DEPTH, DEFAULT_RESULT_LIMIT, QueryParams, QueryRequest};
pub use result::{
    EdgeRecord, ElementData, GraphSummary, NodeRecord, QueryResult, ResultElement,
    encode_properties, parse_properties,
};
pub use session::{QuerySession, QueryStatus};
pub use table::{
    Connection, Direction, ResultTable, SortDirection, SortField, TableQuery, TableRow,
};
pub use templates::{QueryTemplate, builtin_templates, find_template};
