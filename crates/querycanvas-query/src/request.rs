use crate::errors::QueryError;
use querycanvas_core::{EdgeEntity, NodeEntity};
use serde::{Deserialize, Serialize};

pub const DEFAULT_RESULT_LIMIT: u32 = 100;
pub const DEFAULT_QUERY_DEPTH: u32 = 2;

/// Result limit and traversal depth. Both are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    result_limit: u32,
    query_depth: u32,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            result_limit: DEFAULT_RESULT_LIMIT,
            query_depth: DEFAULT_QUERY_DEPTH,
        }
    }
}

fn at_least_one(name: &'static str, value: i64) -> Result<u32, QueryError> {
    if value < 1 {
        return Err(QueryError::InvalidParameter { name, value });
    }
    Ok(u32::try_from(value).unwrap_or(u32::MAX))
}

impl QueryParams {
    pub fn new(result_limit: i64, query_depth: i64) -> Result<Self, QueryError> {
        Ok(Self {
            result_limit: at_least_one("result_limit", result_limit)?,
            query_depth: at_least_one("query_depth", query_depth)?,
        })
    }

    /// Same as [`Self::new`] but pulls out-of-range input up to 1, the way a
    /// `min=1` number input behaves.
    pub fn clamped(result_limit: i64, query_depth: i64) -> Self {
        let clamp = |v: i64| u32::try_from(v.max(1)).unwrap_or(u32::MAX);
        Self {
            result_limit: clamp(result_limit),
            query_depth: clamp(query_depth),
        }
    }

    pub fn result_limit(&self) -> u32 {
        self.result_limit
    }

    pub fn query_depth(&self) -> u32 {
        self.query_depth
    }
}

/// What gets sent to the backend: the active workspace graph plus parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub nodes: Vec<NodeEntity>,
    pub edges: Vec<EdgeEntity>,
    pub result_limit: u32,
    pub query_depth: u32,
}

impl QueryRequest {
    pub fn new(nodes: &[NodeEntity], edges: &[EdgeEntity], params: QueryParams) -> Self {
        Self {
            nodes: nodes.to_vec(),
            edges: edges.to_vec(),
            result_limit: params.result_limit,
            query_depth: params.query_depth,
        }
    }

    pub fn params(&self) -> QueryParams {
        QueryParams::clamped(self.result_limit.into(), self.query_depth.into())
    }
}
