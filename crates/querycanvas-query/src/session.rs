use crate::errors::QueryError;
use crate::result::QueryResult;

/// Submission state of one query panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Ready(QueryResult),
}

#[derive(Debug, Clone, Default)]
pub struct QuerySession {
    status: QueryStatus,
}

impl QuerySession {
    pub fn status(&self) -> &QueryStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, QueryStatus::Loading)
    }

    /// Enters `Loading`. Fails while a previous submission is outstanding.
    pub fn begin(&mut self) -> Result<(), QueryError> {
        if self.is_loading() {
            return Err(QueryError::AlreadyLoading);
        }
        self.status = QueryStatus::Loading;
        Ok(())
    }

    pub fn complete(&mut self, result: QueryResult) {
        self.status = QueryStatus::Ready(result);
    }

    /// Back to `Idle` after a failed submission.
    pub fn abort(&mut self) {
        self.status = QueryStatus::Idle;
    }

    pub fn result(&self) -> Option<&QueryResult> {
        match &self.status {
            QueryStatus::Ready(result) => Some(result),
            _ => None,
        }
    }
}
